use anyhow::Result;

use crate::cargo;

/// `dunkstats-common` tiers; each must compile on its own.
const FEATURE_COMBINATIONS: &[&[&str]] = &[
    &[], // default
    &["foundation"],
    &["runtime"],
    &["test-utils"],
    &["foundation", "runtime", "test-utils"],
];

/// Check that all required feature combinations compile successfully.
pub fn test_feature_matrix() -> Result<()> {
    println!("Testing {} dunkstats-common feature combinations...", FEATURE_COMBINATIONS.len());

    for (index, features) in FEATURE_COMBINATIONS.iter().enumerate() {
        let joined = features.join(",");
        let display_label = if features.is_empty() { "default" } else { joined.as_str() };

        let mut args = vec!["check", "-p", "dunkstats-common", "--no-default-features"];
        if !features.is_empty() {
            args.extend(["--features", joined.as_str()]);
        }

        println!("\n[{}/{}] cargo {}", index + 1, FEATURE_COMBINATIONS.len(), args.join(" "));

        cargo(&args).map_err(|err| {
            anyhow::anyhow!("Feature combination '{display_label}' failed to compile: {err}")
        })?;

        println!("✅ Features '{display_label}' compiled successfully");
    }

    println!("\n✅ All {} feature combinations compile successfully!", FEATURE_COMBINATIONS.len());

    Ok(())
}
