//! `.env` credential sink
//!
//! Writes refreshed tokens back to the `.env` file they were loaded from so
//! the next run starts with a valid credential. Nothing is created when the
//! file does not exist.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dunkstats_core::CredentialSink;
use dunkstats_domain::{Credential, Result};
use regex::Regex;
use tracing::{debug, info};

use crate::errors::InfraError;

const ACCESS_TOKEN_KEY: &str = "TWITCH_ACCESS_TOKEN";
const REFRESH_TOKEN_KEY: &str = "TWITCH_REFRESH_TOKEN";

/// [`CredentialSink`] that rewrites token lines in a `.env` file.
#[derive(Debug, Clone)]
pub struct EnvFileCredentialSink {
    path: PathBuf,
}

impl EnvFileCredentialSink {
    /// Sink rewriting the `.env` file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File this sink rewrites.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialSink for EnvFileCredentialSink {
    async fn on_credential_refreshed(&self, credential: &Credential) -> Result<()> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no .env file, skipping credential write");
                return Ok(());
            }
            Err(err) => return Err(InfraError::from(err).into()),
        };

        let mut updated = upsert(&contents, ACCESS_TOKEN_KEY, &credential.access_token);
        if let Some(refresh_token) = credential.refresh_token.as_deref() {
            updated = upsert(&updated, REFRESH_TOKEN_KEY, refresh_token);
        }

        tokio::fs::write(&self.path, updated).await.map_err(InfraError::from)?;
        info!(path = %self.path.display(), "updated tokens in .env file");
        Ok(())
    }
}

/// Replace every `KEY=...` line, or append one when absent.
fn upsert(contents: &str, key: &str, value: &str) -> String {
    let line = format!("{key}={value}");
    let pattern = format!(r"(?m)^{}=.*$", regex::escape(key));
    // The pattern is built from an escaped constant, so it always compiles.
    match Regex::new(&pattern) {
        Ok(re) if re.is_match(contents) => {
            re.replace_all(contents, regex::NoExpand(&line)).into_owned()
        }
        _ => {
            let mut out = contents.to_string();
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&line);
            out.push('\n');
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn replaces_existing_line() {
        let contents = "DUNKBIN_USER=u\nTWITCH_ACCESS_TOKEN=old\nTWITCH_CLIENT_ID=c\n";
        assert_eq!(
            upsert(contents, ACCESS_TOKEN_KEY, "new"),
            "DUNKBIN_USER=u\nTWITCH_ACCESS_TOKEN=new\nTWITCH_CLIENT_ID=c\n"
        );
    }

    #[test]
    fn appends_missing_line() {
        assert_eq!(upsert("A=1", REFRESH_TOKEN_KEY, "r"), "A=1\nTWITCH_REFRESH_TOKEN=r\n");
        assert_eq!(upsert("", REFRESH_TOKEN_KEY, "r"), "TWITCH_REFRESH_TOKEN=r\n");
    }

    #[test]
    fn does_not_touch_prefixed_keys() {
        let contents = "MY_TWITCH_ACCESS_TOKEN=keep\n";
        assert_eq!(
            upsert(contents, ACCESS_TOKEN_KEY, "new"),
            "MY_TWITCH_ACCESS_TOKEN=keep\nTWITCH_ACCESS_TOKEN=new\n"
        );
    }

    #[test]
    fn dollar_signs_are_literal() {
        assert_eq!(upsert("TWITCH_ACCESS_TOKEN=x\n", ACCESS_TOKEN_KEY, "a$1b"), "TWITCH_ACCESS_TOKEN=a$1b\n");
    }

    #[tokio::test]
    async fn rewrites_tokens_in_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "TWITCH_ACCESS_TOKEN=old\nTWITCH_CLIENT_ID=c\n").unwrap();

        let sink = EnvFileCredentialSink::new(&path);
        sink.on_credential_refreshed(&Credential::new("fresh", Some("r2".into()))).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "TWITCH_ACCESS_TOKEN=fresh\nTWITCH_CLIENT_ID=c\nTWITCH_REFRESH_TOKEN=r2\n"
        );
    }

    #[tokio::test]
    async fn missing_file_is_not_created() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");

        let sink = EnvFileCredentialSink::new(&path);
        sink.on_credential_refreshed(&Credential::new("fresh", None)).await.unwrap();

        assert!(!path.exists());
    }
}
