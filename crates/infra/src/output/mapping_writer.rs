//! Mapping artifact writer
//!
//! Pretty-printed JSON, optionally gzip-compressed to `<path>.gz`.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use dunkstats_domain::{OutputConfig, PfpMapping, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::info;

use crate::errors::InfraError;

/// Writes a [`PfpMapping`] to disk.
#[derive(Debug, Clone)]
pub struct MappingWriter {
    path: PathBuf,
    compress: bool,
}

impl MappingWriter {
    /// Writer for `path`, gzip-compressed when `compress` is set.
    pub fn new(path: impl Into<PathBuf>, compress: bool) -> Self {
        Self { path: path.into(), compress }
    }

    /// Writer for the configured output path and compression.
    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.mapping_path, config.compress)
    }

    /// Final location of the artifact.
    pub fn target_path(&self) -> PathBuf {
        if self.compress {
            let mut name = self.path.clone().into_os_string();
            name.push(".gz");
            PathBuf::from(name)
        } else {
            self.path.clone()
        }
    }

    /// Serialize `mapping` and write it, creating parent directories.
    ///
    /// # Errors
    /// `DunkstatsError::Io` or `DunkstatsError::Serialization`.
    pub fn write(&self, mapping: &PfpMapping) -> Result<PathBuf> {
        let target = self.target_path();
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(InfraError::from)?;
        }

        let json = serde_json::to_vec_pretty(mapping).map_err(InfraError::from)?;
        if self.compress {
            write_gzip(&target, &json)?;
        } else {
            fs::write(&target, &json).map_err(InfraError::from)?;
        }

        info!(
            path = %target.display(),
            bytes = json.len(),
            compressed = self.compress,
            users = mapping.users.len(),
            "mapping written"
        );
        Ok(target)
    }
}

fn write_gzip(path: &Path, bytes: &[u8]) -> Result<()> {
    let file = File::create(path).map_err(InfraError::from)?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::best());
    encoder.write_all(bytes).map_err(InfraError::from)?;
    encoder.finish().map_err(InfraError::from)?.flush().map_err(InfraError::from)?;
    Ok(())
}
