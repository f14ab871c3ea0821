use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_OUTPUT_DIR: &str = ".";
const DEFAULT_PREFIX: &str = "oskimage";

#[derive(Debug, Deserialize, Default)]
struct IngestConfigFile {
    output_dir: Option<PathBuf>,
    prefix: Option<String>,
}

/// Where flushed frames are written.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub output_dir: PathBuf,
    pub prefix: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl IngestConfig {
    /// Defaults, then `OSK_IMAGE_CONFIG` (JSON), then `OSK_IMAGE_*` overrides.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("OSK_IMAGE_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) if !path.trim().is_empty() => Some(read_config_file(Path::new(path))?),
            _ => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env();
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: IngestConfigFile) -> Self {
        Self {
            output_dir: file
                .output_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            prefix: file.prefix.unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
        }
    }

    fn apply_env(&mut self) {
        if let Ok(dir) = std::env::var("OSK_IMAGE_OUTPUT_DIR") {
            if !dir.trim().is_empty() {
                self.output_dir = PathBuf::from(dir);
            }
        }
        if let Ok(prefix) = std::env::var("OSK_IMAGE_PREFIX") {
            if !prefix.trim().is_empty() {
                self.prefix = prefix;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.prefix.trim().is_empty() {
            return Err(anyhow!("image prefix must not be empty"));
        }
        if self.prefix.contains(['/', '\\']) {
            return Err(anyhow!(
                "image prefix must not contain path separators (got {:?})",
                self.prefix
            ));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(anyhow!("output directory must not be empty"));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<IngestConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_naming() {
        let cfg = IngestConfig::from_file(IngestConfigFile::default());
        assert_eq!(cfg.prefix, "oskimage");
        assert_eq!(cfg.output_dir, PathBuf::from("."));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_prefix_with_separator() {
        let cfg = IngestConfig {
            output_dir: PathBuf::from("."),
            prefix: "../escape".to_string(),
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn file_fields_override_defaults() {
        let file: IngestConfigFile =
            serde_json::from_str(r#"{"output_dir": "/var/frames", "prefix": "lcd"}"#).unwrap();
        let cfg = IngestConfig::from_file(file);
        assert_eq!(cfg.output_dir, PathBuf::from("/var/frames"));
        assert_eq!(cfg.prefix, "lcd");
    }
}
