//! Configuration loading and validation

mod schema;

pub use schema::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a YAML file
pub fn load_config(path: &Path) -> Result<MurmurConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {:?}", path))?;
    let config: MurmurConfig = serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse config: {:?}", path))?;
    config.validate()?;
    Ok(config)
}

/// Load the config at `path` if it exists, otherwise use defaults
pub fn load_or_default(path: &Path) -> Result<MurmurConfig> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(MurmurConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_minimal_config() {
        let yaml = r#"
audio:
  sample_rate: 44100
  buffer_size: 512

master:
  volume: 0.5
"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.audio.sample_rate, 44100);
        assert_eq!(config.master.volume, 0.5);
        assert_eq!(config.master.fade_in_ms, 1000);
        assert_eq!(config.suggestions.analysis_delay_ms, 1500);
    }

    #[test]
    fn test_load_example_config() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(include_str!("../../murmur.example.yaml").as_bytes())
            .unwrap();

        let config = load_config(file.path()).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_invalid_config() {
        let yaml = "master:\n  volume: 3.0\n";
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_or_default(&dir.path().join("murmur.yaml")).unwrap();
        assert_eq!(config.master.volume, 0.7);
    }
}
