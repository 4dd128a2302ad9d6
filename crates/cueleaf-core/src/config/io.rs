use super::PrompterConfig;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Load configuration from the given path, falling back to defaults on error.
pub fn load_config(path: &Path) -> PrompterConfig {
    let contents = match fs::read_to_string(path) {
        Ok(data) => {
            info!(path = %path.display(), "Loaded base config");
            data
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                "Falling back to default config: {err}"
            );
            return PrompterConfig::default();
        }
    };

    match parse_config(&contents) {
        Ok(cfg) => {
            debug!("Parsed configuration from disk");
            cfg
        }
        Err(err) => {
            warn!(path = %path.display(), "Invalid config TOML: {err:#}");
            PrompterConfig::default()
        }
    }
}

pub fn parse_config(contents: &str) -> Result<PrompterConfig> {
    let cfg: PrompterConfig = toml::from_str(contents).context("failed to parse config TOML")?;
    Ok(cfg.sanitized())
}

pub fn serialize_config(config: &PrompterConfig) -> Result<String> {
    toml::to_string_pretty(config).context("failed to serialize config")
}
