mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Highest precision accepted for printed samples; f32 carries ~9 digits.
const MAX_PRECISION: usize = 12;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    expand_paths(&mut config);

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = ["./shadowtake.toml", "~/.config/shadowtake/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    // Return default config if no file found
    let mut config = Config::default();
    expand_paths(&mut config);
    Ok(config)
}

fn expand_paths(config: &mut Config) {
    let root = config.takes.root.to_string_lossy();
    let expanded = PathBuf::from(shellexpand::tilde(&root).as_ref());
    config.takes.root = expanded;
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.takes.root.as_os_str().is_empty() {
        anyhow::bail!("Take root cannot be empty");
    }

    for (key, name) in [
        ("stream_file", &config.takes.stream_file),
        ("definition_file", &config.takes.definition_file),
    ] {
        if name.is_empty() {
            anyhow::bail!("takes.{} cannot be empty", key);
        }
        if name.contains('/') || name.contains('\\') {
            anyhow::bail!("takes.{} must be a file name, not a path: {}", key, name);
        }
    }

    if config.output.precision > MAX_PRECISION {
        anyhow::bail!(
            "output.precision must be at most {}, got {}",
            MAX_PRECISION,
            config.output.precision
        );
    }

    Ok(())
}
