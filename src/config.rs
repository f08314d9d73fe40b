use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::game::paths::home_dir;

/// User settings
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Network interface override for the packet drop
    pub interface: Option<String>,
    /// Game install directory override (skips Steam discovery)
    pub install_root: Option<PathBuf>,
    /// Where the settings were loaded from
    pub config_path: Option<PathBuf>,
}

impl Settings {
    /// Load settings from file. A missing file is not an error; defaults
    /// apply and discovery runs unassisted.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => Self::find_config_file(),
        };

        let mut settings = Settings::default();

        if config_path.exists() {
            settings.config_path = Some(config_path.clone());

            let content = fs::read_to_string(&config_path)?;

            for line in content.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }

                if let Some(pos) = line.find(':') {
                    let key = line[..pos].trim();
                    let value = line[pos + 1..].trim();
                    if value.is_empty() {
                        continue;
                    }

                    match key {
                        "interface" => {
                            settings.interface = Some(value.to_string());
                        }
                        "install_root" => {
                            settings.install_root = Some(PathBuf::from(value));
                        }
                        _ => {
                            // Ignore unknown keys
                        }
                    }
                }
            }
        }

        Ok(settings)
    }

    /// Find the settings file: XDG config directory first, then
    /// ~/.config/pfdc, then the current directory.
    fn find_config_file() -> PathBuf {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            let xdg_path = PathBuf::from(xdg_config).join("pfdc/config.yml");
            if xdg_path.exists() {
                return xdg_path;
            }
        }

        if let Some(home) = home_dir() {
            let home_config = home.join(".config/pfdc/config.yml");
            if home_config.exists() {
                return home_config;
            }
        }

        PathBuf::from("config.yml")
    }
}
