// Configuration loader
// Reads ~/.focusflow/config.toml, then applies environment overrides

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use super::settings::Settings;

/// Load settings from the config file and environment.
///
/// Precedence, lowest to highest: built-in defaults, `~/.focusflow/config.toml`,
/// then `FOCUSFLOW_API_URL` / `API_URL`, `FOCUSFLOW_PIPELINE_URL`,
/// `FOCUSFLOW_EMAIL`, `FOCUSFLOW_PASSWORD`.
pub fn load_settings() -> Result<Settings> {
    let mut settings = match config_path() {
        Some(path) if path.exists() => {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?
        }
        _ => Settings::default(),
    };

    apply_env_overrides(&mut settings);

    tracing::debug!(api_url = %settings.api_url, "Loaded client settings");
    Ok(settings)
}

fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".focusflow").join("config.toml"))
}

fn apply_env_overrides(settings: &mut Settings) {
    // FOCUSFLOW_API_URL wins over the legacy API_URL used by the old scripts.
    for key in ["FOCUSFLOW_API_URL", "API_URL"] {
        if let Ok(url) = std::env::var(key) {
            if !url.is_empty() {
                settings.api_url = url;
                break;
            }
        }
    }

    if let Ok(url) = std::env::var("FOCUSFLOW_PIPELINE_URL") {
        if !url.is_empty() {
            settings.pipeline_url = url;
        }
    }

    if let Ok(email) = std::env::var("FOCUSFLOW_EMAIL") {
        if !email.is_empty() {
            settings.verify.email = Some(email);
        }
    }

    if let Ok(password) = std::env::var("FOCUSFLOW_PASSWORD") {
        if !password.is_empty() {
            settings.verify.password = Some(password);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_override_replaces_api_url() {
        let mut settings = Settings::default();
        std::env::set_var("FOCUSFLOW_API_URL", "http://override:3000/api/v1");
        apply_env_overrides(&mut settings);
        std::env::remove_var("FOCUSFLOW_API_URL");
        assert_eq!(settings.api_url, "http://override:3000/api/v1");
    }
}
