use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::models::Config;

/// Load the config file, or fall back to defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        debug!("No config file given, using defaults");
        return Ok(Config::default());
    };
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_from_file() {
        let path = std::env::temp_dir().join(format!("activity-board-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[server]\naddr = \"127.0.0.1:4000\"\ntimezone = \"Europe/Paris\"\n\n[notification]\nhide_after_secs = 2\n",
        )
        .unwrap();
        let cfg = load_config(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(cfg.server.addr, "127.0.0.1:4000");
        assert_eq!(cfg.server.timezone, "Europe/Paris");
        assert_eq!(cfg.notification.hide_after_secs, 2);
        assert_eq!(cfg.backend.base_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = load_config(Some(Path::new("/nonexistent/board.toml"))).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read"));
    }

    #[test]
    fn test_no_path_uses_defaults() {
        let cfg = load_config(None).unwrap();
        assert_eq!(cfg.server.title, "Mergington High School");
    }
}
