use std::fs;
use std::path::Path;

use crate::model::config::PlanConfig;

pub const CONFIG_FILE: &str = "planflow.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Read planflow.toml from `dir`. A missing file yields the defaults;
/// an unreadable or malformed file is an error the embedder can show.
pub fn read_config(dir: &Path) -> Result<PlanConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(PlanConfig::default());
    }
    let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = read_config(dir.path()).unwrap();
        assert!(cfg.store.file.is_none());
        assert_eq!(cfg.ui.history_limit, 500);
    }

    #[test]
    fn reads_store_and_ui_sections() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "[store]\nfile = \"board.json\"\n\n[ui]\nzoom_index = 0\nhistory_limit = 50\n",
        )
        .unwrap();
        let cfg = read_config(dir.path()).unwrap();
        assert_eq!(
            cfg.store.file.as_deref(),
            Some(Path::new("board.json"))
        );
        assert_eq!(cfg.ui.initial_day_width(), 120);
        assert_eq!(cfg.ui.history_limit, 50);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[ui\nzoom_index = ").unwrap();
        assert!(matches!(
            read_config(dir.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
