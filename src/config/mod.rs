#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix for environment overrides, e.g. `STUDYMATE_OPENAI_API_KEY`.
pub const ENV_PREFIX: &str = "STUDYMATE_";

/// Resolved process settings.
///
/// Layered at load time, later layers winning: built-in defaults, then the
/// JSON secrets file (only if present and non-empty; a malformed file is
/// ignored), then `STUDYMATE_*` environment variables. Loading never fails;
/// the value is built once in `main` and passed by reference from there on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub default_model: String,
    pub notion_database_id: String,
    pub notion_api_key: String,
    pub anthropic_api_key: String,
    pub openai_api_key: String,
    pub google_api_key: String,
    pub imgbb_api_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_model: "gpt-4o".to_string(),
            notion_database_id: String::new(),
            notion_api_key: String::new(),
            anthropic_api_key: String::new(),
            openai_api_key: String::new(),
            google_api_key: String::new(),
            imgbb_api_key: String::new(),
        }
    }
}

impl Settings {
    pub fn load() -> Self {
        let path = Self::config_path().ok();
        Self::load_from(path.as_deref(), &|key| std::env::var(key).ok())
    }

    /// Same layering as `load`, with the file location and environment lookup
    /// injected so tests do not touch the process environment.
    pub fn load_from(file: Option<&Path>, env: &dyn Fn(&str) -> Option<String>) -> Self {
        let mut settings = file.and_then(read_secrets_file).unwrap_or_default();
        settings.apply_env(env);
        settings
    }

    fn apply_env(&mut self, env: &dyn Fn(&str) -> Option<String>) {
        let fields: [(&str, &mut String); 7] = [
            ("DEFAULT_MODEL", &mut self.default_model),
            ("NOTION_DATABASE_ID", &mut self.notion_database_id),
            ("NOTION_API_KEY", &mut self.notion_api_key),
            ("ANTHROPIC_API_KEY", &mut self.anthropic_api_key),
            ("OPENAI_API_KEY", &mut self.openai_api_key),
            ("GOOGLE_API_KEY", &mut self.google_api_key),
            ("IMGBB_API_KEY", &mut self.imgbb_api_key),
        ];
        for (name, slot) in fields {
            if let Some(value) = env(&format!("{ENV_PREFIX}{name}")) {
                *slot = value;
            }
        }
    }

    pub fn config_dir() -> Result<PathBuf> {
        let base = directories::BaseDirs::new()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;

        Ok(base.home_dir().join(".config").join("studymate"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Write the starter template for first-time setup. The file holds API
    /// keys, so it is created owner read/write only.
    pub fn write_template() -> Result<PathBuf> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&path, CONFIG_TEMPLATE)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(path)
    }
}

/// Returns None for a missing, empty, or malformed file; the caller falls
/// back to the layers below in every case.
fn read_secrets_file(path: &Path) -> Option<Settings> {
    let meta = fs::metadata(path).ok()?;
    if !meta.is_file() || meta.len() == 0 {
        return None;
    }

    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(settings) => Some(settings),
        Err(e) => {
            tracing::warn!("Ignoring malformed secrets file {}: {}", path.display(), e);
            None
        }
    }
}

const CONFIG_TEMPLATE: &str = r#"{
  "default_model": "gpt-4o",
  "notion_database_id": "",
  "notion_api_key": "",
  "anthropic_api_key": "",
  "openai_api_key": "",
  "google_api_key": "",
  "imgbb_api_key": ""
}
"#;
