use crate::error::{Result, SnapshellError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// 8 user/assistant exchanges.
pub const DEFAULT_MAX_CONTEXT_TURNS: usize = 16;

const CONFIG_FILE: &str = "config.toml";
const DB_FILE: &str = "system_info.db";
const INPUT_HISTORY_FILE: &str = "input_history";

/// Runtime configuration, loaded once at start-up and handed to whoever
/// needs it.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: Option<String>,
    pub llm_host: String,
    pub llm_model: String,
    pub request_timeout: Duration,
    pub max_context_turns: usize,
    pub data_dir: PathBuf,
}

/// On-disk shape of `config.toml`. Every field is optional so a file holding
/// only `api_key = "..."` is valid.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_base: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_timeout_secs: Option<u64>,
}

impl Config {
    pub fn with_data_dir<P: Into<PathBuf>>(data_dir: P) -> Self {
        Config {
            api_key: None,
            llm_host: DEFAULT_API_BASE.to_string(),
            llm_model: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_context_turns: DEFAULT_MAX_CONTEXT_TURNS,
            data_dir: data_dir.into(),
        }
    }

    /// Resolve the data directory, read `config.toml` from it and apply
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let data_dir = match std::env::var("SNAPSHELL_HOME") {
            Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => default_data_dir()?,
        };

        let mut config = Self::load_from(&data_dir)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Read `config.toml` from `data_dir`. A missing file yields defaults.
    pub fn load_from(data_dir: &Path) -> Result<Self> {
        let mut config = Config::with_data_dir(data_dir);
        let path = data_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(config);
        }

        let raw = fs::read_to_string(&path)
            .map_err(|e| SnapshellError::Config(format!("{}: {}", path.display(), e)))?;
        let file: ConfigFile = toml::from_str(&raw)
            .map_err(|e| SnapshellError::Config(format!("{}: {}", path.display(), e)))?;

        config.api_key = file.api_key.filter(|key| !key.trim().is_empty());
        if let Some(base) = file.api_base {
            config.llm_host = base;
        }
        if let Some(model) = file.model {
            config.llm_model = model;
        }
        if let Some(secs) = file.request_timeout_secs {
            if secs == 0 {
                return Err(SnapshellError::Config(format!(
                    "{}: request_timeout_secs must be at least 1",
                    path.display()
                )));
            }
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Layer environment-style overrides on top of the file values.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("HELPER_GROQ_API_KEY").filter(|v| !v.trim().is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(model) = lookup("SNAPSHELL_MODEL").filter(|v| !v.trim().is_empty()) {
            self.llm_model = model;
        }
        if let Some(base) = lookup("SNAPSHELL_API_BASE").filter(|v| !v.trim().is_empty()) {
            self.llm_host = base;
        }
    }

    /// Persist `api_key` to `config.toml`, keeping any other settings already
    /// in the file.
    pub fn save_api_key(&mut self, api_key: &str) -> Result<()> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(SnapshellError::Config("API key must not be empty".to_string()));
        }

        fs::create_dir_all(&self.data_dir)
            .map_err(|e| SnapshellError::Config(format!("{}: {}", self.data_dir.display(), e)))?;

        let path = self.config_path();
        let mut file: ConfigFile = match fs::read_to_string(&path) {
            Ok(raw) => toml::from_str(&raw)
                .map_err(|e| SnapshellError::Config(format!("{}: {}", path.display(), e)))?,
            Err(_) => ConfigFile::default(),
        };
        file.api_key = Some(api_key.to_string());

        let rendered = toml::to_string_pretty(&file)
            .map_err(|e| SnapshellError::Config(e.to_string()))?;
        fs::write(&path, rendered)
            .map_err(|e| SnapshellError::Config(format!("{}: {}", path.display(), e)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = fs::set_permissions(&path, fs::Permissions::from_mode(0o600));
        }

        self.api_key = Some(api_key.to_string());
        Ok(())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE)
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }

    pub fn input_history_path(&self) -> PathBuf {
        self.data_dir.join(INPUT_HISTORY_FILE)
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| SnapshellError::Config("Could not determine home directory".to_string()))?;
    Ok(home.join(".snapshell"))
}
