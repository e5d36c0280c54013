use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL including the `/api` prefix. Empty means offline mode:
    /// no live backend, stock queries are served synthetically.
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: String::new(), timeout_secs: default_timeout() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: default_data_dir() }
    }
}

fn default_timeout() -> u64 { 30 }
fn default_data_dir() -> String { "data".to_string() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load config.toml when present, otherwise start from defaults, then
    /// normalize and validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default().unwrap_or_default();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.api.normalize_from_env();
        self.api.validate()?;
        self.storage.normalize();
        Ok(())
    }
}

impl ApiConfig {
    /// Fill the base URL from the environment when the TOML left it empty.
    pub fn normalize_from_env(&mut self) {
        if self.base_url.trim().is_empty() {
            if let Ok(url) = std::env::var("DAMU_API_BASE_URL") {
                self.base_url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(anyhow!("api.timeout_secs must be a positive number of seconds"));
        }
        if self.base_url.trim().is_empty() {
            // Offline mode is a valid configuration.
            return Ok(());
        }
        let lower = self.base_url.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("api.base_url must start with http:// or https://"));
        }
        Ok(())
    }

    pub fn is_offline(&self) -> bool {
        self.base_url.trim().is_empty()
    }
}

impl StorageConfig {
    fn normalize(&mut self) {
        if self.data_dir.trim().is_empty() {
            self.data_dir = default_data_dir();
        }
    }

    /// Session state lives in a single JSON file under the data directory.
    pub fn session_file(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.data_dir).join("session.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_offline_and_valid() {
        let mut cfg = AppConfig::default();
        assert!(cfg.normalize_and_validate().is_ok());
        assert!(cfg.api.is_offline());
        assert_eq!(cfg.api.timeout_secs, 30);
        assert_eq!(cfg.storage.session_file(), std::path::PathBuf::from("data/session.json"));
    }

    #[test]
    fn parses_toml_sections() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [api]
            base_url = "http://localhost:5000/api"
            timeout_secs = 5

            [storage]
            data_dir = "state"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.api.base_url, "http://localhost:5000/api");
        assert_eq!(cfg.api.timeout_secs, 5);
        assert_eq!(cfg.storage.data_dir, "state");
    }

    #[test]
    fn rejects_non_http_base_url() {
        let cfg = ApiConfig { base_url: "ftp://example.com/api".into(), timeout_secs: 30 };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let cfg = ApiConfig { base_url: String::new(), timeout_secs: 0 };
        assert!(cfg.validate().is_err());
    }
}
