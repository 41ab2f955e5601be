use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_FACILITATOR_URL: &str = "https://x402.org/facilitator";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("invalid config file {path}: {source}")]
    Parse { path: String, source: toml::de::Error },
    #[error("invalid {var}: {value}")]
    InvalidVar { var: &'static str, value: String },
}

/// Process-level settings: how the server is exposed.
pub struct Config {
    pub mode: String, // "stdio" or "server"
    pub port: u16,
    pub disable_rpc_shim: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let mode = std::env::var("MODE").unwrap_or_else(|_| "stdio".into());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(8080);
        let disable_rpc_shim = std::env::var("DISABLE_RPC_SHIM")
            .map(|v| !v.is_empty())
            .unwrap_or(false);

        Self {
            mode,
            port,
            disable_rpc_shim,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.mode.as_str(), "server" | "stdio") {
            return Err(ConfigError::InvalidVar { var: "MODE", value: self.mode.clone() });
        }
        if self.mode == "server" && self.port == 0 {
            return Err(ConfigError::InvalidVar { var: "PORT", value: "0".into() });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FacilitatorConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub retries: u32,
}

impl Default for FacilitatorConfig {
    fn default() -> Self {
        Self { url: DEFAULT_FACILITATOR_URL.into(), api_key: None, retries: 2 }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30, connect_timeout_secs: 5 }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Tool settings: optional TOML file at `X402_MCP_CONFIG`, then env overrides.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub facilitator: FacilitatorConfig,
    pub http: HttpConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let mut cfg = match std::env::var("X402_MCP_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Self::from_toml_file(Path::new(&path))?,
            _ => Self::default(),
        };
        cfg.apply_env()?;
        Ok(cfg)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let shown = path.display().to_string();
        let raw = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: shown.clone(), source })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse { path: shown, source })
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(url) = std::env::var("FACILITATOR_URL") {
            if !url.trim().is_empty() {
                self.facilitator.url = url;
            }
        }
        if let Ok(key) = std::env::var("FACILITATOR_API_KEY") {
            self.facilitator.api_key = Some(key).filter(|k| !k.trim().is_empty());
        }
        if let Some(retries) = parse_var("FACILITATOR_RETRIES")? {
            self.facilitator.retries = retries;
        }
        if let Some(secs) = parse_var("HTTP_TIMEOUT_SECS")? {
            self.http.timeout_secs = secs;
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidVar { var, value: v }),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        for var in [
            "MODE",
            "PORT",
            "DISABLE_RPC_SHIM",
            "X402_MCP_CONFIG",
            "FACILITATOR_URL",
            "FACILITATOR_API_KEY",
            "FACILITATOR_RETRIES",
            "HTTP_TIMEOUT_SECS",
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn defaults_to_stdio_8080_and_shim_enabled() {
        clear_env();
        let cfg = Config::from_env();
        assert_eq!(cfg.mode, "stdio");
        assert_eq!(cfg.port, 8080);
        assert!(!cfg.disable_rpc_shim);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    #[serial]
    fn parses_env_overrides() {
        clear_env();
        std::env::set_var("MODE", "server");
        std::env::set_var("PORT", "9090");
        std::env::set_var("DISABLE_RPC_SHIM", "1");
        let cfg = Config::from_env();
        assert_eq!(cfg.mode, "server");
        assert_eq!(cfg.port, 9090);
        assert!(cfg.disable_rpc_shim);
        clear_env();
    }

    #[test]
    #[serial]
    fn rejects_unknown_mode_and_zero_port() {
        clear_env();
        std::env::set_var("MODE", "invalid");
        assert!(Config::from_env().validate().unwrap_err().to_string().contains("MODE"));
        std::env::set_var("MODE", "server");
        std::env::set_var("PORT", "0");
        assert!(Config::from_env().validate().unwrap_err().to_string().contains("PORT"));
        clear_env();
    }

    #[test]
    #[serial]
    fn app_config_defaults() {
        clear_env();
        let cfg = AppConfig::load().unwrap();
        assert_eq!(cfg.facilitator.url, DEFAULT_FACILITATOR_URL);
        assert_eq!(cfg.facilitator.retries, 2);
        assert_eq!(cfg.http.timeout(), Duration::from_secs(30));
    }

    #[test]
    #[serial]
    fn app_config_reads_toml_then_env() {
        clear_env();
        let dir = std::env::temp_dir().join(format!("x402-mcp-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "[facilitator]\nurl = \"http://file.example\"\nretries = 5\n\n[http]\ntimeout_secs = 9").unwrap();

        std::env::set_var("X402_MCP_CONFIG", &path);
        let cfg = AppConfig::load().unwrap();
        assert_eq!(cfg.facilitator.url, "http://file.example");
        assert_eq!(cfg.facilitator.retries, 5);
        assert_eq!(cfg.http.timeout_secs, 9);
        assert_eq!(cfg.http.connect_timeout_secs, 5);

        std::env::set_var("FACILITATOR_URL", "http://env.example");
        std::env::set_var("HTTP_TIMEOUT_SECS", "12");
        let cfg = AppConfig::load().unwrap();
        assert_eq!(cfg.facilitator.url, "http://env.example");
        assert_eq!(cfg.http.timeout_secs, 12);

        clear_env();
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    #[serial]
    fn bad_numbers_are_errors() {
        clear_env();
        std::env::set_var("FACILITATOR_URL", "http://private.example");
        std::env::set_var("HTTP_TIMEOUT_SECS", "soon");
        let err = AppConfig::load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { var: "HTTP_TIMEOUT_SECS", .. }));
        assert!(err.to_string().contains("soon"));
        clear_env();
    }

    #[test]
    #[serial]
    fn missing_file_is_a_read_error() {
        clear_env();
        std::env::set_var("X402_MCP_CONFIG", "/definitely/not/here.toml");
        assert!(matches!(AppConfig::load(), Err(ConfigError::Read { .. })));
        clear_env();
    }
}
