use std::env;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PORT value: {0}")]
    InvalidPort(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_host: String,
    pub port: u16,
    /// Compiled frontend (`trunk build` output).
    pub frontend_dir: PathBuf,
    /// Exported classifier, served under `/my_model`.
    pub model_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_dir = lookup("CARGO_MANIFEST_DIR")
            .map(|manifest_dir| PathBuf::from(manifest_dir).join(".."))
            .unwrap_or_else(|| PathBuf::from("/usr/src/app"));

        let port = match lookup("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => 8081,
        };

        Ok(Self {
            bind_host: lookup("BIND_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            frontend_dir: lookup("FRONTEND_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| base_dir.join("frontend/dist")),
            model_dir: lookup("MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| base_dir.join("my_model")),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:8081");
        assert_eq!(config.frontend_dir, PathBuf::from("/usr/src/app/frontend/dist"));
        assert_eq!(config.model_dir, PathBuf::from("/usr/src/app/my_model"));
    }

    #[test]
    fn explicit_values_win() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "9000"),
            ("BIND_HOST", "127.0.0.1"),
            ("FRONTEND_DIR", "/srv/web"),
            ("MODEL_DIR", "/srv/model"),
        ]))
        .unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.frontend_dir, PathBuf::from("/srv/web"));
        assert_eq!(config.model_dir, PathBuf::from("/srv/model"));
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = Config::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(value) if value == "eighty"));
    }
}
