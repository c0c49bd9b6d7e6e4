use std::env;
use std::path::PathBuf;
use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub data_file: PathBuf,
    pub service_port: u16,
    pub service_host: String,
    pub verify_token: String,
    pub default_phone: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source
    ///
    /// `from_env` passes the process environment; tests pass a map so they
    /// never touch global state.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_file = lookup("FINAPP_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("finapp-data.json"));

        let service_port = lookup("SERVICE_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = lookup("SERVICE_HOST")
            .unwrap_or_else(|| "0.0.0.0".to_string());

        let verify_token = lookup("WHATSAPP_VERIFY_TOKEN")
            .unwrap_or_else(|| "finapp_webhook_token".to_string());

        let default_phone = lookup("FINAPP_DEFAULT_PHONE")
            .unwrap_or_else(|| "5511999999999".to_string());

        if default_phone.trim().is_empty() {
            anyhow::bail!("FINAPP_DEFAULT_PHONE must not be empty");
        }

        Ok(Config {
            data_file,
            service_port,
            service_host,
            verify_token,
            default_phone,
        })
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Data file: {}", self.data_file.display());
        tracing::info!("  Default dashboard phone: {}", self.default_phone);
        tracing::info!(
            "  Webhook verify token: {}",
            if self.verify_token == "finapp_webhook_token" { "default" } else { "custom" }
        );
        tracing::info!("  Service listening on: {}:{}", self.service_host, self.service_port);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_config_with_all_vars() {
        let config = config_from(&[
            ("FINAPP_DATA_FILE", "/var/lib/finapp/data.json"),
            ("SERVICE_PORT", "8080"),
            ("SERVICE_HOST", "127.0.0.1"),
            ("WHATSAPP_VERIFY_TOKEN", "secret"),
            ("FINAPP_DEFAULT_PHONE", "5521988887777"),
        ])
        .unwrap();

        assert_eq!(config.data_file, PathBuf::from("/var/lib/finapp/data.json"));
        assert_eq!(config.service_port, 8080);
        assert_eq!(config.service_host, "127.0.0.1");
        assert_eq!(config.verify_token, "secret");
        assert_eq!(config.default_phone, "5521988887777");
    }

    #[test]
    fn test_config_with_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.data_file, PathBuf::from("finapp-data.json"));
        assert_eq!(config.service_port, 3000);
        assert_eq!(config.service_host, "0.0.0.0");
        assert_eq!(config.verify_token, "finapp_webhook_token");
        assert_eq!(config.default_phone, "5511999999999");
    }

    #[test]
    fn test_invalid_port() {
        let result = config_from(&[("SERVICE_PORT", "not-a-number")]);
        assert!(result.is_err());
        let error = result.unwrap_err();
        assert!(error.to_string().contains("SERVICE_PORT"));
    }

    #[test]
    fn test_port_out_of_range() {
        let result = config_from(&[("SERVICE_PORT", "99999")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_default_phone_rejected() {
        let result = config_from(&[("FINAPP_DEFAULT_PHONE", "  ")]);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("FINAPP_DEFAULT_PHONE"));
    }
}
