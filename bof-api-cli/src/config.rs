//! Configuration loading and parsing

use anyhow::{Context, Result};
use bof_api::{ApiConfig, Architecture, CustomApiDefinition};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main application configuration (loaded from a TOML file)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub custom_api: Option<CustomApiDefinition>,
    #[serde(default)]
    pub check: CheckConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TargetConfig {
    #[serde(default)]
    pub machine: Architecture,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CheckConfig {
    /// Imports checked in addition to those given on the command line
    #[serde(default)]
    pub symbols: Vec<String>,
}

impl AppConfig {
    /// Library configuration for symbol lookups.
    ///
    /// `machine` overrides the configured target, `use_custom_api` selects the
    /// custom API (the MyApi definition when none is configured).
    pub fn api_config(&self, machine: Option<Architecture>, use_custom_api: bool) -> ApiConfig {
        let config = ApiConfig::new().with_architecture(machine.unwrap_or(self.target.machine));

        if use_custom_api {
            config.with_custom_api(self.custom_api.clone().unwrap_or_default())
        } else {
            config
        }
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    if let Some(custom_api) = &config.custom_api {
        custom_api
            .validate()
            .with_context(|| format!("Invalid custom API in config file: {:?}", path))?;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [target]
            machine = "i386"

            [custom_api]
            name = "MyApi"
            library = "myapi.dll"
            symbols = ["MyApiVersion", "MyApiPrintf"]

            [check]
            symbols = ["__imp__MyApiPrintf"]
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.target.machine, Architecture::I386);
        assert_eq!(config.custom_api.as_ref().unwrap().symbols.len(), 2);
        assert_eq!(config.check.symbols, vec!["__imp__MyApiPrintf".to_string()]);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.target.machine, Architecture::Amd64);
        assert!(config.custom_api.is_none());
        assert!(config.check.symbols.is_empty());
    }

    #[test]
    fn test_api_config_selection() {
        let config = AppConfig::default();

        let beacon = config.api_config(None, false);
        assert_eq!(beacon.api_name(), "Beacon API");

        let custom = config.api_config(Some(Architecture::I386), true);
        assert_eq!(custom.api_name(), "MyApi");
        assert_eq!(custom.architecture, Architecture::I386);
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[check]\nsymbols = [\"__imp_BeaconOutput\"]").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.check.symbols.len(), 1);
    }

    #[test]
    fn test_load_config_rejects_invalid_custom_api() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[custom_api]\nname = \"Empty\"\nsymbols = []").unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("exports no symbols"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Path::new("/nonexistent/bof-api.toml")).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read config file"));
    }
}
