//! Library configuration
//!
//! Selects the target architecture and the API imports are checked against.
//! Loading this from files is left to the application layer.

use serde::{Deserialize, Serialize};

use crate::symbols::{ApiSymbolSource, BeaconApiSymbols, CustomApiDefinition, CustomApiSymbols};
use crate::types::Architecture;

/// Configuration for symbol lookups
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Architecture of the objects being checked
    #[serde(default)]
    pub architecture: Architecture,

    /// Custom API used instead of the Beacon API
    #[serde(default)]
    pub custom_api: Option<CustomApiDefinition>,
}

impl ApiConfig {
    /// Create a configuration targeting amd64 and the Beacon API
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the target architecture
    pub fn with_architecture(mut self, architecture: Architecture) -> Self {
        self.architecture = architecture;
        self
    }

    /// Builder method: use a custom API instead of the Beacon API
    pub fn with_custom_api(mut self, definition: CustomApiDefinition) -> Self {
        self.custom_api = Some(definition);
        self
    }

    /// Name of the API imports will be resolved against
    pub fn api_name(&self) -> &str {
        match &self.custom_api {
            Some(definition) => &definition.name,
            None => crate::symbols::BEACON_API_NAME,
        }
    }

    /// Build the symbol source for this configuration
    pub fn symbol_source(&self) -> Box<dyn ApiSymbolSource> {
        match &self.custom_api {
            Some(definition) => Box::new(CustomApiSymbols::new(
                self.architecture,
                definition.clone(),
            )),
            None => Box::new(BeaconApiSymbols::new(self.architecture)),
        }
    }
}
