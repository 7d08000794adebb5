//! Custom API definitions
//!
//! A BOF can be built against an API other than Beacon. The definition lists
//! the functions that API exports so imports can be checked against it.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

use super::ApiSymbolSource;
use crate::types::Architecture;

/// Functions declared by `myapi.h`
pub const MYAPI_SYMBOLS: [&str; 4] = ["MyApiVersion", "MyApiPrintf", "MyApiAlloc", "MyApiFree"];

/// Problems with a custom API definition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    #[error("custom API name is empty")]
    EmptyName,

    #[error("custom API '{0}' exports no symbols")]
    NoSymbols(String),

    #[error("custom API '{api}' lists symbol '{symbol}' more than once")]
    DuplicateSymbol { api: String, symbol: String },

    #[error("custom API '{0}' lists an empty symbol name")]
    EmptySymbol(String),
}

/// Description of a custom API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomApiDefinition {
    /// Name imports are reported under
    #[serde(default = "default_name")]
    pub name: String,

    /// Shared library providing the API (only needed for probing)
    #[serde(default)]
    pub library: Option<PathBuf>,

    /// Exported function names
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,
}

fn default_name() -> String {
    "MyApi".to_string()
}

fn default_symbols() -> Vec<String> {
    MYAPI_SYMBOLS.iter().map(|s| s.to_string()).collect()
}

impl Default for CustomApiDefinition {
    fn default() -> Self {
        Self {
            name: default_name(),
            library: None,
            symbols: default_symbols(),
        }
    }
}

impl CustomApiDefinition {
    /// Create a definition with the given name and symbols
    pub fn new<S: Into<String>>(name: impl Into<String>, symbols: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            library: None,
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }

    /// Builder method: set the provider library path
    pub fn with_library(mut self, library: impl Into<PathBuf>) -> Self {
        self.library = Some(library.into());
        self
    }

    /// Check the definition is usable for symbol lookup
    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.name.trim().is_empty() {
            return Err(DefinitionError::EmptyName);
        }

        if self.symbols.is_empty() {
            return Err(DefinitionError::NoSymbols(self.name.clone()));
        }

        let mut seen = HashSet::new();
        for symbol in &self.symbols {
            if symbol.is_empty() {
                return Err(DefinitionError::EmptySymbol(self.name.clone()));
            }
            if !seen.insert(symbol.as_str()) {
                return Err(DefinitionError::DuplicateSymbol {
                    api: self.name.clone(),
                    symbol: symbol.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Container for looking up symbols of a custom API
#[derive(Debug, Clone)]
pub struct CustomApiSymbols {
    architecture: Architecture,
    definition: CustomApiDefinition,
}

impl CustomApiSymbols {
    /// Returns the custom API symbols for the specified architecture.
    pub fn new(architecture: Architecture, definition: CustomApiDefinition) -> Self {
        Self {
            architecture,
            definition,
        }
    }

    /// The definition symbols are looked up in
    pub fn definition(&self) -> &CustomApiDefinition {
        &self.definition
    }
}

impl ApiSymbolSource for CustomApiSymbols {
    fn api_name(&self) -> &str {
        &self.definition.name
    }

    fn architecture(&self) -> Architecture {
        self.architecture
    }

    fn symbols(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.definition.symbols.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::ApiSymbolError;

    #[test]
    fn test_default_definition_is_myapi() {
        let definition = CustomApiDefinition::default();
        assert_eq!(definition.name, "MyApi");
        assert_eq!(definition.symbols, MYAPI_SYMBOLS);
        assert!(definition.validate().is_ok());
    }

    #[test]
    fn test_custom_api_lookup() {
        let symbols = CustomApiSymbols::new(Architecture::Amd64, CustomApiDefinition::default());

        let member = symbols.extract_api_symbol("__imp_MyApiAlloc").unwrap();
        assert_eq!(member.symbol, "MyApiAlloc");
        assert_eq!(member.dll, "MyApi");

        // The Beacon API is replaced, not extended.
        assert_eq!(
            symbols.extract_api_symbol("__imp_BeaconPrintf"),
            Err(ApiSymbolError::NotFound)
        );
    }

    #[test]
    fn test_validation_errors() {
        let unnamed = CustomApiDefinition::new(" ", ["Func"]);
        assert_eq!(unnamed.validate(), Err(DefinitionError::EmptyName));

        let empty = CustomApiDefinition::new("Api", Vec::<String>::new());
        assert_eq!(empty.validate(), Err(DefinitionError::NoSymbols("Api".into())));

        let blank = CustomApiDefinition::new("Api", ["Func", ""]);
        assert_eq!(blank.validate(), Err(DefinitionError::EmptySymbol("Api".into())));

        let duplicate = CustomApiDefinition::new("Api", ["Func", "Func"]);
        assert_eq!(
            duplicate.validate(),
            Err(DefinitionError::DuplicateSymbol {
                api: "Api".into(),
                symbol: "Func".into(),
            })
        );
    }

    #[test]
    fn test_definition_deserialization_defaults() {
        let definition: CustomApiDefinition =
            serde_json::from_str(r#"{ "library": "myapi.dll" }"#).unwrap();
        assert_eq!(definition.name, "MyApi");
        assert_eq!(definition.library, Some(PathBuf::from("myapi.dll")));
        assert_eq!(definition.symbols.len(), 4);
    }
}
