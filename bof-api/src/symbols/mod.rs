//! API symbol catalog
//!
//! An object file calls its API through `dllimport` declarations, so the
//! symbols it leaves undefined look like `__imp_BeaconPrintf`. This module maps
//! those names back to the API function that provides them, either the Beacon
//! API or a custom API described by a [`CustomApiDefinition`].

use serde::Serialize;
use std::collections::HashSet;

use crate::types::Architecture;

pub mod beacon;
pub mod custom;

pub use beacon::{BeaconApiSymbols, BEACON_API_NAME, BEACON_API_SYMBOLS};
pub use custom::{CustomApiDefinition, CustomApiSymbols, DefinitionError, MYAPI_SYMBOLS};

/// Errors that can occur while looking up an API symbol
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiSymbolError {
    #[error("member for symbol does not exist")]
    NotFound,

    #[error("import symbol has no name after the import prefix")]
    EmptySymbol,
}

/// Kind of import provided by an API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportType {
    /// A function
    Code,
}

/// An API function matched to an imported symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportMember<'a> {
    /// Architecture the symbol was looked up for
    pub architecture: Architecture,
    /// Symbol name without the import prefix
    pub symbol: &'a str,
    /// Name of the API providing the symbol
    pub dll: &'a str,
    /// Import type
    pub typ: ImportType,
}

/// A source of API symbols that imported names can be resolved against
pub trait ApiSymbolSource {
    /// Display name of the API
    fn api_name(&self) -> &str;

    /// Architecture imports are resolved for
    fn architecture(&self) -> Architecture;

    /// All function names the API provides
    fn symbols(&self) -> Box<dyn Iterator<Item = &str> + '_>;

    /// Resolve an imported symbol to the API function providing it.
    ///
    /// Accepts both the `dllimport` form (`__imp_Name`) and the bare name.
    fn extract_api_symbol(&self, symbol: &str) -> Result<ImportMember<'_>, ApiSymbolError> {
        let architecture = self.architecture();
        let unprefixed = match symbol.strip_prefix(architecture.import_prefix()) {
            Some("") => return Err(ApiSymbolError::EmptySymbol),
            Some(name) => name,
            None => symbol,
        };

        self.symbols()
            .find(|contained| *contained == unprefixed)
            .map(|contained| ImportMember {
                architecture,
                symbol: contained,
                dll: self.api_name(),
                typ: ImportType::Code,
            })
            .ok_or(ApiSymbolError::NotFound)
    }
}

/// One imported symbol and the API function it resolved to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedImport {
    /// Name as it appeared in the object file
    pub import: String,
    /// API function name
    pub symbol: String,
    /// API providing the function
    pub api: String,
}

/// An imported symbol that no API function matched
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedImport {
    pub import: String,
    pub reason: String,
}

/// Outcome of resolving a set of imported symbols
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub resolved: Vec<ResolvedImport>,
    pub unresolved: Vec<UnresolvedImport>,
}

impl ImportReport {
    /// True when every import resolved
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Total number of distinct imports checked
    pub fn len(&self) -> usize {
        self.resolved.len() + self.unresolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolve `imports` against `source`, keeping their order.
///
/// Repeated names are only reported the first time they appear.
pub fn resolve_imports<'s, S, I>(source: &S, imports: I) -> ImportReport
where
    S: ApiSymbolSource + ?Sized,
    I: IntoIterator<Item = &'s str>,
{
    let mut seen = HashSet::new();
    let mut report = ImportReport::default();

    for import in imports {
        if !seen.insert(import) {
            continue;
        }

        match source.extract_api_symbol(import) {
            Ok(member) => {
                log::trace!("{} -> {}!{}", import, member.dll, member.symbol);
                report.resolved.push(ResolvedImport {
                    import: import.to_string(),
                    symbol: member.symbol.to_string(),
                    api: member.dll.to_string(),
                });
            }
            Err(e) => {
                log::debug!("{} unresolved: {}", import, e);
                report.unresolved.push(UnresolvedImport {
                    import: import.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    report
}
