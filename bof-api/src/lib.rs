//! BOF API Library
//!
//! Rust bindings and example programs for code that runs against an externally
//! supplied API: the Beacon output callback with the host's process and user
//! queries, or a custom API such as MyApi.
//!
//! # Architecture
//!
//! The library only describes the boundary to the external API:
//! - Collaborator traits for each API surface ([`BeaconApi`], [`SystemInfo`], [`MyApi`])
//! - Link-time FFI bindings (`ffi` feature) and a `libloading` binding for custom APIs
//! - The two example programs, written against the traits
//! - A catalog of API symbols for checking an object's imports
//!
//! The library does NOT:
//! - Implement the output callback, process/user queries or the allocator
//! - Load or execute object files
//!
//! # Example Usage
//!
//! ```
//! use bof_api::{resolve_imports, ApiConfig, Architecture, CustomApiDefinition};
//!
//! let config = ApiConfig::new()
//!     .with_architecture(Architecture::Amd64)
//!     .with_custom_api(CustomApiDefinition::default());
//!
//! let source = config.symbol_source();
//! let report = resolve_imports(source.as_ref(), ["__imp_MyApiPrintf", "__imp_MyApiAlloc"]);
//! assert!(report.is_complete());
//! ```

// Public modules
pub mod api;
pub mod config;
pub mod programs;
pub mod symbols;
pub mod types;

// Re-export main types for convenience
pub use api::loaded::{ApiLibrary, LoadedApi, SymbolExport};
pub use api::{Allocation, BeaconApi, MyApi, SystemInfo};
pub use config::ApiConfig;
pub use symbols::{
    resolve_imports, ApiSymbolError, ApiSymbolSource, BeaconApiSymbols, CustomApiDefinition,
    CustomApiSymbols, DefinitionError, ImportMember, ImportReport,
};
pub use types::{ApiError, Architecture, CallbackType, Result, UNLEN};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
