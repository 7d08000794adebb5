//! MyApi bound from a shared library at runtime
//!
//! The custom API is normally resolved by the loader when the object is placed
//! in memory. For inspecting a provider library outside of that host, the same
//! symbols can be looked up with `libloading`.

use std::os::raw::{c_char, c_int, c_void};
use std::path::{Path, PathBuf};

use libloading::Library;
use serde::Serialize;

use super::{to_c_message, MyApi, PASSTHROUGH_FORMAT};
use crate::symbols::CustomApiDefinition;
use crate::types::{ApiError, Result};

type VersionFn = unsafe extern "C" fn() -> c_int;
type PrintfFn = unsafe extern "C" fn(*const c_char, ...);
type AllocFn = unsafe extern "C" fn(usize) -> *mut c_void;
type FreeFn = unsafe extern "C" fn(*mut c_void);

/// Presence of one definition symbol in a loaded library
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolExport {
    pub symbol: String,
    pub exported: bool,
}

/// A custom API provider library opened with `libloading`
pub struct ApiLibrary {
    path: PathBuf,
    library: Library,
}

impl ApiLibrary {
    /// Open the shared library at `path`.
    ///
    /// Loading a library runs its initialization routines; only open
    /// libraries that are trusted.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading API library: {:?}", path);

        let library = unsafe { Library::new(path) }?;

        Ok(Self {
            path: path.to_path_buf(),
            library,
        })
    }

    /// Path the library was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check which symbols of `definition` the library exports.
    pub fn exports(&self, definition: &CustomApiDefinition) -> Vec<SymbolExport> {
        definition
            .symbols
            .iter()
            .map(|symbol| {
                let exported = self.lookup::<*const c_void>(symbol).is_ok();
                log::debug!("{} {}", symbol, if exported { "exported" } else { "missing" });
                SymbolExport {
                    symbol: symbol.clone(),
                    exported,
                }
            })
            .collect()
    }

    /// Resolve the MyApi functions and bind them to this library.
    pub fn bind(self) -> Result<LoadedApi> {
        let version = self.lookup::<VersionFn>("MyApiVersion")?;
        let printf = self.lookup::<PrintfFn>("MyApiPrintf")?;
        let alloc = self.lookup::<AllocFn>("MyApiAlloc")?;
        let free = self.lookup::<FreeFn>("MyApiFree")?;

        log::debug!("Bound MyApi from {:?}", self.path);

        Ok(LoadedApi {
            version,
            printf,
            alloc,
            free,
            library: self,
        })
    }

    /// Look up `symbol` and copy the value out of the library symbol.
    fn lookup<T: Copy>(&self, symbol: &str) -> Result<T> {
        // SAFETY: callers request the type declared in `myapi.h`, and the
        // copied value is only used while `self.library` is alive.
        let value = unsafe { self.library.get::<T>(symbol.as_bytes()) };

        value.map(|sym| *sym).map_err(|source| ApiError::MissingSymbol {
            symbol: symbol.to_string(),
            source,
        })
    }
}

impl std::fmt::Debug for ApiLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiLibrary").field("path", &self.path).finish()
    }
}

/// MyApi implementation backed by a loaded provider library
pub struct LoadedApi {
    version: VersionFn,
    printf: PrintfFn,
    alloc: AllocFn,
    free: FreeFn,
    // Keeps the function pointers above valid.
    library: ApiLibrary,
}

impl LoadedApi {
    /// Open the library at `path` and bind the MyApi functions from it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        ApiLibrary::open(path)?.bind()
    }

    /// Path the library was loaded from
    pub fn path(&self) -> &Path {
        self.library.path()
    }
}

impl std::fmt::Debug for LoadedApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedApi")
            .field("library", &self.library)
            .finish_non_exhaustive()
    }
}

impl MyApi for LoadedApi {
    fn version(&self) -> c_int {
        unsafe { (self.version)() }
    }

    fn printf(&self, message: &str) {
        let message = to_c_message(message);
        unsafe { (self.printf)(PASSTHROUGH_FORMAT.as_ptr().cast::<c_char>(), message.as_ptr()) }
    }

    fn alloc(&self, size: usize) -> *mut c_void {
        unsafe { (self.alloc)(size) }
    }

    fn free(&self, ptr: *mut c_void) {
        unsafe { (self.free)(ptr) }
    }
}
