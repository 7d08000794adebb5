//! Beacon API symbols

use super::ApiSymbolSource;
use crate::types::Architecture;

/// Name the Beacon API is reported under
pub const BEACON_API_NAME: &str = "Beacon API";

/// The Beacon API symbol string values.
///
/// Symbols are sorted based on commonality.
pub const BEACON_API_SYMBOLS: [&str; 52] = [
    "BeaconPrintf",
    "BeaconDataParse",
    "BeaconOutput",
    "BeaconDataExtract",
    "BeaconDataInt",
    "BeaconGetSpawnTo",
    "BeaconCleanupProcess",
    "BeaconSpawnTemporaryProcess",
    "BeaconDataShort",
    "toWideChar",
    "BeaconUseToken",
    "BeaconGetValue",
    "BeaconRemoveValue",
    "BeaconInjectProcess",
    "BeaconDataLength",
    "BeaconAddValue",
    "BeaconRevertToken",
    "BeaconOpenThread",
    "BeaconUnmapViewOfFile",
    "BeaconFormatInt",
    "BeaconGetSyscallInformation",
    "BeaconDataStoreProtectItem",
    "BeaconFormatFree",
    "BeaconDataStoreUnprotectItem",
    "BeaconInformation",
    "BeaconDataStoreMaxEntries",
    "BeaconDuplicateHandle",
    "BeaconOpenProcess",
    "BeaconDataStoreGetItem",
    "BeaconEnableBeaconGate",
    "BeaconVirtualQuery",
    "BeaconWriteProcessMemory",
    "BeaconSetThreadContext",
    "BeaconVirtualProtect",
    "BeaconFormatAppend",
    "BeaconDisableBeaconGate",
    "BeaconResumeThread",
    "BeaconDataPtr",
    "BeaconGetThreadContext",
    "BeaconIsAdmin",
    "BeaconVirtualAlloc",
    "BeaconCloseHandle",
    "BeaconReadProcessMemory",
    "BeaconFormatReset",
    "BeaconVirtualAllocEx",
    "BeaconFormatPrintf",
    "BeaconFormatToString",
    "BeaconInjectTemporaryProcess",
    "BeaconVirtualFree",
    "BeaconGetCustomUserData",
    "BeaconVirtualProtectEx",
    "BeaconFormatAlloc",
];

/// Container for looking up Beacon API symbols.
#[derive(Debug, Clone)]
pub struct BeaconApiSymbols {
    architecture: Architecture,
    symbols: [&'static str; 52],
}

impl BeaconApiSymbols {
    /// Returns the Beacon API symbols for the specified architecture.
    pub fn new(architecture: Architecture) -> Self {
        Self {
            architecture,
            symbols: BEACON_API_SYMBOLS,
        }
    }
}

impl ApiSymbolSource for BeaconApiSymbols {
    fn api_name(&self) -> &str {
        BEACON_API_NAME
    }

    fn architecture(&self) -> Architecture {
        self.architecture
    }

    fn symbols(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.symbols.iter().copied())
    }
}
