//! Report generation for import checks (text and JSON)

use anyhow::Result;
use bof_api::{Architecture, ImportReport};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

/// A check result together with what it was checked against
#[derive(Debug, Serialize)]
pub struct CheckReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub api: &'a str,
    pub machine: Architecture,
    #[serde(flatten)]
    pub imports: &'a ImportReport,
}

impl<'a> CheckReport<'a> {
    pub fn new(api: &'a str, machine: Architecture, imports: &'a ImportReport) -> Self {
        Self {
            generated_at: Utc::now(),
            api,
            machine,
            imports,
        }
    }

    /// Write a human readable report
    pub fn write_text<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "API:     {}", self.api)?;
        writeln!(out, "Machine: {}", self.machine)?;
        writeln!(out)?;

        for resolved in &self.imports.resolved {
            writeln!(out, "  ok       {} -> {}!{}", resolved.import, resolved.api, resolved.symbol)?;
        }
        for unresolved in &self.imports.unresolved {
            writeln!(out, "  missing  {} ({})", unresolved.import, unresolved.reason)?;
        }

        writeln!(out)?;
        writeln!(
            out,
            "{} resolved, {} unresolved",
            self.imports.resolved.len(),
            self.imports.unresolved.len()
        )?;
        Ok(())
    }

    /// Write the report as pretty printed JSON
    pub fn write_json<W: Write>(&self, out: &mut W) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        writeln!(out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bof_api::{resolve_imports, BeaconApiSymbols};

    fn sample() -> ImportReport {
        let source = BeaconApiSymbols::new(Architecture::Amd64);
        resolve_imports(&source, ["__imp_BeaconPrintf", "__imp_LoadLibraryA"])
    }

    #[test]
    fn test_text_report() {
        let imports = sample();
        let report = CheckReport::new("Beacon API", Architecture::Amd64, &imports);

        let mut out = Vec::new();
        report.write_text(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("ok       __imp_BeaconPrintf -> Beacon API!BeaconPrintf"));
        assert!(text.contains("missing  __imp_LoadLibraryA"));
        assert!(text.ends_with("1 resolved, 1 unresolved\n"));
    }

    #[test]
    fn test_json_report() {
        let imports = sample();
        let report = CheckReport::new("Beacon API", Architecture::I386, &imports);

        let mut out = Vec::new();
        report.write_json(&mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(json["api"], "Beacon API");
        assert_eq!(json["machine"], "i386");
        assert_eq!(json["resolved"][0]["symbol"], "BeaconPrintf");
        assert_eq!(json["unresolved"][0]["import"], "__imp_LoadLibraryA");
        assert!(json["generated_at"].is_string());
    }
}
