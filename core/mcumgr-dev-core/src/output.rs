//! Clean report writers

use std::io::Write;

use anyhow::Result;

use crate::clean::CleanReport;
use crate::discovery::ArtifactKind;

/// Write the report as a prettified JSON object.
pub fn write_json_pretty(report: &CleanReport, mut w: impl Write) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    w.write_all(json.as_bytes())?;
    w.write_all(b"\n")?;
    Ok(())
}

/// Write one JSON object per removed artifact (NDJSON).
pub fn write_ndjson(report: &CleanReport, mut w: impl Write) -> Result<()> {
    for item in &report.removed {
        let line = serde_json::to_string(item)?;
        w.write_all(line.as_bytes())?;
        w.write_all(b"\n")?;
    }
    Ok(())
}

/// One path per line; directories get a trailing slash.
pub fn write_plain(report: &CleanReport, mut w: impl Write) -> Result<()> {
    let verb = if report.dry_run { "would remove" } else { "removed" };
    for item in &report.removed {
        let rel = item
            .path
            .strip_prefix(&report.root)
            .unwrap_or(&item.path)
            .display();
        match item.kind {
            ArtifactKind::Dir => writeln!(w, "{verb} {rel}/")?,
            ArtifactKind::File => writeln!(w, "{verb} {rel}")?,
        }
    }
    Ok(())
}
