//! Writing map exports to disk.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use rmg_core::export::MapExport;

use crate::error::Result;

/// Encoding used for a written export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON, for inspection.
    #[default]
    Json,
    /// Compact bincode, as loaded by the simulation.
    Bincode,
}

impl OutputFormat {
    /// Conventional file extension.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Bincode => "bin",
        }
    }
}

/// Encode `export` into `writer`.
pub fn write_export<W: Write>(
    export: &MapExport,
    format: OutputFormat,
    mut writer: W,
) -> Result<()> {
    match format {
        OutputFormat::Json => serde_json::to_writer_pretty(&mut writer, export)?,
        OutputFormat::Bincode => writer.write_all(&export.to_bytes()?)?,
    }
    writer.flush()?;
    Ok(())
}

/// Encode `export` into a new file at `path`.
pub fn write_export_file(export: &MapExport, format: OutputFormat, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_export(export, format, BufWriter::new(file))?;
    tracing::info!(path = %path.display(), ?format, "Wrote map export");
    Ok(())
}
