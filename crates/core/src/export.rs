//! Export writer: renders the championship document and replaces the
//! destination file in one step.

use crate::error::ConvertResult;
use crate::model::Championship;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Name of the constant exported by the JavaScript module.
pub const JS_EXPORT_NAME: &str = "championshipData";

/// Destination format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// `export const championshipData = { ... };`
    #[default]
    JsModule,
    /// Plain JSON object
    Json,
}

impl ExportFormat {
    /// `.json` destinations get JSON, everything else the JavaScript module
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ExportFormat::Json,
            _ => ExportFormat::JsModule,
        }
    }
}

/// Render the document. Output is deterministic for a given input.
pub fn render(championship: &Championship, format: ExportFormat) -> ConvertResult<String> {
    match format {
        ExportFormat::Json => {
            let mut out = serde_json::to_string_pretty(championship)?;
            out.push('\n');
            Ok(out)
        }
        ExportFormat::JsModule => render_js_module(championship),
    }
}

fn render_js_module(championship: &Championship) -> ConvertResult<String> {
    let mut out = String::from("// Championship data extracted from Excel\n");
    out.push_str(&format!("export const {JS_EXPORT_NAME} = {{\n"));
    out.push_str(&format!(
        "  season: {},\n",
        serde_json::to_string(&championship.season)?
    ));
    out.push_str(&format!("  currentRound: {},\n", championship.current_round));
    out.push_str(&format!("  totalRounds: {},\n", championship.total_rounds));
    out.push('\n');
    out.push_str(&format!("  drivers: {},\n", nested_json(&championship.drivers)?));
    out.push('\n');
    out.push_str(&format!("  races: {}\n", nested_json(&championship.races)?));
    out.push_str("};\n");
    Ok(out)
}

/// Pretty JSON indented one level, for embedding in the module body
fn nested_json<T: Serialize>(value: &T) -> ConvertResult<String> {
    Ok(serde_json::to_string_pretty(value)?.replace('\n', "\n  "))
}

/// Replace `path` with `contents`, all or nothing.
///
/// The data goes to a temporary file in the destination directory, which is
/// then renamed over the destination. Missing parent directories are created.
pub fn write_atomic(path: &Path, contents: &str) -> ConvertResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;

    tracing::debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

/// Render and write the document
pub fn export(championship: &Championship, path: &Path, format: ExportFormat) -> ConvertResult<()> {
    let contents = render(championship, format)?;
    write_atomic(path, &contents)
}
