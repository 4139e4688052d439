//! Export collaborator (spreadsheet download in the host UI).

use anyhow::Context;
use serde::Serialize;
use serde_json::Value;

/// Receives the rows currently shown (filtered, current page only).
pub trait Exporter: Send + Sync {
    fn export(&self, rows: &[Value], title: &str) -> anyhow::Result<()>;
}

/// Serialize `rows` to JSON objects and hand them to `exporter`.
///
/// Returns the number of exported rows.
pub fn export_rows<T: Serialize>(
    exporter: &dyn Exporter,
    rows: &[&T],
    title: &str,
) -> anyhow::Result<usize> {
    let values = rows
        .iter()
        .map(|row| serde_json::to_value(row))
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("failed to serialize rows for export {title:?}"))?;

    exporter
        .export(&values, title)
        .with_context(|| format!("export {title:?} failed"))?;
    tracing::info!(title, rows = values.len(), "rows exported");
    Ok(values.len())
}
