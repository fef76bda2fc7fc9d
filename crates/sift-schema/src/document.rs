//! Human-diffable schema document.
//!
//! The document is JSON laid out for line-based diffs: table-level keys are
//! indented one per line, while each column and index is a single compact
//! line.

use crate::{Database, DocumentError, Table};
use serde::Serialize;

impl Database {
    /// Render the schema document.
    pub fn to_document(&self) -> Result<String, DocumentError> {
        let mut out = String::from("{\n  \"tables\": [");
        for (i, table) in self.tables.iter().enumerate() {
            out.push_str(if i == 0 { "\n" } else { ",\n" });
            write_table(&mut out, table)?;
        }
        if !self.tables.is_empty() {
            out.push_str("\n  ");
        }
        out.push_str("]\n}\n");
        Ok(out)
    }

    /// Parse a schema document produced by [`Database::to_document`].
    pub fn from_document(s: &str) -> Result<Database, DocumentError> {
        Ok(serde_json::from_str(s)?)
    }
}

fn write_table(out: &mut String, t: &Table) -> Result<(), DocumentError> {
    let mut fields = vec![format!("\"table\": {}", serde_json::to_string(&t.name)?)];
    if !t.columns.is_empty() {
        fields.push(format!("\"columns\": {}", record_list(&t.columns)?));
    }
    if !t.indices.is_empty() {
        fields.push(format!("\"indices\": {}", record_list(&t.indices)?));
    }
    if !t.pk.is_empty() {
        fields.push(format!("\"pk\": {}", serde_json::to_string(&t.pk)?));
    }
    if t.without_rowid {
        fields.push("\"without_rowid\": true".to_string());
    }
    if t.strict {
        fields.push("\"strict\": true".to_string());
    }

    out.push_str("    {\n");
    let body: Vec<String> = fields.iter().map(|f| format!("      {f}")).collect();
    out.push_str(&body.join(",\n"));
    out.push_str("\n    }");
    Ok(())
}

/// One compact record per line.
fn record_list<T: Serialize>(items: &[T]) -> Result<String, DocumentError> {
    let lines = items
        .iter()
        .map(|item| -> Result<String, DocumentError> {
            Ok(format!("        {}", serde_json::to_string(item)?))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("[\n{}\n      ]", lines.join(",\n")))
}
