//! Text output for resolved records.
//!
//! `go` prints struct declarations; nested records become inline anonymous
//! struct blocks. `json` dumps the record tree as-is.
use crate::record::Record;

/// Render all records as Go struct declarations, separated by blank lines.
pub fn go(records: &[Record]) -> String {
    records
        .iter()
        .map(go_record)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn go_record(record: &Record) -> String {
    let mut out = format!("type {} struct {{\n", record.name);
    go_body(&mut out, record);
    out.push_str("}\n");
    out
}

/// Fields first (sorted), then one block per child. Indentation follows
/// `depth`, one tab per level.
fn go_body(out: &mut String, record: &Record) {
    let pad = "\t".repeat(record.depth);
    for (name, ty) in &record.fields {
        out.push_str(&format!("{pad}{name} {ty}\n"));
    }
    for child in &record.children {
        out.push_str(&format!("{pad}{} struct {{\n", child.name));
        go_body(out, child);
        out.push_str(&format!("{pad}}}\n"));
    }
}

pub fn json(records: &[Record]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}
