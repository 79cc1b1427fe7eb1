// Flattens the application's hierarchical section tree into a flat
// worksheet index. Recursion is hard-capped so a pathological or cyclic
// section graph can only truncate the result, never hang it.

use serde::Serialize;
use serde_json::Value;

/// Maximum section nesting depth explored while flattening. Not
/// configurable.
pub const MAX_SECTION_DEPTH: usize = 10;

/// Item type code marking a worksheet inside a section.
const WORKSHEET_ITEM: i64 = 0;

/// One worksheet in the flattened index.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WorksheetEntry {
    #[serde(rename = "worksheetId")]
    pub id: String,
    pub name: String,
    pub notes: String,
}

fn item_str<'a>(item: &'a Value, key: &str) -> &'a str {
    item.get(key).and_then(Value::as_str).unwrap_or("")
}

fn collect(section: &Value, depth: usize, out: &mut Vec<WorksheetEntry>) {
    if depth >= MAX_SECTION_DEPTH {
        return;
    }
    if let Some(items) = section.get("items").and_then(Value::as_array) {
        for item in items {
            if item.get("type").and_then(Value::as_i64) == Some(WORKSHEET_ITEM) {
                out.push(WorksheetEntry {
                    id: item_str(item, "id").to_string(),
                    name: item_str(item, "name").to_string(),
                    notes: item_str(item, "notes").to_string(),
                });
            }
        }
    }
    if let Some(children) = section.get("childSections").and_then(Value::as_array) {
        for child in children {
            collect(child, depth + 1, out);
        }
    }
}

/// Flatten an app-info document's section tree into worksheet entries, in
/// section order.
pub fn flatten_worksheets(app_info: &Value) -> Vec<WorksheetEntry> {
    let mut out = Vec::new();
    if let Some(sections) = app_info.get("sections").and_then(Value::as_array) {
        for section in sections {
            collect(section, 0, &mut out);
        }
    }
    out
}

/// Render the worksheet index as a pipe table.
pub fn worksheet_table(entries: &[WorksheetEntry]) -> String {
    let mut lines = vec![
        "|worksheetId|name|description|".to_string(),
        "|---|---|---|".to_string(),
    ];
    for entry in entries {
        lines.push(format!(
            "|{}|{}|{}|",
            entry.id,
            entry.name,
            crate::render::to_plain_text(&entry.notes)
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_skips_non_worksheet_items() {
        let app_info = json!({
            "sections": [{
                "items": [
                    {"id": "ws1", "name": "Orders", "type": 0, "notes": "All orders"},
                    {"id": "pg1", "name": "Dashboard", "type": 1}
                ]
            }]
        });
        let entries = flatten_worksheets(&app_info);
        assert_eq!(
            entries,
            vec![WorksheetEntry {
                id: "ws1".into(),
                name: "Orders".into(),
                notes: "All orders".into()
            }]
        );
    }

    #[test]
    fn test_flatten_recurses_into_child_sections() {
        let app_info = json!({
            "sections": [{
                "items": [{"id": "a", "name": "A", "type": 0}],
                "childSections": [{
                    "items": [{"id": "b", "name": "B", "type": 0}]
                }]
            }]
        });
        let ids: Vec<String> = flatten_worksheets(&app_info)
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_depth_cap_truncates_instead_of_hanging() {
        // Build a chain nested well past the cap; one worksheet per level.
        let mut section = json!({
            "items": [{"id": "deepest", "name": "D", "type": 0}]
        });
        for i in 0..30 {
            section = json!({
                "items": [{"id": format!("lvl{}", i), "name": "L", "type": 0}],
                "childSections": [section]
            });
        }
        let app_info = json!({ "sections": [section] });
        let entries = flatten_worksheets(&app_info);
        // Terminates, keeps exactly the first MAX_SECTION_DEPTH levels and
        // never reaches the deepest item.
        assert_eq!(entries.len(), MAX_SECTION_DEPTH);
        assert!(entries.iter().all(|e| e.id != "deepest"));
    }

    #[test]
    fn test_worksheet_table_rendering() {
        let entries = vec![WorksheetEntry {
            id: "ws1".into(),
            name: "Orders".into(),
            notes: "line|one\ntwo".into(),
        }];
        let table = worksheet_table(&entries);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "|worksheetId|name|description|");
        assert_eq!(lines[2], "|ws1|Orders|line▏one two|");
    }
}
