// Pivot-report shaping: the same two output encodings as the record
// renderer, applied to a cross-tabulation document with row/column/value
// axis metadata.

use crate::render::to_plain_text;
use serde_json::{json, Map, Value};

/// One group-by or aggregation axis of the report.
#[derive(Debug, Clone)]
struct Axis {
    control_id: String,
    display_name: String,
}

/// Axis groups in output order: row group-bys, then column group-bys, then
/// aggregated values.
const AXIS_GROUPS: [&str; 3] = ["rows", "columns", "values"];

fn collect_axes(metadata: &Value) -> Vec<(String, Vec<Axis>)> {
    AXIS_GROUPS
        .iter()
        .map(|group| {
            let axes = metadata
                .get(*group)
                .and_then(Value::as_array)
                .map(|entries| {
                    entries
                        .iter()
                        .filter_map(|entry| {
                            let control_id =
                                entry.get("controlId").and_then(Value::as_str)?.to_string();
                            let display_name = entry
                                .get("displayName")
                                .and_then(Value::as_str)
                                .unwrap_or(&control_id)
                                .to_string();
                            Some(Axis { control_id, display_name })
                        })
                        .collect()
                })
                .unwrap_or_default();
            (group.to_string(), axes)
        })
        .collect()
}

fn cell_text(entry: &Value, group: &str, axis: &Axis) -> String {
    let raw = entry
        .get(group)
        .and_then(|values| values.get(&axis.control_id));
    let text = match raw {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => serde_json::to_string(other).unwrap_or_default(),
    };
    if text.is_empty() {
        text
    } else {
        to_plain_text(&text)
    }
}

/// Render the report as a pipe table, one column per axis.
pub fn render_pivot_table(data: &Value) -> String {
    let groups = collect_axes(data.get("metadata").unwrap_or(&Value::Null));
    let header: Vec<&str> = groups
        .iter()
        .flat_map(|(_, axes)| axes.iter().map(|a| a.display_name.as_str()))
        .collect();

    let mut lines = vec![
        format!("|{}|", header.join("|")),
        format!("|{}", "---|".repeat(header.len())),
    ];
    let empty = vec![];
    for entry in data.get("data").and_then(Value::as_array).unwrap_or(&empty) {
        let cells: Vec<String> = groups
            .iter()
            .flat_map(|(group, axes)| {
                axes.iter().map(move |axis| cell_text(entry, group, axis))
            })
            .collect();
        lines.push(format!("|{}|", cells.join("|")));
    }
    lines.join("\n")
}

/// Render the report as normalized JSON preserving axis metadata.
pub fn render_pivot_json(data: &Value) -> Value {
    let groups = collect_axes(data.get("metadata").unwrap_or(&Value::Null));
    let fields: Vec<Value> = groups
        .iter()
        .flat_map(|(group, axes)| {
            axes.iter().map(move |axis| {
                json!({
                    "controlId": axis.control_id,
                    "displayName": axis.display_name,
                    "axis": group,
                })
            })
        })
        .collect();

    let empty = vec![];
    let entries = data.get("data").and_then(Value::as_array).unwrap_or(&empty);
    let rows: Vec<Value> = entries
        .iter()
        .map(|entry| {
            let mut flat = Map::new();
            for (group, axes) in &groups {
                for axis in axes {
                    flat.insert(
                        axis.control_id.clone(),
                        Value::String(cell_text(entry, group, axis)),
                    );
                }
            }
            Value::Object(flat)
        })
        .collect();

    json!({
        "fields": fields,
        "rows": rows,
        "total": entries.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> Value {
        json!({
            "metadata": {
                "rows": [{"controlId": "region", "displayName": "Region"}],
                "columns": [{"controlId": "quarter", "displayName": "Quarter"}],
                "values": [{"controlId": "amount", "displayName": "Amount"}]
            },
            "data": [
                {
                    "rows": {"region": "North"},
                    "columns": {"quarter": "Q1"},
                    "values": {"amount": 1200}
                },
                {
                    "rows": {"region": "South|West"},
                    "columns": {"quarter": "Q1"},
                    "values": {"amount": 800}
                }
            ]
        })
    }

    #[test]
    fn test_pivot_table_layout() {
        let table = render_pivot_table(&sample_report());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "|Region|Quarter|Amount|");
        assert_eq!(lines[1], "|---|---|---|");
        assert_eq!(lines[2], "|North|Q1|1200|");
        // Pipe glyph substitution applies to pivot cells too.
        assert_eq!(lines[3], "|South▏West|Q1|800|");
    }

    #[test]
    fn test_pivot_json_matches_table_content() {
        let doc = render_pivot_json(&sample_report());
        assert_eq!(doc["total"], json!(2));
        assert_eq!(doc["rows"][0]["region"], json!("North"));
        assert_eq!(doc["rows"][0]["amount"], json!("1200"));
        assert_eq!(doc["rows"][1]["region"], json!("South▏West"));
        assert_eq!(doc["fields"][0]["axis"], json!("rows"));
        assert_eq!(doc["fields"][2]["controlId"], json!("amount"));
    }

    #[test]
    fn test_empty_report() {
        let doc = json!({"metadata": {}, "data": []});
        let table = render_pivot_table(&doc);
        assert_eq!(table, "||\n|");
        assert_eq!(render_pivot_json(&doc)["total"], json!(0));
    }

    #[test]
    fn test_missing_axis_display_name_falls_back_to_id() {
        let doc = json!({
            "metadata": {"rows": [{"controlId": "r1"}], "columns": [], "values": []},
            "data": [{"rows": {"r1": "x"}}]
        });
        let table = render_pivot_table(&doc);
        assert!(table.starts_with("|r1|"));
    }
}
