// Row value renderer: decodes each field's stored value into a display
// string and assembles records into a pipe table or normalized JSON. All
// functions are pure; rendering the same inputs twice yields identical
// output.

use crate::catalog::{RowSchema, SchemaField};
use crate::fields::FieldKind;
use serde_json::{Map, Value};

/// Glyph substituted for literal pipes so cell content cannot break table
/// row syntax.
const PIPE_GLYPH: &str = "▏";
/// Full-width separator used when joining multi-valued cells.
const LIST_SEPARATOR: &str = "、";

/// Parse a string expected to hold a JSON array. Malformed input is an
/// explicit `None` at the call site, never an error.
pub(crate) fn parse_json_array(raw: &str) -> Option<Vec<Value>> {
    serde_json::from_str(raw).ok()
}

/// Parse a string expected to hold a JSON object.
pub(crate) fn parse_json_object(raw: &str) -> Option<Map<String, Value>> {
    serde_json::from_str(raw).ok()
}

/// Remove complete `<...>` tag spans. A `<` with no closing `>` is kept.
fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        match rest[start + 1..].find('>') {
            Some(end) if end > 0 => {
                rest = &rest[start + 1 + end + 1..];
            }
            _ => {
                out.push('<');
                rest = &rest[start + 1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Final plain-text normalization applied to every decoded cell: strip
/// HTML-like tags (only attempted when a `<` is present), replace literal
/// pipes with a visually distinct glyph and collapse newlines to spaces.
pub fn to_plain_text(text: &str) -> String {
    let stripped = if text.contains('<') {
        strip_tags(text)
    } else {
        text.to_string()
    };
    stripped.replace('|', PIPE_GLYPH).replace('\n', " ")
}

/// Render a raw scalar as display text. Containers fall back to their JSON
/// encoding rather than failing.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

/// Join one display attribute across the elements of an encoded reference
/// array; elements without the attribute are dropped.
fn join_names(items: &[Value], attribute: &str, separator: &str) -> String {
    items
        .iter()
        .filter_map(|item| item.get(attribute).and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join(separator)
}

/// Member / department / organizational-role references arrive as JSON-array
/// strings tagged by their leading attribute. File references and the empty
/// array literal always render empty; malformed JSON renders empty.
fn decode_reference(raw: &Value) -> String {
    match raw {
        Value::String(s) => {
            if s == "[]" || s.starts_with(r#"[{"file_id""#) {
                String::new()
            } else if s.starts_with(r#"[{"accountId""#) {
                parse_json_array(s)
                    .map(|items| join_names(&items, "fullname", ", "))
                    .unwrap_or_default()
            } else if s.starts_with(r#"[{"departmentId""#) {
                parse_json_array(s)
                    .map(|items| join_names(&items, "departmentName", LIST_SEPARATOR))
                    .unwrap_or_default()
            } else if s.starts_with(r#"[{"organizeId""#) {
                parse_json_array(s)
                    .map(|items| join_names(&items, "organizeName", LIST_SEPARATOR))
                    .unwrap_or_default()
            } else if s.starts_with('[') {
                // Encoded array with none of the known discriminators.
                String::new()
            } else {
                // Already-plain text passes through untouched.
                s.clone()
            }
        }
        Value::Object(obj) if obj.contains_key("accountId") => obj
            .get("fullname")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        other => scalar_text(other),
    }
}

/// Cascade and linked-record values: take the first element's name; any
/// other shape is empty.
fn decode_linked(raw: &Value) -> String {
    match raw {
        Value::String(s) if s.starts_with("[{") => parse_json_array(s)
            .and_then(|items| {
                items
                    .first()
                    .and_then(|item| item.get("name"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Location blobs: a JSON object string carrying an `address`. Short values
/// cannot hold a location object and are not worth a parse attempt.
fn decode_location(raw: &Value) -> String {
    match raw {
        Value::String(s) if s.len() > 10 => parse_json_object(s)
            .and_then(|obj| {
                obj.get("address")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Decode one stored field value into a single display string, dispatching
/// on the field's type family, then normalize it to plain text.
pub fn decode_cell(raw: Option<&Value>, field: &SchemaField) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    let decoded = match FieldKind::of(field.type_code) {
        FieldKind::MultiChoice => match raw {
            Value::Array(items) => items
                .iter()
                .map(scalar_text)
                .collect::<Vec<_>>()
                .join(LIST_SEPARATOR),
            other => scalar_text(other),
        },
        FieldKind::CodedOption => {
            let key = scalar_text(raw);
            field.options.get(&key).cloned().unwrap_or(key)
        }
        FieldKind::Reference => decode_reference(raw),
        FieldKind::Linked => decode_linked(raw),
        FieldKind::Location => decode_location(raw),
        FieldKind::Scalar => scalar_text(raw),
    };
    if decoded.is_empty() {
        decoded
    } else {
        to_plain_text(&decoded)
    }
}

/// Decoded value for JSON output: multi-choice arrays stay structured, every
/// other family flattens to the same string the table mode shows.
fn decode_cell_structured(raw: Option<&Value>, field: &SchemaField) -> Value {
    if FieldKind::of(field.type_code) == FieldKind::MultiChoice {
        if let Some(Value::Array(items)) = raw {
            return Value::Array(items.clone());
        }
    }
    Value::String(decode_cell(raw, field))
}

/// Assemble records into a markdown-style pipe table: header, separator,
/// then one independently decoded row per record.
pub fn render_table(schema: &RowSchema, rows: &[Value]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(schema.header.clone());
    lines.push(format!("|{}", "---|".repeat(schema.fields.len())));
    for row in rows {
        let cells = schema
            .fields
            .iter()
            .map(|field| decode_cell(row.get(&field.field_id), field))
            .collect::<Vec<_>>()
            .join("|");
        lines.push(format!("|{}|", cells));
    }
    lines.join("\n")
}

/// Assemble records as JSON objects keyed by field id.
pub fn render_rows(schema: &RowSchema, rows: &[Value]) -> Vec<Value> {
    rows.iter()
        .map(|row| {
            let mut record = Map::new();
            for field in &schema.fields {
                record.insert(
                    field.field_id.clone(),
                    decode_cell_structured(row.get(&field.field_id), field),
                );
            }
            Value::Object(record)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::build_row_schema;
    use serde_json::json;
    use std::collections::HashMap;

    fn field(type_code: i64) -> SchemaField {
        SchemaField {
            field_id: "f".to_string(),
            field_name: "F".to_string(),
            type_code,
            options: HashMap::new(),
        }
    }

    #[test]
    fn test_member_array_is_joined() {
        let raw = json!(r#"[{"accountId":"u1","fullname":"Alice"},{"accountId":"u2","fullname":"Bob"}]"#);
        assert_eq!(decode_cell(Some(&raw), &field(26)), "Alice, Bob");
    }

    #[test]
    fn test_empty_array_literal_renders_empty() {
        let raw = json!("[]");
        assert_eq!(decode_cell(Some(&raw), &field(26)), "");
    }

    #[test]
    fn test_file_reference_renders_empty() {
        let raw = json!(r#"[{"file_id":"abc","name":"doc.pdf"}]"#);
        assert_eq!(decode_cell(Some(&raw), &field(14)), "");
    }

    #[test]
    fn test_malformed_reference_json_renders_empty() {
        let raw = json!(r#"[{"accountId":"u1","fullname":"#);
        assert_eq!(decode_cell(Some(&raw), &field(26)), "");
    }

    #[test]
    fn test_unrecognized_reference_array_renders_empty() {
        let raw = json!(r#"[{"sid":"r1","foo":"bar"}]"#);
        assert_eq!(decode_cell(Some(&raw), &field(26)), "");
    }

    #[test]
    fn test_plain_reference_string_passes_through() {
        let raw = json!("Alice");
        assert_eq!(decode_cell(Some(&raw), &field(26)), "Alice");
    }

    #[test]
    fn test_department_join_uses_fullwidth_comma() {
        let raw = json!(r#"[{"departmentId":"d1","departmentName":"Sales"},{"departmentId":"d2","departmentName":"Ops"}]"#);
        assert_eq!(decode_cell(Some(&raw), &field(27)), "Sales、Ops");
    }

    #[test]
    fn test_organizational_role_join() {
        let raw = json!(r#"[{"organizeId":"o1","organizeName":"Managers"}]"#);
        assert_eq!(decode_cell(Some(&raw), &field(48)), "Managers");
    }

    #[test]
    fn test_multi_choice_array_joined() {
        let raw = json!(["Red", "Blue"]);
        assert_eq!(decode_cell(Some(&raw), &field(10)), "Red、Blue");
    }

    #[test]
    fn test_multi_choice_string_passthrough() {
        let raw = json!("Red");
        assert_eq!(decode_cell(Some(&raw), &field(10)), "Red");
    }

    #[test]
    fn test_coded_option_lookup_with_fallback() {
        let mut f = field(36);
        f.options.insert("1".to_string(), "Yes".to_string());
        assert_eq!(decode_cell(Some(&json!("1")), &f), "Yes");
        // Numeric raw codes resolve through the same key space.
        assert_eq!(decode_cell(Some(&json!(1)), &f), "Yes");
        // Absent keys fall back to the raw value.
        assert_eq!(decode_cell(Some(&json!("7")), &f), "7");
    }

    #[test]
    fn test_linked_record_takes_first_name() {
        let raw = json!(r#"[{"sid":"r1","name":"Order 42"},{"sid":"r2","name":"Order 43"}]"#);
        assert_eq!(decode_cell(Some(&raw), &field(29)), "Order 42");
    }

    #[test]
    fn test_linked_record_other_shapes_empty() {
        assert_eq!(decode_cell(Some(&json!("plain")), &field(29)), "");
        assert_eq!(decode_cell(Some(&json!("[{broken")), &field(35)), "");
        assert_eq!(decode_cell(Some(&json!(5)), &field(35)), "");
    }

    #[test]
    fn test_location_address() {
        let raw = json!(r#"{"x":121.47,"y":31.23,"address":"1 Main St"}"#);
        assert_eq!(decode_cell(Some(&raw), &field(40)), "1 Main St");
    }

    #[test]
    fn test_location_short_or_malformed_empty() {
        assert_eq!(decode_cell(Some(&json!("short")), &field(40)), "");
        assert_eq!(decode_cell(Some(&json!("{not json at all}")), &field(40)), "");
    }

    #[test]
    fn test_pipe_and_newline_normalization() {
        assert_eq!(decode_cell(Some(&json!("a|b\nc")), &field(2)), "a▏b c");
    }

    #[test]
    fn test_tags_stripped_only_with_angle_bracket() {
        assert_eq!(to_plain_text("<p>hello</p> world"), "hello world");
        assert_eq!(to_plain_text("no tags here"), "no tags here");
        // A lone `<` is not a tag.
        assert_eq!(to_plain_text("1 < 2"), "1 < 2");
    }

    #[test]
    fn test_missing_value_renders_empty() {
        assert_eq!(decode_cell(None, &field(2)), "");
        assert_eq!(decode_cell(Some(&Value::Null), &field(2)), "");
    }

    fn sample_schema_and_rows() -> (RowSchema, Vec<Value>) {
        let controls = vec![
            json!({"controlId": "name", "controlName": "Name", "type": 2, "remark": ""}),
            json!({"controlId": "who", "controlName": "Owner", "type": 26, "remark": ""}),
            json!({"controlId": "tags", "controlName": "Tags", "type": 10, "remark": ""}),
        ];
        let schema = build_row_schema(&controls, None);
        let rows = vec![json!({
            "name": "First|row",
            "who": r#"[{"accountId":"u1","fullname":"Alice"}]"#,
            "tags": ["a", "b"],
            "ctime": "2024-01-01 10:00:00",
            "rowid": "r-1"
        })];
        (schema, rows)
    }

    #[test]
    fn test_table_assembly() {
        let (schema, rows) = sample_schema_and_rows();
        let table = render_table(&schema, &rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "|Name|Owner|Tags|Created Time|Record Row ID|");
        assert_eq!(lines[1], "|---|---|---|---|---|");
        assert_eq!(lines[2], "|First▏row|Alice|a、b|2024-01-01 10:00:00|r-1|");
    }

    #[test]
    fn test_json_mode_matches_table_scalars() {
        let (schema, rows) = sample_schema_and_rows();
        let records = render_rows(&schema, &rows);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record["name"], json!("First▏row"));
        assert_eq!(record["who"], json!("Alice"));
        // List-typed fields stay structured in JSON mode.
        assert_eq!(record["tags"], json!(["a", "b"]));
        assert_eq!(record["rowid"], json!("r-1"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let (schema, rows) = sample_schema_and_rows();
        assert_eq!(render_table(&schema, &rows), render_table(&schema, &rows));
        assert_eq!(render_rows(&schema, &rows), render_rows(&schema, &rows));
    }
}
