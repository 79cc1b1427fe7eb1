// Field catalog builder: turns a worksheet's raw control definitions into a
// normalized field catalog (for the fields tool) or a compact row schema
// (for the record renderer).

use crate::fields::{is_choice, is_ignored, type_label, LOOKUP_TYPE};
use crate::render::{parse_json_array, to_plain_text};
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// One enumerated option of a choice-style control.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldOption {
    pub key: String,
    pub value: String,
}

/// Normalized definition of a single worksheet field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldDefinition {
    #[serde(rename = "fieldId")]
    pub field_id: String,
    #[serde(rename = "fieldName")]
    pub field_name: String,
    #[serde(rename = "fieldType")]
    pub type_label: String,
    #[serde(rename = "fieldTypeId")]
    pub type_code: i64,
    pub description: String,
    pub options: Vec<FieldOption>,
}

/// Catalog of a worksheet's renderable fields plus the markdown rendition.
#[derive(Debug, Clone)]
pub struct FieldCatalog {
    pub fields: Vec<FieldDefinition>,
    pub table: String,
}

/// Per-field schema entry used by the row renderer.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaField {
    #[serde(rename = "fieldId")]
    pub field_id: String,
    #[serde(rename = "fieldName")]
    pub field_name: String,
    #[serde(skip)]
    pub type_code: i64,
    #[serde(skip)]
    pub options: HashMap<String, String>,
}

/// Ordered row schema: field order drives column order in both output modes.
#[derive(Debug, Clone)]
pub struct RowSchema {
    pub fields: Vec<SchemaField>,
    /// Pipe-joined display names, e.g. `|Name|Status|Created Time|`.
    pub header: String,
}

/// Synthetic created-time field, implicit row metadata on every worksheet.
pub const CTIME_FIELD: &str = "ctime";
/// Synthetic row-identifier field, present in row-schema mode only.
pub const ROWID_FIELD: &str = "rowid";

/// Resolve a control's effective type code. Lookup controls (type 30) are
/// re-typed from their nested `sourceControl`; ignorable or unrecognizable
/// controls resolve to `None` and are dropped from catalogs.
fn effective_type(control: &Value) -> Option<i64> {
    let code = control.get("type")?.as_i64()?;
    if is_ignored(code) {
        return None;
    }
    if code == LOOKUP_TYPE {
        let nested = control.get("sourceControl")?.get("type")?.as_i64()?;
        if is_ignored(nested) {
            return None;
        }
        return Some(nested);
    }
    Some(code)
}

fn control_str<'a>(control: &'a Value, key: &str) -> &'a str {
    control.get(key).and_then(Value::as_str).unwrap_or("")
}

/// Control `remark` with newlines and tabs collapsed to single spaces.
fn description(control: &Value) -> String {
    control_str(control, "remark")
        .replace(['\n', '\t'], " ")
}

/// Inline `{key, value}` option list carried by choice controls.
fn inline_options(control: &Value) -> Vec<FieldOption> {
    control
        .get("options")
        .and_then(Value::as_array)
        .map(|opts| {
            opts.iter()
                .map(|opt| FieldOption {
                    key: control_str(opt, "key").to_string(),
                    value: control_str(opt, "value").to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Option list JSON-encoded inside `advancedSetting.itemnames`. Only
/// attempted when the string looks like a JSON array; malformed JSON yields
/// an empty list, not an error.
fn itemnames_options(control: &Value) -> Vec<FieldOption> {
    let raw = control
        .get("advancedSetting")
        .map(|s| control_str(s, "itemnames"))
        .unwrap_or("");
    if !raw.starts_with("[{") {
        return Vec::new();
    }
    parse_json_array(raw)
        .map(|items| {
            items
                .iter()
                .map(|item| FieldOption {
                    key: control_str(item, "key").to_string(),
                    value: control_str(item, "value").to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Derive a control's option metadata from its effective type family.
fn extract_options(control: &Value, type_code: i64) -> Vec<FieldOption> {
    if is_choice(type_code) {
        // Direct choice controls and resolved lookups over choice controls
        // both carry the inline list.
        inline_options(control)
    } else {
        match type_code {
            28 | 36 => itemnames_options(control),
            29 | 35 => {
                // Single reference noting the linked worksheet.
                let source = control_str(control, "dataSource");
                if source.is_empty() {
                    Vec::new()
                } else {
                    vec![FieldOption {
                        key: "worksheetId".to_string(),
                        value: source.to_string(),
                    }]
                }
            }
            _ => Vec::new(),
        }
    }
}

/// Key-to-label option map used for decoding stored row values. Inline
/// options win; `itemnames` is the fallback for coded numerics.
fn option_map(control: &Value) -> HashMap<String, String> {
    let mut options = inline_options(control);
    if options.is_empty() {
        options = itemnames_options(control);
    }
    options
        .into_iter()
        .map(|opt| (opt.key, opt.value))
        .collect()
}

/// Build the full field catalog of a worksheet, in control order, with the
/// synthetic created-time field appended. Returns both the structured fields
/// and a markdown table over them.
pub fn build_catalog(controls: &[Value]) -> FieldCatalog {
    let mut fields = Vec::new();
    let mut lines = vec![
        "|fieldId|fieldName|fieldType|fieldTypeId|description|options|".to_string(),
        format!("|{}", "---|".repeat(6)),
    ];

    for control in controls {
        let Some(type_code) = effective_type(control) else {
            continue;
        };
        let field = FieldDefinition {
            field_id: control_str(control, "controlId").to_string(),
            field_name: control_str(control, "controlName").to_string(),
            type_label: type_label(type_code).to_string(),
            type_code,
            description: description(control),
            options: extract_options(control, type_code),
        };
        let options_cell = if field.options.is_empty() {
            String::new()
        } else {
            serde_json::to_string(&field.options).unwrap_or_default()
        };
        // Free-form cells go through the same normalization as row values so
        // a stray pipe cannot break the table.
        lines.push(format!(
            "|{}|{}|{}|{}|{}|{}|",
            field.field_id,
            to_plain_text(&field.field_name),
            field.type_label,
            field.type_code,
            to_plain_text(&field.description),
            to_plain_text(&options_cell)
        ));
        fields.push(field);
    }

    fields.push(FieldDefinition {
        field_id: CTIME_FIELD.to_string(),
        field_name: "Created Time".to_string(),
        type_label: type_label(16).to_string(),
        type_code: 16,
        description: String::new(),
        options: Vec::new(),
    });
    lines.push("|ctime|Created Time|Date|16|||".to_string());

    FieldCatalog {
        fields,
        table: lines.join("\n"),
    }
}

/// Build the row schema used when rendering record listings. An optional
/// comma-separated allow-list restricts the retained fields; the synthetic
/// created-time field survives unless the allow-list omits it, and the row
/// identifier is always present.
pub fn build_row_schema(controls: &[Value], allow_list: Option<&str>) -> RowSchema {
    let allowed: Option<HashSet<&str>> = allow_list.and_then(|raw| {
        let set: HashSet<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .collect();
        if set.is_empty() {
            None
        } else {
            Some(set)
        }
    });

    let mut fields = Vec::new();
    for control in controls {
        let Some(type_code) = effective_type(control) else {
            continue;
        };
        let field_id = control_str(control, "controlId");
        if let Some(allowed) = &allowed {
            if !allowed.contains(field_id) {
                continue;
            }
        }
        fields.push(SchemaField {
            field_id: field_id.to_string(),
            field_name: control_str(control, "controlName").to_string(),
            type_code,
            options: option_map(control),
        });
    }

    let keep_ctime = allowed
        .as_ref()
        .map(|set| set.contains(CTIME_FIELD))
        .unwrap_or(true);
    if keep_ctime {
        fields.push(SchemaField {
            field_id: CTIME_FIELD.to_string(),
            field_name: "Created Time".to_string(),
            type_code: 16,
            options: HashMap::new(),
        });
    }
    fields.push(SchemaField {
        field_id: ROWID_FIELD.to_string(),
        field_name: "Record Row ID".to_string(),
        type_code: 2,
        options: HashMap::new(),
    });

    let header = format!(
        "|{}|",
        fields
            .iter()
            .map(|f| f.field_name.as_str())
            .collect::<Vec<_>>()
            .join("|")
    );

    RowSchema { fields, header }
}

impl RowSchema {
    /// Field ids to request from the remote API. The synthetic fields are
    /// implicit row metadata and are never requested.
    pub fn remote_field_ids(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| f.field_id != CTIME_FIELD && f.field_id != ROWID_FIELD)
            .map(|f| f.field_id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::IGNORED_TYPES;
    use serde_json::json;

    fn text_control(id: &str, name: &str) -> Value {
        json!({"controlId": id, "controlName": name, "type": 2, "remark": ""})
    }

    #[test]
    fn test_ignored_types_are_absent() {
        for code in IGNORED_TYPES {
            let controls = vec![
                json!({"controlId": "skip", "controlName": "Skip", "type": code, "remark": ""}),
                text_control("keep", "Keep"),
            ];
            let catalog = build_catalog(&controls);
            assert!(
                catalog.fields.iter().all(|f| f.field_id != "skip"),
                "type {} must be excluded",
                code
            );
            assert!(catalog.fields.iter().any(|f| f.field_id == "keep"));
        }
    }

    #[test]
    fn test_catalog_table_normalizes_free_form_cells() {
        let controls = vec![json!({
            "controlId": "st",
            "controlName": "Status|Phase",
            "type": 9,
            "remark": "one|two\nthree",
            "options": [{"key": "k1", "value": "A|B"}]
        })];
        let catalog = build_catalog(&controls);
        let row = catalog.table.lines().nth(2).unwrap();
        // Pipes in names, remarks and option JSON cannot add columns.
        assert_eq!(row.matches('|').count(), 7);
        assert!(row.contains("Status▏Phase"));
        assert!(row.contains("one▏two three"));
        assert!(row.contains("A▏B"));
    }

    #[test]
    fn test_control_without_type_is_skipped() {
        let controls = vec![json!({"controlId": "a", "controlName": "A"})];
        let catalog = build_catalog(&controls);
        // Only the synthetic created-time field remains.
        assert_eq!(catalog.fields.len(), 1);
        assert_eq!(catalog.fields[0].field_id, "ctime");
    }

    #[test]
    fn test_lookup_resolves_to_source_type() {
        let controls = vec![json!({
            "controlId": "lk",
            "controlName": "Lookup",
            "type": 30,
            "remark": "",
            "sourceControl": {"type": 9},
            "options": [{"key": "k1", "value": "Red"}, {"key": "k2", "value": "Blue"}]
        })];
        let catalog = build_catalog(&controls);
        let field = &catalog.fields[0];
        assert_eq!(field.type_code, 9);
        assert_eq!(field.type_label, type_label(9));
        assert_eq!(
            field.options,
            vec![
                FieldOption { key: "k1".into(), value: "Red".into() },
                FieldOption { key: "k2".into(), value: "Blue".into() },
            ]
        );
    }

    #[test]
    fn test_lookup_over_ignored_source_is_dropped() {
        let controls = vec![json!({
            "controlId": "lk",
            "controlName": "Lookup",
            "type": 30,
            "remark": "",
            "sourceControl": {"type": 21}
        })];
        let catalog = build_catalog(&controls);
        assert_eq!(catalog.fields.len(), 1);
        assert_eq!(catalog.fields[0].field_id, "ctime");
    }

    #[test]
    fn test_lookup_without_source_is_dropped() {
        let controls = vec![json!({
            "controlId": "lk", "controlName": "Lookup", "type": 30, "remark": ""
        })];
        assert_eq!(build_catalog(&controls).fields.len(), 1);
    }

    #[test]
    fn test_itemnames_options() {
        let controls = vec![json!({
            "controlId": "p",
            "controlName": "Progress",
            "type": 28,
            "remark": "",
            "advancedSetting": {"itemnames": r#"[{"key":"1","value":"Low"},{"key":"5","value":"High"}]"#}
        })];
        let catalog = build_catalog(&controls);
        assert_eq!(catalog.fields[0].options.len(), 2);
        assert_eq!(catalog.fields[0].options[0].value, "Low");
    }

    #[test]
    fn test_malformed_itemnames_yield_empty_options() {
        let controls = vec![json!({
            "controlId": "p",
            "controlName": "Progress",
            "type": 28,
            "remark": "",
            "advancedSetting": {"itemnames": "[{not json"}
        })];
        assert!(build_catalog(&controls).fields[0].options.is_empty());
    }

    #[test]
    fn test_linked_record_reference() {
        let controls = vec![json!({
            "controlId": "rel",
            "controlName": "Orders",
            "type": 29,
            "remark": "",
            "dataSource": "ws_orders"
        })];
        let catalog = build_catalog(&controls);
        assert_eq!(
            catalog.fields[0].options,
            vec![FieldOption { key: "worksheetId".into(), value: "ws_orders".into() }]
        );
    }

    #[test]
    fn test_description_normalization() {
        let controls = vec![json!({
            "controlId": "a", "controlName": "A", "type": 2,
            "remark": "line one\nline two\tend"
        })];
        let catalog = build_catalog(&controls);
        assert_eq!(catalog.fields[0].description, "line one line two end");
    }

    #[test]
    fn test_catalog_table_shape() {
        let controls = vec![text_control("a", "Name")];
        let catalog = build_catalog(&controls);
        let lines: Vec<&str> = catalog.table.lines().collect();
        assert_eq!(lines[0], "|fieldId|fieldName|fieldType|fieldTypeId|description|options|");
        assert_eq!(lines[1], "|---|---|---|---|---|---|");
        assert_eq!(lines[2], "|a|Name|Text|2|||");
        assert_eq!(lines[3], "|ctime|Created Time|Date|16|||");
    }

    #[test]
    fn test_row_schema_appends_synthetic_fields() {
        let schema = build_row_schema(&[text_control("a", "Name")], None);
        let ids: Vec<&str> = schema.fields.iter().map(|f| f.field_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "ctime", "rowid"]);
        assert_eq!(schema.header, "|Name|Created Time|Record Row ID|");
    }

    #[test]
    fn test_row_schema_allow_list() {
        let controls = vec![text_control("a", "A"), text_control("b", "B")];
        let schema = build_row_schema(&controls, Some("b,ctime"));
        let ids: Vec<&str> = schema.fields.iter().map(|f| f.field_id.as_str()).collect();
        // ctime named by the allow-list survives; rowid is always present.
        assert_eq!(ids, vec!["b", "ctime", "rowid"]);
    }

    #[test]
    fn test_row_schema_allow_list_omitting_ctime() {
        let controls = vec![text_control("a", "A")];
        let schema = build_row_schema(&controls, Some("a"));
        let ids: Vec<&str> = schema.fields.iter().map(|f| f.field_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "rowid"]);
    }

    #[test]
    fn test_blank_allow_list_means_no_restriction() {
        let schema = build_row_schema(&[text_control("a", "A")], Some(" , "));
        let ids: Vec<&str> = schema.fields.iter().map(|f| f.field_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "ctime", "rowid"]);
    }

    #[test]
    fn test_remote_field_ids_exclude_synthetics() {
        let schema = build_row_schema(&[text_control("a", "A")], None);
        assert_eq!(schema.remote_field_ids(), vec!["a".to_string()]);
    }

    #[test]
    fn test_option_map_used_for_coded_fields() {
        let controls = vec![json!({
            "controlId": "yn",
            "controlName": "Done",
            "type": 36,
            "remark": "",
            "advancedSetting": {"itemnames": r#"[{"key":"1","value":"Yes"},{"key":"0","value":"No"}]"#}
        })];
        let schema = build_row_schema(&controls, None);
        assert_eq!(schema.fields[0].options.get("1"), Some(&"Yes".to_string()));
        assert_eq!(schema.fields[0].options.get("0"), Some(&"No".to_string()));
    }
}
