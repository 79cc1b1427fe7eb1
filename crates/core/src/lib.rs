// Response-normalization core for the HAP open API: field catalogs, row
// value decoding and the tabular/JSON output encodings. Pure functions over
// bounded JSON documents; no I/O, no cross-request state.

pub mod catalog;
pub mod fields;
pub mod pivot;
pub mod render;
pub mod sheets;

pub use catalog::{
    build_catalog, build_row_schema, FieldCatalog, FieldDefinition, FieldOption, RowSchema,
    SchemaField, CTIME_FIELD, ROWID_FIELD,
};
pub use fields::{type_label, FieldKind, IGNORED_TYPES};
pub use pivot::{render_pivot_json, render_pivot_table};
pub use render::{decode_cell, render_rows, render_table, to_plain_text};
pub use sheets::{flatten_worksheets, worksheet_table, WorksheetEntry, MAX_SECTION_DEPTH};
