//! Endpoint groups of the HAP open API.

mod app;
mod option_sets;
mod records;
mod reports;
mod roles;
mod worksheets;

pub use app::AppApi;
pub use option_sets::OptionSetsApi;
pub use records::{ListRecordsQuery, RecordsApi};
pub use reports::ReportsApi;
pub use roles::RolesApi;
pub use worksheets::WorksheetsApi;
