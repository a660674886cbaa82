//! Presentation surface: the filter form and the results table.

pub mod form;
pub mod table;

pub use form::{FilterForm, FormError, FormField};
pub use table::{format_amount, Column, HeaderCell, ResultsTable, TableRow, PLACEHOLDER};
