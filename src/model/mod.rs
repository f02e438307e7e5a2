//! In-process model of the host application's tables and fields

mod field;
mod table;
mod types;
mod value;

pub use field::{Field, FieldAttrs, FieldSource};
pub use table::{LiveTable, TableId};
pub use types::FieldType;
pub use value::CellValue;
