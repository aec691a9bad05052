mod document;
mod sql;

pub use document::DocumentTranslator;
pub use sql::{SqlFragment, SqlParam, SqlTranslator};
