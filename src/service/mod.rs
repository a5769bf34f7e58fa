//! FieldResolver: allow-list validation and column selection; SelectService: execution.

mod fields;
mod select;
pub use fields::*;
pub use select::SelectService;
