//! Safe SQL builder: identifiers from the allow-list only, quoted on output.

mod builder;
pub use builder::*;
