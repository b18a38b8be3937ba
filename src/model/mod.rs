//! Dictionary model (Intermediate Representation).
//!
//! Every source format is parsed into canonical [`Record`]s and every target
//! format is rendered from them, so a conversion never needs a mapping
//! between two concrete formats.

mod diagnostic;
mod record;

pub use diagnostic::*;
pub use record::*;
