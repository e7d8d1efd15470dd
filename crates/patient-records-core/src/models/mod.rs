//! Domain models for the patient records system.

mod query;
mod record;

pub use query::*;
pub use record::*;
