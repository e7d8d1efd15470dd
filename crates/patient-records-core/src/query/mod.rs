//! In-memory query pipeline over the record cache.
//!
//! Pipeline: Filter → Sort → (Aggregate | Paginate)
//!
//! Everything here is pure: inputs are borrowed, never mutated, and no
//! function returns an error. Malformed records are handled by the defaults
//! documented on each stage rather than rejected.

mod aggregate;
mod paginate;
mod pipeline;

pub use aggregate::*;
pub use paginate::*;
pub use pipeline::*;
