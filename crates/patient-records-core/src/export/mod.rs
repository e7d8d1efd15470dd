//! Export functionality for record listings.

mod csv;

pub use csv::*;
