//! Data models for the hospital HR backend.
//!
//! Wire names match what the HR frontend already reads from the PHP endpoints.

mod department;
mod employee;
mod hmo;
mod revision;
mod structure;

pub use department::*;
pub use employee::*;
pub use hmo::*;
pub use revision::*;
pub use structure::*;
