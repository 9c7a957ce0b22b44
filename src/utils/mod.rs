// Utilities Module
//
// Path conversion and indexing eligibility shared across the crate.

pub mod ignore;
pub mod paths;
