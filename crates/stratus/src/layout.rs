//! Component placement.
//!
//! Layout assigns a position to every component the catalog did not pin,
//! then sizes containers without explicit geometry around their members.
//! It never fails: results outside the canvas are left for the validator.

mod containers;
mod engines;

pub use containers::fit_containers;
pub use engines::{EngineBuilder, LayoutEngine, circular, grid, hierarchical};
