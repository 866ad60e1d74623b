//! Diagram model types.
//!
//! These types describe one diagram independently of how it is drawn.
//!
//! # Pipeline Position
//!
//! ```text
//! Service catalog (TOML / JSON)
//!     ↓ builder
//! DiagramModel (these types) - components, containers, connections
//!     ↓ layout
//! Positioned DiagramModel
//!     ↓ validate
//! ValidationReport
//!     ↓ export
//! Draw.io XML / SVG / PNG / Markdown
//! ```
//!
//! # Organization
//!
//! - [`diagram`] - The aggregate root [`DiagramModel`] and [`LayoutKind`]
//! - [`element`] - [`Component`], [`Container`], [`Connection`]
//! - [`kind`] - [`ComponentKind`] and its lookup tables
//! - [`style`] - [`NodeStyle`] and [`EdgeStyle`]

pub mod diagram;
pub mod element;
pub mod kind;
pub mod style;

pub use diagram::*;
pub use element::*;
pub use kind::*;
pub use style::*;
