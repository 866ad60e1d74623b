//! Stratus Core Types and Definitions
//!
//! This crate provides the foundational types for Stratus cloud architecture
//! diagrams. It includes:
//!
//! - **Identifiers**: String-interned identifiers ([`identifier::Id`])
//! - **Colors**: Hex color checks and CSS color handling ([`color`] module)
//! - **Geometry**: Points, sizes and rectangles ([`geometry`] module)
//! - **Model**: Components, containers, connections and the diagram
//!   aggregate ([`model`] module)

pub mod color;
pub mod geometry;
pub mod identifier;
pub mod model;
