//! Circular layout engine
//!
//! Places components evenly on a ring centered in the canvas, starting at
//! 12 o'clock and going clockwise.

use std::f32::consts::{FRAC_PI_2, TAU};

use stratus_core::{
    geometry::{Bounds, Point, Size},
    model::ComponentKind,
};

use crate::layout::engines::LayoutEngine;

/// Circular layout engine implementation
#[derive(Debug, Default)]
pub struct Engine {
    node_size: Size,
    margin: f32,
}

impl Engine {
    /// Create a new circular layout engine
    pub fn new() -> Self {
        Self {
            node_size: Size::new(120.0, 60.0),
            margin: 60.0,
        }
    }

    /// Set the size of each placed component
    pub fn set_node_size(&mut self, size: Size) -> &mut Self {
        self.node_size = size;
        self
    }

    /// Set the gap between the ring and the nearest canvas edge
    pub fn set_margin(&mut self, margin: f32) -> &mut Self {
        self.margin = margin;
        self
    }

    /// Ring radius for the given canvas; never negative.
    pub fn radius(&self, canvas: Size) -> f32 {
        (canvas.width().min(canvas.height()) / 2.0 - self.margin).max(0.0)
    }
}

impl LayoutEngine for Engine {
    fn place(&self, canvas: Size, kinds: &[ComponentKind]) -> Vec<Bounds> {
        let center = Point::new(canvas.width() / 2.0, canvas.height() / 2.0);
        let count = kinds.len();

        if count == 1 {
            return vec![center.to_bounds(self.node_size)];
        }

        let radius = self.radius(canvas);
        (0..count)
            .map(|idx| {
                // Screen y grows downward, so increasing angles run clockwise.
                let angle = TAU * idx as f32 / count as f32 - FRAC_PI_2;
                let offset = Point::new(radius * angle.cos(), radius * angle.sin());
                center.add_point(offset).to_bounds(self.node_size)
            })
            .collect()
    }
}
