//! Hierarchical layout engine
//!
//! Groups components into rows by [`ComponentKind::layer`]: network and
//! security on top, then API, compute, data stores and finally everything
//! else. Empty layers take no row. Within a row components keep their input
//! order and are spread evenly across the canvas width.

use stratus_core::{
    geometry::{Bounds, Point, Size},
    model::ComponentKind,
};

use crate::layout::engines::LayoutEngine;

/// Hierarchical layout engine implementation
#[derive(Debug, Default)]
pub struct Engine {
    node_size: Size,
    margin: f32,
    layer_height: f32,
}

impl Engine {
    /// Create a new hierarchical layout engine
    pub fn new() -> Self {
        Self {
            node_size: Size::new(120.0, 60.0),
            margin: 60.0,
            layer_height: 150.0,
        }
    }

    /// Set the preferred component size
    pub fn set_node_size(&mut self, size: Size) -> &mut Self {
        self.node_size = size;
        self
    }

    /// Set the space above the first row
    pub fn set_margin(&mut self, margin: f32) -> &mut Self {
        self.margin = margin;
        self
    }

    /// Set the vertical distance between consecutive rows
    pub fn set_layer_height(&mut self, height: f32) -> &mut Self {
        self.layer_height = height;
        self
    }
}

/// Indices of `kinds` grouped by layer, skipping empty layers.
pub fn layers(kinds: &[ComponentKind]) -> Vec<Vec<usize>> {
    let mut layers = vec![Vec::new(); ComponentKind::LAYER_COUNT];
    for (idx, kind) in kinds.iter().enumerate() {
        layers[kind.layer()].push(idx);
    }
    layers.retain(|layer| !layer.is_empty());
    layers
}

impl LayoutEngine for Engine {
    fn place(&self, canvas: Size, kinds: &[ComponentKind]) -> Vec<Bounds> {
        let mut positions = vec![Bounds::default(); kinds.len()];

        for (row, members) in layers(kinds).into_iter().enumerate() {
            let center_y = self.margin + row as f32 * self.layer_height + self.layer_height / 2.0;
            let slot = canvas.width() / (members.len() + 1) as f32;
            let size = self
                .node_size
                .min(Size::new(slot, self.layer_height));

            for (col, idx) in members.into_iter().enumerate() {
                let center = Point::new(slot * (col + 1) as f32, center_y);
                positions[idx] = center.to_bounds(size);
            }
        }
        positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layers_skip_empty_and_keep_order() {
        let kinds = [
            ComponentKind::Database,
            ComponentKind::Compute,
            ComponentKind::Storage,
            ComponentKind::Security,
            ComponentKind::Network,
        ];
        assert_eq!(layers(&kinds), vec![vec![3, 4], vec![1], vec![0, 2]]);
    }

    #[test]
    fn test_rows_descend_by_layer() {
        let kinds = [
            ComponentKind::Database,
            ComponentKind::Compute,
            ComponentKind::Network,
            ComponentKind::Api,
        ];
        let positions = Engine::new().place(Size::new(1200.0, 1000.0), &kinds);

        let network = positions[2].center().y();
        let api = positions[3].center().y();
        let compute = positions[1].center().y();
        let database = positions[0].center().y();

        assert_eq!(network, 135.0);
        assert_eq!(api - network, 150.0);
        assert_eq!(compute - api, 150.0);
        assert_eq!(database - compute, 150.0);
    }

    #[test]
    fn test_even_horizontal_spacing() {
        let positions = Engine::new().place(Size::new(900.0, 600.0), &[ComponentKind::Compute; 2]);

        assert_eq!(positions[0].center().x(), 300.0);
        assert_eq!(positions[1].center().x(), 600.0);
        assert!(!positions[0].overlaps(&positions[1]));
    }

    #[test]
    fn test_crowded_row_shrinks_nodes() {
        let positions = Engine::new().place(Size::new(300.0, 600.0), &[ComponentKind::Compute; 5]);

        assert_eq!(positions[0].width(), 50.0);
        for pair in positions.windows(2) {
            assert!(!pair[0].overlaps(&pair[1]));
        }
    }
}
