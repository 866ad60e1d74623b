//! Layout engine factory module
//!
//! This module selects a layout engine from the diagram's [`LayoutKind`] and
//! applies it to the components that still lack a position. The engines
//! themselves only see the canvas size and the kinds of the components to
//! place, so they stay independent of the model types.
//!
//! The module uses a builder pattern for creating and configuring layout engines.

pub mod circular;
pub mod grid;
pub mod hierarchical;

use log::{debug, info};

use stratus_core::{
    geometry::{Bounds, Size},
    model::{ComponentKind, DiagramModel, LayoutKind},
};

use crate::layout::containers::fit_containers;

/// Trait implemented by every placement algorithm.
pub trait LayoutEngine {
    /// Returns one rectangle per entry of `kinds`, in the same order.
    fn place(&self, canvas: Size, kinds: &[ComponentKind]) -> Vec<Bounds>;
}

/// Builder for creating and configuring layout engines.
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    node_size: Size,
    margin: f32,
    layer_height: f32,
    container_padding: f32,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder {
    /// Create a new engine builder with default spacing
    pub fn new() -> Self {
        Self {
            node_size: Size::new(120.0, 60.0),
            margin: 60.0,
            layer_height: 150.0,
            container_padding: 20.0,
        }
    }

    /// Set the preferred size of placed components
    pub fn with_node_size(mut self, size: Size) -> Self {
        self.node_size = size;
        self
    }

    /// Set the gap between the circular layout's ring and the canvas edge
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// Set the row height of the hierarchical layout
    pub fn with_layer_height(mut self, height: f32) -> Self {
        self.layer_height = height;
        self
    }

    /// Set the padding between fitted containers and their members
    pub fn with_container_padding(mut self, padding: f32) -> Self {
        self.container_padding = padding;
        self
    }

    pub fn container_padding(&self) -> f32 {
        self.container_padding
    }

    /// Get an engine of the specified kind with configured options.
    ///
    /// [`LayoutKind::None`] has no engine.
    pub fn engine(&self, kind: LayoutKind) -> Option<Box<dyn LayoutEngine>> {
        match kind {
            LayoutKind::Grid => {
                let mut engine = grid::Engine::new();
                engine.set_node_size(self.node_size);
                Some(Box::new(engine))
            }
            LayoutKind::Circular => {
                let mut engine = circular::Engine::new();
                engine
                    .set_node_size(self.node_size)
                    .set_margin(self.margin);
                Some(Box::new(engine))
            }
            LayoutKind::Hierarchical => {
                let mut engine = hierarchical::Engine::new();
                engine
                    .set_node_size(self.node_size)
                    .set_margin(self.margin)
                    .set_layer_height(self.layer_height);
                Some(Box::new(engine))
            }
            LayoutKind::None => None,
        }
    }

    /// Position every unplaced component of `model`, then fit containers.
    ///
    /// Components that already have a position are never moved.
    pub fn apply(&self, model: &mut DiagramModel) {
        let kind = model.layout();
        let canvas = model.canvas_size();

        let unplaced: Vec<usize> = model
            .components()
            .iter()
            .enumerate()
            .filter(|(_, component)| component.position().is_none())
            .map(|(idx, _)| idx)
            .collect();

        info!(layout = kind.to_string(), unplaced = unplaced.len(); "Applying layout");

        if let Some(engine) = self.engine(kind).filter(|_| !unplaced.is_empty()) {
            let kinds: Vec<ComponentKind> = unplaced
                .iter()
                .map(|&idx| model.components()[idx].kind())
                .collect();
            let positions = engine.place(canvas, &kinds);

            let components = model.components_mut();
            for (&idx, bounds) in unplaced.iter().zip(positions) {
                components[idx].set_position(bounds);
            }
            debug!(placed = unplaced.len(); "Components placed");
        }

        fit_containers(model, self.container_padding);
    }
}

#[cfg(test)]
mod tests {
    use stratus_core::{identifier::Id, model::Component};

    use super::*;

    fn model(layout: LayoutKind) -> DiagramModel {
        DiagramModel::new("test", Size::new(800.0, 600.0), layout)
            .with_component(Component::new(Id::new("a"), "a", ComponentKind::Database))
            .with_component(
                Component::new(Id::new("b"), "b", ComponentKind::Compute)
                    .with_position(Bounds::new(5.0, 5.0, 10.0, 10.0)),
            )
            .with_component(Component::new(Id::new("c"), "c", ComponentKind::Network))
    }

    #[test]
    fn test_apply_keeps_explicit_positions() {
        for layout in [LayoutKind::Grid, LayoutKind::Circular, LayoutKind::Hierarchical] {
            let mut model = model(layout);
            EngineBuilder::new().apply(&mut model);

            let components = model.components();
            assert_eq!(
                components[1].position(),
                Some(Bounds::new(5.0, 5.0, 10.0, 10.0))
            );
            assert!(components[0].position().is_some());
            assert!(components[2].position().is_some());
        }
    }

    #[test]
    fn test_apply_none_leaves_components_unplaced() {
        let mut model = model(LayoutKind::None);
        EngineBuilder::new().apply(&mut model);

        assert!(model.components()[0].position().is_none());
        assert!(model.components()[2].position().is_none());
    }

    #[test]
    fn test_apply_empty_model_is_noop() {
        let mut model = DiagramModel::new("empty", Size::new(100.0, 100.0), LayoutKind::Grid);
        EngineBuilder::new().apply(&mut model);
        assert!(model.components().is_empty());
    }

    #[test]
    fn test_engine_lookup() {
        let builder = EngineBuilder::new();
        assert!(builder.engine(LayoutKind::Grid).is_some());
        assert!(builder.engine(LayoutKind::None).is_none());
    }
}
