//! The diagram aggregate and its layout selection.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{
    geometry::{Bounds, Point, Size},
    identifier::Id,
    model::element::{Component, Connection, Container},
};

/// Layout algorithms that position components lacking an explicit position.
///
/// The names match external configuration strings (snake_case).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    /// Square-ish grid filling the canvas.
    Grid,
    /// Evenly spaced on a circle around the canvas center.
    Circular,
    /// One row per layer of components (edge, API, compute, data).
    #[default]
    Hierarchical,
    /// Leave components where the catalog put them.
    None,
}

impl FromStr for LayoutKind {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grid" => Ok(Self::Grid),
            "circular" => Ok(Self::Circular),
            "hierarchical" => Ok(Self::Hierarchical),
            "none" => Ok(Self::None),
            _ => Err("Unsupported layout, expected one of: grid, circular, hierarchical, none"),
        }
    }
}

impl From<LayoutKind> for &'static str {
    fn from(val: LayoutKind) -> Self {
        match val {
            LayoutKind::Grid => "grid",
            LayoutKind::Circular => "circular",
            LayoutKind::Hierarchical => "hierarchical",
            LayoutKind::None => "none",
        }
    }
}

impl Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// The full in-memory description of one diagram.
///
/// A model is built once, positioned once by a layout engine, validated and
/// then rendered. Position assignment through [`components_mut`] and
/// [`containers_mut`] is the only mutation after construction.
///
/// [`components_mut`]: DiagramModel::components_mut
/// [`containers_mut`]: DiagramModel::containers_mut
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramModel {
    name: String,
    components: Vec<Component>,
    containers: Vec<Container>,
    connections: Vec<Connection>,
    canvas_size: Size,
    layout: LayoutKind,
}

impl DiagramModel {
    /// Create an empty model.
    pub fn new(name: impl Into<String>, canvas_size: Size, layout: LayoutKind) -> Self {
        Self {
            name: name.into(),
            components: Vec::new(),
            containers: Vec::new(),
            connections: Vec::new(),
            canvas_size,
            layout,
        }
    }

    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    pub fn with_container(mut self, container: Container) -> Self {
        self.containers.push(container);
        self
    }

    pub fn with_connection(mut self, connection: Connection) -> Self {
        self.connections.push(connection);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn canvas_size(&self) -> Size {
        self.canvas_size
    }

    /// The canvas as a rectangle anchored at the origin.
    pub fn canvas_bounds(&self) -> Bounds {
        Bounds::new_from_top_left(Point::default(), self.canvas_size)
    }

    pub fn layout(&self) -> LayoutKind {
        self.layout
    }

    /// Mutable access for layout engines assigning positions.
    pub fn components_mut(&mut self) -> &mut [Component] {
        &mut self.components
    }

    /// Mutable access for container fitting after layout.
    pub fn containers_mut(&mut self) -> &mut [Container] {
        &mut self.containers
    }

    /// Look up the first component with the given id.
    pub fn component(&self, id: Id) -> Option<&Component> {
        self.components.iter().find(|component| component.id() == id)
    }

    /// Look up the first container with the given id.
    pub fn container(&self, id: Id) -> Option<&Container> {
        self.containers.iter().find(|container| container.id() == id)
    }

    /// Components whose parent is `container`, or top-level ones for `None`.
    pub fn children_of(&self, container: Option<Id>) -> impl Iterator<Item = &Component> {
        self.components
            .iter()
            .filter(move |component| component.parent() == container)
    }

    /// Containers nested directly in `container`, or top-level ones for `None`.
    pub fn subcontainers_of(&self, container: Option<Id>) -> impl Iterator<Item = &Container> {
        self.containers
            .iter()
            .filter(move |candidate| candidate.parent() == container)
    }
}
