//! Diagram elements: components, containers and connections.

use std::fmt;

use crate::{
    geometry::Bounds,
    identifier::Id,
    model::{
        kind::{ComponentKind, normalize_icon},
        style::{EdgeStyle, NodeStyle},
    },
};

/// One visual node representing a cloud resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    id: Id,
    name: String,
    kind: ComponentKind,
    label: String,
    position: Option<Bounds>,
    style: NodeStyle,
    icon: Option<String>,
    parent: Option<Id>,
}

impl Component {
    /// Create a component whose label is its name and whose style is the
    /// default for `kind`.
    pub fn new(id: Id, name: impl Into<String>, kind: ComponentKind) -> Self {
        let name = name.into();
        Self {
            id,
            label: name.clone(),
            name,
            kind,
            position: None,
            style: kind.default_style(),
            icon: None,
            parent: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Pins the component at an explicit position; layout will not move it.
    pub fn with_position(mut self, position: Bounds) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_style(mut self, style: NodeStyle) -> Self {
        self.style = style;
        self
    }

    /// Overrides the kind's icon. Short names get the AWS shape prefix.
    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = Some(normalize_icon(icon));
        self
    }

    pub fn with_parent(mut self, parent: Id) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn position(&self) -> Option<Bounds> {
        self.position
    }

    pub fn style(&self) -> &NodeStyle {
        &self.style
    }

    /// The icon shape to draw: the explicit icon if set, else the kind's.
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref().or_else(|| self.kind.icon())
    }

    pub fn parent(&self) -> Option<Id> {
        self.parent
    }

    /// Assigns a position. Used by layout engines.
    pub fn set_position(&mut self, position: Bounds) {
        self.position = Some(position);
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// A grouping rectangle such as a VPC or an availability zone.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    id: Id,
    label: String,
    geometry: Option<Bounds>,
    parent: Option<Id>,
    style: NodeStyle,
}

impl Container {
    pub fn new(id: Id, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            geometry: None,
            parent: None,
            style: NodeStyle::container(),
        }
    }

    pub fn with_geometry(mut self, geometry: Bounds) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn with_parent(mut self, parent: Id) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_style(mut self, style: NodeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn geometry(&self) -> Option<Bounds> {
        self.geometry
    }

    pub fn parent(&self) -> Option<Id> {
        self.parent
    }

    pub fn style(&self) -> &NodeStyle {
        &self.style
    }

    /// Assigns the rectangle. Used when fitting containers after layout.
    pub fn set_geometry(&mut self, geometry: Bounds) {
        self.geometry = Some(geometry);
    }
}

/// A directed edge between two components.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    source: Id,
    target: Id,
    label: Option<String>,
    style: EdgeStyle,
}

impl Connection {
    pub fn new(source: Id, target: Id) -> Self {
        Self {
            source,
            target,
            label: None,
            style: EdgeStyle::default(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_style(mut self, style: EdgeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    /// The annotation text, if any. Empty labels count as absent.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref().filter(|label| !label.is_empty())
    }

    pub fn style(&self) -> &EdgeStyle {
        &self.style
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_defaults() {
        let component = Component::new(Id::new("db"), "orders-db", ComponentKind::Database);

        assert_eq!(component.label(), "orders-db");
        assert_eq!(component.position(), None);
        assert_eq!(component.icon(), Some("mxgraph.aws4.rds"));
        assert_eq!(
            component.style(),
            &ComponentKind::Database.default_style()
        );
    }

    #[test]
    fn test_component_icon_override() {
        let component =
            Component::new(Id::new("fn"), "resize", ComponentKind::Compute).with_icon("lambda");

        assert_eq!(component.icon(), Some("mxgraph.aws4.lambda"));
    }

    #[test]
    fn test_component_set_position() {
        let mut component = Component::new(Id::new("a"), "a", ComponentKind::Generic);
        component.set_position(Bounds::new(1.0, 2.0, 3.0, 4.0));

        assert_eq!(component.position(), Some(Bounds::new(1.0, 2.0, 3.0, 4.0)));
    }

    #[test]
    fn test_connection_display_and_label() {
        let connection = Connection::new(Id::new("b"), Id::new("a"));
        assert_eq!(connection.to_string(), "b -> a");
        assert_eq!(connection.label(), None);

        let labelled = connection.clone().with_label("");
        assert_eq!(labelled.label(), None);

        let labelled = connection.with_label("SQL");
        assert_eq!(labelled.label(), Some("SQL"));
    }
}
