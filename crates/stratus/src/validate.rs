//! Structural and geometric checks run before rendering.
//!
//! Validation never stops at the first problem: every check runs and every
//! violation is collected into one [`ValidationReport`]. The model is only
//! read.

use std::{collections::HashMap, fmt};

use log::{debug, info};
use thiserror::Error;

use stratus_core::{
    color::is_hex_color,
    geometry::{Bounds, Size},
    identifier::Id,
    model::DiagramModel,
};

use crate::{error::StratusError, structure::ContainmentTree};

/// Cell ids the Draw.io format reserves for its bootstrap cells.
pub const RESERVED_IDS: [&str; 2] = ["0", "1"];

/// One violated invariant.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("id `{id}` is used by {count} elements")]
    DuplicateId { id: String, count: usize },

    #[error("id `{id}` is reserved for the diagram's root cells")]
    ReservedId { id: String },

    #[error("connection #{index} ({connection}) refers to unknown component `{missing}`")]
    DanglingConnection {
        index: usize,
        connection: String,
        missing: String,
    },

    #[error("connection #{index} connects `{id}` to itself")]
    SelfLoop { index: usize, id: String },

    #[error(
        "`{id}` at ({x}, {y}) with size {width}x{height} lies outside the {}x{} canvas",
        .canvas.width(),
        .canvas.height()
    )]
    OutOfBounds {
        id: String,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        canvas: Size,
    },

    #[error("`{id}` has no position")]
    Unpositioned { id: String },

    #[error("`{owner}` has {field} `{value}`, expected #RRGGBB")]
    InvalidColor {
        owner: String,
        field: &'static str,
        value: String,
    },

    #[error("container `{id}` contains itself")]
    ContainmentCycle { id: String },

    #[error("`{id}` names unknown container `{parent}` as its parent")]
    UnknownParent { id: String, parent: String },
}

impl ValidationError {
    /// The error's category name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DuplicateId { .. } => "DuplicateIdError",
            Self::ReservedId { .. } => "ReservedIdError",
            Self::DanglingConnection { .. } => "DanglingConnectionError",
            Self::SelfLoop { .. } => "SelfLoopError",
            Self::OutOfBounds { .. } | Self::Unpositioned { .. } => "OutOfBoundsError",
            Self::InvalidColor { .. } => "InvalidColorError",
            Self::ContainmentCycle { .. } => "ContainmentCycleError",
            Self::UnknownParent { .. } => "UnknownParentError",
        }
    }

    fn out_of_bounds(id: Id, bounds: Bounds, canvas: Size) -> Self {
        Self::OutOfBounds {
            id: id.to_string(),
            x: bounds.min_x(),
            y: bounds.min_y(),
            width: bounds.width(),
            height: bounds.height(),
            canvas,
        }
    }
}

/// The outcome of validating one model.
#[derive(Clone, Default, PartialEq)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    /// True when no check failed.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// One line per error, prefixed with its category name.
    pub fn messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .map(|err| format!("{}: {err}", err.name()))
            .collect()
    }

    /// Converts the report into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns [`StratusError::Validation`] carrying this report when any
    /// check failed.
    pub fn into_result(self) -> Result<(), StratusError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(StratusError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for message in self.messages() {
            writeln!(f, "{message}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.messages()).finish()
    }
}

/// Accumulates errors while the checks run.
#[derive(Debug, Default)]
struct Collector {
    errors: Vec<ValidationError>,
}

impl Collector {
    fn emit(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    fn finish(self) -> ValidationReport {
        ValidationReport {
            errors: self.errors,
        }
    }
}

/// Check every invariant of `model` and collect all violations.
///
/// # Examples
///
/// ```
/// use stratus::validate::validate;
/// use stratus_core::{
///     geometry::{Bounds, Size},
///     identifier::Id,
///     model::{Component, ComponentKind, Connection, DiagramModel, LayoutKind},
/// };
///
/// let model = DiagramModel::new("demo", Size::new(800.0, 600.0), LayoutKind::None)
///     .with_component(
///         Component::new(Id::new("a"), "a", ComponentKind::Database)
///             .with_position(Bounds::new(10.0, 10.0, 100.0, 50.0)),
///     )
///     .with_connection(Connection::new(Id::new("a"), Id::new("a")));
///
/// let report = validate(&model);
/// assert!(!report.is_valid());
/// assert!(report.messages()[0].starts_with("SelfLoopError"));
/// ```
pub fn validate(model: &DiagramModel) -> ValidationReport {
    info!(
        components = model.components().len(),
        connections = model.connections().len();
        "Validating diagram"
    );

    let mut collector = Collector::default();
    check_ids(model, &mut collector);
    check_connections(model, &mut collector);
    check_geometry(model, &mut collector);
    check_colors(model, &mut collector);
    check_containment(model, &mut collector);

    let report = collector.finish();
    debug!(errors = report.errors().len(); "Validation finished");
    report
}

fn check_ids(model: &DiagramModel, collector: &mut Collector) {
    let ids = model
        .components()
        .iter()
        .map(|component| component.id())
        .chain(model.containers().iter().map(|container| container.id()));

    let mut order: Vec<Id> = Vec::new();
    let mut counts: HashMap<Id, usize> = HashMap::new();
    for id in ids {
        let count = counts.entry(id).or_insert(0);
        if *count == 0 {
            order.push(id);
        }
        *count += 1;
    }

    for id in order {
        let count = counts[&id];
        if count > 1 {
            collector.emit(ValidationError::DuplicateId {
                id: id.to_string(),
                count,
            });
        }
        if RESERVED_IDS.iter().any(|reserved| id == *reserved) {
            collector.emit(ValidationError::ReservedId { id: id.to_string() });
        }
    }
}

fn check_connections(model: &DiagramModel, collector: &mut Collector) {
    for (index, connection) in model.connections().iter().enumerate() {
        for endpoint in [connection.source(), connection.target()] {
            if model.component(endpoint).is_none() {
                collector.emit(ValidationError::DanglingConnection {
                    index,
                    connection: connection.to_string(),
                    missing: endpoint.to_string(),
                });
            }
            if connection.source() == connection.target() {
                break;
            }
        }

        if connection.source() == connection.target() {
            collector.emit(ValidationError::SelfLoop {
                index,
                id: connection.source().to_string(),
            });
        }
    }
}

fn check_geometry(model: &DiagramModel, collector: &mut Collector) {
    let canvas = model.canvas_bounds();
    let placements = model
        .components()
        .iter()
        .map(|component| (component.id(), component.position()))
        .chain(
            model
                .containers()
                .iter()
                .map(|container| (container.id(), container.geometry())),
        );

    for (id, bounds) in placements {
        match bounds {
            None => collector.emit(ValidationError::Unpositioned { id: id.to_string() }),
            Some(bounds)
                if bounds.width() < 0.0 || bounds.height() < 0.0 || !canvas.contains(&bounds) =>
            {
                collector.emit(ValidationError::out_of_bounds(
                    id,
                    bounds,
                    model.canvas_size(),
                ));
            }
            Some(_) => {}
        }
    }
}

fn check_colors(model: &DiagramModel, collector: &mut Collector) {
    let mut check = |owner: String, field: &'static str, value: &str| {
        if !is_hex_color(value) {
            collector.emit(ValidationError::InvalidColor {
                owner,
                field,
                value: value.to_string(),
            });
        }
    };

    for component in model.components() {
        for (field, value) in component.style().colors() {
            check(component.id().to_string(), field, value);
        }
    }
    for container in model.containers() {
        for (field, value) in container.style().colors() {
            check(container.id().to_string(), field, value);
        }
    }
    for connection in model.connections() {
        for (field, value) in connection.style().colors() {
            check(connection.to_string(), field, value);
        }
    }
}

fn check_containment(model: &DiagramModel, collector: &mut Collector) {
    let tree = ContainmentTree::from_model(model);

    let parents = model
        .components()
        .iter()
        .map(|component| (component.id(), component.parent()))
        .chain(
            model
                .containers()
                .iter()
                .map(|container| (container.id(), container.parent())),
        );
    for (id, parent) in parents {
        if let Some(parent) = parent.filter(|&parent| !tree.contains(parent)) {
            collector.emit(ValidationError::UnknownParent {
                id: id.to_string(),
                parent: parent.to_string(),
            });
        }
    }

    for id in tree.cycle_members() {
        collector.emit(ValidationError::ContainmentCycle { id: id.to_string() });
    }
}

#[cfg(test)]
mod tests {
    use stratus_core::model::{
        Component, ComponentKind, Connection, Container, EdgeStyle, LayoutKind, NodeStyle,
    };

    use super::*;

    fn placed(id: &str, kind: ComponentKind) -> Component {
        Component::new(Id::new(id), id, kind).with_position(Bounds::new(10.0, 10.0, 100.0, 50.0))
    }

    fn canvas() -> DiagramModel {
        DiagramModel::new("test", Size::new(800.0, 600.0), LayoutKind::None)
    }

    fn names(report: &ValidationReport) -> Vec<&'static str> {
        report.errors().iter().map(ValidationError::name).collect()
    }

    #[test]
    fn test_valid_model() {
        let model = canvas()
            .with_component(placed("a", ComponentKind::Database))
            .with_component(placed("b", ComponentKind::Compute))
            .with_connection(Connection::new(Id::new("b"), Id::new("a")));

        let report = validate(&model);
        assert!(report.is_valid());
        assert!(report.messages().is_empty());
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn test_empty_model_is_valid() {
        assert!(validate(&canvas()).is_valid());
    }

    #[test]
    fn test_duplicate_ids_listed_once() {
        let model = canvas()
            .with_component(placed("a", ComponentKind::Generic))
            .with_component(placed("a", ComponentKind::Generic))
            .with_component(placed("a", ComponentKind::Generic))
            .with_container(
                Container::new(Id::new("b"), "b").with_geometry(Bounds::new(0.0, 0.0, 10.0, 10.0)),
            )
            .with_component(placed("b", ComponentKind::Generic));

        let report = validate(&model);
        assert_eq!(
            report.errors(),
            &[
                ValidationError::DuplicateId {
                    id: "a".to_string(),
                    count: 3
                },
                ValidationError::DuplicateId {
                    id: "b".to_string(),
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn test_reserved_id() {
        let report = validate(&canvas().with_component(placed("1", ComponentKind::Generic)));
        assert_eq!(names(&report), vec!["ReservedIdError"]);
    }

    #[test]
    fn test_dangling_connection() {
        let model = canvas()
            .with_component(placed("a", ComponentKind::Generic))
            .with_connection(Connection::new(Id::new("a"), Id::new("ghost")));

        let report = validate(&model);
        assert_eq!(
            report.errors(),
            &[ValidationError::DanglingConnection {
                index: 0,
                connection: "a -> ghost".to_string(),
                missing: "ghost".to_string(),
            }]
        );
        assert!(report.messages()[0].contains("ghost"));
    }

    #[test]
    fn test_self_loop() {
        let model = canvas()
            .with_component(placed("a", ComponentKind::Generic))
            .with_connection(Connection::new(Id::new("a"), Id::new("a")));

        assert_eq!(names(&validate(&model)), vec!["SelfLoopError"]);
    }

    #[test]
    fn test_self_loop_on_missing_component_reports_once() {
        let model = canvas().with_connection(Connection::new(Id::new("x"), Id::new("x")));

        assert_eq!(
            names(&validate(&model)),
            vec!["DanglingConnectionError", "SelfLoopError"]
        );
    }

    #[test]
    fn test_out_of_bounds() {
        let model = canvas()
            .with_component(
                Component::new(Id::new("far"), "far", ComponentKind::Generic)
                    .with_position(Bounds::new(900.0, 100.0, 50.0, 50.0)),
            )
            .with_component(
                Component::new(Id::new("neg"), "neg", ComponentKind::Generic)
                    .with_position(Bounds::new(-1.0, 100.0, 50.0, 50.0)),
            )
            .with_component(Component::new(Id::new("nowhere"), "nowhere", ComponentKind::Generic));

        let report = validate(&model);
        assert_eq!(report.errors().len(), 3);
        assert!(
            report
                .errors()
                .iter()
                .all(|err| err.name() == "OutOfBoundsError")
        );
        assert!(report.messages()[0].contains("far"));
        assert_eq!(
            report.errors()[2],
            ValidationError::Unpositioned {
                id: "nowhere".to_string()
            }
        );
    }

    #[test]
    fn test_edge_touching_canvas_is_in_bounds() {
        let model = canvas().with_component(
            Component::new(Id::new("corner"), "corner", ComponentKind::Generic)
                .with_position(Bounds::new(700.0, 500.0, 100.0, 100.0)),
        );
        assert!(validate(&model).is_valid());
    }

    #[test]
    fn test_invalid_colors() {
        let model = canvas()
            .with_component(
                placed("a", ComponentKind::Generic)
                    .with_style(NodeStyle::default().with_fill_color("orange")),
            )
            .with_component(placed("b", ComponentKind::Generic))
            .with_connection(
                Connection::new(Id::new("a"), Id::new("b"))
                    .with_style(EdgeStyle::default().with_stroke_color("#F90")),
            );

        let report = validate(&model);
        assert_eq!(
            report.errors(),
            &[
                ValidationError::InvalidColor {
                    owner: "a".to_string(),
                    field: "fill_color",
                    value: "orange".to_string(),
                },
                ValidationError::InvalidColor {
                    owner: "a -> b".to_string(),
                    field: "stroke_color",
                    value: "#F90".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_containment_errors() {
        let geometry = Bounds::new(0.0, 0.0, 100.0, 100.0);
        let model = canvas()
            .with_container(
                Container::new(Id::new("a"), "a")
                    .with_geometry(geometry)
                    .with_parent(Id::new("b")),
            )
            .with_container(
                Container::new(Id::new("b"), "b")
                    .with_geometry(geometry)
                    .with_parent(Id::new("a")),
            )
            .with_component(placed("c", ComponentKind::Generic).with_parent(Id::new("vpc")));

        let report = validate(&model);
        assert_eq!(
            names(&report),
            vec![
                "UnknownParentError",
                "ContainmentCycleError",
                "ContainmentCycleError"
            ]
        );
    }

    #[test]
    fn test_all_errors_collected() {
        let model = canvas()
            .with_component(placed("a", ComponentKind::Generic))
            .with_component(placed("a", ComponentKind::Generic))
            .with_connection(Connection::new(Id::new("a"), Id::new("a")))
            .with_connection(Connection::new(Id::new("a"), Id::new("z")));

        let report = validate(&model);
        assert_eq!(
            names(&report),
            vec!["DuplicateIdError", "SelfLoopError", "DanglingConnectionError"]
        );
        assert!(matches!(
            report.into_result(),
            Err(StratusError::Validation(report)) if report.errors().len() == 3
        ));
    }
}
