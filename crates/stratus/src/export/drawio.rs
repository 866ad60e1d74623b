//! Draw.io (mxGraph) XML renderer.
//!
//! The document always starts with the two bootstrap cells Draw.io expects
//! (`0`, and `1` parented to `0`). Containers follow as vertex cells marked
//! `container=1`, parents before children, then one vertex cell per
//! component and one edge cell per connection. A labelled connection gets an
//! extra `edgeLabel` cell parented to its edge.
//!
//! Geometry of a cell nested in a container is relative to that container,
//! as the format requires. Vertex cells use the model ids; edge ids are
//! generated so they never collide with them.

use std::collections::HashSet;

use log::{debug, info};

use stratus_core::{
    geometry::{Bounds, Point},
    identifier::Id,
    model::{Component, Connection, Container, DiagramModel},
};

use crate::{
    export::{Error, Exporter, Format, xml::XmlWriter},
    structure::ContainmentTree,
};

const ROOT_ID: &str = "0";
const LAYER_ID: &str = "1";

/// Renders a [`DiagramModel`] as a `.drawio` document.
#[derive(Debug, Default, Clone)]
pub struct DrawioExporter;

impl DrawioExporter {
    pub fn new() -> Self {
        Self
    }

    /// Render the model to XML text.
    pub fn render_xml(&self, model: &DiagramModel) -> String {
        info!(name = model.name(); "Rendering Draw.io XML");

        let tree = ContainmentTree::from_model(model);
        let mut edge_ids = EdgeIds::new(model);
        let canvas = model.canvas_size();
        let page_width = canvas.width().to_string();
        let page_height = canvas.height().to_string();

        let mut writer = XmlWriter::new();
        writer.open("mxfile", &[("host", "stratus"), ("type", "device")]);
        writer.open("diagram", &[("id", "stratus-diagram"), ("name", model.name())]);
        writer.open(
            "mxGraphModel",
            &[
                ("grid", "1"),
                ("gridSize", "10"),
                ("guides", "1"),
                ("tooltips", "1"),
                ("connect", "1"),
                ("arrows", "1"),
                ("fold", "1"),
                ("page", "1"),
                ("pageScale", "1"),
                ("pageWidth", page_width.as_str()),
                ("pageHeight", page_height.as_str()),
                ("math", "0"),
                ("shadow", "0"),
            ],
        );
        writer.open("root", &[]);
        writer.empty("mxCell", &[("id", ROOT_ID)]);
        writer.empty("mxCell", &[("id", LAYER_ID), ("parent", ROOT_ID)]);

        let mut containers = tree.post_order();
        containers.reverse();
        for id in containers {
            if let Some(container) = model.container(id) {
                write_container(&mut writer, model, &tree, container);
            }
        }

        for component in model.components() {
            write_component(&mut writer, model, &tree, component);
        }

        for connection in model.connections() {
            let (edge_id, label_id) = edge_ids.allocate();
            write_connection(&mut writer, connection, &edge_id, &label_id);
        }

        debug!(
            vertices = model.components().len() + model.containers().len(),
            edges = model.connections().len();
            "Draw.io cells written"
        );
        writer.finish()
    }
}

impl Exporter for DrawioExporter {
    fn format(&self) -> Format {
        Format::Drawio
    }

    fn render(&self, model: &DiagramModel) -> Result<Vec<u8>, Error> {
        Ok(self.render_xml(model).into_bytes())
    }
}

/// Generates `edge-N` / `edge-N-label` pairs that avoid every vertex id.
struct EdgeIds {
    taken: HashSet<String>,
    next: usize,
}

impl EdgeIds {
    fn new(model: &DiagramModel) -> Self {
        let taken = model
            .components()
            .iter()
            .map(Component::id)
            .chain(model.containers().iter().map(Container::id))
            .map(|id| id.to_string())
            .chain([ROOT_ID.to_string(), LAYER_ID.to_string()])
            .collect();
        Self { taken, next: 1 }
    }

    fn allocate(&mut self) -> (String, String) {
        loop {
            let edge = format!("edge-{}", self.next);
            let label = format!("{edge}-label");
            self.next += 1;
            if !self.taken.contains(&edge) && !self.taken.contains(&label) {
                self.taken.insert(edge.clone());
                self.taken.insert(label.clone());
                return (edge, label);
            }
        }
    }
}

/// Parent cell id and the offset child geometry is relative to.
fn parent_frame(
    model: &DiagramModel,
    tree: &ContainmentTree,
    parent: Option<Id>,
) -> (String, Point) {
    match parent.filter(|&parent| tree.contains(parent)) {
        Some(parent) => {
            let origin = model
                .container(parent)
                .and_then(Container::geometry)
                .map(Bounds::min_point)
                .unwrap_or_default();
            (parent.to_string(), origin)
        }
        None => (LAYER_ID.to_string(), Point::default()),
    }
}

fn write_container(
    writer: &mut XmlWriter,
    model: &DiagramModel,
    tree: &ContainmentTree,
    container: &Container,
) {
    // A container listing itself as parent is drawn at the top level.
    let parent = container.parent().filter(|&parent| parent != container.id());
    let (parent_id, origin) = parent_frame(model, tree, parent);
    let style = container_style(container);
    let id = container.id().to_string();

    writer.open(
        "mxCell",
        &[
            ("id", id.as_str()),
            ("value", container.label()),
            ("style", style.as_str()),
            ("vertex", "1"),
            ("parent", parent_id.as_str()),
        ],
    );
    write_geometry(writer, container.geometry().unwrap_or_default(), origin);
    writer.close();
}

fn write_component(
    writer: &mut XmlWriter,
    model: &DiagramModel,
    tree: &ContainmentTree,
    component: &Component,
) {
    let (parent_id, origin) = parent_frame(model, tree, component.parent());
    let style = component_style(component);
    let id = component.id().to_string();

    writer.open(
        "mxCell",
        &[
            ("id", id.as_str()),
            ("value", component.label()),
            ("style", style.as_str()),
            ("vertex", "1"),
            ("parent", parent_id.as_str()),
        ],
    );
    write_geometry(writer, component.position().unwrap_or_default(), origin);
    writer.close();
}

fn write_connection(
    writer: &mut XmlWriter,
    connection: &Connection,
    edge_id: &str,
    label_id: &str,
) {
    let source = connection.source().to_string();
    let target = connection.target().to_string();
    let edge_style = edge_style(connection);

    writer.open(
        "mxCell",
        &[
            ("id", edge_id),
            ("value", ""),
            ("style", edge_style.as_str()),
            ("edge", "1"),
            ("parent", LAYER_ID),
            ("source", source.as_str()),
            ("target", target.as_str()),
        ],
    );
    writer.empty("mxGeometry", &[("relative", "1"), ("as", "geometry")]);
    writer.close();

    let Some(label) = connection.label() else {
        return;
    };
    let label_style = format!(
        "edgeLabel;resizable=0;align=center;verticalAlign=middle;labelBackgroundColor=#FFFFFF;fontColor={};",
        style_value(connection.style().font_color())
    );
    writer.open(
        "mxCell",
        &[
            ("id", label_id),
            ("value", label),
            ("style", label_style.as_str()),
            ("vertex", "1"),
            ("connectable", "0"),
            ("parent", edge_id),
        ],
    );
    writer.open("mxGeometry", &[("relative", "1"), ("as", "geometry")]);
    writer.empty("mxPoint", &[("as", "offset")]);
    writer.close();
    writer.close();
}

fn write_geometry(writer: &mut XmlWriter, bounds: Bounds, origin: Point) {
    let relative = bounds.inverse_translate(origin);
    let x = relative.min_x().to_string();
    let y = relative.min_y().to_string();
    let width = relative.width().to_string();
    let height = relative.height().to_string();

    writer.empty(
        "mxGeometry",
        &[
            ("x", x.as_str()),
            ("y", y.as_str()),
            ("width", width.as_str()),
            ("height", height.as_str()),
            ("as", "geometry"),
        ],
    );
}

/// Keeps a value from breaking out of its `key=value;` slot.
fn style_value(value: &str) -> String {
    value.replace([';', '='], "")
}

fn component_style(component: &Component) -> String {
    let style = component.style();
    let colors = format!(
        "fillColor={};strokeColor={};fontColor={};strokeWidth={};fontSize={};",
        style_value(style.fill_color()),
        style_value(style.stroke_color()),
        style_value(style.font_color()),
        style.stroke_width(),
        style.font_size(),
    );

    match component.icon() {
        Some(icon) => format!(
            "sketch=0;outlineConnect=0;gradientColor=none;dashed=0;whiteSpace=wrap;\
             verticalLabelPosition=bottom;verticalAlign=top;align=center;aspect=fixed;\
             shape=mxgraph.aws4.resourceIcon;resIcon={};{colors}",
            style_value(icon)
        ),
        None => format!("rounded=1;whiteSpace=wrap;arcSize=10;{colors}"),
    }
}

fn container_style(container: &Container) -> String {
    let style = container.style();
    format!(
        "container=1;collapsible=0;rounded=0;whiteSpace=wrap;verticalAlign=top;align=left;\
         spacingLeft=10;fillColor={};strokeColor={};fontColor={};strokeWidth={};fontSize={};",
        style_value(style.fill_color()),
        style_value(style.stroke_color()),
        style_value(style.font_color()),
        style.stroke_width(),
        style.font_size(),
    )
}

fn edge_style(connection: &Connection) -> String {
    let style = connection.style();
    format!(
        "edgeStyle=orthogonalEdgeStyle;rounded=0;orthogonalLoop=1;endArrow=classic;\
         strokeColor={};strokeWidth={};fontColor={};dashed={};",
        style_value(style.stroke_color()),
        style.stroke_width(),
        style_value(style.font_color()),
        u8::from(style.is_dashed()),
    )
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use stratus_core::{
        geometry::Size,
        model::{ComponentKind, LayoutKind},
    };

    use super::*;

    const LABEL: &str = "[a-zA-Z0-9 &<>\"'\n\r\t;=]{0,24}";

    type Connections = Vec<(usize, usize, Option<String>)>;

    /// Component labels plus connections between distinct components.
    fn model_strategy() -> impl Strategy<Value = (Vec<String>, Connections)> {
        prop::collection::vec(LABEL, 2..7).prop_flat_map(|labels| {
            let count = labels.len();
            let connections =
                prop::collection::vec((0..count, 1..count, prop::option::of(LABEL)), 0..8)
                    .prop_map(move |raw| {
                        raw.into_iter()
                            .map(|(source, step, label)| (source, (source + step) % count, label))
                            .collect::<Connections>()
                    });
            (Just(labels), connections)
        })
    }

    fn build_model(labels: &[String], connections: &Connections) -> DiagramModel {
        let mut model = DiagramModel::new("Round trip", Size::new(800.0, 600.0), LayoutKind::None);
        for (idx, label) in labels.iter().enumerate() {
            let id = format!("c{idx}");
            model = model.with_component(
                Component::new(Id::new(&id), &id, ComponentKind::Generic)
                    .with_label(label.as_str())
                    .with_position(Bounds::new(idx as f32 * 20.0, 0.0, 10.0, 10.0)),
            );
        }
        for (source, target, label) in connections {
            let connection = Connection::new(
                Id::new(&format!("c{source}")),
                Id::new(&format!("c{target}")),
            );
            model = model.with_connection(match label {
                Some(label) => connection.with_label(label.as_str()),
                None => connection,
            });
        }
        model
    }

    /// Every component and connection comes back from the XML with its text intact.
    fn check_render_parse_round_trip(
        labels: &[String],
        connections: &Connections,
    ) -> Result<(), TestCaseError> {
        let xml = DrawioExporter::new().render_xml(&build_model(labels, connections));
        let doc = roxmltree::Document::parse(&xml)
            .map_err(|err| TestCaseError::fail(format!("{err}: {xml}")))?;

        let cells: Vec<_> = doc
            .descendants()
            .filter(|node| node.has_tag_name("mxCell"))
            .collect();
        let is_label_cell = |node: &roxmltree::Node| {
            node.attribute("style")
                .is_some_and(|style| style.starts_with("edgeLabel;"))
        };

        let vertices: Vec<_> = cells
            .iter()
            .filter(|node| node.attribute("vertex") == Some("1") && !is_label_cell(node))
            .collect();
        prop_assert_eq!(vertices.len(), labels.len());
        for (vertex, label) in vertices.iter().zip(labels) {
            prop_assert_eq!(vertex.attribute("value"), Some(label.as_str()));
        }

        let edges: Vec<_> = cells
            .iter()
            .filter(|node| node.attribute("edge") == Some("1"))
            .collect();
        prop_assert_eq!(edges.len(), connections.len());
        for (edge, (source, target, label)) in edges.iter().zip(connections) {
            let source_id = format!("c{source}");
            let target_id = format!("c{target}");
            prop_assert_eq!(edge.attribute("source"), Some(source_id.as_str()));
            prop_assert_eq!(edge.attribute("target"), Some(target_id.as_str()));

            // Empty labels are not drawn.
            let expected = label.as_deref().filter(|label| !label.is_empty());
            let label_cell = cells.iter().find(|node| {
                is_label_cell(node) && node.attribute("parent") == edge.attribute("id")
            });
            prop_assert_eq!(label_cell.and_then(|node| node.attribute("value")), expected);
        }

        let label_cells = cells.iter().filter(|node| is_label_cell(node)).count();
        let drawn_labels = connections
            .iter()
            .filter(|(_, _, label)| label.as_deref().is_some_and(|label| !label.is_empty()))
            .count();
        prop_assert_eq!(label_cells, drawn_labels);
        prop_assert_eq!(cells.len(), 2 + labels.len() + connections.len() + drawn_labels);
        Ok(())
    }

    proptest! {
        #[test]
        fn render_parse_round_trip((labels, connections) in model_strategy()) {
            check_render_parse_round_trip(&labels, &connections)?;
        }
    }
}
