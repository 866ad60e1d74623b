//! SVG renderer.
//!
//! Draws the positioned model with the `svg` crate: containers first (parents
//! below their children), then connections, then components on top. The
//! document is also the input of the PNG renderer.

mod arrows;

use log::{debug, info, trace};
use svg::{
    Document,
    node::{Text as SvgText, element as svg_element},
};

use stratus_core::{
    color::Color,
    geometry::{Bounds, Point},
    identifier::Id,
    model::{Component, Connection, Container, DiagramModel, NodeStyle},
};

use crate::{
    config::StyleConfig,
    export::{Error, Exporter, Format},
    structure::ContainmentTree,
};

const LINE_SPACING: f32 = 1.2;
const CONTAINER_LABEL_INSET: f32 = 8.0;
const EDGE_LABEL_FONT_SIZE: f32 = 11.0;

/// Renders a [`DiagramModel`] as an SVG document.
#[derive(Debug, Clone)]
pub struct SvgExporter {
    background: Option<Color>,
    font_family: String,
}

impl Default for SvgExporter {
    fn default() -> Self {
        Self {
            background: None,
            font_family: "Helvetica".to_string(),
        }
    }
}

impl SvgExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an exporter from the `[style]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns the color parse error when the background color is malformed.
    pub fn from_style(style: &StyleConfig) -> Result<Self, String> {
        Ok(Self {
            background: style.background_color()?,
            font_family: style.font_family().to_string(),
        })
    }

    pub fn with_background(mut self, background: Option<Color>) -> Self {
        self.background = background;
        self
    }

    pub fn with_font_family(mut self, font_family: impl Into<String>) -> Self {
        self.font_family = font_family.into();
        self
    }

    /// Render the model to SVG text.
    pub fn render_svg(&self, model: &DiagramModel) -> String {
        self.document(model).to_string()
    }

    /// Build the SVG document for the model.
    pub fn document(&self, model: &DiagramModel) -> Document {
        info!(name = model.name(); "Rendering SVG");

        let canvas = model.canvas_size();
        let mut doc = Document::new()
            .set(
                "viewBox",
                format!("0 0 {} {}", canvas.width(), canvas.height()),
            )
            .set("width", canvas.width())
            .set("height", canvas.height());

        if let Some(background) = &self.background {
            doc = doc.add(
                svg_element::Rectangle::new()
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", canvas.width())
                    .set("height", canvas.height())
                    .set("fill", background.to_string())
                    .set("fill-opacity", background.alpha()),
            );
        }

        let edge_colors: Vec<Color> = model
            .connections()
            .iter()
            .map(|connection| edge_color(connection))
            .collect();
        doc = doc.add(arrows::create_marker_definitions(edge_colors.iter()));

        let tree = ContainmentTree::from_model(model);
        let mut containers = tree.post_order();
        containers.reverse();
        let mut container_layer = svg_element::Group::new().set("class", "containers");
        for id in containers {
            if let Some(container) = model.container(id) {
                if let Some(group) = self.draw_container(container) {
                    container_layer = container_layer.add(group);
                }
            }
        }

        let mut edge_layer = svg_element::Group::new().set("class", "connections");
        for (connection, color) in model.connections().iter().zip(&edge_colors) {
            if let Some(group) = self.draw_connection(model, connection, color) {
                edge_layer = edge_layer.add(group);
            }
        }

        let mut node_layer = svg_element::Group::new().set("class", "components");
        for component in model.components() {
            if let Some(group) = self.draw_component(component) {
                node_layer = node_layer.add(group);
            }
        }

        debug!(
            containers = model.containers().len(),
            components = model.components().len(),
            connections = model.connections().len();
            "SVG elements drawn"
        );
        doc.add(container_layer).add(edge_layer).add(node_layer)
    }

    fn draw_container(&self, container: &Container) -> Option<svg_element::Group> {
        let Some(bounds) = container.geometry() else {
            trace!(id = container.id().to_string(); "Skipping unpositioned container");
            return None;
        };
        let style = container.style();

        let mut group = svg_element::Group::new()
            .set("id", container.id().to_string())
            .add(shape(bounds, style, 4.0).set("stroke-dasharray", "8 4"));
        if !container.label().is_empty() {
            let anchor = Point::new(
                bounds.min_x() + CONTAINER_LABEL_INSET,
                bounds.min_y() + CONTAINER_LABEL_INSET + style.font_size() / 2.0,
            );
            group = group.add(
                self.text(container.label(), anchor, style.font_size(), font_color(style))
                    .set("text-anchor", "start")
                    .set("font-weight", "bold"),
            );
        }
        Some(group)
    }

    fn draw_component(&self, component: &Component) -> Option<svg_element::Group> {
        let Some(bounds) = component.position() else {
            trace!(id = component.id().to_string(); "Skipping unpositioned component");
            return None;
        };
        let style = component.style();

        let group = svg_element::Group::new()
            .set("id", component.id().to_string())
            .set("class", component.kind().to_string())
            .add(shape(bounds, style, 6.0))
            .add(self.text(
                component.label(),
                bounds.center(),
                style.font_size(),
                font_color(style),
            ));
        Some(group)
    }

    fn draw_connection(
        &self,
        model: &DiagramModel,
        connection: &Connection,
        color: &Color,
    ) -> Option<svg_element::Group> {
        let source = element_bounds(model, connection.source())?;
        let target = element_bounds(model, connection.target())?;
        let style = connection.style();

        let Some((path, start, end)) =
            arrows::create_path(source, target, color, style.stroke_width(), style.is_dashed())
        else {
            trace!(connection = connection.to_string(); "Skipping degenerate connection");
            return None;
        };

        let mut group = svg_element::Group::new().add(path);
        if let Some(label) = connection.label().filter(|label| !label.is_empty()) {
            let color = Color::new_or(style.font_color(), Color::default());
            group = group.add(self.text(label, start.midpoint(end), EDGE_LABEL_FONT_SIZE, color));
        }
        Some(group)
    }

    /// Multi-line text centered on `anchor`.
    fn text(&self, content: &str, anchor: Point, font_size: f32, color: Color) -> svg_element::Text {
        let lines: Vec<&str> = content.lines().collect();
        let line_height = font_size * LINE_SPACING;
        let y_offset = -(lines.len() as f32 + 1.0) * line_height / 2.0;

        let mut text = svg_element::Text::new("")
            .set("x", anchor.x())
            .set("y", anchor.y() + y_offset)
            .set("text-anchor", "middle")
            .set("dominant-baseline", "central")
            .set("font-family", self.font_family.as_str())
            .set("font-size", font_size)
            .set("fill", color.to_string())
            .set("fill-opacity", color.alpha());

        for line in lines {
            let tspan = svg_element::TSpan::new("")
                .set("x", anchor.x())
                .set("dy", line_height)
                .add(SvgText::new(line));
            text = text.add(tspan);
        }
        text
    }
}

impl Exporter for SvgExporter {
    fn format(&self) -> Format {
        Format::Svg
    }

    fn render(&self, model: &DiagramModel) -> Result<Vec<u8>, Error> {
        Ok(self.render_svg(model).into_bytes())
    }
}

fn shape(bounds: Bounds, style: &NodeStyle, radius: f32) -> svg_element::Rectangle {
    let fill = Color::new_or(style.fill_color(), Color::default());
    let stroke = Color::new_or(style.stroke_color(), Color::default());

    svg_element::Rectangle::new()
        .set("x", bounds.min_x())
        .set("y", bounds.min_y())
        .set("width", bounds.width())
        .set("height", bounds.height())
        .set("rx", radius)
        .set("fill", fill.to_string())
        .set("fill-opacity", fill.alpha())
        .set("stroke", stroke.to_string())
        .set("stroke-opacity", stroke.alpha())
        .set("stroke-width", style.stroke_width())
}

fn font_color(style: &NodeStyle) -> Color {
    Color::new_or(style.font_color(), Color::default())
}

fn edge_color(connection: &Connection) -> Color {
    Color::new_or(connection.style().stroke_color(), Color::default())
}

/// Rectangle of the component or container with the given id.
fn element_bounds(model: &DiagramModel, id: Id) -> Option<Bounds> {
    model
        .component(id)
        .and_then(Component::position)
        .or_else(|| model.container(id).and_then(Container::geometry))
}
