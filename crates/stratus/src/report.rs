//! Plain-text summaries of a diagram model.
//!
//! Each [`Section`] renders independently so the CLI can print any subset.

use std::{
    fmt::{self, Display, Write},
    str::FromStr,
};

use indexmap::IndexMap;

use stratus_core::model::{Component, ComponentKind, DiagramModel};

/// A report section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// Components grouped by kind.
    Inventory,
    /// Every connection with its label.
    Connections,
    /// Components by hierarchical layer.
    Layers,
}

impl Section {
    pub const ALL: [Section; 3] = [Self::Inventory, Self::Connections, Self::Layers];
}

impl FromStr for Section {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inventory" => Ok(Self::Inventory),
            "connections" => Ok(Self::Connections),
            "layers" => Ok(Self::Layers),
            _ => Err("Unsupported report section, expected one of: inventory, connections, layers"),
        }
    }
}

impl From<Section> for &'static str {
    fn from(val: Section) -> Self {
        match val {
            Section::Inventory => "inventory",
            Section::Connections => "connections",
            Section::Layers => "layers",
        }
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// Render the given sections, separated by blank lines.
///
/// # Examples
///
/// ```
/// use stratus::report::{Section, render};
/// use stratus_core::{geometry::Size, model::{DiagramModel, LayoutKind}};
///
/// let model = DiagramModel::new("empty", Size::new(100.0, 100.0), LayoutKind::Grid);
/// let text = render(&model, &[Section::Connections]);
/// assert!(text.starts_with("Connections (0)"));
/// ```
pub fn render(model: &DiagramModel, sections: &[Section]) -> String {
    sections
        .iter()
        .map(|section| render_section(model, *section))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a single section.
pub fn render_section(model: &DiagramModel, section: Section) -> String {
    match section {
        Section::Inventory => inventory(model),
        Section::Connections => connections(model),
        Section::Layers => layers(model),
    }
}

fn inventory(model: &DiagramModel) -> String {
    let mut by_kind: IndexMap<ComponentKind, Vec<&Component>> = ComponentKind::ALL
        .into_iter()
        .map(|kind| (kind, Vec::new()))
        .collect();
    for component in model.components() {
        by_kind.entry(component.kind()).or_default().push(component);
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Inventory ({} components, {} containers)",
        model.components().len(),
        model.containers().len()
    );
    for (kind, components) in by_kind.iter().filter(|(_, list)| !list.is_empty()) {
        let _ = writeln!(out, "  {kind} ({})", components.len());
        for component in components {
            let _ = write!(out, "    {}: {}", component.id(), first_line(component.label()));
            if let Some(container) = component.parent().and_then(|id| model.container(id)) {
                let _ = write!(out, " [{}]", first_line(container.label()));
            }
            out.push('\n');
        }
    }
    out
}

fn connections(model: &DiagramModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Connections ({})", model.connections().len());
    for connection in model.connections() {
        let _ = write!(out, "  {connection}");
        if let Some(label) = connection.label().filter(|label| !label.is_empty()) {
            let _ = write!(out, " ({})", first_line(label));
        }
        if connection.style().is_dashed() {
            out.push_str(" dashed");
        }
        out.push('\n');
    }
    out
}

fn layers(model: &DiagramModel) -> String {
    let mut rows: Vec<Vec<&Component>> = vec![Vec::new(); ComponentKind::LAYER_COUNT];
    for component in model.components() {
        rows[component.kind().layer()].push(component);
    }

    let mut out = String::new();
    let _ = writeln!(out, "Layers");
    for (layer, components) in rows.iter().enumerate() {
        let names: Vec<String> = components.iter().map(|c| c.id().to_string()).collect();
        let kinds: Vec<String> = ComponentKind::ALL
            .into_iter()
            .filter(|kind| kind.layer() == layer)
            .map(|kind| kind.to_string())
            .collect();
        let members = if names.is_empty() {
            "-".to_string()
        } else {
            names.join(", ")
        };
        let _ = writeln!(out, "  {layer} {}: {members}", kinds.join("/"));
    }
    out
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use stratus_core::{
        geometry::Size,
        identifier::Id,
        model::{Connection, Container, LayoutKind},
    };

    use super::*;

    fn sample() -> DiagramModel {
        DiagramModel::new("r", Size::new(800.0, 600.0), LayoutKind::Grid)
            .with_container(Container::new(Id::new("vpc"), "VPC"))
            .with_component(
                Component::new(Id::new("web"), "web", ComponentKind::Compute)
                    .with_label("Web\n2 vCPU")
                    .with_parent(Id::new("vpc")),
            )
            .with_component(Component::new(Id::new("db"), "db", ComponentKind::Database))
            .with_connection(Connection::new(Id::new("web"), Id::new("db")).with_label("SQL"))
    }

    #[test]
    fn test_section_from_str() {
        assert_eq!("Layers".parse::<Section>(), Ok(Section::Layers));
        assert!("summary".parse::<Section>().is_err());
        for section in Section::ALL {
            assert_eq!(section.to_string().parse::<Section>(), Ok(section));
        }
    }

    #[test]
    fn test_inventory() {
        let text = render_section(&sample(), Section::Inventory);
        assert_eq!(
            text,
            "Inventory (2 components, 1 containers)\n  \
             compute (1)\n    web: Web [VPC]\n  \
             database (1)\n    db: db\n"
        );
    }

    #[test]
    fn test_connections() {
        let text = render_section(&sample(), Section::Connections);
        assert_eq!(text, "Connections (1)\n  web -> db (SQL)\n");
    }

    #[test]
    fn test_layers_list_every_row() {
        let text = render_section(&sample(), Section::Layers);
        assert_eq!(text.lines().count(), 1 + ComponentKind::LAYER_COUNT);
        assert!(text.contains("  2 compute: web\n"));
        assert!(text.contains("  3 database/storage: db\n"));
        assert!(text.contains("  4 generic: -\n"));
    }

    #[test]
    fn test_render_joins_sections() {
        let text = render(&sample(), &Section::ALL);
        assert!(text.contains("\nConnections (1)"));
        assert!(text.contains("\nLayers"));
    }
}
