//! Markdown renderer with an embedded Mermaid flowchart.
//!
//! The document has a heading, a ```` ```mermaid ```` `flowchart TD` block
//! and a component inventory table. Mermaid node ids are generated (`n0`,
//! `n1`, ... and `g0`, ... for containers) so user ids never need quoting;
//! labels are always quoted with Mermaid entity escapes.

use std::{
    collections::{HashMap, HashSet},
    fmt::Write,
};

use log::info;

use stratus_core::{
    identifier::Id,
    model::{Container, DiagramModel},
};

use crate::{
    export::{Error, Exporter, Format},
    structure::ContainmentTree,
};

/// Renders a [`DiagramModel`] as Markdown.
#[derive(Debug, Default, Clone)]
pub struct MarkdownExporter;

impl MarkdownExporter {
    pub fn new() -> Self {
        Self
    }

    /// Render the model to Markdown text.
    pub fn render_markdown(&self, model: &DiagramModel) -> String {
        info!(name = model.name(); "Rendering Markdown");

        let ids = MermaidIds::new(model);
        let scopes = Scopes::new(model);
        let mut out = String::new();

        let _ = writeln!(out, "# {}\n", single_line(model.name()));
        out.push_str("```mermaid\nflowchart TD\n");

        self.write_scope(&mut out, model, &scopes, &ids, None, 1);

        for connection in model.connections() {
            let source = ids.node(connection.source());
            let target = ids.node(connection.target());
            let arrow = if connection.style().is_dashed() {
                "-.->"
            } else {
                "-->"
            };
            match connection.label().filter(|label| !label.is_empty()) {
                Some(label) => {
                    let _ = writeln!(
                        out,
                        "    {source} {arrow}|\"{}\"| {target}",
                        mermaid_label(label)
                    );
                }
                None => {
                    let _ = writeln!(out, "    {source} {arrow} {target}");
                }
            }
        }
        out.push_str("```\n\n");

        out.push_str("## Components\n\n");
        out.push_str("| Id | Name | Kind | Container |\n");
        out.push_str("|----|------|------|-----------|\n");
        for component in model.components() {
            let container = component
                .parent()
                .and_then(|parent| model.container(parent))
                .map(Container::label)
                .unwrap_or("");
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} |",
                table_cell(&component.id().to_string()),
                table_cell(component.name()),
                component.kind(),
                table_cell(container),
            );
        }

        out
    }

    /// Writes the containers and components directly inside `scope`.
    fn write_scope(
        &self,
        out: &mut String,
        model: &DiagramModel,
        scopes: &Scopes,
        ids: &MermaidIds,
        scope: Option<Id>,
        depth: usize,
    ) {
        let indent = "    ".repeat(depth);

        for container in model.containers() {
            if scopes.container_parent(container) != scope {
                continue;
            }
            let _ = writeln!(
                out,
                "{indent}subgraph {}[\"{}\"]",
                ids.group(container.id()),
                mermaid_label(container.label())
            );
            self.write_scope(out, model, scopes, ids, Some(container.id()), depth + 1);
            let _ = writeln!(out, "{indent}end");
        }

        for component in model.components() {
            if scopes.placed(component.parent()) != scope {
                continue;
            }
            let _ = writeln!(
                out,
                "{indent}{}[\"{}\"]",
                ids.node(component.id()),
                mermaid_label(component.label())
            );
        }
    }
}

impl Exporter for MarkdownExporter {
    fn format(&self) -> Format {
        Format::Markdown
    }

    fn render(&self, model: &DiagramModel) -> Result<Vec<u8>, Error> {
        Ok(self.render_markdown(model).into_bytes())
    }
}

/// Decides which subgraph each element is drawn in.
///
/// Parents that name no container, or that sit on a containment cycle, are
/// ignored so every element is drawn exactly once.
struct Scopes {
    tree: ContainmentTree,
    cyclic: HashSet<Id>,
}

impl Scopes {
    fn new(model: &DiagramModel) -> Self {
        let tree = ContainmentTree::from_model(model);
        let cyclic = tree.cycle_members().into_iter().collect();
        Self { tree, cyclic }
    }

    fn placed(&self, parent: Option<Id>) -> Option<Id> {
        parent.filter(|parent| self.tree.contains(*parent) && !self.cyclic.contains(parent))
    }

    fn container_parent(&self, container: &Container) -> Option<Id> {
        if self.cyclic.contains(&container.id()) {
            None
        } else {
            self.placed(container.parent())
        }
    }
}

/// Generated Mermaid identifiers for components and containers.
struct MermaidIds {
    nodes: HashMap<Id, String>,
    groups: HashMap<Id, String>,
}

impl MermaidIds {
    fn new(model: &DiagramModel) -> Self {
        let nodes = model
            .components()
            .iter()
            .enumerate()
            .map(|(idx, component)| (component.id(), format!("n{idx}")))
            .collect();
        let groups = model
            .containers()
            .iter()
            .enumerate()
            .map(|(idx, container)| (container.id(), format!("g{idx}")))
            .collect();
        Self { nodes, groups }
    }

    /// Node id of a component. Unknown endpoints get a stable placeholder.
    fn node(&self, id: Id) -> String {
        self.nodes
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("missing_{}", sanitize(&id.to_string())))
    }

    fn group(&self, id: Id) -> &str {
        self.groups.get(&id).map(String::as_str).unwrap_or("g")
    }
}

/// Escapes a label for use inside a quoted Mermaid label.
fn mermaid_label(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut lines = text.lines().peekable();
    while let Some(line) = lines.next() {
        for ch in line.chars() {
            match ch {
                '"' => out.push_str("#quot;"),
                '<' => out.push_str("#lt;"),
                '>' => out.push_str("#gt;"),
                '&' => out.push_str("#amp;"),
                '#' => out.push_str("#35;"),
                _ => out.push(ch),
            }
        }
        if lines.peek().is_some() {
            out.push_str("<br/>");
        }
    }
    out
}

fn table_cell(text: &str) -> String {
    single_line(text).replace('|', "\\|")
}

fn single_line(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join(" ")
}

fn sanitize(text: &str) -> String {
    text.chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect()
}
