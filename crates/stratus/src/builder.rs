//! Model construction from a [`ServiceCatalog`].
//!
//! The [`ModelBuilder`] turns every service entry into one [`Component`],
//! every container entry into one [`Container`] and every connection entry
//! into one [`Connection`], all in catalog order. Construction is
//! all-or-nothing: the first [`ConfigurationError`] aborts it.

use std::collections::{HashMap, HashSet};

use log::{debug, info, trace};

use stratus_core::{
    geometry::{Bounds, Size},
    identifier::Id,
    model::{
        Component, ComponentKind, Connection, Container, DiagramModel, EdgeStyle, LayoutKind,
        NodeStyle,
    },
};

use crate::{
    catalog::{ConnectionSpec, ContainerSpec, ParamValue, ServiceCatalog, ServiceParams},
    error::ConfigurationError,
};

/// Parameters with a fixed meaning; everything else is free-form and only
/// reachable from label templates.
pub const RESERVED_PARAMS: [&str; 14] = [
    "kind",
    "id",
    "label",
    "template",
    "icon",
    "x",
    "y",
    "width",
    "height",
    "fill_color",
    "stroke_color",
    "font_color",
    "stroke_width",
    "font_size",
];

const DEFAULT_COMPONENT_PREFIX: &str = "svc-";

/// Hands out sequential identifiers that never repeat a reserved one.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    prefix: String,
    next: usize,
    taken: HashSet<String>,
}

impl IdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
            taken: HashSet::new(),
        }
    }

    /// Marks `id` as used so it is never generated.
    pub fn reserve(&mut self, id: &str) {
        self.taken.insert(id.to_string());
    }

    /// Returns the next free identifier.
    pub fn next_id(&mut self) -> String {
        loop {
            let candidate = format!("{}{}", self.prefix, self.next);
            self.next += 1;
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_COMPONENT_PREFIX)
    }
}

/// Builds a [`DiagramModel`] from a [`ServiceCatalog`].
///
/// # Examples
///
/// ```
/// use stratus::{builder::ModelBuilder, catalog::ServiceCatalog};
///
/// let catalog = ServiceCatalog::from_toml_str(
///     r#"
///     [services.databases.orders-db]
///     engine = "RDS PostgreSQL"
///     instance_class = "db.r6g.large"
///     multi_az = true
///     "#,
/// ).unwrap();
///
/// let model = ModelBuilder::new().build(&catalog).unwrap();
/// assert_eq!(
///     model.components()[0].label(),
///     "RDS PostgreSQL\ndb.r6g.large\nMulti-AZ",
/// );
/// ```
#[derive(Debug, Default)]
pub struct ModelBuilder {
    ids: IdGenerator,
    layout_override: Option<LayoutKind>,
    fallback_layout: Option<LayoutKind>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forces a layout regardless of what the catalog asks for.
    pub fn with_layout_override(mut self, layout: Option<LayoutKind>) -> Self {
        self.layout_override = layout;
        self
    }

    /// Layout used when neither an override nor the catalog names one.
    pub fn with_fallback_layout(mut self, layout: Option<LayoutKind>) -> Self {
        self.fallback_layout = layout;
        self
    }

    /// Construct the model.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] when the canvas is not positive, a
    /// required or templated parameter is missing, a reserved parameter has
    /// the wrong type, a position is only partially given, or a container
    /// claims a service group that does not exist or is already claimed.
    pub fn build(mut self, catalog: &ServiceCatalog) -> Result<DiagramModel, ConfigurationError> {
        let canvas = catalog.diagram.canvas;
        if !(canvas.width > 0.0 && canvas.height > 0.0) {
            return Err(ConfigurationError::InvalidCanvas {
                width: canvas.width,
                height: canvas.height,
            });
        }

        let layout = self
            .layout_override
            .or(catalog.diagram.layout)
            .or(self.fallback_layout)
            .unwrap_or_default();
        info!(
            name = catalog.diagram.name.as_str(),
            layout = layout.to_string();
            "Building diagram model"
        );

        let owners = group_owners(catalog)?;
        self.reserve_explicit_ids(catalog);

        let mut model = DiagramModel::new(
            catalog.diagram.name.clone(),
            Size::new(canvas.width, canvas.height),
            layout,
        );

        for (key, spec) in &catalog.containers {
            model = model.with_container(build_container(key, spec)?);
        }

        let mut ids_by_name: HashMap<&str, Id> = HashMap::new();
        for (group, services) in &catalog.services {
            let parent = owners.get(group.as_str()).map(|owner| Id::new(owner));
            for (name, params) in services {
                let component = self.build_component(group, name, params, parent)?;
                trace!(
                    id = component.id().to_string(),
                    kind = component.kind().to_string();
                    "Component built"
                );
                ids_by_name.entry(name.as_str()).or_insert(component.id());
                model = model.with_component(component);
            }
        }

        for spec in &catalog.connections {
            model = model.with_connection(build_connection(spec, &ids_by_name));
        }

        debug!(
            components = model.components().len(),
            containers = model.containers().len(),
            connections = model.connections().len();
            "Diagram model built"
        );
        Ok(model)
    }

    fn reserve_explicit_ids(&mut self, catalog: &ServiceCatalog) {
        for key in catalog.containers.keys() {
            self.ids.reserve(key);
        }
        for params in catalog.services.values().flat_map(|services| services.values()) {
            if let Some(id) = params.get("id") {
                self.ids.reserve(&id.to_string());
            }
        }
    }

    fn build_component(
        &mut self,
        group: &str,
        name: &str,
        params: &ServiceParams,
        parent: Option<Id>,
    ) -> Result<Component, ConfigurationError> {
        let kind = match text_param(name, params, "kind")? {
            Some(kind) => ComponentKind::from_name(kind),
            None => ComponentKind::from_group_name(group),
        };

        let id = match params.get("id") {
            Some(id) => id.to_string(),
            None => self.ids.next_id(),
        };

        let label = match (params.get("label"), text_param(name, params, "template")?) {
            (Some(label), _) => label.to_string(),
            (None, Some(template)) => render_template(template, name, params)?,
            (None, None) => default_label(kind, name, params)?,
        };

        let mut component = Component::new(Id::new(&id), name, kind)
            .with_label(label)
            .with_style(node_style(name, params, kind.default_style())?);

        if let Some(position) = position(name, params)? {
            component = component.with_position(position);
        }
        if let Some(icon) = text_param(name, params, "icon")? {
            component = component.with_icon(icon);
        }
        if let Some(parent) = parent {
            component = component.with_parent(parent);
        }
        Ok(component)
    }
}

/// Maps each claimed service group to the container that owns it.
fn group_owners(catalog: &ServiceCatalog) -> Result<HashMap<&str, &str>, ConfigurationError> {
    let mut owners: HashMap<&str, &str> = HashMap::new();
    for (container, spec) in &catalog.containers {
        for group in &spec.groups {
            if !catalog.services.contains_key(group) {
                return Err(ConfigurationError::UnknownGroup {
                    container: container.clone(),
                    group: group.clone(),
                });
            }
            if let Some(first) = owners.insert(group.as_str(), container.as_str()) {
                return Err(ConfigurationError::GroupClaimedTwice {
                    group: group.clone(),
                    first: first.to_string(),
                    second: container.clone(),
                });
            }
        }
    }
    Ok(owners)
}

fn build_container(key: &str, spec: &ContainerSpec) -> Result<Container, ConfigurationError> {
    let label = spec.label.as_deref().unwrap_or(key);
    let mut container = Container::new(Id::new(key), label);

    match (spec.x, spec.y, spec.width, spec.height) {
        (Some(x), Some(y), Some(width), Some(height)) => {
            container = container.with_geometry(Bounds::new(x, y, width, height));
        }
        (None, None, None, None) => {}
        _ => {
            return Err(ConfigurationError::PartialPosition {
                owner: key.to_string(),
            });
        }
    }

    if let Some(parent) = &spec.parent {
        container = container.with_parent(Id::new(parent));
    }
    Ok(container)
}

/// Resolves endpoints by service name first, then treats them as raw ids.
fn build_connection(spec: &ConnectionSpec, ids_by_name: &HashMap<&str, Id>) -> Connection {
    let resolve = |endpoint: &str| {
        ids_by_name
            .get(endpoint)
            .copied()
            .unwrap_or_else(|| Id::new(endpoint))
    };

    let mut style = EdgeStyle::default();
    if let Some(color) = &spec.stroke_color {
        style = style.with_stroke_color(color.as_str());
    }
    if let Some(width) = spec.stroke_width {
        style = style.with_stroke_width(width);
    }
    if let Some(color) = &spec.font_color {
        style = style.with_font_color(color.as_str());
    }
    if let Some(dashed) = spec.dashed {
        style = style.with_dashed(dashed);
    }

    let connection = Connection::new(resolve(&spec.from), resolve(&spec.to)).with_style(style);
    match &spec.label {
        Some(label) => connection.with_label(label.as_str()),
        None => connection,
    }
}

fn text_param<'a>(
    owner: &str,
    params: &'a ServiceParams,
    field: &str,
) -> Result<Option<&'a str>, ConfigurationError> {
    match params.get(field) {
        None => Ok(None),
        Some(ParamValue::Text(value)) => Ok(Some(value)),
        Some(_) => Err(invalid_field(owner, field, "a string")),
    }
}

fn number_param(
    owner: &str,
    params: &ServiceParams,
    field: &str,
) -> Result<Option<f32>, ConfigurationError> {
    match params.get(field) {
        None => Ok(None),
        Some(value) => value
            .as_f32()
            .map(Some)
            .ok_or_else(|| invalid_field(owner, field, "a number")),
    }
}

fn invalid_field(owner: &str, field: &str, expected: &'static str) -> ConfigurationError {
    ConfigurationError::InvalidField {
        owner: owner.to_string(),
        field: field.to_string(),
        expected,
    }
}

fn position(owner: &str, params: &ServiceParams) -> Result<Option<Bounds>, ConfigurationError> {
    let x = number_param(owner, params, "x")?;
    let y = number_param(owner, params, "y")?;
    let width = number_param(owner, params, "width")?;
    let height = number_param(owner, params, "height")?;

    match (x, y, width, height) {
        (Some(x), Some(y), Some(width), Some(height)) => {
            Ok(Some(Bounds::new(x, y, width, height)))
        }
        (None, None, None, None) => Ok(None),
        _ => Err(ConfigurationError::PartialPosition {
            owner: owner.to_string(),
        }),
    }
}

fn node_style(
    owner: &str,
    params: &ServiceParams,
    mut style: NodeStyle,
) -> Result<NodeStyle, ConfigurationError> {
    if let Some(color) = text_param(owner, params, "fill_color")? {
        style = style.with_fill_color(color);
    }
    if let Some(color) = text_param(owner, params, "stroke_color")? {
        style = style.with_stroke_color(color);
    }
    if let Some(color) = text_param(owner, params, "font_color")? {
        style = style.with_font_color(color);
    }
    if let Some(width) = number_param(owner, params, "stroke_width")? {
        style = style.with_stroke_width(width);
    }
    if let Some(size) = number_param(owner, params, "font_size")? {
        style = style.with_font_size(size);
    }
    Ok(style)
}

fn default_label(
    kind: ComponentKind,
    name: &str,
    params: &ServiceParams,
) -> Result<String, ConfigurationError> {
    let mut label = render_template(kind.label_template(), name, params)?;
    if kind == ComponentKind::Database
        && params.get("multi_az").and_then(ParamValue::as_bool) == Some(true)
    {
        label.push_str("\nMulti-AZ");
    }
    Ok(label)
}

/// Substitutes `{key}` placeholders with parameter values.
///
/// `{name}` falls back to the service name. A `{` without a closing `}` is
/// copied literally.
///
/// # Errors
///
/// Returns [`ConfigurationError::MissingField`] when a placeholder names a
/// parameter the service does not have.
pub fn render_template(
    template: &str,
    name: &str,
    params: &ServiceParams,
) -> Result<String, ConfigurationError> {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        rendered.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            rendered.push_str(&rest[open..]);
            return Ok(rendered);
        };

        let key = &after[..close];
        match params.get(key) {
            Some(value) => rendered.push_str(&value.to_string()),
            None if key == "name" => rendered.push_str(name),
            None => {
                return Err(ConfigurationError::MissingField {
                    owner: name.to_string(),
                    field: key.to_string(),
                });
            }
        }
        rest = &after[close + 1..];
    }

    rendered.push_str(rest);
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(entries: &[(&str, ParamValue)]) -> ServiceParams {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    fn catalog(text: &str) -> ServiceCatalog {
        ServiceCatalog::from_toml_str(text).unwrap()
    }

    #[test]
    fn test_id_generator_skips_reserved() {
        let mut ids = IdGenerator::new("svc-");
        ids.reserve("svc-2");

        assert_eq!(ids.next_id(), "svc-1");
        assert_eq!(ids.next_id(), "svc-3");
        assert_eq!(ids.next_id(), "svc-4");
    }

    #[test]
    fn test_render_template() {
        let p = params(&[
            ("cpu", ParamValue::Integer(512)),
            ("memory", ParamValue::Integer(1024)),
        ]);
        let label = render_template("{name}\n{cpu} vCPU / {memory} MB", "api", &p).unwrap();
        assert_eq!(label, "api\n512 vCPU / 1024 MB");
    }

    #[test]
    fn test_render_template_unclosed_brace_is_literal() {
        let label = render_template("weird {name", "svc", &ServiceParams::new()).unwrap();
        assert_eq!(label, "weird {name");
    }

    #[test]
    fn test_render_template_missing_field() {
        let err = render_template("{engine}", "db", &ServiceParams::new()).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::MissingField {
                owner: "db".to_string(),
                field: "engine".to_string()
            }
        );
    }

    #[test]
    fn test_build_components_in_order() {
        let model = ModelBuilder::new()
            .build(&catalog(
                r#"
                [services.microservices.order-service]
                cpu = 512
                memory = 1024

                [services.databases.orders-db]
                engine = "RDS PostgreSQL"
                instance_class = "db.r6g.large"

                [services.aws_services.cache]
                kind = "redis"
                engine = "ElastiCache Redis"
                instance_class = "cache.t3.medium"
                "#,
            ))
            .unwrap();

        let components = model.components();
        assert_eq!(components.len(), 3);
        assert_eq!(components[0].id(), "svc-1");
        assert_eq!(components[0].kind(), ComponentKind::Compute);
        assert_eq!(components[0].label(), "order-service\n512 vCPU / 1024 MB");
        assert_eq!(components[1].kind(), ComponentKind::Database);
        assert_eq!(components[1].label(), "RDS PostgreSQL\ndb.r6g.large");
        assert_eq!(components[2].kind(), ComponentKind::Database);
        assert_eq!(model.layout(), LayoutKind::Hierarchical);
    }

    #[test]
    fn test_unknown_kind_falls_back_to_generic() {
        let model = ModelBuilder::new()
            .build(&catalog(
                r#"
                [services.misc.thing]
                kind = "quantum-computer"
                "#,
            ))
            .unwrap();

        assert_eq!(model.components()[0].kind(), ComponentKind::Generic);
        assert_eq!(model.components()[0].label(), "thing");
    }

    #[test]
    fn test_explicit_id_label_and_position() {
        let model = ModelBuilder::new()
            .build(&catalog(
                r##"
                [services.misc.svc-1]
                label = "Pinned"

                [services.misc.other]
                id = "svc-2"
                x = 10
                y = 20
                width = 100
                height = 50.5
                fill_color = "#123456"
                "##,
            ))
            .unwrap();

        let components = model.components();
        assert_eq!(components[0].id(), "svc-1");
        assert_eq!(components[0].label(), "Pinned");
        assert_eq!(components[1].id(), "svc-2");
        assert_eq!(
            components[1].position(),
            Some(Bounds::new(10.0, 20.0, 100.0, 50.5))
        );
        assert_eq!(components[1].style().fill_color(), "#123456");
    }

    #[test]
    fn test_generated_ids_avoid_explicit_ones() {
        let model = ModelBuilder::new()
            .build(&catalog(
                r#"
                [services.misc.a]
                [services.misc.b]
                id = "svc-1"
                "#,
            ))
            .unwrap();

        assert_eq!(model.components()[0].id(), "svc-2");
        assert_eq!(model.components()[1].id(), "svc-1");
    }

    #[test]
    fn test_partial_position_is_rejected() {
        let err = ModelBuilder::new()
            .build(&catalog(
                r#"
                [services.misc.a]
                x = 10
                "#,
            ))
            .unwrap_err();

        assert_eq!(
            err,
            ConfigurationError::PartialPosition {
                owner: "a".to_string()
            }
        );
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let err = ModelBuilder::new()
            .build(&catalog(
                r#"
                [services.misc.a]
                font_size = "large"
                "#,
            ))
            .unwrap_err();

        assert!(matches!(
            err,
            ConfigurationError::InvalidField { field, expected: "a number", .. } if field == "font_size"
        ));
    }

    #[test]
    fn test_missing_template_field_is_rejected() {
        let err = ModelBuilder::new()
            .build(&catalog(
                r#"
                [services.databases.orders-db]
                engine = "RDS PostgreSQL"
                "#,
            ))
            .unwrap_err();

        assert!(matches!(
            err,
            ConfigurationError::MissingField { field, .. } if field == "instance_class"
        ));
    }

    #[test]
    fn test_invalid_canvas() {
        let err = ModelBuilder::new()
            .build(&ServiceCatalog::new("x").with_canvas(0.0, 100.0))
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidCanvas { .. }));
    }

    #[test]
    fn test_containers_own_groups() {
        let model = ModelBuilder::new()
            .build(&catalog(
                r#"
                [services.compute.api]
                template = "{name}"

                [services.edge.cdn]

                [containers.vpc]
                label = "Production VPC"
                groups = ["compute"]

                [containers.cluster]
                parent = "vpc"
                x = 0
                y = 0
                width = 10
                height = 10
                "#,
            ))
            .unwrap();

        assert_eq!(model.containers().len(), 2);
        assert_eq!(model.containers()[0].label(), "Production VPC");
        assert_eq!(model.containers()[1].parent(), Some(Id::new("vpc")));
        assert_eq!(model.components()[0].parent(), Some(Id::new("vpc")));
        assert_eq!(model.components()[1].parent(), None);
    }

    #[test]
    fn test_container_group_errors() {
        let err = ModelBuilder::new()
            .build(&catalog(
                r#"
                [containers.vpc]
                groups = ["nope"]
                "#,
            ))
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownGroup { .. }));

        let err = ModelBuilder::new()
            .build(&catalog(
                r#"
                [services.compute.api]
                template = "{name}"

                [containers.a]
                groups = ["compute"]

                [containers.b]
                groups = ["compute"]
                "#,
            ))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::GroupClaimedTwice {
                group: "compute".to_string(),
                first: "a".to_string(),
                second: "b".to_string(),
            }
        );
    }

    #[test]
    fn test_connections_resolve_names() {
        let model = ModelBuilder::new()
            .build(&catalog(
                r#"
                [services.misc.web]
                [services.misc.db]

                [[connections]]
                from = "web"
                to = "db"
                label = "SQL"
                dashed = true

                [[connections]]
                from = "web"
                to = "ghost"
                "#,
            ))
            .unwrap();

        let connections = model.connections();
        assert_eq!(connections[0].source(), "svc-1");
        assert_eq!(connections[0].target(), "svc-2");
        assert_eq!(connections[0].label(), Some("SQL"));
        assert!(connections[0].style().is_dashed());
        assert_eq!(connections[1].target(), "ghost");
    }

    #[test]
    fn test_layout_precedence() {
        let grid = catalog("[diagram]\nlayout = \"grid\"");

        let model = ModelBuilder::new()
            .with_fallback_layout(Some(LayoutKind::Circular))
            .build(&grid)
            .unwrap();
        assert_eq!(model.layout(), LayoutKind::Grid);

        let model = ModelBuilder::new()
            .with_layout_override(Some(LayoutKind::None))
            .build(&grid)
            .unwrap();
        assert_eq!(model.layout(), LayoutKind::None);

        let model = ModelBuilder::new()
            .with_fallback_layout(Some(LayoutKind::Circular))
            .build(&ServiceCatalog::default())
            .unwrap();
        assert_eq!(model.layout(), LayoutKind::Circular);
    }
}
