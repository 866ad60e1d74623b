//! Service catalogs: the static input describing what to draw.
//!
//! A catalog maps service-group names to services, and each service to a
//! free-form parameter mapping. Containers, connections and diagram-level
//! settings live next to it. Catalogs are read from TOML or JSON; the order
//! of groups and services in the file is preserved.
//!
//! ```toml
//! [diagram]
//! name = "Orders"
//! canvas = { width = 1200, height = 800 }
//! layout = "hierarchical"
//!
//! [services.databases.orders-db]
//! engine = "RDS PostgreSQL"
//! instance_class = "db.r6g.large"
//!
//! [services.microservices.order-service]
//! cpu = 512
//! memory = 1024
//!
//! [containers.vpc]
//! label = "Production VPC"
//! groups = ["databases", "microservices"]
//!
//! [[connections]]
//! from = "order-service"
//! to = "orders-db"
//! label = "SQL"
//! ```

use std::{fmt, fs, path::Path};

use indexmap::IndexMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use stratus_core::model::LayoutKind;

use crate::error::{ConfigurationError, StratusError};

/// A single parameter value of a service entry.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    /// The value as a number, if it is one.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Integer(value) => Some(*value as f32),
            Self::Float(value) => Some(*value as f32),
            Self::Bool(_) | Self::Text(_) => None,
        }
    }

    /// The value as a string slice, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Parameters of one service, in catalog order.
pub type ServiceParams = IndexMap<String, ParamValue>;

/// Canvas dimensions in diagram units.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct CanvasSpec {
    pub width: f32,
    pub height: f32,
}

impl Default for CanvasSpec {
    fn default() -> Self {
        Self {
            width: 1600.0,
            height: 1000.0,
        }
    }
}

/// Diagram-wide settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DiagramSpec {
    #[serde(default = "default_diagram_name")]
    pub name: String,

    #[serde(default)]
    pub canvas: CanvasSpec,

    /// Layout for components without explicit positions.
    #[serde(default)]
    pub layout: Option<LayoutKind>,
}

fn default_diagram_name() -> String {
    "Architecture".to_string()
}

impl Default for DiagramSpec {
    fn default() -> Self {
        Self {
            name: default_diagram_name(),
            canvas: CanvasSpec::default(),
            layout: None,
        }
    }
}

/// A grouping rectangle owning whole service groups.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ContainerSpec {
    /// Display text; defaults to the container's key.
    #[serde(default)]
    pub label: Option<String>,

    /// Service groups whose services this container owns.
    #[serde(default)]
    pub groups: Vec<String>,

    /// Key of the enclosing container.
    #[serde(default)]
    pub parent: Option<String>,

    #[serde(default)]
    pub x: Option<f32>,
    #[serde(default)]
    pub y: Option<f32>,
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
}

/// A directed connection between two services.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ConnectionSpec {
    /// Source service name or component id.
    pub from: String,

    /// Target service name or component id.
    pub to: String,

    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub stroke_color: Option<String>,
    #[serde(default)]
    pub stroke_width: Option<f32>,
    #[serde(default)]
    pub font_color: Option<String>,
    #[serde(default)]
    pub dashed: Option<bool>,
}

impl ConnectionSpec {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// The complete static input of one diagram.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ServiceCatalog {
    #[serde(default)]
    pub diagram: DiagramSpec,

    /// Service group name → service name → parameters.
    #[serde(default)]
    pub services: IndexMap<String, IndexMap<String, ServiceParams>>,

    #[serde(default)]
    pub containers: IndexMap<String, ContainerSpec>,

    #[serde(default)]
    pub connections: Vec<ConnectionSpec>,
}

impl ServiceCatalog {
    /// Create an empty catalog with the given diagram name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            diagram: DiagramSpec {
                name: name.into(),
                ..DiagramSpec::default()
            },
            ..Self::default()
        }
    }

    pub fn with_canvas(mut self, width: f32, height: f32) -> Self {
        self.diagram.canvas = CanvasSpec { width, height };
        self
    }

    pub fn with_layout(mut self, layout: LayoutKind) -> Self {
        self.diagram.layout = Some(layout);
        self
    }

    /// Add a service to a group, creating the group if needed.
    pub fn with_service(
        mut self,
        group: impl Into<String>,
        service: impl Into<String>,
        params: ServiceParams,
    ) -> Self {
        self.services
            .entry(group.into())
            .or_default()
            .insert(service.into(), params);
        self
    }

    pub fn with_container(mut self, key: impl Into<String>, container: ContainerSpec) -> Self {
        self.containers.insert(key.into(), container);
        self
    }

    pub fn with_connection(mut self, connection: ConnectionSpec) -> Self {
        self.connections.push(connection);
        self
    }

    /// Total number of service entries across all groups.
    pub fn service_count(&self) -> usize {
        self.services.values().map(IndexMap::len).sum()
    }

    /// Parse a catalog from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Parse`] when the text is not a valid catalog.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigurationError> {
        toml::from_str(text).map_err(|err| ConfigurationError::Parse(err.to_string()))
    }

    /// Parse a catalog from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Parse`] when the text is not a valid catalog.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(text).map_err(|err| ConfigurationError::Parse(err.to_string()))
    }

    /// Load a catalog file, choosing the format from its extension.
    ///
    /// # Errors
    ///
    /// Returns [`StratusError::Io`] when the file cannot be read and
    /// [`StratusError::Configuration`] when it cannot be parsed or has an
    /// unknown extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StratusError> {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading service catalog");

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let parse = match extension.as_str() {
            "toml" => Self::from_toml_str,
            "json" => Self::from_json_str,
            _ => return Err(ConfigurationError::UnsupportedFormat(extension).into()),
        };

        let text = fs::read_to_string(path)?;
        let catalog = parse(&text)?;

        debug!(
            groups = catalog.services.len(),
            services = catalog.service_count(),
            connections = catalog.connections.len();
            "Catalog loaded"
        );
        Ok(catalog)
    }
}
