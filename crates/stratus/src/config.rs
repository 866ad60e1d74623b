//! Configuration types for Stratus diagram rendering.
//!
//! This module provides configuration structures that control how diagrams
//! are laid out, styled and rasterized. All types implement
//! [`serde::Deserialize`] so they can be loaded from a TOML file.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`LayoutConfig`] - Default [`LayoutKind`] and spacing options.
//! - [`StyleConfig`] - Background color and font family.
//! - [`RasterConfig`] - PNG scale factor.
//!
//! # Example
//!
//! ```
//! # use stratus::config::AppConfig;
//! let config: AppConfig = toml::from_str(
//!     r#"
//!     [layout]
//!     engine = "grid"
//!     node_width = 140
//!
//!     [raster]
//!     scale = 2.0
//!     "#,
//! ).unwrap();
//!
//! assert_eq!(config.layout().node_width(), 140.0);
//! assert_eq!(config.raster().scale(), 2.0);
//! ```

use serde::Deserialize;

use stratus_core::{color::Color, geometry::Size, model::LayoutKind};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,

    /// Raster configuration section.
    #[serde(default)]
    raster: RasterConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(layout: LayoutConfig, style: StyleConfig, raster: RasterConfig) -> Self {
        Self {
            layout,
            style,
            raster,
        }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns the raster configuration.
    pub fn raster(&self) -> &RasterConfig {
        &self.raster
    }
}

/// Layout selection and spacing.
///
/// `engine` is only a fallback: a catalog's own `[diagram] layout` wins, and
/// an explicit override passed to the builder wins over both.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    #[serde(default)]
    engine: Option<LayoutKind>,

    #[serde(default = "default_node_width")]
    node_width: f32,

    #[serde(default = "default_node_height")]
    node_height: f32,

    #[serde(default = "default_margin")]
    margin: f32,

    #[serde(default = "default_layer_height")]
    layer_height: f32,

    #[serde(default = "default_container_padding")]
    container_padding: f32,
}

fn default_node_width() -> f32 {
    120.0
}

fn default_node_height() -> f32 {
    60.0
}

fn default_margin() -> f32 {
    60.0
}

fn default_layer_height() -> f32 {
    150.0
}

fn default_container_padding() -> f32 {
    20.0
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            engine: None,
            node_width: default_node_width(),
            node_height: default_node_height(),
            margin: default_margin(),
            layer_height: default_layer_height(),
            container_padding: default_container_padding(),
        }
    }
}

impl LayoutConfig {
    /// Returns a copy with the given default engine.
    pub fn with_engine(mut self, engine: LayoutKind) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Returns the configured default [`LayoutKind`], if any.
    pub fn engine(&self) -> Option<LayoutKind> {
        self.engine
    }

    pub fn node_width(&self) -> f32 {
        self.node_width
    }

    pub fn node_height(&self) -> f32 {
        self.node_height
    }

    /// Preferred node size for placed components.
    pub fn node_size(&self) -> Size {
        Size::new(self.node_width, self.node_height)
    }

    /// Distance kept between the circular layout's ring and the canvas edge.
    pub fn margin(&self) -> f32 {
        self.margin
    }

    /// Row height of the hierarchical layout.
    pub fn layer_height(&self) -> f32 {
        self.layer_height
    }

    /// Space between a fitted container and its members.
    pub fn container_padding(&self) -> f32 {
        self.container_padding
    }
}

/// Visual styling configuration for rendered diagrams.
///
/// Fields that are not set fall back to renderer defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct StyleConfig {
    /// Background color, as a CSS color string.
    #[serde(default)]
    background_color: Option<String>,

    #[serde(default = "default_font_family")]
    font_family: String,
}

fn default_font_family() -> String {
    "Helvetica".to_string()
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: None,
            font_family: default_font_family(),
        }
    }
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }
}

/// PNG rasterization options.
#[derive(Debug, Clone, Deserialize)]
pub struct RasterConfig {
    #[serde(default = "default_scale")]
    scale: f32,
}

fn default_scale() -> f32 {
    1.0
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
        }
    }
}

impl RasterConfig {
    pub fn new(scale: f32) -> Self {
        Self { scale }
    }

    /// Pixels per diagram unit.
    pub fn scale(&self) -> f32 {
        self.scale
    }
}
