//! Stratus - cloud architecture diagrams from a static service catalog.
//!
//! The pipeline is **Model → Layout → Validate → Render**. A
//! [`ServiceCatalog`](catalog::ServiceCatalog) is turned into a
//! [`DiagramModel`](model::DiagramModel), unplaced components get positions
//! from a layout engine, the model is validated, and renderers write
//! Draw.io XML, SVG, PNG and Markdown from it.

pub mod builder;
pub mod catalog;
pub mod config;
pub mod export;
pub mod layout;
pub mod report;
pub mod validate;

mod error;
mod structure;

pub use stratus_core::{color, geometry, identifier, model};

pub use error::{ConfigurationError, StratusError};

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, error, info, trace};

use catalog::ServiceCatalog;
use config::AppConfig;
use export::{
    Exporter, Format, drawio::DrawioExporter, markdown::MarkdownExporter, raster::PngExporter,
    svg::SvgExporter,
};
use layout::EngineBuilder;
use model::{DiagramModel, LayoutKind};
use validate::ValidationReport;

/// Result of rendering one output format.
#[derive(Debug)]
pub struct FormatOutcome {
    pub format: Format,
    pub result: Result<PathBuf, StratusError>,
}

impl FormatOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Builder for turning service catalogs into rendered diagrams.
///
/// This provides an API for processing a catalog through the model, layout,
/// validation and rendering stages.
///
/// # Examples
///
/// ```rust,no_run
/// use stratus::{DiagramBuilder, catalog::ServiceCatalog, config::AppConfig, export::Format};
///
/// let catalog = ServiceCatalog::load("architecture.toml").expect("Failed to load");
/// let builder = DiagramBuilder::new(AppConfig::default());
///
/// let model = builder.prepare(&catalog, None).expect("Invalid diagram");
/// for outcome in builder.render_all(&model, "out".as_ref(), &Format::ALL) {
///     println!("{}: {:?}", outcome.format, outcome.result);
/// }
/// ```
#[derive(Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Construct an unpositioned model from a catalog.
    ///
    /// `layout_override` wins over the catalog's own layout, which wins over
    /// the configured default engine.
    ///
    /// # Errors
    ///
    /// Returns [`StratusError::Configuration`] for malformed catalog entries.
    pub fn build_model(
        &self,
        catalog: &ServiceCatalog,
        layout_override: Option<LayoutKind>,
    ) -> Result<DiagramModel, StratusError> {
        info!("Building diagram model");

        let model = builder::ModelBuilder::new()
            .with_layout_override(layout_override)
            .with_fallback_layout(self.config.layout().engine())
            .build(catalog)?;

        debug!(
            components = model.components().len(),
            containers = model.containers().len(),
            connections = model.connections().len(),
            layout = model.layout().to_string();
            "Model built"
        );
        trace!(model:?; "Built model");
        Ok(model)
    }

    /// Position unplaced components and fit containers.
    pub fn layout(&self, model: &mut DiagramModel) {
        self.engine_builder().apply(model);
    }

    /// Check the model. Never mutates it.
    pub fn validate(&self, model: &DiagramModel) -> ValidationReport {
        let report = validate::validate(model);
        if report.is_valid() {
            info!("Model is valid");
        } else {
            info!(errors = report.errors().len(); "Model has validation errors");
        }
        report
    }

    /// Build, lay out and validate in one step.
    ///
    /// # Errors
    ///
    /// Returns [`StratusError::Configuration`] when the catalog is malformed
    /// and [`StratusError::Validation`] when the positioned model is invalid.
    pub fn prepare(
        &self,
        catalog: &ServiceCatalog,
        layout_override: Option<LayoutKind>,
    ) -> Result<DiagramModel, StratusError> {
        let mut model = self.build_model(catalog, layout_override)?;
        self.layout(&mut model);
        self.validate(&model).into_result()?;
        Ok(model)
    }

    /// Render the model to Draw.io XML.
    pub fn render_drawio(&self, model: &DiagramModel) -> String {
        DrawioExporter::new().render_xml(model)
    }

    /// Render the model to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`StratusError::Configuration`] when the configured
    /// background color is malformed.
    pub fn render_svg(&self, model: &DiagramModel) -> Result<String, StratusError> {
        Ok(self.svg_exporter()?.render_svg(model))
    }

    /// Render the model to a PNG file at `path`, returning the path.
    ///
    /// # Errors
    ///
    /// Returns [`StratusError::Export`] when no raster backend is available
    /// or rasterizing fails, and [`StratusError::Configuration`] when the
    /// style configuration is malformed.
    pub fn render_png(&self, model: &DiagramModel, path: &Path) -> Result<PathBuf, StratusError> {
        Ok(self.png_exporter()?.export(model, path)?)
    }

    /// Render the model to Markdown with a Mermaid flowchart.
    pub fn render_markdown(&self, model: &DiagramModel) -> String {
        MarkdownExporter::new().render_markdown(model)
    }

    /// Write every requested format to `out_dir` as `<slug>.<extension>`.
    ///
    /// Each format is attempted independently; a failure in one does not
    /// stop the others. Existing files are overwritten.
    pub fn render_all(
        &self,
        model: &DiagramModel,
        out_dir: &Path,
        formats: &[Format],
    ) -> Vec<FormatOutcome> {
        let stem = slug(model.name());
        info!(
            out_dir = out_dir.display().to_string(),
            formats = formats.len();
            "Rendering outputs"
        );

        let outcomes: Vec<FormatOutcome> = formats
            .iter()
            .map(|&format| {
                let path = out_dir.join(format!("{stem}.{}", format.extension()));
                let result = self.render_format(model, format, out_dir, &path);
                if let Err(err) = &result {
                    error!(format = format.to_string(), error = err.to_string(); "Render failed");
                }
                FormatOutcome { format, result }
            })
            .collect();

        let failed = outcomes.iter().filter(|outcome| !outcome.is_ok()).count();
        debug!(attempted = outcomes.len(), failed; "Rendering finished");
        outcomes
    }

    fn render_format(
        &self,
        model: &DiagramModel,
        format: Format,
        out_dir: &Path,
        path: &Path,
    ) -> Result<PathBuf, StratusError> {
        fs::create_dir_all(out_dir)?;
        let exporter: Box<dyn Exporter> = match format {
            Format::Drawio => Box::new(DrawioExporter::new()),
            Format::Svg => Box::new(self.svg_exporter()?),
            Format::Png => Box::new(self.png_exporter()?),
            Format::Markdown => Box::new(MarkdownExporter::new()),
        };
        Ok(exporter.export(model, path)?)
    }

    fn engine_builder(&self) -> EngineBuilder {
        let layout = self.config.layout();
        EngineBuilder::new()
            .with_node_size(layout.node_size())
            .with_margin(layout.margin())
            .with_layer_height(layout.layer_height())
            .with_container_padding(layout.container_padding())
    }

    fn svg_exporter(&self) -> Result<SvgExporter, StratusError> {
        SvgExporter::from_style(self.config.style()).map_err(|_| {
            ConfigurationError::InvalidField {
                owner: "style".to_string(),
                field: "background_color".to_string(),
                expected: "a CSS color",
            }
            .into()
        })
    }

    fn png_exporter(&self) -> Result<PngExporter, StratusError> {
        Ok(PngExporter::new(self.svg_exporter()?).with_scale(self.config.raster().scale()))
    }
}

/// File stem for a diagram name: lowercase ASCII alphanumerics joined by
/// single dashes. Falls back to `diagram`.
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    if out.is_empty() {
        "diagram".to_string()
    } else {
        out
    }
}
