//! PNG renderer.
//!
//! The model is drawn to SVG by [`SvgExporter`] and the document is handed
//! to a [`RasterBackend`]. The `resvg` backend is compiled with the `raster`
//! feature; without it every attempt fails with
//! [`Error::RenderBackendUnavailable`].

use log::{debug, info};

use stratus_core::model::DiagramModel;

use crate::export::{Error, Exporter, Format, svg::SvgExporter};

/// Turns an SVG document into PNG bytes.
pub trait RasterBackend {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Rasterize `svg`, multiplying its intrinsic size by `scale`.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the document cannot be parsed, the pixmap
    /// cannot be allocated or the PNG cannot be encoded.
    fn rasterize(&self, svg: &str, scale: f32) -> Result<Vec<u8>, Error>;
}

/// Backend built on `resvg`.
#[cfg(feature = "raster")]
#[derive(Debug, Default, Clone, Copy)]
pub struct ResvgBackend;

#[cfg(feature = "raster")]
impl RasterBackend for ResvgBackend {
    fn name(&self) -> &'static str {
        "resvg"
    }

    fn rasterize(&self, svg: &str, scale: f32) -> Result<Vec<u8>, Error> {
        use resvg::{tiny_skia, usvg};

        let mut opt = usvg::Options::default();
        opt.fontdb_mut().load_system_fonts();

        let tree =
            usvg::Tree::from_str(svg, &opt).map_err(|err| Error::SvgParse(err.to_string()))?;

        let size = tree.size();
        let width = (size.width() * scale).ceil().max(1.0) as u32;
        let height = (size.height() * scale).ceil().max(1.0) as u32;
        let mut pixmap =
            tiny_skia::Pixmap::new(width, height).ok_or(Error::PixmapAlloc { width, height })?;

        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(scale, scale),
            &mut pixmap.as_mut(),
        );
        debug!(width, height; "Rasterized SVG");

        pixmap
            .encode_png()
            .map_err(|err| Error::PngEncode(err.to_string()))
    }
}

/// Backend used when no rasterizer is compiled in.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableBackend;

impl RasterBackend for UnavailableBackend {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn rasterize(&self, _svg: &str, _scale: f32) -> Result<Vec<u8>, Error> {
        Err(Error::RenderBackendUnavailable(
            "stratus was built without the `raster` feature".to_string(),
        ))
    }
}

/// The best backend compiled into this build.
pub fn default_backend() -> Box<dyn RasterBackend> {
    #[cfg(feature = "raster")]
    {
        Box::new(ResvgBackend)
    }
    #[cfg(not(feature = "raster"))]
    {
        Box::new(UnavailableBackend)
    }
}

/// Renders a [`DiagramModel`] as a PNG image.
pub struct PngExporter {
    svg: SvgExporter,
    backend: Box<dyn RasterBackend>,
    scale: f32,
}

impl Default for PngExporter {
    fn default() -> Self {
        Self::new(SvgExporter::default())
    }
}

impl PngExporter {
    /// Creates an exporter drawing with `svg` and rasterizing with the
    /// default backend at scale 1.
    pub fn new(svg: SvgExporter) -> Self {
        Self {
            svg,
            backend: default_backend(),
            scale: 1.0,
        }
    }

    pub fn with_backend(mut self, backend: Box<dyn RasterBackend>) -> Self {
        self.backend = backend;
        self
    }

    /// Sets the scale factor. Non-positive or non-finite values fall back to 1.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        self
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
}

impl Exporter for PngExporter {
    fn format(&self) -> Format {
        Format::Png
    }

    fn render(&self, model: &DiagramModel) -> Result<Vec<u8>, Error> {
        info!(
            name = model.name(),
            backend = self.backend.name(),
            scale = self.scale;
            "Rendering PNG"
        );
        let svg = self.svg.render_svg(model);
        self.backend.rasterize(&svg, self.scale)
    }
}
