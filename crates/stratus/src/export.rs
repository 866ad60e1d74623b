//! Output renderers.
//!
//! Every renderer reads the same positioned [`DiagramModel`] and produces
//! the bytes of one output format. The [`Exporter`] trait writes those bytes
//! to a file, overwriting any previous output.
//!
//! - [`drawio`] - Draw.io / mxGraph XML
//! - [`svg`] - SVG drawn with the `svg` crate
//! - [`raster`] - PNG rasterized from that SVG
//! - [`markdown`] - Markdown with a Mermaid flowchart

pub mod drawio;
pub mod markdown;
pub mod raster;
pub mod svg;

mod xml;

pub use xml::escape_attr;

use std::{
    fmt::{self, Display},
    fs, io,
    path::{Path, PathBuf},
    str::FromStr,
};

use log::{error, info};
use thiserror::Error;

use stratus_core::model::DiagramModel;

/// Output formats understood by the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Drawio,
    Png,
    Svg,
    Markdown,
}

impl Format {
    pub const ALL: [Format; 4] = [Self::Drawio, Self::Png, Self::Svg, Self::Markdown];

    /// File extension written for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Drawio => "drawio",
            Self::Png => "png",
            Self::Svg => "svg",
            Self::Markdown => "md",
        }
    }
}

impl FromStr for Format {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drawio" | "xml" => Ok(Self::Drawio),
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            "markdown" | "md" | "mermaid" => Ok(Self::Markdown),
            _ => Err("Unsupported format, expected one of: drawio, png, svg, markdown"),
        }
    }
}

impl From<Format> for &'static str {
    fn from(val: Format) -> Self {
        match val {
            Format::Drawio => "drawio",
            Format::Png => "png",
            Format::Svg => "svg",
            Format::Markdown => "markdown",
        }
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// Errors raised while producing an output file.
#[derive(Debug, Error)]
pub enum Error {
    #[error("render backend unavailable: {0}")]
    RenderBackendUnavailable(String),

    #[error("failed to parse SVG: {0}")]
    SvgParse(String),

    #[error("failed to allocate a {width}x{height} pixmap")]
    PixmapAlloc { width: u32, height: u32 },

    #[error("failed to encode PNG: {0}")]
    PngEncode(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A renderer producing one output format.
pub trait Exporter {
    /// The format this exporter produces.
    fn format(&self) -> Format;

    /// Render `model` to the bytes of the output file.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the renderer or its backend fails.
    fn render(&self, model: &DiagramModel) -> Result<Vec<u8>, Error>;

    /// Render `model` and write it to `path`, creating or overwriting the
    /// file. Returns the path written.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when rendering fails or the file cannot be written.
    fn export(&self, model: &DiagramModel, path: &Path) -> Result<PathBuf, Error> {
        let bytes = self.render(model)?;

        info!(
            path = path.display().to_string(),
            format = self.format().to_string();
            "Writing output file"
        );
        if let Err(err) = fs::write(path, &bytes) {
            error!(path = path.display().to_string(), err:err; "Failed to write output file");
            return Err(Error::Io(err));
        }
        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("drawio".parse::<Format>(), Ok(Format::Drawio));
        assert_eq!(" PNG ".parse::<Format>(), Ok(Format::Png));
        assert_eq!("md".parse::<Format>(), Ok(Format::Markdown));
        assert!("pdf".parse::<Format>().is_err());
    }

    #[test]
    fn test_format_round_trip() {
        for format in Format::ALL {
            assert_eq!(format.to_string().parse::<Format>(), Ok(format));
        }
    }

    #[test]
    fn test_extension() {
        assert_eq!(Format::Markdown.extension(), "md");
        assert_eq!(Format::Drawio.extension(), "drawio");
    }
}
