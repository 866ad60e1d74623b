//! Command-line argument definitions for the Stratus CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. A subcommand selects what to do with the catalog; the
//! global flags control configuration file selection and logging verbosity.

use clap::{Parser, Subcommand};

use stratus::{export::Format, model::LayoutKind, report::Section};

/// Command-line arguments for the Stratus diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build, lay out, validate and render a catalog
    Render {
        /// Path to the service catalog (.toml or .json)
        catalog: String,

        /// Directory receiving the rendered files
        #[arg(short, long, default_value = "out")]
        output: String,

        /// Formats to render (drawio, png, svg, markdown)
        #[arg(
            short,
            long = "format",
            value_delimiter = ',',
            default_value = "drawio,png,markdown"
        )]
        formats: Vec<Format>,

        /// Layout overriding the catalog and configuration
        #[arg(long)]
        layout: Option<LayoutKind>,
    },

    /// Report every validation error of a catalog
    Validate {
        /// Path to the service catalog (.toml or .json)
        catalog: String,

        /// Layout overriding the catalog and configuration
        #[arg(long)]
        layout: Option<LayoutKind>,
    },

    /// Print a textual summary of a catalog
    Report {
        /// Path to the service catalog (.toml or .json)
        catalog: String,

        /// Sections to print (inventory, connections, layers); all by default
        sections: Vec<Section>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_defaults() {
        let args = Args::try_parse_from(["stratus", "render", "arch.toml"]).unwrap();

        assert_eq!(args.log_level, "warn");
        match args.command {
            Command::Render {
                catalog,
                output,
                formats,
                layout,
            } => {
                assert_eq!(catalog, "arch.toml");
                assert_eq!(output, "out");
                assert_eq!(formats, [Format::Drawio, Format::Png, Format::Markdown]);
                assert_eq!(layout, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_render_format_list_and_globals() {
        let args = Args::try_parse_from([
            "stratus", "render", "arch.toml", "-f", "svg,md", "--layout", "grid", "-c", "cfg.toml",
        ])
        .unwrap();

        assert_eq!(args.config.as_deref(), Some("cfg.toml"));
        match args.command {
            Command::Render {
                formats, layout, ..
            } => {
                assert_eq!(formats, [Format::Svg, Format::Markdown]);
                assert_eq!(layout, Some(LayoutKind::Grid));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_report_sections() {
        let args = Args::try_parse_from(["stratus", "report", "arch.toml", "layers"]).unwrap();
        match args.command {
            Command::Report { sections, .. } => assert_eq!(sections, [Section::Layers]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(Args::try_parse_from(["stratus", "render", "a.toml", "-f", "pdf"]).is_err());
    }
}
