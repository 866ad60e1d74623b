//! CLI logic for the Stratus diagram tool.
//!
//! This module contains the core CLI logic: it loads the configuration and
//! the catalog, then dispatches to the selected subcommand.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command};

use std::path::Path;

use log::{info, warn};

use stratus::{
    DiagramBuilder, StratusError,
    catalog::ServiceCatalog,
    export::Format,
    model::LayoutKind,
    report::{self, Section},
};

/// Run the Stratus CLI application
///
/// # Errors
///
/// Returns `StratusError` for:
/// - File I/O errors
/// - Configuration and catalog errors
/// - Validation errors, one per failed check
/// - Rendering errors; a render where only some formats fail returns
///   [`StratusError::Incomplete`] after every format was attempted
pub fn run(args: &Args) -> Result<(), StratusError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let builder = DiagramBuilder::new(app_config);

    match &args.command {
        Command::Render {
            catalog,
            output,
            formats,
            layout,
        } => render(&builder, catalog, Path::new(output), formats, *layout),
        Command::Validate { catalog, layout } => validate(&builder, catalog, *layout),
        Command::Report { catalog, sections } => print_report(&builder, catalog, sections),
    }
}

fn render(
    builder: &DiagramBuilder,
    catalog_path: &str,
    out_dir: &Path,
    formats: &[Format],
    layout: Option<LayoutKind>,
) -> Result<(), StratusError> {
    info!(
        catalog_path,
        out_dir = out_dir.display().to_string();
        "Rendering catalog"
    );

    let catalog = ServiceCatalog::load(catalog_path)?;
    let model = builder.prepare(&catalog, layout)?;

    let outcomes = builder.render_all(&model, out_dir, formats);
    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(path) => println!("{:>8}  {}", outcome.format, path.display()),
            Err(err) => {
                failed += 1;
                warn!(format = outcome.format.to_string(), error = err.to_string(); "Format failed");
                println!("{:>8}  failed: {err}", outcome.format);
            }
        }
    }

    if failed > 0 {
        return Err(StratusError::Incomplete {
            failed,
            attempted: outcomes.len(),
        });
    }

    info!(formats = outcomes.len(); "Diagram rendered successfully");
    Ok(())
}

fn validate(
    builder: &DiagramBuilder,
    catalog_path: &str,
    layout: Option<LayoutKind>,
) -> Result<(), StratusError> {
    let catalog = ServiceCatalog::load(catalog_path)?;
    let mut model = builder.build_model(&catalog, layout)?;
    builder.layout(&mut model);

    let report = builder.validate(&model);
    for message in report.messages() {
        println!("{message}");
    }
    if report.is_valid() {
        println!(
            "{catalog_path}: valid ({} components, {} connections)",
            model.components().len(),
            model.connections().len()
        );
    }
    report.into_result()
}

fn print_report(
    builder: &DiagramBuilder,
    catalog_path: &str,
    sections: &[Section],
) -> Result<(), StratusError> {
    let catalog = ServiceCatalog::load(catalog_path)?;
    let model = builder.build_model(&catalog, None)?;
    let sections = if sections.is_empty() {
        &Section::ALL[..]
    } else {
        sections
    };

    print!("{}", report::render(&model, sections));
    Ok(())
}
