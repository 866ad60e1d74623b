//! Error adapter for converting StratusError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! A [`StratusError::Validation`] carries every violated check of a model;
//! each one is rendered as its own diagnostic.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use stratus::{StratusError, validate::ValidationError};

/// Adapter for a single validation error.
pub struct ValidationAdapter<'a> {
    err: &'a ValidationError,
}

impl<'a> ValidationAdapter<'a> {
    pub fn new(err: &'a ValidationError) -> Self {
        Self { err }
    }
}

impl fmt::Debug for ValidationAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationAdapter")
            .field("err", &self.err)
            .finish()
    }
}

impl fmt::Display for ValidationAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.err.name(), self.err)
    }
}

impl std::error::Error for ValidationAdapter<'_> {}

impl MietteDiagnostic for ValidationAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.err {
            ValidationError::DuplicateId { .. } => "stratus::validate::duplicate_id",
            ValidationError::ReservedId { .. } => "stratus::validate::reserved_id",
            ValidationError::DanglingConnection { .. } => "stratus::validate::dangling_connection",
            ValidationError::SelfLoop { .. } => "stratus::validate::self_loop",
            ValidationError::OutOfBounds { .. } | ValidationError::Unpositioned { .. } => {
                "stratus::validate::out_of_bounds"
            }
            ValidationError::InvalidColor { .. } => "stratus::validate::invalid_color",
            ValidationError::ContainmentCycle { .. } => "stratus::validate::containment_cycle",
            ValidationError::UnknownParent { .. } => "stratus::validate::unknown_parent",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.err {
            ValidationError::DuplicateId { .. } => "give each service and container its own `id`",
            ValidationError::ReservedId { .. } => "ids `0` and `1` belong to the diagram root",
            ValidationError::DanglingConnection { .. } => {
                "connections must name an existing service or component id"
            }
            ValidationError::SelfLoop { .. } => "remove the connection or point it elsewhere",
            ValidationError::OutOfBounds { .. } => {
                "move the element or enlarge `[diagram] canvas`"
            }
            ValidationError::Unpositioned { .. } => {
                "set x, y, width and height, or pick a layout other than `none`"
            }
            ValidationError::InvalidColor { .. } => "colors are written as #RRGGBB",
            ValidationError::ContainmentCycle { .. } => "a container cannot nest inside itself",
            ValidationError::UnknownParent { .. } => "`parent` must name a declared container",
        };
        Some(Box::new(help))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Adapter for non-validation [`StratusError`] variants.
pub struct ErrorAdapter<'a>(pub &'a StratusError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            StratusError::Io(_) => "stratus::io",
            StratusError::Configuration(_) => "stratus::config",
            StratusError::Validation(_) => "stratus::validate",
            StratusError::Export(_) => "stratus::export",
            StratusError::Incomplete { .. } => "stratus::render",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            StratusError::Incomplete { .. } => Some(Box::new(
                "the formats that succeeded were still written; see the log for each failure",
            )),
            _ => None,
        }
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// One failed validation check.
    Validation(ValidationAdapter<'a>),
    /// Any other error.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Validation(v) => fmt::Display::fmt(v, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Validation(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Validation(v) => v.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Validation(v) => v.help(),
            Reportable::Error(e) => e.help(),
        }
    }
}

/// Convert a [`StratusError`] into a list of reportable errors.
///
/// For [`StratusError::Validation`], this returns one [`Reportable`] for
/// each failed check. For other error variants, this returns a single
/// [`Reportable`].
pub fn to_reportables(err: &StratusError) -> Vec<Reportable<'_>> {
    match err {
        StratusError::Validation(report) => report
            .errors()
            .iter()
            .map(|err| Reportable::Validation(ValidationAdapter::new(err)))
            .collect(),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}
