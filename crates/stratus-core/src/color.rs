//! Color handling for Stratus diagrams
//!
//! Two representations coexist. Model styles keep colors as the literal
//! `#RRGGBB` strings the catalog supplied, so that the validator can report
//! them verbatim and the Draw.io renderer can copy them into style strings.
//! Drawing code converts them into [`Color`], which wraps the `DynamicColor`
//! type from the color crate.

use std::{
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::DynamicColor;

/// Returns true if `value` is a 7-character `#RRGGBB` hex color.
///
/// # Examples
///
/// ```
/// use stratus_core::color::is_hex_color;
///
/// assert!(is_hex_color("#FF9900"));
/// assert!(is_hex_color("#3b48cc"));
/// assert!(!is_hex_color("#F90"));
/// assert!(!is_hex_color("orange"));
/// assert!(!is_hex_color("#GG9900"));
/// ```
pub fn is_hex_color(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 7 && bytes[0] == b'#' && bytes[1..].iter().all(u8::is_ascii_hexdigit)
}

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a CSS color string such as `"#ff0000"` or `"white"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratus_core::color::Color;
    ///
    /// let orange = Color::new("#ED7100").unwrap();
    /// let white = Color::new("white").unwrap();
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Parses `color_str`, falling back to `fallback` when it is not a valid color.
    pub fn new_or(color_str: &str, fallback: Color) -> Self {
        Self::new(color_str).unwrap_or(fallback)
    }

    /// Returns the alpha (transparency) component of this color.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }

    /// Returns a sanitized string suitable for use inside an SVG `id` attribute.
    pub fn to_id_safe_string(self) -> String {
        let color_str = self.to_string();
        let mut sanitized = color_str
            .replace('#', "hex")
            .replace(['(', ')', ',', ' ', ';', '.', '/', '%'], "_");

        if sanitized.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            sanitized = format!("c_{sanitized}");
        }

        sanitized
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_string())
    }
}
