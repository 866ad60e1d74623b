//! Visual style records for nodes and edges.
//!
//! Colors are kept as the strings the catalog supplied. They are checked by
//! the validator, not here, so a malformed color survives construction and
//! is reported together with every other problem in the model.

/// Fill, stroke and font settings of a component or container.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeStyle {
    fill_color: String,
    stroke_color: String,
    font_color: String,
    stroke_width: f32,
    font_size: f32,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            fill_color: "#FFFFFF".to_string(),
            stroke_color: "#232F3E".to_string(),
            font_color: "#232F3E".to_string(),
            stroke_width: 2.0,
            font_size: 12.0,
        }
    }
}

impl NodeStyle {
    /// Style used for grouping rectangles.
    pub fn container() -> Self {
        Self {
            fill_color: "#FAFAFA".to_string(),
            stroke_color: "#879196".to_string(),
            font_color: "#232F3E".to_string(),
            stroke_width: 1.0,
            font_size: 14.0,
        }
    }

    pub fn fill_color(&self) -> &str {
        &self.fill_color
    }

    pub fn stroke_color(&self) -> &str {
        &self.stroke_color
    }

    pub fn font_color(&self) -> &str {
        &self.font_color
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn with_fill_color(mut self, color: impl Into<String>) -> Self {
        self.fill_color = color.into();
        self
    }

    pub fn with_stroke_color(mut self, color: impl Into<String>) -> Self {
        self.stroke_color = color.into();
        self
    }

    pub fn with_font_color(mut self, color: impl Into<String>) -> Self {
        self.font_color = color.into();
        self
    }

    pub fn with_stroke_width(mut self, width: f32) -> Self {
        self.stroke_width = width;
        self
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Named color fields, used by validation to report offending values.
    pub fn colors(&self) -> [(&'static str, &str); 3] {
        [
            ("fill_color", &self.fill_color),
            ("stroke_color", &self.stroke_color),
            ("font_color", &self.font_color),
        ]
    }
}

/// Stroke and label settings of a connection.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeStyle {
    stroke_color: String,
    stroke_width: f32,
    font_color: String,
    dashed: bool,
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self {
            stroke_color: "#545B64".to_string(),
            stroke_width: 2.0,
            font_color: "#232F3E".to_string(),
            dashed: false,
        }
    }
}

impl EdgeStyle {
    pub fn stroke_color(&self) -> &str {
        &self.stroke_color
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    pub fn font_color(&self) -> &str {
        &self.font_color
    }

    pub fn is_dashed(&self) -> bool {
        self.dashed
    }

    pub fn with_stroke_color(mut self, color: impl Into<String>) -> Self {
        self.stroke_color = color.into();
        self
    }

    pub fn with_stroke_width(mut self, width: f32) -> Self {
        self.stroke_width = width;
        self
    }

    pub fn with_font_color(mut self, color: impl Into<String>) -> Self {
        self.font_color = color.into();
        self
    }

    pub fn with_dashed(mut self, dashed: bool) -> Self {
        self.dashed = dashed;
        self
    }

    /// Named color fields, used by validation to report offending values.
    pub fn colors(&self) -> [(&'static str, &str); 2] {
        [
            ("stroke_color", &self.stroke_color),
            ("font_color", &self.font_color),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_style_builders() {
        let style = NodeStyle::default()
            .with_fill_color("#000000")
            .with_stroke_width(3.0)
            .with_font_size(16.0);

        assert_eq!(style.fill_color(), "#000000");
        assert_eq!(style.stroke_width(), 3.0);
        assert_eq!(style.font_size(), 16.0);
        assert_eq!(style.colors()[0], ("fill_color", "#000000"));
    }

    #[test]
    fn test_edge_style_builders() {
        let style = EdgeStyle::default().with_dashed(true).with_font_color("#111111");

        assert!(style.is_dashed());
        assert_eq!(style.colors()[1], ("font_color", "#111111"));
    }
}
