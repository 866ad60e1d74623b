use indexmap::IndexSet;
use svg::node::element::{Definitions, Marker, Path};

use stratus_core::{
    color::Color,
    geometry::{Bounds, Point},
};

/// Creates one arrowhead marker per distinct color, in first-use order.
pub fn create_marker_definitions<'a, I>(colors: I) -> Definitions
where
    I: Iterator<Item = &'a Color>,
{
    let distinct: IndexSet<&Color> = colors.collect();
    let mut defs = Definitions::new();

    for color in distinct {
        let arrow = Marker::new()
            .set("id", marker_id(color))
            .set("viewBox", "0 0 10 10")
            .set("refX", 9)
            .set("refY", 5)
            .set("markerWidth", 6)
            .set("markerHeight", 6)
            .set("orient", "auto")
            .add(
                Path::new()
                    .set("d", "M 0 0 L 10 5 L 0 10 z")
                    .set("fill", color.to_string()),
            );
        defs = defs.add(arrow);
    }

    defs
}

/// Marker id for arrowheads drawn in `color`.
pub fn marker_id(color: &Color) -> String {
    format!("arrow-{}", color.to_id_safe_string())
}

/// Straight path between two rectangles, trimmed to their borders.
///
/// Returns `None` when the rectangles share a center, since the direction of
/// the arrow is then undefined.
pub fn create_path(
    source: Bounds,
    target: Bounds,
    color: &Color,
    width: f32,
    dashed: bool,
) -> Option<(Path, Point, Point)> {
    let start = border_point(source, target.center())?;
    let end = border_point(target, source.center())?;

    let mut path = Path::new()
        .set("d", format!("M {} {} L {} {}", start.x(), start.y(), end.x(), end.y()))
        .set("fill", "none")
        .set("stroke", color.to_string())
        .set("stroke-opacity", color.alpha())
        .set("stroke-width", width)
        .set("marker-end", format!("url(#{})", marker_id(color)));

    if dashed {
        path = path.set("stroke-dasharray", format!("{} {}", width * 3.0, width * 2.0));
    }

    Some((path, start, end))
}

/// Point where the ray from the center of `bounds` toward `toward` leaves
/// the rectangle.
pub fn border_point(bounds: Bounds, toward: Point) -> Option<Point> {
    let center = bounds.center();
    let delta = toward.sub_point(center);
    if delta.x() == 0.0 && delta.y() == 0.0 {
        return None;
    }

    let half_width = bounds.width() / 2.0;
    let half_height = bounds.height() / 2.0;
    let scale_x = if delta.x() == 0.0 {
        f32::INFINITY
    } else {
        half_width / delta.x().abs()
    };
    let scale_y = if delta.y() == 0.0 {
        f32::INFINITY
    } else {
        half_height / delta.y().abs()
    };

    Some(center.add_point(delta.scale(scale_x.min(scale_y))))
}
