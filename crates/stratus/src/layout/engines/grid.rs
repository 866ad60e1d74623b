//! Grid layout engine
//!
//! Arranges components row by row in a square-ish grid that tiles the whole
//! canvas. Each component is centered in its cell and never larger than it.

use stratus_core::{
    geometry::{Bounds, Point, Size},
    model::ComponentKind,
};

use crate::layout::engines::LayoutEngine;

/// Grid layout engine implementation
#[derive(Debug, Default)]
pub struct Engine {
    node_size: Size,
}

impl Engine {
    /// Create a new grid layout engine
    pub fn new() -> Self {
        Self {
            node_size: Size::new(120.0, 60.0),
        }
    }

    /// Set the preferred component size
    pub fn set_node_size(&mut self, size: Size) -> &mut Self {
        self.node_size = size;
        self
    }
}

impl LayoutEngine for Engine {
    fn place(&self, canvas: Size, kinds: &[ComponentKind]) -> Vec<Bounds> {
        cells(kinds.len(), canvas)
            .into_iter()
            .map(|cell| {
                let size = self.node_size.min(cell.to_size());
                Bounds::new_from_center(cell.center(), size).intersect(&cell)
            })
            .collect()
    }
}

/// Column and row counts for `count` items: `cols = ceil(sqrt(n))`,
/// `rows = ceil(n / cols)`.
pub fn dimensions(count: usize) -> (usize, usize) {
    if count == 0 {
        return (0, 0);
    }
    let mut cols = (count as f64).sqrt() as usize;
    while cols * cols < count {
        cols += 1;
    }
    (cols, count.div_ceil(cols))
}

/// The first `count` cells of the grid, row-major.
///
/// Cell boundaries are shared between neighbours, and the last row and
/// column end exactly on the canvas edge.
pub fn cells(count: usize, canvas: Size) -> Vec<Bounds> {
    let (cols, rows) = dimensions(count);
    let xs = boundaries(canvas.width(), cols);
    let ys = boundaries(canvas.height(), rows);

    (0..count)
        .map(|idx| {
            let (row, col) = (idx / cols, idx % cols);
            Bounds::from_corners(
                Point::new(xs[col], ys[row]),
                Point::new(xs[col + 1], ys[row + 1]),
            )
        })
        .collect()
}

fn boundaries(total: f32, parts: usize) -> Vec<f32> {
    (0..=parts)
        .map(|i| {
            if i == parts {
                total
            } else {
                total * i as f32 / parts as f32
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        assert_eq!(dimensions(0), (0, 0));
        assert_eq!(dimensions(1), (1, 1));
        assert_eq!(dimensions(2), (2, 1));
        assert_eq!(dimensions(4), (2, 2));
        assert_eq!(dimensions(5), (3, 2));
        assert_eq!(dimensions(9), (3, 3));
        assert_eq!(dimensions(10), (4, 3));
    }

    #[test]
    fn test_four_components_quadrants() {
        let canvas = Size::new(800.0, 600.0);
        let positions = Engine::new().place(canvas, &[ComponentKind::Generic; 4]);

        assert_eq!(positions.len(), 4);
        assert_eq!(positions[0].center(), Point::new(200.0, 150.0));
        assert_eq!(positions[1].center(), Point::new(600.0, 150.0));
        assert_eq!(positions[2].center(), Point::new(200.0, 450.0));
        assert_eq!(positions[3].center(), Point::new(600.0, 450.0));
        assert_eq!(positions[0].to_size(), Size::new(120.0, 60.0));
    }

    #[test]
    fn test_node_clamped_to_cell() {
        let canvas = Size::new(100.0, 40.0);
        let positions = Engine::new().place(canvas, &[ComponentKind::Generic; 2]);

        assert_eq!(positions[0], Bounds::new(0.0, 0.0, 50.0, 40.0));
        assert_eq!(positions[1], Bounds::new(50.0, 0.0, 50.0, 40.0));
    }

    #[test]
    fn test_empty() {
        assert!(Engine::new().place(Size::new(10.0, 10.0), &[]).is_empty());
    }
}
