use geo_types::{Coord, LineString};
use crate::{traits::PolygonApproximator, types::Point};

/// Closed-ring Douglas-Peucker using geo crate's implementation.
///
/// The ring is rotated to begin at an extreme vertex first. Douglas-Peucker
/// always keeps its endpoints, so starting mid-edge would leave the seam in
/// the output as a spurious vertex.
#[derive(Debug, Clone, Default)]
pub struct DouglasPeuckerApproximator;

impl PolygonApproximator for DouglasPeuckerApproximator {
    fn approximate(&self, contour: &[Point], epsilon_ratio: f64) -> Vec<Point> {
        use geo::Simplify;

        if contour.len() < 3 {
            return contour.to_vec();
        }
        let epsilon = epsilon_ratio * closed_arc_length(contour);
        if epsilon <= 0.0 {
            return contour.to_vec();
        }

        let start = extreme_vertex(contour);
        let mut coords: Vec<Coord<f64>> = contour[start..]
            .iter()
            .chain(&contour[..start])
            .map(|p| p.to_coord())
            .collect();
        coords.push(contour[start].to_coord());

        let simplified = LineString::new(coords).simplify(&epsilon);
        let mut polygon: Vec<Point> = simplified
            .coords()
            .map(|c| Point::new(c.x.round() as i32, c.y.round() as i32))
            .collect();

        // Drop the closing vertex
        if polygon.len() > 1 && polygon.first() == polygon.last() {
            polygon.pop();
        }
        polygon
    }
}

/// Perimeter of the contour treated as a closed ring
pub fn closed_arc_length(contour: &[Point]) -> f64 {
    use geo::EuclideanLength;

    let mut coords: Vec<Coord<f64>> = contour.iter().map(|p| p.to_coord()).collect();
    if let Some(first) = contour.first() {
        coords.push(first.to_coord());
    }
    LineString::new(coords).euclidean_length()
}

/// Index of the vertex farthest from the first one. Such a vertex always
/// lies on the convex hull.
fn extreme_vertex(contour: &[Point]) -> usize {
    let origin = contour[0];
    contour
        .iter()
        .enumerate()
        .max_by_key(|(_, p)| {
            let dx = (p.x - origin.x) as i64;
            let dy = (p.y - origin.y) as i64;
            dx * dx + dy * dy
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every integer point on the border of an axis-aligned rectangle,
    /// clockwise, starting at `start_offset` along the top edge.
    fn rectangle_contour(x0: i32, y0: i32, x1: i32, y1: i32, start_offset: i32) -> Vec<Point> {
        let mut points = Vec::new();
        for x in x0..x1 {
            points.push(Point::new(x, y0));
        }
        for y in y0..y1 {
            points.push(Point::new(x1, y));
        }
        for x in (x0 + 1..=x1).rev() {
            points.push(Point::new(x, y1));
        }
        for y in (y0 + 1..=y1).rev() {
            points.push(Point::new(x0, y));
        }
        points.rotate_left(start_offset as usize);
        points
    }

    fn sorted(mut points: Vec<Point>) -> Vec<Point> {
        points.sort_by_key(|p| (p.x, p.y));
        points
    }

    #[test]
    fn test_rectangle_reduces_to_corners() {
        let contour = rectangle_contour(10, 20, 110, 80, 0);
        let polygon = DouglasPeuckerApproximator.approximate(&contour, 0.02);
        assert_eq!(
            sorted(polygon),
            vec![Point::new(10, 20), Point::new(10, 80), Point::new(110, 20), Point::new(110, 80)]
        );
    }

    #[test]
    fn test_seam_in_middle_of_edge_is_removed() {
        let contour = rectangle_contour(0, 0, 100, 100, 37);
        assert_ne!(contour[0], Point::new(0, 0));
        let polygon = DouglasPeuckerApproximator.approximate(&contour, 0.02);
        assert_eq!(polygon.len(), 4, "Got {:?}", polygon);
    }

    #[test]
    fn test_small_jitter_is_absorbed() {
        let mut contour = rectangle_contour(0, 0, 100, 60, 0);
        for (i, p) in contour.iter_mut().enumerate() {
            if i % 7 == 3 && p.y == 0 && p.x > 5 && p.x < 95 {
                p.y += 1;
            }
        }
        let polygon = DouglasPeuckerApproximator.approximate(&contour, 0.02);
        assert_eq!(polygon.len(), 4);
    }

    #[test]
    fn test_triangle_keeps_three_vertices() {
        let mut contour = Vec::new();
        for i in 0..50 {
            contour.push(Point::new(i, 0));
        }
        for i in 0..50 {
            contour.push(Point::new(50 - i, i));
        }
        for i in 0..50 {
            contour.push(Point::new(0, 50 - i));
        }
        let polygon = DouglasPeuckerApproximator.approximate(&contour, 0.02);
        assert_eq!(polygon.len(), 3, "Got {:?}", polygon);
    }

    #[test]
    fn test_closed_arc_length() {
        let contour = vec![Point::new(0, 0), Point::new(3, 0), Point::new(3, 4)];
        assert!((closed_arc_length(&contour) - 12.0).abs() < 1e-9);
    }
}
