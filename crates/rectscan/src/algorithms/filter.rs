use geo_types::{Coord, LineString};
use crate::{traits::ConvexityTest, types::{Point, Quad}};

/// Guards the cosine against zero-length edges
const COSINE_EPSILON: f64 = 1e-10;

/// Convexity predicate using geo crate's implementation
#[derive(Debug, Clone, Default)]
pub struct GeoConvexity;

impl ConvexityTest for GeoConvexity {
    fn is_convex(&self, polygon: &[Point]) -> bool {
        use geo::IsConvex;

        if polygon.len() < 3 {
            return false;
        }
        let mut coords: Vec<Coord<f64>> = polygon.iter().map(|p| p.to_coord()).collect();
        coords.push(polygon[0].to_coord());
        LineString::new(coords).is_convex()
    }
}

/// Why a polygon was not accepted as a rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    VertexCount(usize),
    Area(f64),
    NotConvex,
    Corner(f64),
}

/// Acceptance test for rectangle candidates
#[derive(Debug, Clone)]
pub struct GeometricFilter {
    /// Area must be strictly greater than this
    pub min_area: f64,
    /// Every corner's absolute cosine must be strictly below this
    pub max_cosine: f64,
}

impl Default for GeometricFilter {
    fn default() -> Self {
        Self {
            min_area: 1000.0,
            max_cosine: 0.3,
        }
    }
}

impl GeometricFilter {
    /// Apply the tests in order, stopping at the first failure
    pub fn evaluate(&self, polygon: &[Point], convexity: &dyn ConvexityTest) -> Result<Quad, Rejection> {
        let quad = Quad::from_slice(polygon).ok_or(Rejection::VertexCount(polygon.len()))?;

        let area = quad.area();
        if area <= self.min_area {
            return Err(Rejection::Area(area));
        }

        if !convexity.is_convex(&quad.vertices) {
            return Err(Rejection::NotConvex);
        }

        let cosine = max_corner_cosine(&quad.vertices);
        if cosine >= self.max_cosine {
            return Err(Rejection::Corner(cosine));
        }

        Ok(quad)
    }

    pub fn accept(&self, polygon: &[Point], convexity: &dyn ConvexityTest) -> Option<Quad> {
        self.evaluate(polygon, convexity).ok()
    }
}

/// Cosine of the angle at `vertex` between the edges towards `prev` and `next`
pub fn corner_cosine(prev: Point, vertex: Point, next: Point) -> f64 {
    let dx1 = (prev.x - vertex.x) as f64;
    let dy1 = (prev.y - vertex.y) as f64;
    let dx2 = (next.x - vertex.x) as f64;
    let dy2 = (next.y - vertex.y) as f64;
    (dx1 * dx2 + dy1 * dy2) / ((dx1 * dx1 + dy1 * dy1) * (dx2 * dx2 + dy2 * dy2) + COSINE_EPSILON).sqrt()
}

/// Largest absolute corner cosine over every vertex of a closed polygon
pub fn max_corner_cosine(polygon: &[Point]) -> f64 {
    let n = polygon.len();
    (0..n)
        .map(|i| corner_cosine(polygon[(i + n - 1) % n], polygon[i], polygon[(i + 1) % n]).abs())
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(i32, i32)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_accepts_axis_aligned_square() {
        let square = pts(&[(50, 50), (150, 50), (150, 150), (50, 150)]);
        let quad = GeometricFilter::default()
            .accept(&square, &GeoConvexity)
            .expect("Square should be accepted");
        assert_eq!(quad.vertices[0], Point::new(50, 50));
    }

    #[test]
    fn test_accepts_rotated_rectangle() {
        let diamond = pts(&[(100, 20), (180, 100), (100, 180), (20, 100)]);
        assert!(GeometricFilter::default().accept(&diamond, &GeoConvexity).is_some());
    }

    #[test]
    fn test_rejects_wrong_vertex_count() {
        let triangle = pts(&[(0, 0), (100, 0), (0, 100)]);
        assert_eq!(
            GeometricFilter::default().evaluate(&triangle, &GeoConvexity),
            Err(Rejection::VertexCount(3))
        );
    }

    #[test]
    fn test_rejects_small_area() {
        // 30 x 30 = 900, below the 1000 floor
        let small = pts(&[(0, 0), (30, 0), (30, 30), (0, 30)]);
        assert!(matches!(
            GeometricFilter::default().evaluate(&small, &GeoConvexity),
            Err(Rejection::Area(_))
        ));
    }

    #[test]
    fn test_area_floor_is_exclusive() {
        // 40 x 25 = 1000 exactly
        let boundary = pts(&[(0, 0), (40, 0), (40, 25), (0, 25)]);
        assert!(GeometricFilter::default().accept(&boundary, &GeoConvexity).is_none());
    }

    #[test]
    fn test_rejects_concave_quad() {
        let dart = pts(&[(0, 0), (100, 50), (0, 100), (40, 50)]);
        assert_eq!(
            GeometricFilter::default().evaluate(&dart, &GeoConvexity),
            Err(Rejection::NotConvex)
        );
    }

    #[test]
    fn test_rejects_skewed_parallelogram() {
        // 45 degree corners, cosine ~0.707
        let skewed = pts(&[(0, 0), (100, 0), (200, 100), (100, 100)]);
        match GeometricFilter::default().evaluate(&skewed, &GeoConvexity) {
            Err(Rejection::Corner(c)) => assert!(c > 0.7 && c < 0.71),
            other => panic!("Expected corner rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_corner_cosine_right_angle() {
        let c = corner_cosine(Point::new(10, 0), Point::new(0, 0), Point::new(0, 10));
        assert!(c.abs() < 1e-12);
    }

    #[test]
    fn test_corner_cosine_degenerate_edge_is_finite() {
        let c = corner_cosine(Point::new(0, 0), Point::new(0, 0), Point::new(5, 5));
        assert!(c.is_finite());
        assert_eq!(c, 0.0);
    }

    #[test]
    fn test_max_cosine_checks_every_corner() {
        // The corner at index 0 is the most skewed
        let kite = pts(&[(0, 0), (100, 10), (100, 100), (10, 100)]);
        let max = max_corner_cosine(&kite);
        let at_zero = corner_cosine(kite[3], kite[0], kite[1]).abs();
        assert!(at_zero > 0.1);
        assert!((max - at_zero).abs() < 1e-12);
    }

    #[test]
    fn test_convexity_of_square_and_dart() {
        let square = pts(&[(0, 0), (10, 0), (10, 10), (0, 10)]);
        let dart = pts(&[(0, 0), (10, 5), (0, 10), (4, 5)]);
        assert!(GeoConvexity.is_convex(&square));
        assert!(!GeoConvexity.is_convex(&dart));
    }
}
