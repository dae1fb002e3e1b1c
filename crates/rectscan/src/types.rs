use serde::{Deserialize, Serialize};
use geo_types::{Coord, LineString, Polygon};
use strum::{Display, EnumIter};

/// Integer pixel coordinate. Serializes as `{"x":..,"y":..}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn to_coord(self) -> Coord<f64> {
        Coord { x: self.x as f64, y: self.y as f64 }
    }
}

impl From<imageproc::point::Point<i32>> for Point {
    fn from(p: imageproc::point::Point<i32>) -> Self {
        Self { x: p.x, y: p.y }
    }
}

/// Closed boundary as produced by contour extraction.
pub type Contour = Vec<Point>;

/// Color plane of a decoded RGB image, in processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
        }
    }
}

/// One pass of binary mask generation over a channel plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdLevel {
    /// Edge detection followed by gap-closing dilation.
    Edge,
    /// Foreground where intensity >= `cut`.
    Intensity { cut: u8 },
}

impl ThresholdLevel {
    /// Level `l` of `count` levels. Level 0 is always the edge level.
    pub fn for_index(l: u32, count: u32) -> Self {
        if l == 0 {
            Self::Edge
        } else {
            let cut = (l + 1) * 255 / count.max(1);
            Self::Intensity { cut: cut.min(255) as u8 }
        }
    }

    /// All levels for a configured count, in scan order.
    pub fn sequence(count: u32) -> Vec<Self> {
        (0..count).map(|l| Self::for_index(l, count)).collect()
    }
}

impl std::fmt::Display for ThresholdLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Edge => write!(f, "edge"),
            Self::Intensity { cut } => write!(f, "intensity>={cut}"),
        }
    }
}

/// A polygon that passed every geometric test: four vertices, convex,
/// large enough and with near-right corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quad {
    pub vertices: [Point; 4],
}

impl Quad {
    pub fn new(vertices: [Point; 4]) -> Self {
        Self { vertices }
    }

    /// Builds a quad from a polygon with exactly four vertices.
    pub fn from_slice(points: &[Point]) -> Option<Self> {
        let vertices: [Point; 4] = points.try_into().ok()?;
        Some(Self { vertices })
    }

    /// Closed ring, first vertex repeated at the end.
    pub fn to_ring(&self) -> LineString<f64> {
        let mut coords: Vec<Coord<f64>> = self.vertices.iter().map(|p| p.to_coord()).collect();
        coords.push(self.vertices[0].to_coord());
        LineString::new(coords)
    }

    pub fn to_geo_polygon(&self) -> Polygon<f64> {
        Polygon::new(self.to_ring(), vec![])
    }

    /// Absolute shoelace area.
    pub fn area(&self) -> f64 {
        use geo::Area;
        self.to_geo_polygon().unsigned_area()
    }

    /// Closed perimeter length.
    pub fn perimeter(&self) -> f64 {
        use geo::EuclideanLength;
        self.to_ring().euclidean_length()
    }

    /// Largest absolute corner cosine over the four vertices.
    pub fn max_cosine(&self) -> f64 {
        crate::algorithms::filter::max_corner_cosine(&self.vertices)
    }

    pub fn bounding_box(&self) -> (Point, Point) {
        let mut min = self.vertices[0];
        let mut max = self.vertices[0];
        for p in &self.vertices[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        (min, max)
    }

    /// Same vertices, clockwise on screen starting at the top-left corner.
    ///
    /// The top-left corner is the first vertex with the smallest `x + y`. Of its
    /// two neighbours, the one at the greater angle above its horizontal comes
    /// next. Vertices must already be in boundary order.
    pub fn order_clockwise(&self) -> Quad {
        let start = (0..4)
            .min_by_key(|&i| (self.vertices[i].x + self.vertices[i].y, i))
            .unwrap_or(0);
        let origin = self.vertices[start];
        let prev = self.vertices[(start + 3) % 4];
        let next = self.vertices[(start + 1) % 4];

        let step = if relative_angle(origin, prev) >= relative_angle(origin, next) { 3 } else { 1 };
        Quad::new(std::array::from_fn(|i| self.vertices[(start + i * step) % 4]))
    }
}

/// Monotonic stand-in for the angle of `point` seen from `center`, y up:
/// sine of the angle, folded to span -2..=2 for points to the left.
fn relative_angle(center: Point, point: Point) -> f64 {
    let x = (point.x - center.x) as f64;
    let y = -(point.y - center.y) as f64;
    let hypotenuse = x.hypot(y);
    if hypotenuse == 0.0 {
        return 0.0;
    }
    let sine = y / hypotenuse;

    match (x >= 0.0, y >= 0.0) {
        (true, _) => sine,
        (false, true) => 2.0 - sine,
        (false, false) => -2.0 - sine,
    }
}
