//! Picks the sheet of paper out of the detected rectangles.
//!
//! Photographs of a drawing on paper typically yield many candidates: the
//! sheet itself, shapes drawn on it and background clutter. The sheet is
//! taken to be the largest candidate whose four corners all sit on white
//! pixels. Once found, the sheet can be flattened into an upright image of
//! a fixed size.

use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};

use crate::{
    config::WhiteDefinition,
    error::{RectError, Result},
    types::{Point, Quad},
};

/// Largest candidate whose corners all lie on white pixels
pub fn identify_paper_corners(image: &RgbImage, candidates: &[Quad], white: &WhiteDefinition) -> Option<Quad> {
    let mut ordered: Vec<&Quad> = candidates.iter().collect();
    // Stable sort keeps detection order among equal areas
    ordered.sort_by_key(|quad| std::cmp::Reverse(approximate_area(quad)));

    ordered
        .into_iter()
        .find(|quad| quad.vertices.iter().all(|&p| is_white_at(image, p, white)))
        .copied()
}

/// Warp the sheet outlined by `paper` onto a `width` x `height` image.
///
/// Corners are put in clockwise order from the top-left first, so the
/// top-left corner of the sheet lands at the origin. Pixels that sample
/// outside the source are black.
pub fn rectify_paper(image: &RgbImage, paper: &Quad, width: u32, height: u32) -> Result<RgbImage> {
    if width < 2 || height < 2 {
        return Err(RectError::Rectify(format!("output size {}x{} is too small", width, height)));
    }

    if paper.area() < 1.0 {
        return Err(RectError::Rectify(format!("degenerate corners {:?}", paper.vertices)));
    }

    let from = paper.order_clockwise().vertices.map(|p| (p.x as f32, p.y as f32));
    let (right, bottom) = ((width - 1) as f32, (height - 1) as f32);
    let to = [(0.0, 0.0), (right, 0.0), (right, bottom), (0.0, bottom)];

    let projection = Projection::from_control_points(from, to)
        .ok_or_else(|| RectError::Rectify(format!("no projection for corners {:?}", paper.vertices)))?;

    let mut out = RgbImage::new(width, height);
    warp_into(image, &projection, Interpolation::Bilinear, Rgb([0, 0, 0]), &mut out);
    Ok(out)
}

/// Product of the truncated lengths of the two edges leaving vertex 0
pub fn approximate_area(quad: &Quad) -> i64 {
    let [a, b, _, d] = quad.vertices;
    edge_length(a, b) * edge_length(a, d)
}

fn edge_length(a: Point, b: Point) -> i64 {
    let dx = (a.x - b.x) as f64;
    let dy = (a.y - b.y) as f64;
    (dx * dx + dy * dy).sqrt() as i64
}

fn is_white_at(image: &RgbImage, p: Point, white: &WhiteDefinition) -> bool {
    if p.x < 0 || p.y < 0 || p.x as u32 >= image.width() || p.y as u32 >= image.height() {
        return false;
    }
    let [r, g, b] = image.get_pixel(p.x as u32, p.y as u32).0;
    let max = r.max(g).max(b) as f32;
    let min = r.min(g).min(b) as f32;

    let saturation = if max == 0.0 { 0.0 } else { 1.0 - min / max };
    let brightness = max / 255.0;
    saturation < white.saturation && brightness > white.brightness
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> Quad {
        Quad::new([
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ])
    }

    /// Dark background, white sheet at 20..180, red card at 60..100
    fn scene() -> RgbImage {
        let mut img = RgbImage::from_pixel(200, 200, Rgb([40, 40, 40]));
        for y in 20..180 {
            for x in 20..180 {
                img.put_pixel(x, y, Rgb([240, 240, 235]));
            }
        }
        for y in 60..100 {
            for x in 60..100 {
                img.put_pixel(x, y, Rgb([200, 30, 30]));
            }
        }
        img
    }

    #[test]
    fn test_picks_largest_white_cornered_quad() {
        let img = scene();
        let sheet = rect(22, 22, 177, 177);
        let card = rect(62, 62, 97, 97);
        let frame = rect(1, 1, 198, 198);

        let paper = identify_paper_corners(&img, &[card, frame, sheet], &WhiteDefinition::default());
        assert_eq!(paper, Some(sheet));
    }

    #[test]
    fn test_no_white_candidate() {
        let img = scene();
        let card = rect(62, 62, 97, 97);
        assert_eq!(identify_paper_corners(&img, &[card], &WhiteDefinition::default()), None);
    }

    #[test]
    fn test_out_of_bounds_corner_is_not_white() {
        let img = RgbImage::from_pixel(50, 50, Rgb([255, 255, 255]));
        let outside = rect(10, 10, 60, 40);
        assert_eq!(identify_paper_corners(&img, &[outside], &WhiteDefinition::default()), None);
    }

    #[test]
    fn test_approximate_area_truncates_edges() {
        let quad = Quad::new([
            Point::new(0, 0),
            Point::new(3, 3),
            Point::new(3, 10),
            Point::new(0, 7),
        ]);
        // sqrt(18) -> 4, 7 -> 7
        assert_eq!(approximate_area(&quad), 28);
    }

    /// White sheet with corners (60,20), (180,60), (140,180), (20,140) and
    /// a red marker near its top-left corner, on a dark background
    fn tilted_sheet() -> (RgbImage, Quad) {
        let sheet = Quad::new([
            Point::new(20, 140),
            Point::new(140, 180),
            Point::new(180, 60),
            Point::new(60, 20),
        ]);
        let ring = sheet.to_geo_polygon();
        let marker = Point::new(78, 45);

        let mut img = RgbImage::from_pixel(200, 200, Rgb([20, 20, 20]));
        for y in 0..200 {
            for x in 0..200 {
                use geo::Contains;
                let inside = ring.contains(&geo_types::Point::new(x as f64, y as f64));
                if !inside {
                    continue;
                }
                let near_marker = (x - marker.x).abs() <= 8 && (y - marker.y).abs() <= 8;
                let color = if near_marker { Rgb([220, 20, 20]) } else { Rgb([245, 245, 245]) };
                img.put_pixel(x as u32, y as u32, color);
            }
        }
        (img, sheet)
    }

    #[test]
    fn test_rectify_flattens_tilted_sheet() {
        let (img, sheet) = tilted_sheet();
        let flat = rectify_paper(&img, &sheet, 100, 140).expect("Should rectify");

        assert_eq!(flat.dimensions(), (100, 140));
        // Interior of the sheet is white everywhere away from the marker
        for &(x, y) in &[(50, 70), (85, 20), (85, 120), (15, 120)] {
            assert!(
                is_white_at(&flat, Point::new(x, y), &WhiteDefinition::default()),
                "({}, {}) should be paper",
                x,
                y
            );
        }
        // The marker near the top-left corner ends up in the top-left of the output
        let [r, g, _] = flat.get_pixel(20, 20).0;
        assert!(r > 150 && g < 100, "Marker should land top-left, got {:?}", flat.get_pixel(20, 20));
    }

    #[test]
    fn test_rectify_rejects_degenerate_corners() {
        let img = RgbImage::new(50, 50);
        let collapsed = Quad::new([Point::new(10, 10); 4]);
        assert!(matches!(
            rectify_paper(&img, &collapsed, 20, 20),
            Err(RectError::Rectify(_))
        ));
        assert!(rectify_paper(&img, &rect(0, 0, 40, 40), 1, 20).is_err());
    }

    #[test]
    fn test_black_pixel_has_zero_saturation_but_is_not_white() {
        let img = RgbImage::new(4, 4);
        assert!(!is_white_at(&img, Point::new(1, 1), &WhiteDefinition::default()));
    }
}
