//! 2D convex hull and screen-rectangle clipping
//!
//! Screen-space coverage of a projected bounding box: gift-wrap the
//! projected corners into a convex hull, clip the hull against the unit
//! square, then measure the remaining polygon with the shoelace formula.

use crate::core::types::Vec2;

fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Gift-wrapping convex hull, clockwise winding.
///
/// Starts from the leftmost point (lowest y on ties) and repeatedly picks
/// the most clockwise next point; collinear ties take the farther point.
/// Inputs with fewer than 3 distinct points come back as given.
pub fn convex_hull(points: &[Vec2]) -> Vec<Vec2> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let start = points
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            a.x.partial_cmp(&b.x)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal))
        })
        .map(|(i, _)| i)
        .unwrap_or(0);

    let mut hull = Vec::new();
    let mut current = start;

    loop {
        hull.push(points[current]);

        let mut next = (current + 1) % points.len();
        for (i, &r) in points.iter().enumerate() {
            if i == current || i == next {
                continue;
            }
            let turn = cross(points[next] - points[current], r - points[current]);
            let farther = points[current].distance_squared(r)
                > points[current].distance_squared(points[next]);
            if turn < 0.0 || (turn == 0.0 && farther) {
                next = i;
            }
        }

        current = next;
        if current == start || hull.len() > points.len() {
            break;
        }
    }

    hull
}

/// Clip a polygon against the unit square [0,1]x[0,1] (Sutherland-Hodgman).
pub fn clip_unit_square(polygon: &[Vec2]) -> Vec<Vec2> {
    // (inside test, clip line as origin + axis flag) for each square edge
    let edges: [(fn(Vec2) -> bool, fn(Vec2, Vec2) -> Vec2); 4] = [
        (|p| p.x >= 0.0, |a, b| intersect_vertical(a, b, 0.0)),
        (|p| p.x <= 1.0, |a, b| intersect_vertical(a, b, 1.0)),
        (|p| p.y >= 0.0, |a, b| intersect_horizontal(a, b, 0.0)),
        (|p| p.y <= 1.0, |a, b| intersect_horizontal(a, b, 1.0)),
    ];

    let mut output = polygon.to_vec();
    for (inside, intersect) in edges {
        if output.is_empty() {
            break;
        }
        let input = std::mem::take(&mut output);
        for i in 0..input.len() {
            let a = input[i];
            let b = input[(i + 1) % input.len()];
            match (inside(a), inside(b)) {
                (true, true) => output.push(b),
                (true, false) => output.push(intersect(a, b)),
                (false, true) => {
                    output.push(intersect(a, b));
                    output.push(b);
                }
                (false, false) => {}
            }
        }
    }
    output
}

fn intersect_vertical(a: Vec2, b: Vec2, x: f32) -> Vec2 {
    let t = (x - a.x) / (b.x - a.x);
    Vec2::new(x, a.y + t * (b.y - a.y))
}

fn intersect_horizontal(a: Vec2, b: Vec2, y: f32) -> Vec2 {
    let t = (y - a.y) / (b.y - a.y);
    Vec2::new(a.x + t * (b.x - a.x), y)
}

/// Polygon area via the shoelace formula. Degenerate polygons (fewer
/// than 3 vertices) have area 0.
pub fn polygon_area(polygon: &[Vec2]) -> f32 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0;
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[(i + 1) % polygon.len()];
        twice_area += cross(a, b);
    }
    (twice_area * 0.5).abs()
}

/// On-screen area of a projected point cloud: hull, clip, measure.
///
/// Returns 0 for fewer than 3 points and for hulls entirely outside the
/// unit square.
pub fn projected_area(points: &[Vec2]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }
    let hull = convex_hull(points);
    if hull.len() < 3 {
        return 0.0;
    }
    polygon_area(&clip_unit_square(&hull))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hull_square() {
        let points = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(0.5, 0.5), // interior, must be dropped
        ];
        let hull = convex_hull(&points);
        assert_eq!(hull.len(), 4);
        assert!(!hull.contains(&Vec2::new(0.5, 0.5)));
    }

    #[test]
    fn test_area_unit_square() {
        let square = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
        ];
        assert!((polygon_area(&square) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_projected_area_reorder_invariant() {
        let points = vec![
            Vec2::new(0.1, 0.1),
            Vec2::new(0.6, 0.2),
            Vec2::new(0.7, 0.8),
            Vec2::new(0.2, 0.7),
        ];
        let base = projected_area(&points);
        assert!(base > 0.0);

        let mut shuffled = points.clone();
        shuffled.reverse();
        shuffled.swap(0, 2);
        assert!((projected_area(&shuffled) - base).abs() < 1e-5);
    }

    #[test]
    fn test_projected_area_too_few_points() {
        assert_eq!(projected_area(&[]), 0.0);
        assert_eq!(projected_area(&[Vec2::new(0.5, 0.5)]), 0.0);
        assert_eq!(
            projected_area(&[Vec2::new(0.1, 0.1), Vec2::new(0.9, 0.9)]),
            0.0
        );
    }

    #[test]
    fn test_projected_area_clipped_to_viewport() {
        // A 2x2 square centered on the viewport covers exactly the unit square
        let big = vec![
            Vec2::new(-0.5, -0.5),
            Vec2::new(1.5, -0.5),
            Vec2::new(1.5, 1.5),
            Vec2::new(-0.5, 1.5),
        ];
        assert!((projected_area(&big) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_projected_area_outside_viewport() {
        let off_screen = vec![
            Vec2::new(2.0, 2.0),
            Vec2::new(3.0, 2.0),
            Vec2::new(3.0, 3.0),
        ];
        assert_eq!(projected_area(&off_screen), 0.0);
    }

    #[test]
    fn test_collinear_points_zero_area() {
        let line = vec![
            Vec2::new(0.1, 0.1),
            Vec2::new(0.5, 0.5),
            Vec2::new(0.9, 0.9),
        ];
        assert!(projected_area(&line).abs() < 1e-6);
    }
}
