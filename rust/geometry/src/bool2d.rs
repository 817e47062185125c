// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D Boolean Operations for Footprints
//!
//! Thin layer over the i_overlay crate. Footprints are unions of many small
//! triangles, so the union runs as a single overlay with every triangle in the
//! subject set rather than folding pairwise.

use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use nalgebra::Point2;

/// i_overlay path: a closed contour of `[x, y]` points
pub(crate) type Path = Vec<[f64; 2]>;

/// i_overlay shape: first contour is the outer boundary, the rest are holes
pub(crate) type Shape = Vec<Path>;

/// Union a set of triangles.
///
/// Each triangle is rewound counter-clockwise first. Top and bottom faces of
/// a closed solid project with opposite winding, and under the non-zero fill
/// rule they would otherwise cancel each other out.
pub(crate) fn union_triangles(triangles: &[[Point2<f64>; 3]]) -> Vec<Shape> {
    if triangles.is_empty() {
        return Vec::new();
    }

    let subject: Vec<Path> = triangles
        .iter()
        .map(|t| contour_to_path(&ensure_ccw(t)))
        .collect();
    let clip: Vec<Path> = Vec::new();

    subject.overlay(&clip, OverlayRule::Union, FillRule::NonZero)
}

/// Intersect two sets of non-overlapping shapes.
///
/// Shapes produced by [`union_triangles`] never overlap each other, so the
/// even-odd rule fills them correctly whatever their orientation.
pub(crate) fn intersect_shapes(a: &[Shape], b: &[Shape]) -> Vec<Shape> {
    let subject: Vec<Path> = a.iter().flatten().cloned().collect();
    let clip: Vec<Path> = b.iter().flatten().cloned().collect();
    if subject.is_empty() || clip.is_empty() {
        return Vec::new();
    }

    subject.overlay(&clip, OverlayRule::Intersect, FillRule::EvenOdd)
}

/// Area of i_overlay output shapes
pub(crate) fn shapes_area(shapes: &[Shape]) -> f64 {
    shapes
        .iter()
        .filter_map(|shape| {
            let (outer, holes) = shape.split_first()?;
            let holes_area: f64 = holes.iter().map(|h| path_signed_area(h).abs()).sum();
            Some(path_signed_area(outer).abs() - holes_area)
        })
        .sum()
}

/// Compute the signed area of a 2D contour
/// Positive = counter-clockwise, Negative = clockwise
pub fn compute_signed_area(contour: &[Point2<f64>]) -> f64 {
    if contour.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    let n = contour.len();

    for i in 0..n {
        let j = (i + 1) % n;
        area += contour[i].x * contour[j].y;
        area -= contour[j].x * contour[i].y;
    }

    area * 0.5
}

fn path_signed_area(path: &[[f64; 2]]) -> f64 {
    let n = path.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += path[i][0] * path[j][1] - path[j][0] * path[i][1];
    }
    area * 0.5
}

/// Ensure contour has counter-clockwise winding (positive area)
pub fn ensure_ccw(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    if compute_signed_area(contour) < 0.0 {
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Ensure contour has clockwise winding (for holes)
pub fn ensure_cw(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    if compute_signed_area(contour) > 0.0 {
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Compute bounding box of a contour
pub fn contour_bounds(contour: &[Point2<f64>]) -> Option<(Point2<f64>, Point2<f64>)> {
    let (first, rest) = contour.split_first()?;

    let mut min = *first;
    let mut max = *first;

    for p in rest {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }

    Some((min, max))
}

/// Check if two bounding boxes overlap
pub fn bounds_overlap(
    a_min: &Point2<f64>,
    a_max: &Point2<f64>,
    b_min: &Point2<f64>,
    b_max: &Point2<f64>,
) -> bool {
    a_min.x <= b_max.x && a_max.x >= b_min.x && a_min.y <= b_max.y && a_max.y >= b_min.y
}

pub(crate) fn contour_to_path(contour: &[Point2<f64>]) -> Path {
    contour.iter().map(|p| [p.x, p.y]).collect()
}

pub(crate) fn path_to_contour(path: &[[f64; 2]]) -> Vec<Point2<f64>> {
    path.iter().map(|p| Point2::new(p[0], p[1])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tri(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> [Point2<f64>; 3] {
        [
            Point2::new(a.0, a.1),
            Point2::new(b.0, b.1),
            Point2::new(c.0, c.1),
        ]
    }

    #[test]
    fn test_compute_signed_area_ccw() {
        let contour = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        assert_relative_eq!(compute_signed_area(&contour), 1.0);
        assert_relative_eq!(compute_signed_area(&ensure_cw(&contour)), -1.0);
    }

    #[test]
    fn test_union_of_opposite_windings_does_not_cancel() {
        // Same unit square twice: once counter-clockwise, once clockwise
        // (what the top and bottom faces of a slab look like from above).
        let triangles = vec![
            tri((0.0, 0.0), (1.0, 0.0), (1.0, 1.0)),
            tri((0.0, 0.0), (1.0, 1.0), (0.0, 1.0)),
            tri((0.0, 0.0), (1.0, 1.0), (1.0, 0.0)),
            tri((0.0, 0.0), (0.0, 1.0), (1.0, 1.0)),
        ];
        let shapes = union_triangles(&triangles);
        assert_eq!(shapes.len(), 1);
        assert_relative_eq!(shapes_area(&shapes), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_union_disjoint_triangles_keeps_parts() {
        let triangles = vec![
            tri((0.0, 0.0), (1.0, 0.0), (0.0, 1.0)),
            tri((5.0, 5.0), (6.0, 5.0), (5.0, 6.0)),
        ];
        let shapes = union_triangles(&triangles);
        assert_eq!(shapes.len(), 2);
        assert_relative_eq!(shapes_area(&shapes), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_intersect_shapes() {
        let a = union_triangles(&[
            tri((0.0, 0.0), (2.0, 0.0), (2.0, 2.0)),
            tri((0.0, 0.0), (2.0, 2.0), (0.0, 2.0)),
        ]);
        let b = union_triangles(&[
            tri((1.0, 1.0), (3.0, 1.0), (3.0, 3.0)),
            tri((1.0, 1.0), (3.0, 3.0), (1.0, 3.0)),
        ]);
        let overlap = intersect_shapes(&a, &b);
        assert_relative_eq!(shapes_area(&overlap), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bounds_overlap() {
        let a_min = Point2::new(0.0, 0.0);
        let a_max = Point2::new(10.0, 10.0);
        let b_min = Point2::new(5.0, 5.0);
        let b_max = Point2::new(15.0, 15.0);
        let c_min = Point2::new(20.0, 20.0);
        let c_max = Point2::new(30.0, 30.0);

        assert!(bounds_overlap(&a_min, &a_max, &b_min, &b_max));
        assert!(!bounds_overlap(&a_min, &a_max, &c_min, &c_max));
    }

    #[test]
    fn test_contour_bounds() {
        let contour = vec![
            Point2::new(1.0, -2.0),
            Point2::new(4.0, 0.5),
            Point2::new(-1.0, 3.0),
        ];
        let (min, max) = contour_bounds(&contour).unwrap();
        assert_eq!((min.x, min.y, max.x, max.y), (-1.0, -2.0, 4.0, 3.0));
        assert!(contour_bounds(&[]).is_none());
    }
}
