#![allow(clippy::unwrap_used)]

mod common;

use approx::assert_abs_diff_eq;
use common::{init_tracing, rect_shape, total_area};
use vectis::geometry::{Path, Shape, SimplePath};
use vectis::math::Point2;
use vectis::operations::boolean::{Difference, FillRule, Intersect, Union, Xor};
use vectis::operations::creation::{MakeRegularPolygon, MakeStar};
use vectis::operations::normalize::RingNormalizer;

fn pairs() -> Vec<(Shape, Shape)> {
    let hexagon: Shape = MakeRegularPolygon::new(Point2::new(8.0, 6.0), 6, 6.0).execute().unwrap().into();
    let star: Shape = MakeStar::new(Point2::new(4.0, 4.0), 5, 2.0, 7.0).execute().unwrap().into();
    let triangle: Shape =
        Path::polygon(vec![Point2::new(-3.0, 1.0), Point2::new(13.0, 2.0), Point2::new(5.0, 14.0)]).into();
    vec![
        (rect_shape(0.0, 0.0, 10.0, 10.0), hexagon.clone()),
        (rect_shape(0.0, 0.0, 10.0, 10.0), star.clone()),
        (triangle, hexagon),
        (star, rect_shape(2.0, -5.0, 3.0, 20.0)),
    ]
}

fn area_of(shape: &Shape) -> f64 {
    total_area(shape.paths()).abs()
}

#[test]
fn union_and_intersection_bound_the_inputs() {
    init_tracing();
    for (a, b) in pairs() {
        let (sa, sb) = ([a.clone()], [b.clone()]);
        let union = total_area(&Union::new(&sa, &sb).execute().unwrap());
        let inter = total_area(&Intersect::new(&sa, &sb).execute().unwrap());
        let (area_a, area_b) = (area_of(&a), area_of(&b));
        assert!(union >= area_a.max(area_b) - 1e-6, "union={union}");
        assert!(inter <= area_a.min(area_b) + 1e-6, "inter={inter}");
        assert!(inter >= 0.0);
    }
}

#[test]
fn difference_and_intersection_rebuild_the_subject() {
    for (a, b) in pairs() {
        let (sa, sb) = ([a.clone()], [b]);
        let diff = total_area(&Difference::new(&sa, &sb).execute().unwrap());
        let inter = total_area(&Intersect::new(&sa, &sb).execute().unwrap());
        assert_abs_diff_eq!(diff + inter, area_of(&a), epsilon = 1e-6);
    }
}

#[test]
fn xor_is_union_minus_intersection() {
    for (a, b) in pairs() {
        let (sa, sb) = ([a], [b]);
        let union = total_area(&Union::new(&sa, &sb).execute().unwrap());
        let inter = total_area(&Intersect::new(&sa, &sb).execute().unwrap());
        let xor = total_area(&Xor::new(&sa, &sb).execute().unwrap());
        assert_abs_diff_eq!(xor, union - inter, epsilon = 1e-6);
    }
}

#[test]
fn union_and_intersection_commute() {
    for (a, b) in pairs() {
        let (sa, sb) = ([a], [b]);
        let ab = Union::new(&sa, &sb).execute().unwrap();
        let ba = Union::new(&sb, &sa).execute().unwrap();
        assert_abs_diff_eq!(total_area(&ab), total_area(&ba), epsilon = 1e-6);
        assert_eq!(ab.len(), ba.len());

        let ab = Intersect::new(&sa, &sb).execute().unwrap();
        let ba = Intersect::new(&sb, &sa).execute().unwrap();
        assert_abs_diff_eq!(total_area(&ab), total_area(&ba), epsilon = 1e-6);
        assert_eq!(ab.len(), ba.len());
    }
}

#[test]
fn difference_does_not_commute() {
    let a = [rect_shape(0.0, 0.0, 10.0, 10.0)];
    let b = [rect_shape(5.0, 0.0, 20.0, 10.0)];
    let ab = total_area(&Difference::new(&a, &b).execute().unwrap());
    let ba = total_area(&Difference::new(&b, &a).execute().unwrap());
    assert_abs_diff_eq!(ab, 50.0, epsilon = 1e-6);
    assert_abs_diff_eq!(ba, 150.0, epsilon = 1e-6);
}

#[test]
fn even_odd_fill_drops_double_cover() {
    let both = [rect_shape(0.0, 0.0, 10.0, 10.0), rect_shape(5.0, 0.0, 10.0, 10.0)];
    let non_zero = Union::new(&both, &[]).execute().unwrap();
    let even_odd = Union::new(&both, &[]).with_fill_rule(FillRule::EvenOdd).execute().unwrap();
    assert_abs_diff_eq!(total_area(&non_zero), 150.0, epsilon = 1e-6);
    assert_abs_diff_eq!(total_area(&even_odd), 100.0, epsilon = 1e-6);
}

#[test]
fn normalized_rings_alternate_orientation_by_depth() {
    let square = |x: f64, size: f64, ccw: bool| {
        let mut points = vec![
            Point2::new(x, x),
            Point2::new(x + size, x),
            Point2::new(x + size, x + size),
            Point2::new(x, x + size),
        ];
        if !ccw {
            points.reverse();
        }
        SimplePath { points, closed: true }
    };
    let figures = vec![
        square(3.0, 4.0, true),
        square(0.0, 10.0, false),
        square(4.0, 2.0, false),
        square(1.0, 8.0, true),
        square(20.0, 3.0, false),
    ];
    for rule in [FillRule::EvenOdd, FillRule::NonZero] {
        let rings = RingNormalizer::new(&figures).with_fill_rule(rule).execute();
        assert_eq!(rings.len(), 5);
        for ring in &rings {
            if ring.depth % 2 == 0 {
                assert!(ring.signed_area > 0.0);
            } else {
                assert!(ring.signed_area < 0.0);
            }
        }
        assert_eq!(rings.iter().map(|r| r.depth).collect::<Vec<_>>(), vec![2, 0, 3, 1, 0]);
    }
}
