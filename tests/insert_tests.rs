mod support;

use insertcsg::{
    CylindricalInsert,
    errors::ValidationError,
    float_types::Real,
    insert::InsertDimensions,
};
use nalgebra::{Point3, Vector3};

use crate::support::{approx_eq, bounding_box, first_hit, polygon_area};

fn created(diameter: Real, hole: Real, depth: Real, height: Real) -> CylindricalInsert {
    let mut insert = CylindricalInsert::new(diameter, hole, depth, height).expect("valid insert");
    insert.create().expect("creates");
    insert
}

#[test]
fn hollowed_volume_is_cylinder_minus_hole() {
    let insert = created(10.0, 5.0, 5.0, 20.0);
    let body = insert.body().expect("created");
    let expected = polygon_area(5.0, 32) * 20.0 - polygon_area(2.5, 32) * 5.0;
    assert!(approx_eq(body.volume(), expected, 1e-6));
    assert!(approx_eq(insert.expected_volume(), expected, 1e-9));
}

#[test]
fn outer_body_is_the_plain_cylinder() {
    let insert = created(5.0, 2.5, 2.5, 5.0);
    let outer = insert.outer_body().expect("created");
    assert!(approx_eq(outer.volume(), polygon_area(2.5, 32) * 5.0, 1e-9));
    let body = bounding_box(insert.body().expect("created"));
    for (a, b) in bounding_box(outer).iter().zip(body) {
        assert!(approx_eq(*a, b, 1e-9));
    }
}

#[test]
fn hole_opens_on_the_top_face() {
    let insert = created(10.0, 5.0, 5.0, 20.0);
    let body = insert.body().expect("created");

    // straight down the hole: floor at z = 15
    let down = first_hit(body, Point3::new(0.3, 0.2, 30.0), -Vector3::z()).expect("hits floor");
    assert!(approx_eq(down, 15.0, 1e-9));

    // outside the hole the top face is at z = 20
    let top = first_hit(body, Point3::new(3.5, 0.2, 30.0), -Vector3::z()).expect("hits top");
    assert!(approx_eq(top, 10.0, 1e-9));

    // sideways from the hole axis: wall at the (polygonal) hole radius
    let wall = first_hit(body, Point3::new(0.0, 0.0, 17.5), Vector3::x()).expect("hits wall");
    assert!(wall <= 2.5 + 1e-9 && wall >= 2.5 * (std::f64::consts::PI / 32.0).cos() - 1e-9);
}

#[test]
fn create_is_idempotent() {
    let mut insert = CylindricalInsert::new(5.0, 2.5, 2.5, 5.0).expect("valid insert");
    let first = insert.create().expect("creates").polygons.len();
    let second = insert.create().expect("creates").polygons.len();
    assert_eq!(first, second);
}

#[test]
fn full_depth_hole_is_allowed() {
    let insert = created(6.0, 2.0, 4.0, 4.0);
    let body = insert.body().expect("created");
    let expected = polygon_area(3.0, 32) * 4.0 - polygon_area(1.0, 32) * 4.0;
    assert!(approx_eq(body.volume(), expected, 1e-6));
}

#[test]
fn invalid_dimensions_are_rejected() {
    assert!(matches!(
        CylindricalInsert::new(-1.0, 0.5, 0.5, 1.0),
        Err(ValidationError::NonPositiveDimension { name: "diameter", .. })
    ));
    assert!(matches!(
        CylindricalInsert::new(1.0, 0.5, 0.5, Real::NAN),
        Err(ValidationError::NonPositiveDimension { name: "height", .. })
    ));
    assert_eq!(
        CylindricalInsert::from_dimensions(InsertDimensions::new(4.0, 2.0, 1.0, 2.0), 2)
            .unwrap_err(),
        ValidationError::TooFewSegments(2)
    );
}

#[test]
fn error_messages_name_the_variant() {
    let err = CylindricalInsert::new(10.0, 5.0, 25.0, 20.0).unwrap_err();
    assert!(err.to_string().starts_with("(HoleTooDeep)"));
}
