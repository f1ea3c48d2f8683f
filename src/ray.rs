use crate::tuple::Tuple4D;

/// A ray with a point origin and a (not necessarily unit) direction.
///
/// The length of `direction` sets the scale of the parameter `t`; shadow
/// rays rely on this so that `t == 1.0` lands on the far end of the segment.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray4D {
    pub origin: Tuple4D,
    pub direction: Tuple4D,
}

impl Ray4D {
    pub fn new(mut origin: Tuple4D, mut direction: Tuple4D) -> Ray4D {
        if !origin.is_point() {
            origin.w = 1.0;
        }

        if !direction.is_vector() {
            direction.w = 0.0;
        }

        Ray4D { origin, direction }
    }

    pub fn position(&self, t: f64) -> Tuple4D {
        self.origin + (t * self.direction)
    }
}

#[test]
fn ray_position() {
    let r = Ray4D::new(
                Tuple4D::point(2.0, 3.0, 4.0),
                Tuple4D::vector(1.0, 0.0, 0.0)
            );

    assert_eq!(r.position(0.0), Tuple4D::point(2.0, 3.0, 4.0));
    assert_eq!(r.position(1.0), Tuple4D::point(3.0, 3.0, 4.0));
    assert_eq!(r.position(-1.0), Tuple4D::point(1.0, 3.0, 4.0));
    assert_eq!(r.position(2.5), Tuple4D::point(4.5, 3.0, 4.0));
}

#[test]
fn ray_forces_homogeneous_tags() {
    let r = Ray4D::new(
                Tuple4D::tuple(1.0, 2.0, 3.0, 0.0),
                Tuple4D::tuple(0.0, 0.0, -1.0, 1.0)
            );

    assert!(r.origin.is_point());
    assert!(r.direction.is_vector());
}
