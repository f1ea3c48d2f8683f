use std::ops::{ Add, Sub, Neg, Mul };

use crate::feq;

/// A homogeneous 3D tuple.
///
/// Points carry `w == 1.0` and direction vectors carry `w == 0.0`. The `w`
/// component is only a tag: dot products, magnitudes and normalization work
/// on `x`, `y` and `z`, and leave `w` untouched.
#[derive(Debug, Default, Copy, Clone, PartialOrd)]
pub struct Tuple4D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64
}

impl PartialEq for Tuple4D {
    fn eq(&self, other: &Tuple4D) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z) &&
            feq(self.w, other.w)
    }
}

impl Tuple4D {
    pub fn tuple(x: f64, y: f64, z: f64, w: f64) -> Tuple4D {
        Tuple4D { x, y, z, w }
    }

    pub fn point(x: f64, y: f64, z: f64) -> Tuple4D {
        Tuple4D { x, y, z, w: 1.0 }
    }

    pub fn vector(x: f64, y: f64, z: f64) -> Tuple4D {
        Tuple4D { x, y, z, w: 0.0 }
    }

    pub fn is_point(&self) -> bool {
        self.w == 1.0
    }

    pub fn is_vector(&self) -> bool {
        self.w == 0.0
    }

    /// Returns this tuple re-tagged as a direction (`w == 0.0`).
    pub fn as_vector(&self) -> Tuple4D {
        Tuple4D { w: 0.0, ..*self }
    }

    pub fn magnitude(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Scales `x`, `y` and `z` to unit length, keeping `w`.
    ///
    /// A zero-length tuple yields non-finite components; callers are expected
    /// not to normalize degenerate vectors.
    pub fn normalize(&self) -> Tuple4D {
        let inv = 1.0 / self.magnitude();

        Tuple4D {
            x: self.x * inv,
            y: self.y * inv,
            z: self.z * inv,
            w: self.w,
        }
    }

    pub fn dot(&self, other: &Tuple4D) -> f64 {
        self.x * other.x
            + self.y * other.y
            + self.z * other.z
    }

    pub fn cross(&self, other: &Tuple4D) -> Tuple4D {
        Tuple4D {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
            w: 0.0
        }
    }

    /// Mirrors a vector about a unit normal: `2 (self . n) n - self`.
    ///
    /// For a unit vector `s` pointing away from a surface, this is the
    /// direction light from `-s` leaves the surface in.
    pub fn reflect(&self, normal: &Tuple4D) -> Tuple4D {
        -*self + (*normal * 2.0 * self.dot(normal))
    }
}

impl From<[f64; 3]> for Tuple4D {
    /// Converts a triple into a vector. Use `Tuple4D::point` for positions.
    fn from(v: [f64; 3]) -> Tuple4D {
        Tuple4D::vector(v[0], v[1], v[2])
    }
}

impl Add for Tuple4D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
            w: self.w + other.w
        }
    }
}

impl Sub for Tuple4D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
            w: self.w - other.w
        }
    }
}

impl Neg for Tuple4D {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: -self.w
        }
    }
}

/// Implements scalar right-multiplication for a 4D tuple.
///
/// ```
/// use phong_tracer::tuple::Tuple4D;
///
/// let t = Tuple4D::vector(1.0, 2.0, 3.0);
/// assert_eq!(t * 2.0, Tuple4D::vector(2.0, 4.0, 6.0));
/// ```
impl Mul<f64> for Tuple4D {
    type Output = Self;

    fn mul(self, other: f64) -> Self {
        Self {
            x: self.x * other,
            y: self.y * other,
            z: self.z * other,
            w: self.w * other
        }
    }
}

/// Implements scalar left-multiplication for a 4D tuple.
///
/// ```rust
/// use phong_tracer::tuple::Tuple4D;
///
/// let t = Tuple4D::vector(1.0, 2.0, 3.0);
/// assert_eq!(2.0 * t, Tuple4D::vector(2.0, 4.0, 6.0));
/// ```
impl Mul<Tuple4D> for f64 {
    type Output = Tuple4D;

    fn mul(self, other: Tuple4D) -> Tuple4D {
        Tuple4D {
            x: self * other.x,
            y: self * other.y,
            z: self * other.z,
            w: self * other.w
        }
    }
}

/* Tests */

#[test]
fn point_plus_vector_is_point() {
    let p = Tuple4D::point(3.0, -2.0, 5.0);
    let v = Tuple4D::vector(-2.0, 3.0, 1.0);

    let sum = p + v;
    assert_eq!(sum, Tuple4D::point(1.0, 1.0, 6.0));
    assert!(sum.is_point());
}

#[test]
fn sub_points_is_vector() {
    let p1 = Tuple4D::point(3.0, 2.0, 1.0);
    let p2 = Tuple4D::point(5.0, 6.0, 7.0);

    let diff = p1 - p2;
    assert_eq!(diff, Tuple4D::vector(-2.0, -4.0, -6.0));
    assert!(diff.is_vector());
}

#[test]
fn neg_vector() {
    let a = Tuple4D::vector(1.0, -2.0, 3.0);

    assert_eq!(-a, Tuple4D::vector(-1.0, 2.0, -3.0));
}

#[test]
fn magnitude_ignores_w() {
    let p = Tuple4D::point(1.0, 2.0, 3.0);
    let v = Tuple4D::vector(-1.0, -2.0, -3.0);

    assert_eq!(p.magnitude(), f64::sqrt(14.0));
    assert_eq!(v.magnitude(), f64::sqrt(14.0));
}

#[test]
fn normalize_keeps_w() {
    let v = Tuple4D::vector(4.0, 0.0, 0.0);
    let p = Tuple4D::point(0.0, 3.0, 4.0);

    assert_eq!(v.normalize(), Tuple4D::vector(1.0, 0.0, 0.0));
    assert_eq!(p.normalize(), Tuple4D::point(0.0, 0.6, 0.8));
}

#[test]
fn dot_ignores_w() {
    let a = Tuple4D::tuple(1.0, 2.0, 3.0, 1.0);
    let b = Tuple4D::tuple(2.0, 3.0, 4.0, 1.0);

    assert_eq!(a.dot(&b), 20.0);
}

#[test]
fn cross_vectors() {
    let a = Tuple4D::vector(1.0, 2.0, 3.0);
    let b = Tuple4D::vector(2.0, 3.0, 4.0);

    assert_eq!(a.cross(&b), Tuple4D::vector(-1.0, 2.0, -1.0));
    assert_eq!(b.cross(&a), Tuple4D::vector(1.0, -2.0, 1.0));
}

#[test]
fn reflect_about_normal() {
    // Light arriving at 45 degrees leaves at 45 degrees on the other side.
    let s = Tuple4D::vector(-1.0, 1.0, 0.0);
    let n = Tuple4D::vector(0.0, 1.0, 0.0);

    assert_eq!(s.reflect(&n), Tuple4D::vector(1.0, 1.0, 0.0));
}
