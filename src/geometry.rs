use crate::consts::FEQ_EPSILON;
use crate::tuple::Tuple4D;
use crate::ray::Ray4D;
use crate::light::Material;

/// An object that can be ray traced.
///
/// Every primitive answers two geometric questions, where a ray hits it and
/// which way its surface faces, and carries the reflectance coefficients
/// used to shade it.
///
/// Trait objects are used so the world can hold any mix of primitives.
pub trait Shape: std::fmt::Debug {
    /// Finds where `ray` meets this shape.
    ///
    /// Returns the nearest hit parameter `t > 0` along the ray, in units of
    /// the ray's direction length, or `None` on a miss. Points behind the
    /// origin are rejected here; callers do not re-check the sign.
    fn intersect(&self, ray: &Ray4D) -> Option<f64>;

    /// The unit surface normal at `at`, a point on the surface.
    fn normal_at(&self, at: Tuple4D) -> Tuple4D;

    fn material(&self) -> &Material;
}

/// A sphere with a center point and a radius.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Sphere {
    pub center: Tuple4D,
    pub radius: f64,
    pub material: Material,
}

impl Sphere {
    pub fn new(mut center: Tuple4D, radius: f64, material: Material) -> Sphere {
        if !center.is_point() {
            center.w = 1.0;
        }

        Sphere { center, radius, material }
    }

    /// A unit sphere at the origin with a black material.
    pub fn unit() -> Sphere {
        Sphere::new(Tuple4D::point(0.0, 0.0, 0.0), 1.0, Default::default())
    }
}

impl Shape for Sphere {
    /// Solves the quadratic `|o + t d - c|^2 = r^2`.
    ///
    /// The smaller positive root wins. When the ray starts inside the sphere
    /// only the larger root is positive, and that one is returned.
    fn intersect(&self, ray: &Ray4D) -> Option<f64> {
        let sphere_to_ray = ray.origin - self.center;

        let a = ray.direction.dot(&ray.direction);
        if a == 0.0 {
            return None;
        }

        let b = 2.0 * ray.direction.dot(&sphere_to_ray);
        let c = sphere_to_ray.dot(&sphere_to_ray) - self.radius.powi(2);

        let discriminant = b.powi(2) - (4.0 * a * c);
        if discriminant < 0.0 {
            return None;
        }

        let t1 = (-b - discriminant.sqrt()) / (2.0 * a);
        let t2 = (-b + discriminant.sqrt()) / (2.0 * a);

        if t1 > 0.0 {
            Some(t1)
        } else if t2 > 0.0 {
            Some(t2)
        } else {
            None
        }
    }

    fn normal_at(&self, at: Tuple4D) -> Tuple4D {
        (at - self.center).as_vector().normalize()
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

/// An infinite plane through `point`, facing along `normal`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Plane {
    pub point: Tuple4D,
    pub normal: Tuple4D,
    pub material: Material,
}

impl Plane {
    /// Creates a plane. `normal` is normalized and tagged as a vector.
    pub fn new(mut point: Tuple4D, normal: Tuple4D, material: Material) -> Plane {
        if !point.is_point() {
            point.w = 1.0;
        }

        Plane { point, normal: normal.as_vector().normalize(), material }
    }
}

impl Shape for Plane {
    fn intersect(&self, ray: &Ray4D) -> Option<f64> {
        let denominator = ray.direction.dot(&self.normal);

        // A ray running along the plane never meets it.
        if denominator.abs() < FEQ_EPSILON {
            return None;
        }

        let t = (self.point - ray.origin).dot(&self.normal) / denominator;
        if t > 0.0 {
            Some(t)
        } else {
            None
        }
    }

    fn normal_at(&self, _at: Tuple4D) -> Tuple4D {
        self.normal
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

/// A flat triangle.
///
/// Edges and the normal are precomputed on construction. The front face is
/// the one from which `p1`, `p2`, `p3` appear counter-clockwise.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Triangle {
    pub p1: Tuple4D,
    pub p2: Tuple4D,
    pub p3: Tuple4D,
    pub material: Material,

    e1: Tuple4D,
    e2: Tuple4D,
    normal: Tuple4D,
}

impl Triangle {
    pub fn new(p1: Tuple4D, p2: Tuple4D, p3: Tuple4D, material: Material)
        -> Triangle {
        let e1 = p2 - p1;
        let e2 = p3 - p1;
        let normal = e1.cross(&e2).normalize();

        Triangle { p1, p2, p3, material, e1, e2, normal }
    }
}

impl Shape for Triangle {
    /// Moller-Trumbore intersection. Both faces can be hit.
    fn intersect(&self, ray: &Ray4D) -> Option<f64> {
        let dir_cross_e2 = ray.direction.cross(&self.e2);
        let determinant = self.e1.dot(&dir_cross_e2);

        // If the ray is parallel to the triangle, there is no intersection.
        if determinant.abs() < FEQ_EPSILON {
            return None;
        }

        let f = 1.0 / determinant;
        let p1_to_origin = ray.origin - self.p1;
        let u = f * p1_to_origin.dot(&dir_cross_e2);
        if u < 0.0 || u > 1.0 {
            return None;
        }

        let origin_cross_e1 = p1_to_origin.cross(&self.e1);
        let v = f * ray.direction.dot(&origin_cross_e1);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * self.e2.dot(&origin_cross_e1);
        if t > 0.0 {
            Some(t)
        } else {
            None
        }
    }

    fn normal_at(&self, _at: Tuple4D) -> Tuple4D {
        self.normal
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

#[test]
fn ray_pierces_sphere() {
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0),
                       Tuple4D::vector(0.0, 0.0, 1.0));
    let s = Sphere::unit();

    assert_eq!(s.intersect(&r), Some(4.0));
}

#[test]
fn ray_misses_sphere() {
    let r = Ray4D::new(Tuple4D::point(0.0, 2.0, -5.0),
                       Tuple4D::vector(0.0, 0.0, 1.0));
    let s = Sphere::unit();

    assert_eq!(s.intersect(&r), None);
}

#[test]
fn ray_inside_sphere_hits_far_side() {
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, 0.0),
                       Tuple4D::vector(0.0, 0.0, 1.0));
    let s = Sphere::unit();

    assert_eq!(s.intersect(&r), Some(1.0));
}

#[test]
fn sphere_behind_ray_is_missed() {
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, 5.0),
                       Tuple4D::vector(0.0, 0.0, 1.0));
    let s = Sphere::unit();

    assert_eq!(s.intersect(&r), None);
}

#[test]
fn sphere_t_scales_with_direction_length() {
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0),
                       Tuple4D::vector(0.0, 0.0, 8.0));
    let s = Sphere::new(Tuple4D::point(0.0, 0.0, 0.0), 1.0, Default::default());

    assert_eq!(s.intersect(&r), Some(0.5));
}

#[test]
fn sphere_normal_points_outward() {
    let s = Sphere::new(Tuple4D::point(1.0, 2.0, 3.0), 2.0, Default::default());
    let n = s.normal_at(Tuple4D::point(1.0, 4.0, 3.0));

    assert_eq!(n, Tuple4D::vector(0.0, 1.0, 0.0));
    assert!(n.is_vector());
}

#[test]
fn ray_hits_plane_from_above() {
    let p = Plane::new(Tuple4D::point(0.0, -1.0, 0.0),
                       Tuple4D::vector(0.0, 2.0, 0.0), Default::default());
    let r = Ray4D::new(Tuple4D::point(0.0, 3.0, 0.0),
                       Tuple4D::vector(0.0, -1.0, 0.0));

    assert_eq!(p.intersect(&r), Some(4.0));
    assert_eq!(p.normal_at(r.position(4.0)), Tuple4D::vector(0.0, 1.0, 0.0));
}

#[test]
fn ray_parallel_to_plane_misses() {
    let p = Plane::new(Tuple4D::point(0.0, 0.0, 0.0),
                       Tuple4D::vector(0.0, 1.0, 0.0), Default::default());
    let r = Ray4D::new(Tuple4D::point(0.0, 1.0, 0.0),
                       Tuple4D::vector(1.0, 0.0, 0.0));

    assert_eq!(p.intersect(&r), None);
}

#[test]
fn plane_behind_ray_is_missed() {
    let p = Plane::new(Tuple4D::point(0.0, 0.0, 0.0),
                       Tuple4D::vector(0.0, 1.0, 0.0), Default::default());
    let r = Ray4D::new(Tuple4D::point(0.0, 1.0, 0.0),
                       Tuple4D::vector(0.0, 1.0, 0.0));

    assert_eq!(p.intersect(&r), None);
}

#[cfg(test)]
fn test_triangle() -> Triangle {
    Triangle::new(
        Tuple4D::point(0.0, 1.0, 0.0),
        Tuple4D::point(-1.0, 0.0, 0.0),
        Tuple4D::point(1.0, 0.0, 0.0),
        Default::default(),
    )
}

#[test]
fn triangle_normal() {
    let t = test_triangle();

    assert_eq!(t.normal_at(Tuple4D::point(0.0, 0.5, 0.0)),
        Tuple4D::vector(0.0, 0.0, 1.0));
}

#[test]
fn ray_strikes_triangle() {
    let t = test_triangle();
    let r = Ray4D::new(Tuple4D::point(0.0, 0.5, -2.0),
                       Tuple4D::vector(0.0, 0.0, 1.0));

    assert_eq!(t.intersect(&r), Some(2.0));
}

#[test]
fn ray_misses_triangle_edges() {
    let t = test_triangle();

    for origin in [
        Tuple4D::point(1.0, 1.0, -2.0),
        Tuple4D::point(-1.0, 1.0, -2.0),
        Tuple4D::point(0.0, -1.0, -2.0),
    ].iter() {
        let r = Ray4D::new(*origin, Tuple4D::vector(0.0, 0.0, 1.0));
        assert_eq!(t.intersect(&r), None);
    }
}

#[test]
fn ray_parallel_to_triangle_misses() {
    let t = test_triangle();
    let r = Ray4D::new(Tuple4D::point(0.0, -1.0, -2.0),
                       Tuple4D::vector(0.0, 1.0, 0.0));

    assert_eq!(t.intersect(&r), None);
}
