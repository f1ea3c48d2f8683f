use crate::ray::Ray4D;
use crate::tuple::Tuple4D;
use crate::color::Color;
use crate::camera::Camera;
use crate::geometry::Shape;
use crate::light::{ Light, AmbientLight, lighting, ambient };
use crate::intersect::{ Intersection, ShadowWindow, nearest_hit, is_occluded };

/// A world with objects and lights.
///
/// Worlds collect everything a render reads: the objects, the shadow-casting
/// lights, a single ambient light, and the color shown where nothing is hit.
/// Nothing here is mutated while tracing.
#[derive(Debug, Default)]
pub struct World {
    pub objects: Vec<Box<dyn Shape>>,
    pub lights: Vec<Box<dyn Light>>,
    pub ambient: AmbientLight,
    pub background: Color,
    pub shadow_window: ShadowWindow,
}

impl World {
    /// Creates an empty world: no objects, no lights, black background and
    /// no ambient light.
    pub fn empty() -> World {
        Default::default()
    }

    /// Traces the primary ray through view-plane coordinates `(u, v)`.
    ///
    /// The ray leaves the eye along `-near * forward + u * right + v * up`.
    pub fn trace_ray(&self, u: f64, v: f64, near: f64, camera: &Camera) -> Color {
        let direction = camera.ray_direction(u, v, near);
        self.color_at(&Ray4D::new(camera.eye, direction))
    }

    /// Determines a color based on the intersection of a ray and the objects.
    ///
    /// If no object is hit, the background color is returned as is.
    pub fn color_at(&self, r: &Ray4D) -> Color {
        match nearest_hit(&self.objects, r) {
            None => self.background,
            Some(hit) => self.shade_hit(r, &hit),
        }
    }

    /// Calculates the color for a hit, based on shadows and light.
    ///
    /// Every light that is not blocked adds its diffuse and specular terms;
    /// blocked lights add nothing. The ambient term is added once at the end,
    /// whether or not any light reached the point. The sum is not clamped.
    pub fn shade_hit(&self, r: &Ray4D, hit: &Intersection) -> Color {
        let point = r.position(hit.t);
        let eyev = (r.origin - point).normalize();
        let normalv = hit.what.normal_at(point);
        let material = hit.what.material();

        let mut color = Color::black();
        for light in self.lights.iter() {
            let s = light.to_light(point);
            if self.is_shadowed(point, s) {
                continue;
            }

            color += lighting(material, light.intensity(), s, normalv, eyev);
        }

        color + ambient(material, &self.ambient)
    }

    /// Determines whether `point` is hidden from a light.
    ///
    /// `to_light` runs from the point to the light. The shadow ray is cast
    /// backwards, from the light toward the point, so the segment between
    /// them spans `t` in `[0, 1]`.
    pub fn is_shadowed(&self, point: Tuple4D, to_light: Tuple4D) -> bool {
        let r = Ray4D::new(point + to_light, -to_light);
        is_occluded(&self.objects, &r, self.shadow_window)
    }
}

#[cfg(test)]
use crate::light::Material;

#[cfg(test)]
mod fixtures {
    use crate::color::Color;
    use crate::tuple::Tuple4D;
    use crate::camera::Camera;
    use crate::geometry::Plane;
    use crate::light::Material;

    /// Looks down the -z axis from `(0, 0, 5)`.
    pub fn camera() -> Camera {
        Camera::look_at(
            Tuple4D::point(0.0, 0.0, 5.0),
            Tuple4D::point(0.0, 0.0, 0.0),
            Tuple4D::vector(0.0, 1.0, 0.0),
        )
    }

    /// The z = 0 plane, facing the camera.
    pub fn wall(material: Material) -> Plane {
        Plane::new(
            Tuple4D::point(0.0, 0.0, 0.0),
            Tuple4D::vector(0.0, 0.0, 1.0),
            material,
        )
    }

    pub fn red_matte() -> Material {
        Material::new(Color::black(), Color::rgb(1.0, 0.0, 0.0), Color::black())
    }
}

#[test]
fn no_objects_returns_background() {
    let mut w = World::empty();
    w.background = Color::rgb(12.0, 34.0, 56.0);
    let camera = fixtures::camera();

    for &(u, v) in [(0.0, 0.0), (-1.0, 0.5), (0.75, -0.75)].iter() {
        assert_eq!(w.trace_ray(u, v, 1.0, &camera), Color::rgb(12.0, 34.0, 56.0));
    }
}

#[test]
fn front_facing_diffuse_surface() {
    use crate::light::PointLight;

    let mut w = World::empty();
    w.objects.push(Box::new(fixtures::wall(fixtures::red_matte())));
    w.lights.push(Box::new(PointLight::new(
        Color::white(), Tuple4D::point(0.0, 0.0, 10.0)
    )));

    let c = w.trace_ray(0.0, 0.0, 1.0, &fixtures::camera());
    assert_eq!(c, Color::rgb(255.0, 0.0, 0.0));
}

#[test]
fn occluder_removes_light_but_keeps_ambient() {
    use crate::light::PointLight;
    use crate::geometry::Sphere;

    let material = Material::new(
        Color::rgb(0.0, 0.0, 1.0),
        Color::rgb(1.0, 0.0, 0.0),
        Color::rgb(0.0, 1.0, 0.0),
    );

    let mut w = World::empty();
    w.ambient = AmbientLight::new(Color::rgb(0.2, 0.2, 0.2));
    w.objects.push(Box::new(fixtures::wall(material)));
    w.lights.push(Box::new(PointLight::new(
        Color::white(), Tuple4D::point(0.0, 0.0, 20.0)
    )));

    let camera = fixtures::camera();
    let lit = w.trace_ray(0.0, 0.0, 1.0, &camera);
    assert_eq!(lit, Color::rgb(255.0, 255.0, 51.0));

    // Sits behind the eye, halfway to the light.
    w.objects.push(Box::new(Sphere::new(
        Tuple4D::point(0.0, 0.0, 10.0), 0.5, Default::default()
    )));

    let shadowed = w.trace_ray(0.0, 0.0, 1.0, &camera);
    assert_eq!(shadowed, Color::rgb(0.0, 0.0, 51.0));
}

#[test]
fn ambient_only_without_lights() {
    let material = Material::new(
        Color::rgb(0.5, 0.25, 1.0),
        Color::white(),
        Color::white(),
    );

    let mut w = World::empty();
    w.ambient = AmbientLight::new(Color::rgb(1.0, 1.0, 0.5));
    w.objects.push(Box::new(fixtures::wall(material)));

    let c = w.trace_ray(0.0, 0.0, 1.0, &fixtures::camera());
    assert_eq!(c, Color::rgb(127.5, 63.75, 127.5));
}

#[test]
fn light_behind_surface_adds_nothing() {
    use crate::light::PointLight;

    let material = Material::new(
        Color::rgb(0.1, 0.1, 0.1),
        Color::white(),
        Color::white(),
    );

    let mut w = World::empty();
    w.ambient = AmbientLight::new(Color::white());
    w.objects.push(Box::new(fixtures::wall(material)));
    w.lights.push(Box::new(PointLight::new(
        Color::white(), Tuple4D::point(0.0, 0.0, -10.0)
    )));

    let c = w.trace_ray(0.0, 0.0, 1.0, &fixtures::camera());
    assert_eq!(c, Color::rgb(25.5, 25.5, 25.5));
}

#[test]
fn overexposure_is_not_clamped() {
    use crate::light::PointLight;

    let mut w = World::empty();
    w.objects.push(Box::new(fixtures::wall(fixtures::red_matte())));
    for _ in 0..2 {
        w.lights.push(Box::new(PointLight::new(
            Color::white(), Tuple4D::point(0.0, 0.0, 10.0)
        )));
    }

    let c = w.trace_ray(0.0, 0.0, 1.0, &fixtures::camera());
    assert_eq!(c, Color::rgb(510.0, 0.0, 0.0));
    assert_eq!(c.to_rgb8(), [255, 0, 0]);
}

#[test]
fn nearest_object_is_shaded() {
    use crate::light::PointLight;
    use crate::geometry::Sphere;

    let green = Material::new(Color::black(), Color::rgb(0.0, 1.0, 0.0), Color::black());

    let mut w = World::empty();
    w.objects.push(Box::new(fixtures::wall(fixtures::red_matte())));
    w.objects.push(Box::new(Sphere::new(
        Tuple4D::point(0.0, 0.0, 1.0), 1.0, green
    )));
    w.lights.push(Box::new(PointLight::new(
        Color::white(), Tuple4D::point(0.0, 0.0, 10.0)
    )));

    // The sphere's front pole faces both the eye and the light.
    let c = w.trace_ray(0.0, 0.0, 1.0, &fixtures::camera());
    assert_eq!(c, Color::rgb(0.0, 255.0, 0.0));
}

#[test]
fn directional_light_and_its_shadow() {
    use crate::light::DirectionalLight;
    use crate::geometry::Sphere;

    let mut w = World::empty();
    w.objects.push(Box::new(fixtures::wall(fixtures::red_matte())));
    w.lights.push(Box::new(DirectionalLight::new(
        Color::rgb(0.5, 0.5, 0.5), Tuple4D::vector(0.0, 0.0, -1.0), 100.0
    )));

    let camera = fixtures::camera();
    assert_eq!(w.trace_ray(0.0, 0.0, 1.0, &camera), Color::rgb(127.5, 0.0, 0.0));

    w.objects.push(Box::new(Sphere::new(
        Tuple4D::point(0.0, 0.0, 50.0), 1.0, Default::default()
    )));
    assert_eq!(w.trace_ray(0.0, 0.0, 1.0, &camera), Color::black());
}

#[test]
fn sphere_shadows_its_own_far_side() {
    use crate::geometry::Sphere;

    let mut w = World::empty();
    w.objects.push(Box::new(Sphere::unit()));
    let light = Tuple4D::point(0.0, 10.0, 0.0);

    let top = Tuple4D::point(0.0, 1.0, 0.0);
    let front = Tuple4D::point(0.0, 0.0, 1.0);

    assert!(!w.is_shadowed(top, light - top));
    assert!(w.is_shadowed(front, light - front));
}
