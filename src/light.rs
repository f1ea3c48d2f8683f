use crate::consts::{ COLOR_SCALE, SPECULAR_EXPONENT };
use crate::color::Color;
use crate::tuple::Tuple4D;

/// A light source that can be shadowed.
///
/// The vector returned by `to_light` doubles as the shadow segment: a
/// visibility ray starts at `point + to_light(point)` and runs back along
/// `-to_light(point)`, so `t == 0.0` is the light and `t == 1.0` is the
/// shaded point. It does not need to be unit length.
pub trait Light: std::fmt::Debug {
    fn to_light(&self, point: Tuple4D) -> Tuple4D;
    fn intensity(&self) -> Color;
}

/// A point light.
///
/// A very simple light source. Provides a color and a position where light is
/// produced from.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PointLight {
    pub intensity: Color,
    pub position: Tuple4D,
}

impl PointLight {
    /// Creates a point light.
    ///
    /// If `position` isn't a point, it is converted to a point automatically.
    pub fn new(intensity: Color, mut position: Tuple4D) -> PointLight {
        if !position.is_point() {
            position.w = 1.0;
        }

        PointLight { intensity, position }
    }
}

impl Light for PointLight {
    fn to_light(&self, point: Tuple4D) -> Tuple4D {
        (self.position - point).as_vector()
    }

    fn intensity(&self) -> Color {
        self.intensity
    }
}

/// A light infinitely far away, shining along `direction`.
///
/// Shadow rays toward a directional light are cut off at `distance` from the
/// shaded point; anything farther away cannot occlude it.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DirectionalLight {
    pub intensity: Color,
    pub direction: Tuple4D,
    pub distance: f64,
}

impl DirectionalLight {
    pub fn new(intensity: Color, direction: Tuple4D, distance: f64)
        -> DirectionalLight {
        DirectionalLight {
            intensity,
            direction: direction.as_vector().normalize(),
            distance,
        }
    }
}

impl Light for DirectionalLight {
    fn to_light(&self, _point: Tuple4D) -> Tuple4D {
        -self.direction * self.distance
    }

    fn intensity(&self) -> Color {
        self.intensity
    }
}

/// Light arriving from everywhere at once.
///
/// Kept apart from the `Light` trait: ambient light has no direction and is
/// never shadow tested.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AmbientLight {
    pub intensity: Color,
}

impl AmbientLight {
    pub fn new(intensity: Color) -> AmbientLight {
        AmbientLight { intensity }
    }
}

/// A material record.
///
/// Per-channel reflectances from the Phong reflection model. Channels are
/// nominally within `[0, 1]`, but this is not enforced.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Material {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
}

impl Material {
    pub fn new(ambient: Color, diffuse: Color, specular: Color) -> Material {
        Material { ambient, diffuse, specular }
    }
}

/// Calculates the diffuse and specular light one source adds to a point.
///
/// `s` points from the surface toward the light and is normalized here.
/// `normalv` and `eyev` must already be unit vectors, `eyev` pointing from
/// the surface toward the eye.
///
/// The two terms are gated independently: diffuse needs `n . s > 0`, and
/// specular needs `r . v > 0` where `r` is `s` mirrored about the normal.
/// Specular uses a fixed exponent of 2. Results are scaled to 0-255 and left
/// unclamped.
pub fn lighting(m: &Material, intensity: Color, s: Tuple4D, normalv: Tuple4D,
    eyev: Tuple4D) -> Color {
    let s = s.normalize();
    let mut color = Color::black();

    let light_dot_normal = normalv.dot(&s);
    if light_dot_normal > 0.0 {
        color += m.diffuse * intensity * (light_dot_normal * COLOR_SCALE);
    }

    let reflectv = s.reflect(&normalv);
    let reflect_dot_eye = reflectv.dot(&eyev);
    if reflect_dot_eye > 0.0 {
        let factor = reflect_dot_eye.powi(SPECULAR_EXPONENT);
        color += m.specular * intensity * (factor * COLOR_SCALE);
    }

    color
}

/// The ambient term, applied once per shaded point.
pub fn ambient(m: &Material, light: &AmbientLight) -> Color {
    m.ambient * light.intensity * COLOR_SCALE
}

#[cfg(test)]
fn shiny_white() -> Material {
    Material::new(Color::black(), Color::white(), Color::white())
}

#[test]
fn eye_between_light_and_surface() {
    let m = shiny_white();
    let s = Tuple4D::vector(0.0, 0.0, -10.0);
    let eyev = Tuple4D::vector(0.0, 0.0, -1.0);
    let normalv = Tuple4D::vector(0.0, 0.0, -1.0);

    let res = lighting(&m, Color::white(), s, normalv, eyev);
    assert_eq!(res, Color::rgb(510.0, 510.0, 510.0));
}

#[test]
fn eye_offset_45() {
    let m = shiny_white();
    let s = Tuple4D::vector(0.0, 0.0, -10.0);
    let eyev = Tuple4D::vector(0.0, 2.0f64.sqrt() / 2.0, -(2.0f64.sqrt()) / 2.0);
    let normalv = Tuple4D::vector(0.0, 0.0, -1.0);

    // Full diffuse, specular scaled by cos^2(45deg) = 0.5.
    let res = lighting(&m, Color::white(), s, normalv, eyev);
    assert_eq!(res, Color::rgb(382.5, 382.5, 382.5));
}

#[test]
fn light_behind_surface() {
    let m = shiny_white();
    let s = Tuple4D::vector(0.0, 0.0, 10.0);
    let eyev = Tuple4D::vector(0.0, 0.0, -1.0);
    let normalv = Tuple4D::vector(0.0, 0.0, -1.0);

    let res = lighting(&m, Color::white(), s, normalv, eyev);
    assert_eq!(res, Color::black());
}

#[test]
fn specular_is_not_gated_by_diffuse() {
    let m = shiny_white();
    let s = Tuple4D::vector(1.0, -0.1, 0.0);
    let normalv = Tuple4D::vector(0.0, 1.0, 0.0);
    let eyev = Tuple4D::vector(-1.0, 0.1, 0.0).normalize();

    let expected = (0.99f64 / 1.01).powi(2) * 255.0;
    let res = lighting(&m, Color::white(), s, normalv, eyev);
    assert_eq!(res, Color::rgb(expected, expected, expected));
}

#[test]
fn lighting_filters_by_reflectance_and_intensity() {
    let m = Material::new(
        Color::black(),
        Color::rgb(1.0, 0.5, 0.0),
        Color::black(),
    );
    let s = Tuple4D::vector(0.0, 1.0, 0.0);
    let normalv = Tuple4D::vector(0.0, 1.0, 0.0);
    let eyev = Tuple4D::vector(0.0, 1.0, 0.0);

    let res = lighting(&m, Color::rgb(0.5, 1.0, 1.0), s, normalv, eyev);
    assert_eq!(res, Color::rgb(127.5, 127.5, 0.0));
}

#[test]
fn ambient_term() {
    let m = Material::new(Color::rgb(0.2, 0.4, 1.0), Color::white(), Color::white());
    let a = AmbientLight::new(Color::rgb(1.0, 0.5, 0.1));

    assert_eq!(ambient(&m, &a), Color::rgb(51.0, 51.0, 25.5));
}

#[test]
fn point_light_vector_reaches_light() {
    let light = PointLight::new(Color::white(), Tuple4D::point(1.0, 2.0, 3.0));
    let p = Tuple4D::point(1.0, 0.0, 3.0);
    let s = light.to_light(p);

    assert_eq!(s, Tuple4D::vector(0.0, 2.0, 0.0));
    assert_eq!(p + s, light.position);
}

#[test]
fn directional_light_vector_is_constant() {
    let light = DirectionalLight::new(
        Color::white(), Tuple4D::vector(0.0, -3.0, 0.0), 100.0
    );

    assert_eq!(light.to_light(Tuple4D::point(0.0, 0.0, 0.0)),
        Tuple4D::vector(0.0, 100.0, 0.0));
    assert_eq!(light.to_light(Tuple4D::point(5.0, -2.0, 7.0)),
        Tuple4D::vector(0.0, 100.0, 0.0));
}
