use std::time::Instant;

use log::{ debug, info };

use crate::tuple::Tuple4D;
use crate::world::World;
use crate::canvas::Sink;

/// A pinhole camera.
///
/// `right`, `up` and `forward` must form a right-handed orthonormal basis
/// (`right x up == forward`). This is not checked; a skewed basis only
/// distorts the image. Note that `forward` points from the scene back toward
/// the eye, so primary rays travel along `-forward`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Camera {
    pub eye: Tuple4D,
    pub forward: Tuple4D,
    pub up: Tuple4D,
    pub right: Tuple4D,
}

/// The view plane a render projects onto.
///
/// The plane sits `near` units in front of the eye and spans
/// `[-half_width, half_width]` by `[-half_height, half_height]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewPlane {
    pub half_width: f64,
    pub half_height: f64,
    pub near: f64,
}

impl Camera {
    /// Builds a camera at `eye` looking toward `gaze`.
    ///
    /// `up` only needs to be roughly upward and not parallel to the viewing
    /// direction; the returned basis is orthonormalized from it.
    pub fn look_at(mut eye: Tuple4D, gaze: Tuple4D, up: Tuple4D) -> Camera {
        if !eye.is_point() {
            eye.w = 1.0;
        }

        let forward = (eye - gaze).as_vector().normalize();
        let right = up.as_vector().cross(&forward).normalize();
        let up = forward.cross(&right);

        Camera { eye, forward, up, right }
    }

    /// The direction of the primary ray through view-plane point `(u, v)`.
    ///
    /// Not normalized; its length sets the scale of the hit parameter.
    pub fn ray_direction(&self, u: f64, v: f64, near: f64) -> Tuple4D {
        let d = -near * self.forward + u * self.right + v * self.up;
        d.as_vector()
    }

    /// Renders `world` into `sink`, one primary ray per pixel.
    ///
    /// Pixels are visited in row-major order and each is plotted exactly
    /// once. The image size is taken from the sink.
    pub fn render<S: Sink>(&self, sink: &mut S, view: &ViewPlane, world: &World) {
        let cols = sink.width();
        let rows = sink.height();

        info!("Rendering {}x{} pixels with {} objects and {} lights...",
            cols, rows, world.objects.len(), world.lights.len());
        let start = Instant::now();

        for r in 0..rows {
            for c in 0..cols {
                let (u, v) = view.coords_for_pixel(c, r, cols, rows);
                let color = world.trace_ray(u, v, view.near, self);
                sink.plot(c, r, color);
            }
        }

        debug!("...rendered in {:?}.", start.elapsed());
    }
}

impl ViewPlane {
    pub fn new(half_width: f64, half_height: f64, near: f64) -> ViewPlane {
        ViewPlane { half_width, half_height, near }
    }

    /// Maps pixel `(c, r)` of a `cols` by `rows` image onto the view plane.
    ///
    /// Column 0 lands on the left edge and row 0 on the top edge. The image
    /// row index grows downward while `v` grows upward, hence the flip.
    pub fn coords_for_pixel(&self, c: usize, r: usize, cols: usize, rows: usize)
        -> (f64, f64) {
        let w = self.half_width;
        let h = self.half_height;

        let u = -w + w * (2.0 * c as f64) / cols as f64;
        let v = -h + h * (2.0 * r as f64) / rows as f64;

        (u, -v)
    }
}

#[test]
fn look_at_down_negative_z() {
    let c = Camera::look_at(
        Tuple4D::point(0.0, 0.0, 5.0),
        Tuple4D::point(0.0, 0.0, 0.0),
        Tuple4D::vector(0.0, 1.0, 0.0),
    );

    assert_eq!(c.forward, Tuple4D::vector(0.0, 0.0, 1.0));
    assert_eq!(c.right, Tuple4D::vector(1.0, 0.0, 0.0));
    assert_eq!(c.up, Tuple4D::vector(0.0, 1.0, 0.0));
}

#[test]
fn look_at_builds_right_handed_orthonormal_basis() {
    let c = Camera::look_at(
        Tuple4D::point(1.0, 2.0, 3.0),
        Tuple4D::point(-2.0, 0.5, 0.0),
        Tuple4D::vector(0.2, 1.0, 0.0),
    );

    for axis in [c.forward, c.up, c.right].iter() {
        assert!(crate::feq(axis.magnitude(), 1.0));
        assert!(axis.is_vector());
    }

    assert!(crate::feq(c.forward.dot(&c.up), 0.0));
    assert!(crate::feq(c.forward.dot(&c.right), 0.0));
    assert!(crate::feq(c.up.dot(&c.right), 0.0));
    assert_eq!(c.right.cross(&c.up), c.forward);
}

#[test]
fn ray_direction_combines_basis() {
    let c = Camera::look_at(
        Tuple4D::point(0.0, 0.0, 5.0),
        Tuple4D::point(0.0, 0.0, 0.0),
        Tuple4D::vector(0.0, 1.0, 0.0),
    );

    let d = c.ray_direction(0.5, -0.25, 2.0);
    assert_eq!(d, Tuple4D::vector(0.5, -0.25, -2.0));
    assert!(d.is_vector());
}

#[test]
fn pixel_coordinates_on_view_plane() {
    let view = ViewPlane::new(1.0, 0.5, 1.0);

    assert_eq!(view.coords_for_pixel(0, 0, 4, 2), (-1.0, 0.5));
    assert_eq!(view.coords_for_pixel(2, 0, 4, 2), (0.0, 0.5));
    assert_eq!(view.coords_for_pixel(3, 1, 4, 2), (0.5, 0.0));
}

#[cfg(test)]
#[derive(Default)]
struct RecordingSink {
    width: usize,
    height: usize,
    plots: Vec<(usize, usize)>,
}

#[cfg(test)]
impl Sink for RecordingSink {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn plot(&mut self, x: usize, y: usize, _color: crate::color::Color) {
        self.plots.push((x, y));
    }
}

#[test]
fn render_visits_every_pixel_once_row_major() {
    let c = Camera::look_at(
        Tuple4D::point(0.0, 0.0, 5.0),
        Tuple4D::point(0.0, 0.0, 0.0),
        Tuple4D::vector(0.0, 1.0, 0.0),
    );
    let mut sink = RecordingSink { width: 3, height: 2, ..Default::default() };

    c.render(&mut sink, &ViewPlane::new(1.0, 1.0, 1.0), &World::empty());

    assert_eq!(sink.plots,
        vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
}

#[test]
fn render_keeps_image_upright() {
    use crate::color::Color;
    use crate::canvas::Canvas;
    use crate::geometry::Sphere;
    use crate::light::{ AmbientLight, Material };

    let c = Camera::look_at(
        Tuple4D::point(0.0, 0.0, 5.0),
        Tuple4D::point(0.0, 0.0, 0.0),
        Tuple4D::vector(0.0, 1.0, 0.0),
    );

    let glow = Material::new(Color::white(), Color::black(), Color::black());
    let mut w = World::empty();
    w.background = Color::rgb(0.0, 0.0, 100.0);
    w.ambient = AmbientLight::new(Color::white());
    w.objects.push(Box::new(Sphere::new(Tuple4D::point(0.0, 1.0, 0.0), 0.5, glow)));

    let mut canvas = Canvas::new(2, 2);
    c.render(&mut canvas, &ViewPlane::new(1.0, 1.0, 5.0), &w);

    // Only the top-middle pixel looks up at the sphere.
    assert_eq!(canvas.read_pixel(1, 0), Some(Color::rgb(255.0, 255.0, 255.0)));
    assert_eq!(canvas.read_pixel(1, 1), Some(w.background));
    assert_eq!(canvas.read_pixel(0, 0), Some(w.background));
    assert_eq!(canvas.read_pixel(0, 1), Some(w.background));
}
