use crate::consts::{ SHADOW_T_MIN, SHADOW_T_MAX };
use crate::ray::Ray4D;
use crate::geometry::Shape;

/// An intersection.
///
/// This structure assumes that some ray produced an intersection. Parameter `t`
/// is analogous to `t` for a ray (the offset from the ray origin).
///
/// The `what` parameter is a reference to a `Shape` trait object, since many
/// kinds of primitives (sphere, plane, triangle) can be intersected.
#[derive(Copy, Clone, Debug)]
pub struct Intersection<'a> {
    pub t: f64,
    pub what: &'a dyn Shape,
}

/// Implements partial equality on an Intersection.
///
/// Two Intersection structures are equal if the offsets `t` of the
/// intersections are equivalent, and if the underlying *pointers* of the
/// intersections are equivalent.
impl<'a> PartialEq for Intersection<'a> {
    fn eq(&self, other: &Intersection<'a>) -> bool {
        self.t == other.t && std::ptr::eq(
            self.what as *const _ as *const u8,
            other.what as *const _ as *const u8,
        )
    }
}

/// The open range of shadow-ray parameters that count as occlusion.
///
/// Shadow rays run from the light (`t == 0.0`) back to the shaded point
/// (`t == 1.0`). The lower bound keeps geometry sitting on the light from
/// registering, and the upper bound keeps the shaded surface from shadowing
/// itself through rounding error. Scenes at unusual scales may need other
/// bounds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ShadowWindow {
    pub min: f64,
    pub max: f64,
}

impl Default for ShadowWindow {
    fn default() -> ShadowWindow {
        ShadowWindow { min: SHADOW_T_MIN, max: SHADOW_T_MAX }
    }
}

impl ShadowWindow {
    pub fn new(min: f64, max: f64) -> ShadowWindow {
        ShadowWindow { min, max }
    }

    /// Checks whether `t` lies strictly inside the window.
    pub fn contains(&self, t: f64) -> bool {
        self.min < t && t < self.max
    }
}

/// Finds the closest object along a ray.
///
/// A linear scan over `objects`. A candidate replaces the current best only
/// if its `t` is strictly smaller, so on ties the object listed first wins.
/// The sign of `t` is not checked here; each shape only reports hits in
/// front of the ray.
pub fn nearest_hit<'a>(objects: &'a [Box<dyn Shape>], ray: &Ray4D)
    -> Option<Intersection<'a>> {
    let mut closest: Option<Intersection<'a>> = None;

    for obj in objects.iter() {
        if let Some(t) = obj.intersect(ray) {
            let closer = match closest {
                None => true,
                Some(ref best) => t < best.t,
            };

            if closer {
                closest = Some(Intersection { t, what: &**obj });
            }
        }
    }

    closest
}

/// Determines whether anything blocks a shadow ray.
///
/// Returns `true` on the first object whose hit lies strictly inside
/// `window`, and `false` once every object has been checked.
pub fn is_occluded(objects: &[Box<dyn Shape>], ray: &Ray4D,
    window: ShadowWindow) -> bool {
    objects.iter().any(|obj| match obj.intersect(ray) {
        Some(t) => window.contains(t),
        None => false,
    })
}

#[cfg(test)]
pub(crate) mod mock {
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::color::Color;
    use crate::tuple::Tuple4D;
    use crate::ray::Ray4D;
    use crate::light::Material;
    use crate::geometry::Shape;

    /// A shape reporting the same hit (or miss) for every ray, and counting
    /// how often it was asked.
    #[derive(Debug)]
    pub struct FixedHit {
        pub t: Option<f64>,
        pub material: Material,
        pub calls: Cell<usize>,
    }

    impl FixedHit {
        pub fn new(t: Option<f64>) -> FixedHit {
            FixedHit::tagged(t, 0.0)
        }

        /// A fixed hit whose ambient red channel identifies it.
        pub fn tagged(t: Option<f64>, tag: f64) -> FixedHit {
            let material = Material {
                ambient: Color::rgb(tag, 0.0, 0.0),
                ..Default::default()
            };

            FixedHit { t, material, calls: Cell::new(0) }
        }
    }

    impl Shape for FixedHit {
        fn intersect(&self, _ray: &Ray4D) -> Option<f64> {
            self.calls.set(self.calls.get() + 1);
            self.t
        }

        fn normal_at(&self, _at: Tuple4D) -> Tuple4D {
            Tuple4D::vector(0.0, 0.0, 1.0)
        }

        fn material(&self) -> &Material {
            &self.material
        }
    }

    impl Shape for Rc<FixedHit> {
        fn intersect(&self, ray: &Ray4D) -> Option<f64> {
            (**self).intersect(ray)
        }

        fn normal_at(&self, at: Tuple4D) -> Tuple4D {
            (**self).normal_at(at)
        }

        fn material(&self) -> &Material {
            (**self).material()
        }
    }
}

#[cfg(test)]
fn any_ray() -> Ray4D {
    use crate::tuple::Tuple4D;

    Ray4D::new(Tuple4D::point(0.0, 0.0, 0.0), Tuple4D::vector(0.0, 0.0, -1.0))
}

#[test]
fn nearest_hit_picks_smallest_t() {
    use mock::FixedHit;

    let near_first: Vec<Box<dyn Shape>> = vec![
        Box::new(FixedHit::tagged(Some(2.0), 1.0)),
        Box::new(FixedHit::tagged(Some(5.0), 2.0)),
    ];
    let near_last: Vec<Box<dyn Shape>> = vec![
        Box::new(FixedHit::tagged(Some(5.0), 2.0)),
        Box::new(FixedHit::tagged(Some(2.0), 1.0)),
    ];

    for objects in [near_first, near_last].iter() {
        let hit = nearest_hit(objects, &any_ray()).expect("both objects hit");
        assert_eq!(hit.t, 2.0);
        assert_eq!(hit.what.material().ambient.r, 1.0);
    }
}

#[test]
fn nearest_hit_ties_go_to_first() {
    use mock::FixedHit;

    let objects: Vec<Box<dyn Shape>> = vec![
        Box::new(FixedHit::tagged(None, 3.0)),
        Box::new(FixedHit::tagged(Some(4.0), 1.0)),
        Box::new(FixedHit::tagged(Some(4.0), 2.0)),
    ];

    let hit = nearest_hit(&objects, &any_ray()).unwrap();
    assert_eq!(hit.what.material().ambient.r, 1.0);
    assert_eq!(hit, Intersection { t: 4.0, what: &*objects[1] });
    assert!(hit != Intersection { t: 4.0, what: &*objects[2] });
}

#[test]
fn nearest_hit_with_no_objects() {
    let objects: Vec<Box<dyn Shape>> = Vec::new();

    assert!(nearest_hit(&objects, &any_ray()).is_none());
}

#[test]
fn nearest_hit_all_misses() {
    use mock::FixedHit;

    let objects: Vec<Box<dyn Shape>> = vec![
        Box::new(FixedHit::new(None)),
        Box::new(FixedHit::new(None)),
    ];

    assert!(nearest_hit(&objects, &any_ray()).is_none());
}

#[test]
fn occluder_inside_window() {
    use mock::FixedHit;

    let objects: Vec<Box<dyn Shape>> = vec![Box::new(FixedHit::new(Some(0.5)))];

    assert!(is_occluded(&objects, &any_ray(), Default::default()));
}

#[test]
fn hits_at_the_ends_of_the_window_do_not_occlude() {
    use mock::FixedHit;

    for t in [0.0005, 0.001, 0.999, 1.0, 3.0].iter() {
        let objects: Vec<Box<dyn Shape>> = vec![Box::new(FixedHit::new(Some(*t)))];
        assert!(!is_occluded(&objects, &any_ray(), Default::default()),
            "t = {} should not occlude", t);
    }
}

#[test]
fn occlusion_stops_at_first_occluder() {
    use std::rc::Rc;
    use mock::FixedHit;

    let far = Rc::new(FixedHit::new(Some(2.0)));
    let blocker = Rc::new(FixedHit::new(Some(0.5)));
    let skipped = Rc::new(FixedHit::new(Some(0.5)));

    let objects: Vec<Box<dyn Shape>> = vec![
        Box::new(Rc::clone(&far)),
        Box::new(Rc::clone(&blocker)),
        Box::new(Rc::clone(&skipped)),
    ];

    assert!(is_occluded(&objects, &any_ray(), Default::default()));
    assert_eq!(far.calls.get(), 1);
    assert_eq!(blocker.calls.get(), 1);
    assert_eq!(skipped.calls.get(), 0);
}

#[test]
fn custom_window() {
    use mock::FixedHit;

    let objects: Vec<Box<dyn Shape>> = vec![Box::new(FixedHit::new(Some(0.0005)))];
    let window = ShadowWindow::new(0.0001, 0.9999);

    assert!(is_occluded(&objects, &any_ray(), window));
}
