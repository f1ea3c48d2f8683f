use std::convert::TryFrom;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{ ensure, Context };
use log::{ info, warn };
use serde::{ Serialize, Deserialize };

use crate::consts::{ CANVAS_WIDTH, CANVAS_HEIGHT, DIRECTIONAL_LIGHT_DISTANCE };
use crate::tuple::Tuple4D;
use crate::color::Color;
use crate::geometry::{ Shape, Sphere, Plane, Triangle };
use crate::light::{ Light, PointLight, DirectionalLight, AmbientLight, Material };
use crate::intersect::ShadowWindow;
use crate::world::World;
use crate::camera::{ Camera, ViewPlane };
use crate::canvas::Canvas;

/// Everything needed to produce one image.
#[derive(Debug)]
pub struct Scene {
    pub world: World,
    pub camera: Camera,
    pub view: ViewPlane,
    pub width: usize,
    pub height: usize,
}

impl Scene {
    /// Reads and parses a JSON scene description from `path`.
    pub fn load(path: &Path) -> anyhow::Result<Scene> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene file {:?}", path))?;

        let scene: Scene = text.parse()
            .with_context(|| format!("Invalid scene file {:?}", path))?;

        info!("Loaded scene {:?}: {} objects, {} lights.",
            path, scene.world.objects.len(), scene.world.lights.len());
        if scene.world.lights.is_empty() {
            warn!("Scene {:?} has no lights; only ambient shading will show.", path);
        }

        Ok(scene)
    }

    /// Renders the scene onto a fresh canvas of the scene's size.
    pub fn render(&self) -> Canvas {
        let mut canvas = Canvas::new(self.width, self.height);
        self.camera.render(&mut canvas, &self.view, &self.world);
        canvas
    }
}

impl FromStr for Scene {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Scene> {
        let scene_json: SceneJson = serde_json::from_str(s)
            .context("Malformed scene JSON")?;

        Scene::try_from(scene_json)
    }
}

impl TryFrom<SceneJson> for Scene {
    type Error = anyhow::Error;

    fn try_from(scene_json: SceneJson) -> anyhow::Result<Scene> {
        ensure!(scene_json.width > 0 && scene_json.height > 0,
            "Image size must be non-zero, got {}x{}",
            scene_json.width, scene_json.height);

        let view = ViewPlane::new(
            scene_json.view.half_width,
            scene_json.view.half_height,
            scene_json.view.near,
        );

        let camera_json = &scene_json.camera;
        let camera = Camera::look_at(
            point(camera_json.eye),
            point(camera_json.gaze),
            camera_json.up.into(),
        );

        let mut world = World::empty();
        world.background = scene_json.background.into();
        world.ambient = AmbientLight::new(scene_json.ambient.into());

        if let Some(window) = scene_json.shadow_window {
            ensure!(window.min < window.max,
                "Shadow window is empty: ({}, {})", window.min, window.max);
            world.shadow_window = ShadowWindow::new(window.min, window.max);
        }

        world.lights = scene_json.lights.into_iter()
            .map(LightJson::into_light)
            .collect::<anyhow::Result<_>>()?;

        world.objects = scene_json.objects.into_iter()
            .enumerate()
            .map(|(i, obj)| obj.into_shape()
                .with_context(|| format!("Object #{} is invalid", i)))
            .collect::<anyhow::Result<_>>()?;

        Ok(Scene {
            world,
            camera,
            view,
            width: scene_json.width,
            height: scene_json.height,
        })
    }
}

fn default_width() -> usize {
    CANVAS_WIDTH
}

fn default_height() -> usize {
    CANVAS_HEIGHT
}

fn point(v: [f64; 3]) -> Tuple4D {
    Tuple4D::point(v[0], v[1], v[2])
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneJson {
    #[serde(default = "default_width")]
    width: usize,
    #[serde(default = "default_height")]
    height: usize,
    view: ViewJson,
    camera: CameraJson,

    #[serde(default)]
    background: [f64; 3],
    #[serde(default)]
    ambient: [f64; 3],
    #[serde(default)]
    shadow_window: Option<WindowJson>,

    #[serde(default)]
    lights: Vec<LightJson>,
    #[serde(default)]
    objects: Vec<ObjectJson>,
}

#[derive(Clone, Serialize, Deserialize)]
struct ViewJson {
    half_width: f64,
    half_height: f64,
    near: f64,
}

#[derive(Clone, Serialize, Deserialize)]
struct CameraJson {
    eye: [f64; 3],
    gaze: [f64; 3],
    up: [f64; 3],
}

#[derive(Clone, Serialize, Deserialize)]
struct WindowJson {
    min: f64,
    max: f64,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum LightJson {
    Point {
        intensity: [f64; 3],
        position: [f64; 3],
    },
    Directional {
        intensity: [f64; 3],
        direction: [f64; 3],
        #[serde(default = "default_light_distance")]
        distance: f64,
    },
}

fn default_light_distance() -> f64 {
    DIRECTIONAL_LIGHT_DISTANCE
}

impl LightJson {
    fn into_light(self) -> anyhow::Result<Box<dyn Light>> {
        let light: Box<dyn Light> = match self {
            LightJson::Point { intensity, position } => {
                Box::new(PointLight::new(intensity.into(), point(position)))
            },
            LightJson::Directional { intensity, direction, distance } => {
                let direction: Tuple4D = direction.into();
                ensure!(direction.magnitude() > 0.0,
                    "Directional light needs a non-zero direction");
                ensure!(distance > 0.0,
                    "Directional light distance must be positive, got {}", distance);

                Box::new(DirectionalLight::new(intensity.into(), direction, distance))
            },
        };

        Ok(light)
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct MaterialJson {
    #[serde(default)]
    ambient: [f64; 3],
    #[serde(default)]
    diffuse: [f64; 3],
    #[serde(default)]
    specular: [f64; 3],
}

impl From<MaterialJson> for Material {
    fn from(m: MaterialJson) -> Material {
        Material::new(m.ambient.into(), m.diffuse.into(), m.specular.into())
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ObjectJson {
    Sphere {
        center: [f64; 3],
        radius: f64,
        #[serde(default)]
        material: MaterialJson,
    },
    Plane {
        point: [f64; 3],
        normal: [f64; 3],
        #[serde(default)]
        material: MaterialJson,
    },
    Triangle {
        vertices: [[f64; 3]; 3],
        #[serde(default)]
        material: MaterialJson,
    },
}

impl ObjectJson {
    fn into_shape(self) -> anyhow::Result<Box<dyn Shape>> {
        let shape: Box<dyn Shape> = match self {
            ObjectJson::Sphere { center, radius, material } => {
                ensure!(radius > 0.0, "Sphere radius must be positive, got {}", radius);

                Box::new(Sphere::new(point(center), radius, material.into()))
            },
            ObjectJson::Plane { point: p, normal, material } => {
                let normal: Tuple4D = normal.into();
                ensure!(normal.magnitude() > 0.0, "Plane needs a non-zero normal");

                Box::new(Plane::new(point(p), normal, material.into()))
            },
            ObjectJson::Triangle { vertices, material } => {
                let [p1, p2, p3] = vertices;
                let (p1, p2, p3) = (point(p1), point(p2), point(p3));
                ensure!((p2 - p1).cross(&(p3 - p1)).magnitude() > 0.0,
                    "Triangle vertices are collinear");

                Box::new(Triangle::new(p1, p2, p3, material.into()))
            },
        };

        Ok(shape)
    }
}

#[cfg(test)]
const RED_WALL: &str = r#"{
    "width": 4,
    "height": 2,
    "view": { "half_width": 1.0, "half_height": 0.5, "near": 1.0 },
    "camera": { "eye": [0, 0, 5], "gaze": [0, 0, 0], "up": [0, 1, 0] },
    "background": [0, 0, 40],
    "ambient": [0.1, 0.1, 0.1],
    "lights": [
        { "type": "point", "intensity": [1, 1, 1], "position": [0, 0, 10] }
    ],
    "objects": [
        {
            "type": "plane", "point": [0, 0, 0], "normal": [0, 0, 1],
            "material": { "ambient": [1, 0, 0], "diffuse": [1, 0, 0] }
        }
    ]
}"#;

#[test]
fn parse_scene() {
    let scene: Scene = RED_WALL.parse().unwrap();

    assert_eq!((scene.width, scene.height), (4, 2));
    assert_eq!(scene.view, ViewPlane::new(1.0, 0.5, 1.0));
    assert_eq!(scene.camera.eye, Tuple4D::point(0.0, 0.0, 5.0));
    assert_eq!(scene.camera.forward, Tuple4D::vector(0.0, 0.0, 1.0));
    assert_eq!(scene.world.background, Color::rgb(0.0, 0.0, 40.0));
    assert_eq!(scene.world.ambient.intensity, Color::rgb(0.1, 0.1, 0.1));
    assert_eq!(scene.world.shadow_window, ShadowWindow::default());
    assert_eq!(scene.world.lights.len(), 1);
    assert_eq!(scene.world.objects.len(), 1);

    let material = scene.world.objects[0].material();
    assert_eq!(material.diffuse, Color::rgb(1.0, 0.0, 0.0));
    assert_eq!(material.specular, Color::black());
}

#[test]
fn render_parsed_scene() {
    let scene: Scene = RED_WALL.parse().unwrap();
    let canvas = scene.render();

    // Column 2 of 4 and row 1 of 2 map to the view-plane center.
    assert_eq!(canvas.read_pixel(2, 1), Some(Color::rgb(280.5, 0.0, 0.0)));
    assert_eq!(canvas.width, 4);
    assert_eq!(canvas.height, 2);
}

#[test]
fn parse_all_shape_and_light_kinds() {
    let json = r#"{
        "width": 1, "height": 1,
        "view": { "half_width": 1.0, "half_height": 1.0, "near": 1.0 },
        "camera": { "eye": [0, 0, 5], "gaze": [0, 0, 0], "up": [0, 1, 0] },
        "shadow_window": { "min": 0.01, "max": 0.99 },
        "lights": [
            { "type": "point", "intensity": [1, 1, 1], "position": [0, 5, 0] },
            { "type": "directional", "intensity": [1, 1, 1], "direction": [0, -1, 0] }
        ],
        "objects": [
            { "type": "sphere", "center": [0, 0, 0], "radius": 1 },
            { "type": "plane", "point": [0, -1, 0], "normal": [0, 1, 0] },
            { "type": "triangle", "vertices": [[0, 1, 0], [-1, 0, 0], [1, 0, 0]] }
        ]
    }"#;

    let scene: Scene = json.parse().unwrap();
    assert_eq!(scene.world.shadow_window, ShadowWindow::new(0.01, 0.99));
    assert_eq!(scene.world.lights.len(), 2);
    assert_eq!(scene.world.objects.len(), 3);

    let s = scene.world.lights[1].to_light(Tuple4D::point(3.0, 0.0, 0.0));
    assert_eq!(s, Tuple4D::vector(0.0, DIRECTIONAL_LIGHT_DISTANCE, 0.0));
}

#[test]
fn reject_bad_scenes() {
    let base = |objects: &str| format!(r#"{{
        "width": 2, "height": 2,
        "view": {{ "half_width": 1.0, "half_height": 1.0, "near": 1.0 }},
        "camera": {{ "eye": [0, 0, 5], "gaze": [0, 0, 0], "up": [0, 1, 0] }},
        "objects": [{}]
    }}"#, objects);

    assert!(base("").parse::<Scene>().is_ok());
    assert!(base(r#"{ "type": "sphere", "center": [0, 0, 0], "radius": -1 }"#)
        .parse::<Scene>().is_err());
    assert!(base(r#"{ "type": "plane", "point": [0, 0, 0], "normal": [0, 0, 0] }"#)
        .parse::<Scene>().is_err());
    assert!(base(r#"{ "type": "cone" }"#).parse::<Scene>().is_err());
    assert!(base(r#"{ "type": "triangle", "vertices": [[0, 0, 0], [1, 1, 1], [2, 2, 2]] }"#)
        .parse::<Scene>().is_err());

    assert!("{ \"width\": 2 }".parse::<Scene>().is_err());
    assert!(RED_WALL.replace("\"width\": 4", "\"width\": 0")
        .parse::<Scene>().is_err());
}

#[test]
fn size_defaults_when_omitted() {
    let json = RED_WALL.replace("\"width\": 4,", "").replace("\"height\": 2,", "");
    let scene: Scene = json.parse().unwrap();

    assert_eq!((scene.width, scene.height), (CANVAS_WIDTH, CANVAS_HEIGHT));
}

#[test]
fn load_reports_missing_file() {
    let err = Scene::load(Path::new("/nonexistent/scene.json")).unwrap_err();

    assert!(format!("{:#}", err).contains("Failed to read scene file"));
}

#[test]
fn bundled_scene_loads() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("scenes/spheres.json");
    let scene = Scene::load(&path).unwrap();

    assert_eq!(scene.world.objects.len(), 4);
    assert_eq!(scene.world.lights.len(), 2);
}
