pub mod consts;

pub mod tuple;
pub mod ray;
pub mod color;

pub mod geometry;
pub mod light;
pub mod intersect;
pub mod world;
pub mod camera;

pub mod canvas;
pub mod scene;

use crate::consts::FEQ_EPSILON;

pub fn feq(left: f64, right: f64) -> bool {
    (left - right).abs() < FEQ_EPSILON
}
