// Runtime defaults
pub const CANVAS_WIDTH: usize = 320;
pub const CANVAS_HEIGHT: usize = 240;
pub const OUT_FILE: &'static str = "out.ppm";

// Floating point comparisons
pub const FEQ_EPSILON: f64 = 0.0001;

// Open interval along a shadow ray (t = 0 at the light, t = 1 at the surface
// point) inside which a hit counts as an occluder.
pub const SHADOW_T_MIN: f64 = 0.001;
pub const SHADOW_T_MAX: f64 = 0.999;

// Phong shading
pub const SPECULAR_EXPONENT: i32 = 2;
pub const COLOR_SCALE: f64 = 255.0;

// Default length of a directional light's shadow segment. The shadow window
// bounds scale with it.
pub const DIRECTIONAL_LIGHT_DISTANCE: f64 = 100.0;
