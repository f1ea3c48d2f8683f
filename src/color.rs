use std::ops::{ Add, AddAssign, Mul };

use crate::feq;

/// A color.
///
/// Represented with red-green-blue (RGB) values. Colors produced by the
/// shading code are already scaled to the 0-255 display range, but nothing
/// clamps them: overexposed channels may exceed 255 and faulty inputs may go
/// negative. Saturation is left to whatever consumes the color (see
/// `Color::to_rgb8`).
///
/// # Examples
///
/// Accumulate two contributions:
///
/// ```
/// # use phong_tracer::color::Color;
/// let mut c = Color::black();
/// c += Color::rgb(200.0, 0.0, 0.0);
/// c += Color::rgb(100.0, 10.0, 0.0);
/// assert_eq!(c, Color::rgb(300.0, 10.0, 0.0));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialOrd)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Partial equality on two colors.
///
/// Similar to the `PartialEq` implementation on `Tuple4D`, `Color`s are
/// compared component-wise, accounting for possible floating point error in
/// comparisons.
impl PartialEq for Color {
    fn eq(&self, other: &Color) -> bool {
        feq(self.r, other.r) &&
            feq(self.g, other.g) &&
            feq(self.b, other.b)
    }
}

impl From<[f64; 3]> for Color {
    fn from(v: [f64; 3]) -> Color {
        Color { r: v[0], g: v[1], b: v[2] }
    }
}

impl Color {
    /// Creates a color with red, green and blue values.
    pub fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b }
    }

    /// The color black.
    pub fn black() -> Color {
        Color {
            r: 0.0,
            g: 0.0,
            b: 0.0
        }
    }

    /// The color white, as a unit reflectance or intensity.
    pub fn white() -> Color {
        Color {
            r: 1.0,
            g: 1.0,
            b: 1.0
        }
    }

    /// Computes the Hadamard (channel-wise) product of two colors.
    ///
    /// This is how a reflectance filters a light's intensity.
    ///
    /// ```
    /// # use phong_tracer::color::Color;
    /// let yellow = Color::rgb(1.0, 1.0, 0.0);
    /// let purple = Color::rgb(1.0, 0.0, 1.0);
    /// assert_eq!(Color::hadamard(&yellow, &purple), Color::rgb(1.0, 0.0, 0.0));
    /// ```
    pub fn hadamard(c1: &Color, c2: &Color) -> Color {
        let r = c1.r * c2.r;
        let g = c1.g * c2.g;
        let b = c1.b * c2.b;

        Color { r, g, b }
    }

    /// Converts to 8-bit channels, clamping to `[0, 255]` and truncating.
    ///
    /// NaN channels map to 0.
    pub fn to_rgb8(&self) -> [u8; 3] {
        fn channel(c: f64) -> u8 {
            if c.is_nan() {
                0
            } else {
                c.clamp(0.0, 255.0) as u8
            }
        }

        [channel(self.r), channel(self.g), channel(self.b)]
    }
}

/// Adds two colors together.
///
/// Components are added together individually.
impl Add<Color> for Color {
    type Output = Color;

    fn add(self, other: Color) -> Self::Output {
        Color {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
        }
    }
}

impl AddAssign<Color> for Color {
    fn add_assign(&mut self, other: Color) {
        self.r += other.r;
        self.g += other.g;
        self.b += other.b;
    }
}

/// Multiplies a color by a scalar.
///
/// Each component is multiplied by the scalar.
impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, other: f64) -> Self::Output {
        Color {
            r: self.r * other,
            g: self.g * other,
            b: self.b * other,
        }
    }
}

/// Multiplies a scalar by a color.
impl Mul<Color> for f64 {
    type Output = Color;

    fn mul(self, other: Color) -> Self::Output {
        Color {
            r: self * other.r,
            g: self * other.g,
            b: self * other.b,
        }
    }
}

/// Multiplies a color by a color.
///
/// For colors `c1` and `c2`, `c1 * c2` is shorthand for
/// `Color::hadamard(&c1, &c2)`.
impl Mul<Color> for Color {
    type Output = Color;

    fn mul(self, other: Color) -> Self::Output {
        Color::hadamard(&self, &other)
    }
}

#[test]
fn add_colors() {
    let c1 = Color::rgb(0.9, 0.6, 0.75);
    let c2 = Color::rgb(0.7, 0.1, 0.25);
    let c3 = Color { r: 1.6, g: 0.7, b: 1.0 };

    assert_eq!(c1 + c2, c3);
}

#[test]
fn multiply_color_by_scalar() {
    let c1 = Color::rgb(0.2, 0.3, 0.4);

    assert_eq!(c1 * 2.0, Color::rgb(0.4, 0.6, 0.8));
    assert_eq!(255.0 * Color::white(), Color::rgb(255.0, 255.0, 255.0));
}

#[test]
fn multiply_colors() {
    let c1 = Color::rgb(1.0, 0.2, 0.4);
    let c2 = Color::rgb(0.9, 1.0, 0.1);

    assert_eq!(c1 * c2, Color::rgb(0.9, 0.2, 0.04));
}

#[test]
fn to_rgb8_saturates() {
    let overexposed = Color::rgb(510.0, 127.9, -40.0);

    assert_eq!(overexposed.to_rgb8(), [255, 127, 0]);
    assert_eq!(Color::rgb(f64::NAN, 0.0, 0.0).to_rgb8(), [0, 0, 0]);
}
