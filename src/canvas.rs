use std::io::{ self, BufWriter, Write };
use std::fs::File;
use std::path::Path;

use anyhow::Context;
use log::debug;

use crate::color::Color;

/// Something a render can draw pixels into.
///
/// The renderer asks the sink for its size, then plots every pixel once.
/// Colors arrive unclamped on a 0-255 scale; it is up to the sink to
/// saturate them.
pub trait Sink {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn plot(&mut self, x: usize, y: usize, color: Color);
}

/// A canvas for drawing pixels.
///
/// The canvas stores the resulting colors for each pixel ray, exactly as the
/// renderer produced them. Once rendering finishes, the `Canvas` can be
/// saved to an image file, which is where colors get clamped to 8 bits.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Canvas {
    /// The width of the canvas, in pixels.
    pub width: usize,

    /// The height of the canvas, in pixels.
    pub height: usize,

    /// The pixels of the canvas, stored as a flattened vector.
    pixels: Vec<Color>,
}

impl Canvas {
    /// Creates a new black canvas with specified width and height.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![Color::black(); width * height]
        }
    }

    /// Saves a canvas to an image file.
    ///
    /// A `.ppm` extension writes a plain-text PPM. Any other extension is
    /// handed to the `image` crate, which picks the format from it.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let is_ppm = path.extension()
            .map(|ext| ext.eq_ignore_ascii_case("ppm"))
            .unwrap_or(false);

        if is_ppm {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {:?}", path))?;
            let mut out = BufWriter::new(file);
            self.write_ppm(&mut out)
                .and_then(|_| out.flush())
                .with_context(|| format!("Failed to write PPM to {:?}", path))?;
        } else {
            self.to_rgb_image().save(path)
                .with_context(|| format!("Failed to save image to {:?}", path))?;
        }

        debug!("Saved {}x{} canvas to {:?}.", self.width, self.height, path);
        Ok(())
    }

    /// Writes the canvas as a plain (P3) PPM image.
    ///
    /// Lines in the PPM file are clamped to 70 columns. If a value would
    /// cross the 70 column mark, it is moved to the next line over.
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> io::Result<()> {
        // Write PPM header, as well as metadata
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", self.width, self.height)?;
        writeln!(out, "255")?; // Maximum color value

        let mut line_len = 0;
        for pixel in self.pixels.iter() {
            for channel in pixel.to_rgb8().iter() {
                let value = channel.to_string();

                if line_len + 1 + value.len() > 70 {
                    writeln!(out)?;
                    line_len = 0;
                } else if line_len > 0 {
                    write!(out, " ")?;
                    line_len += 1;
                }

                write!(out, "{}", value)?;
                line_len += value.len();
            }
        }

        // Terminate the PPM file with a newline
        writeln!(out)
    }

    /// Converts the canvas into an 8-bit `image` buffer.
    pub fn to_rgb_image(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let pixel = self.pixels[(y as usize * self.width) + x as usize];
            image::Rgb(pixel.to_rgb8())
        })
    }

    /// Writes a color to a location on the `Canvas`.
    ///
    /// Out-of-bounds pixels are ignored. Pixels are specified in row-column
    /// order, where `y` is the row of the pixel, and `x` is the column. Rows
    /// and columns are zero-indexed.
    ///
    /// # Examples
    ///
    /// Writing a pixel to the fourth column, second row on an 8-by-8 canvas:
    ///
    /// ```
    /// # use phong_tracer::color::Color;
    /// # use phong_tracer::canvas::Canvas;
    /// let purple = Color::rgb(255.0, 0.0, 255.0);
    /// let mut canvas = Canvas::new(8, 8);
    /// canvas.write_pixel(4, 2, &purple);
    /// assert_eq!(canvas.read_pixel(4, 2).unwrap(), purple);
    /// ```
    pub fn write_pixel(&mut self, x: usize, y: usize, pixel: &Color) {
        // Silently ignore out-of-bounds pixels
        if x >= self.width || y >= self.height {
            return;
        }

        self.pixels[(y * self.width) + x] = *pixel;
    }

    /// Reads a color from a location on the `Canvas`.
    ///
    /// If the specified pixel location is out-of-bounds, `None` is returned.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<Color> {
        // Return nothing if pixel is out-of-bounds
        if x >= self.width || y >= self.height {
            return None
        }

        Some(self.pixels[(y * self.width) + x])
    }
}

impl Sink for Canvas {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn plot(&mut self, x: usize, y: usize, color: Color) {
        self.write_pixel(x, y, &color);
    }
}

#[test]
fn out_of_bounds_pixels_are_ignored() {
    let mut canvas = Canvas::new(2, 2);
    canvas.plot(2, 0, Color::rgb(1.0, 1.0, 1.0));
    canvas.plot(0, 5, Color::rgb(1.0, 1.0, 1.0));

    assert_eq!(canvas, Canvas::new(2, 2));
    assert_eq!(canvas.read_pixel(2, 0), None);
}

#[test]
fn ppm_header_and_saturated_pixels() {
    let mut canvas = Canvas::new(3, 1);
    canvas.plot(0, 0, Color::rgb(510.0, 0.0, 0.0));
    canvas.plot(1, 0, Color::rgb(0.0, 127.9, 0.0));
    canvas.plot(2, 0, Color::rgb(-25.0, 0.0, 255.0));

    let mut out = Vec::new();
    canvas.write_ppm(&mut out).unwrap();
    let ppm = String::from_utf8(out).unwrap();

    assert_eq!(ppm, "P3\n3 1\n255\n255 0 0 0 127 0 0 0 255\n");
}

#[test]
fn ppm_lines_stay_within_70_columns() {
    let mut canvas = Canvas::new(10, 2);
    for y in 0..2 {
        for x in 0..10 {
            canvas.plot(x, y, Color::rgb(255.0, 204.0, 153.0));
        }
    }

    let mut out = Vec::new();
    canvas.write_ppm(&mut out).unwrap();
    let ppm = String::from_utf8(out).unwrap();

    let body: Vec<&str> = ppm.lines().skip(3).collect();
    assert!(body.iter().all(|line| line.len() <= 70));

    let values: Vec<&str> = body.iter()
        .flat_map(|line| line.split_whitespace())
        .collect();
    assert_eq!(values.len(), 10 * 2 * 3);
    assert!(ppm.ends_with('\n'));
}

#[test]
fn rgb_image_matches_canvas() {
    let mut canvas = Canvas::new(2, 1);
    canvas.plot(1, 0, Color::rgb(300.0, 20.5, 0.0));

    let img = canvas.to_rgb_image();
    assert_eq!(img.dimensions(), (2, 1));
    assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0]);
    assert_eq!(img.get_pixel(1, 0).0, [255, 20, 0]);
}

#[test]
fn save_ppm_and_png() {
    let dir = std::env::temp_dir();
    let mut canvas = Canvas::new(4, 3);
    canvas.plot(1, 1, Color::rgb(255.0, 128.0, 0.0));

    let ppm_path = dir.join(format!("phong-tracer-{}.ppm", std::process::id()));
    canvas.save(&ppm_path).unwrap();
    let ppm = std::fs::read_to_string(&ppm_path).unwrap();
    assert!(ppm.starts_with("P3\n4 3\n255\n"));
    std::fs::remove_file(&ppm_path).unwrap();

    let png_path = dir.join(format!("phong-tracer-{}.png", std::process::id()));
    canvas.save(&png_path).unwrap();
    let png = std::fs::read(&png_path).unwrap();
    assert_eq!(&png[1..4], b"PNG");
    std::fs::remove_file(&png_path).unwrap();
}
