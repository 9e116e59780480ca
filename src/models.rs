use imageproc::point::Point;
use serde::Serialize;

use crate::detection::circles;

/// One pixel of an equalized HSV image (8-bit hue convention, 0..=179)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HsvColor {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl HsvColor {
    pub fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }

    pub fn channels(&self) -> [u8; 3] {
        [self.h, self.s, self.v]
    }
}

impl std::fmt::Display for HsvColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}, {}]", self.h, self.s, self.v)
    }
}

/// Pixel coordinate picked by the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PixelPoint {
    pub x: u32,
    pub y: u32,
}

impl PixelPoint {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl std::str::FromStr for PixelPoint {
    type Err = String;

    /// Parses `X,Y`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("expected X,Y but got '{}'", s))?;
        let x = x.trim().parse().map_err(|e| format!("bad x in '{}': {}", s, e))?;
        let y = y.trim().parse().map_err(|e| format!("bad y in '{}': {}", s, e))?;
        Ok(Self { x, y })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Circle {
    pub center: (f32, f32),
    pub radius: f32,
}

impl Circle {
    /// Center rounded to the nearest pixel.
    pub fn pixel_center(&self) -> (i32, i32) {
        (self.center.0.round() as i32, self.center.1.round() as i32)
    }
}

/// External boundary of one connected region of a mask
#[derive(Debug, Clone)]
pub struct Contour {
    pub points: Vec<Point<i32>>,
}

impl Contour {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Absolute polygon area enclosed by the boundary points (shoelace).
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut twice = 0i64;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            twice += a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64;
        }
        (twice as f64 / 2.0).abs()
    }

    /// Smallest circle containing every boundary point.
    pub fn enclosing_circle(&self) -> Option<Circle> {
        circles::min_enclosing_circle(&self.points)
    }
}

/// Largest target contour and its enclosing circle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetFit {
    /// Index of the selected contour in traversal order
    pub index: usize,
    pub area: f64,
    pub circle: Circle,
    /// Number of external contours the mask produced
    pub contour_count: usize,
}

/// Enclosing circles of every background contour, as parallel sequences
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BackgroundFit {
    pub centers: Vec<(f32, f32)>,
    pub radii: Vec<f32>,
}

impl BackgroundFit {
    pub fn len(&self) -> usize {
        self.radii.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }

    pub fn push(&mut self, circle: Circle) {
        self.centers.push(circle.center);
        self.radii.push(circle.radius);
    }

    pub fn circles(&self) -> impl Iterator<Item = Circle> + '_ {
        self.centers
            .iter()
            .zip(&self.radii)
            .map(|(&center, &radius)| Circle { center, radius })
    }
}

/// The two sampled colors of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorSamples {
    pub background: HsvColor,
    pub target: HsvColor,
}

/// Everything one run of the pipeline reports
#[derive(Debug, Clone, Serialize)]
pub struct Measurement {
    pub colors: ColorSamples,
    pub target: TargetFit,
    pub background: BackgroundFit,
}
