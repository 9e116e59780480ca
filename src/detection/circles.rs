use imageproc::geometry::convex_hull;
use imageproc::point::Point;

use crate::error::{DetectError, Result};
use crate::models::{BackgroundFit, Circle, Contour, TargetFit};

const EPS: f64 = 1e-7;

#[derive(Debug, Clone, Copy)]
struct Disc {
    x: f64,
    y: f64,
    r: f64,
}

impl Disc {
    fn contains(&self, p: (f64, f64)) -> bool {
        let (dx, dy) = (p.0 - self.x, p.1 - self.y);
        (dx * dx + dy * dy).sqrt() <= self.r + EPS * self.r.max(1.0)
    }

    fn from_pair(a: (f64, f64), b: (f64, f64)) -> Self {
        let x = (a.0 + b.0) / 2.0;
        let y = (a.1 + b.1) / 2.0;
        let r = ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt() / 2.0;
        Self { x, y, r }
    }

    fn from_triple(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> Self {
        let (bx, by) = (b.0 - a.0, b.1 - a.1);
        let (cx, cy) = (c.0 - a.0, c.1 - a.1);
        let d = 2.0 * (bx * cy - by * cx);

        if d.abs() < EPS {
            // collinear: the widest pair spans the other point
            return [Self::from_pair(a, b), Self::from_pair(a, c), Self::from_pair(b, c)]
                .into_iter()
                .fold(Self::from_pair(a, b), |best, disc| {
                    if disc.r > best.r { disc } else { best }
                });
        }

        let b2 = bx * bx + by * by;
        let c2 = cx * cx + cy * cy;
        let ux = (cy * b2 - by * c2) / d;
        let uy = (bx * c2 - cx * b2) / d;
        Self {
            x: a.0 + ux,
            y: a.1 + uy,
            r: (ux * ux + uy * uy).sqrt(),
        }
    }
}

/// Smallest circle enclosing all `points`, or `None` if there are none.
///
/// Runs the incremental (Welzl style) construction over the convex hull, which
/// holds every point that can lie on the circle.
pub fn min_enclosing_circle(points: &[Point<i32>]) -> Option<Circle> {
    if points.is_empty() {
        return None;
    }

    let hull: Vec<(f64, f64)> = convex_hull(points)
        .into_iter()
        .map(|p| (p.x as f64, p.y as f64))
        .collect();
    let pts = if hull.is_empty() {
        vec![(points[0].x as f64, points[0].y as f64)]
    } else {
        hull
    };

    let mut disc = Disc {
        x: pts[0].0,
        y: pts[0].1,
        r: 0.0,
    };
    for i in 1..pts.len() {
        if disc.contains(pts[i]) {
            continue;
        }
        disc = Disc {
            x: pts[i].0,
            y: pts[i].1,
            r: 0.0,
        };
        for j in 0..i {
            if disc.contains(pts[j]) {
                continue;
            }
            disc = Disc::from_pair(pts[i], pts[j]);
            for k in 0..j {
                if !disc.contains(pts[k]) {
                    disc = Disc::from_triple(pts[i], pts[j], pts[k]);
                }
            }
        }
    }

    Some(Circle {
        center: (disc.x as f32, disc.y as f32),
        radius: disc.r as f32,
    })
}

/// Contour with the strictly largest area; the first one wins a tie.
pub fn largest_contour(contours: &[Contour]) -> Option<(usize, &Contour, f64)> {
    let mut best: Option<(usize, &Contour, f64)> = None;
    for (index, contour) in contours.iter().enumerate() {
        let area = contour.area();
        match best {
            Some((_, _, max_area)) if area <= max_area => {}
            _ => best = Some((index, contour, area)),
        }
    }
    best
}

/// Fit the enclosing circle of the largest contour
pub fn fit_target(contours: &[Contour]) -> Result<TargetFit> {
    let (index, contour, area) =
        largest_contour(contours).ok_or(DetectError::NoContour { what: "target" })?;
    let circle = contour
        .enclosing_circle()
        .ok_or(DetectError::NoContour { what: "target" })?;

    tracing::info!("max size contour at {} with size {}", index, area);

    Ok(TargetFit {
        index,
        area,
        circle,
        contour_count: contours.len(),
    })
}

/// Fit an enclosing circle to every contour, without filtering
pub fn fit_all(contours: &[Contour]) -> BackgroundFit {
    let mut fit = BackgroundFit::default();
    for circle in contours.iter().filter_map(|c| c.enclosing_circle()) {
        fit.push(circle);
    }
    fit
}
