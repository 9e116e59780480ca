use image::{GrayImage, imageops};
use imageproc::contours::{BorderType, find_contours};
use imageproc::point::Point;

use crate::models::Contour;

/// Find the outermost contours of a binary mask.
///
/// Holes and regions nested inside holes are skipped; every boundary point is kept.
pub fn external_contours(mask: &GrayImage) -> Vec<Contour> {
    // Border following needs a background pixel left of every region, so
    // trace on a copy with a one pixel frame and shift the points back.
    let mut framed = GrayImage::new(mask.width() + 2, mask.height() + 2);
    imageops::replace(&mut framed, mask, 1, 1);

    find_contours::<i32>(&framed)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| {
            Contour::new(
                c.points
                    .into_iter()
                    .map(|p| Point::new(p.x - 1, p.y - 1))
                    .collect(),
            )
        })
        .collect()
}
