// THEORY:
// The `blob_matcher` module is the last analytical step. A logo is a red part
// and a blue part sitting close together, so every surviving red blob is
// paired with every surviving blue blob and the pair is accepted when the
// centers of their bounding boxes are at most `max_blobs_centers_distance`
// pixels apart. The reported logo is the union of both bounding boxes.
//
// Every qualifying pair is reported. A blob close to two blobs of the other
// color takes part in two logos; keeping the distance tight enough to avoid
// that is a configuration concern. Output order follows the input: red blobs
// in the outer loop, blue blobs in the inner loop.

use crate::core_modules::smart_blob::{Blob, BoundingBox, Point};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle around a detected logo.
///
/// `width` and `height` are inclusive pixel counts: a logo whose corner pixels
/// are `(x0, y0)` and `(x1, y1)` has `width = x1 - x0 + 1`. Exclusive
/// `bottom_right - top_left` rectangles come out one pixel smaller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Logo {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Logo {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Inclusive bottom-right pixel. A zero-sized logo collapses onto `top_left`.
    pub fn bottom_right(&self) -> Point {
        Point::new(
            self.x + self.width.saturating_sub(1),
            self.y + self.height.saturating_sub(1),
        )
    }
}

impl From<BoundingBox> for Logo {
    fn from(bounds: BoundingBox) -> Self {
        Logo {
            x: bounds.top_left.x,
            y: bounds.top_left.y,
            width: bounds.width(),
            height: bounds.height(),
        }
    }
}

/// Bounding box and center of one blob, computed once per blob.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    bounds: BoundingBox,
    center: Point,
}

impl Candidate {
    fn of(blob: &Blob) -> Option<Self> {
        let bounds = blob.bounding_box()?;
        Some(Self {
            bounds,
            center: bounds.center(),
        })
    }
}

/// Whether two blob centers are close enough to belong to one logo.
pub fn blobs_centers_matching(red_center: &Point, blue_center: &Point, max_distance: f64) -> bool {
    red_center.distance(blue_center) <= max_distance
}

/// Pairs red and blue blobs into logos.
pub fn match_blobs<'a, R, B>(red_blobs: R, blue_blobs: B, max_distance: f64) -> Vec<Logo>
where
    R: IntoIterator<Item = &'a Blob>,
    B: IntoIterator<Item = &'a Blob>,
{
    let blue: Vec<Candidate> = blue_blobs.into_iter().filter_map(Candidate::of).collect();
    if blue.is_empty() {
        return Vec::new();
    }

    let mut logos = Vec::new();
    for red in red_blobs.into_iter().filter_map(Candidate::of) {
        for blue in &blue {
            if blobs_centers_matching(&red.center, &blue.center, max_distance) {
                logos.push(Logo::from(red.bounds.union(&blue.bounds)));
            }
        }
    }
    logos
}
