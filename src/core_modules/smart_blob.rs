// THEORY:
// The `SmartBlob` module holds the spatial data types of the detection engine.
// A `Blob` is one maximal, 8-connected region of set pixels in a binary mask,
// stored as the list of its pixel coordinates. It is produced by the blob
// detector, measured by the moment analyzer, filtered by area and shape, and
// finally paired with a blob of the other color by the matcher.
//
// Key architectural principles:
// 1.  **Stateless Data Container**: A `Blob` only exists for one detection call.
//     It has no identity beyond its pixels and no memory of other frames.
// 2.  **Unordered Membership**: The pixel order inside a blob is the order in
//     which the flood fill reached them. It is deterministic for a given mask
//     but carries no meaning.
// 3.  **Derived Geometry**: Area and bounding box are computed on demand from
//     the coordinates; nothing is cached that could fall out of sync.

use crate::core_modules::frame::Frame;

/// A pixel coordinate in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two points.
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        dx.hypot(dy)
    }
}

/// An axis-aligned box given by its inclusive top-left and bottom-right pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub top_left: Point,
    pub bottom_right: Point,
}

impl BoundingBox {
    /// The smallest box containing all `points`, or `None` for an empty set.
    pub fn enclosing<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = *points.next()?;
        let mut bounds = BoundingBox {
            top_left: first,
            bottom_right: first,
        };
        for point in points {
            bounds.top_left.x = bounds.top_left.x.min(point.x);
            bounds.top_left.y = bounds.top_left.y.min(point.y);
            bounds.bottom_right.x = bounds.bottom_right.x.max(point.x);
            bounds.bottom_right.y = bounds.bottom_right.y.max(point.y);
        }
        Some(bounds)
    }

    /// Integer midpoint of the two corners.
    pub fn center(&self) -> Point {
        Point {
            x: (self.top_left.x + self.bottom_right.x) / 2,
            y: (self.top_left.y + self.bottom_right.y) / 2,
        }
    }

    /// Component-wise min of top-lefts and max of bottom-rights.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            top_left: Point {
                x: self.top_left.x.min(other.top_left.x),
                y: self.top_left.y.min(other.top_left.y),
            },
            bottom_right: Point {
                x: self.bottom_right.x.max(other.bottom_right.x),
                y: self.bottom_right.y.max(other.bottom_right.y),
            },
        }
    }

    /// Width in pixels, counting both edge columns.
    pub fn width(&self) -> u32 {
        self.bottom_right.x - self.top_left.x + 1
    }

    /// Height in pixels, counting both edge rows.
    pub fn height(&self) -> u32 {
        self.bottom_right.y - self.top_left.y + 1
    }
}

/// A maximal 8-connected set of foreground pixels.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Blob {
    /// Every pixel of the blob, in flood-fill order.
    pub points: Vec<Point>,
}

impl Blob {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Pixel count.
    pub fn area(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::enclosing(&self.points)
    }
}

/// Paints every blob pixel into a fresh `width x height` mask.
/// Points outside the canvas are skipped.
pub fn render_blobs<'a>(blobs: impl IntoIterator<Item = &'a Blob>, width: u32, height: u32) -> Frame {
    let mut mask = Frame::empty_mask(width, height);
    for blob in blobs {
        for point in &blob.points {
            if point.x < width && point.y < height {
                mask.set(point.x, point.y, Frame::MASK_SET);
            }
        }
    }
    mask
}
