// THEORY:
// The `blob_filter` module discards blobs that cannot be part of a logo. It
// runs two independent passes, each of which removes failing blobs outright:
//
// 1.  **Area**: the pixel count must lie inside an inclusive range. This is the
//     cheap pass and runs first, so moments are only computed for survivors.
// 2.  **Shape**: the first two Hu moments must each lie inside their own
//     inclusive range (`hu[0]` against the hu0 range, `hu[1]` against the hu1
//     range).
//
// Moments are attached to their blob as a `ShapedBlob` before the shape pass,
// so a blob and the invariants computed from it always travel together and can
// never drift out of alignment when others are removed.

use crate::core_modules::moment::{HuMoment, HuMoments, Moments};
use crate::core_modules::smart_blob::Blob;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// An inclusive `[min, max]` acceptance range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> ValueRange<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }

    /// False when `min > max` (or either bound is NaN).
    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }
}

pub type BlobArea = usize;
pub type BlobAreaRange = ValueRange<BlobArea>;
pub type HuMomentRange = ValueRange<HuMoment>;

/// A blob paired with the Hu invariants computed from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedBlob {
    pub blob: Blob,
    pub hu: HuMoments,
}

impl ShapedBlob {
    /// `None` for an empty blob.
    pub fn new(blob: Blob) -> Option<Self> {
        let hu = Moments::from_blob(&blob)?.hu;
        Some(Self { blob, hu })
    }
}

/// Keeps blobs whose pixel count lies inside `range`.
pub fn filter_by_area(blobs: Vec<Blob>, range: &BlobAreaRange) -> Vec<Blob> {
    blobs
        .into_iter()
        .filter(|blob| {
            let keep = range.contains(blob.area());
            if !keep {
                trace!(area = blob.area(), "blob rejected by area");
            }
            keep
        })
        .collect()
}

/// Attaches Hu moments to every blob. Degenerate (empty) blobs are dropped.
pub fn shape_blobs(blobs: Vec<Blob>) -> Vec<ShapedBlob> {
    blobs.into_iter().filter_map(ShapedBlob::new).collect()
}

/// Keeps blobs whose `hu[0]` lies in `hu0_range` and `hu[1]` in `hu1_range`.
pub fn filter_by_hu_moments(
    blobs: Vec<ShapedBlob>,
    hu0_range: &HuMomentRange,
    hu1_range: &HuMomentRange,
) -> Vec<ShapedBlob> {
    blobs
        .into_iter()
        .filter(|shaped| {
            let keep = hu0_range.contains(shaped.hu[0]) && hu1_range.contains(shaped.hu[1]);
            if !keep {
                trace!(
                    hu0 = shaped.hu[0],
                    hu1 = shaped.hu[1],
                    area = shaped.blob.area(),
                    "blob rejected by shape"
                );
            }
            keep
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::smart_blob::Point;

    fn rectangle(width: u32, height: u32) -> Blob {
        let mut points = Vec::new();
        for y in 0..height {
            for x in 0..width {
                points.push(Point::new(x, y));
            }
        }
        Blob::new(points)
    }

    #[test]
    fn value_range_is_inclusive() {
        let range = ValueRange::new(10usize, 20);
        assert!(range.contains(10));
        assert!(range.contains(20));
        assert!(!range.contains(9));
        assert!(!range.contains(21));
        assert!(range.is_ordered());
        assert!(!ValueRange::new(2.0, 1.0).is_ordered());
        assert!(!ValueRange::new(f64::NAN, 1.0).is_ordered());
    }

    #[test]
    fn area_filter_keeps_bounds() {
        let blobs = vec![rectangle(2, 2), rectangle(3, 3), rectangle(4, 4), rectangle(5, 5)];
        let kept = filter_by_area(blobs, &ValueRange::new(9, 16));
        let areas: Vec<usize> = kept.iter().map(Blob::area).collect();
        assert_eq!(areas, vec![9, 16]);
    }

    #[test]
    fn area_filter_on_empty_input() {
        assert!(filter_by_area(Vec::new(), &ValueRange::new(0, 100)).is_empty());
    }

    #[test]
    fn shaping_drops_empty_blobs() {
        let shaped = shape_blobs(vec![rectangle(3, 3), Blob::default()]);
        assert_eq!(shaped.len(), 1);
        assert_eq!(shaped[0].blob.area(), 9);
    }

    #[test]
    fn hu_filter_tests_each_moment_against_its_own_range() {
        // Square 4x4: hu0 = 15/96 = 0.15625, hu1 = 0.
        // Rectangle 8x2: hu0 = (63 + 3) / (12 * 16) = 0.34375, hu1 = (60/192)^2 = 0.09765625.
        let shaped = shape_blobs(vec![rectangle(4, 4), rectangle(8, 2)]);
        assert!((shaped[0].hu[0] - 0.15625).abs() < 1e-12);
        assert!((shaped[1].hu[0] - 0.34375).abs() < 1e-12);
        assert!((shaped[1].hu[1] - 0.09765625).abs() < 1e-12);

        let hu0 = ValueRange::new(0.30, 0.45);
        let hu1 = ValueRange::new(0.05, 0.15);
        let kept = filter_by_hu_moments(shaped.clone(), &hu0, &hu1);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].blob.area(), 16);
        assert_eq!(kept[0].blob, rectangle(8, 2));

        // A range that accepts the square's hu0 but not its hu1 must reject it,
        // even though hu1 = 0 would pass a check against the hu0 bounds.
        let hu0_only_square = ValueRange::new(0.0, 0.2);
        let strict_hu1 = ValueRange::new(0.01, 0.02);
        assert!(filter_by_hu_moments(shaped, &hu0_only_square, &strict_hu1).is_empty());
    }

    #[test]
    fn hu_filter_keeps_blob_and_moments_together() {
        let shaped = shape_blobs(vec![rectangle(8, 2), rectangle(4, 4), rectangle(2, 8)]);
        let kept = filter_by_hu_moments(
            shaped,
            &ValueRange::new(0.30, 0.45),
            &ValueRange::new(0.05, 0.15),
        );
        assert_eq!(kept.len(), 2);
        for shaped in &kept {
            assert_eq!(Some(shaped.hu), Moments::from_blob(&shaped.blob).map(|m| m.hu));
        }
    }
}
