// THEORY:
// The `BlobDetector` is the engine of the Spatial Grouping Layer. It performs
// binary connected-component analysis on a thresholded mask and groups the set
// pixels into "blobs": maximal regions in which every pixel touches another one
// horizontally, vertically or diagonally (8-connectivity).
//
// Key architectural principles & algorithm steps:
// 1.  **Raster Scan (Seeding)**: The mask is scanned row by row. The first set
//     pixel of every still-unclaimed region becomes the seed of a new blob, so
//     blobs come out ordered by their first pixel in raster order.
// 2.  **Region Growing**: From the seed, the blob grows iteratively. The blob's
//     own pixel list doubles as the work queue: a cursor walks through it and
//     every set neighbor of the current pixel is appended. No recursion, so a
//     mask-sized blob cannot overflow the stack.
// 3.  **Destructive Consumption**: A pixel is cleared in the mask at the moment
//     it joins a blob. It can never be reached twice, which makes the blobs
//     disjoint and the whole pass linear in the number of pixels. Callers that
//     still need the mask afterwards must hand in a copy.
// 4.  **Stateless Utility**: The detector keeps nothing between calls.

use crate::core_modules::frame::Frame;
use crate::core_modules::smart_blob::{Blob, Point};
use crate::error::Result;

pub mod blob_detector {
    use super::*; // Make types from parent module available.

    /// The 8 neighbor offsets, starting east and turning clockwise.
    const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
        (1, 0),
        (1, 1),
        (0, 1),
        (-1, 1),
        (-1, 0),
        (-1, -1),
        (0, -1),
        (1, -1),
    ];

    /// Extracts every blob of the mask, clearing the mask as it goes.
    ///
    /// On return the mask is entirely clear. An empty mask yields no blobs and
    /// is left untouched.
    pub fn find_blobs(mask: &mut Frame) -> Result<Vec<Blob>> {
        mask.ensure_channels(Frame::MASK_CHANNELS)?;

        let (width, height) = mask.dimensions();
        let mut blobs = Vec::new();
        for y in 0..height {
            for x in 0..width {
                if mask.is_set(x, y) {
                    blobs.push(grow_blob(mask, Point::new(x, y)));
                }
            }
        }

        Ok(blobs)
    }

    /// Extracts the single blob containing `seed`.
    ///
    /// Returns `None` when the seed lies outside the mask or is not set.
    pub fn find_blob_at(mask: &mut Frame, seed: Point) -> Result<Option<Blob>> {
        mask.ensure_channels(Frame::MASK_CHANNELS)?;

        if !mask.contains(seed.x as i64, seed.y as i64) || !mask.is_set(seed.x, seed.y) {
            return Ok(None);
        }
        Ok(Some(grow_blob(mask, seed)))
    }

    /// Iterative flood fill from a set seed pixel.
    fn grow_blob(mask: &mut Frame, seed: Point) -> Blob {
        mask.set(seed.x, seed.y, 0);
        let mut points = vec![seed];
        let mut cursor = 0;

        while cursor < points.len() {
            let current = points[cursor];
            cursor += 1;

            for (dx, dy) in NEIGHBOR_OFFSETS {
                let nx = current.x as i64 + dx;
                let ny = current.y as i64 + dy;
                if !mask.contains(nx, ny) {
                    continue;
                }

                let (nx, ny) = (nx as u32, ny as u32);
                if mask.is_set(nx, ny) {
                    mask.set(nx, ny, 0);
                    points.push(Point::new(nx, ny));
                }
            }
        }

        Blob::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::blob_detector::*;
    use super::*;
    use std::collections::HashSet;

    fn mask_from_rows(rows: &[&str]) -> Frame {
        let height = rows.len() as u32;
        let width = rows[0].len() as u32;
        let data = rows
            .iter()
            .flat_map(|row| row.bytes().map(|b| if b == b'#' { 255 } else { 0 }))
            .collect();
        Frame::new(width, height, 1, data).unwrap()
    }

    #[test]
    fn empty_mask_yields_no_blobs_and_stays_unchanged() {
        let mut mask = Frame::empty_mask(32, 24);
        let blobs = find_blobs(&mut mask).unwrap();
        assert!(blobs.is_empty());
        assert_eq!(mask, Frame::empty_mask(32, 24));
    }

    #[test]
    fn filled_mask_yields_one_blob_with_every_pixel() {
        let mut mask = Frame::filled(32, 24, 1, 255);
        let blobs = find_blobs(&mut mask).unwrap();
        assert_eq!(blobs.len(), 1);

        let blob = &blobs[0];
        assert_eq!(blob.area(), 32 * 24);
        let unique: HashSet<Point> = blob.points.iter().copied().collect();
        assert_eq!(unique.len(), 32 * 24);
        for y in 0..24 {
            for x in 0..32 {
                assert!(unique.contains(&Point::new(x, y)));
            }
        }
        assert_eq!(mask.count_nonzero(), 0);
    }

    #[test]
    fn isolated_corners_are_separate_blobs() {
        let mut mask = mask_from_rows(&[
            "#....#", //
            "......", //
            "......", //
            "#....#", //
        ]);
        let blobs = find_blobs(&mut mask).unwrap();
        assert_eq!(blobs.len(), 4);
        assert!(blobs.iter().all(|blob| blob.area() == 1));
        assert_eq!(blobs[0].points, vec![Point::new(0, 0)]);
        assert_eq!(blobs[1].points, vec![Point::new(5, 0)]);
        assert_eq!(blobs[2].points, vec![Point::new(0, 3)]);
        assert_eq!(blobs[3].points, vec![Point::new(5, 3)]);
    }

    #[test]
    fn diagonal_checkerboard_is_one_blob() {
        let mut mask = mask_from_rows(&[
            "#.#.#.", //
            ".#.#.#", //
            "#.#.#.", //
            ".#.#.#", //
        ]);
        let set_pixels = mask.count_nonzero();
        let blobs = find_blobs(&mut mask).unwrap();
        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs[0].area(), set_pixels);
    }

    #[test]
    fn regions_touching_only_by_a_gap_stay_apart() {
        let mut mask = mask_from_rows(&[
            "##..##", //
            "##..##", //
            "......", //
            "..##..", //
        ]);
        let blobs = find_blobs(&mut mask).unwrap();
        let areas: Vec<usize> = blobs.iter().map(|b| b.area()).collect();
        assert_eq!(areas, vec![4, 4, 2]);
    }

    #[test]
    fn blobs_are_ordered_by_first_raster_pixel() {
        let mut mask = mask_from_rows(&[
            "....#", //
            "....#", //
            "#...#", //
            "#....", //
        ]);
        let blobs = find_blobs(&mut mask).unwrap();
        assert_eq!(blobs.len(), 2);
        assert_eq!(blobs[0].points[0], Point::new(4, 0));
        assert_eq!(blobs[1].points[0], Point::new(0, 2));
    }

    #[test]
    fn concave_shapes_are_filled_completely() {
        let mut mask = mask_from_rows(&[
            "#####", //
            "#...#", //
            "#.#.#", //
            "#.#.#", //
            "###.#", //
        ]);
        let set_pixels = mask.count_nonzero();
        let blobs = find_blobs(&mut mask).unwrap();
        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs[0].area(), set_pixels);
    }

    #[test]
    fn find_blob_at_only_consumes_its_own_region() {
        let mut mask = mask_from_rows(&[
            "##..#", //
            "#...#", //
        ]);
        let blob = find_blob_at(&mut mask, Point::new(1, 0)).unwrap().unwrap();
        assert_eq!(blob.area(), 3);
        assert_eq!(blob.points[0], Point::new(1, 0));
        assert_eq!(mask.count_nonzero(), 2);

        assert!(find_blob_at(&mut mask, Point::new(2, 0)).unwrap().is_none());
        assert!(find_blob_at(&mut mask, Point::new(9, 9)).unwrap().is_none());
    }

    #[test]
    fn color_frames_are_rejected() {
        let mut color = Frame::zeros(4, 4, 3);
        assert!(find_blobs(&mut color).is_err());
    }
}
