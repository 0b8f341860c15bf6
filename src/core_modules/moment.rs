// THEORY:
// The `moment` module is the shape-analysis layer of the vision engine. It
// reduces a blob, an unordered set of pixel coordinates, to a handful of
// numbers that describe its shape independently of where the blob sits, how
// large it is, and how it is rotated.
//
// The computation is a ladder, each rung more invariant than the last:
// 1.  **Spatial moments** `m_pq = sum(x^p * y^q)` for `p + q <= 3`. `m00` is the
//     area. Accumulated in 128-bit integers so large blobs far from the origin
//     cannot overflow.
// 2.  **Centroid** `(m10 / m00, m01 / m00)`. Undefined for an empty blob, which
//     is why every step from here on returns `Option`.
// 3.  **Central moments** `mu_pq = sum((x - cx)^p * (y - cy)^q)` for
//     `p + q` in {2, 3}: translation invariant.
// 4.  **Normalized moments** `nu_pq = mu_pq / m00^(1 + (p + q) / 2)`, where the
//     exponent uses integer division. Second and third order moments therefore
//     share the `m00^2` denominator. The blob shape thresholds in the detector
//     configuration are tuned against exactly this convention.
// 5.  **Hu moments**: the seven classic polynomial combinations of normalized
//     moments, invariant to rotation. The seventh one changes sign under
//     reflection, which tells mirror images apart.

use crate::core_modules::smart_blob::{Blob, Point};

pub type SpatialMoment = i128;
pub type CentralMoment = f64;
pub type NormalizedMoment = f64;
pub type HuMoment = f64;

pub const HU_MOMENTS_COUNT: usize = 7;

pub type HuMoments = [HuMoment; HU_MOMENTS_COUNT];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpatialMoments {
    pub m00: SpatialMoment,
    pub m10: SpatialMoment,
    pub m01: SpatialMoment,
    pub m20: SpatialMoment,
    pub m11: SpatialMoment,
    pub m02: SpatialMoment,
    pub m30: SpatialMoment,
    pub m21: SpatialMoment,
    pub m12: SpatialMoment,
    pub m03: SpatialMoment,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Centroid {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CentralMoments {
    pub mu20: CentralMoment,
    pub mu11: CentralMoment,
    pub mu02: CentralMoment,
    pub mu30: CentralMoment,
    pub mu21: CentralMoment,
    pub mu12: CentralMoment,
    pub mu03: CentralMoment,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormalizedMoments {
    pub nu20: NormalizedMoment,
    pub nu11: NormalizedMoment,
    pub nu02: NormalizedMoment,
    pub nu30: NormalizedMoment,
    pub nu21: NormalizedMoment,
    pub nu12: NormalizedMoment,
    pub nu03: NormalizedMoment,
}

/// Every moment of a blob, from raw sums to Hu invariants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    pub spatial: SpatialMoments,
    pub centroid: Centroid,
    pub central: CentralMoments,
    pub normalized: NormalizedMoments,
    pub hu: HuMoments,
}

impl SpatialMoments {
    pub fn from_points(points: &[Point]) -> Self {
        let mut moments = SpatialMoments::default();
        for point in points {
            let x = point.x as SpatialMoment;
            let y = point.y as SpatialMoment;
            let (xx, yy) = (x * x, y * y);

            moments.m00 += 1;
            moments.m10 += x;
            moments.m01 += y;
            moments.m20 += xx;
            moments.m11 += x * y;
            moments.m02 += yy;
            moments.m30 += xx * x;
            moments.m21 += xx * y;
            moments.m12 += x * yy;
            moments.m03 += yy * y;
        }
        moments
    }

    /// Area of the blob in pixels.
    pub fn area(&self) -> SpatialMoment {
        self.m00
    }

    /// `None` when `m00` is zero.
    pub fn centroid(&self) -> Option<Centroid> {
        if self.m00 <= 0 {
            return None;
        }
        let m00 = self.m00 as f64;
        Some(Centroid {
            x: self.m10 as f64 / m00,
            y: self.m01 as f64 / m00,
        })
    }
}

impl CentralMoments {
    pub fn from_points(points: &[Point], centroid: Centroid) -> Self {
        let mut moments = CentralMoments::default();
        for point in points {
            let dx = point.x as f64 - centroid.x;
            let dy = point.y as f64 - centroid.y;
            let (dxx, dyy) = (dx * dx, dy * dy);

            moments.mu20 += dxx;
            moments.mu11 += dx * dy;
            moments.mu02 += dyy;
            moments.mu30 += dxx * dx;
            moments.mu21 += dxx * dy;
            moments.mu12 += dx * dyy;
            moments.mu03 += dyy * dy;
        }
        moments
    }
}

#[inline]
fn normalize(mu: CentralMoment, p: i32, q: i32, m00: f64) -> NormalizedMoment {
    mu / m00.powi(1 + (p + q) / 2)
}

impl NormalizedMoments {
    /// `None` when `m00` is zero.
    pub fn from_central(central: &CentralMoments, m00: SpatialMoment) -> Option<Self> {
        if m00 <= 0 {
            return None;
        }
        let m00 = m00 as f64;
        Some(NormalizedMoments {
            nu20: normalize(central.mu20, 2, 0, m00),
            nu11: normalize(central.mu11, 1, 1, m00),
            nu02: normalize(central.mu02, 0, 2, m00),
            nu30: normalize(central.mu30, 3, 0, m00),
            nu21: normalize(central.mu21, 2, 1, m00),
            nu12: normalize(central.mu12, 1, 2, m00),
            nu03: normalize(central.mu03, 0, 3, m00),
        })
    }

    /// The seven Hu invariants.
    pub fn hu_moments(&self) -> HuMoments {
        let NormalizedMoments {
            nu20,
            nu11,
            nu02,
            nu30,
            nu21,
            nu12,
            nu03,
        } = *self;

        let sqr = |v: f64| v * v;
        let s = nu30 + nu12;
        let t = nu21 + nu03;
        let u = nu30 - 3.0 * nu12;
        let v = 3.0 * nu21 - nu03;

        [
            nu20 + nu02,
            sqr(nu20 - nu02) + 4.0 * sqr(nu11),
            sqr(u) + sqr(v),
            sqr(s) + sqr(t),
            u * s * (sqr(s) - 3.0 * sqr(t)) + v * t * (3.0 * sqr(s) - sqr(t)),
            (nu20 - nu02) * (sqr(s) - sqr(t)) + 4.0 * nu11 * s * t,
            v * s * (sqr(s) - 3.0 * sqr(t)) - u * t * (3.0 * sqr(s) - sqr(t)),
        ]
    }
}

impl Moments {
    /// Runs the full ladder. `None` for an empty blob.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let spatial = SpatialMoments::from_points(points);
        let centroid = spatial.centroid()?;
        let central = CentralMoments::from_points(points, centroid);
        let normalized = NormalizedMoments::from_central(&central, spatial.m00)?;
        let hu = normalized.hu_moments();

        Some(Moments {
            spatial,
            centroid,
            central,
            normalized,
            hu,
        })
    }

    pub fn from_blob(blob: &Blob) -> Option<Self> {
        Self::from_points(&blob.points)
    }
}

/// Hu invariants of a blob, `None` if it is empty.
pub fn blob_hu_moments(blob: &Blob) -> Option<HuMoments> {
    Moments::from_blob(blob).map(|moments| moments.hu)
}
