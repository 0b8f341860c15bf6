// THEORY (Color Space Conversion):
// The `Pixel` module is the most fundamental stage of the detection engine. It
// converts every blue/green/red pixel of a frame into hue/saturation/value, one
// pixel at a time, with no knowledge of neighbors. Anything that needs another
// pixel (masks, morphology, blobs) belongs in later stages.
//
// Channel conventions:
// - value:       the brightest of the three channels (0..255)
// - saturation:  chroma relative to value, rounded to the nearest integer (0..255)
// - hue:         angle on the color wheel computed in degrees [0, 360), then
//                halved and truncated so it fits a byte: [0, 180)
//
// The halving is part of the threshold contract. Color ranges in the detector
// configuration are tuned against the half-degree scale with truncation, so a
// pixel at 359.8 degrees lands on hue 179, never 180.

pub mod pixel {
    use crate::core_modules::frame::Frame;
    use crate::error::Result;

    pub type Channel = u8;
    pub type Hue = u8;
    pub type Saturation = u8;
    pub type Value = u8;

    /// Converts a single BGR pixel into `[hue, saturation, value]`.
    #[inline]
    pub fn hsv_from_bgr(blue: Channel, green: Channel, red: Channel) -> [u8; 3] {
        let maximum_channel = blue.max(green).max(red);
        let minimum_channel = blue.min(green).min(red);
        let chroma = maximum_channel - minimum_channel;

        [
            hue(blue, green, red, maximum_channel, chroma),
            saturation(maximum_channel, chroma),
            maximum_channel,
        ]
    }

    /// Half-degree hue in [0, 180).
    #[inline]
    fn hue(blue: Channel, green: Channel, red: Channel, maximum_channel: u8, chroma: u8) -> Hue {
        if chroma == 0 {
            return 0;
        }

        let chroma = chroma as f64;
        let (base_difference, sector_offset) = if maximum_channel == red {
            (green as f64 - blue as f64, 0.0)
        } else if maximum_channel == green {
            (blue as f64 - red as f64, 2.0)
        } else {
            (red as f64 - green as f64, 4.0)
        };

        // 60 * (offset + difference / chroma), in exactly this order.
        let mut hue_degrees = 60.0 * (sector_offset + base_difference / chroma);
        if hue_degrees < 0.0 {
            hue_degrees += 360.0;
        }

        // Truncation, not rounding.
        (hue_degrees / 2.0) as Hue
    }

    #[inline]
    fn saturation(value: Value, chroma: u8) -> Saturation {
        if chroma == 0 {
            return 0;
        }
        let numerator = chroma as u32 * 255;
        let value = value as u32;
        ((numerator + value / 2) / value) as Saturation
    }

    /// Converts a BGR color frame into an HSV frame of identical dimensions.
    pub fn bgr_to_hsv(bgr: &Frame) -> Result<Frame> {
        bgr.ensure_channels(Frame::COLOR_CHANNELS)?;

        let mut hsv = Frame::zeros(bgr.width(), bgr.height(), Frame::COLOR_CHANNELS);
        for (source, target) in bgr
            .data()
            .chunks_exact(3)
            .zip(hsv.data_mut().chunks_exact_mut(3))
        {
            target.copy_from_slice(&hsv_from_bgr(source[0], source[1], source[2]));
        }

        Ok(hsv)
    }
}

#[cfg(test)]
mod tests {
    use super::pixel::*;
    use crate::core_modules::frame::Frame;
    use crate::error::LogoVisionError;

    #[test]
    fn primary_and_achromatic_colors() {
        assert_eq!(hsv_from_bgr(0, 0, 0), [0, 0, 0]);
        assert_eq!(hsv_from_bgr(255, 255, 255), [0, 0, 255]);
        assert_eq!(hsv_from_bgr(255, 0, 0), [120, 255, 255]);
        assert_eq!(hsv_from_bgr(0, 255, 0), [60, 255, 255]);
        assert_eq!(hsv_from_bgr(0, 0, 255), [0, 255, 255]);
    }

    #[test]
    fn gray_levels_have_no_hue_or_saturation() {
        for level in [1u8, 64, 128, 200] {
            assert_eq!(hsv_from_bgr(level, level, level), [0, 0, level]);
        }
    }

    #[test]
    fn negative_hue_wraps_around() {
        // Red is max and blue exceeds green: (0 - 1/255) * 60 < 0 -> 359.76 degrees.
        assert_eq!(hsv_from_bgr(1, 0, 255), [179, 255, 255]);
        // Magenta sits at 300 degrees.
        assert_eq!(hsv_from_bgr(255, 0, 255), [150, 255, 255]);
    }

    #[test]
    fn hue_is_truncated_not_rounded() {
        // Red max, green 1, blue 0: 60 * 1/255 = 0.235 degrees -> 0.117 -> 0.
        assert_eq!(hsv_from_bgr(0, 1, 255)[0], 0);
        // Red max, green 9, blue 0: 60 * 9/255 = 2.117 degrees -> 1.058 -> 1.
        assert_eq!(hsv_from_bgr(0, 9, 255)[0], 1);
    }

    #[test]
    fn whole_half_degree_hues_are_not_lost() {
        // Red max: 60 * 7/35 = 12 degrees exactly -> 6.
        assert_eq!(hsv_from_bgr(0, 7, 35)[0], 6);
        assert_eq!(hsv_from_bgr(0, 7, 70)[0], 3);
        // Red max: 60 * 5/6 = 50 degrees -> 25.
        assert_eq!(hsv_from_bgr(0, 5, 6)[0], 25);
        assert_eq!(hsv_from_bgr(0, 10, 12)[0], 25);
        // Green max: 60 * (2 - 5/6) computes just below 70 in doubles -> 34.
        assert_eq!(hsv_from_bgr(0, 6, 5)[0], 34);
        assert_eq!(hsv_from_bgr(0, 10, 7)[0], 39);
    }

    #[test]
    fn saturation_is_rounded() {
        // diff = 100, value = 200: 100 * 255 / 200 = 127.5 -> 128.
        assert_eq!(hsv_from_bgr(100, 150, 200)[1], 128);
        // diff = 1, value = 3: 85.0 exactly.
        assert_eq!(hsv_from_bgr(2, 2, 3)[1], 85);
    }

    #[test]
    fn frame_conversion_preserves_dimensions() {
        let data = vec![
            255, 0, 0, // blue
            0, 255, 0, // green
            0, 0, 255, // red
            255, 255, 255, // white
            0, 0, 0, // black
            0, 255, 255, // yellow
        ];
        let bgr = Frame::new(3, 2, 3, data).unwrap();
        let hsv = bgr_to_hsv(&bgr).unwrap();

        assert_eq!(hsv.dimensions(), (3, 2));
        assert_eq!(hsv.pixel(0, 0), &[120, 255, 255]);
        assert_eq!(hsv.pixel(1, 0), &[60, 255, 255]);
        assert_eq!(hsv.pixel(2, 0), &[0, 255, 255]);
        assert_eq!(hsv.pixel(0, 1), &[0, 0, 255]);
        assert_eq!(hsv.pixel(1, 1), &[0, 0, 0]);
        assert_eq!(hsv.pixel(2, 1), &[30, 255, 255]);
    }

    #[test]
    fn mask_input_is_rejected() {
        let mask = Frame::empty_mask(4, 4);
        assert!(matches!(
            bgr_to_hsv(&mask),
            Err(LogoVisionError::ChannelMismatch {
                expected: 3,
                actual: 1
            })
        ));
    }
}
