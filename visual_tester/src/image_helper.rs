use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use logo_vision::{Frame, Logo, PipelineObserver};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

const LOGO_OUTLINE: Rgb<u8> = Rgb([0, 255, 0]);

/// Writes a frame as PNG: masks as 8-bit gray, color frames as RGB.
pub fn save_frame(path: &Path, frame: &Frame) -> Result<(), image::error::ImageError> {
    let output = BufWriter::new(File::create(path)?);
    let encoder = image::codecs::png::PngEncoder::new(output);

    if frame.channels() == Frame::MASK_CHANNELS {
        encoder.write_image(
            frame.data(),
            frame.width(),
            frame.height(),
            ExtendedColorType::L8,
        )?;
    } else {
        let rgb = frame.to_rgb_image();
        encoder.write_image(
            rgb.as_raw(),
            frame.width(),
            frame.height(),
            ExtendedColorType::Rgb8,
        )?;
    }

    Ok(())
}

/// Outlines every logo in green, one pixel wide.
pub fn draw_logos(image: &mut RgbImage, logos: &[Logo]) {
    for logo in logos {
        if logo.width == 0 || logo.height == 0 {
            continue;
        }
        let rect = Rect::at(logo.x as i32, logo.y as i32).of_size(logo.width, logo.height);
        draw_hollow_rect_mut(image, rect, LOGO_OUTLINE);
    }
}

/// Saves every intermediate stage as `<stem>_<stage>.png` in `directory`.
pub struct DumpObserver {
    directory: PathBuf,
    stem: String,
}

impl DumpObserver {
    pub fn new(directory: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            stem: stem.into(),
        }
    }

    pub fn stage_path(&self, stage: &str) -> PathBuf {
        self.directory.join(format!("{}_{stage}.png", self.stem))
    }
}

impl PipelineObserver for DumpObserver {
    fn on_intermediate_result(&self, stage: &str, image: &Frame) {
        let path = self.stage_path(stage);
        match save_frame(&path, image) {
            Ok(()) => tracing::debug!(path = %path.display(), "saved stage"),
            Err(error) => tracing::warn!(path = %path.display(), %error, "could not save stage"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn saves_mask_and_color_frames() {
        let dir = tempdir().unwrap();

        let mut mask = Frame::empty_mask(40, 30);
        mask.fill_rect(5, 5, 10, 10, &[Frame::MASK_SET]);
        let mask_path = dir.path().join("mask.png");
        save_frame(&mask_path, &mask).unwrap();
        let decoded = image::open(&mask_path).unwrap().to_luma8();
        assert_eq!(decoded.dimensions(), (40, 30));
        assert_eq!(decoded.get_pixel(6, 6).0, [255]);
        assert_eq!(decoded.get_pixel(0, 0).0, [0]);

        let mut color = Frame::zeros(20, 10, 3);
        color.fill_rect(0, 0, 20, 10, &[255, 0, 0]);
        let color_path = dir.path().join("color.png");
        save_frame(&color_path, &color).unwrap();
        let decoded = image::open(&color_path).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (20, 10));
        assert_eq!(decoded.get_pixel(3, 3).0, [0, 0, 255]);
    }

    #[test]
    fn outlines_logo_rectangles() {
        let mut image = RgbImage::new(30, 30);
        draw_logos(&mut image, &[Logo::new(5, 5, 10, 8)]);
        assert_eq!(*image.get_pixel(5, 5), LOGO_OUTLINE);
        assert_eq!(*image.get_pixel(14, 12), LOGO_OUTLINE);
        assert_eq!(*image.get_pixel(9, 9), Rgb([0, 0, 0]));
        assert_eq!(*image.get_pixel(15, 13), Rgb([0, 0, 0]));
    }

    #[test]
    fn dump_observer_names_files_after_stage() {
        let dir = tempdir().unwrap();
        let observer = DumpObserver::new(dir.path(), "can");
        observer.on_intermediate_result("red_mask", &Frame::empty_mask(4, 4));
        assert!(dir.path().join("can_red_mask.png").exists());
    }
}
