#![allow(dead_code)]

use logo_vision::Frame;

pub const BLUE_BGR: [u8; 3] = [255, 0, 0];
pub const RED_BGR: [u8; 3] = [0, 0, 255];

pub const WIDTH: u32 = 160;
pub const HEIGHT: u32 = 160;

/// Paints a logo: a 38x22 red block (40x24 after the red opening) with a
/// 40x10 blue bar `gap` rows below it. Both shapes sit inside the default
/// area and Hu ranges.
pub fn paint_logo(frame: &mut Frame, x: u32, y: u32, gap: u32) {
    frame.fill_rect(x, y, 38, 22, &RED_BGR);
    frame.fill_rect(x, y + 22 + gap, 40, 10, &BLUE_BGR);
}

pub fn blank_frame() -> Frame {
    Frame::zeros(WIDTH, HEIGHT, 3)
}
