use image::{Rgba, RgbaImage};

use super::*;

fn solid(w: u32, h: u32, px: PremulRgba8) -> Surface {
    let mut data = Vec::with_capacity(w as usize * h as usize * 4);
    for _ in 0..(w * h) {
        data.extend_from_slice(&px);
    }
    Surface::from_premul(w, h, data).unwrap()
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    assert_eq!(over(dst, [0, 0, 0, 0]), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src), src);
}

#[test]
fn over_dst_transparent_returns_src() {
    let src = [100, 110, 120, 200];
    assert_eq!(over([0, 0, 0, 0], src), src);
}

#[test]
fn from_premul_rejects_bad_length() {
    assert!(Surface::from_premul(2, 2, vec![0; 15]).is_err());
}

#[test]
fn draw_over_clips_negative_and_overflowing_origins() {
    let mut dst = solid(4, 4, [0, 0, 0, 255]);
    let src = solid(3, 3, [255, 255, 255, 255]);

    dst.draw_over(&src, -2, 2);
    assert_eq!(dst.pixel(0, 2), [255, 255, 255, 255]);
    assert_eq!(dst.pixel(1, 2), [0, 0, 0, 255]);
    assert_eq!(dst.pixel(0, 1), [0, 0, 0, 255]);

    dst.draw_over(&src, 10, 10);
    assert_eq!(dst.pixel(3, 3), [0, 0, 0, 255]);
}

#[test]
fn crop_copies_window_and_checks_bounds() {
    let img = RgbaImage::from_fn(4, 4, |x, y| Rgba([x as u8, y as u8, 0, 255]));
    let s = Surface::from_rgba_image(&img);
    let c = s.crop(Bounds::new(1, 2, 2, 2)).unwrap();
    assert_eq!(c.width(), 2);
    assert_eq!(c.pixel(0, 0), [1, 2, 0, 255]);
    assert_eq!(c.pixel(1, 1), [2, 3, 0, 255]);

    assert!(s.crop(Bounds::new(3, 3, 2, 1)).is_err());
}

#[test]
fn resize_changes_dimensions_and_keeps_solid_color() {
    let s = solid(8, 6, [40, 80, 120, 255]);
    let r = s.resize(4, 3).unwrap();
    assert_eq!((r.width(), r.height()), (4, 3));
    assert_eq!(r.pixel(2, 1), [40, 80, 120, 255]);
    assert!(s.resize(0, 3).is_err());
}

#[test]
fn rgba_image_roundtrip_for_opaque_pixels() {
    let img = RgbaImage::from_fn(3, 2, |x, y| Rgba([x as u8 * 50, y as u8 * 90, 7, 255]));
    assert_eq!(Surface::from_rgba_image(&img).to_rgba_image(), img);
}
