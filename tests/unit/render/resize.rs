use std::sync::Arc;

use image::Rgba;

use super::*;
use crate::{
    foundation::core::Bounds,
    raster::{frame::Repeat, palette::Palette},
};

fn palette() -> Arc<Palette> {
    let colors = vec![[0, 0, 0, 0], [220, 20, 20, 255], [20, 20, 220, 255]];
    Arc::new(Palette::new(colors, Some(0)).unwrap())
}

fn solid_frame(bounds: Bounds, index: u8, delay: u16) -> Frame {
    Frame::new(
        0,
        bounds,
        palette(),
        vec![index; bounds.area()],
        delay,
        Disposal::Keep,
    )
    .unwrap()
}

fn three_frames() -> Sequence {
    Sequence::new(
        vec![
            solid_frame(Bounds::canvas(800, 600), 1, 5),
            solid_frame(Bounds::new(100, 100, 200, 100), 2, 7),
            solid_frame(Bounds::new(400, 300, 400, 300), 0, 9),
        ],
        CanvasConfig::new(800, 600),
        Repeat::Infinite,
    )
    .unwrap()
}

fn pool() -> rayon::ThreadPool {
    rayon::ThreadPoolBuilder::new()
        .num_threads(3)
        .build()
        .unwrap()
}

#[test]
fn scale_factor_picks_the_longer_side() {
    assert_eq!(scale_factor(400, 300, 600).unwrap(), 1.0);
    assert_eq!(scale_factor(600, 600, 600).unwrap(), 1.0);
    assert_eq!(scale_factor(800, 600, 600).unwrap(), 0.75);
    assert_eq!(scale_factor(1200, 1200, 600).unwrap(), 0.5);
    // the height branch divides by the height
    let tall = scale_factor(300, 900, 600).unwrap();
    assert!((tall - 600.0 / 900.0).abs() < 1e-12);
    assert!(scale_factor(10, 10, 0).is_err());
}

#[test]
fn still_within_bounds_is_untouched() {
    let img = RgbaImage::from_fn(400, 300, |x, y| Rgba([x as u8, y as u8, 3, 255]));
    assert_eq!(resize_still(&img, 600).unwrap(), img);
}

#[test]
fn wide_still_lands_exactly_on_max() {
    for (w, h) in [(601, 400), (1000, 999), (1920, 1080), (777, 777)] {
        let img = RgbaImage::from_pixel(w, h, Rgba([1, 2, 3, 255]));
        let out = resize_still(&img, 600).unwrap();
        assert_eq!(out.width(), 600);
        let expected_h = f64::from(h) * 600.0 / f64::from(w);
        assert!((f64::from(out.height()) - expected_h).abs() <= 1.0);
    }
}

#[test]
fn tall_still_scales_by_height() {
    let img = RgbaImage::from_pixel(300, 900, Rgba([1, 2, 3, 255]));
    assert_eq!(resize_still(&img, 600).unwrap().dimensions(), (200, 600));
}

#[test]
fn standard_reduction_scales_each_frame_rect() {
    let pool = pool();
    let seq = three_frames();
    let out = StandardReducer::new(&pool).reduce(&seq, 600).unwrap();
    assert_eq!((out.config.width, out.config.height), (600, 450));
    assert_eq!(out.delays(), vec![5, 7, 9]);
    assert_eq!(out.frames[1].bounds, Bounds::new(75, 75, 150, 75));
    assert_eq!(out.frames[2].bounds, Bounds::new(300, 225, 300, 225));
    assert_eq!(out.frames[1].pixels.len(), 150 * 75);
    assert!(out.frames[1].pixels.iter().all(|&i| i == 2));
    assert!(out.check_order().is_ok());
}

#[test]
fn serial_reduction_emits_full_canvas_composites() {
    let out = SerialReducer.reduce(&three_frames(), 600).unwrap();
    assert_eq!((out.config.width, out.config.height), (600, 450));
    assert_eq!(out.len(), 3);
    assert_eq!(out.delays(), vec![5, 7, 9]);
    for f in &out.frames {
        assert_eq!(f.bounds, Bounds::canvas(600, 450));
        assert_eq!(f.disposal, Disposal::Background);
    }
    // frame 1 composites its blue patch over frame 0's red
    let f1 = &out.frames[1];
    assert_eq!(f1.pixels[0], 1);
    assert_eq!(f1.pixels[100 * 600 + 150], 2);
    // frame 2 is fully transparent, so the composite still shows the blue patch
    assert_eq!(out.frames[2].pixels[100 * 600 + 150], 2);
}

#[test]
fn both_modes_agree_on_count_and_delays() {
    let pool = pool();
    let seq = three_frames();
    let a = StandardReducer::new(&pool).reduce(&seq, 600).unwrap();
    let b = SerialReducer.reduce(&seq, 600).unwrap();
    assert_eq!(a.len(), b.len());
    assert_eq!(a.delays(), b.delays());
    assert_eq!(a.config, b.config);
}

#[test]
fn identity_factor_returns_input() {
    let pool = pool();
    let seq = three_frames();
    assert_eq!(StandardReducer::new(&pool).reduce(&seq, 800).unwrap(), seq);
    assert_eq!(SerialReducer.reduce(&seq, 900).unwrap(), seq);
}

#[test]
fn degenerate_frame_passes_through() {
    let pool = pool();
    let seq = Sequence::new(
        vec![
            solid_frame(Bounds::canvas(800, 600), 1, 1),
            solid_frame(Bounds::canvas(1, 1), 2, 1),
        ],
        CanvasConfig::new(800, 600),
        Repeat::Infinite,
    )
    .unwrap();
    let out = StandardReducer::new(&pool).reduce(&seq, 600).unwrap();
    assert_eq!(out.frames[1], seq.frames[1]);
    assert_eq!(out.frames[0].bounds, Bounds::canvas(600, 450));
}
