use std::sync::Arc;

use image::{Rgba, RgbaImage};

use super::*;
use crate::{
    codec::{Decoded, decode},
    foundation::core::Bounds,
    raster::{
        frame::{CanvasConfig, Frame},
        palette::Palette,
    },
};

fn two_frame_sequence() -> Sequence {
    let palette = Arc::new(
        Palette::new(
            vec![[0, 0, 0, 0], [255, 0, 0, 255], [0, 0, 255, 255]],
            Some(0),
        )
        .unwrap(),
    );
    let f0 = Frame::new(
        0,
        Bounds::canvas(3, 2),
        palette.clone(),
        vec![1, 1, 1, 2, 2, 2],
        4,
        Disposal::Keep,
    )
    .unwrap();
    let f1 = Frame::new(
        1,
        Bounds::new(1, 1, 2, 1),
        palette,
        vec![2, 0],
        9,
        Disposal::Background,
    )
    .unwrap();
    Sequence::new(vec![f0, f1], CanvasConfig::new(3, 2), Repeat::Infinite).unwrap()
}

#[test]
fn still_encodes_as_png() {
    let img = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255]));
    let rendered = Rendered::Still(img.clone());
    assert_eq!(rendered.extension(), "png");
    let bytes = rendered.encode().unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
    let Decoded::Still(s) = decode(&bytes).unwrap() else {
        panic!("expected still");
    };
    assert_eq!(s.image, img);
}

#[test]
fn sequence_encodes_as_gif_with_frame_metadata() {
    let seq = two_frame_sequence();
    let rendered = Rendered::Sequence(seq.clone());
    assert_eq!(rendered.extension(), "gif");
    assert_eq!(rendered.frame_count(), 2);

    let Decoded::Sequence(back) = decode(&rendered.encode().unwrap()).unwrap() else {
        panic!("expected sequence");
    };
    assert_eq!(back.config, seq.config);
    assert_eq!(back.delays(), vec![4, 9]);
    assert_eq!(back.repeat, Repeat::Infinite);
    assert_eq!(back.frames[1].bounds, Bounds::new(1, 1, 2, 1));
    assert_eq!(back.frames[1].disposal, Disposal::Background);
    assert_eq!(back.frames[0].pixels, seq.frames[0].pixels);
    assert_eq!(back.frames[0].palette.color(2), [0, 0, 255, 255]);
}

#[test]
fn oversized_canvas_is_an_encode_error() {
    let mut seq = two_frame_sequence();
    seq.config = CanvasConfig::new(70_000, 2);
    let err = Rendered::Sequence(seq).encode().unwrap_err();
    assert!(err.to_string().starts_with("encode error"));
}
