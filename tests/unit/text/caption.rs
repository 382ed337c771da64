use super::*;

fn font() -> FontAsset {
    FontAsset::from_path("assets/fonts/DejaVuSansCondensed-Bold.ttf").unwrap()
}

#[test]
fn normalize_uppercases_and_drops_blank() {
    assert_eq!(
        normalize_caption(Some(" hello world ")),
        Some("HELLO WORLD".to_string())
    );
    assert_eq!(normalize_caption(Some("   ")), None);
    assert_eq!(normalize_caption(None), None);
}

#[test]
fn target_box_uses_banner_divisors() {
    assert_eq!(Banner::Top.target_box(400, 300), (364.0, 60.0));
    assert_eq!(Banner::Bottom.target_box(400, 300), (364.0, 80.0));
}

#[test]
fn short_caption_in_roomy_box_gets_max_size() {
    let mut e = TextLayoutEngine::new(&font()).unwrap();
    let fit = fit_font_size(&mut e, "HI", 600.0, 400.0).unwrap();
    assert_eq!(fit.size, MAX_FONT_SIZE);

    let empty = fit_font_size(&mut e, "", 600.0, 400.0).unwrap();
    assert_eq!(empty.size, MAX_FONT_SIZE);
}

#[test]
fn long_caption_picks_largest_fitting_size() {
    let mut e = TextLayoutEngine::new(&font()).unwrap();
    let text = "WHEN YOU FINALLY GET THE BUILD TO PASS ON THE FIRST TRY";
    let (w, h) = (364.0, 80.0);
    let fit = fit_font_size(&mut e, text, w, h).unwrap();
    assert!(fit.size < MAX_FONT_SIZE);
    assert!(fit.size >= MIN_FONT_SIZE);
    assert!(fit.metrics.line_count > 1);

    if fit.size > MIN_FONT_SIZE {
        assert!(fit.metrics.fits(w, h, LEADING));
        for bigger in (fit.size as u32 + 1)..=(MAX_FONT_SIZE as u32) {
            let (_, m) = e.measure(text, bigger as f32, Some(w)).unwrap();
            assert!(!m.fits(w, h, LEADING), "size {bigger} also fits");
        }
    }
}

#[test]
fn overflowing_caption_stops_at_floor() {
    let mut e = TextLayoutEngine::new(&font()).unwrap();
    let text = "THIS CAPTION IS FAR TOO LONG TO EVER FIT INSIDE SUCH A TINY BOX";
    let fit = fit_font_size(&mut e, text, 60.0, 10.0).unwrap();
    assert_eq!(fit.size, MIN_FONT_SIZE);
    assert_eq!(fit.size, 21.0);
}

#[test]
fn search_never_settles_below_floor() {
    let mut e = TextLayoutEngine::new(&font()).unwrap();
    for (w, h) in [(1.0, 1.0), (40.0, 5.0), (120.0, 20.0)] {
        let fit = fit_font_size(&mut e, "A WORD THAT WILL NOT FIT", w, h).unwrap();
        assert!(fit.size >= 21.0, "settled on {}", fit.size);
    }
}

#[test]
fn empty_captions_produce_empty_layer() {
    let layer = CaptionLayer::render(&font(), None, Some("  "), 400, 300).unwrap();
    assert!(layer.is_empty());
    assert!(layer.surface().is_none());
}

#[test]
fn top_caption_is_outlined_and_centered_near_top() {
    let layer = CaptionLayer::render(&font(), Some("hello"), None, 400, 300).unwrap();
    let surface = layer.surface().unwrap();
    assert_eq!((surface.width(), surface.height()), (400, 300));
    assert!(layer.top_size().is_some());
    assert!(layer.bottom_size().is_none());

    let (mut min_x, mut max_x, mut max_y) = (u32::MAX, 0u32, 0u32);
    let (mut white, mut black) = (false, false);
    for y in 0..300 {
        for x in 0..400 {
            let p = surface.pixel(x, y);
            if p[3] == 0 {
                continue;
            }
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
            if p[3] == 255 && p[0] > 240 && p[1] > 240 && p[2] > 240 {
                white = true;
            }
            if p[3] == 255 && p[0] < 15 && p[1] < 15 && p[2] < 15 {
                black = true;
            }
        }
    }
    assert!(white && black);
    assert!(max_y < 120, "caption reaches row {max_y}");
    let center = (min_x + max_x) / 2;
    assert!(center.abs_diff(200) <= 10, "caption centered at {center}");
}

#[test]
fn bottom_caption_hugs_bottom_margin() {
    let layer = CaptionLayer::render(&font(), None, Some("bottom text"), 400, 300).unwrap();
    let surface = layer.surface().unwrap();
    let mut min_y = u32::MAX;
    for y in 0..300 {
        for x in 0..400 {
            if surface.pixel(x, y)[3] != 0 {
                min_y = min_y.min(y);
            }
        }
    }
    assert!(min_y > 150, "caption starts at row {min_y}");
}

#[test]
fn apply_offsets_layer_by_frame_origin() {
    let layer = CaptionLayer::render(&font(), Some("hello"), None, 400, 300).unwrap();
    let full = layer.surface().unwrap().clone();
    let mut window = Surface::new(100, 50);
    layer.apply(&mut window, 150, 20);
    for y in 0..50 {
        for x in 0..100 {
            assert_eq!(window.pixel(x, y), full.pixel(x + 150, y + 20));
        }
    }
}
