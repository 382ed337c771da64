use super::*;

const FONT_PATH: &str = "assets/fonts/DejaVuSansCondensed-Bold.ttf";

#[test]
fn bundled_font_loads_with_family_name() {
    let font = FontAsset::from_path(FONT_PATH).unwrap();
    assert!(font.family().contains("DejaVu"));
    assert!(!font.bytes().is_empty());
}

#[test]
fn garbage_and_missing_fonts_are_asset_errors() {
    let err = FontAsset::from_bytes(vec![0u8; 64]).unwrap_err();
    assert!(err.to_string().starts_with("asset error"));

    let err = FontAsset::from_bytes(Vec::new()).unwrap_err();
    assert!(err.to_string().starts_with("asset error"));

    let err = FontAsset::from_path("assets/fonts/does-not-exist.ttf").unwrap_err();
    assert!(err.to_string().contains("does-not-exist"));
}

#[test]
fn registering_in_a_fresh_context_reports_the_asset_family() {
    let font = FontAsset::from_path(FONT_PATH).unwrap();
    let mut font_ctx = parley::FontContext::default();
    let family = register_family(&mut font_ctx, font.bytes()).unwrap();
    assert_eq!(family, font.family());
}
