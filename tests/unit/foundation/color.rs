use super::*;
use serde_json::json;

#[test]
fn parses_hex_rgb_and_rgba() {
    let c: Rgba8 = serde_json::from_value(json!("#60a5fa")).unwrap();
    assert_eq!(c, Rgba8::rgb(0x60, 0xa5, 0xfa));

    let c: Rgba8 = serde_json::from_value(json!("#0000ff80")).unwrap();
    assert_eq!(c, Rgba8::rgba(0, 0, 255, 128));
}

#[test]
fn parses_css_functions() {
    let c: Rgba8 = "rgba(255,255,255,0.5)".parse().unwrap();
    assert_eq!(c, Rgba8::rgba(255, 255, 255, 128));

    let c: Rgba8 = "rgb(248, 113, 113)".parse().unwrap();
    assert_eq!(c, Rgba8::rgb(248, 113, 113));
}

#[test]
fn parses_rgba_object_and_array() {
    let c: Rgba8 = serde_json::from_value(json!({"r": 1.0, "g": 0.0, "b": 0.0})).unwrap();
    assert_eq!(c, Rgba8::rgb(255, 0, 0));

    let c: Rgba8 = serde_json::from_value(json!([0.0, 0.0, 1.0, 0.5])).unwrap();
    assert_eq!(c, Rgba8::rgba(0, 0, 255, 128));
}

#[test]
fn rejects_malformed_strings() {
    assert!("#12345".parse::<Rgba8>().is_err());
    assert!("rgba(1,2)".parse::<Rgba8>().is_err());
    assert!(serde_json::from_value::<Rgba8>(json!([1.0, 2.0])).is_err());
}

#[test]
fn serializes_as_hex_with_alpha() {
    let v = serde_json::to_value(Rgba8::rgba(1, 2, 3, 4)).unwrap();
    assert_eq!(v, json!("#01020304"));
}

#[test]
fn lerp_hits_endpoints() {
    let a = Rgba8::BLACK;
    let b = Rgba8::WHITE;
    assert_eq!(a.lerp(b, 0.0), a);
    assert_eq!(a.lerp(b, 1.0), b);
    assert_eq!(a.lerp(b, 0.5), Rgba8::rgb(128, 128, 128));
}

#[test]
fn premul_scales_channels() {
    assert_eq!(Rgba8::rgba(255, 128, 0, 128).to_premul(), [128, 64, 0, 128]);
}
