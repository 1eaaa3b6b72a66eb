use super::*;
use crate::foundation::core::{BezPath, Point, Rect};

fn canvas() -> Canvas {
    Canvas::new(200, 100).unwrap()
}

#[test]
fn empty_scene_is_just_the_background() {
    let svg = to_svg(&[], canvas(), Rgba8::rgb(5, 5, 5));
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(r#"width="200" height="100""#));
    assert!(svg.contains(r##"fill="#050505" fill-opacity="1.000""##));
    assert!(svg.trim_end().ends_with("</svg>"));
}

#[test]
fn invisible_commands_are_skipped() {
    let cmds = [
        RenderCommand::Dot {
            center: Point::new(10.0, 10.0),
            radius: 0.0,
            color: Rgba8::WHITE,
            opacity: 1.0,
        },
        RenderCommand::Block {
            center: Point::new(10.0, 10.0),
            size: 7.0,
            color: Rgba8::WHITE,
            opacity: 0.0,
        },
    ];
    assert!(!to_svg(&cmds, canvas(), Rgba8::BLACK).contains("<circle"));
    assert!(!to_svg(&cmds, canvas(), Rgba8::BLACK).contains("<g "));
}

#[test]
fn wires_keep_their_dash_pattern() {
    let mut path = BezPath::new();
    path.move_to((0.0, 0.0));
    path.line_to((50.0, 0.0));
    let svg = to_svg(
        &[RenderCommand::Wire {
            path,
            color: Rgba8::rgba(255, 255, 255, 26),
            width: 1.5,
            dash: Some((6.0, 9.0)),
        }],
        canvas(),
        Rgba8::BLACK,
    );
    assert!(svg.contains(r#"stroke-dasharray="6 9""#));
    assert!(svg.contains(r#"<path d="M"#));
}

#[test]
fn glowing_cards_emit_a_halo_and_escaped_titles() {
    let card = |glow| RenderCommand::Card {
        rect: Rect::new(10.0, 10.0, 90.0, 50.0),
        radius: 8.0,
        fill: Rgba8::rgb(12, 12, 12),
        stroke: Rgba8::WHITE,
        glow_color: Rgba8::rgb(0x60, 0xa5, 0xfa),
        glow,
        title: Some("Sound & SFX".to_string()),
    };
    let lit = to_svg(&[card(1.0)], canvas(), Rgba8::BLACK);
    let idle = to_svg(&[card(0.0)], canvas(), Rgba8::BLACK);
    assert_eq!(lit.matches("<path").count(), 2);
    assert_eq!(idle.matches("<path").count(), 1);
    assert!(lit.contains("#60a5fa"));
    assert!(lit.contains("Sound &amp; SFX"));
}
