//! Lowering of [`RenderCommand`]s into a standalone SVG document.

use std::fmt::Write as _;

use kurbo::Shape;

use crate::foundation::color::Rgba8;
use crate::foundation::core::Canvas;
use crate::render::command::RenderCommand;

// Curve flattening tolerance for rounded rectangles.
const TOLERANCE: f64 = 0.1;

/// Serialize `commands` over a solid `background` into an SVG document sized to `canvas`.
pub fn to_svg(commands: &[RenderCommand], canvas: Canvas, background: Rgba8) -> String {
    let mut out = String::with_capacity(256 + commands.len() * 160);
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = canvas.width,
        h = canvas.height,
    );
    let _ = writeln!(
        out,
        r#"<rect width="100%" height="100%" {}/>"#,
        paint("fill", background, 1.0)
    );
    for cmd in commands {
        if cmd.is_invisible() {
            continue;
        }
        write_command(&mut out, cmd);
    }
    out.push_str("</svg>\n");
    out
}

fn write_command(out: &mut String, cmd: &RenderCommand) {
    match cmd {
        RenderCommand::Wire {
            path,
            color,
            width,
            dash,
        } => {
            let dash = dash
                .map(|(on, off)| format!(r#" stroke-dasharray="{on} {off}""#))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                r#"<path d="{}" fill="none" {} stroke-width="{width}"{dash}/>"#,
                path.to_svg(),
                paint("stroke", *color, 1.0),
            );
        }
        RenderCommand::Card {
            rect,
            radius,
            fill,
            stroke,
            glow_color,
            glow,
            title,
        } => {
            let shape = kurbo::RoundedRect::from_rect(*rect, *radius).to_path(TOLERANCE);
            let d = shape.to_svg();
            if *glow > 0.0 {
                let _ = writeln!(
                    out,
                    r#"<path d="{d}" fill="none" {} stroke-width="{:.2}"/>"#,
                    paint("stroke", *glow_color, 0.35 * glow),
                    2.0 + 10.0 * glow,
                );
            }
            let _ = writeln!(
                out,
                r#"<path d="{d}" {} {} stroke-width="1"/>"#,
                paint("fill", *fill, 1.0),
                paint("stroke", *stroke, 1.0),
            );
            if let Some(title) = title {
                let c = rect.center();
                let _ = writeln!(
                    out,
                    r##"<text x="{:.2}" y="{:.2}" text-anchor="middle" font-family="sans-serif" font-size="12" font-weight="700" fill="#ffffff" fill-opacity="0.5">{}</text>"##,
                    c.x,
                    c.y + 4.0,
                    escape(title),
                );
            }
        }
        RenderCommand::Dot {
            center,
            radius,
            color,
            opacity,
        } => {
            let _ = writeln!(
                out,
                r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" {}/>"#,
                center.x,
                center.y,
                radius * 2.4,
                paint("fill", *color, 0.3 * opacity),
            );
            let _ = writeln!(
                out,
                r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" {}/>"#,
                center.x,
                center.y,
                radius,
                paint("fill", *color, *opacity),
            );
        }
        RenderCommand::Block {
            center,
            size,
            color,
            opacity,
        } => {
            let halo = size * 12.0 / 7.0;
            let _ = writeln!(
                out,
                r#"<g opacity="{:.3}"><rect x="{:.2}" y="{:.2}" width="{halo:.2}" height="{halo:.2}" rx="2.5" fill="rgb(140,200,255)" fill-opacity="0.08"/><rect x="{:.2}" y="{:.2}" width="{size:.2}" height="{size:.2}" rx="1.6" {}/></g>"#,
                opacity.clamp(0.0, 1.0),
                center.x - halo / 2.0,
                center.y - halo / 2.0,
                center.x - size / 2.0,
                center.y - size / 2.0,
                paint("fill", *color, 1.0),
            );
        }
    }
}

fn paint(attr: &str, color: Rgba8, opacity: f64) -> String {
    let alpha = (color.alpha_f64() * opacity).clamp(0.0, 1.0);
    format!(
        r#"{attr}="{}" {attr}-opacity="{alpha:.3}""#,
        color.to_hex_rgb()
    )
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
