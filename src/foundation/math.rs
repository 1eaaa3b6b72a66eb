pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Opacity ramp for a marker that has travelled `dist` along a path of `length`.
///
/// The product of a fade-in over the first `fade_in` units and a fade-out over the last
/// `fade_out` units, clamped to `[0, 1]`. Past the path end the result is 0.
pub fn fade_ramp(dist: f64, length: f64, fade_in: f64, fade_out: f64) -> f64 {
    fn ramp(v: f64, span: f64) -> f64 {
        if span <= 0.0 {
            return if v >= 0.0 { 1.0 } else { 0.0 };
        }
        (v / span).min(1.0)
    }

    (ramp(dist, fade_in) * ramp(length - dist, fade_out)).clamp(0.0, 1.0)
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Convert premultiplied RGBA8 pixels to straight alpha in place.
pub(crate) fn demultiply_rgba8(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            let v = (u16::from(*c) * 255 + a / 2) / a;
            *c = v.min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
