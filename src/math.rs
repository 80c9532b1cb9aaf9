//! Small numeric helpers shared by the renderer and the world model.
//!
//! Trigonometry goes through `micromath` explicitly so the firmware and the
//! host tests evaluate the same approximations.

use micromath::F32Ext;

/// Reduce `value` into `[0, modulus)`.
///
/// The modulus is added before reducing so a negative intermediate (down to
/// `-modulus`) lands on the right slot. Anything further below is folded with
/// `rem_euclid`.
#[inline]
pub fn wrap_index(value: i32, modulus: i32) -> usize {
    debug_assert!(modulus > 0);
    let mut v = value;
    if v < 0 {
        v += modulus;
    }
    v.rem_euclid(modulus) as usize
}

/// `atan2(y, x)` in `(-π, π]`, with `(0, 0)` defined as `0`.
#[inline]
pub fn atan2(y: f32, x: f32) -> f32 {
    if x == 0.0 && y == 0.0 {
        return 0.0;
    }
    F32Ext::atan2(y, x)
}

#[inline]
pub fn sin(angle: f32) -> f32 {
    F32Ext::sin(angle)
}

#[inline]
pub fn cos(angle: f32) -> f32 {
    F32Ext::cos(angle)
}

#[inline]
pub fn round(value: f32) -> f32 {
    F32Ext::round(value)
}

/// Perceptual correction: `(v / 255)^exponent * 255`.
pub fn gamma(value: u8, exponent: f32) -> u8 {
    match value {
        0 => 0,
        255 => 255,
        v => {
            let normalized = v as f32 / 255.0;
            let corrected = F32Ext::powf(normalized, exponent) * 255.0;
            corrected.clamp(0.0, 255.0) as u8
        }
    }
}

/// Brightness for a value that fades out towards `300`: `300 - v`, clamped
/// to a byte and gamma corrected.
pub fn shade(value: i32, exponent: f32) -> u8 {
    let linear = (crate::config::MAX_DIST - value).clamp(0, 255) as u8;
    gamma(linear, exponent)
}
