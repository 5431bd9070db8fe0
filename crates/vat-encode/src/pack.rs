//! Fixed-point vector packing into a single float channel.
//!
//! A texel channel is 32 bits wide. Instead of storing a number there, the
//! packers write unsigned fixed-point lanes into a `u32` and reinterpret that
//! word as an `f32` with [`f32::from_bits`]. No numeric conversion happens, so
//! the value only means something to a shader that does the reverse
//! (`floatBitsToUint` / `asuint`).
//!
//! # Layout
//!
//! Lane 0 occupies the least significant bits. When the float is serialized
//! little-endian (as OpenEXR does), byte 0 holds the low 8 bits of lane 0.
//!
//! - [`pack3`]: `x:10 | y:10 << 10 | z:10 << 20`, top 2 bits zero
//! - [`pack2`]: `x:16 | y:16 << 16`
//!
//! Components are clamped to `[-1, 1]`, remapped to `[0, 1]`, then rounded to
//! the nearest lane step. Out-of-range input is not an error.
//!
//! With the top two bits clear, a [`pack3`] word never has an all-ones
//! exponent, so the carrier float is always finite.

use glam::{Vec2, Vec3};

/// Largest value of a 10-bit lane.
pub const LANE10_MAX: u32 = 0x3FF;

/// Largest value of a 16-bit lane.
pub const LANE16_MAX: u32 = 0xFFFF;

const LANE10_SCALE: f32 = 1023.0;
const LANE16_SCALE: f32 = 65535.0;

/// Quantize one signed component into an unsigned lane of `scale + 1` steps.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn quantize(component: f32, scale: f32) -> u32 {
    let unorm = component.clamp(-1.0, 1.0) * 0.5 + 0.5;
    // NaN survives the clamp and casts to 0.
    (unorm * scale).round() as u32
}

#[allow(clippy::cast_precision_loss)]
fn dequantize(lane: u32, scale: f32) -> f32 {
    (lane as f32 / scale) * 2.0 - 1.0
}

/// Pack a vector with components in `[-1, 1]` into a 10/10/10 bit word.
#[must_use]
pub fn pack3_bits(v: Vec3) -> u32 {
    let x = quantize(v.x, LANE10_SCALE) & LANE10_MAX;
    let y = quantize(v.y, LANE10_SCALE) & LANE10_MAX;
    let z = quantize(v.z, LANE10_SCALE) & LANE10_MAX;
    x | (y << 10) | (z << 20)
}

/// Pack a vector into a 10/10/10 bit word carried by an `f32`.
#[must_use]
pub fn pack3(v: Vec3) -> f32 {
    f32::from_bits(pack3_bits(v))
}

/// Recover the quantized components of a [`pack3_bits`] word.
#[must_use]
pub fn unpack3_bits(bits: u32) -> Vec3 {
    Vec3::new(
        dequantize(bits & LANE10_MAX, LANE10_SCALE),
        dequantize((bits >> 10) & LANE10_MAX, LANE10_SCALE),
        dequantize((bits >> 20) & LANE10_MAX, LANE10_SCALE),
    )
}

/// Recover the quantized components from a [`pack3`] carrier float.
#[must_use]
pub fn unpack3(packed: f32) -> Vec3 {
    unpack3_bits(packed.to_bits())
}

/// Pack a 2D vector with components in `[-1, 1]` into a 16/16 bit word.
#[must_use]
pub fn pack2_bits(v: Vec2) -> u32 {
    let x = quantize(v.x, LANE16_SCALE) & LANE16_MAX;
    let y = quantize(v.y, LANE16_SCALE) & LANE16_MAX;
    x | (y << 16)
}

/// Pack a 2D vector into a 16/16 bit word carried by an `f32`.
///
/// Unlike [`pack3`], the carrier may be a NaN or infinity bit pattern. It
/// must be moved around as bits, never through arithmetic.
#[must_use]
pub fn pack2(v: Vec2) -> f32 {
    f32::from_bits(pack2_bits(v))
}

#[must_use]
pub fn unpack2_bits(bits: u32) -> Vec2 {
    Vec2::new(
        dequantize(bits & LANE16_MAX, LANE16_SCALE),
        dequantize((bits >> 16) & LANE16_MAX, LANE16_SCALE),
    )
}

#[must_use]
pub fn unpack2(packed: f32) -> Vec2 {
    unpack2_bits(packed.to_bits())
}

/// Normalize `v`, returning it unchanged when it has zero length.
#[must_use]
pub fn normalize_or_self(v: Vec3) -> Vec3 {
    let length = v.length();
    if length > 0.0 { v / length } else { v }
}
