//! Theme color parsing.
//!
//! Chapter colors are authored as `#RRGGBB` strings; scenes need normalized
//! RGB components. Hex digits are decoded arithmetically through a validity
//! mask instead of a match chain, so a bad digit is detected in the same pass
//! that decodes the good ones.

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// `#E8B4B8`, used when a chapter is unknown or its color is malformed.
    pub const FALLBACK: Self = Self { r: 0xE8, g: 0xB4, b: 0xB8 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the `#` is optional). Anything else is `None`.
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.trim();
        let digits = s.strip_prefix('#').unwrap_or(s).as_bytes();
        if digits.len() != 6 {
            return None;
        }
        let mut out = [0u8; 3];
        for (slot, pair) in out.iter_mut().zip(digits.chunks_exact(2)) {
            *slot = hex_byte(pair[0], pair[1])?;
        }
        Some(Self::new(out[0], out[1], out[2]))
    }

    /// Normalized `[r, g, b]` in 0.0..=1.0.
    #[inline]
    pub fn to_f32(self) -> [f32; 3] {
        const INV_255: f32 = 1.0 / 255.0;
        [
            self.r as f32 * INV_255,
            self.g as f32 * INV_255,
            self.b as f32 * INV_255,
        ]
    }

    /// Multiply every channel by `factor` (clamped to 0.0..=1.0).
    pub fn scaled(self, factor: f32) -> Self {
        let f = factor.clamp(0.0, 1.0);
        let ch = |c: u8| (c as f32 * f).round() as u8;
        Self::new(ch(self.r), ch(self.g), ch(self.b))
    }

    /// Channel-wise sum, saturating at 255.
    pub fn saturating_add(self, other: Self) -> Self {
        Self::new(
            self.r.saturating_add(other.r),
            self.g.saturating_add(other.g),
            self.b.saturating_add(other.b),
        )
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Decode one hex digit. The three range flags are mutually exclusive, so
/// the sum selects exactly one decoded value; `valid` is 0 for non-hex bytes.
#[inline(always)]
fn hex_digit(b: u8) -> Option<u8> {
    let is_digit = (b.wrapping_sub(b'0') < 10) as u8;
    let is_lower = (b.wrapping_sub(b'a') < 6) as u8;
    let is_upper = (b.wrapping_sub(b'A') < 6) as u8;

    let value = is_digit
        .wrapping_mul(b.wrapping_sub(b'0'))
        .wrapping_add(is_lower.wrapping_mul(b.wrapping_sub(b'a').wrapping_add(10)))
        .wrapping_add(is_upper.wrapping_mul(b.wrapping_sub(b'A').wrapping_add(10)));

    let valid = is_digit | is_lower | is_upper;
    (valid == 1).then_some(value)
}

#[inline(always)]
fn hex_byte(hi: u8, lo: u8) -> Option<u8> {
    Some((hex_digit(hi)? << 4) | hex_digit(lo)?)
}
