//! # Colors
//!
//! Scene colors are authored as sRGB hex values (`0xAC443C`, `"#EEEEEE"`) and
//! stored in linear space, which is what the shaders light with. The surface is
//! configured with an sRGB format, so the hardware encodes the result back.

/// Linear RGB color.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::from_linear(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::from_linear(0.0, 0.0, 0.0);

    /// Creates a color from linear components.
    #[inline]
    pub const fn from_linear(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Creates a color from straight sRGB bytes (`0`-`255`).
    pub fn from_srgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: srgb_to_linear(r as f32 / 255.0),
            g: srgb_to_linear(g as f32 / 255.0),
            b: srgb_to_linear(b as f32 / 255.0),
        }
    }

    /// Creates a color from a packed `0xRRGGBB` sRGB value.
    pub fn from_hex(hex: u32) -> Self {
        Self::from_srgb_u8(
            ((hex >> 16) & 0xff) as u8,
            ((hex >> 8) & 0xff) as u8,
            (hex & 0xff) as u8,
        )
    }

    /// Parses a CSS-style `#RRGGBB` (or `RRGGBB`) string.
    ///
    /// Returns `None` for anything that is not exactly six hex digits.
    pub fn parse_hex(text: &str) -> Option<Self> {
        let digits = text.strip_prefix('#').unwrap_or(text);
        if digits.len() != 6 {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::from_hex)
    }

    /// Returns the color scaled by `factor` (used for light color * intensity).
    pub fn scaled(self, factor: f32) -> Self {
        Self::from_linear(self.r * factor, self.g * factor, self.b * factor)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: 1.0,
        }
    }
}

/// sRGB electro-optical transfer function.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn white_and_black_are_fixed_points() {
        assert_eq!(Color::from_hex(0xFFFFFF), Color::WHITE);
        assert_eq!(Color::from_hex(0x000000), Color::BLACK);
    }

    #[test]
    fn hex_is_decoded_to_linear() {
        let gray = Color::from_hex(0x888888);
        // 0x88 = 136 / 255 in sRGB is ~0.246 linear
        assert_relative_eq!(gray.r, 0.2462, epsilon = 1e-3);
        assert_eq!(gray.r, gray.g);
        assert_eq!(gray.g, gray.b);
    }

    #[test]
    fn parse_hex_accepts_leading_hash() {
        assert_eq!(Color::parse_hex("#AC443C"), Some(Color::from_hex(0xAC443C)));
        assert_eq!(Color::parse_hex("EFDBB9"), Some(Color::from_hex(0xEFDBB9)));
    }

    #[test]
    fn parse_hex_rejects_malformed_input() {
        assert_eq!(Color::parse_hex("#FFF"), None);
        assert_eq!(Color::parse_hex("#GGGGGG"), None);
        assert_eq!(Color::parse_hex(""), None);
    }

    #[test]
    fn scaled_multiplies_every_channel() {
        let c = Color::WHITE.scaled(0.2);
        assert_relative_eq!(c.r, 0.2);
        assert_relative_eq!(c.g, 0.2);
        assert_relative_eq!(c.b, 0.2);
    }
}
