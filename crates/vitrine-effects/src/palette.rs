//! Neon palette shared by the effects.

use vitrine_core::Color;

/// `#00f5ff`
pub const CYAN: Color = Color {
    r: 0.0,
    g: 245.0 / 255.0,
    b: 1.0,
    a: 1.0,
};

/// `#ff006e`
pub const PINK: Color = Color {
    r: 1.0,
    g: 0.0,
    b: 110.0 / 255.0,
    a: 1.0,
};

/// `#8b5cf6`
pub const PURPLE: Color = Color {
    r: 139.0 / 255.0,
    g: 92.0 / 255.0,
    b: 246.0 / 255.0,
    a: 1.0,
};

/// `#00ff41`
pub const GREEN: Color = Color {
    r: 0.0,
    g: 1.0,
    b: 65.0 / 255.0,
    a: 1.0,
};

/// `#ffd700`
pub const GOLD: Color = Color {
    r: 1.0,
    g: 215.0 / 255.0,
    b: 0.0,
    a: 1.0,
};

/// `#ff8c00`
pub const ORANGE: Color = Color {
    r: 1.0,
    g: 140.0 / 255.0,
    b: 0.0,
    a: 1.0,
};

/// `#60a5fa`
pub const SKY: Color = Color {
    r: 96.0 / 255.0,
    g: 165.0 / 255.0,
    b: 250.0 / 255.0,
    a: 1.0,
};

/// The five node colors, in order.
pub const NEON: [Color; 5] = [CYAN, PINK, PURPLE, GREEN, GOLD];

/// Alpha of a CSS `#rrggbbAA` suffix.
#[must_use]
pub fn hex_alpha(byte: u8) -> f32 {
    f32::from(byte) / 255.0
}
