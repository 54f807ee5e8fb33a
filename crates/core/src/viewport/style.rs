//! Visual policy for cells: outline by interaction range, fill by magnitude.

use crate::types::{CellValue, Token};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn from_hex(hex: u32) -> Self {
        Self { r: (hex >> 16) as u8, g: (hex >> 8) as u8, b: hex as u8 }
    }
}

pub const NEAR_OUTLINE: Rgb = Rgb::from_hex(0x333333);
pub const FAR_OUTLINE: Rgb = Rgb::from_hex(0x777777);
pub const NEAR_OUTLINE_WEIGHT: f32 = 1.0;
pub const FAR_OUTLINE_WEIGHT: f32 = 0.5;
pub const FILL_OPACITY: f32 = 0.12;

/// Fill bands, highest threshold first. A value takes the first band it reaches.
pub const FILL_BANDS: [(u32, Rgb); 5] = [
    (16, Rgb::from_hex(0x7fbf7f)),
    (8, Rgb::from_hex(0x9fd3ff)),
    (4, Rgb::from_hex(0xffd27f)),
    (2, Rgb::from_hex(0xffb3b3)),
    (1, Rgb::from_hex(0xdddddd)),
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fill {
    pub color: Rgb,
    pub opacity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellStyle {
    pub outline: Rgb,
    pub outline_weight: f32,
    pub fill: Option<Fill>,
}

/// Position of a value in the fill table; 0 for empty, higher for larger tokens.
pub fn magnitude_band(value: CellValue) -> usize {
    let Some(token) = value else {
        return 0;
    };
    FILL_BANDS
        .iter()
        .position(|(threshold, _)| token.value() >= *threshold)
        .map_or(0, |index| FILL_BANDS.len() - index)
}

pub fn style_for(value: CellValue, in_range: bool) -> CellStyle {
    let (outline, outline_weight) = if in_range {
        (NEAR_OUTLINE, NEAR_OUTLINE_WEIGHT)
    } else {
        (FAR_OUTLINE, FAR_OUTLINE_WEIGHT)
    };
    CellStyle { outline, outline_weight, fill: value.map(fill_for) }
}

fn fill_for(token: Token) -> Fill {
    let color = FILL_BANDS
        .iter()
        .find(|(threshold, _)| token.value() >= *threshold)
        .map_or(FILL_BANDS[FILL_BANDS.len() - 1].1, |(_, color)| *color);
    Fill { color, opacity: FILL_OPACITY }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cells_have_no_fill() {
        assert_eq!(style_for(None, true).fill, None);
        assert_eq!(magnitude_band(None), 0);
    }

    #[test]
    fn in_range_cells_get_the_stronger_outline() {
        let near = style_for(Token::new(1), true);
        let far = style_for(Token::new(1), false);
        assert_eq!(near.outline, NEAR_OUTLINE);
        assert!(near.outline_weight > far.outline_weight);
    }

    #[test]
    fn magnitude_is_monotonic_in_value() {
        let mut previous = 0;
        for value in 1..=64_u32 {
            let band = magnitude_band(Token::new(value));
            assert!(band >= previous, "band dropped at {value}");
            previous = band;
        }
        assert_eq!(magnitude_band(Token::new(1)), 1);
        assert_eq!(magnitude_band(Token::new(16)), FILL_BANDS.len());
    }

    #[test]
    fn fill_colors_follow_the_band_table() {
        let fill = |value| style_for(Token::new(value), false).fill.map(|fill| fill.color);
        assert_eq!(fill(1), Some(Rgb::from_hex(0xdddddd)));
        assert_eq!(fill(3), Some(Rgb::from_hex(0xffb3b3)));
        assert_eq!(fill(8), Some(Rgb::from_hex(0x9fd3ff)));
        assert_eq!(fill(1024), Some(Rgb::from_hex(0x7fbf7f)));
    }
}
