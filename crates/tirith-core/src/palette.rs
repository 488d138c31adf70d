// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use crate::error::ColorError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ColorError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ColorError::BadFormat(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(bad)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(bad());
        }
        let channel = |at: usize| u8::from_str_radix(&hex[at..at + 2], 16).map_err(|_| bad());
        Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

pub const PALETTE: [Color; 8] = [
    Color::rgb(0x3b, 0x82, 0xf6), // blue
    Color::rgb(0x8b, 0x5c, 0xf6), // violet
    Color::rgb(0xec, 0x48, 0x99), // pink
    Color::rgb(0x10, 0xb9, 0x81), // emerald
    Color::rgb(0xf5, 0x9e, 0x0b), // amber
    Color::rgb(0xef, 0x44, 0x44), // red
    Color::rgb(0x06, 0xb6, 0xd4), // cyan
    Color::rgb(0xf9, 0x73, 0x16), // orange
];

pub const MIN_SHADE_OPACITY: f32 = 0.4;

pub fn color_for(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}

/// Opacity of item `index` out of `len` in a monochrome view. Fades from 1.0
/// and never drops below [`MIN_SHADE_OPACITY`].
pub fn shade_opacity(index: usize, len: usize) -> f32 {
    let step = 0.6 / len.max(1) as f32;
    (1.0 - index as f32 * step).max(MIN_SHADE_OPACITY)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Swatch {
    pub color: Color,
    pub opacity: f32,
}

impl Swatch {
    pub fn solid(color: Color) -> Self {
        Self {
            color,
            opacity: 1.0,
        }
    }
}

pub fn shades(seed: Color, len: usize) -> Vec<Swatch> {
    (0..len)
        .map(|index| Swatch {
            color: seed,
            opacity: shade_opacity(index, len),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_order() {
        assert_eq!(color_for(0).to_hex(), "#3b82f6");
        assert_eq!(color_for(7).to_hex(), "#f97316");
        assert_eq!(color_for(8), color_for(0));
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!("#ec4899".parse::<Color>(), Ok(PALETTE[2]));
        assert!("ec4899".parse::<Color>().is_err());
        assert!("#ec48".parse::<Color>().is_err());
        assert!("#zz4899".parse::<Color>().is_err());
    }

    #[test]
    fn test_shades_fade_and_clamp() {
        let swatches = shades(PALETTE[0], 5);
        assert_eq!(swatches[0].opacity, 1.0);
        assert!(swatches.windows(2).all(|w| w[0].opacity >= w[1].opacity));
        assert!(swatches.iter().all(|s| s.opacity >= MIN_SHADE_OPACITY));
        assert_eq!(shade_opacity(50, 3), MIN_SHADE_OPACITY);
        assert_eq!(shade_opacity(0, 0), 1.0);
    }
}
