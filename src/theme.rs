//! Heatmap color themes
//!
//! A static table of four palettes. Each palette has one color per intensity
//! level, from "no activity" (level 0) to "fully complete" (`MAX_LEVEL`), in a
//! light and a dark variant. `MAX_LEVEL` is the global max check-in count, so
//! each palette holds `MAX_LEVEL + 1` colors (levels 0 through 5).

use serde::Serialize;

use crate::domain::{ColorTheme, Habit, HabitType};

/// Highest intensity level; equals the global default max check-in count
pub const MAX_LEVEL: usize = 5;

/// An sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    const fn hex(rgb: u32) -> Self {
        Self {
            r: (rgb >> 16) as u8,
            g: (rgb >> 8) as u8,
            b: rgb as u8,
        }
    }

    /// `#RRGGBB`
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Light or dark system appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    Light,
    Dark,
}

impl Appearance {
    pub fn from_dark_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Appearance::Dark
        } else {
            Appearance::Light
        }
    }
}

type Palette = [Color; MAX_LEVEL + 1];

struct ThemePalettes {
    light: Palette,
    dark: Palette,
}

const fn palette(rgb: [u32; MAX_LEVEL + 1]) -> Palette {
    [
        Color::hex(rgb[0]),
        Color::hex(rgb[1]),
        Color::hex(rgb[2]),
        Color::hex(rgb[3]),
        Color::hex(rgb[4]),
        Color::hex(rgb[5]),
    ]
}

const GREEN: ThemePalettes = ThemePalettes {
    light: palette([0xEBEDF0, 0xD3F2D9, 0x9BE9A8, 0x40C463, 0x30A14E, 0x216E39]),
    dark: palette([0x161B22, 0x0E3A22, 0x0E4429, 0x006D32, 0x26A641, 0x39D353]),
};

const BLUE: ThemePalettes = ThemePalettes {
    light: palette([0xEBEDF0, 0xD6E8FB, 0xA5CDF5, 0x5EA6EB, 0x2F7FD8, 0x1A56A8]),
    dark: palette([0x161B22, 0x0F2740, 0x123B66, 0x1C5A9C, 0x2F82D4, 0x58A6FF]),
};

const ORANGE: ThemePalettes = ThemePalettes {
    light: palette([0xEBEDF0, 0xFDE6CC, 0xFBC78A, 0xF79D45, 0xE8741A, 0xB8560B]),
    dark: palette([0x161B22, 0x3A2410, 0x5C3613, 0x8F5314, 0xC9731C, 0xF0973A]),
};

const PURPLE: ThemePalettes = ThemePalettes {
    light: palette([0xEBEDF0, 0xEADCF8, 0xD0B3F0, 0xA97BE3, 0x8250CC, 0x5E3299]),
    dark: palette([0x161B22, 0x2A1C3F, 0x3F2963, 0x5E3C94, 0x8957CF, 0xB083F0]),
};

fn palettes(theme: ColorTheme) -> &'static ThemePalettes {
    match theme {
        ColorTheme::Green => &GREEN,
        ColorTheme::Blue => &BLUE,
        ColorTheme::Orange => &ORANGE,
        ColorTheme::Purple => &PURPLE,
    }
}

/// Color for `level` in `theme`
///
/// Levels outside `0..=MAX_LEVEL` fall back to level 0.
pub fn color(theme: ColorTheme, level: i64, appearance: Appearance) -> Color {
    let index = usize::try_from(level)
        .ok()
        .filter(|l| *l <= MAX_LEVEL)
        .unwrap_or(0);

    let palettes = palettes(theme);
    match appearance {
        Appearance::Light => palettes.light[index],
        Appearance::Dark => palettes.dark[index],
    }
}

/// Map a day's count for `habit` onto a theme level
///
/// Checkbox habits are either empty or full. Count habits scale by their own
/// daily maximum, rounding up so any check-in is visible.
pub fn intensity_level(habit: &Habit, count: u32) -> usize {
    if count == 0 {
        return 0;
    }

    match habit.habit_type {
        HabitType::Checkbox => MAX_LEVEL,
        HabitType::Count => {
            let max = u64::from(habit.max_check_in_count.max(1));
            let scaled = (u64::from(count) * MAX_LEVEL as u64).div_ceil(max);
            (scaled as usize).clamp(1, MAX_LEVEL)
        }
    }
}

/// Shortcut for the color a habit's day renders with
pub fn day_color(habit: &Habit, count: u32, appearance: Appearance) -> Color {
    color(
        habit.color_theme,
        intensity_level(habit, count) as i64,
        appearance,
    )
}
