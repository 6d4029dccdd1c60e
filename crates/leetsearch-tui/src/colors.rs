//! Dark theme colors

use ratatui::style::Color;

pub const BG: Color = Color::Rgb(0x14, 0x13, 0x13);
pub const SURFACE: Color = Color::Rgb(0x20, 0x1f, 0x20);

pub const ON_SURFACE: Color = Color::Rgb(0xe6, 0xe1, 0xe1);
pub const SUBTEXT: Color = Color::Rgb(0xcb, 0xc5, 0xca);
pub const OUTLINE: Color = Color::Rgb(0x94, 0x8f, 0x94);

pub const PRIMARY: Color = Color::Rgb(0xff, 0xa1, 0x16);

pub const SUCCESS: Color = Color::Rgb(0xb5, 0xcc, 0xba);

pub const ERROR: Color = Color::Rgb(0xff, 0xb4, 0xab);
