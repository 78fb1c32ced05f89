//! Centralized theme colors.

use ratatui::style::Color;

pub const ACCENT: Color = Color::Rgb(166, 227, 161); // Green
pub const USER: Color = Color::Rgb(137, 180, 250); // Blue
pub const SYSTEM: Color = Color::Rgb(250, 179, 135); // Peach
pub const ERROR: Color = Color::Rgb(243, 139, 168); // Red
pub const MENTION: Color = Color::Rgb(137, 180, 250); // Blue
pub const HASHTAG: Color = Color::Rgb(148, 226, 213); // Teal
pub const ICON: Color = Color::Rgb(249, 226, 175); // Yellow
pub const CHIP: Color = Color::Rgb(203, 166, 247); // Mauve
pub const SELECTED_BG: Color = Color::Rgb(69, 71, 90); // Surface1
pub const HOVER_BG: Color = Color::Rgb(49, 50, 68); // Surface0
pub const BORDER: Color = Color::Rgb(49, 50, 68);
pub const DIM: Color = Color::Rgb(88, 91, 112); // Overlay0
pub const BAR_BG: Color = Color::Rgb(24, 24, 37); // Mantle
pub const BAR_FG: Color = Color::Rgb(147, 153, 178); // Overlay1
