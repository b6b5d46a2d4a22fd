//! Fixed colors for map cells and chrome.

use antcode_core::{Player, Team};

use crate::Color;

/// Wall fill.
pub(crate) const WALL: Color = Color::from_rgb_u8(128, 128, 128);
/// Open ground fill.
pub(crate) const GROUND: Color = Color::from_rgb_u8(255, 255, 255);
/// Thin border drawn around every non-wall cell.
pub const BORDER: Color = Color::from_rgb_u8(100, 100, 100);
/// Darker ground square used for the fancy-graphics checkerboard.
pub const GROUND_CHECKER: Color = Color::from_rgb_u8(222, 238, 214);
/// Lighter ground square used for the fancy-graphics checkerboard.
pub const GROUND_CHECKER_ALT: Color = Color::from_rgb_u8(238, 248, 230);

/// Band color behind a team's half of the top bar.
#[must_use]
pub fn team_band_color(team: Team) -> Color {
    match team {
        Team::North => Color::from_rgb_u8(255, 200, 200),
        Team::South => Color::from_rgb_u8(200, 200, 255),
    }
}

/// Fill color for a team's ant hill.
#[must_use]
pub fn team_base_color(team: Team) -> Color {
    match team {
        Team::North => Color::from_rgb_u8(255, 0, 0),
        Team::South => Color::from_rgb_u8(0, 0, 255),
    }
}

/// Fill color for a player's ant. Ants hauling food use a dimmer shade.
#[must_use]
pub fn ant_color(player: Player, carrying_food: bool) -> Color {
    if carrying_food {
        match player.letter() {
            'A' | 'E' => Color::from_rgb_u8(0, 200, 0),
            'B' | 'C' | 'F' => Color::from_rgb_u8(200, 200, 0),
            'G' => Color::from_rgb_u8(200, 110, 0),
            _ => Color::from_rgb_u8(0, 200, 200),
        }
    } else {
        match player.letter() {
            'A' | 'E' => Color::from_rgb_u8(0, 255, 0),
            'B' | 'F' => Color::from_rgb_u8(255, 255, 0),
            'C' | 'G' => Color::from_rgb_u8(255, 165, 0),
            _ => Color::from_rgb_u8(0, 255, 255),
        }
    }
}

/// Fill color for a food pile with the given remaining amount.
#[must_use]
pub fn food_color(amount: u8) -> Color {
    match amount {
        1 => Color::from_rgb_u8(200, 200, 255),
        2 => Color::from_rgb_u8(255, 200, 200),
        3 => Color::from_rgb_u8(200, 255, 200),
        4 => Color::from_rgb_u8(255, 255, 200),
        5 => Color::from_rgb_u8(255, 220, 180),
        6 => Color::from_rgb_u8(180, 220, 255),
        7 => Color::from_rgb_u8(220, 180, 255),
        8 => Color::from_rgb_u8(255, 180, 220),
        _ => Color::from_rgb_u8(255, 220, 140),
    }
}
