#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Antcode replay viewer.
//!
//! This crate defines the vocabulary that connects the console interpreter,
//! the playback system, the replay reader, and the rendering adapters. The
//! console adapter submits [`ConsoleRequest`] values describing desired
//! actions and the frame loop executes them against the playback system,
//! turning the resulting state into console replies.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Canonical banner printed when the viewer boots.
pub const WELCOME_BANNER: &str = "AntCode - A team resource collection game for CS courses";

/// One of the two competing colonies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    /// The colony anchored at the `@` base.
    North,
    /// The colony anchored at the `X` base.
    South,
}

impl Team {
    /// Human-readable team name as printed by the `score` command.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::North => "North",
            Self::South => "South",
        }
    }
}

/// Identifier of a single ant player, `A` through `H`.
///
/// Players `A`..=`D` belong to the north team, `E`..=`H` to the south team.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Player(char);

impl Player {
    /// Creates a player identifier from an uppercase letter.
    ///
    /// Returns `None` for anything outside `A`..=`H`.
    #[must_use]
    pub const fn from_letter(letter: char) -> Option<Self> {
        if letter.is_ascii_uppercase() && letter <= 'H' {
            Some(Self(letter))
        } else {
            None
        }
    }

    /// Uppercase letter naming the player.
    #[must_use]
    pub const fn letter(&self) -> char {
        self.0
    }

    /// Team the player fights for.
    #[must_use]
    pub const fn team(&self) -> Team {
        if self.0 <= 'D' {
            Team::North
        } else {
            Team::South
        }
    }
}

/// Contents of a single map cell at one replay step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellContent {
    /// Impassable wall segment.
    Wall,
    /// Open ground with nothing on it.
    Empty,
    /// A team's ant hill.
    Base(Team),
    /// A single ant belonging to a player.
    Ant {
        /// Player that owns the ant.
        player: Player,
        /// Whether the ant is currently hauling food back to its base.
        carrying_food: bool,
    },
    /// A pile of food.
    Food {
        /// Remaining units in the pile, `1`..=`9`.
        amount: u8,
    },
}

impl CellContent {
    /// Decodes a cell from the replay character set
    /// `#.@XABCDEFGHabcdefgh123456789`.
    ///
    /// Returns `None` for characters outside that set.
    #[must_use]
    pub fn from_char(symbol: char) -> Option<Self> {
        match symbol {
            '#' => Some(Self::Wall),
            '.' => Some(Self::Empty),
            '@' => Some(Self::Base(Team::North)),
            'X' => Some(Self::Base(Team::South)),
            '1'..='9' => Some(Self::Food {
                amount: symbol as u8 - b'0',
            }),
            'A'..='H' => Player::from_letter(symbol).map(|player| Self::Ant {
                player,
                carrying_food: false,
            }),
            'a'..='h' => {
                Player::from_letter(symbol.to_ascii_uppercase()).map(|player| Self::Ant {
                    player,
                    carrying_food: true,
                })
            }
            _ => None,
        }
    }

    /// Encodes the cell back into its replay character.
    #[must_use]
    pub fn to_char(self) -> char {
        match self {
            Self::Wall => '#',
            Self::Empty => '.',
            Self::Base(Team::North) => '@',
            Self::Base(Team::South) => 'X',
            Self::Ant {
                player,
                carrying_food: false,
            } => player.letter(),
            Self::Ant {
                player,
                carrying_food: true,
            } => player.letter().to_ascii_lowercase(),
            Self::Food { amount } => (b'0' + amount.min(9)) as char,
        }
    }

    /// Team that owns the cell contents, when one does.
    #[must_use]
    pub fn team(self) -> Option<Team> {
        match self {
            Self::Base(team) => Some(team),
            Self::Ant { player, .. } => Some(player.team()),
            _ => None,
        }
    }
}

/// Location of a single map cell expressed as column and row indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    column: u32,
    row: u32,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Transport state of the playback machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportState {
    /// No replay is loaded; the cursor has nothing to traverse.
    Stopped,
    /// The timer advances the cursor at the configured rate.
    Playing,
    /// A replay is loaded but the timer is suspended.
    Paused,
}

/// Requests submitted by the console interpreter to the frame loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsoleRequest {
    /// Loads the replay at the provided path.
    Load {
        /// Filesystem location of the replay file.
        path: PathBuf,
    },
    /// Resumes timed playback.
    Play,
    /// Suspends timed playback.
    Pause,
    /// Flips between playing and paused.
    Toggle,
    /// Advances the cursor by one step.
    StepForward,
    /// Retreats the cursor by one step.
    StepBackward,
    /// Jumps the cursor to the first step.
    SkipToStart,
    /// Jumps the cursor to the last step.
    SkipToEnd,
    /// Reports the current step number and total.
    Steps,
    /// Reports both teams' scores at the current step.
    Score,
    /// Reports the winner recorded in the loaded replay.
    Winner,
    /// Launches the external map/game generator.
    Generate,
    /// Updates a configuration option.
    SetOption {
        /// Option name as typed by the user; fuzzy-matched by the store.
        key: String,
        /// Unparsed replacement value.
        value: String,
    },
    /// Queries a single configuration option.
    QueryOption {
        /// Option name as typed by the user; fuzzy-matched by the store.
        key: String,
    },
    /// Lists every configuration option with its current value.
    ListOptions,
    /// Saves settings and shuts the viewer down.
    Quit,
}

#[cfg(test)]
mod tests {
    use super::{CellContent, GridCoord, Player, Team, TransportState};
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn cell_content_round_trips_through_bincode() {
        let ant = CellContent::from_char('c').expect("valid cell");
        assert_round_trip(&ant);
        assert_round_trip(&CellContent::Food { amount: 7 });
        assert_round_trip(&GridCoord::new(3, 9));
        assert_round_trip(&TransportState::Paused);
    }

    #[test]
    fn every_replay_character_decodes_and_re_encodes() {
        for symbol in "#.@XABCDEFGHabcdefgh123456789".chars() {
            let cell = CellContent::from_char(symbol)
                .unwrap_or_else(|| panic!("character {symbol:?} must decode"));
            assert_eq!(cell.to_char(), symbol);
        }
    }

    #[test]
    fn characters_outside_the_set_are_rejected() {
        for symbol in ['I', 'i', '0', ' ', '=', 'Z'] {
            assert_eq!(CellContent::from_char(symbol), None);
        }
    }

    #[test]
    fn players_split_across_teams_at_the_letter_boundary() {
        assert_eq!(Player::from_letter('D').map(|p| p.team()), Some(Team::North));
        assert_eq!(Player::from_letter('E').map(|p| p.team()), Some(Team::South));
        assert_eq!(Player::from_letter('Z'), None);
        assert_eq!(Player::from_letter('a'), None);
    }

    #[test]
    fn carrying_ants_use_lowercase_letters() {
        let cell = CellContent::from_char('f').expect("valid cell");
        assert!(matches!(
            cell,
            CellContent::Ant {
                carrying_food: true,
                ..
            }
        ));
        assert_eq!(cell.team(), Some(Team::South));
    }
}
