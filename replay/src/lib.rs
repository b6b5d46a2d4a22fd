#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Read-only adapter over the Antcode engine's replay output.
//!
//! The engine emits a plain-text log: a `SIZE` header section, one section
//! per simulated round, and a trailing `WINNER` section, all separated by
//! thirty `=` characters. This crate parses that format into an immutable
//! [`GameLog`] and exposes indexed access to the per-round snapshots. The
//! format is owned by the engine; everything that deviates from it is
//! rejected with a specific [`ReplayError`] instead of being repaired.

use std::{fs, path::Path};

use antcode_core::{CellContent, GridCoord};
use thiserror::Error;

/// Line of thirty `=` characters separating top-level sections.
const SECTION_SEPARATOR: &str = "==============================";
/// Line of twenty-five `=` characters separating a round header from its board.
const BOARD_SEPARATOR: &str = "=========================";

/// Number of header lines (`ROUND`, `NORTH`, `SOUTH`, separator) preceding a board.
const ROUND_HEADER_LINES: usize = 4;

/// Dense row-major grid of decoded map cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    columns: u32,
    rows: u32,
    cells: Vec<CellContent>,
}

impl Grid {
    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Returns the cell at the provided coordinate, or `None` outside the grid.
    #[must_use]
    pub fn cell_at(&self, coord: GridCoord) -> Option<CellContent> {
        if coord.column() >= self.columns || coord.row() >= self.rows {
            return None;
        }
        let index = coord.row() as usize * self.columns as usize + coord.column() as usize;
        self.cells.get(index).copied()
    }

    /// Iterates over all cells in row-major order with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (GridCoord, CellContent)> + '_ {
        let columns = self.columns;
        self.cells.iter().enumerate().map(move |(index, cell)| {
            let column = (index as u32) % columns;
            let row = (index as u32) / columns;
            (GridCoord::new(column, row), *cell)
        })
    }
}

/// Snapshot of the simulation at a single round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Round {
    number: u32,
    north_points: u32,
    south_points: u32,
    board: Grid,
}

impl Round {
    /// Round number recorded by the engine.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Points held by the north team at this round.
    #[must_use]
    pub const fn north_points(&self) -> u32 {
        self.north_points
    }

    /// Points held by the south team at this round.
    #[must_use]
    pub const fn south_points(&self) -> u32 {
        self.south_points
    }

    /// Map contents at this round.
    #[must_use]
    pub const fn board(&self) -> &Grid {
        &self.board
    }
}

/// Immutable, ordered sequence of replay rounds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameLog {
    rows: u32,
    columns: u32,
    winner: String,
    rounds: Vec<Round>,
}

impl GameLog {
    /// Reads and parses the replay file at the provided path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parses a replay from its textual representation.
    pub fn parse(contents: &str) -> Result<Self, ReplayError> {
        let sections: Vec<&str> = contents.split(SECTION_SEPARATOR).collect();

        let first = sections.first().map(|s| s.trim()).unwrap_or_default();
        let (rows, columns) = parse_size(first).ok_or(ReplayError::MissingSize)?;

        let last = sections.last().map(|s| s.trim()).unwrap_or_default();
        let winner = parse_winner(last).ok_or(ReplayError::MissingWinner)?;

        let mut rounds = Vec::new();
        for section in sections.iter().skip(1) {
            let stripped = section.trim();
            let lines: Vec<&str> = stripped.lines().collect();
            if stripped.is_empty() || lines.len() != ROUND_HEADER_LINES + rows as usize {
                // Trailing winner section and stray blank sections fall out here.
                continue;
            }

            rounds.push(parse_round(&lines, rows, columns)?);
        }

        if rounds.is_empty() {
            return Err(ReplayError::EmptyLog);
        }

        Ok(Self {
            rows,
            columns,
            winner: winner.to_owned(),
            rounds,
        })
    }

    /// Number of rows in every board of the log.
    #[must_use]
    pub const fn board_rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns in every board of the log.
    #[must_use]
    pub const fn board_columns(&self) -> u32 {
        self.columns
    }

    /// Name of the winning team recorded at the end of the game.
    #[must_use]
    pub fn winner(&self) -> &str {
        &self.winner
    }

    /// Returns the round snapshot at the provided step index, or `None`
    /// when the index lies outside `0..len()`.
    #[must_use]
    pub fn state_at(&self, index: usize) -> Option<&Round> {
        self.rounds.get(index)
    }

    /// Total number of steps contained in the log.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    /// Reports whether the log contains no rounds. Never true for a parsed log.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }
}

fn parse_size(section: &str) -> Option<(u32, u32)> {
    let rest = find_labeled(section, "SIZE")?;
    let mut parts = rest.split_whitespace();
    let rows = parts.next()?.parse().ok()?;
    let columns = parts.next()?.parse().ok()?;
    if rows == 0 || columns == 0 {
        return None;
    }
    Some((rows, columns))
}

fn parse_winner(section: &str) -> Option<&str> {
    let rest = find_labeled(section, "WINNER")?;
    rest.split_whitespace().next()
}

/// Finds a line starting with `label` and returns the remainder of that line.
fn find_labeled<'a>(section: &'a str, label: &str) -> Option<&'a str> {
    section.lines().find_map(|line| {
        let trimmed = line.trim();
        let rest = trimmed.strip_prefix(label)?;
        if rest.starts_with(char::is_whitespace) {
            Some(rest.trim())
        } else {
            None
        }
    })
}

fn parse_round(lines: &[&str], rows: u32, columns: u32) -> Result<Round, ReplayError> {
    let number = parse_header_value(lines[0], "ROUND").ok_or_else(|| {
        ReplayError::MissingRoundNumber {
            line: lines[0].to_owned(),
        }
    })?;

    let north_points = parse_header_value(lines[1], "NORTH");
    let south_points = parse_header_value(lines[2], "SOUTH");
    let (north_points, south_points) = match (north_points, south_points) {
        (Some(north), Some(south)) => (north, south),
        _ => return Err(ReplayError::MissingTeamPoints { round: number }),
    };

    if lines[3].trim() != BOARD_SEPARATOR {
        return Err(ReplayError::MissingBoard { round: number });
    }

    let board_lines = &lines[ROUND_HEADER_LINES..];
    let mut cells = Vec::with_capacity(rows as usize * columns as usize);
    for line in board_lines {
        if line.chars().count() != columns as usize {
            return Err(ReplayError::InvalidBoardRow {
                round: number,
                line: (*line).to_owned(),
            });
        }
        for symbol in line.chars() {
            let cell =
                CellContent::from_char(symbol).ok_or_else(|| ReplayError::InvalidBoardRow {
                    round: number,
                    line: (*line).to_owned(),
                })?;
            cells.push(cell);
        }
    }

    Ok(Round {
        number,
        north_points,
        south_points,
        board: Grid {
            columns,
            rows,
            cells,
        },
    })
}

fn parse_header_value(line: &str, label: &str) -> Option<u32> {
    let rest = line.trim().strip_prefix(label)?;
    rest.trim().parse().ok()
}

/// Errors that can occur while loading a replay file.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The replay file could not be read from disk.
    #[error("could not read replay file {path}: {source}")]
    Io {
        /// Location of the file that failed to read.
        path: String,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },
    /// The first section did not contain a `SIZE <rows> <cols>` header.
    #[error("board size not found")]
    MissingSize,
    /// The final section did not contain a `WINNER <name>` header.
    #[error("winner not found")]
    MissingWinner,
    /// A round section did not start with a `ROUND <n>` header.
    #[error("round number not found in section starting with `{line}`")]
    MissingRoundNumber {
        /// First line of the offending section.
        line: String,
    },
    /// A round section lacked `NORTH`/`SOUTH` point headers.
    #[error("team points not found in round {round}")]
    MissingTeamPoints {
        /// Round whose section was malformed.
        round: u32,
    },
    /// A round section lacked the board separator line.
    #[error("board data not found in round {round}")]
    MissingBoard {
        /// Round whose section was malformed.
        round: u32,
    },
    /// A board row had the wrong width or contained invalid characters.
    #[error("invalid map format or invalid characters detected in round {round}: {line}")]
    InvalidBoardRow {
        /// Round whose board was malformed.
        round: u32,
        /// Offending board line.
        line: String,
    },
    /// The log parsed successfully but contained no rounds.
    #[error("replay contains no rounds")]
    EmptyLog,
}
