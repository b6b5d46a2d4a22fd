//! Pure scene composition from replay state and display settings.

use antcode_core::{CellContent, GridCoord};
use antcode_replay::Round;
use antcode_settings::{InfoMode, Settings, TooltipMode};

use crate::palette;
use crate::{CellPresentation, CellVisual, Scene, TooltipPresentation, TopBarPresentation};

/// Placeholder board shown before any replay is loaded.
pub const BLANK_MAP: &[&str] = &[
    "#####################",
    "#...................#",
    "#...................#",
    "#...................#",
    "#...................#",
    "#...................#",
    "#...................#",
    "#...................#",
    "#...................#",
    "#...................#",
    "#...................#",
    "#...................#",
    "#...................#",
    "#...................#",
    "#...................#",
    "#...................#",
    "#...................#",
    "#...................#",
    "#...................#",
    "#####################",
];

/// Everything the composer needs to describe one frame.
#[derive(Clone, Copy)]
pub struct SceneView<'a> {
    /// Round to display, or `None` for the placeholder board.
    pub round: Option<&'a Round>,
    /// Zero-based index of the displayed step.
    pub step_index: usize,
    /// Total number of steps in the loaded replay.
    pub step_total: usize,
    /// Map cell currently under the cursor, if any.
    pub cursor_cell: Option<GridCoord>,
    /// Display settings consulted for overlay policy.
    pub settings: &'a Settings,
}

/// Builds the scene for one frame.
///
/// Composition is a pure function of the view: calling it twice with the
/// same inputs yields equal scenes, so backends may redraw freely.
#[must_use]
pub fn compose_scene(view: &SceneView<'_>) -> Scene {
    let settings = view.settings;
    let fancy = settings.fancy_graphics();
    let ant_info = settings.ant_info();
    let food_info = settings.foodpile_info();

    let (columns, rows, cells) = match view.round {
        Some(round) => {
            let board = round.board();
            let cells = board
                .iter()
                .map(|(_, content)| present_cell(content, fancy, ant_info, food_info))
                .collect();
            (board.columns(), board.rows(), cells)
        }
        None => blank_cells(fancy, ant_info, food_info),
    };

    let top_bar = view.round.filter(|_| settings.show_top_bar()).map(|round| {
        TopBarPresentation {
            north_score: round.north_points(),
            south_score: round.south_points(),
            step_counter: format!("Step {} / {}", view.step_index + 1, view.step_total),
            north_band: palette::team_band_color(antcode_core::Team::North),
            south_band: palette::team_band_color(antcode_core::Team::South),
        }
    });

    let hovered = view
        .cursor_cell
        .filter(|_| settings.hover_overlay())
        .filter(|coord| coord.column() < columns && coord.row() < rows);

    let tooltip = match settings.tooltips() {
        TooltipMode::Off => None,
        mode => view
            .cursor_cell
            .and_then(|coord| cell_content_at(view, coord).map(|content| (coord, content)))
            .map(|(coord, content)| TooltipPresentation {
                anchor: coord,
                lines: tooltip_lines(content, coord, mode),
            }),
    };

    Scene {
        columns,
        rows,
        cell_size: settings.cell_size() as f32,
        cells,
        checkered_ground: fancy,
        top_bar,
        hovered,
        tooltip,
    }
}

fn cell_content_at(view: &SceneView<'_>, coord: GridCoord) -> Option<CellContent> {
    match view.round {
        Some(round) => round.board().cell_at(coord),
        None => BLANK_MAP
            .get(coord.row() as usize)
            .and_then(|row| row.chars().nth(coord.column() as usize))
            .and_then(CellContent::from_char),
    }
}

fn blank_cells(
    fancy: bool,
    ant_info: InfoMode,
    food_info: InfoMode,
) -> (u32, u32, Vec<CellPresentation>) {
    let rows = BLANK_MAP.len() as u32;
    let columns = BLANK_MAP
        .first()
        .map(|row| row.chars().count() as u32)
        .unwrap_or(0);
    let cells = BLANK_MAP
        .iter()
        .flat_map(|row| row.chars())
        .map(|symbol| {
            let content = CellContent::from_char(symbol).unwrap_or(CellContent::Empty);
            present_cell(content, fancy, ant_info, food_info)
        })
        .collect();
    (columns, rows, cells)
}

fn present_cell(
    content: CellContent,
    fancy: bool,
    ant_info: InfoMode,
    food_info: InfoMode,
) -> CellPresentation {
    match content {
        CellContent::Wall => CellPresentation {
            fill: (!fancy).then_some(palette::WALL),
            label: None,
            visual: fancy.then_some(CellVisual::WallBlock),
            bordered: false,
        },
        CellContent::Empty => CellPresentation {
            // Fancy mode paints its own checkerboard ground instead.
            fill: (!fancy).then_some(palette::GROUND),
            label: None,
            visual: None,
            bordered: true,
        },
        CellContent::Base(team) => {
            let color = palette::team_base_color(team);
            CellPresentation {
                fill: (!fancy).then_some(color),
                label: None,
                visual: fancy.then_some(CellVisual::BaseMarker { color }),
                bordered: true,
            }
        }
        CellContent::Ant {
            player,
            carrying_food,
        } => {
            let color = palette::ant_color(player, carrying_food);
            let show_fill = ant_info.fill_enabled();
            CellPresentation {
                fill: (show_fill && !fancy).then_some(color),
                label: ant_info.label_enabled().then_some(content.to_char()),
                visual: (show_fill && fancy).then_some(CellVisual::AntBody {
                    body: color,
                    carrying: carrying_food,
                }),
                bordered: true,
            }
        }
        CellContent::Food { amount } => {
            let color = palette::food_color(amount);
            let show_fill = food_info.fill_enabled();
            CellPresentation {
                fill: (show_fill && !fancy).then_some(color),
                label: food_info.label_enabled().then_some(content.to_char()),
                visual: (show_fill && fancy).then_some(CellVisual::FoodPile { amount, color }),
                bordered: true,
            }
        }
    }
}

fn tooltip_lines(content: CellContent, coord: GridCoord, mode: TooltipMode) -> Vec<String> {
    let mut lines = vec![describe_cell(content)];
    if mode == TooltipMode::Detailed {
        lines.push(format!("Column {}, row {}", coord.column(), coord.row()));
    }
    lines
}

fn describe_cell(content: CellContent) -> String {
    match content {
        CellContent::Wall => String::from("Wall"),
        CellContent::Empty => String::from("Empty ground"),
        CellContent::Base(team) => format!("{} base", team.label()),
        CellContent::Ant {
            player,
            carrying_food,
        } => {
            if carrying_food {
                format!("Ant {} ({}), carrying food", player.letter(), player.team().label())
            } else {
                format!("Ant {} ({})", player.letter(), player.team().label())
            }
        }
        CellContent::Food { amount } => format!("Food pile ({amount})"),
    }
}
