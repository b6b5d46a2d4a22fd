#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for the Antcode replay viewer.
//!
//! Rendering backends consume a [`Scene`]: a declarative description of the
//! map grid, overlays, top bar and tooltip for one frame. Scenes are built
//! by the pure [`compose_scene`] function from the current replay step and
//! the settings store, so redrawing is idempotent given identical inputs.

mod compose;
mod palette;

pub use compose::{compose_scene, SceneView, BLANK_MAP};
pub use palette::{
    ant_color, food_color, team_band_color, team_base_color, BORDER, GROUND_CHECKER,
    GROUND_CHECKER_ALT,
};

use anyhow::Result as AnyResult;
use antcode_core::GridCoord;
use glam::Vec2;
use std::time::Duration;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Returns a new color darkened towards black by the provided amount.
    #[must_use]
    pub fn darken(self, amount: f32) -> Self {
        let keep = 1.0 - amount.clamp(0.0, 1.0);

        Self {
            red: self.red * keep,
            green: self.green * keep,
            blue: self.blue * keep,
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Detailed drawing applied to a cell when fancy graphics are enabled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CellVisual {
    /// Textured wall block.
    WallBlock,
    /// Ant body drawn as a filled circle, with a food dot when carrying.
    AntBody {
        /// Fill color of the body.
        body: Color,
        /// Whether a food dot is drawn on the body.
        carrying: bool,
    },
    /// Team base drawn as a diamond.
    BaseMarker {
        /// Fill color of the diamond.
        color: Color,
    },
    /// Food pile drawn as stacked squares scaled by the remaining amount.
    FoodPile {
        /// Remaining units in the pile, `1`..=`9`.
        amount: u8,
        /// Fill color of the squares.
        color: Color,
    },
}

/// Declarative description of a single map cell for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct CellPresentation {
    /// Background fill, absent when the display policy hides it.
    pub fill: Option<Color>,
    /// Identifying label (player letter or pile amount), policy permitting.
    pub label: Option<char>,
    /// Detailed drawing used instead of the flat fill under fancy graphics.
    pub visual: Option<CellVisual>,
    /// Whether the standard cell border is drawn. Walls are unbordered.
    pub bordered: bool,
}

/// Score/step panel drawn above the map.
#[derive(Clone, Debug, PartialEq)]
pub struct TopBarPresentation {
    /// Points held by the north team at the displayed step.
    pub north_score: u32,
    /// Points held by the south team at the displayed step.
    pub south_score: u32,
    /// Centered step counter, e.g. `Step 3 / 200`.
    pub step_counter: String,
    /// Band color behind the north half of the bar.
    pub north_band: Color,
    /// Band color behind the south half of the bar.
    pub south_band: Color,
}

/// On-hover annotation describing the cell under the cursor.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipPresentation {
    /// Cell the tooltip describes.
    pub anchor: GridCoord,
    /// Text lines rendered inside the tooltip box.
    pub lines: Vec<String>,
}

/// Scene description consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Number of cell columns in the map grid.
    pub columns: u32,
    /// Number of cell rows in the map grid.
    pub rows: u32,
    /// Edge length of a rendered cell in pixels.
    pub cell_size: f32,
    /// Row-major cell descriptions, `columns * rows` entries.
    pub cells: Vec<CellPresentation>,
    /// Whether the backend paints a checkered ground under the cells.
    pub checkered_ground: bool,
    /// Score/step panel, absent when hidden or no replay is loaded.
    pub top_bar: Option<TopBarPresentation>,
    /// Cell highlighted under the cursor, when the overlay is enabled.
    pub hovered: Option<GridCoord>,
    /// Tooltip for the hovered cell, when tooltips are enabled.
    pub tooltip: Option<TooltipPresentation>,
}

impl Scene {
    /// Width of the scene in pixels.
    #[must_use]
    pub fn pixel_width(&self) -> f32 {
        self.columns as f32 * self.cell_size
    }

    /// Height of the scene in pixels, including the top bar when present.
    #[must_use]
    pub fn pixel_height(&self) -> f32 {
        let bar_rows = u32::from(self.top_bar.is_some());
        (self.rows + bar_rows) as f32 * self.cell_size
    }

    /// Height in pixels of the top bar band, zero when hidden.
    #[must_use]
    pub fn top_bar_height(&self) -> f32 {
        if self.top_bar.is_some() {
            self.cell_size
        } else {
            0.0
        }
    }

    /// Cell presentation at the provided coordinate, if it lies on the grid.
    #[must_use]
    pub fn cell_at(&self, coord: GridCoord) -> Option<&CellPresentation> {
        if coord.column() >= self.columns || coord.row() >= self.rows {
            return None;
        }
        let index = coord.row() as usize * self.columns as usize + coord.column() as usize;
        self.cells.get(index)
    }

    /// Maps a window-space pixel position to the map cell underneath it.
    ///
    /// Returns `None` above the grid (inside the top bar) or outside the
    /// window bounds.
    #[must_use]
    pub fn cell_under(&self, position: Vec2) -> Option<GridCoord> {
        if self.cell_size <= f32::EPSILON || position.x < 0.0 {
            return None;
        }
        let y = position.y - self.top_bar_height();
        if y < 0.0 {
            return None;
        }

        let column = (position.x / self.cell_size) as u32;
        let row = (y / self.cell_size) as u32;
        if column >= self.columns || row >= self.rows {
            return None;
        }
        Some(GridCoord::new(column, row))
    }
}

/// Input snapshot gathered by the backend before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Map cell currently under the cursor, if any.
    pub cursor_cell: Option<GridCoord>,
}

/// Whether the render loop should keep running after a frame update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameControl {
    /// Present the frame and continue.
    Continue,
    /// Present the frame, then shut the window down.
    Exit,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content displayed until the first update.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Antcode scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until the update closure requests exit or
    /// the window is closed.
    ///
    /// The `update_scene` closure receives the frame delta and per-frame
    /// input captured by the backend, and replaces the scene contents before
    /// the frame is drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameControl + 'static;
}
