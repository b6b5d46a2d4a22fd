#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for the Antcode replay viewer.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! The window tracks the scene: when a replay with a different board size is
//! loaded, or the cell size changes, the backend asks the platform to resize
//! the window to fit the new grid exactly.

use antcode_rendering::{
    CellPresentation, CellVisual, Color, FrameControl, FrameInput, Presentation,
    RenderingBackend, Scene, TooltipPresentation, TopBarPresentation,
};
use anyhow::Result;
use glam::Vec2;
use macroquad::input::mouse_position;
use std::{collections::VecDeque, time::Duration};

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing
    /// ten-second averages once one second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<FpsMetrics> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);

        self.frame_times.push_back(frame);
        self.window_duration += frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        if seconds <= f32::EPSILON {
            self.elapsed = Duration::ZERO;
            self.frames = 0;
            return None;
        }

        let per_second = self.frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(FpsMetrics {
            per_second,
            trailing_ten_seconds,
        })
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameControl + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: scene.pixel_width().max(1.0) as i32,
            window_height: scene.pixel_height().max(1.0) as i32,
            window_resizable: false,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();
            let mut window_size = (scene.pixel_width(), scene.pixel_height());

            loop {
                macroquad::window::clear_background(background);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let (cursor_x, cursor_y) = mouse_position();
                let frame_input = frame_input_at(&scene, Vec2::new(cursor_x, cursor_y));

                let control = update_scene(frame_dt, frame_input, &mut scene);

                let desired = (scene.pixel_width(), scene.pixel_height());
                if desired != window_size {
                    window_size = desired;
                    macroquad::window::request_new_screen_size(
                        desired.0.max(1.0),
                        desired.1.max(1.0),
                    );
                }

                draw_scene(&scene);

                if let Some(metrics) = fps_counter.record_frame(frame_dt) {
                    if show_fps {
                        println!(
                            "FPS: {:.2} (10s avg: {:.2})",
                            metrics.per_second, metrics.trailing_ten_seconds,
                        );
                    }
                }

                if control == FrameControl::Exit {
                    break;
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn frame_input_at(scene: &Scene, cursor_position: Vec2) -> FrameInput {
    FrameInput {
        cursor_cell: scene.cell_under(cursor_position),
    }
}

fn draw_scene(scene: &Scene) {
    if let Some(bar) = &scene.top_bar {
        draw_top_bar(bar, scene);
    }

    if scene.checkered_ground {
        draw_checkered_ground(scene);
    }

    let top = scene.top_bar_height();
    for (index, cell) in scene.cells.iter().enumerate() {
        let column = index as u32 % scene.columns.max(1);
        let row = index as u32 / scene.columns.max(1);
        let x = column as f32 * scene.cell_size;
        let y = top + row as f32 * scene.cell_size;
        draw_cell(cell, x, y, scene.cell_size);
    }

    if let Some(hovered) = scene.hovered {
        let x = hovered.column() as f32 * scene.cell_size;
        let y = top + hovered.row() as f32 * scene.cell_size;
        let overlay = macroquad::color::Color::new(1.0, 1.0, 1.0, 0.25);
        macroquad::shapes::draw_rectangle(x, y, scene.cell_size, scene.cell_size, overlay);
        macroquad::shapes::draw_rectangle_lines(
            x,
            y,
            scene.cell_size,
            scene.cell_size,
            2.0,
            macroquad::color::WHITE,
        );
    }

    if let Some(tooltip) = &scene.tooltip {
        draw_tooltip(tooltip, scene);
    }
}

fn draw_top_bar(bar: &TopBarPresentation, scene: &Scene) {
    let width = scene.pixel_width();
    let height = scene.top_bar_height();
    let half = width * 0.5;

    macroquad::shapes::draw_rectangle(0.0, 0.0, half, height, to_macroquad_color(bar.north_band));
    macroquad::shapes::draw_rectangle(
        half,
        0.0,
        width - half,
        height,
        to_macroquad_color(bar.south_band),
    );

    let font_size = (height * 0.6).max(12.0);
    let north_score = format!("Score: {}", bar.north_score);
    let south_score = format!("Score: {}", bar.south_score);

    draw_text_anchored(&north_score, 7.0, height, font_size, TextAnchor::Left);
    draw_text_anchored(&south_score, width - 7.0, height, font_size, TextAnchor::Right);
    draw_text_anchored(
        &bar.step_counter,
        half,
        height,
        (height * 0.7).max(14.0),
        TextAnchor::Center,
    );
}

#[derive(Clone, Copy)]
enum TextAnchor {
    Left,
    Center,
    Right,
}

fn draw_text_anchored(text: &str, x: f32, band_height: f32, font_size: f32, anchor: TextAnchor) {
    let dimensions = macroquad::text::measure_text(text, None, font_size as u16, 1.0);
    let left = match anchor {
        TextAnchor::Left => x,
        TextAnchor::Center => x - dimensions.width * 0.5,
        TextAnchor::Right => x - dimensions.width,
    };
    let baseline = band_height * 0.5 + dimensions.height * 0.5;
    macroquad::text::draw_text(text, left, baseline, font_size, macroquad::color::WHITE);
}

fn draw_checkered_ground(scene: &Scene) {
    let top = scene.top_bar_height();
    for row in 0..scene.rows {
        for column in 0..scene.columns {
            let color = checker_color(column, row);
            macroquad::shapes::draw_rectangle(
                column as f32 * scene.cell_size,
                top + row as f32 * scene.cell_size,
                scene.cell_size,
                scene.cell_size,
                to_macroquad_color(color),
            );
        }
    }
}

fn checker_color(column: u32, row: u32) -> Color {
    if (column + row) % 2 == 0 {
        antcode_rendering::GROUND_CHECKER
    } else {
        antcode_rendering::GROUND_CHECKER_ALT
    }
}

fn draw_cell(cell: &CellPresentation, x: f32, y: f32, size: f32) {
    if let Some(fill) = cell.fill {
        macroquad::shapes::draw_rectangle(x, y, size, size, to_macroquad_color(fill));
    }

    if let Some(visual) = cell.visual {
        draw_cell_visual(visual, x, y, size);
    }

    if cell.bordered {
        macroquad::shapes::draw_rectangle_lines(
            x,
            y,
            size,
            size,
            1.0,
            to_macroquad_color(antcode_rendering::BORDER),
        );
    }

    if let Some(label) = cell.label {
        let mut buffer = [0_u8; 4];
        let text = label.encode_utf8(&mut buffer);
        let font_size = (size * 0.7).max(10.0);
        let dimensions = macroquad::text::measure_text(text, None, font_size as u16, 1.0);
        macroquad::text::draw_text(
            text,
            x + (size - dimensions.width) * 0.5,
            y + (size + dimensions.height) * 0.5,
            font_size,
            macroquad::color::WHITE,
        );
    }
}

fn draw_cell_visual(visual: CellVisual, x: f32, y: f32, size: f32) {
    match visual {
        CellVisual::WallBlock => {
            let block = Color::from_rgb_u8(96, 96, 96);
            let cap = block.lighten(0.25);
            macroquad::shapes::draw_rectangle(x, y, size, size, to_macroquad_color(block));
            macroquad::shapes::draw_rectangle(
                x,
                y,
                size,
                size * 0.25,
                to_macroquad_color(cap),
            );
        }
        CellVisual::AntBody { body, carrying } => {
            let center_x = x + size * 0.5;
            let center_y = y + size * 0.5;
            let radius = size * 0.35;
            macroquad::shapes::draw_circle(center_x, center_y, radius, to_macroquad_color(body));
            macroquad::shapes::draw_circle_lines(
                center_x,
                center_y,
                radius,
                (size * 0.06).max(1.0),
                to_macroquad_color(body.darken(0.5)),
            );
            if carrying {
                macroquad::shapes::draw_circle(
                    x + size * 0.7,
                    y + size * 0.3,
                    size * 0.14,
                    to_macroquad_color(Color::from_rgb_u8(255, 220, 140)),
                );
            }
        }
        CellVisual::BaseMarker { color } => {
            let center_x = x + size * 0.5;
            let top = macroquad::math::Vec2::new(center_x, y + size * 0.1);
            let right = macroquad::math::Vec2::new(x + size * 0.9, y + size * 0.5);
            let bottom = macroquad::math::Vec2::new(center_x, y + size * 0.9);
            let left = macroquad::math::Vec2::new(x + size * 0.1, y + size * 0.5);
            let fill = to_macroquad_color(color);
            macroquad::shapes::draw_triangle(top, right, bottom, fill);
            macroquad::shapes::draw_triangle(top, bottom, left, fill);
        }
        CellVisual::FoodPile { amount, color } => {
            let side = food_pile_side(amount, size);
            let offset = (size - side) * 0.5;
            macroquad::shapes::draw_rectangle(
                x + offset,
                y + offset,
                side,
                side,
                to_macroquad_color(color),
            );
            macroquad::shapes::draw_rectangle_lines(
                x + offset,
                y + offset,
                side,
                side,
                (size * 0.05).max(1.0),
                to_macroquad_color(color.darken(0.4)),
            );
        }
    }
}

/// Side length of the square drawn for a food pile, growing with the amount.
fn food_pile_side(amount: u8, cell_size: f32) -> f32 {
    let fraction = 0.3 + 0.6 * f32::from(amount.min(9)) / 9.0;
    cell_size * fraction
}

fn draw_tooltip(tooltip: &TooltipPresentation, scene: &Scene) {
    let font_size = 16.0;
    let line_height = font_size + 4.0;
    let padding = 6.0;

    let width = tooltip
        .lines
        .iter()
        .map(|line| macroquad::text::measure_text(line, None, font_size as u16, 1.0).width)
        .fold(0.0_f32, f32::max)
        + padding * 2.0;
    let height = tooltip.lines.len() as f32 * line_height + padding * 2.0;

    let anchor_x = (tooltip.anchor.column() as f32 + 1.0) * scene.cell_size;
    let anchor_y = scene.top_bar_height() + (tooltip.anchor.row() as f32 + 1.0) * scene.cell_size;
    let (x, y) = clamp_tooltip_origin(
        anchor_x,
        anchor_y,
        width,
        height,
        scene.pixel_width(),
        scene.pixel_height(),
    );

    macroquad::shapes::draw_rectangle(
        x,
        y,
        width,
        height,
        macroquad::color::Color::new(0.0, 0.0, 0.0, 0.75),
    );

    for (index, line) in tooltip.lines.iter().enumerate() {
        macroquad::text::draw_text(
            line,
            x + padding,
            y + padding + (index as f32 + 0.8) * line_height,
            font_size,
            macroquad::color::WHITE,
        );
    }
}

/// Keeps the tooltip box inside the window, flipping to the other side of
/// the anchor cell when it would overflow.
fn clamp_tooltip_origin(
    anchor_x: f32,
    anchor_y: f32,
    width: f32,
    height: f32,
    window_width: f32,
    window_height: f32,
) -> (f32, f32) {
    let mut x = anchor_x;
    let mut y = anchor_y;
    if x + width > window_width {
        x = (anchor_x - width).max(0.0);
    }
    if y + height > window_height {
        y = (anchor_y - height).max(0.0);
    }
    (x, y)
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use antcode_core::GridCoord;
    use antcode_rendering::{team_band_color, CellPresentation, Scene, TopBarPresentation};

    fn scene(columns: u32, rows: u32, cell_size: f32, top_bar: bool) -> Scene {
        let cells = vec![
            CellPresentation {
                fill: None,
                label: None,
                visual: None,
                bordered: true,
            };
            (columns * rows) as usize
        ];
        let top_bar = top_bar.then(|| TopBarPresentation {
            north_score: 0,
            south_score: 0,
            step_counter: String::from("Step 1 / 1"),
            north_band: team_band_color(antcode_core::Team::North),
            south_band: team_band_color(antcode_core::Team::South),
        });
        Scene {
            columns,
            rows,
            cell_size,
            cells,
            checkered_ground: false,
            top_bar,
            hovered: None,
            tooltip: None,
        }
    }

    #[test]
    fn frame_input_reports_the_cell_under_the_cursor() {
        let scene = scene(5, 3, 20.0, true);

        let input = frame_input_at(&scene, Vec2::new(45.0, 55.0));
        assert_eq!(input.cursor_cell, Some(GridCoord::new(2, 1)));

        let outside = frame_input_at(&scene, Vec2::new(45.0, 5.0));
        assert_eq!(outside.cursor_cell, None);
    }

    #[test]
    fn checker_colors_alternate() {
        assert_eq!(checker_color(0, 0), checker_color(2, 0));
        assert_eq!(checker_color(0, 0), checker_color(1, 1));
        assert_ne!(checker_color(0, 0), checker_color(1, 0));
        assert_ne!(checker_color(0, 0), checker_color(0, 1));
    }

    #[test]
    fn food_piles_grow_with_the_remaining_amount() {
        let small = food_pile_side(1, 30.0);
        let large = food_pile_side(9, 30.0);
        assert!(small < large);
        assert!(large <= 30.0);
        // Amounts above the encodable range saturate.
        assert_eq!(food_pile_side(12, 30.0), large);
    }

    #[test]
    fn tooltips_flip_instead_of_overflowing_the_window() {
        let (x, y) = clamp_tooltip_origin(180.0, 100.0, 60.0, 40.0, 200.0, 200.0);
        assert_eq!((x, y), (120.0, 100.0));

        let (x, y) = clamp_tooltip_origin(100.0, 190.0, 60.0, 40.0, 200.0, 200.0);
        assert_eq!((x, y), (100.0, 150.0));

        let (x, y) = clamp_tooltip_origin(50.0, 50.0, 60.0, 40.0, 200.0, 200.0);
        assert_eq!((x, y), (50.0, 50.0));
    }
}
