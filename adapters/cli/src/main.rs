#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Antcode replay viewer.
//!
//! The binary wires the console interpreter, the playback system, and the
//! macroquad window together: a reader thread turns stdin lines into
//! requests, the frame loop executes them and recomposes the scene, and
//! replies are printed before the next prompt appears.

mod console;
mod viewer;

use std::path::PathBuf;
use std::sync::mpsc;

use anyhow::Result;
use clap::Parser;

use antcode_core::{ConsoleRequest, WELCOME_BANNER};
use antcode_rendering::{compose_scene, Color, FrameControl, Presentation, RenderingBackend, SceneView};
use antcode_rendering_macroquad::MacroquadBackend;
use antcode_settings::Settings;

use crate::viewer::Viewer;

/// Graphical replay viewer for Antcode game logs.
#[derive(Debug, Parser)]
#[command(name = "antcode-viewer")]
struct Args {
    /// Replay file to load at startup.
    replay: Option<PathBuf>,

    /// Settings file location.
    #[arg(long, default_value = "settings.toml")]
    settings: PathBuf,

    /// Executable launched by the `generate` command.
    #[arg(long, default_value = "antcode-generate")]
    generator: PathBuf,

    /// Print frame timing metrics once per second.
    #[arg(long)]
    fps: bool,

    /// Render as fast as possible instead of syncing to the display.
    #[arg(long)]
    no_vsync: bool,
}

/// Entry point for the Antcode replay viewer.
fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::load(&args.settings);

    println!("{}", console::SEPARATOR);
    println!("{WELCOME_BANNER}");
    println!("Type \"help\" to see the full list of commands available");
    if settings.fancy_graphics() {
        println!(
            "\nWARNING: Fancy graphics is enabled. Type 'config fancyGraphics false' to disable if you encounter lag."
        );
    }

    let mut viewer = Viewer::new(settings, args.generator);
    if let Some(path) = args.replay {
        for line in viewer.handle(ConsoleRequest::Load { path }) {
            println!("{line}");
        }
    }

    let (request_sender, request_receiver) = mpsc::channel();
    let (ack_sender, ack_receiver) = mpsc::channel();
    let _reader = console::spawn_reader(request_sender, ack_receiver);

    let initial_scene = compose_scene(&SceneView {
        round: viewer
            .log()
            .and_then(|log| log.state_at(viewer.playback().index())),
        step_index: viewer.playback().index(),
        step_total: viewer.playback().total(),
        cursor_cell: None,
        settings: viewer.settings(),
    });

    let presentation = Presentation::new("AntCode", Color::from_rgb_u8(0, 0, 0), initial_scene);
    let backend = MacroquadBackend::new()
        .with_vsync(!args.no_vsync)
        .with_show_fps(args.fps);

    backend.run(presentation, move |dt, input, scene| {
        while let Ok(request) = request_receiver.try_recv() {
            for line in viewer.handle(request) {
                println!("{line}");
            }
            if ack_sender.send(()).is_err() {
                break;
            }
        }

        if viewer.quit_requested() {
            viewer.shutdown();
            return FrameControl::Exit;
        }

        viewer.tick(dt);

        *scene = compose_scene(&SceneView {
            round: viewer
                .log()
                .and_then(|log| log.state_at(viewer.playback().index())),
            step_index: viewer.playback().index(),
            step_total: viewer.playback().total(),
            cursor_cell: input.cursor_cell,
            settings: viewer.settings(),
        });

        FrameControl::Continue
    })
}
