//! Viewer state and console request dispatch.

use std::path::PathBuf;
use std::process::{Child, Command};

use antcode_core::{ConsoleRequest, TransportState};
use antcode_replay::GameLog;
use antcode_settings::Settings;
use antcode_system_playback::{Playback, PlaybackPolicy};

/// Reply printed when a transport or query command arrives with no game loaded.
const NO_MAP_LOADED: &str = "No map is currently loaded";

/// Everything the frame loop owns: the loaded replay, the playback machine,
/// the settings store, and the generator launch configuration.
pub(crate) struct Viewer {
    settings: Settings,
    log: Option<GameLog>,
    playback: Playback,
    generator: PathBuf,
    generators: Vec<Child>,
    quit_requested: bool,
}

impl Viewer {
    pub(crate) fn new(settings: Settings, generator: PathBuf) -> Self {
        Self {
            settings,
            log: None,
            playback: Playback::new(),
            generator,
            generators: Vec::new(),
            quit_requested: false,
        }
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(crate) fn log(&self) -> Option<&GameLog> {
        self.log.as_ref()
    }

    pub(crate) fn playback(&self) -> &Playback {
        &self.playback
    }

    pub(crate) fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Transport policy captured from the current settings.
    pub(crate) fn policy(&self) -> PlaybackPolicy {
        PlaybackPolicy {
            pause_on_step: self.settings.pause_on_step(),
            stop_on_last_step: self.settings.stop_on_last_step(),
            steps_per_second: self.settings.steps_per_second(),
        }
    }

    /// Advances timed playback by the frame delta and reaps any generator
    /// processes that have exited.
    pub(crate) fn tick(&mut self, dt: std::time::Duration) {
        self.generators
            .retain_mut(|child| matches!(child.try_wait(), Ok(None)));
        let policy = self.policy();
        self.playback.tick(dt, &policy);
    }

    #[cfg(test)]
    fn pending_generators(&self) -> usize {
        self.generators.len()
    }

    /// Saves settings on shutdown, reporting rather than failing.
    pub(crate) fn shutdown(&self) {
        println!("Quitting AntCode");
        if let Err(error) = self.settings.save() {
            eprintln!("Failed to save settings: {error}");
        }
    }

    /// Executes one console request and returns the reply lines to print.
    pub(crate) fn handle(&mut self, request: ConsoleRequest) -> Vec<String> {
        match request {
            ConsoleRequest::Load { path } => self.load(path),
            ConsoleRequest::Generate => self.generate(),
            ConsoleRequest::SetOption { key, value } => self.set_option(&key, &value),
            ConsoleRequest::QueryOption { key } => self.query_option(&key),
            ConsoleRequest::ListOptions => self.list_options(),
            ConsoleRequest::Quit => {
                self.quit_requested = true;
                Vec::new()
            }
            _ if self.log.is_none() => vec![String::from(NO_MAP_LOADED)],
            ConsoleRequest::Toggle => {
                self.playback.toggle();
                vec![self.transport_reply()]
            }
            ConsoleRequest::Play => {
                self.playback.play();
                vec![String::from("Simulation unpaused")]
            }
            ConsoleRequest::Pause => {
                self.playback.pause();
                vec![String::from("Simulation paused")]
            }
            ConsoleRequest::StepForward => {
                let policy = self.policy();
                self.playback.step_forward(&policy);
                vec![self.step_reply()]
            }
            ConsoleRequest::StepBackward => {
                let policy = self.policy();
                self.playback.step_backward(&policy);
                vec![self.step_reply()]
            }
            ConsoleRequest::SkipToStart => {
                let policy = self.policy();
                self.playback.skip_to_start(&policy);
                vec![self.step_reply()]
            }
            ConsoleRequest::SkipToEnd => {
                let policy = self.policy();
                self.playback.skip_to_end(&policy);
                vec![self.step_reply()]
            }
            ConsoleRequest::Steps => vec![self.step_reply()],
            ConsoleRequest::Score => self.score_reply(),
            ConsoleRequest::Winner => {
                let winner = self
                    .log
                    .as_ref()
                    .map(|log| log.winner().to_owned())
                    .unwrap_or_default();
                vec![format!("Winner for this game: {winner}")]
            }
        }
    }

    fn load(&mut self, path: PathBuf) -> Vec<String> {
        match GameLog::load(&path) {
            Ok(log) => {
                self.playback.load(log.len());
                self.log = Some(log);
                vec![format!(
                    "Successfully loaded map from {}",
                    path.display()
                )]
            }
            Err(error) => {
                self.playback.unload();
                self.log = None;
                vec![format!("Error loading maps: {error}")]
            }
        }
    }

    fn generate(&mut self) -> Vec<String> {
        match Command::new(&self.generator).spawn() {
            Ok(child) => {
                self.generators.push(child);
                Vec::new()
            }
            Err(error) => vec![format!(
                "Failed to launch generator '{}': {error}",
                self.generator.display()
            )],
        }
    }

    fn set_option(&mut self, key: &str, value: &str) -> Vec<String> {
        match self.settings.set_from_str(key, value) {
            Ok(update) => {
                let mut lines = vec![format!("Updated '{}' to '{}'", update.key, update.value)];
                if let Some(failure) = update.save_failure {
                    lines.push(format!("Failed to save settings: {failure}"));
                }
                lines
            }
            Err(error) => vec![error.to_string()],
        }
    }

    fn query_option(&self, key: &str) -> Vec<String> {
        match self.settings.resolve_key(key) {
            Ok(canonical) => match self.settings.get(canonical) {
                Some(value) => {
                    let description = self.settings.description(canonical).unwrap_or("");
                    vec![format!("> {canonical}: {value}"), format!("  {description}")]
                }
                None => vec![format!("> {canonical}: <unset>")],
            },
            Err(error) => vec![error.to_string()],
        }
    }

    fn list_options(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for (name, value, description) in self.settings.entries() {
            lines.push(format!("> {name}: {value}"));
            lines.push(format!("  {description}"));
        }
        lines
    }

    fn transport_reply(&self) -> String {
        if self.playback.state() == TransportState::Playing {
            String::from("Simulation unpaused")
        } else {
            String::from("Simulation paused")
        }
    }

    fn step_reply(&self) -> String {
        format!(
            "Step: {} / {}",
            self.playback.index() + 1,
            self.playback.total()
        )
    }

    fn score_reply(&self) -> Vec<String> {
        let Some(round) = self
            .log
            .as_ref()
            .and_then(|log| log.state_at(self.playback.index()))
        else {
            return vec![String::from(NO_MAP_LOADED)];
        };
        vec![
            format!("North Score: {}", round.north_points()),
            format!("South Score: {}", round.south_points()),
        ]
    }
}
