//! Console command registry and line parsing.
//!
//! The console is a line-oriented REPL on stdin. Each line is resolved
//! against the command table below; recognised commands become
//! [`ConsoleRequest`] values handed to the frame loop, while `help` and
//! malformed invocations are answered directly on the reader thread.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use antcode_core::ConsoleRequest;

/// Separator line printed between console interactions.
pub(crate) const SEPARATOR: &str =
    "--------------------------------------------------------";

struct CommandSpec {
    name: &'static str,
    aliases: &'static [&'static str],
    short: &'static str,
    long: &'static str,
}

const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "help",
        aliases: &[],
        short: "Display this help message.",
        long: "Displays a list of all available commands with their descriptions, \
               or a specific command's long description and aliases if provided.",
    },
    CommandSpec {
        name: "config",
        aliases: &[],
        short: "Modify simulation settings",
        long: "View, query, or modify the simulation's configuration options. \
               With no arguments, lists every option.  With a key, prints that \
               option's value and description.  With a key and a value, updates \
               the option.  Key names are matched by similarity, so close \
               misspellings still resolve.",
    },
    CommandSpec {
        name: "load",
        aliases: &[],
        short: "Load a new game",
        long: "Load the Antcode game log at the given path.  The file is \
               evaluated for validity; any non-Antcode log is rejected and \
               no game stays loaded.",
    },
    CommandSpec {
        name: "toggle",
        aliases: &[""],
        short: "Toggle the simulation playback state",
        long: "Toggle simulation playback.  If the simulation is currently \
               running, it will be paused, and vice versa.",
    },
    CommandSpec {
        name: "pause",
        aliases: &[],
        short: "Pause the simulation",
        long: "Temporarily stop playback of the simulation by preventing map \
               data from updating.  Functionality of other commands is not \
               affected.",
    },
    CommandSpec {
        name: "play",
        aliases: &[],
        short: "Unpause the simulation",
        long: "Resume playback of the simulation.",
    },
    CommandSpec {
        name: "skip-start",
        aliases: &["ss", "aa"],
        short: "Skip to the start",
        long: "Skip to the very start of the simulation, or in other words, \
               the first step.",
    },
    CommandSpec {
        name: "step-back",
        aliases: &["step-backward", "sb", "a"],
        short: "Step once backward",
        long: "Decrement the step counter and update the map data.",
    },
    CommandSpec {
        name: "step-forward",
        aliases: &["step-front", "step", "sf", "d", "s"],
        short: "Step once forward",
        long: "Increment the step counter and update the map data.",
    },
    CommandSpec {
        name: "skip-end",
        aliases: &["se", "dd"],
        short: "Skip to the end",
        long: "Skip to the very end of the simulation, or in other words, the \
               last step.",
    },
    CommandSpec {
        name: "steps",
        aliases: &[],
        short: "View current steps out of the total",
        long: "Print the step number the simulation is currently on and the \
               total number of steps in the loaded map.",
    },
    CommandSpec {
        name: "score",
        aliases: &[],
        short: "View the current score for each team",
        long: "Print the North and South teams' scores for the current step.",
    },
    CommandSpec {
        name: "winner",
        aliases: &[],
        short: "View the game's winner",
        long: "Print the loaded game's winner.  This value is independent of \
               the current step.",
    },
    CommandSpec {
        name: "generate",
        aliases: &["gen"],
        short: "Generate a new test map",
        long: "Run the external Antcode simulation to generate new games and \
               maps.",
    },
    CommandSpec {
        name: "quit",
        aliases: &["exit"],
        short: "Quit the simulation",
        long: "Save all settings and shut down the program.",
    },
];

fn resolve(token: &str) -> Option<&'static CommandSpec> {
    COMMANDS
        .iter()
        .find(|spec| spec.name == token || spec.aliases.contains(&token))
}

/// Outcome of parsing one console line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ParsedLine {
    /// A request for the frame loop.
    Request(ConsoleRequest),
    /// Help output, optionally for a single command.
    Help(Option<String>),
    /// A message answered directly on the reader thread.
    Message(String),
    /// The command token did not resolve.
    Unknown(String),
}

/// Parses a console line into a request or a locally answered message.
///
/// Matching is case-sensitive, so `PAUSE` is an unknown command. An empty
/// line is the `toggle` alias.
pub(crate) fn parse_line(line: &str) -> ParsedLine {
    let mut tokens = line.split_whitespace();
    let Some(command) = tokens.next() else {
        return ParsedLine::Request(ConsoleRequest::Toggle);
    };
    let args: Vec<&str> = tokens.collect();

    let Some(spec) = resolve(command) else {
        return ParsedLine::Unknown(command.to_owned());
    };

    match spec.name {
        "help" => ParsedLine::Help(args.first().map(|topic| (*topic).to_owned())),
        "load" => match args.first() {
            Some(path) => ParsedLine::Request(ConsoleRequest::Load {
                path: PathBuf::from(path),
            }),
            None => ParsedLine::Message(String::from("Usage: load <path>")),
        },
        "config" => match (args.first(), args.get(1)) {
            (None, _) => ParsedLine::Request(ConsoleRequest::ListOptions),
            (Some(key), None) => ParsedLine::Request(ConsoleRequest::QueryOption {
                key: (*key).to_owned(),
            }),
            (Some(key), Some(value)) => ParsedLine::Request(ConsoleRequest::SetOption {
                key: (*key).to_owned(),
                value: (*value).to_owned(),
            }),
        },
        "toggle" => ParsedLine::Request(ConsoleRequest::Toggle),
        "pause" => ParsedLine::Request(ConsoleRequest::Pause),
        "play" => ParsedLine::Request(ConsoleRequest::Play),
        "skip-start" => ParsedLine::Request(ConsoleRequest::SkipToStart),
        "step-back" => ParsedLine::Request(ConsoleRequest::StepBackward),
        "step-forward" => ParsedLine::Request(ConsoleRequest::StepForward),
        "skip-end" => ParsedLine::Request(ConsoleRequest::SkipToEnd),
        "steps" => ParsedLine::Request(ConsoleRequest::Steps),
        "score" => ParsedLine::Request(ConsoleRequest::Score),
        "winner" => ParsedLine::Request(ConsoleRequest::Winner),
        "generate" => ParsedLine::Request(ConsoleRequest::Generate),
        _ => ParsedLine::Request(ConsoleRequest::Quit),
    }
}

/// Renders the help listing, or one command's long help when a topic is given.
pub(crate) fn help_text(topic: Option<&str>) -> String {
    let Some(topic) = topic else {
        return help_listing();
    };

    let Some(spec) = resolve(topic) else {
        return format!("Command '{topic}' not found.");
    };

    let mut text = format!("{} - {}\n\n{}", spec.name, spec.short, spec.long);
    if !spec.aliases.is_empty() {
        let aliases: Vec<&str> = spec
            .aliases
            .iter()
            .map(|alias| if alias.is_empty() { "<ENTER>" } else { *alias })
            .collect();
        text.push_str(&format!("\n\nAliases: {}", aliases.join(", ")));
    }
    text
}

/// Command names sorted alphabetically, printed two per row.
fn help_listing() -> String {
    let mut names: Vec<&str> = COMMANDS.iter().map(|spec| spec.name).collect();
    names.sort_unstable();
    let column = names.iter().map(|name| name.len()).max().unwrap_or(0) + 5;

    let mut listing = String::from("Available commands\n\n");
    listing.push_str("Type \"help [command]\" to view help for a specific command\n\n");
    for (index, name) in names.iter().enumerate() {
        listing.push_str(&format!("{name:column$}"));
        if (index + 1) % 2 == 0 {
            listing.push('\n');
        }
    }
    if names.len() % 2 != 0 {
        listing.push('\n');
    }
    listing
}

/// Starts the stdin reader thread.
///
/// Requests flow to the frame loop over `requests`; the loop prints its
/// reply and answers on `acks` so the next prompt appears after the
/// response. The thread exits on EOF, after sending `Quit`, or when either
/// channel closes.
pub(crate) fn spawn_reader(
    requests: Sender<ConsoleRequest>,
    acks: Receiver<()>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();

        loop {
            println!("{SEPARATOR}");
            print!("> ");
            if io::stdout().flush().is_err() {
                break;
            }

            let Some(Ok(line)) = lines.next() else {
                break;
            };

            match parse_line(&line) {
                ParsedLine::Help(topic) => println!("{}", help_text(topic.as_deref())),
                ParsedLine::Message(message) => println!("{message}"),
                ParsedLine::Unknown(command) => {
                    println!("Command '{command}' not found.");
                }
                ParsedLine::Request(request) => {
                    let quitting = request == ConsoleRequest::Quit;
                    if requests.send(request).is_err() {
                        break;
                    }
                    if acks.recv().is_err() || quitting {
                        break;
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_lines_are_the_toggle_alias() {
        assert_eq!(parse_line(""), ParsedLine::Request(ConsoleRequest::Toggle));
        assert_eq!(
            parse_line("   "),
            ParsedLine::Request(ConsoleRequest::Toggle)
        );
    }

    #[test]
    fn every_alias_resolves_to_its_command() {
        for (alias, expected) in [
            ("ss", ConsoleRequest::SkipToStart),
            ("aa", ConsoleRequest::SkipToStart),
            ("step-backward", ConsoleRequest::StepBackward),
            ("sb", ConsoleRequest::StepBackward),
            ("a", ConsoleRequest::StepBackward),
            ("step-front", ConsoleRequest::StepForward),
            ("step", ConsoleRequest::StepForward),
            ("sf", ConsoleRequest::StepForward),
            ("d", ConsoleRequest::StepForward),
            ("s", ConsoleRequest::StepForward),
            ("se", ConsoleRequest::SkipToEnd),
            ("dd", ConsoleRequest::SkipToEnd),
            ("gen", ConsoleRequest::Generate),
            ("exit", ConsoleRequest::Quit),
        ] {
            assert_eq!(parse_line(alias), ParsedLine::Request(expected), "{alias}");
        }
    }

    #[test]
    fn command_matching_is_case_sensitive_and_paths_keep_case() {
        assert_eq!(
            parse_line("PAUSE"),
            ParsedLine::Unknown(String::from("PAUSE"))
        );
        assert_eq!(
            parse_line("load /Maps/Game.TXT"),
            ParsedLine::Request(ConsoleRequest::Load {
                path: PathBuf::from("/Maps/Game.TXT"),
            })
        );
    }

    #[test]
    fn unrecognised_commands_are_reported() {
        assert_eq!(
            parse_line("launch"),
            ParsedLine::Unknown(String::from("launch"))
        );
    }

    #[test]
    fn load_without_a_path_prints_usage() {
        assert_eq!(
            parse_line("load"),
            ParsedLine::Message(String::from("Usage: load <path>"))
        );
    }

    #[test]
    fn config_arity_selects_list_query_or_set() {
        assert_eq!(
            parse_line("config"),
            ParsedLine::Request(ConsoleRequest::ListOptions)
        );
        assert_eq!(
            parse_line("config cellSize"),
            ParsedLine::Request(ConsoleRequest::QueryOption {
                key: String::from("cellSize"),
            })
        );
        assert_eq!(
            parse_line("config cellSize 40"),
            ParsedLine::Request(ConsoleRequest::SetOption {
                key: String::from("cellSize"),
                value: String::from("40"),
            })
        );
    }

    #[test]
    fn help_lists_commands_two_per_row() {
        let listing = help_text(None);
        assert!(listing.starts_with("Available commands\n"));
        for spec in COMMANDS {
            assert!(listing.contains(spec.name), "{} missing", spec.name);
        }

        let body_rows: Vec<&str> = listing
            .lines()
            .skip(4)
            .filter(|line| !line.trim().is_empty())
            .collect();
        for row in &body_rows[..body_rows.len() - 1] {
            assert_eq!(row.split_whitespace().count(), 2, "row {row:?}");
        }
    }

    #[test]
    fn help_for_toggle_names_the_enter_alias() {
        let text = help_text(Some("toggle"));
        assert!(text.contains("Aliases: <ENTER>"));

        let unknown = help_text(Some("warp"));
        assert_eq!(unknown, "Command 'warp' not found.");
    }
}
