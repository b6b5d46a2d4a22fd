#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Persistent viewer configuration for the Antcode replay viewer.
//!
//! Options are a fixed registry of typed keys with defaults, descriptions
//! and valid ranges. Values persist to a TOML file; loading tolerates a
//! missing or corrupt file by falling back to defaults key by key, and
//! `set` optionally re-persists the store when `autoSave` is enabled.

use std::{fmt, fs, io, ops::RangeInclusive, path::PathBuf};

use thiserror::Error;

/// Typed value held by a configuration option.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionValue {
    /// Boolean flag.
    Bool(bool),
    /// Integer quantity, possibly constrained to a range.
    Int(i64),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
        }
    }
}

impl OptionValue {
    /// Human-readable name of the value's type, as shown by `config`.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
        }
    }
}

/// Declaration of a single configuration option.
struct OptionSpec {
    name: &'static str,
    description: &'static str,
    default: OptionValue,
    range: Option<RangeInclusive<i64>>,
}

/// Registry of every option the viewer understands, in display order.
const OPTIONS: &[OptionSpec] = &[
    OptionSpec {
        name: "pauseOnStep",
        description:
            "Pause the simulation instantly if the user manually steps forward or backward.",
        default: OptionValue::Bool(true),
        range: None,
    },
    OptionSpec {
        name: "stepsPerSecond",
        description:
            "How many times the simulation's map will advance to the next step per second.",
        default: OptionValue::Int(5),
        range: Some(1..=60),
    },
    OptionSpec {
        name: "cellSize",
        description: "How many pixels tall and wide each map cell will be.",
        default: OptionValue::Int(30),
        range: Some(4..=128),
    },
    OptionSpec {
        name: "autoSave",
        description: "Auto-save the simulation configuration when modifying settings.",
        default: OptionValue::Bool(true),
        range: None,
    },
    OptionSpec {
        name: "stopOnLastStep",
        description: "Instantly pause the simulation when the last step is reached.",
        default: OptionValue::Bool(true),
        range: None,
    },
    OptionSpec {
        name: "fancyGraphics",
        description: "Whether plain colors or detailed graphics are used to render certain cells.",
        default: OptionValue::Bool(false),
        range: None,
    },
    OptionSpec {
        name: "showTopBar",
        description:
            "Show or hide the panel containing key game details such as step number and team scores.",
        default: OptionValue::Bool(true),
        range: None,
    },
    OptionSpec {
        name: "hoverOverlay",
        description: "Highlight the map cell currently under the mouse cursor.",
        default: OptionValue::Bool(true),
        range: None,
    },
    OptionSpec {
        name: "tooltips",
        description: "On-hover cell annotations: 0 = off, 1 = compact, 2 = detailed.",
        default: OptionValue::Int(1),
        range: Some(0..=2),
    },
    OptionSpec {
        name: "foodpileInfo",
        description:
            "Food pile display: 0 = none, 1 = background fill, 2 = amount label, 3 = both.",
        default: OptionValue::Int(3),
        range: Some(0..=3),
    },
    OptionSpec {
        name: "antInfo",
        description: "Ant display: 0 = none, 1 = background fill, 2 = player label, 3 = both.",
        default: OptionValue::Int(3),
        range: Some(0..=3),
    },
];

fn spec_for(name: &str) -> Option<&'static OptionSpec> {
    OPTIONS.iter().find(|spec| spec.name == name)
}

/// How on-hover tooltips should be rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TooltipMode {
    /// No tooltip is drawn.
    Off,
    /// A one-line description of the hovered cell.
    Compact,
    /// The one-line description plus coordinates and amounts.
    Detailed,
}

impl TooltipMode {
    fn from_int(value: i64) -> Self {
        match value {
            1 => Self::Compact,
            2 => Self::Detailed,
            _ => Self::Off,
        }
    }
}

/// Display policy for a category of cell overlays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InfoMode {
    /// Neither fill nor label is drawn.
    Hidden,
    /// Only the colored background fill is drawn.
    Fill,
    /// Only the identifying text label is drawn.
    Label,
    /// Both the fill and the label are drawn.
    Full,
}

impl InfoMode {
    fn from_int(value: i64) -> Self {
        match value {
            1 => Self::Fill,
            2 => Self::Label,
            3 => Self::Full,
            _ => Self::Hidden,
        }
    }

    /// Whether the colored background fill should be drawn.
    #[must_use]
    pub const fn fill_enabled(self) -> bool {
        matches!(self, Self::Fill | Self::Full)
    }

    /// Whether the identifying label should be drawn.
    #[must_use]
    pub const fn label_enabled(self) -> bool {
        matches!(self, Self::Label | Self::Full)
    }
}

/// Outcome of a successful `set`, including any non-fatal persistence failure.
#[derive(Debug)]
pub struct AppliedUpdate {
    /// Canonical name of the option that changed.
    pub key: &'static str,
    /// Value now held by the option.
    pub value: OptionValue,
    /// Description of the auto-save failure, when persistence was attempted
    /// and failed. The in-memory update still took effect.
    pub save_failure: Option<String>,
}

/// Typed, persistent key-value store for viewer options.
#[derive(Debug)]
pub struct Settings {
    path: PathBuf,
    values: Vec<(&'static str, OptionValue)>,
}

impl Settings {
    /// Creates a store holding every option's default value.
    #[must_use]
    pub fn with_defaults(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            values: OPTIONS.iter().map(|spec| (spec.name, spec.default)).collect(),
        }
    }

    /// Loads the store from its file, falling back to defaults when the file
    /// is missing or corrupt. Individually invalid keys fall back on their
    /// own while the rest of the file is honored.
    #[must_use]
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let mut settings = Self::with_defaults(path);
        if let Ok(contents) = fs::read_to_string(&settings.path) {
            settings.apply_file_contents(&contents);
        }
        settings
    }

    /// Persists the store to its file as TOML.
    pub fn save(&self) -> Result<(), SettingsError> {
        fs::write(&self.path, self.render_file()).map_err(|source| SettingsError::Io {
            path: self.path.display().to_string(),
            source,
        })
    }

    /// Returns the value held by the exact canonical key, if one exists.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<OptionValue> {
        self.values
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| *value)
    }

    /// Updates an option from console input, validating type and range.
    ///
    /// The key is resolved with [`Settings::resolve_key`], so close
    /// misspellings are accepted. On failure the prior value is retained.
    pub fn set_from_str(&mut self, key: &str, raw: &str) -> Result<AppliedUpdate, SettingsError> {
        let canonical = self.resolve_key(key)?;
        let spec = spec_for(canonical).unwrap_or(&OPTIONS[0]);

        let value = match spec.default {
            OptionValue::Bool(_) => match raw {
                "true" => OptionValue::Bool(true),
                "false" => OptionValue::Bool(false),
                _ => {
                    return Err(SettingsError::InvalidValue {
                        key: canonical,
                        expected: "boolean",
                        value: raw.to_owned(),
                    })
                }
            },
            OptionValue::Int(_) => {
                let parsed = raw.parse().map_err(|_| SettingsError::InvalidValue {
                    key: canonical,
                    expected: "integer",
                    value: raw.to_owned(),
                })?;
                OptionValue::Int(parsed)
            }
        };

        self.set(canonical, value)
    }

    /// Updates an option with an already-typed value, validating the range.
    pub fn set(&mut self, key: &str, value: OptionValue) -> Result<AppliedUpdate, SettingsError> {
        let canonical = self.resolve_key(key)?;
        let spec = spec_for(canonical).unwrap_or(&OPTIONS[0]);

        match (spec.default, value) {
            (OptionValue::Bool(_), OptionValue::Bool(_)) => {}
            (OptionValue::Int(_), OptionValue::Int(int)) => {
                if let Some(range) = &spec.range {
                    if !range.contains(&int) {
                        return Err(SettingsError::OutOfRange {
                            key: canonical,
                            value: int,
                            min: *range.start(),
                            max: *range.end(),
                        });
                    }
                }
            }
            (expected, provided) => {
                return Err(SettingsError::InvalidValue {
                    key: canonical,
                    expected: expected.type_name(),
                    value: provided.to_string(),
                })
            }
        }

        if let Some(slot) = self.values.iter_mut().find(|(name, _)| *name == canonical) {
            slot.1 = value;
        }

        let save_failure = if self.auto_save() {
            self.save().err().map(|error| error.to_string())
        } else {
            None
        };

        Ok(AppliedUpdate {
            key: canonical,
            value,
            save_failure,
        })
    }

    /// Resolves possibly-misspelled user input to a canonical option name.
    ///
    /// Exact matches win; otherwise keys are ranked by similarity and the
    /// best candidate is accepted unless no candidate stands out.
    pub fn resolve_key(&self, query: &str) -> Result<&'static str, SettingsError> {
        if let Some(spec) = spec_for(query) {
            return Ok(spec.name);
        }

        let mut scores: Vec<(&'static str, f64)> = OPTIONS
            .iter()
            .map(|spec| (spec.name, similarity(query, spec.name)))
            .collect();
        scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let best = scores[0].1;
        let worst = scores[scores.len() - 1].1;
        // A lone weak match or an undifferentiated field of weak matches is
        // no match; unrelated words score around 0.3-0.4 under this metric.
        if best < 0.5 || (best - worst < 0.1 && best < 0.6) {
            return Err(SettingsError::UnknownOption {
                query: query.to_owned(),
            });
        }

        Ok(scores[0].0)
    }

    /// Iterates over every option in display order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, OptionValue, &'static str)> + '_ {
        self.values.iter().map(|(name, value)| {
            let description = spec_for(name).map(|spec| spec.description).unwrap_or("");
            (*name, *value, description)
        })
    }

    /// One-line description of an option, for the `config` command.
    #[must_use]
    pub fn description(&self, key: &str) -> Option<&'static str> {
        spec_for(key).map(|spec| spec.description)
    }

    /// Whether manual stepping should pause playback.
    #[must_use]
    pub fn pause_on_step(&self) -> bool {
        self.bool_value("pauseOnStep")
    }

    /// Timed playback rate in steps per second.
    #[must_use]
    pub fn steps_per_second(&self) -> u32 {
        self.int_value("stepsPerSecond").max(1) as u32
    }

    /// Edge length of a rendered map cell in pixels.
    #[must_use]
    pub fn cell_size(&self) -> u32 {
        self.int_value("cellSize").max(1) as u32
    }

    /// Whether `set` re-persists the store automatically.
    #[must_use]
    pub fn auto_save(&self) -> bool {
        self.bool_value("autoSave")
    }

    /// Whether reaching the final step pauses playback.
    #[must_use]
    pub fn stop_on_last_step(&self) -> bool {
        self.bool_value("stopOnLastStep")
    }

    /// Whether detailed cell graphics are drawn instead of flat fills.
    #[must_use]
    pub fn fancy_graphics(&self) -> bool {
        self.bool_value("fancyGraphics")
    }

    /// Whether the score/step panel is drawn above the map.
    #[must_use]
    pub fn show_top_bar(&self) -> bool {
        self.bool_value("showTopBar")
    }

    /// Whether the hovered cell is highlighted.
    #[must_use]
    pub fn hover_overlay(&self) -> bool {
        self.bool_value("hoverOverlay")
    }

    /// Tooltip rendering policy.
    #[must_use]
    pub fn tooltips(&self) -> TooltipMode {
        TooltipMode::from_int(self.int_value("tooltips"))
    }

    /// Food pile display policy.
    #[must_use]
    pub fn foodpile_info(&self) -> InfoMode {
        InfoMode::from_int(self.int_value("foodpileInfo"))
    }

    /// Ant display policy.
    #[must_use]
    pub fn ant_info(&self) -> InfoMode {
        InfoMode::from_int(self.int_value("antInfo"))
    }

    fn bool_value(&self, key: &str) -> bool {
        match self.get(key) {
            Some(OptionValue::Bool(value)) => value,
            _ => matches!(spec_for(key).map(|spec| spec.default), Some(OptionValue::Bool(true))),
        }
    }

    fn int_value(&self, key: &str) -> i64 {
        match self.get(key) {
            Some(OptionValue::Int(value)) => value,
            _ => match spec_for(key).map(|spec| spec.default) {
                Some(OptionValue::Int(value)) => value,
                _ => 0,
            },
        }
    }

    /// Applies persisted contents, keeping defaults for keys that are
    /// missing, mistyped or out of range.
    fn apply_file_contents(&mut self, contents: &str) {
        let Ok(table) = contents.parse::<toml::Table>() else {
            return;
        };

        for spec in OPTIONS {
            let Some(raw) = table.get(spec.name) else {
                continue;
            };
            let candidate = match (spec.default, raw) {
                (OptionValue::Bool(_), toml::Value::Boolean(value)) => OptionValue::Bool(*value),
                (OptionValue::Int(_), toml::Value::Integer(value)) => OptionValue::Int(*value),
                _ => continue,
            };
            if let OptionValue::Int(int) = candidate {
                if let Some(range) = &spec.range {
                    if !range.contains(&int) {
                        continue;
                    }
                }
            }
            if let Some(slot) = self.values.iter_mut().find(|(name, _)| *name == spec.name) {
                slot.1 = candidate;
            }
        }
    }

    /// Renders the store as the TOML document written by [`Settings::save`].
    fn render_file(&self) -> String {
        let mut table = toml::Table::new();
        for (name, value) in &self.values {
            let toml_value = match value {
                OptionValue::Bool(flag) => toml::Value::Boolean(*flag),
                OptionValue::Int(int) => toml::Value::Integer(*int),
            };
            let _previous = table.insert((*name).to_owned(), toml_value);
        }
        toml::to_string(&table).unwrap_or_default()
    }
}

/// Ratio in `0.0..=1.0` expressing how similar two strings are.
///
/// Case-insensitive longest-common-subsequence ratio. Good enough to rank
/// option names against a misspelled query.
fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_ascii_lowercase().chars().collect();
    let b: Vec<char> = b.to_ascii_lowercase().chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];
    for &ca in &a {
        for (j, &cb) in b.iter().enumerate() {
            current[j + 1] = if ca == cb {
                previous[j] + 1
            } else {
                previous[j + 1].max(current[j])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }

    let lcs = previous[b.len()];
    (2.0 * lcs as f64) / (a.len() + b.len()) as f64
}

/// Errors surfaced by the configuration store.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The queried name resolved to no known option.
    #[error("no configuration option matches '{query}'")]
    UnknownOption {
        /// Name as typed by the user.
        query: String,
    },
    /// The provided value did not parse as the option's declared type.
    #[error("expected a {expected} value for '{key}', got '{value}'")]
    InvalidValue {
        /// Canonical option name.
        key: &'static str,
        /// Expected type name.
        expected: &'static str,
        /// Rejected input.
        value: String,
    },
    /// The provided integer fell outside the option's valid range.
    #[error("value {value} for '{key}' is outside the valid range {min}..={max}")]
    OutOfRange {
        /// Canonical option name.
        key: &'static str,
        /// Rejected value.
        value: i64,
        /// Lower bound of the valid range.
        min: i64,
        /// Upper bound of the valid range.
        max: i64,
    },
    /// The settings file could not be written.
    #[error("could not persist settings to {path}: {source}")]
    Io {
        /// Location of the settings file.
        path: String,
        /// Underlying filesystem error.
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::{InfoMode, OptionValue, Settings, SettingsError, TooltipMode};
    use std::path::PathBuf;

    fn scratch_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("antcode-settings-{}-{tag}.toml", std::process::id()))
    }

    fn in_memory() -> Settings {
        // Point at a throwaway path and disable autoSave so unit tests never
        // touch the filesystem.
        let mut settings = Settings::with_defaults(scratch_path("mem"));
        let _ = settings
            .set("autoSave", OptionValue::Bool(false))
            .expect("autoSave accepts booleans");
        settings
    }

    #[test]
    fn defaults_match_the_documented_table() {
        let settings = Settings::with_defaults(scratch_path("defaults"));
        assert!(settings.pause_on_step());
        assert_eq!(settings.steps_per_second(), 5);
        assert_eq!(settings.cell_size(), 30);
        assert!(settings.auto_save());
        assert!(settings.stop_on_last_step());
        assert!(!settings.fancy_graphics());
        assert!(settings.show_top_bar());
        assert!(settings.hover_overlay());
        assert_eq!(settings.tooltips(), TooltipMode::Compact);
        assert_eq!(settings.foodpile_info(), InfoMode::Full);
        assert_eq!(settings.ant_info(), InfoMode::Full);
    }

    #[test]
    fn set_updates_the_stored_value() {
        let mut settings = in_memory();
        let update = settings
            .set("cellSize", OptionValue::Int(42))
            .expect("in-range update succeeds");
        assert_eq!(update.key, "cellSize");
        assert_eq!(settings.cell_size(), 42);
        assert!(update.save_failure.is_none());
    }

    #[test]
    fn out_of_range_value_is_rejected_and_prior_value_retained() {
        let mut settings = in_memory();
        let error = settings
            .set("tooltips", OptionValue::Int(5))
            .expect_err("tooltips=5 must be rejected");
        assert!(matches!(
            error,
            SettingsError::OutOfRange {
                key: "tooltips",
                value: 5,
                ..
            }
        ));
        assert_eq!(settings.tooltips(), TooltipMode::Compact);
    }

    #[test]
    fn mistyped_value_is_rejected() {
        let mut settings = in_memory();
        let error = settings
            .set_from_str("fancyGraphics", "7")
            .expect_err("booleans reject integers");
        assert!(matches!(error, SettingsError::InvalidValue { .. }));
        assert!(!settings.fancy_graphics());
    }

    #[test]
    fn unknown_option_is_rejected_without_mutation() {
        let mut settings = in_memory();
        let error = settings
            .set_from_str("windowTitle", "true")
            .expect_err("unknown keys must be rejected");
        assert!(matches!(error, SettingsError::UnknownOption { .. }));
    }

    #[test]
    fn misspelled_keys_resolve_to_the_closest_option() {
        let settings = in_memory();
        assert_eq!(
            settings.resolve_key("stepspersec").expect("close match"),
            "stepsPerSecond"
        );
        assert_eq!(
            settings.resolve_key("fancygraphics").expect("case-folded match"),
            "fancyGraphics"
        );
        assert!(settings.resolve_key("q").is_err());
    }

    #[test]
    fn set_from_str_parses_booleans_and_integers() {
        let mut settings = in_memory();
        let _ = settings
            .set_from_str("showTopBar", "false")
            .expect("boolean parses");
        assert!(!settings.show_top_bar());

        let _ = settings
            .set_from_str("stepsPerSecond", "12")
            .expect("integer parses");
        assert_eq!(settings.steps_per_second(), 12);
    }

    #[test]
    fn corrupt_file_contents_fall_back_to_defaults_per_key() {
        let mut settings = in_memory();
        settings.apply_file_contents(
            "cellSize = 50\ntooltips = 9\nshowTopBar = \"yes\"\nfancyGraphics = true\n",
        );

        assert_eq!(settings.cell_size(), 50);
        assert_eq!(settings.tooltips(), TooltipMode::Compact);
        assert!(settings.show_top_bar());
        assert!(settings.fancy_graphics());
    }

    #[test]
    fn unparseable_file_is_ignored_entirely() {
        let mut settings = in_memory();
        settings.apply_file_contents("= 42 not toml at all [");
        assert_eq!(settings.cell_size(), 30);
    }

    #[test]
    fn rendered_file_round_trips() {
        let mut settings = in_memory();
        let _ = settings
            .set("stepsPerSecond", OptionValue::Int(9))
            .expect("in-range update succeeds");
        let rendered = settings.render_file();

        let mut restored = Settings::with_defaults(scratch_path("roundtrip"));
        restored.apply_file_contents(&rendered);
        assert_eq!(restored.steps_per_second(), 9);
        assert!(!restored.auto_save());
    }

    #[test]
    fn save_and_load_round_trip_through_disk() {
        let path = scratch_path("disk");
        let mut settings = Settings::with_defaults(&path);
        let _ = settings
            .set("autoSave", OptionValue::Bool(false))
            .expect("autoSave accepts booleans");
        let _ = settings
            .set("cellSize", OptionValue::Int(64))
            .expect("in-range update succeeds");
        settings.save().expect("settings persist");

        let restored = Settings::load(&path);
        assert_eq!(restored.cell_size(), 64);
        assert!(!restored.auto_save());

        let _ = std::fs::remove_file(&path);
    }
}
