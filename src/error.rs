use bracket_geometry::prelude::Point;
use thiserror::Error;

/// Why an action could not be carried out.
///
/// `Impossible` carries the text shown to the player; `Blocked` is a silent
/// no-op raised before anything was mutated. Neither ends the session and
/// neither lets the enemies take their turn.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("{0}")]
    Impossible(String),
    #[error("destination {},{} is blocked", .0.x, .0.y)]
    Blocked(Point),
}

impl ActionError {
    pub fn impossible<S: Into<String>>(message: S) -> Self {
        Self::Impossible(message.into())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read key script: {0}")]
    Io(#[from] std::io::Error),
    #[error("unknown key {token} on script line {line}")]
    UnknownKey { token: String, line: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("no room could be placed in {attempts} attempts")]
    NoRooms { attempts: usize },
}
