use crate::builtins::EmptySequence;
use custom_error::custom_error;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use strum_macros::{Display, EnumString};

pub static MODE_VAR: &str = "SIMPLE_MODE";
pub static EMPTY_SEQUENCE_VAR: &str = "SIMPLE_EMPTY";

custom_error! {
    #[derive(Clone, PartialEq)]
    pub ConfigError

    UnknownMode{value: String} = "unknown mode '{value}', expected lexer, parser or evaluator",
    UnknownEmptySequence{value: String} = "unknown empty sequence policy '{value}', expected null or empty",
}

/// Which stage of the pipeline the front-end runs.
#[derive(Debug, Default, Display, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Mode {
    Lexer,
    Parser,
    #[default]
    Evaluator,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Config {
    pub mode: Mode,
    pub empty_sequence: EmptySequence,
    /// Program file to run instead of reading from stdin.
    pub file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            env::var(MODE_VAR).ok(),
            env::var(EMPTY_SEQUENCE_VAR).ok(),
            env::args().nth(1),
        )
    }

    pub fn from_values(
        mode: Option<String>,
        empty_sequence: Option<String>,
        file: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mode = match mode {
            Some(value) => {
                Mode::from_str(value.trim()).map_err(|_| ConfigError::UnknownMode { value })?
            }
            None => Mode::default(),
        };
        let empty_sequence = match empty_sequence {
            Some(value) => EmptySequence::from_str(value.trim())
                .map_err(|_| ConfigError::UnknownEmptySequence { value })?,
            None => EmptySequence::default(),
        };

        Ok(Self {
            mode,
            empty_sequence,
            file: file.map(PathBuf::from),
        })
    }
}
