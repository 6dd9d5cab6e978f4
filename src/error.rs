//! Error types for level generation and configuration.
//!
//! Runtime systems never return these: a missing body or a ray miss is a
//! normal frame, not a failure. Only bad parameters fail, and they fail at
//! generation or load time.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    /// A level needs at least one obstacle block between start and finish.
    EmptyLevel,
    /// The archetype pool to draw obstacles from was empty.
    EmptyTypeSet,
    /// More obstacle blocks than a course can hold.
    TooLong { count: u32, max: u32 },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::EmptyLevel => {
                write!(f, "level block count must be at least 1, got 0")
            }
            LevelError::EmptyTypeSet => {
                write!(f, "cannot draw obstacles from an empty block type set")
            }
            LevelError::TooLong { count, max } => {
                write!(f, "level block count {} exceeds the maximum of {}", count, max)
            }
        }
    }
}

impl std::error::Error for LevelError {}

#[derive(Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    Io(std::io::Error),
    /// The file is not valid TOML for `GameConfig`.
    Parse(toml::de::Error),
    /// The course length would not produce a valid level.
    Level(LevelError),
    /// A tunable is outside the range the game can run with.
    InvalidValue {
        name: &'static str,
        value: f32,
        expected: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config: {}", e),
            ConfigError::Level(e) => write!(f, "config 'blocks_count' rejected: {}", e),
            ConfigError::InvalidValue {
                name,
                value,
                expected,
            } => write!(f, "config '{}' = {} must be {}", name, value, expected),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Level(e) => Some(e),
            ConfigError::InvalidValue { .. } => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<LevelError> for ConfigError {
    fn from(e: LevelError) -> Self {
        ConfigError::Level(e)
    }
}

pub type LevelResult<T> = Result<T, LevelError>;
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        assert!(LevelError::EmptyLevel.to_string().contains("at least 1"));
        assert!(LevelError::EmptyTypeSet.to_string().contains("empty"));

        let err = ConfigError::InvalidValue {
            name: "blocks_count",
            value: 0.0,
            expected: ">= 1",
        };
        assert_eq!(err.to_string(), "config 'blocks_count' = 0 must be >= 1");

        let err = ConfigError::from(LevelError::TooLong { count: 5000, max: 1000 });
        assert!(err.to_string().contains("5000"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
