/*!
 * Error types for the baklavify library.
 *
 * The substitution engine itself never fails once it is built; every error
 * here comes from turning user configuration into an engine, or from the
 * file handling done by the command-line front end.
 */

use thiserror::Error;

/// Errors raised while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A configured word was empty
    #[error("The {field} must not be empty")]
    EmptyWord {
        /// Name of the offending field
        field: &'static str,
    },

    /// A configured word contained something other than word characters
    #[error("The {field} '{value}' must be a single word made of letters, digits or underscores")]
    InvalidWord {
        /// Name of the offending field
        field: &'static str,
        /// The rejected value
        value: String,
    },

    /// The plural suffix was not a single letter
    #[error("Plural suffix '{0}' must be a single alphabetic character")]
    InvalidSuffix(char),

    /// The replacement would be matched again by the search pattern
    #[error("Replacement '{replacement}' is itself matched by the target '{target}'")]
    NonIdempotent {
        /// Configured target word
        target: String,
        /// Configured replacement word
        replacement: String,
    },

    /// An exempt tag entry was blank
    #[error("Exempt tag list contains an empty entry")]
    EmptyExemptTag,

    /// The configuration file could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The search pattern failed to compile
    #[error("Failed to build search pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from configuration handling
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
