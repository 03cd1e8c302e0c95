/*!
 * Whole-word, casing-preserving substitution.
 *
 * A `Substituter` finds every whole-word occurrence of a target word, with
 * an optional single-character plural suffix, and replaces it with the
 * replacement word re-cased to mimic the text it replaces:
 *
 * - `BALAKLAVA` becomes `BAKLAVA`
 * - `balaklava` becomes `baklava`
 * - `Balaklavas` becomes `Baklavas`
 * - anything irregular (`bAlAklava`) becomes the lowercase canonical form
 */

use log::trace;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::ops::Range;

use crate::app_config::Config;
use crate::errors::ConfigError;

/// Engine built from the default configuration
static DEFAULT_SUBSTITUTER: Lazy<Substituter> = Lazy::new(|| {
    Config::default()
        .substituter()
        .expect("Invalid default substitution config")
});

/// Shared engine for the default word pair
pub fn default_substituter() -> &'static Substituter {
    &DEFAULT_SUBSTITUTER
}

/// Substitute using the default word pair (`balaklava` → `baklava`)
pub fn substitute(text: &str) -> Cow<'_, str> {
    DEFAULT_SUBSTITUTER.substitute(text)
}

/// Casing style observed on a matched word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasingStyle {
    /// Every letter is uppercase
    Upper,
    /// Every letter is lowercase
    Lower,
    /// Uppercase first character, lowercase remainder
    Capitalized,
    /// None of the above
    Irregular,
}

impl CasingStyle {
    /// Infer the casing style of `text`, checked in precedence order
    pub fn infer(text: &str) -> Self {
        let letters = || text.chars().filter(|c| c.is_alphabetic());
        if letters().all(char::is_uppercase) {
            return Self::Upper;
        }
        if letters().all(char::is_lowercase) {
            return Self::Lower;
        }

        let mut chars = text.chars();
        let first_upper = chars.next().is_some_and(char::is_uppercase);
        let rest_lower = chars.filter(|c| c.is_alphabetic()).all(char::is_lowercase);
        if first_upper && rest_lower {
            return Self::Capitalized;
        }

        Self::Irregular
    }

    /// Re-case a lowercase canonical word in this style
    pub fn apply(self, canonical: &str) -> String {
        match self {
            Self::Upper => canonical.to_uppercase(),
            Self::Lower => canonical.to_lowercase(),
            Self::Capitalized => {
                let mut chars = canonical.chars();
                match chars.next() {
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect(),
                    None => String::new(),
                }
            }
            Self::Irregular => canonical.to_string(),
        }
    }
}

/// A single whole-word match inside one text payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordMatch {
    /// Byte span of the match in the scanned text
    pub span: Range<usize>,
    /// Matched text, plural suffix included
    pub text: String,
    /// Whether the plural suffix was present
    pub plural: bool,
}

/// Matcher/replacer for one target/replacement word pair
#[derive(Debug, Clone)]
pub struct Substituter {
    pattern: Regex,
    target: String,
    replacement: String,
    suffix: char,
}

impl Substituter {
    /// Build a substituter; fails if the words are not single words, the
    /// suffix is not a letter, or the replacement would match the pattern
    pub fn new(target: &str, replacement: &str, suffix: char) -> Result<Self, ConfigError> {
        validate_word("target word", target)?;
        validate_word("replacement word", replacement)?;
        if !suffix.is_alphabetic() {
            return Err(ConfigError::InvalidSuffix(suffix));
        }

        let pattern = Regex::new(&format!(
            r"(?i)\b{}(?P<plural>{})?\b",
            regex::escape(target),
            regex::escape(&suffix.to_string())
        ))?;

        let substituter = Self {
            pattern,
            target: target.to_lowercase(),
            replacement: replacement.to_lowercase(),
            suffix: suffix.to_lowercase().next().unwrap_or(suffix),
        };

        let singular = substituter.canonical_replacement(false);
        let plural = substituter.canonical_replacement(true);
        if substituter.pattern.is_match(&singular) || substituter.pattern.is_match(&plural) {
            return Err(ConfigError::NonIdempotent {
                target: target.to_string(),
                replacement: replacement.to_string(),
            });
        }

        Ok(substituter)
    }

    /// Lowercase target word
    pub fn target_word(&self) -> &str {
        &self.target
    }

    /// Lowercase replacement word
    pub fn replacement_word(&self) -> &str {
        &self.replacement
    }

    /// Plural suffix character
    pub fn plural_suffix(&self) -> char {
        self.suffix
    }

    /// Check whether `text` contains at least one match
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// List every match in `text`, in order
    pub fn find_matches(&self, text: &str) -> Vec<WordMatch> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                Some(WordMatch {
                    span: whole.range(),
                    text: whole.as_str().to_string(),
                    plural: caps.name("plural").is_some(),
                })
            })
            .collect()
    }

    /// Replace every match in `text`; returns `Cow::Borrowed` when nothing matched
    pub fn substitute<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if text.is_empty() {
            return Cow::Borrowed(text);
        }
        self.pattern
            .replace_all(text, |caps: &Captures| self.replacement_for(caps))
    }

    fn replacement_for(&self, caps: &Captures) -> String {
        let matched = caps.get(0).map_or("", |m| m.as_str());
        let canonical = self.canonical_replacement(caps.name("plural").is_some());
        let replaced = CasingStyle::infer(matched).apply(&canonical);
        trace!("Replacing '{}' with '{}'", matched, replaced);
        replaced
    }

    fn canonical_replacement(&self, plural: bool) -> String {
        let mut canonical = self.replacement.clone();
        if plural {
            canonical.push(self.suffix);
        }
        canonical
    }
}

fn validate_word(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::EmptyWord { field });
    }
    if !value.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(ConfigError::InvalidWord {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}
