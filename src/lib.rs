/*!
 * # Baklavify - live, casing-preserving word substitution
 *
 * A Rust library that keeps the text of a live document rewritten: every
 * whole-word `balaklava` becomes `baklava`, with the casing of the original
 * word carried over, both in the document as first loaded and in anything
 * inserted or edited afterwards.
 *
 * ## Features
 *
 * - Whole-word, case-insensitive matching with a simple plural suffix
 * - Casing inference (`UPPER`, `lower`, `Capitalized`, irregular)
 * - Exempt regions: scripts, styles, form fields, code blocks and live
 *   editable regions are never touched
 * - Incremental re-scan driven by mutation notifications
 * - Configurable word pair and exempt tag set
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `substitution`: the matcher/replacer and casing rules
 * - `document`: host capability traits and the in-memory `DomTree`
 * - `exemption`: exempt region policy
 * - `scanner`: single text unit processing and subtree scans
 * - `watcher`: lifecycle and mutation handling
 * - `app_config`: Configuration management
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod document;
pub mod errors;
pub mod exemption;
pub mod scanner;
pub mod substitution;
pub mod watcher;

// Re-export main types for easier usage
pub use app_config::Config;
pub use document::{DocumentHost, DomTree, NodeId, ReadyState};
pub use errors::{AppError, ConfigError};
pub use exemption::ExemptionPolicy;
pub use scanner::{Rewriter, ScanReport};
pub use substitution::{CasingStyle, Substituter, WordMatch, substitute};
pub use watcher::{Watcher, WatcherState, WatcherStats};
