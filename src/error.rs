//! Error types for the presenter.
//!
//! `ConfigError` covers everything that can be wrong before the first
//! frame; all of it is fatal and maps to the argument-error exit code.
//! `PlatformError` covers the collaborator backends.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::ui::buttons::{Button, Intent};

/// Invalid or unusable configuration, detected before entering the loop.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `--message` was absent, empty or whitespace only.
    #[error("No message provided")]
    MissingMessage,

    /// Message exceeds the accepted length.
    #[error("message is {len} bytes, the limit is {max}")]
    MessageTooLong { len: usize, max: usize },

    /// A button label exceeds the accepted length.
    #[error("{intent} text is {len} bytes, the limit is {max}")]
    LabelTooLong { intent: Intent, len: usize, max: usize },

    /// Button name other than A, B, X or Y.
    #[error("Invalid {intent} button provided: {value:?}")]
    InvalidButton { intent: Intent, value: String },

    /// One physical button bound to two intents.
    #[error("{0} button cannot be assigned to more than one button")]
    ButtonConflict(Button),

    /// Font path does not exist or cannot be read.
    #[error("Invalid font path provided: {path}")]
    FontUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Font file was read but is not a usable face.
    #[error("Failed to open font {path}: {reason}")]
    FontUnopenable { path: PathBuf, reason: &'static str },

    /// Font size outside the supported range.
    #[error("font size {size} is outside {min}..={max}")]
    InvalidFontSize { size: u32, min: u32, max: u32 },
}

/// Failure inside a platform backend.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The framebuffer device could not be opened.
    #[error("failed to open framebuffer {path}")]
    FramebufferOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing a frame to the framebuffer failed.
    #[error("failed to present frame")]
    Present(#[source] io::Error),

    /// Terminal input could not be configured.
    #[error("failed to configure terminal input")]
    Terminal(#[source] io::Error),
}
