//! Full-screen message presenter for handheld UI shells.
//!
//! Shows one wrapped message with optional button hints, a countdown and a
//! hardware status group, then exits with a code describing how the user
//! (or the timeout) dismissed it. Shell scripts branch on that code.
//!
//! The engine is split from the hardware by the [`platform::Platform`]
//! trait:
//!   - `platform::desktop`  - framebuffer + terminal keyboard (feature `desktop`)
//!   - `platform::headless` - scripted input, recorded draw calls (tests)
//!
//! Usage: `cargo test` runs everything on the host.

pub mod cli;
pub mod config;
pub mod error;
pub mod exit_code;
pub mod fonts;
pub mod interrupt;
pub mod logging;
pub mod platform;
pub mod session;
pub mod ui;

pub use config::PresenterConfig;
pub use error::{ConfigError, PlatformError};
pub use exit_code::ExitCode;
