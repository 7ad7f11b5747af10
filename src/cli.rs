//! Command-line surface.
//!
//! Flags are parsed by clap as plain strings and converted into a
//! validated [`PresenterConfig`] by [`Cli::to_config`]. Button names stay
//! strings until then so that bad values surface as `ConfigError`s with
//! the same wording as every other configuration problem.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::{
    FontConfig, PresenterConfig, DEFAULT_FRAMEBUFFER, FONT_LARGE, MAX_LABEL_BYTES,
    MAX_MESSAGE_BYTES,
};
use crate::error::ConfigError;
use crate::fonts;
use crate::logging::Verbosity;
use crate::ui::buttons::{validate_bindings, Bindings, Button, ButtonBinding, Intent};
use crate::ui::message::{Alignment, DisplayMessage, MessageDeck};

pub const DEFAULT_ACTION_TEXT: &str = "ACTION";
pub const DEFAULT_CONFIRM_TEXT: &str = "SELECT";
pub const DEFAULT_CANCEL_TEXT: &str = "BACK";

#[derive(Parser, Debug)]
#[command(
    name = "minui-presenter",
    version,
    about = "Show a message full-screen and exit with the code of the button pressed"
)]
pub struct Cli {
    #[arg(long, help = "Message to display")]
    pub message: Option<String>,

    #[arg(long, value_enum, default_value_t = Alignment::Middle)]
    pub message_alignment: Alignment,

    #[arg(long, default_value = "", help = "Button for the action intent (A, B, X, Y)")]
    pub action_button: String,
    #[arg(long, default_value = DEFAULT_ACTION_TEXT)]
    pub action_text: String,
    #[arg(long, help = "Accepted for compatibility; the action hint follows --action-button")]
    pub action_show: bool,

    #[arg(long, default_value = "A")]
    pub confirm_button: String,
    #[arg(long, default_value = DEFAULT_CONFIRM_TEXT)]
    pub confirm_text: String,
    #[arg(long)]
    pub confirm_show: bool,

    #[arg(long, default_value = "B")]
    pub cancel_button: String,
    #[arg(long, default_value = DEFAULT_CANCEL_TEXT)]
    pub cancel_text: String,
    #[arg(long)]
    pub cancel_show: bool,

    #[arg(
        long,
        allow_negative_numbers = true,
        help = "Seconds before exiting with the timeout code; negative disables"
    )]
    pub timeout: Option<i64>,
    #[arg(long)]
    pub show_time_left: bool,

    #[arg(long, help = "TrueType/OpenType font file")]
    pub font_default: Option<PathBuf>,
    #[arg(
        long,
        default_value_t = FONT_LARGE,
        help = "Message font size; above 20 needs --font-default"
    )]
    pub font_size_default: u32,

    #[arg(long, help = "Draw the network status and sleep hint")]
    pub show_hardware_group: bool,

    #[arg(long, env = "MINUI_FRAMEBUFFER", default_value = DEFAULT_FRAMEBUFFER)]
    pub framebuffer: PathBuf,

    #[arg(short, long, conflicts_with = "quiet", help = "Debug logging on stderr")]
    pub verbose: bool,
    #[arg(short, long, help = "Disable logging")]
    pub quiet: bool,
}

impl Cli {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.verbose, self.quiet)
    }

    /// Validate every flag and build the session configuration.
    pub fn to_config(&self) -> Result<PresenterConfig, ConfigError> {
        let face = self
            .font_default
            .as_deref()
            .map(fonts::load_face)
            .transpose()?;
        let size = fonts::validate_size(self.font_size_default, face.as_ref())?;

        let bindings = self.bindings()?;
        validate_bindings(&bindings)?;

        let text = self.message.as_deref().unwrap_or_default();
        if text.trim().is_empty() {
            return Err(ConfigError::MissingMessage);
        }
        if text.len() > MAX_MESSAGE_BYTES {
            return Err(ConfigError::MessageTooLong {
                len: text.len(),
                max: MAX_MESSAGE_BYTES,
            });
        }

        Ok(PresenterConfig {
            messages: MessageDeck::single(DisplayMessage::new(text, self.message_alignment)),
            bindings,
            timeout: self.timeout_duration(),
            show_time_left: self.show_time_left,
            show_hardware_group: self.show_hardware_group,
            fonts: FontConfig { face, size },
        })
    }

    fn timeout_duration(&self) -> Option<Duration> {
        let secs = self.timeout?;
        u64::try_from(secs).ok().map(Duration::from_secs)
    }

    fn bindings(&self) -> Result<Bindings, ConfigError> {
        let mut bindings = Bindings::new();

        // An empty action button leaves the action intent unbound.
        if !self.action_button.is_empty() {
            let button = parse_button(Intent::Action, &self.action_button)?;
            let text = label(Intent::Action, &self.action_text, DEFAULT_ACTION_TEXT)?;
            bindings = bindings.with(ButtonBinding::new(button, Intent::Action, text).shown(true));
        }

        let button = parse_button(Intent::Confirm, &self.confirm_button)?;
        let text = label(Intent::Confirm, &self.confirm_text, DEFAULT_CONFIRM_TEXT)?;
        bindings = bindings
            .with(ButtonBinding::new(button, Intent::Confirm, text).shown(self.confirm_show));

        let button = parse_button(Intent::Cancel, &self.cancel_button)?;
        let text = label(Intent::Cancel, &self.cancel_text, DEFAULT_CANCEL_TEXT)?;
        bindings = bindings
            .with(ButtonBinding::new(button, Intent::Cancel, text).shown(self.cancel_show));

        Ok(bindings)
    }
}

fn parse_button(intent: Intent, value: &str) -> Result<Button, ConfigError> {
    value.parse().map_err(|()| ConfigError::InvalidButton {
        intent,
        value: value.to_owned(),
    })
}

/// Empty labels fall back to the default.
fn label<'a>(intent: Intent, text: &'a str, default: &'a str) -> Result<&'a str, ConfigError> {
    if text.is_empty() {
        return Ok(default);
    }
    if text.len() > MAX_LABEL_BYTES {
        return Err(ConfigError::LabelTooLong {
            intent,
            len: text.len(),
            max: MAX_LABEL_BYTES,
        });
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["minui-presenter"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn config(args: &[&str]) -> Result<PresenterConfig, ConfigError> {
        parse(args).to_config()
    }

    #[test]
    fn defaults() {
        let cfg = config(&["--message", "hi"]).unwrap();
        let confirm = cfg.bindings.get(Intent::Confirm).unwrap();
        assert_eq!((confirm.button, confirm.label.as_str()), (Button::A, "SELECT"));
        assert!(!confirm.visible);
        let cancel = cfg.bindings.get(Intent::Cancel).unwrap();
        assert_eq!((cancel.button, cancel.label.as_str()), (Button::B, "BACK"));
        assert!(cfg.bindings.get(Intent::Action).is_none());
        assert_eq!(cfg.timeout, None);
        assert_eq!(cfg.fonts, FontConfig::default());
        assert_eq!(cfg.messages.current().alignment, Alignment::Middle);
    }

    #[test]
    fn missing_or_blank_message() {
        assert!(matches!(config(&[]), Err(ConfigError::MissingMessage)));
        assert!(matches!(
            config(&["--message", ""]),
            Err(ConfigError::MissingMessage)
        ));
        assert!(matches!(
            config(&["--message", "   "]),
            Err(ConfigError::MissingMessage)
        ));
    }

    #[test]
    fn oversized_message() {
        let long = "x".repeat(MAX_MESSAGE_BYTES + 1);
        assert!(matches!(
            config(&["--message", &long]),
            Err(ConfigError::MessageTooLong { .. })
        ));
    }

    #[test]
    fn oversized_label() {
        let long = "x".repeat(MAX_LABEL_BYTES + 1);
        assert!(matches!(
            config(&["--message", "hi", "--cancel-text", &long]),
            Err(ConfigError::LabelTooLong {
                intent: Intent::Cancel,
                ..
            })
        ));
    }

    #[test]
    fn empty_label_uses_default() {
        let cfg = config(&["--message", "hi", "--confirm-text", ""]).unwrap();
        assert_eq!(cfg.bindings.get(Intent::Confirm).unwrap().label, "SELECT");
    }

    #[test]
    fn duplicate_button_rejected() {
        let err = config(&["--message", "hi", "--action-button", "A"]).unwrap_err();
        assert!(matches!(err, ConfigError::ButtonConflict(Button::A)));
        assert_eq!(
            err.to_string(),
            "A button cannot be assigned to more than one button"
        );
    }

    #[test]
    fn remapped_buttons_accepted() {
        let cfg = config(&[
            "--message",
            "hi",
            "--confirm-button",
            "X",
            "--cancel-button",
            "Y",
            "--action-button",
            "A",
            "--action-text",
            "RETRY",
        ])
        .unwrap();
        let action = cfg.bindings.get(Intent::Action).unwrap();
        assert_eq!((action.button, action.label.as_str()), (Button::A, "RETRY"));
        assert!(action.visible);
        assert_eq!(cfg.bindings.get(Intent::Confirm).unwrap().button, Button::X);
    }

    #[test]
    fn invalid_buttons_rejected() {
        assert!(matches!(
            config(&["--message", "hi", "--confirm-button", "Z"]),
            Err(ConfigError::InvalidButton {
                intent: Intent::Confirm,
                ..
            })
        ));
        assert!(matches!(
            config(&["--message", "hi", "--cancel-button", ""]),
            Err(ConfigError::InvalidButton {
                intent: Intent::Cancel,
                ..
            })
        ));
        assert!(matches!(
            config(&["--message", "hi", "--action-button", "START"]),
            Err(ConfigError::InvalidButton {
                intent: Intent::Action,
                ..
            })
        ));
    }

    #[test]
    fn timeout_values() {
        let cfg = config(&["--message", "hi", "--timeout", "5"]).unwrap();
        assert_eq!(cfg.timeout, Some(Duration::from_secs(5)));
        let cfg = config(&["--message", "hi", "--timeout", "0"]).unwrap();
        assert_eq!(cfg.timeout, Some(Duration::ZERO));
        let cfg = config(&["--message", "hi", "--timeout", "-1"]).unwrap();
        assert_eq!(cfg.timeout, None);
    }

    #[test]
    fn countdown_needs_timeout() {
        let cfg = config(&["--message", "hi", "--show-time-left"]).unwrap();
        assert!(!cfg.countdown_visible());
        let cfg = config(&["--message", "hi", "--show-time-left", "--timeout", "3"]).unwrap();
        assert!(cfg.countdown_visible());
    }

    #[test]
    fn font_size_out_of_range() {
        assert!(matches!(
            config(&["--message", "hi", "--font-size-default", "2"]),
            Err(ConfigError::InvalidFontSize { size: 2, .. })
        ));
    }

    #[test]
    fn large_size_needs_a_custom_face() {
        assert!(matches!(
            config(&["--message", "hi", "--font-size-default", "64"]),
            Err(ConfigError::InvalidFontSize { size: 64, max: 20, .. })
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&fonts::box_font_bytes()).unwrap();
        let path = file.path().to_str().unwrap();
        let cfg = config(&[
            "--message",
            "hi",
            "--font-default",
            path,
            "--font-size-default",
            "64",
        ])
        .unwrap();
        assert_eq!(cfg.fonts.size, 64);
        let face = cfg.fonts.face.expect("custom face kept");
        assert_eq!(face.path, file.path());
    }

    #[test]
    fn missing_font_rejected() {
        assert!(matches!(
            config(&["--message", "hi", "--font-default", "/nonexistent/font.ttf"]),
            Err(ConfigError::FontUnreadable { .. })
        ));
    }

    #[test]
    fn alignment_and_verbosity_flags() {
        let cli = parse(&["--message", "hi", "--message-alignment", "bottom", "-v"]);
        assert_eq!(cli.message_alignment, Alignment::Bottom);
        assert_eq!(cli.verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["-q"]).verbosity(), Verbosity::Quiet);
        assert!(Cli::try_parse_from(["minui-presenter", "-v", "-q"]).is_err());
    }

    #[test]
    fn clap_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
