//! Process exit codes reported to the calling shell script.

use core::fmt;

/// How a presenter session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ExitCode {
    /// Confirm pressed (or nothing went wrong).
    Success = 0,
    /// Argument or initialisation error.
    Error = 1,
    CancelButton = 2,
    /// Reserved for a menu button; never produced.
    MenuButton = 3,
    ActionButton = 4,
    StartButton = 5,
    Timeout = 124,
    /// SIGINT / Ctrl-C.
    Interrupted = 130,
}

impl ExitCode {
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExitCode::Success => "success",
            ExitCode::Error => "error",
            ExitCode::CancelButton => "cancel",
            ExitCode::MenuButton => "menu",
            ExitCode::ActionButton => "action",
            ExitCode::StartButton => "start",
            ExitCode::Timeout => "timeout",
            ExitCode::Interrupted => "interrupted",
        };
        write!(f, "{name} ({})", self.code())
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_shell_contract() {
        assert_eq!(ExitCode::Success.code(), 0);
        assert_eq!(ExitCode::Error.code(), 1);
        assert_eq!(ExitCode::CancelButton.code(), 2);
        assert_eq!(ExitCode::MenuButton.code(), 3);
        assert_eq!(ExitCode::ActionButton.code(), 4);
        assert_eq!(ExitCode::StartButton.code(), 5);
        assert_eq!(ExitCode::Timeout.code(), 124);
        assert_eq!(ExitCode::Interrupted.code(), 130);
    }

    #[test]
    fn display_names_code() {
        assert_eq!(ExitCode::Timeout.to_string(), "timeout (124)");
    }
}
