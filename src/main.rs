use std::process::ExitCode as ProcessExit;

use anyhow::{Context, Result};
use clap::Parser;

use minui_presenter::cli::Cli;
use minui_presenter::config::PresenterConfig;
use minui_presenter::exit_code::ExitCode;
use minui_presenter::interrupt::Interrupt;
use minui_presenter::logging;
use minui_presenter::platform::desktop::DesktopPlatform;
use minui_presenter::session::{self, Outcome};

fn main() -> ProcessExit {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            // Clap's own failure code (2) is the cancel code; report 1 instead.
            return if err.use_stderr() {
                ExitCode::Error.into()
            } else {
                ExitCode::Success.into()
            };
        }
    };

    logging::init(cli.verbosity());

    let config = match cli.to_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::Error.into();
        }
    };

    let interrupt = Interrupt::new();
    match present(&cli, &config, &interrupt) {
        Ok(code) => code.into(),
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::Error.into()
        }
    }
}

fn present(
    cli: &Cli,
    config: &PresenterConfig,
    interrupt: &Interrupt,
) -> Result<ExitCode> {
    interrupt
        .register_sigint()
        .context("failed to install SIGINT handler")?;

    let mut platform = DesktopPlatform::open(&cli.framebuffer, config, interrupt.clone())
        .with_context(|| {
            format!("failed to initialise display on {}", cli.framebuffer.display())
        })?;

    match session::run(&mut platform, config, interrupt) {
        Ok(Outcome::Finished(code)) => {
            drop(platform);
            Ok(code)
        }
        Ok(Outcome::Interrupted) => {
            // Emergency exit: skip teardown apart from handing the terminal back.
            let _ = crossterm::terminal::disable_raw_mode();
            std::process::exit(i32::from(ExitCode::Interrupted.code()));
        }
        Err(err) => Err(err).context("presenting frame failed"),
    }
}
