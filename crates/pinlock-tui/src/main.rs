//! pinlock command-line interface: lock screen, PIN lifecycle, config tooling.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pinlock_core::dialog::{RemoveFlow, RemoveStage, SetupFlow, SetupOutcome};
use pinlock_core::toolbar::Toolbar;
use pinlock_core::{
    codec, logging, Attempts, LockScreen, PinlockConfig, SettingsStore, SubmitOutcome,
};
use rpassword::prompt_password;
use schemars::schema_for;
use serde_json::to_string_pretty;
use std::path::PathBuf;
use std::sync::Arc;

mod host;
mod store;
mod tui;

use host::{OverlayHost, SessionNotifier};
use store::FileStore;
use tui::TuiExit;

/// Top-level command-line options shared by every subcommand.
#[derive(Parser, Debug)]
#[command(
    name = "pinlock",
    version,
    about = "PIN lock screen and code management for the terminal."
)]
struct Cli {
    /// Path to the pinlock configuration file.
    #[arg(short, long, default_value = "pinlock.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Subcommands covering the lock screen and the PIN lifecycle.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch the interactive lock screen.
    Lock,

    /// Configure a new PIN with a confirmation step.
    Setup {
        /// Provide the PIN non-interactively instead of prompting.
        #[arg(long)]
        pin: Option<String>,
    },

    /// Remove the configured PIN after verifying it.
    Remove {
        /// Provide the PIN non-interactively instead of prompting.
        #[arg(long)]
        pin: Option<String>,
    },

    /// Show whether a PIN is configured and the remaining attempts.
    Status,

    /// Validate a configuration file or emit the config schema.
    Validate {
        /// Path to the configuration file to validate.
        #[arg(short = 'f', long, default_value = "pinlock.toml")]
        file: PathBuf,

        /// Output the JSON schema instead of validating a file.
        #[arg(long)]
        schema: bool,
    },
}

/// Entry point: parse arguments and surface errors with an exit code.
fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    logging::init("info");
    let cli = Cli::parse();
    let config_path = cli.config.clone();

    match cli.command {
        Commands::Lock => {
            let config = load_config(&config_path)?;
            let screen = open_screen(config.clone(), true)?;
            if !screen.is_configured() {
                println!("No PIN configured; the lock screen is inactive.");
                println!("Run `pinlock setup` to configure one.");
                return Ok(());
            }
            match tui::launch(config, screen)? {
                TuiExit::Quit => {}
                TuiExit::SignedOut => {
                    println!("Attempts exhausted; the session was signed out.");
                }
            }
        }
        Commands::Setup { pin } => {
            let config = load_config(&config_path)?;
            let mut screen = open_screen(config.clone(), false)?;
            if screen.is_configured() {
                bail!("a PIN is already configured; remove it first");
            }

            let mut flow = SetupFlow::new();
            let (first, confirm) = match pin {
                Some(pin) => (pin.clone(), pin),
                None => (
                    prompt_password("New PIN: ")?,
                    prompt_password("Repeat PIN: ")?,
                ),
            };
            check_pin_shape(&config, &first)?;

            flow.submit(&first);
            match flow.submit(&confirm) {
                SetupOutcome::Completed(digits) => {
                    screen.configure_code(&digits)?;
                    println!("PIN configured. The lock screen engages on the next start.");
                }
                SetupOutcome::Mismatch => bail!("the PINs did not match"),
                SetupOutcome::AwaitingConfirmation => bail!("setup did not complete"),
            }
        }
        Commands::Remove { pin } => {
            let config = load_config(&config_path)?;
            let mut screen = open_screen(config, false)?;
            if !screen.is_configured() {
                println!("No PIN configured.");
                return Ok(());
            }

            let pin = match pin {
                Some(pin) => pin,
                None => prompt_password("Current PIN: ")?,
            };

            let mut flow = RemoveFlow::new();
            let outcome = screen.submit_removal(&pin)?;
            flow.note_outcome(&outcome);

            if flow.stage() == RemoveStage::Success {
                println!("PIN removed.");
                return Ok(());
            }
            match outcome {
                SubmitOutcome::Mismatch { remaining } => match remaining.count() {
                    Some(1) => bail!("wrong PIN (1 attempt remaining)"),
                    Some(n) => bail!("wrong PIN ({n} attempts remaining)"),
                    None => bail!("wrong PIN"),
                },
                SubmitOutcome::SignedOut => {
                    bail!("attempts exhausted; the session must sign out")
                }
                other => bail!("unexpected outcome: {other:?}"),
            }
        }
        Commands::Status => {
            let config = load_config(&config_path)?;
            let store = FileStore::open(config.store_path())?;
            let stored = store.get_value(&config.lock.setting_key)?;
            let code = codec::decode(stored.as_deref().unwrap_or(""));
            if !code.is_configured() {
                println!("No PIN configured.");
            } else {
                match code.attempts {
                    Attempts::Remaining(n) => println!(
                        "PIN configured ({n} of {} attempts remaining).",
                        config.lock.max_attempts
                    ),
                    Attempts::Unbounded => println!("PIN configured."),
                }
            }
        }
        Commands::Validate { file, schema } => {
            if schema {
                let schema = schema_for!(PinlockConfig);
                println!("{}", to_string_pretty(&schema)?);
                return Ok(());
            }

            let cfg = PinlockConfig::load(&file)
                .with_context(|| format!("failed to load configuration from {}", file.display()))?;

            let issues = cfg.validate();
            if issues.is_empty() {
                println!("Configuration valid.");
            } else {
                eprintln!("Configuration validation failed:");
                for issue in issues {
                    eprintln!("  - {issue}");
                }
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Load the config (defaults when the file is absent) and refuse to run with
/// a broken one.
fn load_config(path: &PathBuf) -> Result<Arc<PinlockConfig>> {
    let config = PinlockConfig::load_or_default(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    let issues = config.validate();
    if !issues.is_empty() {
        bail!("configuration invalid: {}", issues.join("; "));
    }
    Ok(Arc::new(config))
}

/// Wire the lock screen to the file store and this frontend's collaborators.
fn open_screen(config: Arc<PinlockConfig>, with_toolbar: bool) -> Result<tui::Screen> {
    let store = FileStore::open(config.store_path())?;
    let toolbar = if with_toolbar {
        Toolbar::from_config(&config)
    } else {
        None
    };
    let screen = LockScreen::new(config, store, SessionNotifier, OverlayHost::new(toolbar))?;
    Ok(screen)
}

fn check_pin_shape(config: &PinlockConfig, pin: &str) -> Result<()> {
    let expected = config.lock.pin_length;
    if pin.len() != expected || !pin.chars().all(|c| c.is_ascii_digit()) {
        bail!("the PIN must be exactly {expected} digits");
    }
    Ok(())
}
