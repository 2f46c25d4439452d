//! otpclock - TOTP/HOTP command-line authenticator
//!
//! Generates and verifies one-time passwords, builds provisioning URIs and
//! shows a live countdown of the current code.

use clap::{Parser, Subcommand};
use otpclock_core::{error::OtpClockError, init_logging, sync::Cadence};

mod cli;

#[derive(Parser)]
#[command(name = "otpclock")]
#[command(about = "Time-based one-time password generator and verifier")]
struct Cli {
    #[command(flatten)]
    otp: cli::OtpArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current TOTP code
    Code {
        /// Unix time to compute the code for instead of now
        #[arg(long)]
        time: Option<u64>,
    },
    /// Print the previous, current and next codes
    Window {
        /// Unix time to compute the window for instead of now
        #[arg(long)]
        time: Option<u64>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the HOTP code for a counter value
    Hotp {
        /// Moving factor
        #[arg(long)]
        counter: u64,
    },
    /// Verify a TOTP code (exit status 1 when invalid)
    Check {
        /// Code to verify
        code: String,
        /// Unix time to verify against instead of now
        #[arg(long)]
        time: Option<u64>,
        /// Accepted time steps either side of the current one (0-10)
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(0..=10))]
        skew: u64,
    },
    /// Print the otpauth:// provisioning URI
    Uri {
        /// Account name shown by authenticator apps
        #[arg(long)]
        label: Option<String>,
        /// Service or provider name
        #[arg(long)]
        issuer: Option<String>,
    },
    /// Generate a random Base32 secret
    NewSecret {
        /// Secret length in bytes
        #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u64).range(10..=64))]
        bytes: u64,
    },
    /// Show a live, self-refreshing view of the current code
    Watch {
        /// Refresh cadence (boundary, every-second)
        #[arg(long)]
        cadence: Option<Cadence>,
    },
    /// Manage the configuration file (show/init)
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    // Initialize logging
    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(2);
    }

    let cli = Cli::parse();
    let args = &cli.otp;

    let result = match cli.command {
        Commands::Code { time } => cli::code::run_code(args, time),
        Commands::Window { time, json } => cli::code::run_window(args, time, json),
        Commands::Hotp { counter } => cli::code::run_hotp(args, counter),
        Commands::Check { code, time, skew } => {
            match cli::code::run_check(args, &code, time, skew) {
                Ok(true) => Ok(()),
                Ok(false) => std::process::exit(1),
                Err(e) => Err(e),
            }
        }
        Commands::Uri { label, issuer } => cli::secret::run_uri(args, label, issuer),
        Commands::NewSecret { bytes } => cli::secret::run_new_secret(bytes as usize),
        Commands::Watch { cadence } => cli::watch::run_watch(args, cadence),
        Commands::Config { action } => match action {
            ConfigCommands::Show => cli::config::run_config_show(),
            ConfigCommands::Init { force } => cli::config::run_config_init(force),
        },
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            let exit_code = match e {
                // Configuration and input errors (exit code 2)
                OtpClockError::Config(_)
                | OtpClockError::Toml(_)
                | OtpClockError::TomlSerialize(_)
                | OtpClockError::Otp(_) => 2,
                // IO errors (exit code 1 - runtime)
                OtpClockError::Io(_) => 1,
            };

            eprintln!("Error: {}", e);
            std::process::exit(exit_code);
        }
    }
}
