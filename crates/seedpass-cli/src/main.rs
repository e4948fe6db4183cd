//! Seedpass command line.
//!
//! # Usage
//!
//! ```bash
//! # Prompts for the master password without echo
//! seedpass --person "John Doe" --birthdate 21021982 --service example.com --login jdoe
//!
//! # Non-interactive, rotated once, fingerprint saved as an image
//! SEEDPASS_MASTER=... seedpass -p "John Doe" -b 21021982 -s example.com -i 1 \
//!     --fingerprint-out fingerprint.ppm
//! ```
//!
//! The fingerprint preview and the label go to stderr; stdout carries only
//! the password.

mod error;
mod preview;

use std::{
    io::{self, Write},
    path::PathBuf,
};

use clap::{Parser, builder::RangedU64ValueParser};
use error::CliError;
use seedpass_app::{FingerprintWorker, IdentityInput, ServiceInput, Session, SessionConfig};
use seedpass_crypto::{
    DEFAULT_CELL_PIXELS, DEFAULT_KDF_ITERATIONS, PasswordPolicy, StreamConfig,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use zeroize::Zeroizing;

/// Environment variable consulted before prompting for the master password
const MASTER_ENV: &str = "SEEDPASS_MASTER";

/// Deterministic password generator
#[derive(Parser, Debug)]
#[command(name = "seedpass")]
#[command(about = "Derive service passwords from who you are and one master password")]
#[command(version)]
struct Args {
    /// Your full name
    #[arg(short, long)]
    person: String,

    /// Birthdate as DDMMYYYY
    #[arg(short, long)]
    birthdate: String,

    /// Service name, e.g. a domain
    #[arg(short, long)]
    service: String,

    /// Login or user name at the service
    #[arg(short, long, default_value = "")]
    login: String,

    /// Bump to rotate the password
    #[arg(short, long, default_value_t = 0)]
    iteration: u64,

    /// Password length
    #[arg(long, default_value_t = PasswordPolicy::DEFAULT_LENGTH)]
    length: u32,

    /// Uppercase letters [default: ceil(length / 8)]
    #[arg(long)]
    upper: Option<u32>,

    /// Digits [default: ceil(length / 8)]
    #[arg(long)]
    digits: Option<u32>,

    /// Symbols [default: ceil(length / 8)]
    #[arg(long)]
    symbols: Option<u32>,

    /// Minimum lowercase letters
    #[arg(long, default_value_t = 1)]
    min_lower: u32,

    /// PBKDF2 rounds; must match across runs to reproduce passwords
    #[arg(long, default_value_t = DEFAULT_KDF_ITERATIONS, value_parser = clap::value_parser!(u32).range(1..))]
    kdf_iterations: u32,

    /// Save the fingerprint as a PPM image
    #[arg(long)]
    fingerprint_out: Option<PathBuf>,

    /// Pixels per fingerprint cell in the saved image
    #[arg(long, default_value_t = DEFAULT_CELL_PIXELS, value_parser = RangedU64ValueParser::<usize>::new().range(1..=64))]
    cell_size: usize,

    /// Do not draw the fingerprint in the terminal
    #[arg(long)]
    no_preview: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    fn policy(&self) -> PasswordPolicy {
        let mut policy = PasswordPolicy::with_length(self.length).min_lowercase(self.min_lower);
        if let Some(count) = self.upper {
            policy = policy.upper(count);
        }
        if let Some(count) = self.digits {
            policy = policy.digits(count);
        }
        if let Some(count) = self.symbols {
            policy = policy.symbols(count);
        }
        policy
    }

    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            stream: StreamConfig { iterations: self.kdf_iterations, ..StreamConfig::default() },
            policy: self.policy(),
        }
    }

    fn service(&self) -> ServiceInput {
        ServiceInput::new(self.service.as_str(), self.login.as_str()).with_iteration(self.iteration)
    }
}

/// Master password from the environment, else a hidden prompt.
fn read_master() -> Result<Zeroizing<String>, CliError> {
    match std::env::var(MASTER_ENV) {
        Ok(master) => Ok(Zeroizing::new(master)),
        Err(_) => rpassword::prompt_password("Master password: ")
            .map(Zeroizing::new)
            .map_err(CliError::Prompt),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

    let master = read_master()?;
    let identity = IdentityInput::new(args.person.as_str(), args.birthdate.as_str(), master.as_str());
    identity.validate()?;
    let service = args.service();
    service.seed()?;

    let config = args.session_config();
    tracing::info!(kdf_iterations = config.stream.iterations, "deriving identity fingerprint");

    let worker = FingerprintWorker::spawn(config.stream);
    worker.submit(&identity);
    let state = worker.settled().await?;
    worker.shutdown().await?;
    let fingerprint = state.fingerprint().cloned().ok_or(CliError::FingerprintUnavailable)?;

    if !args.no_preview {
        preview::write_ansi(fingerprint.grid(), &mut io::stderr().lock())?;
    }
    if let Some(path) = &args.fingerprint_out {
        preview::export_ppm(fingerprint.grid(), args.cell_size, path)
            .map_err(|source| CliError::Export { path: path.clone(), source })?;
        tracing::info!(path = %path.display(), "fingerprint saved");
    }

    let mut session = Session::new(config);
    session.adopt_fingerprint(fingerprint);
    let generated = session.generate(&service)?;

    writeln!(io::stderr().lock(), "{}", generated.label())?;
    writeln!(io::stdout().lock(), "{}", generated.password.as_str())?;

    session.clear();
    Ok(())
}
