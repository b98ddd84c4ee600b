use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use keyseal::cli::{handle_decrypt, handle_encrypt, handle_keygen, handle_keys_command, CliContext};
use keyseal::config::secrets::{PEPPER_VAR, SALT_VAR, SECRET_KEY_VAR};
use keyseal::config::{KeysealPaths, SecretConfig, Settings};

#[derive(Parser)]
#[command(
    name = "keyseal",
    version,
    about = "Password-derived text encryption envelopes",
    long_about = "keyseal encrypts short strings such as API tokens into \
                  self-contained salt:iv:ciphertext envelopes, keyed by a \
                  pepper, a secret key and an environment salt."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Dotenv file with KEYSEAL_PEPPER, KEYSEAL_SECRET_KEY and KEYSEAL_SALT
    #[arg(long, env = "KEYSEAL_ENV_FILE", global = true)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt text into an envelope (prompts when TEXT is omitted)
    #[command(alias = "enc")]
    Encrypt {
        /// Text to encrypt
        text: Option<String>,
    },

    /// Decrypt an envelope
    #[command(alias = "dec")]
    Decrypt {
        /// Envelope in salt:iv:ciphertext form
        envelope: String,
    },

    /// Generate a fresh pepper, secret key and environment salt
    Keygen {
        /// Random bytes per secret
        #[arg(short, long)]
        bytes: Option<usize>,
    },

    /// Sealed keys file management
    #[command(subcommand)]
    Keys(keyseal::cli::KeysCommands),

    /// Show current configuration and paths
    Config,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("keyseal={}", level)));

    // Logs go to stderr so stdout stays pipeable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let paths = KeysealPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let ctx = CliContext::new(paths, settings, cli.env_file);

    match cli.command {
        Some(Commands::Encrypt { text }) => handle_encrypt(&ctx, text)?,
        Some(Commands::Decrypt { envelope }) => handle_decrypt(&ctx, &envelope)?,
        Some(Commands::Keygen { bytes }) => handle_keygen(bytes)?,
        Some(Commands::Keys(cmd)) => handle_keys_command(&ctx, cmd)?,
        Some(Commands::Config) => {
            println!("keyseal Configuration");
            println!("=====================");
            println!("Base directory: {}", ctx.paths.base_dir().display());
            println!("Settings file:  {}", ctx.paths.settings_file().display());
            println!("Env file:       {}", ctx.env_file.display());
            println!("Keys file:      {}", ctx.keys_file().display());
            println!();
            println!("Key derivation:");
            println!("  Algorithm:  PBKDF2-HMAC-SHA256");
            println!("  Key size:   {} bits", ctx.settings.kdf.key_size_bits);
            println!("  Iterations: {}", ctx.settings.kdf.iterations);
            println!();
            let status = match SecretConfig::from_env_or_file(&ctx.env_file) {
                Ok(_) => "resolved".to_string(),
                Err(e) => e.to_string(),
            };
            println!("Secrets ({}, {}, {}): {}", PEPPER_VAR, SECRET_KEY_VAR, SALT_VAR, status);
        }
        None => {
            println!("keyseal - password-derived text encryption envelopes");
            println!();
            println!("Run 'keyseal --help' for usage information.");
            println!("Run 'keyseal keygen' to create a set of secrets.");
        }
    }

    Ok(())
}
