//! Sealed keys CLI commands
//!
//! Seal variables from a dotenv file into the keys file, read them back,
//! and list what is stored.

use std::path::PathBuf;

use clap::Subcommand;

use crate::crypto::SecureString;
use crate::error::{SealError, SealResult};
use crate::keys::{seal_env_file, SealedKeys};

use super::CliContext;

/// Sealed keys subcommands
#[derive(Subcommand)]
pub enum KeysCommands {
    /// Encrypt variables from a dotenv file into the keys file
    Seal {
        /// Variable names to seal
        #[arg(required = true)]
        names: Vec<String>,

        /// Dotenv file holding the values (defaults to the secrets env file)
        #[arg(long)]
        from: Option<PathBuf>,

        /// Keys file to write (defaults to the configured keys file)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Decrypt and print one sealed key
    Get {
        /// Key name
        name: String,

        /// Keys file to read
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// List sealed key names
    List {
        /// Keys file to read
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Handle a keys command
pub fn handle_keys_command(ctx: &CliContext, cmd: KeysCommands) -> SealResult<()> {
    match cmd {
        KeysCommands::Seal { names, from, out } => {
            let from = from.unwrap_or_else(|| ctx.env_file.clone());
            let out = out.unwrap_or_else(|| ctx.keys_file());
            let sealer = ctx.sealer()?;

            let sealed = seal_env_file(&sealer, &from, names.as_slice())?;
            let mut keys = SealedKeys::load(&out)?;
            keys.merge(sealed);
            keys.save(&out)?;

            println!("Sealed {} key(s) into {}", names.len(), out.display());
            Ok(())
        }
        KeysCommands::Get { name, file } => {
            let file = file.unwrap_or_else(|| ctx.keys_file());
            let keys = SealedKeys::load(&file)?;
            let sealer = ctx.sealer()?;

            let value = keys.get_key(&sealer, &name).map(SecureString::new).ok_or_else(|| {
                SealError::Storage(format!("No usable key named '{}' in {}", name, file.display()))
            })?;
            println!("{}", value.as_str());
            Ok(())
        }
        KeysCommands::List { file } => {
            let file = file.unwrap_or_else(|| ctx.keys_file());
            let keys = SealedKeys::load(&file)?;
            println!("{}", format_key_list(&keys));
            Ok(())
        }
    }
}

/// Format sealed keys as a table of names and envelope sizes
pub fn format_key_list(keys: &SealedKeys) -> String {
    if keys.is_empty() {
        return "No sealed keys found.".to_string();
    }

    let name_width = keys.names().map(str::len).max().unwrap_or(4).max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>8}\n",
        "Name",
        "Length",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:->8}\n",
        "",
        "",
        name_width = name_width,
    ));

    for (name, envelope) in keys.iter() {
        output.push_str(&format!(
            "{:<name_width$}  {:>8}\n",
            name,
            envelope.len(),
            name_width = name_width,
        ));
    }

    output.push_str(&format!("\n{} key(s)", keys.len()));
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_empty() {
        assert_eq!(format_key_list(&SealedKeys::new()), "No sealed keys found.");
    }

    #[test]
    fn test_format_rows() {
        let mut keys = SealedKeys::new();
        keys.insert("GITHUB_TOKEN", "aa:bb:cc");
        keys.insert("ID", "aa:bb:ccdd");

        let output = format_key_list(&keys);
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].starts_with("Name"));
        assert!(lines[2].starts_with("GITHUB_TOKEN"));
        assert!(lines[2].ends_with("8"));
        assert!(lines[3].starts_with("ID  "));
        assert!(lines[3].ends_with("10"));
        assert!(output.ends_with("2 key(s)"));
    }
}
