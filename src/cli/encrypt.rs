//! Encrypt, decrypt and keygen commands

use crate::config::secrets::{PEPPER_VAR, SALT_VAR, SECRET_KEY_VAR};
use crate::crypto::random::SECRET_SIZE;
use crate::crypto::{generate_secret_hex, OsRandom, SecureString};
use crate::error::{SealError, SealResult};

use super::CliContext;

/// Encrypt `text`, or prompt for it with hidden input
pub fn handle_encrypt(ctx: &CliContext, text: Option<String>) -> SealResult<()> {
    let text = match text {
        Some(text) => SecureString::new(text),
        None => prompt_secret("Text to encrypt: ")?,
    };

    if text.is_empty() {
        eprintln!("Nothing to encrypt.");
        return Ok(());
    }

    let sealer = ctx.sealer()?;
    let envelope = sealer.try_encrypt(&text)?;
    println!("{}", envelope);
    Ok(())
}

/// Decrypt an envelope and print the text
pub fn handle_decrypt(ctx: &CliContext, envelope: &str) -> SealResult<()> {
    if envelope.is_empty() {
        eprintln!("Nothing to decrypt.");
        return Ok(());
    }

    let sealer = ctx.sealer()?;
    let plaintext = SecureString::new(sealer.try_decrypt(envelope)?);
    println!("{}", plaintext.as_str());
    Ok(())
}

/// Print a fresh set of secrets as dotenv lines
pub fn handle_keygen(bytes: Option<usize>) -> SealResult<()> {
    let bytes = bytes.unwrap_or(SECRET_SIZE);
    if bytes == 0 {
        return Err(SealError::Config("Secret size must be positive".into()));
    }

    for var in [PEPPER_VAR, SECRET_KEY_VAR, SALT_VAR] {
        let secret = SecureString::new(generate_secret_hex(&OsRandom, bytes)?);
        println!("{}={}", var, secret.as_str());
    }
    Ok(())
}

/// Prompt for a secret (hidden input)
fn prompt_secret(prompt: &str) -> SealResult<SecureString> {
    rpassword::prompt_password(prompt)
        .map(SecureString::new)
        .map_err(|e| SealError::Io(format!("Failed to read input: {}", e)))
}
