//! Random secret generation for temporary passwords and API keys.

use argon2::password_hash::rand_core::{OsRng, RngCore};

use tenanthub_entity::api_key::Environment;

/// Password alphabet with visually ambiguous characters removed
/// (no 0/O, 1/l/I). Temporary passwords are read over email, so every
/// character must be unambiguous.
const PASSWORD_ALPHABET: &[u8] =
    b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789!@#$%&*";

/// Number of random bytes in an API key secret.
const API_KEY_BYTES: usize = 32;

/// A freshly minted API key secret, together with the display fragments
/// that get persisted.
#[derive(Debug, Clone)]
pub struct GeneratedSecret {
    /// Full secret, shown to the admin exactly once.
    pub full_key: String,
    /// Display prefix, e.g. `"th_live"`.
    pub prefix: String,
    /// Last four characters of the full secret.
    pub last_four: String,
}

/// Generates temporary passwords and API key secrets from OS randomness.
#[derive(Debug, Clone)]
pub struct SecretGenerator;

impl SecretGenerator {
    /// Creates a new secret generator.
    pub fn new() -> Self {
        Self
    }

    /// Generate a temporary password of the given length.
    pub fn temporary_password(&self, length: usize) -> String {
        let mut bytes = vec![0u8; length];
        OsRng.fill_bytes(&mut bytes);
        bytes
            .iter()
            .map(|b| PASSWORD_ALPHABET[(*b as usize) % PASSWORD_ALPHABET.len()] as char)
            .collect()
    }

    /// Mint a new API key secret for the given environment.
    ///
    /// Format: `{prefix}_{64 hex chars}` where the prefix encodes the
    /// environment (`th_live` or `th_test`).
    pub fn api_key(&self, environment: Environment) -> GeneratedSecret {
        let mut bytes = [0u8; API_KEY_BYTES];
        OsRng.fill_bytes(&mut bytes);

        let prefix = environment.key_prefix().to_string();
        let full_key = format!("{prefix}_{}", hex::encode(bytes));
        let last_four = full_key[full_key.len() - 4..].to_string();

        GeneratedSecret {
            full_key,
            prefix,
            last_four,
        }
    }
}

impl Default for SecretGenerator {
    fn default() -> Self {
        Self::new()
    }
}
