//! # tenanthub-credential
//!
//! Credential concerns: Argon2id hashing, temporary password generation,
//! and API key secret minting.

pub mod generator;
pub mod hasher;

pub use generator::{GeneratedSecret, SecretGenerator};
pub use hasher::PasswordHasher;
