use std::fmt;
use std::str::FromStr;

use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::{Sha256, Sha384, Sha512};
use zeroize::Zeroizing;

use crate::charset::CharsetSelection;
use crate::error::GeneratorError;

/// Digest selecting the pseudorandom function under PBKDF2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    pub const fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "SHA-256",
            HashAlgorithm::Sha384 => "SHA-384",
            HashAlgorithm::Sha512 => "SHA-512",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            "sha384" | "sha-384" => Ok(HashAlgorithm::Sha384),
            "sha512" | "sha-512" => Ok(HashAlgorithm::Sha512),
            _ => Err(GeneratorError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

/// Immutable parameter set for one generation request.
///
/// Built once by the caller and passed by reference through both stages of
/// the pipeline; the stages themselves hold no state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub charsets: CharsetSelection,
    pub key_size: usize,
    pub algorithm: HashAlgorithm,
    pub length: usize,
    pub iterations: u32,
}

impl GeneratorConfig {
    pub const DEFAULT_KEY_SIZE: usize = 32;
    pub const DEFAULT_LENGTH: usize = 16;
    pub const DEFAULT_ITERATIONS: u32 = 100_000;
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            charsets: CharsetSelection::ALL,
            key_size: Self::DEFAULT_KEY_SIZE,
            algorithm: HashAlgorithm::default(),
            length: Self::DEFAULT_LENGTH,
            iterations: Self::DEFAULT_ITERATIONS,
        }
    }
}

/// Builds the PBKDF2 salt from a site, a login and a counter.
///
/// The counter is appended as uppercase hex without a prefix or leading
/// zeros, so `("example.com", "user", 10)` yields `"example.comuserA"`.
/// The result is an opaque string; nothing downstream parses it.
pub fn compose_salt(site: &str, login: &str, counter: u32) -> String {
    format!("{site}{login}{counter:X}")
}

/// Derives `config.key_size` bytes of entropy from the master password and
/// salt with PBKDF2 under the configured digest and iteration count.
///
/// Both inputs are consumed as their raw UTF-8 bytes, with no trimming and
/// no normalization; identical inputs produce identical bytes on every
/// platform. `config.length` and `config.charsets` take no part in
/// derivation, only rendering reads them.
pub fn derive_entropy(
    master_password: &str,
    salt: &str,
    config: &GeneratorConfig,
) -> Result<Zeroizing<Vec<u8>>, GeneratorError> {
    if config.iterations == 0 {
        return Err(GeneratorError::DerivationFailed(
            "iteration count must be at least 1".to_string(),
        ));
    }
    if config.key_size == 0 {
        return Err(GeneratorError::DerivationFailed(
            "output key size must be at least 1 byte".to_string(),
        ));
    }

    let mut output = Zeroizing::new(vec![0u8; config.key_size]);

    let result = match config.algorithm {
        HashAlgorithm::Sha256 => pbkdf2::<Hmac<Sha256>>(
            master_password.as_bytes(),
            salt.as_bytes(),
            config.iterations,
            &mut output,
        ),
        HashAlgorithm::Sha384 => pbkdf2::<Hmac<Sha384>>(
            master_password.as_bytes(),
            salt.as_bytes(),
            config.iterations,
            &mut output,
        ),
        HashAlgorithm::Sha512 => pbkdf2::<Hmac<Sha512>>(
            master_password.as_bytes(),
            salt.as_bytes(),
            config.iterations,
            &mut output,
        ),
    };

    result.map_err(|e| GeneratorError::DerivationFailed(format!("PBKDF2 failed: {e}")))?;

    Ok(output)
}
