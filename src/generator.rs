use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::Zero;
use zeroize::Zeroizing;

use crate::charset::CharsetSelection;
use crate::error::GeneratorError;
use crate::kdf::{derive_entropy, GeneratorConfig};

/// Peels one base-`modulus` digit off the running entropy value.
///
/// Errors once the value reaches zero: every later remainder would be zero
/// too and the output would degenerate into repeated first characters.
fn next_index(value: &mut BigUint, modulus: usize) -> Result<usize, GeneratorError> {
    if value.is_zero() {
        return Err(GeneratorError::InsufficientEntropy);
    }

    let (quotient, remainder) = value.div_rem(&BigUint::from(modulus));
    *value = quotient;

    // remainder < modulus <= usize::MAX, so the low digit is the whole value
    Ok(remainder.iter_u64_digits().next().unwrap_or(0) as usize)
}

/// Maps derived entropy onto a password of exactly `length` characters.
///
/// The entropy bytes are read as one big-endian unsigned integer and
/// consumed in three fixed stages: filler characters indexed into the
/// combined alphabet, one guaranteed character per enabled class drawn
/// against that class's own alphabet, and a splice of each guaranteed
/// character at an entropy-chosen position. The stage order and the
/// least-significant-digit-first consumption are load-bearing; identical
/// inputs render the identical string on every platform.
pub fn render_password(
    charsets: CharsetSelection,
    entropy: &[u8],
    length: usize,
) -> Result<Zeroizing<String>, GeneratorError> {
    if charsets.is_empty() {
        return Err(GeneratorError::EmptyCharset);
    }

    let class_count = charsets.class_count();
    if length < class_count {
        return Err(GeneratorError::InvalidLength {
            length,
            class_count,
        });
    }

    let combined = charsets.combined();
    let combined = combined.as_bytes();

    let mut quotient = BigUint::from_bytes_be(entropy);

    let mut password = Zeroizing::new(Vec::with_capacity(length));
    for _ in 0..length - class_count {
        let index = next_index(&mut quotient, combined.len())?;
        password.push(combined[index]);
    }

    // One guaranteed character per enabled class, in the fixed class order,
    // each drawn against its own alphabet length.
    let mut mandatory = Zeroizing::new(Vec::with_capacity(class_count));
    for alphabet in charsets.alphabets() {
        let index = next_index(&mut quotient, alphabet.len())?;
        mandatory.push(alphabet.as_bytes()[index]);
    }

    // Each splice grows the password, so it changes the modulus of the next.
    for &ch in mandatory.iter() {
        if password.is_empty() {
            // Only one legal position; nothing to draw.
            password.push(ch);
        } else {
            let index = next_index(&mut quotient, password.len())?;
            password.insert(index, ch);
        }
    }

    let rendered: String = password.iter().copied().map(char::from).collect();
    Ok(Zeroizing::new(rendered))
}

/// Derives and renders a password in one call.
///
/// An empty charset selection is rejected here, before any PBKDF2 work
/// runs. Everything else flows deriver → renderer → caller; the function
/// holds no state between calls.
pub fn generate(
    master_password: &str,
    salt: &str,
    config: &GeneratorConfig,
) -> Result<Zeroizing<String>, GeneratorError> {
    if config.charsets.is_empty() {
        return Err(GeneratorError::EmptyCharset);
    }

    let entropy = derive_entropy(master_password, salt, config)?;
    render_password(config.charsets, &entropy, config.length)
}
