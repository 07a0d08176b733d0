use anyhow::{Context, Result};
use console::{Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use rpassword::read_password;
use std::io::{self, Write};
use std::time::{Duration, Instant};
use zeroize::Zeroizing;

use crate::charset::{CharClass, CharsetSelection};
use crate::kdf::GeneratorConfig;

pub const MIN_SAFE_ENTROPY: f64 = 64.0;
pub const PARANOID_ENTROPY: f64 = 128.0;

pub const MIN_SAFE_PASSWORD_LENGTH: usize = 12;
pub const MIN_SAFE_ITERATIONS: u32 = 100_000;
pub const MIN_SAFE_CHARSET_SIZE: usize = 36;

pub struct DisplayOptions {
    pub unicode_support: bool,
    pub color_support: bool,
    pub quiet: bool,
}

pub fn detect_unicode_support() -> bool {
    supports_unicode::on(supports_unicode::Stream::Stdout)
}

pub fn detect_color_support() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

pub fn get_status_symbols(unicode_support: bool) -> (&'static str, &'static str) {
    if unicode_support {
        ("✓", "!")
    } else {
        ("+", "!")
    }
}

/// Prompts for one visible field and returns it verbatim, minus the line
/// terminator. No trimming beyond that: the value feeds the salt byte for
/// byte, and a derivation with trimmed input would not reproduce elsewhere.
pub fn prompt_field(label: &str) -> Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let value = input.trim_end_matches(['\r', '\n']).to_string();
    if value.is_empty() {
        anyhow::bail!("{label} cannot be empty");
    }

    Ok(value)
}

pub fn prompt_master_password() -> Result<Zeroizing<String>> {
    print!("Master password: ");
    io::stdout().flush()?;

    let password = read_password().context("Failed to fetch master password")?;

    if password.is_empty() {
        anyhow::bail!("Master password cannot be empty");
    }

    Ok(Zeroizing::new(password))
}

/// Short tag per enabled class, in the fixed class order.
pub fn charset_label(charsets: CharsetSelection) -> String {
    charsets
        .classes()
        .map(|class| match class {
            CharClass::Lowercase => "a-z",
            CharClass::Uppercase => "A-Z",
            CharClass::Digits => "0-9",
            CharClass::Symbols => "!@#",
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Body-character entropy estimate: `length` base-`base` digits.
pub fn entropy_bits(charsets: CharsetSelection, length: usize) -> f64 {
    length as f64 * (charsets.combined().len() as f64).log2()
}

pub fn show_progress<F, T>(options: &DisplayOptions, f: F) -> Result<(T, Duration)>
where
    F: FnOnce() -> Result<T>,
{
    if !options.quiet {
        println!();
    }

    let term = Term::stdout();
    term.hide_cursor().ok();

    let pb = ProgressBar::new_spinner();

    if options.unicode_support {
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&[
                    "⠁", "⠂", "⠄", "⡀", "⡈", "⡐", "⡠", "⣀", "⣁", "⣂", "⣄", "⣌", "⣔", "⣤", "⣥", "⣦",
                    "⣮", "⣶", "⣷", "⣿", "⡿", "⠿", "⢟", "⠟", "⡛", "⠛", "⠫", "⢋", "⠋", "⠍", "⡉", "⠉",
                    "⠑", "⠡", "⢁", "⠁",
                ]),
        );
    } else {
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("-\\|/-"),
        );
    }

    pb.set_message("Deriving key...");
    pb.enable_steady_tick(Duration::from_millis(80));

    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed();

    pb.finish_and_clear();
    term.show_cursor().ok();

    result.map(|r| (r, elapsed))
}

pub fn display_output(
    password: &Zeroizing<String>,
    site: &str,
    login: &str,
    counter: u32,
    config: &GeneratorConfig,
    elapsed: Duration,
    options: &DisplayOptions,
) {
    if options.quiet {
        println!("{}", &**password);
        return;
    }

    println!("{}\n", &**password);

    display_settings(site, login, counter, config, options);
    display_stats(config, elapsed, options);
}

fn threshold_style(secure: bool, color_support: bool) -> Style {
    if color_support {
        if secure {
            Style::new().green()
        } else {
            Style::new().yellow()
        }
    } else {
        Style::new()
    }
}

fn display_settings(
    site: &str,
    login: &str,
    counter: u32,
    config: &GeneratorConfig,
    options: &DisplayOptions,
) {
    let (check_ok, check_warn) = get_status_symbols(options.unicode_support);

    let kdf_secure = config.iterations >= MIN_SAFE_ITERATIONS;
    let kdf_style = threshold_style(kdf_secure, options.color_support);
    let kdf_status = if kdf_secure { check_ok } else { check_warn };

    let charset_size = config.charsets.combined().len();
    let charset_secure = charset_size >= MIN_SAFE_CHARSET_SIZE;
    let charset_style = threshold_style(charset_secure, options.color_support);
    let charset_status = if charset_secure { check_ok } else { check_warn };

    println!("Settings:");

    println!(
        "  ├─ KDF        {} PBKDF2-{} (i={}, k={} bytes)",
        kdf_style.apply_to(format!("[{kdf_status}]")),
        config.algorithm,
        kdf_style.apply_to(config.iterations),
        config.key_size
    );

    println!("  ├─ Site       {site}");
    println!("  ├─ Login      {login}");
    println!("  ├─ Counter    {counter}");

    println!(
        "  ├─ Charset    {} {} ({} {})",
        charset_style.apply_to(format!("[{charset_status}]")),
        charset_label(config.charsets),
        charset_style.apply_to(charset_size),
        if charset_size == 1 { "char" } else { "chars" }
    );

    println!(
        "  └─ Output     {} {}",
        config.length,
        if config.length == 1 { "char" } else { "chars" }
    );

    println!();
}

fn display_stats(config: &GeneratorConfig, elapsed: Duration, options: &DisplayOptions) {
    let (check_ok, check_warn) = get_status_symbols(options.unicode_support);

    let entropy = entropy_bits(config.charsets, config.length);

    let (status_icon, entropy_style, status_text) = if entropy >= PARANOID_ENTROPY {
        (
            check_ok,
            threshold_style(true, options.color_support),
            "Paranoid",
        )
    } else if entropy >= MIN_SAFE_ENTROPY {
        (
            check_ok,
            threshold_style(true, options.color_support),
            "Strong",
        )
    } else {
        (
            check_warn,
            threshold_style(false, options.color_support),
            "Weak",
        )
    };

    let length_secure = config.length >= MIN_SAFE_PASSWORD_LENGTH;
    let length_style = threshold_style(length_secure, options.color_support);
    let length_status = if length_secure { check_ok } else { check_warn };

    println!("Stats:");

    println!(
        "  ├─ Entropy    {} {} bits ({})",
        entropy_style.apply_to(format!("[{status_icon}]")),
        entropy_style.apply_to(format!("{entropy:.1}")),
        entropy_style.apply_to(status_text)
    );

    println!(
        "  ├─ Length     {} {} {}",
        length_style.apply_to(format!("[{length_status}]")),
        length_style.apply_to(config.length),
        if config.length == 1 { "char" } else { "chars" }
    );

    println!("  └─ Time       {:.1}s", elapsed.as_secs_f64());

    println!(
        "\n{} Security: {}",
        entropy_style.apply_to(format!("[{status_icon}]")),
        entropy_style.apply_to(status_text)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_status_symbols_unicode() {
        let (ok, warn) = get_status_symbols(true);
        assert_eq!(ok, "✓");
        assert_eq!(warn, "!");
    }

    #[test]
    fn test_get_status_symbols_ascii() {
        let (ok, warn) = get_status_symbols(false);
        assert_eq!(ok, "+");
        assert_eq!(warn, "!");
    }

    #[test]
    fn test_charset_label_order() {
        assert_eq!(charset_label(CharsetSelection::ALL), "a-z A-Z 0-9 !@#");

        let no_symbols = CharsetSelection {
            symbols: false,
            ..CharsetSelection::ALL
        };
        assert_eq!(charset_label(no_symbols), "a-z A-Z 0-9");

        let digits_only = CharsetSelection {
            digits: true,
            ..CharsetSelection::NONE
        };
        assert_eq!(charset_label(digits_only), "0-9");
    }

    #[test]
    fn test_entropy_bits_full_charset() {
        let bits = entropy_bits(CharsetSelection::ALL, 16);
        assert!((bits - 104.87).abs() < 0.01);
    }

    #[test]
    fn test_entropy_bits_scale_with_length() {
        let short = entropy_bits(CharsetSelection::ALL, 8);
        let long = entropy_bits(CharsetSelection::ALL, 32);
        assert!((long - 4.0 * short).abs() < 1e-9);
    }

    #[test]
    fn test_default_config_rates_strong() {
        let bits = entropy_bits(CharsetSelection::ALL, GeneratorConfig::DEFAULT_LENGTH);
        assert!(bits >= MIN_SAFE_ENTROPY);
        assert!(bits < PARANOID_ENTROPY);
    }

    #[test]
    fn test_digits_only_rates_weak() {
        let digits_only = CharsetSelection {
            digits: true,
            ..CharsetSelection::NONE
        };
        assert!(entropy_bits(digits_only, 6) < MIN_SAFE_ENTROPY);
    }
}
