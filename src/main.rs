mod charset;
mod error;
mod generator;
mod kdf;
mod ui;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use copypasta::{ClipboardContext, ClipboardProvider};

use crate::charset::CharsetSelection;
use crate::kdf::{GeneratorConfig, HashAlgorithm};

#[derive(Parser)]
#[command(
    name = "sitepass",
    version,
    author,
    about = "Stateless per-site password derivation using PBKDF2"
)]
struct Cli {
    /// Site the password is for
    site: Option<String>,

    /// Login used on the site
    login: Option<String>,

    /// Rotation counter mixed into the salt
    #[arg(short, long, default_value_t = 1)]
    counter: u32,

    /// Length of the generated password
    #[arg(short = 'n', long, default_value_t = GeneratorConfig::DEFAULT_LENGTH)]
    length: usize,

    #[arg(short, long, value_enum, default_value = "sha256")]
    digest: Digest,

    /// PBKDF2 iteration count
    #[arg(short, long, default_value_t = GeneratorConfig::DEFAULT_ITERATIONS)]
    iterations: u32,

    /// Derived key size in bytes
    #[arg(short, long, default_value_t = GeneratorConfig::DEFAULT_KEY_SIZE)]
    key_size: usize,

    #[arg(long)]
    no_lowercase: bool,

    #[arg(long)]
    no_uppercase: bool,

    #[arg(long)]
    no_digits: bool,

    #[arg(long)]
    no_symbols: bool,

    /// Copy the password to the clipboard
    #[arg(long)]
    copy: bool,

    /// Print the password and nothing else
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
enum Digest {
    Sha256,
    Sha384,
    Sha512,
}

impl From<Digest> for HashAlgorithm {
    fn from(digest: Digest) -> Self {
        match digest {
            Digest::Sha256 => HashAlgorithm::Sha256,
            Digest::Sha384 => HashAlgorithm::Sha384,
            Digest::Sha512 => HashAlgorithm::Sha512,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let charsets = CharsetSelection {
        lowercase: !cli.no_lowercase,
        uppercase: !cli.no_uppercase,
        digits: !cli.no_digits,
        symbols: !cli.no_symbols,
    };

    if charsets.is_empty() {
        anyhow::bail!("Every character class is disabled; enable at least one");
    }

    let options = ui::DisplayOptions {
        unicode_support: ui::detect_unicode_support(),
        color_support: ui::detect_color_support(),
        quiet: cli.quiet,
    };

    let site = match cli.site {
        Some(site) => site,
        None => ui::prompt_field("Site")?,
    };
    let login = match cli.login {
        Some(login) => login,
        None => ui::prompt_field("Login")?,
    };
    let master_password = ui::prompt_master_password()?;

    let config = GeneratorConfig {
        charsets,
        key_size: cli.key_size,
        algorithm: cli.digest.into(),
        length: cli.length,
        iterations: cli.iterations,
    };

    let salt = kdf::compose_salt(&site, &login, cli.counter);

    let (password, elapsed) = ui::show_progress(&options, || {
        generator::generate(&master_password, &salt, &config).map_err(Into::into)
    })?;

    ui::display_output(
        &password, &site, &login, cli.counter, &config, elapsed, &options,
    );

    if cli.copy {
        if let Err(e) = copy_to_clipboard(&password) {
            eprintln!("Warning: could not copy to clipboard: {e}");
        } else if !cli.quiet {
            println!("\nCopied to clipboard.");
        }
    }

    Ok(())
}

fn copy_to_clipboard(password: &str) -> Result<()> {
    let mut ctx = ClipboardContext::new().map_err(|e| anyhow::anyhow!("{e}"))?;
    ctx.set_contents(password.to_string())
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(())
}
