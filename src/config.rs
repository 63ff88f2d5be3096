//! Environment-style configuration.
//!
//! All keys come from the process environment; the CLI loads a `.env` file
//! before constructing a [`Config`]. Bank accounts are looked up dynamically
//! per currency (`ACCOUNT_PLN`, `ACCOUNT_EUR`, ...), so they stay a method
//! rather than a field.

use std::env;
use std::path::PathBuf;

/// Configuration inputs for invoice rendering.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Destination directory for generated PDFs (`OUTPUT_DIR`, default `.`).
    pub output_dir: PathBuf,

    /// Optional TTF font enabling native-character rendering (`INVOICE_FONT`).
    pub font_path: Option<PathBuf>,

    /// Override for the external tracking id (`KSEF_NUMBER`).
    pub tracking_override: Option<String>,
}

impl Config {
    /// Build a configuration from the process environment.
    pub fn from_env() -> Self {
        Self {
            output_dir: env::var("OUTPUT_DIR")
                .map(|d| PathBuf::from(expand_home(&d)))
                .unwrap_or_else(|_| PathBuf::from(".")),
            font_path: env::var("INVOICE_FONT").ok().map(PathBuf::from),
            tracking_override: env::var("KSEF_NUMBER").ok().filter(|v| !v.is_empty()),
        }
    }

    /// Look up the bank account configured for a currency code.
    ///
    /// Returns `None` when the `ACCOUNT_{currency}` variable is unset or
    /// empty; the caller decides whether that warrants a warning.
    pub fn bank_account(&self, currency: &str) -> Option<String> {
        env::var(format!("ACCOUNT_{currency}"))
            .ok()
            .filter(|v| !v.is_empty())
    }
}

/// Expand a leading `~` to the user's home directory.
fn expand_home(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Ok(home) = env::var("HOME") {
            return format!("{home}/{rest}");
        }
    }
    path.to_string()
}
