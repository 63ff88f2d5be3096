//! # biuro
//!
//! Invoice PDF generation and mailbox forwarding for a small business
//! back office.
//!
//! The library reads structured e-invoice XML (KSeF FA(2) documents),
//! renders a paginated tabular PDF with bilingual labels, and ships with
//! a forwarding loop that relays unseen mailbox messages over SMTP while
//! tracking what has already been sent.
//!
//! ## Quick Start
//!
//! ```no_run
//! use biuro::Config;
//!
//! fn main() -> biuro::Result<()> {
//!     let config = Config::from_env();
//!     let path = biuro::generate_file("invoice.xml", &config)?;
//!     println!("wrote {}", path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Invoice rendering**: A4 pages, wrapped table cells, page breaks
//! - **Per-line rounding**: totals aggregate already-rounded amounts
//! - **Bilingual labels**: Polish for PLN invoices, English otherwise
//! - **Custom fonts**: optional TTF with a builtin Helvetica fallback
//! - **Forwarding**: paginated fetch, dedup store, SMTP delivery, dry-run

pub mod config;
pub mod error;
pub mod forward;
pub mod layout;
pub mod model;
pub mod parser;
pub mod render;
pub mod text;

use std::path::{Path, PathBuf};

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use forward::{
    ForwardOptions, ForwardOutcome, ForwardedSet, MessageSource, Outbound, ProcessingOrder,
    SmtpConfig, SmtpOutbound,
};
pub use model::{InvoiceNumber, InvoiceRecord, LineItem, Party, TaxRate};
pub use render::{Locale, Totals};

/// Parse an invoice XML file and render its PDF into the configured
/// output directory. Returns the path of the written file.
pub fn generate_file<P: AsRef<Path>>(xml_path: P, config: &Config) -> Result<PathBuf> {
    let mut record = parser::parse_file(xml_path.as_ref())?;
    if let Some(tracking) = &config.tracking_override {
        record.tracking_id = tracking.clone();
    }
    render::render_to_file(&record, config)
}
