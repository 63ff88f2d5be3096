//! Data model types.

mod invoice;
mod message;

pub use invoice::{InvoiceNumber, InvoiceRecord, LineItem, Party, TaxRate};
pub(crate) use invoice::round2;
pub use message::{MessageContent, MessageSummary};
