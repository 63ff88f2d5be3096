//! Message-forwarding loop.
//!
//! Fetches paginated message summaries from an upstream source, forwards
//! each unseen message downstream, and records its identifier. The set of
//! forwarded identifiers is written once at the end of a run, so a crash
//! after a send but before the write re-forwards on the next run:
//! at-least-once, accepted by design.

mod mailer;
mod source;
mod store;

pub use mailer::{SmtpConfig, SmtpOutbound};
pub use source::{decode_body, MessageSource, Outbound};
pub use store::ForwardedSet;

use log::{info, warn};

use crate::error::Result;
use crate::model::MessageSummary;

/// Hard safety ceiling on fetched pages for the pre-loading variant.
pub const DEFAULT_PAGE_CEILING: u32 = 50;

/// Order in which fetched messages are processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingOrder {
    /// Process messages page by page, in raw source order, stopping early
    /// once a whole page is already known.
    #[default]
    PageOrder,
    /// Pre-fetch all pages and process unread messages first, newest first
    /// within each group — approximating how an inbox presents itself.
    NewestUnreadFirst,
}

/// Options for one forwarding run.
#[derive(Debug, Clone)]
pub struct ForwardOptions {
    /// Record identifiers without delivering anything.
    pub dry_run: bool,
    pub order: ProcessingOrder,
    pub page_ceiling: u32,
}

impl Default for ForwardOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            order: ProcessingOrder::default(),
            page_ceiling: DEFAULT_PAGE_CEILING,
        }
    }
}

/// Result of one forwarding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwardOutcome {
    /// Messages forwarded (or recorded, in dry-run mode) this run.
    pub forwarded: usize,
}

/// Run the forwarding loop once.
///
/// The store is loaded by the caller, mutated in memory per message, and
/// saved exactly once here at the end of the run.
pub fn run(
    source: &mut dyn MessageSource,
    store: &mut ForwardedSet,
    outbound: &mut dyn Outbound,
    options: &ForwardOptions,
) -> Result<ForwardOutcome> {
    let forwarded = match options.order {
        ProcessingOrder::PageOrder => run_incremental(source, store, outbound, options)?,
        ProcessingOrder::NewestUnreadFirst => run_newest_first(source, store, outbound, options)?,
    };
    store.save()?;
    if forwarded == 0 {
        info!("no new messages");
    } else {
        let label = if options.dry_run { "recorded" } else { "forwarded" };
        info!("{forwarded} message(s) {label}");
    }
    Ok(ForwardOutcome { forwarded })
}

/// Page-by-page variant: stop on an empty page or on a page where every
/// message is already known.
fn run_incremental(
    source: &mut dyn MessageSource,
    store: &mut ForwardedSet,
    outbound: &mut dyn Outbound,
    options: &ForwardOptions,
) -> Result<usize> {
    let mut forwarded = 0;
    let mut page = 1;
    loop {
        let messages = source.fetch_page(page)?;
        if messages.is_empty() {
            break;
        }

        let mut all_known = true;
        for summary in &messages {
            if store.contains(&summary.id) {
                continue;
            }
            all_known = false;
            forward_one(source, store, outbound, summary, options.dry_run)?;
            forwarded += 1;
        }

        if all_known {
            break;
        }
        page += 1;
    }
    Ok(forwarded)
}

/// Pre-loading variant: fetch every page up front, then process messages
/// unread-first and newest-first.
fn run_newest_first(
    source: &mut dyn MessageSource,
    store: &mut ForwardedSet,
    outbound: &mut dyn Outbound,
    options: &ForwardOptions,
) -> Result<usize> {
    let total = source.total_count()?;
    let mut all: Vec<MessageSummary> = Vec::new();
    let mut page = 1;
    loop {
        let messages = source.fetch_page(page)?;
        if messages.is_empty() {
            break;
        }
        all.extend(messages);
        if let Some(total) = total {
            if all.len() >= total {
                break;
            }
        }
        if page >= options.page_ceiling {
            warn!("page ceiling {} reached; processing what was fetched", options.page_ceiling);
            break;
        }
        page += 1;
    }

    // Unread before read; newest first within each group.
    all.sort_by(|a, b| {
        let a_unread = a.unread.unwrap_or(false);
        let b_unread = b.unread.unwrap_or(false);
        b_unread
            .cmp(&a_unread)
            .then_with(|| b.sent_at.cmp(&a.sent_at))
    });

    let mut forwarded = 0;
    for summary in &all {
        if store.contains(&summary.id) {
            continue;
        }
        forward_one(source, store, outbound, summary, options.dry_run)?;
        forwarded += 1;
    }
    Ok(forwarded)
}

fn forward_one(
    source: &mut dyn MessageSource,
    store: &mut ForwardedSet,
    outbound: &mut dyn Outbound,
    summary: &MessageSummary,
    dry_run: bool,
) -> Result<()> {
    let content = source.fetch_content(&summary.id)?;
    if dry_run {
        info!(
            "[dry run] would forward {:?} (from {}, {})",
            content.subject, content.sender, content.date
        );
    } else {
        let body = format!(
            "From: {}\nDate: {}\n---\n\n{}",
            content.sender,
            content.date,
            decode_body(&content.body)
        );
        outbound.deliver(&content.subject, &body)?;
        info!("forwarded {:?} (from {})", content.subject, content.sender);
    }
    store.insert(&summary.id);
    Ok(())
}
