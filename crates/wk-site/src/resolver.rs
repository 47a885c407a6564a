//! Missing-page resolution.
//!
//! Marks internal anchors whose target page does not exist:
//!
//! ```html
//! <a class="internal-link missing" title="This page has not been created yet" href="?page=Ghost" data-page="Ghost">Ghost</a>
//! ```
//!
//! Each distinct target is checked once. All checks of a render start at
//! once on helper threads and share one deadline, so a stalled store costs a
//! single timeout however many pages are linked. A check that errors, panics
//! or misses the deadline marks only its own page as missing.
//!
//! A check that misses the deadline keeps its thread until the store returns.
//! The number of such outstanding checks is capped per resolver; pages that
//! find no free slot before the deadline are reported missing unchecked.

use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, LazyLock};
use std::thread;
use std::time::{Duration, Instant};

use regex::{Captures, Regex};
use wk_renderer::{INTERNAL_LINK_CLASS, PAGE_ATTRIBUTE, escape_html};
use wk_storage::{Storage, StorageError};

/// Class added to anchors pointing at pages that do not exist.
pub const MISSING_CLASS: &str = "missing";
/// Default hover label of a missing link.
pub const DEFAULT_MISSING_TITLE: &str = "This page has not been created yet";
/// Default bound on a single existence check.
pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(2);
/// Default cap on existence checks running at the same time.
pub const DEFAULT_MAX_OUTSTANDING_CHECKS: usize = 64;

static ANCHOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"<a class="{INTERNAL_LINK_CLASS}" href="([^"]*)" {PAGE_ATTRIBUTE}="([^"]*)">"#
    ))
    .unwrap()
});

/// Annotated HTML and the pages found missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// HTML with missing anchors marked.
    pub html: String,
    /// Missing page names, sorted and deduplicated.
    pub missing: Vec<String>,
}

/// Outcome of one existence check as reported by its helper thread.
type CheckOutcome = thread::Result<Result<bool, StorageError>>;

/// Progress of one page through a resolve call.
#[derive(Clone, Copy, PartialEq, Eq)]
enum CheckState {
    Queued,
    Running,
    Done,
}

/// Annotates internal links to pages absent from a page store.
///
/// Clones share the cap on outstanding checks.
#[derive(Clone)]
pub struct MissingPageResolver {
    storage: Arc<dyn Storage>,
    timeout: Duration,
    missing_title: String,
    max_outstanding: usize,
    outstanding: Arc<AtomicUsize>,
}

impl std::fmt::Debug for MissingPageResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MissingPageResolver")
            .field("timeout", &self.timeout)
            .field("missing_title", &self.missing_title)
            .field("max_outstanding", &self.max_outstanding)
            .field("outstanding", &self.outstanding_checks())
            .finish_non_exhaustive()
    }
}

impl MissingPageResolver {
    /// Create a resolver checking pages against `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            timeout: DEFAULT_CHECK_TIMEOUT,
            missing_title: DEFAULT_MISSING_TITLE.to_owned(),
            max_outstanding: DEFAULT_MAX_OUTSTANDING_CHECKS,
            outstanding: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Set the bound on a single existence check.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the hover label of missing links.
    #[must_use]
    pub fn with_missing_title(mut self, title: impl Into<String>) -> Self {
        self.missing_title = title.into();
        self
    }

    /// Set the cap on existence checks running at the same time, including
    /// checks left behind by earlier timeouts. Clamped to at least one.
    #[must_use]
    pub fn with_max_outstanding_checks(mut self, max: usize) -> Self {
        self.max_outstanding = max.max(1);
        self
    }

    /// Existence checks whose helper thread has not returned yet.
    #[must_use]
    pub fn outstanding_checks(&self) -> usize {
        self.outstanding.load(Ordering::Acquire)
    }

    /// Mark every internal anchor in `html` whose page does not exist.
    ///
    /// Anchors already marked are left alone, so resolving twice is harmless.
    #[must_use]
    pub fn resolve(&self, html: &str) -> Resolution {
        let pages: BTreeSet<String> = ANCHOR_PATTERN
            .captures_iter(html)
            .map(|caps| unescape_attribute(&caps[2]))
            .collect();
        if pages.is_empty() {
            return Resolution {
                html: html.to_owned(),
                missing: Vec::new(),
            };
        }

        let pages: Vec<String> = pages.into_iter().collect();
        let exists = self.check_pages(&pages);
        let missing: Vec<String> = pages
            .iter()
            .zip(&exists)
            .filter(|(_, exists)| !**exists)
            .map(|(page, _)| page.clone())
            .collect();
        tracing::debug!(
            checked = pages.len(),
            missing = missing.len(),
            "Resolved internal links"
        );

        if missing.is_empty() {
            return Resolution {
                html: html.to_owned(),
                missing,
            };
        }

        let title = escape_html(&self.missing_title);
        let html = ANCHOR_PATTERN
            .replace_all(html, |caps: &Captures| {
                if missing.binary_search(&unescape_attribute(&caps[2])).is_ok() {
                    format!(
                        r#"<a class="{INTERNAL_LINK_CLASS} {MISSING_CLASS}" title="{title}" href="{}" {PAGE_ATTRIBUTE}="{}">"#,
                        &caps[1], &caps[2]
                    )
                } else {
                    caps[0].to_owned()
                }
            })
            .into_owned();

        Resolution { html, missing }
    }

    /// Check every page against one shared deadline.
    ///
    /// Anything but a confirmed `true` counts as missing.
    fn check_pages(&self, pages: &[String]) -> Vec<bool> {
        let deadline = Instant::now() + self.timeout;
        let (tx, rx) = mpsc::channel();
        let mut exists = vec![false; pages.len()];
        let mut states = vec![CheckState::Queued; pages.len()];
        let mut next = 0;
        let mut running = 0;

        loop {
            while next < pages.len() && self.try_acquire_slot() {
                if self.spawn_check(next, &pages[next], tx.clone()) {
                    states[next] = CheckState::Running;
                    running += 1;
                } else {
                    states[next] = CheckState::Done;
                }
                next += 1;
            }
            if running == 0 {
                break;
            }

            let Ok((index, outcome)) =
                rx.recv_timeout(deadline.saturating_duration_since(Instant::now()))
            else {
                break;
            };
            states[index] = CheckState::Done;
            running -= 1;
            exists[index] = Self::interpret(&pages[index], &outcome);
        }

        for (page, state) in pages.iter().zip(&states) {
            match state {
                CheckState::Running => {
                    tracing::warn!(
                        page,
                        timeout = ?self.timeout,
                        "Page existence check timed out"
                    );
                }
                CheckState::Queued => {
                    tracing::warn!(
                        page,
                        "Page existence check skipped, too many outstanding checks"
                    );
                }
                CheckState::Done => {}
            }
        }
        if running > 0 || next < pages.len() {
            tracing::warn!(
                outstanding = self.outstanding_checks(),
                max = self.max_outstanding,
                "Page existence checks still outstanding"
            );
        }

        exists
    }

    /// Reserve a slot for one more running check.
    fn try_acquire_slot(&self) -> bool {
        self.outstanding
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
                (count < self.max_outstanding).then_some(count + 1)
            })
            .is_ok()
    }

    /// Start the check for `page` on a helper thread holding a reserved slot.
    ///
    /// Returns `false`, with the slot released, if the thread could not start.
    fn spawn_check(&self, index: usize, page: &str, tx: Sender<(usize, CheckOutcome)>) -> bool {
        let storage = Arc::clone(&self.storage);
        let outstanding = Arc::clone(&self.outstanding);
        let name = page.to_owned();
        let spawned = thread::Builder::new()
            .name("wk-page-check".to_owned())
            .spawn(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| storage.exists(&name)));
                outstanding.fetch_sub(1, Ordering::AcqRel);
                // The receiver is gone once the deadline passed.
                let _ = tx.send((index, outcome));
            });

        match spawned {
            Ok(_) => true,
            Err(error) => {
                self.outstanding.fetch_sub(1, Ordering::AcqRel);
                tracing::warn!(page, %error, "Failed to start page existence check");
                false
            }
        }
    }

    fn interpret(page: &str, outcome: &CheckOutcome) -> bool {
        match outcome {
            Ok(Ok(exists)) => *exists,
            Ok(Err(error)) => {
                tracing::warn!(page, %error, "Page existence check failed");
                false
            }
            Err(_) => {
                tracing::warn!(page, "Page existence check panicked");
                false
            }
        }
    }
}

/// Reverse of [`escape_html`].
fn unescape_attribute(value: &str) -> String {
    if !value.contains('&') {
        return value.to_owned();
    }
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}
