//! Directory chain walking.

use super::TraverseResult;
use ledger_backend::LedgerBackend;
use ledger_types::{AccountCursor, DirectoryPage, LedgerSequence, ObjectKey, keylet};
use std::collections::HashSet;
use tracing::{trace, warn};

/// Keys collected from the directory chain, and where to resume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ChainWalk {
    /// Collected keys, in chain order then in-page order.
    pub(crate) keys: Vec<ObjectKey>,
    /// The cursor to hand back to the client.
    pub(crate) next: AccountCursor,
}

impl ChainWalk {
    /// The chain is exhausted after `keys`.
    const fn terminal(keys: Vec<ObjectKey>) -> Self {
        Self { keys, next: AccountCursor::TERMINAL }
    }
}

/// Walks one account's owner directory at one ledger sequence.
///
/// Pages are fetched one at a time: each page's address is only known
/// once the previous page has been read.
#[derive(Debug)]
pub(crate) struct DirectoryChainWalker<'a, B> {
    backend: &'a B,
    root: ObjectKey,
    sequence: LedgerSequence,
}

impl<'a, B: LedgerBackend> DirectoryChainWalker<'a, B> {
    /// Create a walker over the directory rooted at `root`.
    pub(crate) const fn new(backend: &'a B, root: ObjectKey, sequence: LedgerSequence) -> Self {
        Self { backend, root, sequence }
    }

    /// Fetch and decode page `page_number`, if it is stored.
    async fn fetch_page(&self, page_number: u64) -> TraverseResult<Option<DirectoryPage>> {
        let key = keylet::page(&self.root, page_number);
        let Some(blob) = self.backend.fetch_ledger_object(key, self.sequence).await? else {
            return Ok(None);
        };
        Ok(Some(DirectoryPage::decode(&blob)?))
    }

    /// Collect up to `limit` keys, starting after `start`.
    ///
    /// Stops with a cursor at the last collected key when `limit` keys are
    /// collected, even if that key was the final entry of the chain. A
    /// missing start page, a resume point absent from its page, a dangling
    /// `next_page` link and a page revisited within one walk all end the
    /// walk with the terminal cursor.
    pub(crate) async fn walk(&self, start: AccountCursor, limit: usize) -> TraverseResult<ChainWalk> {
        if limit == 0 {
            return Ok(ChainWalk { keys: Vec::new(), next: start });
        }

        let mut page_number = start.page;
        let Some(mut page) = self.fetch_page(page_number).await? else {
            warn!(page = page_number, "start page not found, ending traversal");
            return Ok(ChainWalk::terminal(Vec::new()));
        };

        // Duplicate entries resume after the first occurrence.
        let mut position = 0;
        if start.has_resume_point() {
            let Some(found) = page.entries.iter().position(|entry| *entry == start.last_index)
            else {
                warn!(
                    page = page_number,
                    last_index = %start.last_index,
                    "resume point not found on page, ending traversal"
                );
                return Ok(ChainWalk::terminal(Vec::new()));
            };
            position = found + 1;
        }

        let mut visited = HashSet::from([page_number]);
        let mut keys = Vec::with_capacity(limit.min(page.entries.len()));
        loop {
            for entry in &page.entries[position..] {
                keys.push(*entry);
                if keys.len() == limit {
                    trace!(collected = keys.len(), page = page_number, "limit reached");
                    let next = AccountCursor::new(*entry, page_number);
                    return Ok(ChainWalk { keys, next });
                }
            }

            if page.is_last() {
                trace!(collected = keys.len(), "directory chain exhausted");
                return Ok(ChainWalk::terminal(keys));
            }

            let next_page = page.next_page;
            if !visited.insert(next_page) {
                warn!(page = page_number, next_page, "directory chain revisits a page");
                return Ok(ChainWalk::terminal(keys));
            }
            let Some(next) = self.fetch_page(next_page).await? else {
                warn!(page = page_number, next_page, "next directory page not found");
                return Ok(ChainWalk::terminal(keys));
            };
            page = next;
            page_number = next_page;
            position = 0;
        }
    }
}
