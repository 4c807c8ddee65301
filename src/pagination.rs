//! Paged listing cursor
//!
//! A [`Cursor`] accumulates the items of one listing context (a discover
//! filter set, a search query) page by page. Loading is split in two: the
//! cursor hands out a [`LoadTicket`], the caller fetches, and the result is
//! applied back with the ticket. A ticket issued before the last
//! [`Cursor::reset`] is stale and its result is dropped, which is how late
//! responses for an abandoned context are discarded.

use crate::media::Page;
use std::fmt;
use tracing::debug;

/// Page bookkeeping of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    /// Last successfully loaded page, 1-based
    pub page: u32,
    /// Total pages reported by the last response; 0 until one arrives
    pub total_pages: u32,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page: 1,
            total_pages: 0,
        }
    }
}

impl PaginationState {
    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorState {
    Idle,
    /// First page of a fresh context in flight
    Loading { page: u32 },
    Loaded,
    /// A follow-up page in flight; loaded items stay visible
    LoadingMore { page: u32 },
    /// The fetch of `page` failed; [`Cursor::retry`] re-issues it
    Error { page: u32, message: String },
}

/// Permission to fetch one page for one context generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    page: u32,
}

impl LoadTicket {
    pub fn page(&self) -> u32 {
        self.page
    }
}

/// What happened to a result handed back to the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// The ticket belongs to an older context or an already settled load
    Stale,
}

#[derive(Debug)]
pub struct Cursor<C, T> {
    context: Option<C>,
    generation: u64,
    state: CursorState,
    pagination: PaginationState,
    items: Vec<T>,
}

impl<C, T> Default for Cursor<C, T> {
    fn default() -> Self {
        Self {
            context: None,
            generation: 0,
            state: CursorState::Idle,
            pagination: PaginationState::default(),
            items: Vec::new(),
        }
    }
}

impl<C: fmt::Debug, T> Cursor<C, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context(&self) -> Option<&C> {
        self.context.as_ref()
    }

    pub fn state(&self) -> &CursorState {
        &self.state
    }

    pub fn pagination(&self) -> PaginationState {
        self.pagination
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        matches!(
            self.state,
            CursorState::Loading { .. } | CursorState::LoadingMore { .. }
        )
    }

    /// Switches to `context` and starts over at page 1
    ///
    /// Items are cleared before the first fetch and every ticket handed out
    /// so far becomes stale.
    pub fn reset(&mut self, context: C) -> LoadTicket {
        self.generation += 1;
        debug!(?context, generation = self.generation, "Listing reset");

        self.context = Some(context);
        self.items.clear();
        self.pagination = PaginationState::default();
        self.state = CursorState::Loading { page: 1 };

        LoadTicket {
            generation: self.generation,
            page: 1,
        }
    }

    /// Requests the next page
    ///
    /// Returns `None`, leaving the cursor untouched, unless the current page
    /// is loaded and the provider reported more pages.
    pub fn load_next(&mut self) -> Option<LoadTicket> {
        if self.state != CursorState::Loaded || !self.pagination.has_more() {
            return None;
        }

        let page = self.pagination.page + 1;
        self.state = CursorState::LoadingMore { page };
        Some(LoadTicket {
            generation: self.generation,
            page,
        })
    }

    /// Re-issues the page whose fetch failed
    pub fn retry(&mut self) -> Option<LoadTicket> {
        let CursorState::Error { page, .. } = self.state else {
            return None;
        };

        self.state = if page == 1 {
            CursorState::Loading { page }
        } else {
            CursorState::LoadingMore { page }
        };
        Some(LoadTicket {
            generation: self.generation,
            page,
        })
    }

    /// Applies a fetched page: page 1 replaces, later pages append
    pub fn apply_page(&mut self, ticket: LoadTicket, page: Page<T>) -> ApplyOutcome {
        if !self.accepts(ticket) {
            debug!(page = ticket.page, "Discarding stale listing page");
            return ApplyOutcome::Stale;
        }

        if ticket.page == 1 {
            self.items = page.items;
        } else {
            self.items.extend(page.items);
        }
        self.pagination = PaginationState {
            page: ticket.page,
            total_pages: page.total_pages,
        };
        self.state = CursorState::Loaded;
        ApplyOutcome::Applied
    }

    /// Records a failed fetch; already loaded items are kept
    pub fn apply_error(&mut self, ticket: LoadTicket, error: &dyn fmt::Display) -> ApplyOutcome {
        if !self.accepts(ticket) {
            debug!(page = ticket.page, "Discarding stale listing error");
            return ApplyOutcome::Stale;
        }

        self.state = CursorState::Error {
            page: ticket.page,
            message: error.to_string(),
        };
        ApplyOutcome::Applied
    }

    fn accepts(&self, ticket: LoadTicket) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        match self.state {
            CursorState::Loading { page } | CursorState::LoadingMore { page } => page == ticket.page,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestCursor = Cursor<&'static str, u32>;

    fn page(items: &[u32], total_pages: u32) -> Page<u32> {
        Page {
            items: items.to_vec(),
            total_pages,
        }
    }

    #[test]
    fn test_fresh_cursor_is_idle() {
        let mut cursor = TestCursor::new();
        assert_eq!(cursor.state(), &CursorState::Idle);
        assert_eq!(cursor.pagination().total_pages, 0);
        assert!(!cursor.pagination().has_more());
        assert!(cursor.load_next().is_none());
        assert!(cursor.retry().is_none());
    }

    #[test]
    fn test_first_page_then_more() {
        let mut cursor = TestCursor::new();
        let ticket = cursor.reset("popular");
        assert_eq!(cursor.state(), &CursorState::Loading { page: 1 });
        assert_eq!(ticket.page(), 1);

        assert_eq!(cursor.apply_page(ticket, page(&[1, 2], 3)), ApplyOutcome::Applied);
        assert_eq!(cursor.state(), &CursorState::Loaded);
        assert!(cursor.pagination().has_more());

        let next = cursor.load_next().unwrap();
        assert_eq!(next.page(), 2);
        assert_eq!(cursor.state(), &CursorState::LoadingMore { page: 2 });
        assert!(cursor.is_loading());

        cursor.apply_page(next, page(&[3, 4], 3));
        assert_eq!(cursor.items(), &[1, 2, 3, 4]);
        assert_eq!(cursor.pagination(), PaginationState { page: 2, total_pages: 3 });
    }

    #[test]
    fn test_load_next_on_last_page_is_noop() {
        let mut cursor = TestCursor::new();
        let ticket = cursor.reset("q");
        cursor.apply_page(ticket, page(&[1], 1));

        let before_state = cursor.state().clone();
        let before_pagination = cursor.pagination();

        assert!(cursor.load_next().is_none());
        assert_eq!(cursor.state(), &before_state);
        assert_eq!(cursor.pagination(), before_pagination);
        assert_eq!(cursor.items(), &[1]);
    }

    #[test]
    fn test_load_next_while_loading_is_noop() {
        let mut cursor = TestCursor::new();
        let ticket = cursor.reset("q");
        cursor.apply_page(ticket, page(&[1], 5));
        let next = cursor.load_next().unwrap();

        assert!(cursor.load_next().is_none());
        assert_eq!(cursor.state(), &CursorState::LoadingMore { page: next.page() });
    }

    #[test]
    fn test_reset_clears_previous_context() {
        let mut cursor = TestCursor::new();
        let ticket = cursor.reset("genre-28");
        cursor.apply_page(ticket, page(&[1, 2, 3], 4));
        let more = cursor.load_next().unwrap();
        cursor.apply_page(more, page(&[4], 4));

        let ticket = cursor.reset("genre-35");
        assert!(cursor.items().is_empty());
        assert_eq!(cursor.pagination(), PaginationState::default());
        assert_eq!(cursor.context(), Some(&"genre-35"));

        cursor.apply_page(ticket, page(&[9], 1));
        assert_eq!(cursor.items(), &[9]);
    }

    #[test]
    fn test_late_response_for_old_context_is_discarded() {
        let mut cursor = TestCursor::new();
        let old = cursor.reset("genre-28");
        let current = cursor.reset("genre-35");

        assert_eq!(cursor.apply_page(current, page(&[35], 2)), ApplyOutcome::Applied);
        assert_eq!(cursor.apply_page(old, page(&[28], 9)), ApplyOutcome::Stale);

        assert_eq!(cursor.items(), &[35]);
        assert_eq!(cursor.pagination().total_pages, 2);
        assert_eq!(cursor.context(), Some(&"genre-35"));
    }

    #[test]
    fn test_late_response_before_current_arrives_is_discarded() {
        let mut cursor = TestCursor::new();
        let old = cursor.reset("genre-28");
        let current = cursor.reset("genre-35");

        assert_eq!(cursor.apply_page(old, page(&[28], 9)), ApplyOutcome::Stale);
        assert!(cursor.items().is_empty());
        assert_eq!(cursor.state(), &CursorState::Loading { page: 1 });

        cursor.apply_page(current, page(&[35], 1));
        assert_eq!(cursor.items(), &[35]);
    }

    #[test]
    fn test_ticket_cannot_be_applied_twice() {
        let mut cursor = TestCursor::new();
        let ticket = cursor.reset("q");
        cursor.apply_page(ticket, page(&[1], 2));
        assert_eq!(cursor.apply_page(ticket, page(&[1], 2)), ApplyOutcome::Stale);
        assert_eq!(cursor.items(), &[1]);
    }

    #[test]
    fn test_error_on_more_keeps_items_and_retries_same_page() {
        let mut cursor = TestCursor::new();
        let ticket = cursor.reset("q");
        cursor.apply_page(ticket, page(&[1, 2], 3));
        let next = cursor.load_next().unwrap();

        cursor.apply_error(next, &"HTTP 502 Bad Gateway");
        assert_eq!(
            cursor.state(),
            &CursorState::Error {
                page: 2,
                message: "HTTP 502 Bad Gateway".into()
            }
        );
        assert_eq!(cursor.items(), &[1, 2]);
        assert!(cursor.load_next().is_none());

        let retry = cursor.retry().unwrap();
        assert_eq!(retry.page(), 2);
        assert_eq!(cursor.state(), &CursorState::LoadingMore { page: 2 });
        cursor.apply_page(retry, page(&[3], 3));
        assert_eq!(cursor.items(), &[1, 2, 3]);
    }

    #[test]
    fn test_error_on_first_page_retries_page_one() {
        let mut cursor = TestCursor::new();
        let ticket = cursor.reset("q");
        cursor.apply_error(ticket, &"timeout");

        let retry = cursor.retry().unwrap();
        assert_eq!(retry.page(), 1);
        assert_eq!(cursor.state(), &CursorState::Loading { page: 1 });
    }
}
