//! Paged browsing of an ordered result set.
//!
//! Split the same way as the rest of the console layer:
//! - Pure: [`PageCursor`] arithmetic, [`parse_command`], [`page_lines`]
//! - Effects: [`PaginatedBrowser::browse`], which fetches, renders, and reads
//!
//! Pages are fetched again on every display cycle rather than cached, since
//! other sessions may write between views.

use tracing::{debug, warn};

use crate::error::StoreError;
use crate::types::{Id, Listed, PAGE_SIZE, PageRequest};

use super::select::CandidateSet;
use super::signal::{CancelSignal, Prompted};
use super::terminal::Console;

// ============================================================================
// SOURCE
// ============================================================================

/// Anything that can produce one page of records.
///
/// Implemented for closures, so a screen can adapt any repository query:
/// `|req: &PageRequest| repo.channel_page(req)`.
pub trait PageSource {
    type Item: Listed;

    fn fetch(&self, request: &PageRequest) -> Result<Vec<Self::Item>, StoreError>;
}

impl<T, F> PageSource for F
where
    T: Listed,
    F: Fn(&PageRequest) -> Result<Vec<T>, StoreError>,
{
    type Item = T;

    fn fetch(&self, request: &PageRequest) -> Result<Vec<T>, StoreError> {
        self(request)
    }
}

// ============================================================================
// PURE PARTS
// ============================================================================

/// Current 1-based page number. Never below 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    page: u32,
}

impl PageCursor {
    pub fn first() -> Self {
        PageCursor { page: 1 }
    }

    pub fn page(self) -> u32 {
        self.page
    }

    pub fn is_first(self) -> bool {
        self.page == 1
    }

    pub fn next(self) -> Self {
        PageCursor {
            page: self.page.saturating_add(1),
        }
    }

    /// The previous page, or `None` on the first page.
    pub fn prev(self) -> Option<Self> {
        if self.is_first() {
            None
        } else {
            Some(PageCursor { page: self.page - 1 })
        }
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        PageCursor::first()
    }
}

/// A valid command typed at a non-empty page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerCommand {
    Next,
    Prev,
    Select(Id),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Neither a paging keyword nor a number.
    Unknown(String),
    /// A number that is not an id on the current page.
    NotOnPage(Id),
}

/// Interpret one line typed at a page.
///
/// Cancel tokens never reach this function; `read_raw` has already turned
/// them into a signal.
pub fn parse_command(input: &str, candidates: &CandidateSet) -> Result<PagerCommand, CommandError> {
    let token = input.trim();
    if token.eq_ignore_ascii_case("n") || token.eq_ignore_ascii_case("next") {
        return Ok(PagerCommand::Next);
    }
    if token.eq_ignore_ascii_case("p") || token.eq_ignore_ascii_case("prev") {
        return Ok(PagerCommand::Prev);
    }
    match token.parse::<Id>() {
        Ok(id) if candidates.contains(id) => Ok(PagerCommand::Select(id)),
        Ok(id) => Err(CommandError::NotOnPage(id)),
        Err(_) => Err(CommandError::Unknown(token.to_string())),
    }
}

/// List lines for one page: `(id, summary)` in display order.
pub fn page_lines<T: Listed>(records: &[T]) -> Vec<(Id, String)> {
    records.iter().map(|r| (r.id(), r.summary())).collect()
}

// ============================================================================
// BROWSER
// ============================================================================

/// Lets a user step through pages and pick one record, or cancel.
pub struct PaginatedBrowser<S> {
    title: String,
    source: S,
    viewer_id: Id,
    context_id: Option<Id>,
    page_size: u32,
}

/// What the browser should do after reading a command at a page.
enum Turn<T> {
    Show(PageCursor),
    Picked(T),
}

impl<S: PageSource> PaginatedBrowser<S> {
    pub fn new(title: impl Into<String>, viewer_id: Id, source: S) -> Self {
        PaginatedBrowser {
            title: title.into(),
            source,
            viewer_id,
            context_id: None,
            page_size: PAGE_SIZE,
        }
    }

    /// Scope every request to an owning entity (e.g. a channel).
    pub fn in_context(mut self, context_id: Id) -> Self {
        self.context_id = Some(context_id);
        self
    }

    fn request(&self, cursor: PageCursor) -> PageRequest {
        PageRequest {
            context_id: self.context_id,
            viewer_id: self.viewer_id,
            page_number: cursor.page(),
            page_size: self.page_size,
        }
    }

    /// Fetch a page. A failed fetch reads as an empty page.
    fn fetch(&self, cursor: PageCursor) -> Vec<S::Item> {
        let request = self.request(cursor);
        debug!(title = %self.title, page = request.page_number, context = ?request.context_id, "fetching page");
        match self.source.fetch(&request) {
            Ok(records) => records,
            Err(e) => {
                warn!(title = %self.title, page = request.page_number, error = %e, "page fetch failed, showing as empty");
                Vec::new()
            }
        }
    }

    /// Run the browse loop until a record is picked or the user cancels.
    ///
    /// Paging past the last page steps back to the last non-empty page. An
    /// empty first page only accepts the cancel token.
    pub fn browse(&self, console: &mut Console) -> Prompted<S::Item> {
        let mut cursor = PageCursor::first();

        loop {
            let records = self.fetch(cursor);

            let Ok(candidates) = CandidateSet::from_records(&records) else {
                match cursor.prev() {
                    Some(prev) => {
                        console.warn("No more pages.");
                        cursor = prev;
                        continue;
                    }
                    None => return Err(self.hold_empty(console)),
                }
            };

            self.render(console, cursor, &records);

            match self.read_turn(console, cursor, &candidates, records)? {
                Turn::Show(next) => cursor = next,
                Turn::Picked(record) => return Ok(record),
            }
        }
    }

    fn render(&self, console: &mut Console, cursor: PageCursor, records: &[S::Item]) {
        console.heading(format!("{} - page {}", self.title, cursor.page()));
        for (id, summary) in page_lines(records) {
            console.item(id, summary);
        }
        let mut hint = String::from("(n) next");
        if !cursor.is_first() {
            hint.push_str(", (p) prev");
        }
        hint.push_str(", id to select, /b to go back");
        console.hint(hint);
    }

    fn read_turn(
        &self,
        console: &mut Console,
        cursor: PageCursor,
        candidates: &CandidateSet,
        mut records: Vec<S::Item>,
    ) -> Prompted<Turn<S::Item>> {
        loop {
            let line = console.read_raw("> ")?;
            match parse_command(&line, candidates) {
                Ok(PagerCommand::Next) => return Ok(Turn::Show(cursor.next())),
                Ok(PagerCommand::Prev) => match cursor.prev() {
                    Some(prev) => return Ok(Turn::Show(prev)),
                    None => console.warn("Already on the first page."),
                },
                Ok(PagerCommand::Select(id)) => {
                    if let Some(pos) = records.iter().position(|r| r.id() == id) {
                        return Ok(Turn::Picked(records.swap_remove(pos)));
                    }
                }
                Err(CommandError::NotOnPage(id)) => {
                    console.warn(format!("No item with id {} on this page.", id));
                }
                Err(CommandError::Unknown(_)) => {
                    console.warn("Type n, p, an id from the list, or /b.");
                }
            }
        }
    }

    /// Nothing to browse: wait for the cancel token.
    fn hold_empty(&self, console: &mut Console) -> CancelSignal {
        console.heading(&self.title);
        console.warn("No data to show.");
        console.hint("(/b to go back)");
        loop {
            match console.read_raw("> ") {
                Err(signal) => return signal,
                Ok(_) => console.warn("Nothing to page through here; type /b to go back."),
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    struct Row(Id);

    impl Listed for Row {
        fn id(&self) -> Id {
            self.0
        }

        fn summary(&self) -> String {
            format!("row {}", self.0)
        }
    }

    /// Source over `total` rows (ids 1..=total) that records requested pages.
    struct Rows {
        total: i64,
        requested: RefCell<Vec<u32>>,
        /// Fetches of this page and later ones fail.
        fail_from: Option<u32>,
    }

    impl Rows {
        fn new(total: i64) -> Self {
            Rows {
                total,
                requested: RefCell::new(Vec::new()),
                fail_from: None,
            }
        }
    }

    impl PageSource for Rows {
        type Item = Row;

        fn fetch(&self, request: &PageRequest) -> Result<Vec<Row>, StoreError> {
            self.requested.borrow_mut().push(request.page_number);
            if self.fail_from.is_some_and(|page| request.page_number >= page) {
                return Err(StoreError::rejected("offline"));
            }
            Ok((1..=self.total)
                .skip(request.offset())
                .take(request.page_size as usize)
                .map(Row)
                .collect())
        }
    }

    fn candidates(ids: &[Id]) -> CandidateSet {
        CandidateSet::new(ids.iter().copied()).unwrap()
    }

    // -- cursor --

    #[test]
    fn cursor_never_goes_below_first_page() {
        let cursor = PageCursor::first();
        assert_eq!(cursor.prev(), None);
        assert_eq!(cursor.next().prev(), Some(cursor));
        assert_eq!(cursor.next().next().page(), 3);
    }

    // -- command parsing --

    #[test]
    fn paging_keywords_parse_case_insensitively() {
        let set = candidates(&[1]);
        assert_eq!(parse_command("N", &set), Ok(PagerCommand::Next));
        assert_eq!(parse_command(" next ", &set), Ok(PagerCommand::Next));
        assert_eq!(parse_command("p", &set), Ok(PagerCommand::Prev));
        assert_eq!(parse_command("PREV", &set), Ok(PagerCommand::Prev));
    }

    #[test]
    fn numeric_input_must_be_on_the_page() {
        let set = candidates(&[11, 12]);
        assert_eq!(parse_command("12", &set), Ok(PagerCommand::Select(12)));
        assert_eq!(parse_command("3", &set), Err(CommandError::NotOnPage(3)));
        assert_eq!(
            parse_command("hello", &set),
            Err(CommandError::Unknown("hello".into()))
        );
    }

    #[test]
    fn page_lines_are_stable_across_renders() {
        let rows = vec![Row(4), Row(2)];
        assert_eq!(page_lines(&rows), page_lines(&rows));
        assert_eq!(page_lines(&rows)[1], (2, "row 2".to_string()));
    }

    // -- browse loop --

    #[test]
    fn twelve_records_paged_by_ten() {
        let browser = PaginatedBrowser::new("Rows", 1, Rows::new(12));
        let (mut console, transcript) = Console::scripted("n\nn\n/b\n");

        let signal = browser.browse(&mut console).unwrap_err();
        assert!(signal.is_back());

        // page 3 came back empty, so the browser stepped back and re-fetched page 2
        assert_eq!(*browser.source.requested.borrow(), vec![1, 2, 3, 2]);
        let text = transcript.text();
        assert_eq!(transcript.count("No more pages."), 1);
        assert_eq!(transcript.count("== Rows - page 1 =="), 1);
        assert_eq!(transcript.count("== Rows - page 2 =="), 2);
        assert_eq!(transcript.count("[10] row 10"), 1);
        assert_eq!(transcript.count("[11] row 11"), 2);
        assert_eq!(transcript.count("[12] row 12"), 2);
        assert!(!text.contains("page 3 =="));
    }

    #[test]
    fn empty_set_offers_only_cancel() {
        let browser = PaginatedBrowser::new("Rows", 1, Rows::new(0));
        let (mut console, transcript) = Console::scripted("n\np\n1\n/b\n");

        assert!(browser.browse(&mut console).unwrap_err().is_back());
        assert_eq!(*browser.source.requested.borrow(), vec![1]);
        assert_eq!(transcript.count("No data to show."), 1);
        assert_eq!(transcript.count("type /b to go back"), 3);
        assert!(!transcript.text().contains("(n) next"));
    }

    #[test]
    fn selecting_an_id_returns_the_record() {
        let browser = PaginatedBrowser::new("Rows", 1, Rows::new(12));
        let (mut console, _) = Console::scripted("n\n12\n");
        assert_eq!(browser.browse(&mut console).unwrap(), Row(12));
    }

    #[test]
    fn id_from_another_page_is_refused() {
        let browser = PaginatedBrowser::new("Rows", 1, Rows::new(12));
        let (mut console, transcript) = Console::scripted("11\n3\n");
        assert_eq!(browser.browse(&mut console).unwrap(), Row(3));
        assert_eq!(transcript.count("No item with id 11 on this page."), 1);
    }

    #[test]
    fn prev_on_first_page_warns_without_refetch() {
        let browser = PaginatedBrowser::new("Rows", 1, Rows::new(3));
        let (mut console, transcript) = Console::scripted("p\n/b\n");
        browser.browse(&mut console).unwrap_err();
        assert_eq!(transcript.count("Already on the first page."), 1);
        assert_eq!(*browser.source.requested.borrow(), vec![1]);
    }

    #[test]
    fn prev_returns_to_earlier_page() {
        let browser = PaginatedBrowser::new("Rows", 1, Rows::new(25));
        let (mut console, _) = Console::scripted("n\nn\np\n/b\n");
        browser.browse(&mut console).unwrap_err();
        assert_eq!(*browser.source.requested.borrow(), vec![1, 2, 3, 2]);
    }

    #[test]
    fn failed_fetch_reads_as_empty() {
        let mut rows = Rows::new(5);
        rows.fail_from = Some(1);
        let browser = PaginatedBrowser::new("Rows", 1, rows);
        let (mut console, transcript) = Console::scripted("/b\n");
        browser.browse(&mut console).unwrap_err();
        assert_eq!(transcript.count("No data to show."), 1);
    }

    #[test]
    fn failed_fetch_past_first_page_reads_as_past_the_end() {
        let mut rows = Rows::new(25);
        rows.fail_from = Some(2);
        let browser = PaginatedBrowser::new("Rows", 1, rows);
        let (mut console, transcript) = Console::scripted("n\n/b\n");

        assert!(browser.browse(&mut console).unwrap_err().is_back());
        assert_eq!(*browser.source.requested.borrow(), vec![1, 2, 1]);
        assert_eq!(transcript.count("No more pages."), 1);
        assert_eq!(transcript.count("== Rows - page 1 =="), 2);
        assert!(!transcript.text().contains("No data to show."));
    }

    #[test]
    fn requests_carry_context_and_viewer() {
        let seen = RefCell::new(None);
        let source = |request: &PageRequest| -> Result<Vec<Row>, StoreError> {
            *seen.borrow_mut() = Some(*request);
            Ok(vec![Row(1)])
        };
        let browser = PaginatedBrowser::new("Ctx", 9, source).in_context(42);
        let (mut console, _) = Console::scripted("1\n");
        browser.browse(&mut console).unwrap();

        let request = seen.borrow().unwrap();
        assert_eq!(request.context_id, Some(42));
        assert_eq!(request.viewer_id, 9);
        assert_eq!(request.page_number, 1);
        assert_eq!(request.page_size, PAGE_SIZE);
    }

    #[test]
    fn end_of_input_while_browsing_signals_exit() {
        let browser = PaginatedBrowser::new("Rows", 1, Rows::new(3));
        let (mut console, _) = Console::scripted("");
        let signal = browser.browse(&mut console).unwrap_err();
        assert!(signal.instruction().is_exit());
    }
}
