use mazmundama_engine::{BookRecord, SentenceSpan, StoredPage, html::parse_html, sentence_spans};
use ratatui::widgets::ListState;

/// A page with the sentence units found in its markup.
pub struct PageEntry {
    pub number: u32,
    pub units: Vec<SentenceSpan>,
}

impl PageEntry {
    fn from_stored(page: &StoredPage) -> Self {
        let parsed = parse_html(&page.html);
        Self {
            number: page.number,
            units: sentence_spans(&parsed.nodes),
        }
    }
}

/// State of the page browser.
pub struct App {
    pub book: BookRecord,
    pub pages: Vec<PageEntry>,
    pub page_list_state: ListState,
}

impl App {
    pub fn new(book: BookRecord, pages: &[StoredPage]) -> Self {
        let pages: Vec<PageEntry> = pages.iter().map(PageEntry::from_stored).collect();
        let mut page_list_state = ListState::default();
        if !pages.is_empty() {
            page_list_state.select(Some(0));
        }

        Self {
            book,
            pages,
            page_list_state,
        }
    }

    pub fn next_page(&mut self) {
        if self.pages.is_empty() {
            return;
        }
        let i = match self.page_list_state.selected() {
            Some(i) => (i + 1) % self.pages.len(),
            None => 0,
        };
        self.page_list_state.select(Some(i));
    }

    pub fn previous_page(&mut self) {
        if self.pages.is_empty() {
            return;
        }
        let i = match self.page_list_state.selected() {
            Some(0) | None => self.pages.len() - 1,
            Some(i) => i - 1,
        };
        self.page_list_state.select(Some(i));
    }

    pub fn selected_page(&self) -> Option<&PageEntry> {
        self.page_list_state
            .selected()
            .and_then(|index| self.pages.get(index))
    }

    /// Lines shown for the selected page: one `sent-N  text` line per unit.
    pub fn content_lines(&self) -> Vec<String> {
        match self.selected_page() {
            Some(page) if page.units.is_empty() => vec!["(no sentences on this page)".to_string()],
            Some(page) => page
                .units
                .iter()
                .map(|unit| format!("{}  {}", unit.id, unit.text))
                .collect(),
            None => vec![],
        }
    }

    pub fn page_labels(&self) -> Vec<String> {
        self.pages
            .iter()
            .map(|page| format!("Page {} ({} sentences)", page.number, page.units.len()))
            .collect()
    }
}
