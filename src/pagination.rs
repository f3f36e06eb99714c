//! Page window computation and pagination-bar state.

use std::fmt;
use std::str::FromStr;

/// Pages shown on each side of the current page.
const PAGES_AROUND: u32 = 1;

/// Up to this many pages are listed in full, without ellipses.
const FULL_LIST_LIMIT: u32 = 5;

/// A renderable unit of the pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    Page(u32),
    Ellipsis,
    Previous,
    Next,
}

impl PageToken {
    /// Ellipses are placeholders, everything else can be activated.
    pub fn is_link(self) -> bool {
        !matches!(self, PageToken::Ellipsis)
    }

    pub fn label(self) -> String {
        match self {
            PageToken::Page(n) => n.to_string(),
            PageToken::Ellipsis => "...".to_string(),
            PageToken::Previous => "Previous".to_string(),
            PageToken::Next => "Next".to_string(),
        }
    }
}

/// Attribute form: `previous`, `next`, `...` or the page number.
impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageToken::Page(n) => write!(f, "{n}"),
            PageToken::Ellipsis => f.write_str("..."),
            PageToken::Previous => f.write_str("previous"),
            PageToken::Next => f.write_str("next"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTokenError(pub String);

impl fmt::Display for ParseTokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid page token '{}'", self.0)
    }
}

impl std::error::Error for ParseTokenError {}

impl FromStr for PageToken {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "previous" => Ok(PageToken::Previous),
            "next" => Ok(PageToken::Next),
            "..." => Ok(PageToken::Ellipsis),
            other => match other.parse::<u32>() {
                Ok(n) if n >= 1 => Ok(PageToken::Page(n)),
                _ => Err(ParseTokenError(other.to_string())),
            },
        }
    }
}

/// Ordered page numbers and ellipses for a bar with `total_pages` pages.
///
/// Page 1 and the last page are always present, together with the pages
/// directly around `current_page`. Previous/next markers are not included.
pub fn window(total_pages: u32, current_page: u32) -> Vec<PageToken> {
    let mut pages = Vec::new();

    if total_pages <= FULL_LIST_LIMIT {
        pages.extend((1..=total_pages).map(PageToken::Page));
        return pages;
    }

    pages.push(PageToken::Page(1));

    if current_page > PAGES_AROUND + 2 {
        pages.push(PageToken::Ellipsis);
    }

    let start = current_page.saturating_sub(PAGES_AROUND).max(2);
    let end = current_page.saturating_add(PAGES_AROUND).min(total_pages - 1);
    for i in start..=end {
        if !pages.contains(&PageToken::Page(i)) {
            pages.push(PageToken::Page(i));
        }
    }

    if current_page < total_pages - (PAGES_AROUND + 1) {
        pages.push(PageToken::Ellipsis);
    }

    if !pages.contains(&PageToken::Page(total_pages)) {
        pages.push(PageToken::Page(total_pages));
    }

    pages
}

/// One entry of the pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control {
    pub token: PageToken,
    pub active: bool,
    pub disabled: bool,
}

impl Control {
    fn new(token: PageToken) -> Self {
        Self {
            token,
            active: false,
            disabled: false,
        }
    }

    /// Whether activating this control should do anything at all.
    pub fn is_interactive(&self) -> bool {
        self.token.is_link() && !self.disabled
    }
}

/// Paging position shared by every orchestration pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    pub current_page: u32,
    pub items_per_page: u32,
    /// Unknown until the first listing succeeds.
    pub total_items: Option<u64>,
}

impl PaginationState {
    pub fn new(items_per_page: u32) -> Self {
        Self {
            current_page: 1,
            items_per_page: items_per_page.max(1),
            total_items: None,
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.current_page.saturating_sub(1)) * u64::from(self.items_per_page)
    }

    /// Record the total reported by a listing and pull `current_page` back
    /// into `[1, total_pages]` if the catalog shrank underneath it.
    pub fn set_total_items(&mut self, total_items: u64) {
        self.total_items = Some(total_items);
        if let Some(total_pages) = self.total_pages() {
            self.current_page = self.current_page.clamp(1, total_pages.max(1));
        }
    }

    /// Whether `page` can be shown. An empty catalog still has a page 1.
    pub fn contains_page(&self, page: u32) -> bool {
        match self.total_pages() {
            Some(total) => page >= 1 && page <= total.max(1),
            None => page >= 1,
        }
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.total_items.map(|total| {
            let pages = total.div_ceil(u64::from(self.items_per_page));
            u32::try_from(pages).unwrap_or(u32::MAX)
        })
    }

    /// Build the full bar: previous, window, next. Empty for a single page.
    pub fn controls(&self) -> Vec<Control> {
        let total_pages = match self.total_pages() {
            Some(n) if n > 1 => n,
            _ => return Vec::new(),
        };
        let current = self.current_page.clamp(1, total_pages);

        let mut controls = Vec::new();
        controls.push(Control {
            disabled: current == 1,
            ..Control::new(PageToken::Previous)
        });
        controls.extend(window(total_pages, current).into_iter().map(|token| Control {
            active: token == PageToken::Page(current),
            ..Control::new(token)
        }));
        controls.push(Control {
            disabled: current == total_pages,
            ..Control::new(PageToken::Next)
        });
        controls
    }

    /// Page a token leads to, or `None` when activating it is a no-op.
    pub fn resolve(&self, token: PageToken) -> Option<u32> {
        let current = self.current_page;
        match token {
            PageToken::Ellipsis => None,
            PageToken::Previous => (current > 1).then(|| current - 1),
            PageToken::Next => match self.total_pages() {
                Some(total) if current < total => Some(current + 1),
                _ => None,
            },
            PageToken::Page(n) => match self.total_pages() {
                Some(total) if n >= 1 && n <= total => Some(n),
                _ => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageToken::{Ellipsis, Page};
    use proptest::prelude::*;

    fn state(total_items: u64, current_page: u32) -> PaginationState {
        PaginationState {
            current_page,
            items_per_page: 18,
            total_items: Some(total_items),
        }
    }

    #[test]
    fn test_window_small_totals_list_every_page() {
        for total in 1..=5 {
            let expected: Vec<_> = (1..=total).map(Page).collect();
            for current in 1..=total {
                assert_eq!(window(total, current), expected);
            }
        }
    }

    #[test]
    fn test_window_known_traces() {
        assert_eq!(window(10, 1), vec![Page(1), Page(2), Ellipsis, Page(10)]);
        assert_eq!(
            window(10, 5),
            vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(10)]
        );
        assert_eq!(window(10, 10), vec![Page(1), Ellipsis, Page(9), Page(10)]);
        assert_eq!(window(9, 1), vec![Page(1), Page(2), Ellipsis, Page(9)]);
        assert_eq!(window(6, 3), vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(6)]);
        assert_eq!(window(6, 4), vec![Page(1), Ellipsis, Page(3), Page(4), Page(5), Page(6)]);
    }

    #[test]
    fn test_window_is_deterministic() {
        assert_eq!(window(42, 17), window(42, 17));
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let s = state(151, 1);
        assert_eq!(s.total_pages(), Some(9));
        assert_eq!(PaginationState::new(18).total_pages(), None);
        assert_eq!(state(0, 1).total_pages(), Some(0));
    }

    #[test]
    fn test_offset() {
        assert_eq!(state(151, 1).offset(), 0);
        assert_eq!(state(151, 3).offset(), 36);
    }

    #[test]
    fn test_controls_first_page() {
        let controls = state(151, 1).controls();
        let tokens: Vec<_> = controls.iter().map(|c| c.token).collect();
        assert_eq!(
            tokens,
            vec![PageToken::Previous, Page(1), Page(2), Ellipsis, Page(9), PageToken::Next]
        );
        assert!(controls[0].disabled);
        assert!(controls[1].active);
        assert!(!controls.last().unwrap().disabled);
    }

    #[test]
    fn test_controls_last_page_disables_next() {
        let controls = state(151, 9).controls();
        assert!(!controls[0].disabled);
        assert!(controls.last().unwrap().disabled);
        assert_eq!(controls.iter().filter(|c| c.active).count(), 1);
    }

    #[test]
    fn test_controls_empty_for_single_or_unknown_page() {
        assert!(state(18, 1).controls().is_empty());
        assert!(state(0, 1).controls().is_empty());
        assert!(PaginationState::new(18).controls().is_empty());
    }

    #[test]
    fn test_resolve_clamps_at_bounds() {
        assert_eq!(state(151, 1).resolve(PageToken::Previous), None);
        assert_eq!(state(151, 9).resolve(PageToken::Next), None);
        assert_eq!(state(151, 4).resolve(PageToken::Previous), Some(3));
        assert_eq!(state(151, 4).resolve(PageToken::Next), Some(5));
    }

    #[test]
    fn test_resolve_absolute_pages() {
        let s = state(151, 4);
        assert_eq!(s.resolve(Page(9)), Some(9));
        assert_eq!(s.resolve(Page(4)), Some(4));
        assert_eq!(s.resolve(Page(10)), None);
        assert_eq!(s.resolve(Ellipsis), None);
    }

    #[test]
    fn test_window_current_past_the_end() {
        assert_eq!(window(9, 100), vec![Page(1), Ellipsis, Page(9)]);
        assert_eq!(window(9, u32::MAX), vec![Page(1), Ellipsis, Page(9)]);
    }

    #[test]
    fn test_controls_clamp_out_of_range_page() {
        let controls = state(151, 100).controls();
        let active: Vec<_> = controls.iter().filter(|c| c.active).map(|c| c.token).collect();
        assert_eq!(active, vec![Page(9)]);
        assert!(!controls[0].disabled);
        assert!(controls.last().unwrap().disabled);

        let controls = state(151, u32::MAX).controls();
        assert!(controls.last().unwrap().disabled);
    }

    #[test]
    fn test_set_total_items_keeps_current_page_in_range() {
        let mut s = PaginationState::new(18);
        s.current_page = 100;
        s.set_total_items(151);
        assert_eq!(s.current_page, 9);

        s.current_page = 4;
        s.set_total_items(151);
        assert_eq!(s.current_page, 4);

        s.set_total_items(0);
        assert_eq!(s.current_page, 1);
    }

    #[test]
    fn test_contains_page() {
        assert!(state(151, 1).contains_page(9));
        assert!(!state(151, 1).contains_page(10));
        assert!(!state(151, 1).contains_page(0));
        assert!(state(0, 1).contains_page(1));
        assert!(!state(0, 1).contains_page(2));
    }

    #[test]
    fn test_token_attribute_form() {
        for token in [PageToken::Previous, PageToken::Next, Ellipsis, Page(7)] {
            assert_eq!(token.to_string().parse::<PageToken>(), Ok(token));
        }
        assert!("0".parse::<PageToken>().is_err());
        assert!("prev".parse::<PageToken>().is_err());
    }

    #[test]
    fn test_ellipsis_is_not_interactive() {
        let controls = state(151, 5).controls();
        for control in controls {
            if control.token == Ellipsis {
                assert!(!control.is_interactive());
            }
        }
    }

    proptest! {
        #[test]
        fn window_bounds_and_order(total in 1u32..500, seed in any::<u32>()) {
            let current = seed % total + 1;
            let pages = window(total, current);

            prop_assert_eq!(pages.first(), Some(&Page(1)));
            prop_assert_eq!(pages.last(), Some(&Page(total)));
            prop_assert!(pages.contains(&Page(current)));
            prop_assert!(pages.len() <= 7);

            let numbers: Vec<u32> = pages
                .iter()
                .filter_map(|t| match t {
                    Page(n) => Some(*n),
                    _ => None,
                })
                .collect();
            prop_assert!(numbers.windows(2).all(|w| w[0] < w[1]));

            for pair in pages.windows(2) {
                prop_assert!(!(pair[0] == Ellipsis && pair[1] == Ellipsis));
                // An ellipsis always hides at least one page.
                if let [Page(a), Page(b)] = pair {
                    prop_assert_eq!(*b, *a + 1);
                }
            }
        }

        #[test]
        fn window_keeps_neighbours(total in 6u32..500, seed in any::<u32>()) {
            let current = seed % total + 1;
            let pages = window(total, current);
            if current > 1 {
                prop_assert!(pages.contains(&Page(current - 1)));
            }
            if current < total {
                prop_assert!(pages.contains(&Page(current + 1)));
            }
        }
    }
}
