use crate::catalog::{Card, Catalog, ListingPage, normalize_query};
use crate::error::ApiError;
use crate::pagination::{Control, PaginationState};
use tokio::sync::mpsc::UnboundedSender;

/// What an orchestration pass was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassKind {
    Listing { page: u32 },
    Search { query: String },
}

#[derive(Debug)]
pub enum PassOutcome {
    Listing(ListingPage),
    /// `None` is a search miss.
    Search(Option<Card>),
    Failed(ApiError),
}

/// Result reported by a finished pass, tagged with the generation that started it.
#[derive(Debug)]
pub struct PassResult {
    pub generation: u64,
    pub kind: PassKind,
    pub outcome: PassOutcome,
}

/// Starts orchestration passes and owns the paging state.
///
/// Each pass runs as its own task and reports back over `results`. Only the
/// most recently started pass is accepted; anything older is dropped so an
/// overtaken request can never overwrite a newer page.
pub struct Controller {
    catalog: Catalog,
    state: PaginationState,
    generation: u64,
    results: UnboundedSender<PassResult>,
}

impl Controller {
    pub fn new(catalog: Catalog, items_per_page: u32, results: UnboundedSender<PassResult>) -> Self {
        Self {
            catalog,
            state: PaginationState::new(items_per_page),
            generation: 0,
            results,
        }
    }

    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Fetch and render the current page.
    pub fn load_listing(&mut self) -> u64 {
        let generation = self.next_generation();
        let page = self.state.current_page;
        let per_page = self.state.items_per_page;
        let offset = self.state.offset();
        let catalog = self.catalog.clone();
        let results = self.results.clone();

        tracing::debug!(generation, page, offset, "starting listing pass");
        tokio::spawn(async move {
            let outcome = match catalog.load_page(per_page, offset).await {
                Ok(listing) => PassOutcome::Listing(listing),
                Err(e) => PassOutcome::Failed(e),
            };
            let result = PassResult {
                generation,
                kind: PassKind::Listing { page },
                outcome,
            };
            if results.send(result).is_err() {
                tracing::debug!(generation, "result receiver closed");
            }
        });
        generation
    }

    /// Empty input reloads the current page; anything else is a name lookup.
    /// The current page is left untouched either way.
    pub fn submit_search(&mut self, input: &str) -> u64 {
        let Some(query) = normalize_query(input) else {
            return self.load_listing();
        };

        let generation = self.next_generation();
        let catalog = self.catalog.clone();
        let results = self.results.clone();

        tracing::debug!(generation, query = %query, "starting search pass");
        tokio::spawn(async move {
            let outcome = match catalog.search(&query).await {
                Ok(card) => PassOutcome::Search(card),
                Err(e) => PassOutcome::Failed(e),
            };
            let result = PassResult {
                generation,
                kind: PassKind::Search { query },
                outcome,
            };
            if results.send(result).is_err() {
                tracing::debug!(generation, "result receiver closed");
            }
        });
        generation
    }

    /// Move to the page a pagination control points at and reload.
    ///
    /// Returns `None` without touching state for ellipses, disabled links and
    /// previous/next at the bounds.
    pub fn activate(&mut self, control: &Control) -> Option<u64> {
        if !control.is_interactive() {
            return None;
        }
        let page = self.state.resolve(control.token)?;
        tracing::debug!(from = self.state.current_page, to = page, "page change");
        self.state.current_page = page;
        Some(self.load_listing())
    }

    /// Accept a finished pass if it is still current.
    pub fn accept(&mut self, result: PassResult) -> Option<PassResult> {
        if result.generation != self.generation {
            tracing::debug!(
                generation = result.generation,
                current = self.generation,
                "discarding superseded pass"
            );
            return None;
        }

        match &result.outcome {
            PassOutcome::Listing(listing) => {
                self.state.set_total_items(listing.total_items);
            }
            PassOutcome::Failed(e) => {
                tracing::warn!(kind = ?result.kind, error = %e, "pass failed");
            }
            PassOutcome::Search(_) => {}
        }
        Some(result)
    }
}
