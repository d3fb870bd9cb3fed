//! Listing worker: answers search messages from a listing backend.
//!
//! The worker is the only place a [`ListingBackend`] is called. It accepts
//! either typed messages or their JSON encoding, the latter mirroring how a
//! host would pass messages over an IPC boundary.

use crate::domain::error::Result;
use crate::listing::ListingBackend;
use crate::worker::{WorkerMessage, WorkerResponse};

/// Worker state: the backend queries are answered from.
pub struct ListingWorker {
    backend: Box<dyn ListingBackend>,
}

impl ListingWorker {
    #[must_use]
    pub fn new(backend: Box<dyn ListingBackend>) -> Self {
        tracing::debug!(musician_count = backend.len(), "listing worker ready");
        Self { backend }
    }

    /// Handles one message and produces its response.
    ///
    /// Backend failures are reported as [`WorkerResponse::SearchFailed`]; this
    /// method itself never fails.
    pub fn handle(&self, message: &WorkerMessage) -> WorkerResponse {
        match message {
            WorkerMessage::Search {
                query,
                trace_context,
            } => {
                let _span = tracing::debug_span!(
                    "worker_search",
                    generation = query.generation,
                    parent_trace_id = trace_context.as_ref().map(|ctx| ctx.trace_id.as_str()),
                    parent_span_id = trace_context.as_ref().map(|ctx| ctx.parent_span_id.as_str()),
                )
                .entered();

                match self.backend.search(query) {
                    Ok(page) => {
                        tracing::debug!(
                            generation = query.generation,
                            total = page.pagination.total,
                            "search completed"
                        );
                        WorkerResponse::SearchCompleted {
                            generation: query.generation,
                            page,
                        }
                    }
                    Err(e) => {
                        tracing::warn!(generation = query.generation, error = %e, "search failed");
                        WorkerResponse::SearchFailed {
                            generation: query.generation,
                            message: e.to_string(),
                        }
                    }
                }
            }
        }
    }

    /// Handles a JSON-encoded message and returns the JSON-encoded response.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not a valid [`WorkerMessage`] or the
    /// response cannot be encoded.
    pub fn handle_payload(&self, payload: &str) -> Result<String> {
        let message: WorkerMessage = serde_json::from_str(payload)?;
        let response = self.handle(&message);
        Ok(serde_json::to_string(&response)?)
    }
}

impl std::fmt::Debug for ListingWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingWorker")
            .field("musician_count", &self.backend.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Page, SearchFilters, SortKey};
    use crate::listing::{InMemoryListing, ListingQuery};

    fn worker() -> ListingWorker {
        ListingWorker::new(Box::new(InMemoryListing::builtin().unwrap()))
    }

    fn query(generation: u64, page_size: u32) -> ListingQuery {
        ListingQuery {
            generation,
            filters: SearchFilters::default(),
            sort_by: SortKey::Rating,
            page: Page::FIRST,
            page_size,
        }
    }

    #[test]
    fn echoes_generation_on_success() {
        let response = worker().handle(&WorkerMessage::search(query(7, 4)));
        match response {
            WorkerResponse::SearchCompleted { generation, page } => {
                assert_eq!(generation, 7);
                assert_eq!(page.musicians.len(), 4);
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn backend_errors_become_failed_responses() {
        let response = worker().handle(&WorkerMessage::search(query(3, 0)));
        assert!(matches!(response, WorkerResponse::SearchFailed { generation: 3, .. }));
    }

    #[test]
    fn json_bridge_round_trips() {
        let payload = serde_json::to_string(&WorkerMessage::search(query(9, 2))).unwrap();
        let reply = worker().handle_payload(&payload).unwrap();
        let response: WorkerResponse = serde_json::from_str(&reply).unwrap();
        assert_eq!(response.generation(), 9);
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(worker().handle_payload("{\"Nope\":{}}").is_err());
    }
}
