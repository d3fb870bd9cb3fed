//! Message protocol between the search core and the listing worker.
//!
//! Requests and responses are plain serde types so the host can carry them
//! across whatever boundary it has (a thread, a web worker, an HTTP hop). Each
//! request optionally carries the tracing context of the span that issued it,
//! so the worker's spans join the same trace.

use crate::domain::ListingPage;
use crate::listing::ListingQuery;
use serde::{Deserialize, Serialize};

/// Distributed tracing context for cross-boundary span propagation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Span ID of the issuing span.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the OpenTelemetry identifiers of the current span.
    ///
    /// Returns `None` when no OpenTelemetry layer is installed or the span is
    /// not sampled.
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let context = tracing::Span::current().context();
        let span = context.span();
        let span_context = span.span_context();

        if !span_context.is_valid() {
            return None;
        }

        let trace_id = format!("{:032x}", span_context.trace_id());
        let parent_span_id = format!("{:016x}", span_context.span_id());
        tracing::trace!(trace_id = %trace_id, parent_span_id = %parent_span_id, "captured trace context");

        Some(Self {
            trace_id,
            parent_span_id,
        })
    }
}

/// Generates constructors that attach the current trace context.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    search(Search { query: ListingQuery }),
}

/// Requests sent to the listing worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Run a listing query.
    Search {
        query: ListingQuery,

        /// Trace context for linking spans across the boundary.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    /// Generation of the search this message carries.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        match self {
            Self::Search { query, .. } => query.generation,
        }
    }
}

/// Responses returned by the listing worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// The query succeeded.
    SearchCompleted {
        /// Generation echoed from the request.
        generation: u64,
        page: ListingPage,
    },

    /// The query failed; `message` is suitable for display.
    SearchFailed { generation: u64, message: String },
}

impl WorkerResponse {
    #[must_use]
    pub const fn generation(&self) -> u64 {
        match self {
            Self::SearchCompleted { generation, .. } | Self::SearchFailed { generation, .. } => {
                *generation
            }
        }
    }
}
