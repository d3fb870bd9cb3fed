//! OpenTelemetry tracing with file-based OTLP/JSON export.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → SDK provider → OtlpFileExporter → rotating file
//! ```
//!
//! Spans land in `<data dir>/musician-search-otlp.json`, one OTLP/JSON
//! document per line. The file rotates at 10 MB and keeps 3 backups.
//!
//! - [`init`]: subscriber setup
//! - `exporter`: `SpanExporter` implementation and provider construction
//! - `otlp`: span to OTLP/JSON encoding
//! - `rotation`: size-rotated line file

mod exporter;
pub mod init;
mod otlp;
mod rotation;

pub use init::{init_tracing, TRACE_FILE_NAME};
