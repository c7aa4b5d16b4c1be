/*!
 * Monitoring
 * Structured logging setup for binaries embedding the queues
 */

mod tracer;

pub use tracer::{generate_trace_id, init_tracing, span_worker};
