/*!
 * Monitoring
 * Tracing subscriber setup for embedding processes
 */

mod tracer;

pub use tracer::init_tracing;
