// Tue Jan 20 2026 - Alex

pub mod tracer;

pub use tracer::{CallTracer, RelCallTracer};
