// Application layer - use cases and orchestration.
// Each operation is one request/response pass: fetch from the store,
// filter, aggregate and hand back plain data for the caller to render.

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
