//! Wire types for the HTTP API.
//!
//! Everything here is transient and request-scoped: each request produces a
//! fresh chain of derived values, nothing is shared across requests. Caller
//! geometry and date strings are deliberately passed through unvalidated:
//! the remote platform is the authority on ring closure and date ordering,
//! and its errors come back through the normal error path.

mod analysis;
mod geometry;
mod response;

pub use analysis::*;
pub use geometry::*;
pub use response::*;
