//! pv-core: shared foundation for percyval.
//!
//! Contains:
//! - numeric (Real + float parsing)
//! - error (shared error types)
//! - timing (opt-in parse/cache timers)

pub mod error;
pub mod numeric;
pub mod timing;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
