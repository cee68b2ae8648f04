//! Search backend module
//!
//! Defines the Backend trait and the two backend clients: the paid,
//! paginated API backend and the free session-scraping backend.

mod primary;
mod retry;
mod secondary;
mod traits;

pub use primary::PrimaryBackend;
pub use retry::{RetryBudget, RetryPolicy};
pub use secondary::SecondaryBackend;
pub use traits::*;
