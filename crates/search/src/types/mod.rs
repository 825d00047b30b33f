//! Shared request and response types.

mod pagination;

pub use pagination::{Page, Paging};
