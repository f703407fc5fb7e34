//! Derived output documents (feeds).

pub mod feed;

pub use feed::{FeedDocument, FeedEntry};
