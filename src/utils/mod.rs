//! Shared utilities.
//!
//! - [`date`]: timezone-free UTC datetimes for publish dates and feeds
//! - [`html`]: escaping helpers
//! - [`slug`]: URL slugification and per-document anchor uniqueness

pub mod date;
pub mod html;
pub mod slug;
