//! Domain logic - version values and tag conventions, independent of git

pub mod tag;
pub mod version;

pub use tag::{Language, TagPattern};
pub use version::Version;
