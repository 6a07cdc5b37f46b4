//! Application services layer.

pub mod chrome;
pub mod clock;
pub mod csrf;
pub mod error;
pub mod posts;
pub mod repos;
