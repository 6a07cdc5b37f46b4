//! Inkpost: a small blog backend serving posts from SQLite through server-rendered pages.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
pub mod util;
