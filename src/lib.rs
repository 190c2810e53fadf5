//! plume — a terminal reader for a personal blog's backend API.
//!
//! The crate is organized around a small pure core and an async shell:
//!
//! - `catalog` - projection of the nested category tree into flat,
//!   breadcrumb, and subtree-filter forms (pure functions, no I/O)
//! - `pager` - client-side article list bookkeeping (pages, dedup-append)
//! - `api` - typed client for the blog backend's JSON endpoints
//! - `app` + `ui` - application state and the ratatui event loop
//! - `config`, `theme`, `util` - ambient concerns

pub mod api;
pub mod app;
pub mod catalog;
pub mod config;
pub mod pager;
pub mod theme;
pub mod ui;
pub mod util;
