//! Typed client for the blog backend.
//!
//! The backend speaks JSON over HTTP: every response is wrapped in a
//! `{ code, message, data }` envelope, list endpoints paginate with a
//! `{ records, current, pages, total }` page object, and field names are
//! camelCase. `types` holds the entity shapes, `client` the transport.

mod client;
mod types;

pub use client::{ApiClient, ApiError};
pub use types::{
    Achievement, ApiEnvelope, Article, ArticleQuery, Author, CategoryNode, CategoryRef,
    JobExperience, Mission, MissionPoint, Page, Tag,
};
