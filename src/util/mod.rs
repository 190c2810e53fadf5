//! Shared helpers.
//!
//! - **Text**: Unicode-aware width measurement and truncation for list rows,
//!   plus control-character stripping for backend-supplied text rendered
//!   into the terminal (titles, names, breadcrumbs).
//! - **Links**: validation of article/author URLs before handing them to
//!   the system browser.

mod links;
mod text;

pub use links::{validate_link, LinkError};
pub use text::{display_width, strip_control_chars, truncate_to_width};
