//! HTTP request handlers for the web server.

mod api_types;
mod extract;
mod index;
mod simplify;
mod static_files;

pub use extract::extract_text;
pub use index::{health, index};
pub use simplify::simplify;
pub use static_files::{serve_css, serve_js};
