//! Static asset constants (CSS and JavaScript).

/// Stylesheet for the web interface.
pub const CSS: &str = include_str!("styles.css");

/// Client-side upload and analysis flow.
pub const JS: &str = include_str!("app.js");
