//! Internal constants for diagram rendering.

/// Public Kroki instance used when no server is configured.
pub const DEFAULT_SERVER_URL: &str = "https://kroki.io";

/// Kroki output format requested for every diagram.
pub(crate) const OUTPUT_FORMAT: &str = "svg";
