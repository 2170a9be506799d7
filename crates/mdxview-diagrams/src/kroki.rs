//! Remote diagram rendering via Kroki.
//!
//! This module defines the [`DiagramRenderer`] seam used by the pipeline and
//! its HTTP implementation, [`KrokiRenderer`]:
//! - Sends the diagram source as a `text/plain` POST body
//! - Treats any 2xx response body as SVG and strips its XML prolog
//! - Reports non-2xx statuses and transport failures per diagram

use std::time::Duration;

use ureq::Agent;

use crate::consts::{DEFAULT_SERVER_URL, OUTPUT_FORMAT};
use crate::language::Dialect;
use crate::svg::strip_xml_prolog;

/// Renders one diagram source to SVG markup.
///
/// Implementations must be shareable across the rendering thread pool.
pub trait DiagramRenderer: Sync {
    /// Render `source` written in `dialect` and return SVG markup.
    fn render(&self, dialect: Dialect, source: &str) -> Result<String, DiagramErrorKind>;
}

/// Single diagram rendering error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("diagram {id}: {kind}")]
pub struct DiagramError {
    /// Id the diagram would have been given (`plantuml-1`).
    pub id: String,
    pub kind: DiagramErrorKind,
}

/// Kind of diagram rendering error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiagramErrorKind {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("server responded with {status}{}", format_body(.body))]
    Status { status: u16, body: String },
    #[error("I/O error: {0}")]
    Io(String),
}

fn format_body(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(": {body}")
    }
}

/// Create HTTP agent with an optional global timeout.
///
/// Status codes are not turned into errors so that the response body can be
/// read for error details.
pub fn create_agent(timeout: Option<Duration>) -> Agent {
    Agent::config_builder()
        .timeout_global(timeout)
        .http_status_as_error(false)
        .build()
        .into()
}

/// [`DiagramRenderer`] backed by a Kroki server.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use mdxview_diagrams::{Dialect, DiagramRenderer, KrokiRenderer};
///
/// let renderer = KrokiRenderer::new("https://kroki.io").timeout(Duration::from_secs(30));
/// let svg = renderer.render(Dialect::Mermaid, "graph TD\n  A --> B")?;
/// ```
#[derive(Debug, Clone)]
pub struct KrokiRenderer {
    /// Server base URL without trailing slash.
    server_url: String,
    /// HTTP agent for connection pooling (shared by parallel renders).
    agent: Agent,
}

impl KrokiRenderer {
    /// Create a renderer for the given Kroki server URL, without a timeout.
    #[must_use]
    pub fn new(server_url: impl Into<String>) -> Self {
        let server_url: String = server_url.into();
        Self {
            server_url: server_url.trim_end_matches('/').to_owned(),
            agent: create_agent(None),
        }
    }

    /// Set a transport timeout for every request.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.agent = create_agent(Some(timeout));
        self
    }

    /// Server base URL requests are sent to.
    #[must_use]
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn endpoint_url(&self, dialect: Dialect) -> String {
        format!("{}/{}/{OUTPUT_FORMAT}", self.server_url, dialect.endpoint())
    }
}

impl Default for KrokiRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_URL)
    }
}

impl DiagramRenderer for KrokiRenderer {
    fn render(&self, dialect: Dialect, source: &str) -> Result<String, DiagramErrorKind> {
        let url = self.endpoint_url(dialect);

        let response = self
            .agent
            .post(&url)
            .header("Content-Type", "text/plain")
            .send(source.as_bytes())
            .map_err(|e| DiagramErrorKind::Http(e.to_string()))?;

        let status = response.status().as_u16();
        let mut body = response.into_body();

        if !(200..300).contains(&status) {
            let error_body = body
                .read_to_string()
                .unwrap_or_else(|_| String::from("(unable to read error body)"));
            return Err(DiagramErrorKind::Status {
                status,
                body: error_body.trim().to_owned(),
            });
        }

        let data = body
            .read_to_vec()
            .map_err(|e| DiagramErrorKind::Io(e.to_string()))?;
        let svg = String::from_utf8(data)
            .map_err(|e| DiagramErrorKind::Io(format!("invalid UTF-8 in SVG: {e}")))?;

        Ok(strip_xml_prolog(&svg))
    }
}
