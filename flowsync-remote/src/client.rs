//! Blocking HTTP implementation of [`WorkflowApi`].
//!
//! | Operation | Method | Path                                       | Body |
//! |-----------|--------|--------------------------------------------|------|
//! | lookup    | GET    | `/api/namespaces/{namespace}/workflows/{id}` | none |
//! | create    | POST   | `/api/namespaces/{namespace}/workflows`      | YAML |
//! | update    | PUT    | `/api/namespaces/{namespace}/workflows/{id}` | YAML |
//!
//! Every request carries `Content-Type: text/yaml`, plus
//! `Authorization: Bearer <token>` when a token is configured.

use std::time::Duration;

use flowsync_core::{Namespace, RemoteExistence, SyncTarget, WorkflowDocument, WorkflowId};
use url::{ParseError, Url};

use crate::{RemoteError, WorkflowApi};

const CONTENT_TYPE: &str = "text/yaml";
const MAX_ERROR_BODY: usize = 512;

/// `<base>/api/namespaces/<namespace>/workflows`
///
/// Namespace and identifier are pushed as single path segments, so reserved
/// characters are percent-encoded and can never address another resource.
pub fn collection_url(base_url: &str, namespace: &Namespace) -> Result<Url, RemoteError> {
    segments_url(base_url, &["api", "namespaces", &namespace.0, "workflows"])
}

/// `<base>/api/namespaces/<namespace>/workflows/<id>`
pub fn workflow_url(
    base_url: &str,
    namespace: &Namespace,
    id: &WorkflowId,
) -> Result<Url, RemoteError> {
    segments_url(
        base_url,
        &["api", "namespaces", &namespace.0, "workflows", &id.0],
    )
}

fn segments_url(base_url: &str, segments: &[&str]) -> Result<Url, RemoteError> {
    let mut url = Url::parse(base_url).map_err(|source| RemoteError::InvalidUrl {
        url: base_url.to_string(),
        source,
    })?;
    // `PathSegmentsMut` silently drops dot segments.
    if let Some(segment) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
        return Err(RemoteError::InvalidSegment {
            segment: segment.to_string(),
        });
    }
    url.path_segments_mut()
        .map_err(|()| RemoteError::InvalidUrl {
            url: base_url.to_string(),
            source: ParseError::RelativeUrlWithCannotBeABaseBase,
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Raw outcome of one exchange: status plus the response, whatever the status.
struct Exchange {
    status: u16,
    response: ureq::Response,
}

/// Workflow API client over a shared `ureq` agent.
#[derive(Debug, Clone)]
pub struct HttpWorkflowClient {
    agent: ureq::Agent,
    base_url: String,
    token: Option<String>,
}

impl HttpWorkflowClient {
    /// Client for the endpoint described by `target`.
    pub fn new(target: &SyncTarget, timeout: Duration) -> Self {
        Self::with_base_url(target.base_url(), target.auth_token.clone(), timeout)
    }

    /// Client for an explicit `scheme://host[:port]` base URL.
    pub fn with_base_url(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Self {
        if token.is_some() {
            tracing::info!("using token authentication");
        }
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            base_url: base_url.into(),
            token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn send(
        &self,
        method: &'static str,
        url: &str,
        body: Option<&str>,
    ) -> Result<Exchange, RemoteError> {
        tracing::info!("accessing workflow: {method} {url}");

        let mut request = self
            .agent
            .request(method, url)
            .set("Content-Type", CONTENT_TYPE);
        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }

        let result = match body {
            Some(body) => request.send_string(body),
            None => request.call(),
        };

        let exchange = match result {
            Ok(response) => Exchange {
                status: response.status(),
                response,
            },
            Err(ureq::Error::Status(status, response)) => Exchange { status, response },
            Err(ureq::Error::Transport(transport)) => {
                return Err(match transport.kind() {
                    ureq::ErrorKind::InvalidUrl | ureq::ErrorKind::UnknownScheme => {
                        RemoteError::InvalidRequest {
                            url: url.to_string(),
                            source: Box::new(transport),
                        }
                    }
                    _ => RemoteError::Transport {
                        method,
                        url: url.to_string(),
                        source: Box::new(transport),
                    },
                });
            }
        };

        tracing::info!("workflow request status code {}", exchange.status);
        Ok(exchange)
    }

    fn mutate(
        &self,
        method: &'static str,
        url: &str,
        document: &WorkflowDocument,
    ) -> Result<(), RemoteError> {
        let body = document.to_yaml()?;
        let exchange = self.send(method, url, Some(&body))?;
        if (200..300).contains(&exchange.status) {
            return Ok(());
        }
        Err(RemoteError::MutationRejected {
            method,
            url: url.to_string(),
            status: exchange.status,
            body: error_body(exchange.response),
        })
    }
}

impl WorkflowApi for HttpWorkflowClient {
    fn lookup(
        &self,
        namespace: &Namespace,
        id: &WorkflowId,
    ) -> Result<RemoteExistence, RemoteError> {
        let url = workflow_url(&self.base_url, namespace, id)?;
        let exchange = self.send("GET", url.as_str(), None)?;
        match exchange.status {
            200 => Ok(RemoteExistence::Found),
            404 => Ok(RemoteExistence::NotFound),
            status => Err(RemoteError::LookupFailed {
                url: url.into(),
                status,
            }),
        }
    }

    fn create(
        &self,
        namespace: &Namespace,
        document: &WorkflowDocument,
    ) -> Result<(), RemoteError> {
        let url = collection_url(&self.base_url, namespace)?;
        self.mutate("POST", url.as_str(), document)
    }

    fn update(
        &self,
        namespace: &Namespace,
        id: &WorkflowId,
        document: &WorkflowDocument,
    ) -> Result<(), RemoteError> {
        let url = workflow_url(&self.base_url, namespace, id)?;
        self.mutate("PUT", url.as_str(), document)
    }
}

/// Response text for diagnostics, trimmed and cut at a char boundary.
fn error_body(response: ureq::Response) -> String {
    let text = response.into_string().unwrap_or_default();
    let text = text.trim();
    if text.len() <= MAX_ERROR_BODY {
        return text.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &text[..end])
}
