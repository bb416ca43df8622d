// API client module: a small blocking client for the platform's external
// REST API. Each operation is an `ApiCall`; `send` returns the server's
// JSON untouched, and the typed helpers decode it into envelopes for code
// that needs ids. Everything goes through `request`, which builds the URL
// and headers, sends the call through the transport and turns non-success
// responses into `ApiError::Status`.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{
    Annotation, Envelope, NewAnnotation, NewSymbol, Page, Timeframe, VoteType,
};
use crate::transport::{HttpRequest, HttpTransport, Transport};

pub const DEFAULT_OFFSET: u32 = 0;
pub const DEFAULT_LIMIT: u32 = 20;

const API_PREFIX: &str = "api/external";

/// Client for the external API. Holds the normalized base URL, the fixed
/// auth headers and the transport used to reach the server.
#[derive(Clone)]
pub struct ApiClient<T: Transport = HttpTransport> {
    transport: T,
    base_url: String,
    headers: HeaderMap,
}

impl ApiClient<HttpTransport> {
    /// Create a client that talks HTTP via reqwest.
    pub fn new(config: &Config) -> Result<Self> {
        ApiClient::with_transport(config, HttpTransport::new()?)
    }

    /// Create a client configured by `VOYNICH_API_URL` / `VOYNICH_API_KEY`.
    pub fn from_env() -> Result<Self> {
        ApiClient::new(&Config::from_env()?)
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(config: &Config, transport: T) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key()))
            .map_err(|_| ApiError::Config("API key contains characters not allowed in a header".into()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(ApiClient {
            transport,
            base_url: config.base_url().to_string(),
            headers,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Full URL for an endpoint relative to `/api/external/`.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            API_PREFIX,
            endpoint.trim_start_matches('/')
        )
    }

    /// Send one request and return the parsed JSON body.
    ///
    /// GET carries `query`, POST carries `body`; any other method is
    /// rejected before anything is sent.
    pub fn request(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<Value> {
        let (query, body) = if method == Method::GET {
            let query = query
                .iter()
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect();
            (query, None)
        } else if method == Method::POST {
            (Vec::new(), body)
        } else {
            return Err(ApiError::InvalidArgument(format!(
                "unsupported HTTP method: {method}"
            )));
        };

        let request = HttpRequest {
            method,
            url: self.endpoint_url(endpoint),
            headers: self.headers.clone(),
            query,
            body,
        };
        debug!(method = %request.method, url = %request.url, "sending API request");

        let response = self.transport.send(&request)?;
        if !response.is_success() {
            warn!(status = response.status, url = %request.url, "API request failed");
            return Err(ApiError::from_status(response.status, &response.body));
        }
        debug!(status = response.status, "API request succeeded");

        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&response.body)?)
    }

    /// Send one API operation and return the server's JSON exactly as it
    /// came back. The CLI prints this; nothing is dropped or reshaped.
    pub fn send(&self, call: &ApiCall<'_>) -> Result<Value> {
        let body = call.body()?;
        self.request(call.method(), &call.endpoint(), &call.query(), body)
    }

    fn send_as<R: DeserializeOwned>(&self, call: &ApiCall<'_>) -> Result<R> {
        Ok(serde_json::from_value(self.send(call)?)?)
    }

    pub fn list_pages(&self, offset: u32, limit: u32) -> Result<Envelope<Vec<Page>>> {
        self.send_as(&ApiCall::ListPages { offset, limit })
    }

    pub fn get_page(&self, page_id: i64) -> Result<Envelope<Page>> {
        self.send_as(&ApiCall::GetPage(page_id))
    }

    pub fn list_symbols(&self, page_id: i64) -> Result<Envelope<Vec<Value>>> {
        self.send_as(&ApiCall::ListSymbols(page_id))
    }

    pub fn create_symbol(&self, symbol: &NewSymbol) -> Result<Envelope<Value>> {
        self.send_as(&ApiCall::CreateSymbol(symbol))
    }

    pub fn list_annotations(&self, page_id: i64) -> Result<Envelope<Vec<Value>>> {
        self.send_as(&ApiCall::ListAnnotations(page_id))
    }

    pub fn create_annotation(&self, annotation: &NewAnnotation) -> Result<Envelope<Annotation>> {
        self.send_as(&ApiCall::CreateAnnotation(annotation))
    }

    /// Vote on an annotation. Returns the updated annotation as the server
    /// reports it.
    pub fn vote_on_annotation(
        &self,
        annotation_id: i64,
        vote_type: VoteType,
    ) -> Result<Envelope<Value>> {
        self.send_as(&ApiCall::Vote {
            annotation_id,
            vote_type,
        })
    }

    pub fn get_activity_feed(&self, limit: u32, offset: u32) -> Result<Envelope<Vec<Value>>> {
        self.send_as(&ApiCall::ActivityFeed { limit, offset })
    }

    pub fn get_leaderboard(&self, timeframe: Timeframe) -> Result<Value> {
        self.send(&ApiCall::Leaderboard(timeframe))
    }

    pub fn get_usage(&self) -> Result<Value> {
        self.send(&ApiCall::Usage)
    }
}

/// One operation of the external API: which method, endpoint, query and
/// body it maps to.
#[derive(Debug, Clone, Copy)]
pub enum ApiCall<'a> {
    ListPages { offset: u32, limit: u32 },
    GetPage(i64),
    ListSymbols(i64),
    CreateSymbol(&'a NewSymbol),
    ListAnnotations(i64),
    CreateAnnotation(&'a NewAnnotation),
    Vote { annotation_id: i64, vote_type: VoteType },
    ActivityFeed { limit: u32, offset: u32 },
    Leaderboard(Timeframe),
    Usage,
}

impl ApiCall<'_> {
    pub fn method(&self) -> Method {
        match self {
            ApiCall::CreateSymbol(_) | ApiCall::CreateAnnotation(_) | ApiCall::Vote { .. } => {
                Method::POST
            }
            _ => Method::GET,
        }
    }

    pub fn endpoint(&self) -> String {
        match self {
            ApiCall::ListPages { .. } => "pages".into(),
            ApiCall::GetPage(id) => format!("pages/{id}"),
            ApiCall::ListSymbols(page_id) => format!("symbols/page/{page_id}"),
            ApiCall::CreateSymbol(_) => "symbols".into(),
            ApiCall::ListAnnotations(page_id) => format!("annotations/page/{page_id}"),
            ApiCall::CreateAnnotation(_) => "annotations".into(),
            ApiCall::Vote { annotation_id, .. } => format!("annotations/{annotation_id}/vote"),
            ApiCall::ActivityFeed { .. } => "activity-feed".into(),
            ApiCall::Leaderboard(_) => "leaderboard".into(),
            ApiCall::Usage => "usage".into(),
        }
    }

    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            ApiCall::ListPages { offset, limit } => {
                vec![("offset", offset.to_string()), ("limit", limit.to_string())]
            }
            ApiCall::ActivityFeed { limit, offset } => {
                vec![("limit", limit.to_string()), ("offset", offset.to_string())]
            }
            ApiCall::Leaderboard(timeframe) => vec![("timeframe", timeframe.to_string())],
            _ => Vec::new(),
        }
    }

    pub fn body(&self) -> Result<Option<Value>> {
        let body = match self {
            ApiCall::CreateSymbol(symbol) => serde_json::to_value(symbol)?,
            ApiCall::CreateAnnotation(annotation) => serde_json::to_value(annotation)?,
            ApiCall::Vote { vote_type, .. } => serde_json::json!({ "voteType": vote_type }),
            _ => return Ok(None),
        };
        Ok(Some(body))
    }
}
