// Test helpers: a recording transport that never touches the network, and
// a one-time tracing setup for test runs.

use std::sync::{Mutex, Once};

use reqwest::Method;
use serde_json::Value;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;
use crate::transport::{HttpRequest, HttpResponse, Transport};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_test_writer()
                .with_target(true)
                .with_filter(filter),
        );
        if subscriber.try_init().is_err() {
            eprintln!("Tracing subscriber already set");
        }
    });
}

struct Route {
    method: Method,
    path: String,
    status: u16,
    body: String,
}

/// Transport that answers from a route table and records every request.
/// Routes match on method plus the URL path after `/api/external/`;
/// unmatched requests get a 404 with `{"error": "no route"}`.
#[derive(Default)]
pub struct MockTransport {
    routes: Vec<Route>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        MockTransport::default()
    }

    pub fn route(mut self, method: Method, path: &str, status: u16, body: Value) -> Self {
        self.routes.push(Route {
            method,
            path: path.to_string(),
            status,
            body: body.to_string(),
        });
        self
    }

    /// Same as `route` with a verbatim (possibly non-JSON) body.
    pub fn route_text(mut self, method: Method, path: &str, status: u16, body: &str) -> Self {
        self.routes.push(Route {
            method,
            path: path.to_string(),
            status,
            body: body.to_string(),
        });
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.requests().len()
    }
}

fn endpoint_of(url: &str) -> &str {
    url.split_once("/api/external/")
        .map_or(url, |(_, endpoint)| endpoint)
}

impl Transport for MockTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let endpoint = endpoint_of(&request.url);
        let response = self
            .routes
            .iter()
            .find(|route| route.method == request.method && route.path == endpoint)
            .map(|route| HttpResponse {
                status: route.status,
                body: route.body.clone(),
            })
            .unwrap_or_else(|| HttpResponse {
                status: 404,
                body: r#"{"error": "no route"}"#.to_string(),
            });
        Ok(response)
    }
}
