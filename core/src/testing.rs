//! Recording transport shared by unit tests.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

type Responder = Box<dyn Fn(&HttpRequest) -> Result<HttpResponse, ApiError> + Send + Sync>;
type Latency = Box<dyn Fn(&HttpRequest) -> Duration + Send + Sync>;

pub(crate) struct StubTransport {
    requests: Mutex<Vec<HttpRequest>>,
    responder: Responder,
    latency: Option<Latency>,
}

impl StubTransport {
    pub(crate) fn new<F>(responder: F) -> Self
    where
        F: Fn(&HttpRequest) -> Result<HttpResponse, ApiError> + Send + Sync + 'static,
    {
        Self {
            requests: Mutex::new(Vec::new()),
            responder: Box::new(responder),
            latency: None,
        }
    }

    pub(crate) fn status(status: u16, body: &str) -> Self {
        let body = body.to_string();
        Self::new(move |_| Ok(HttpResponse::new(status, body.clone())))
    }

    pub(crate) fn failing(message: &str) -> Self {
        let message = message.to_string();
        Self::new(move |_| Err(ApiError::RequestFailed(message.clone())))
    }

    pub(crate) fn with_latency<F>(mut self, latency: F) -> Self
    where
        F: Fn(&HttpRequest) -> Duration + Send + Sync + 'static,
    {
        self.latency = Some(Box::new(latency));
        self
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub(crate) fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        if let Some(latency) = &self.latency {
            tokio::time::sleep(latency(&request)).await;
        }
        (self.responder)(&request)
    }
}
