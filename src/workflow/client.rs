//! Transport between the operator session and the payroll API.

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, header},
};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tower::ServiceExt;
use uuid::Uuid;

use crate::api::{ApiError, BatchRequest};
use crate::models::{BatchOutcome, BatchPreview, PayPeriod, PaystubRecord, WorkerPayrollCandidate};

/// Failures talking to the payroll API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be built or the response never arrived.
    #[error("transport error: {0}")]
    Transport(String),

    /// The API answered with a non-success status.
    #[error("{message} (HTTP {status}, {code})")]
    Status {
        /// HTTP status code.
        status: u16,
        /// The API's error code.
        code: String,
        /// The API's error message.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("could not decode response: {0}")]
    Decode(String),
}

impl ClientError {
    /// The API's message when there is one, otherwise the full error.
    pub fn reason(&self) -> String {
        match self {
            ClientError::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// The payroll API as seen by the operator workflow.
#[async_trait]
pub trait PayrollClient: Send + Sync {
    /// `GET /api/payroll/ready`.
    async fn ready(&self, period: PayPeriod) -> Result<Vec<WorkerPayrollCandidate>, ClientError>;

    /// `POST /api/payroll/preview`.
    async fn preview(&self, request: &BatchRequest) -> Result<BatchPreview, ClientError>;

    /// `POST /api/payroll/process`.
    async fn process(&self, request: &BatchRequest) -> Result<BatchOutcome, ClientError>;

    /// `GET /api/payroll/paystub/{id}`.
    async fn paystub(&self, payroll_id: Uuid) -> Result<PaystubRecord, ClientError>;
}

/// Drives an axum [`Router`] in process, one request per call.
#[derive(Clone)]
pub struct RouterClient {
    router: Router,
}

impl RouterClient {
    /// Creates a client over a router.
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    fn request(method: Method, uri: &str, body: Option<Vec<u8>>) -> Result<Request<Body>, ClientError> {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(bytes) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(bytes)),
            None => builder.body(Body::empty()),
        };
        request.map_err(|e| ClientError::Transport(e.to_string()))
    }

    fn json_body<T: Serialize>(body: &T) -> Result<Vec<u8>, ClientError> {
        serde_json::to_vec(body).map_err(|e| ClientError::Transport(e.to_string()))
    }

    async fn send<T: DeserializeOwned>(&self, request: Request<Body>) -> Result<T, ClientError> {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        if !status.is_success() {
            let (code, message) = match serde_json::from_slice::<ApiError>(&bytes) {
                Ok(error) => (error.code, error.message),
                Err(_) => (
                    "UNKNOWN".to_string(),
                    String::from_utf8_lossy(&bytes).into_owned(),
                ),
            };
            return Err(ClientError::Status {
                status: status.as_u16(),
                code,
                message,
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[async_trait]
impl PayrollClient for RouterClient {
    async fn ready(&self, period: PayPeriod) -> Result<Vec<WorkerPayrollCandidate>, ClientError> {
        let uri = format!(
            "/api/payroll/ready?startDate={}&endDate={}",
            period.start.format("%Y-%m-%d"),
            period.end.format("%Y-%m-%d")
        );
        self.send(Self::request(Method::GET, &uri, None)?).await
    }

    async fn preview(&self, request: &BatchRequest) -> Result<BatchPreview, ClientError> {
        let body = Self::json_body(request)?;
        self.send(Self::request(Method::POST, "/api/payroll/preview", Some(body))?)
            .await
    }

    async fn process(&self, request: &BatchRequest) -> Result<BatchOutcome, ClientError> {
        let body = Self::json_body(request)?;
        self.send(Self::request(Method::POST, "/api/payroll/process", Some(body))?)
            .await
    }

    async fn paystub(&self, payroll_id: Uuid) -> Result<PaystubRecord, ClientError> {
        let uri = format!("/api/payroll/paystub/{payroll_id}");
        self.send(Self::request(Method::GET, &uri, None)?).await
    }
}
