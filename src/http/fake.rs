//! In-process backend

use std::{
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use rand::Rng;
use serde_json::{Value, json};
use tracing::{debug, info};
use uuid::Uuid;

use crate::submission::{SUBMISSIONS_PATH, SubmissionRequest, SubmissionResponse};

use super::{ApiRequest, ApiResponse, Method, Transport, TransportError};

/// Delay applied to every fake response unless configured otherwise.
pub const DEFAULT_FAKE_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone)]
struct InjectedFailure {
    status: u16,
    message: Option<String>,
}

/// Answers submission requests locally after a fixed delay.
#[derive(Debug)]
pub struct FakeBackend {
    delay: Duration,
    failure: Mutex<Option<InjectedFailure>>,
    submissions: AtomicUsize,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new(DEFAULT_FAKE_DELAY)
    }
}

impl FakeBackend {
    /// A backend that answers after `delay`.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            failure: Mutex::new(None),
            submissions: AtomicUsize::new(0),
        }
    }

    /// Fail every following request with `status`; `0` simulates an unreachable server.
    pub fn fail_with(&self, status: u16, message: Option<&str>) {
        if let Ok(mut failure) = self.failure.lock() {
            *failure = Some(InjectedFailure {
                status,
                message: message.map(ToString::to_string),
            });
        }
    }

    /// Stop failing requests.
    pub fn recover(&self) {
        if let Ok(mut failure) = self.failure.lock() {
            *failure = None;
        }
    }

    /// Number of accepted submissions.
    pub fn submissions(&self) -> usize {
        self.submissions.load(Ordering::Relaxed)
    }

    fn injected_failure(&self) -> Option<InjectedFailure> {
        self.failure.lock().ok().and_then(|failure| failure.clone())
    }

    fn submit(&self, body: Option<&Value>) -> ApiResponse {
        let request = body
            .cloned()
            .map(serde_json::from_value::<SubmissionRequest>);

        let Some(Ok(request)) = request else {
            return ApiResponse::new(
                400,
                json!({ "success": false, "message": "Invalid submission payload" }),
            );
        };

        self.submissions.fetch_add(1, Ordering::Relaxed);

        let response = SubmissionResponse {
            success: true,
            submission_id: Uuid::now_v7(),
            confirmation_number: confirmation_number(),
            message: "Buyback request received".to_string(),
        };

        info!(
            submission_id = %response.submission_id,
            confirmation_number = %response.confirmation_number,
            items = request.items.len(),
            "fake backend accepted submission"
        );

        match serde_json::to_value(&response) {
            Ok(body) => ApiResponse::new(200, body),
            Err(error) => ApiResponse::new(500, json!({ "message": error.to_string() })),
        }
    }
}

#[async_trait]
impl Transport for FakeBackend {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        tokio::time::sleep(self.delay).await;

        if let Some(failure) = self.injected_failure() {
            debug!(status = failure.status, "fake backend injecting failure");

            if failure.status == 0 {
                return Err(TransportError::Unreachable(
                    failure
                        .message
                        .unwrap_or_else(|| "connection refused".to_string()),
                ));
            }

            let body = failure.message.map_or_else(
                || json!({ "success": false }),
                |message| json!({ "success": false, "message": message }),
            );

            return Ok(ApiResponse::new(failure.status, body));
        }

        match (request.method, request.path.as_str()) {
            (Method::Post, SUBMISSIONS_PATH) => Ok(self.submit(request.body.as_ref())),
            _ => Ok(ApiResponse::new(404, json!({ "message": "Not found" }))),
        }
    }
}

/// A `BYB-` token followed by six digits.
fn confirmation_number() -> String {
    let digits: u32 = rand::thread_rng().gen_range(0..1_000_000);

    format!("BYB-{digits:06}")
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn is_confirmation_number(value: &str) -> bool {
        value
            .strip_prefix("BYB-")
            .is_some_and(|digits| digits.len() == 6 && digits.bytes().all(|b| b.is_ascii_digit()))
    }

    #[test]
    fn confirmation_numbers_have_six_digits() {
        for _ in 0..100 {
            let number = confirmation_number();

            assert!(is_confirmation_number(&number), "bad confirmation number {number}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_route_is_not_found() -> TestResult {
        let backend = FakeBackend::new(Duration::from_millis(10));

        let response = backend.send(ApiRequest::new(Method::Get, "/nope")).await?;

        assert_eq!(response.status, 404);

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_submission_is_bad_request() -> TestResult {
        let backend = FakeBackend::default();

        let request =
            ApiRequest::new(Method::Post, SUBMISSIONS_PATH).with_body(json!({ "email": 1 }));
        let response = backend.send(request).await?;

        assert_eq!(response.status, 400);
        assert_eq!(backend.submissions(), 0);

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn injected_status_zero_is_transport_error() {
        let backend = FakeBackend::new(Duration::ZERO);

        backend.fail_with(0, None);

        let result = backend.send(ApiRequest::new(Method::Post, SUBMISSIONS_PATH)).await;

        assert!(matches!(result, Err(TransportError::Unreachable(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn recover_clears_injected_failure() -> TestResult {
        let backend = FakeBackend::new(Duration::ZERO);

        backend.fail_with(503, Some("maintenance"));
        let failed = backend.send(ApiRequest::new(Method::Get, "/nope")).await?;

        backend.recover();
        let recovered = backend.send(ApiRequest::new(Method::Get, "/nope")).await?;

        assert_eq!(failed.status, 503);
        assert_eq!(failed.body["message"], "maintenance");
        assert_eq!(recovered.status, 404);

        Ok(())
    }
}
