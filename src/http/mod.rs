//! Request pipeline
//!
//! Every outgoing call goes through [`RequestPipeline`], which stamps the
//! locale headers on the way out and, on the way back, logs failures, shows
//! the mapped message as a toast and hands the error back to the caller.

use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use smallvec::SmallVec;
use tracing::{debug, error};

use crate::{
    i18n::{Translation, translation_for},
    locale::LocaleState,
    notifications::{NotificationStore, Toast},
};

mod errors;
mod failure;
mod fake;
mod request;
mod transport;

pub use errors::{HttpError, PipelineError, TransportError};
pub use failure::RequestFailure;
pub use fake::{DEFAULT_FAKE_DELAY, FakeBackend};
pub use request::{ApiRequest, ApiResponse, MARKET_HEADER, Method};
pub use transport::{MockTransport, ReqwestTransport, Transport};

/// Per-call pipeline options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    suppressed: SmallVec<[u16; 2]>,
}

impl RequestOptions {
    /// Handle `status` at the call site instead of with the global toast.
    ///
    /// The failure is still logged and returned.
    #[must_use]
    pub fn suppress_toast_for(mut self, status: u16) -> Self {
        if !self.suppressed.contains(&status) {
            self.suppressed.push(status);
        }

        self
    }

    /// Whether the toast for `status` is suppressed.
    pub fn suppresses(&self, status: u16) -> bool {
        self.suppressed.contains(&status)
    }
}

/// Locale-aware request pipeline.
pub struct RequestPipeline {
    locale: LocaleState,
    translation: &'static Translation,
    transport: Arc<dyn Transport>,
    notifications: Arc<NotificationStore>,
}

impl std::fmt::Debug for RequestPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestPipeline")
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

impl RequestPipeline {
    /// Create a pipeline for `locale`.
    pub fn new(
        locale: LocaleState,
        transport: Arc<dyn Transport>,
        notifications: Arc<NotificationStore>,
    ) -> Self {
        Self {
            translation: translation_for(&locale),
            locale,
            transport,
            notifications,
        }
    }

    /// The locale stamped on requests.
    pub fn locale(&self) -> &LocaleState {
        &self.locale
    }

    /// Build a request with the locale headers attached.
    pub fn build(&self, method: Method, path: &str, body: Option<serde_json::Value>) -> ApiRequest {
        let mut request = ApiRequest::new(method, path);

        request.body = body;
        self.attach_headers(&mut request);

        request
    }

    /// Send `request`.
    ///
    /// # Errors
    ///
    /// Returns an `HttpError` for transport failures (status 0) and non-2xx responses,
    /// after logging it and opening an error toast.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, HttpError> {
        self.send_with(request, &RequestOptions::default()).await
    }

    /// Send `request` with per-call options.
    ///
    /// # Errors
    ///
    /// Returns an `HttpError` for transport failures and non-2xx responses. The
    /// toast is skipped for statuses suppressed by `options`.
    pub async fn send_with(
        &self,
        mut request: ApiRequest,
        options: &RequestOptions,
    ) -> Result<ApiResponse, HttpError> {
        self.attach_headers(&mut request);

        let method = request.method;
        let path = request.path.clone();

        debug!(%method, %path, "request sent");

        let outcome = match self.transport.send(request).await {
            Ok(response) if response.is_success() => Ok(response),
            Ok(response) => Err(HttpError::from_response(response.status, response.body)),
            Err(error) => Err(HttpError::from(error)),
        };

        match outcome {
            Ok(response) => {
                debug!(%method, %path, status = response.status, "request succeeded");

                Ok(response)
            }
            Err(failure) => Err(self.report(method, &path, failure, options)),
        }
    }

    /// Send `body` as JSON and decode the response.
    ///
    /// # Errors
    ///
    /// Returns a `PipelineError` if encoding fails, the request fails or the
    /// response does not decode as `R`.
    pub async fn send_json<B, R>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<R, PipelineError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send_json_with(method, path, body, &RequestOptions::default())
            .await
    }

    /// Send `body` as JSON with per-call options and decode the response.
    ///
    /// # Errors
    ///
    /// Returns a `PipelineError` if encoding fails, the request fails or the
    /// response does not decode as `R`.
    pub async fn send_json_with<B, R>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        options: &RequestOptions,
    ) -> Result<R, PipelineError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = serde_json::to_value(body).map_err(PipelineError::Encode)?;
        let request = self.build(method, path, Some(body));

        let response = self.send_with(request, options).await?;

        serde_json::from_value(response.body).map_err(|err| {
            error!(%method, %path, error = %err, "response did not match the expected shape");

            PipelineError::Decode(err)
        })
    }

    fn attach_headers(&self, request: &mut ApiRequest) {
        request.set_header("Content-Type", "application/json");
        request.set_header("Accept-Language", self.locale.accept_language());
        request.set_header(MARKET_HEADER, self.locale.market().code());
    }

    fn report(
        &self,
        method: Method,
        path: &str,
        failure: HttpError,
        options: &RequestOptions,
    ) -> HttpError {
        let classification = RequestFailure::classify(&failure);

        error!(
            %method,
            path,
            status = failure.status,
            message = %failure.message,
            body = ?failure.body,
            ?classification,
            "request failed"
        );

        if options.suppresses(failure.status) {
            debug!(status = failure.status, "toast suppressed by caller");
        } else {
            self.notifications
                .open_timed_toast(Toast::error(classification.message(self.translation)));
        }

        failure
    }
}
