//! Failure classification

use crate::i18n::{Translation, interpolate};

use super::HttpError;

/// User-facing classification of a failed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestFailure {
    /// No response reached the client.
    Network,

    /// 400, with the server's message when it sent one.
    BadRequest {
        /// Message from the response body
        server_message: Option<String>,
    },

    /// 401
    Unauthorized,

    /// 403
    Forbidden,

    /// 404
    NotFound,

    /// 500
    Server,

    /// 503
    Unavailable,

    /// Any other status.
    Other(u16),
}

impl RequestFailure {
    /// Classify a failed request by its status.
    pub fn classify(error: &HttpError) -> Self {
        match error.status {
            0 => Self::Network,
            400 => Self::BadRequest {
                server_message: error.server_message().map(ToString::to_string),
            },
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            500 => Self::Server,
            503 => Self::Unavailable,
            status => Self::Other(status),
        }
    }

    /// Translation key of the default message.
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::Network => "errors.network",
            Self::BadRequest { .. } => "errors.bad_request",
            Self::Unauthorized => "errors.unauthorized",
            Self::Forbidden => "errors.forbidden",
            Self::NotFound => "errors.not_found",
            Self::Server => "errors.server",
            Self::Unavailable => "errors.unavailable",
            Self::Other(_) => "errors.generic",
        }
    }

    /// The message shown to the shopper.
    pub fn message(&self, translation: &Translation) -> String {
        let errors = &translation.errors;

        match self {
            Self::Network => errors.network.to_string(),
            Self::BadRequest {
                server_message: Some(message),
            } => message.clone(),
            Self::BadRequest {
                server_message: None,
            } => errors.bad_request.to_string(),
            Self::Unauthorized => errors.unauthorized.to_string(),
            Self::Forbidden => errors.forbidden.to_string(),
            Self::NotFound => errors.not_found.to_string(),
            Self::Server => errors.server.to_string(),
            Self::Unavailable => errors.unavailable.to_string(),
            Self::Other(status) => interpolate(errors.generic, &[("status", &status.to_string())]),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        i18n::translation,
        locale::{Language, Market},
    };

    use super::*;

    fn error(status: u16) -> HttpError {
        HttpError {
            status,
            message: String::new(),
            body: None,
        }
    }

    #[test]
    fn classification_table() {
        assert_eq!(RequestFailure::classify(&error(0)), RequestFailure::Network);
        assert_eq!(
            RequestFailure::classify(&error(400)),
            RequestFailure::BadRequest {
                server_message: None
            }
        );
        assert_eq!(RequestFailure::classify(&error(401)), RequestFailure::Unauthorized);
        assert_eq!(RequestFailure::classify(&error(403)), RequestFailure::Forbidden);
        assert_eq!(RequestFailure::classify(&error(404)), RequestFailure::NotFound);
        assert_eq!(RequestFailure::classify(&error(500)), RequestFailure::Server);
        assert_eq!(RequestFailure::classify(&error(503)), RequestFailure::Unavailable);
        assert_eq!(RequestFailure::classify(&error(502)), RequestFailure::Other(502));
        assert_eq!(RequestFailure::classify(&error(418)), RequestFailure::Other(418));
    }

    #[test]
    fn bad_request_prefers_server_message() {
        let translation = translation(Market::Sa, Language::En);
        let error =
            HttpError::from_response(400, json!({ "message": "Email is already registered" }));

        assert_eq!(
            RequestFailure::classify(&error).message(translation),
            "Email is already registered"
        );
    }

    #[test]
    fn blank_server_message_falls_back_to_translation() {
        let translation = translation(Market::Sa, Language::En);
        let error = HttpError::from_response(400, json!({ "message": "  " }));

        assert_eq!(
            RequestFailure::classify(&error).message(translation),
            translation.errors.bad_request
        );
    }

    #[test]
    fn generic_message_includes_status() {
        let translation = translation(Market::Bh, Language::En);

        assert_eq!(
            RequestFailure::Other(502).message(translation),
            "An unexpected error occurred (status 502)."
        );
    }

    #[test]
    fn message_keys_resolve() {
        let translation = translation(Market::Sa, Language::Ar);

        for failure in [
            RequestFailure::Network,
            RequestFailure::NotFound,
            RequestFailure::Other(418),
        ] {
            assert!(translation.lookup(failure.message_key()).is_some());
        }
    }
}
