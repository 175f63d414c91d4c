//! Submission
//!
//! Sends the buyback list to the backend and, when it is accepted, clears the list.

use std::sync::Arc;

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    buyback::{BuybackItem, BuybackListStore},
    catalog::Condition,
    http::{Method, PipelineError, RequestPipeline},
    locale::{Language, Market},
    signal::Signal,
};

/// Endpoint accepting buyback submissions.
pub const SUBMISSIONS_PATH: &str = "/buyback/submissions";

/// One line of a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionItem {
    /// Product id
    pub product_id: String,

    /// Catalog number
    pub catalog_number: String,

    /// Product name
    pub name: String,

    /// Condition grade
    pub condition: Condition,

    /// Unit price at selection time
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Quantity
    pub quantity: u32,
}

impl From<&BuybackItem> for SubmissionItem {
    fn from(item: &BuybackItem) -> Self {
        Self {
            product_id: item.product.id.clone(),
            catalog_number: item.product.catalog_number.clone(),
            name: item.product.name.clone(),
            condition: item.condition,
            price: item.price,
            quantity: item.quantity,
        }
    }
}

/// Submission payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    /// Contact email
    pub email: String,

    /// Store the items will be handed in at
    pub store_id: String,

    /// Items
    pub items: Vec<SubmissionItem>,

    /// Total buyback value
    #[serde(with = "rust_decimal::serde::float")]
    pub total_value: Decimal,

    /// Market the submission was made in
    pub market: Market,

    /// Language the shopper used
    pub language: Language,

    /// Submission time
    pub submitted_at: Timestamp,
}

/// Backend answer to a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    /// Whether the submission was accepted
    pub success: bool,

    /// Backend submission id
    pub submission_id: Uuid,

    /// Human readable confirmation number, `BYB-######`
    pub confirmation_number: String,

    /// Backend message
    pub message: String,
}

/// Submission lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    /// Nothing sent yet
    #[default]
    Idle,

    /// Waiting for the backend
    Submitting,

    /// Accepted
    Succeeded {
        /// Confirmation number from the backend
        confirmation_number: String,
    },

    /// The last attempt failed
    Failed,
}

/// Submission errors
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// Another submission is still in flight.
    #[error("a submission is already in progress")]
    InProgress,

    /// The request failed.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// The backend answered but did not accept the submission.
    #[error("submission rejected: {0}")]
    Rejected(String),
}

/// Submission workflow.
#[derive(Debug)]
pub struct SubmissionWorkflow {
    pipeline: Arc<RequestPipeline>,
    buyback: Arc<BuybackListStore>,
    state: Signal<SubmissionState>,
    last_response: Signal<Option<SubmissionResponse>>,
}

impl SubmissionWorkflow {
    /// Create a workflow that submits through `pipeline` and clears `buyback` on success.
    pub fn new(pipeline: Arc<RequestPipeline>, buyback: Arc<BuybackListStore>) -> Self {
        Self {
            pipeline,
            buyback,
            state: Signal::default(),
            last_response: Signal::default(),
        }
    }

    /// Submit `items` for a quotation.
    ///
    /// Inputs are expected to be validated by the caller. There is no retry; calling
    /// again after a failure is a new attempt and gets a new submission id.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError::InProgress` while another submission is in flight,
    /// `SubmissionError::Pipeline` if the request fails (the pipeline has already
    /// shown a toast), or `SubmissionError::Rejected` if the backend declines it.
    pub async fn submit(
        &self,
        email: &str,
        store_id: &str,
        items: &[BuybackItem],
        total_value: Decimal,
    ) -> Result<SubmissionResponse, SubmissionError> {
        let started = self.state.update_if(|state| {
            if *state == SubmissionState::Submitting {
                false
            } else {
                *state = SubmissionState::Submitting;
                true
            }
        });

        if !started {
            warn!("submission already in progress");

            return Err(SubmissionError::InProgress);
        }

        let locale = self.pipeline.locale();

        let request = SubmissionRequest {
            email: email.to_string(),
            store_id: store_id.to_string(),
            items: items.iter().map(SubmissionItem::from).collect(),
            total_value,
            market: locale.market(),
            language: locale.language(),
            submitted_at: Timestamp::now(),
        };

        let result = self
            .pipeline
            .send_json::<_, SubmissionResponse>(Method::Post, SUBMISSIONS_PATH, &request)
            .await;

        match result {
            Ok(response) if response.success => {
                info!(
                    submission_id = %response.submission_id,
                    confirmation_number = %response.confirmation_number,
                    items = request.items.len(),
                    "submission accepted"
                );

                self.state.set(SubmissionState::Succeeded {
                    confirmation_number: response.confirmation_number.clone(),
                });
                self.last_response.set(Some(response.clone()));
                self.buyback.clear_list();

                Ok(response)
            }
            Ok(response) => {
                warn!(message = %response.message, "submission rejected");

                self.state.set(SubmissionState::Failed);

                Err(SubmissionError::Rejected(response.message))
            }
            Err(error) => {
                self.state.set(SubmissionState::Failed);

                Err(error.into())
            }
        }
    }

    /// Current state.
    pub fn state(&self) -> SubmissionState {
        self.state.get()
    }

    /// Whether a submission is in flight.
    pub fn is_submitting(&self) -> bool {
        self.state.with(|state| *state == SubmissionState::Submitting)
    }

    /// The last accepted response.
    pub fn last_response(&self) -> Option<SubmissionResponse> {
        self.last_response.get()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }
}
