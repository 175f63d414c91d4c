//! Buyback page
//!
//! The page-level view model. Shopper actions arrive through
//! [`BuybackPage::dispatch`] and are applied in order; the page is the only
//! place that turns store results into toasts and view transitions.

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    buyback::{BuybackError, BuybackItem, BuybackListStore, BuybackSummary},
    catalog::{CatalogStore, Condition, Product},
    http::PipelineError,
    i18n::{Translation, translation_for},
    locale::LocaleState,
    notifications::{Modal, ModalButtons, ModalKind, NotificationStore, Toast},
    signal::Signal,
    submission::{SubmissionError, SubmissionResponse, SubmissionWorkflow},
};

/// Message key of the "clear list" confirmation modal.
pub const CLEAR_LIST_MODAL_KEY: &str = "notifications.clear_list_message";

/// Which screen the page shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageView {
    /// Catalog and list
    #[default]
    Browse,

    /// Submission accepted
    Confirmation {
        /// Confirmation number to show
        confirmation_number: String,
    },
}

/// Submission form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionForm {
    /// Contact email
    pub email: String,

    /// Selected store
    pub store_id: Option<String>,

    /// Terms accepted
    pub consent: bool,
}

/// A form that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidSubmission<'a> {
    /// Trimmed email
    pub email: &'a str,

    /// Store id, known to be in the shopper's market
    pub store_id: &'a str,
}

/// Reasons a form cannot be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Nothing to submit.
    #[error("the buyback list is empty")]
    EmptyList,

    /// The email is not shaped like an address.
    #[error("invalid email address")]
    InvalidEmail,

    /// No store, or a store outside the market.
    #[error("no store selected for this market")]
    StoreRequired,

    /// Terms not accepted.
    #[error("terms and conditions not accepted")]
    ConsentRequired,
}

impl ValidationError {
    /// Translated message.
    pub fn message(self, translation: &Translation) -> &'static str {
        let validation = &translation.validation;

        match self {
            Self::EmptyList => validation.empty_list,
            Self::InvalidEmail => validation.invalid_email,
            Self::StoreRequired => validation.store_required,
            Self::ConsentRequired => validation.consent_required,
        }
    }
}

impl SubmissionForm {
    /// Check the form against the list and the shopper's market.
    ///
    /// # Errors
    ///
    /// Returns the first failing check, in the order: empty list, email, store, consent.
    pub fn validate(
        &self,
        catalog: &CatalogStore,
        locale: &LocaleState,
        buyback: &BuybackListStore,
    ) -> Result<ValidSubmission<'_>, ValidationError> {
        if buyback.is_empty() {
            return Err(ValidationError::EmptyList);
        }

        let email = self.email.trim();

        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail);
        }

        let store_id = self
            .store_id
            .as_deref()
            .filter(|id| catalog.store(locale.market(), id).is_some())
            .ok_or(ValidationError::StoreRequired)?;

        if !self.consent {
            return Err(ValidationError::ConsentRequired);
        }

        Ok(ValidSubmission { email, store_id })
    }
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !email.chars().any(char::is_whitespace)
        && !domain.contains('@')
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty())
}

/// Shopper actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageAction {
    /// Show a category, or all categories
    SelectCategory(Option<String>),

    /// Search by name, catalog number or description
    Search(String),

    /// Open or close a product's condition picker
    SelectProduct(Option<String>),

    /// Add one unit of a product at a condition
    PickCondition {
        /// Product id
        product_id: String,
        /// Chosen grade
        condition: Condition,
    },

    /// Set an item's quantity; zero removes it
    AdjustQuantity {
        /// Item id
        item_id: Uuid,
        /// New quantity
        quantity: u32,
    },

    /// Remove an item
    RemoveItem(Uuid),

    /// Change an item's grade
    UpdateCondition {
        /// Item id
        item_id: Uuid,
        /// New grade
        condition: Condition,
    },

    /// Ask for confirmation before clearing the list
    ClearList,

    /// Submit the list
    Submit(SubmissionForm),

    /// Close the toast
    DismissToast,

    /// Close the modal without confirming
    DismissModal,

    /// Confirm the modal
    ConfirmModal {
        /// Kind of the modal being confirmed
        kind: ModalKind,
        /// Captured input
        input: Option<String>,
    },

    /// Leave the confirmation screen
    StartOver,
}

impl PageAction {
    /// Action name for logs. Form contents are never logged.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SelectCategory(_) => "select_category",
            Self::Search(_) => "search",
            Self::SelectProduct(_) => "select_product",
            Self::PickCondition { .. } => "pick_condition",
            Self::AdjustQuantity { .. } => "adjust_quantity",
            Self::RemoveItem(_) => "remove_item",
            Self::UpdateCondition { .. } => "update_condition",
            Self::ClearList => "clear_list",
            Self::Submit(_) => "submit",
            Self::DismissToast => "dismiss_toast",
            Self::DismissModal => "dismiss_modal",
            Self::ConfirmModal { .. } => "confirm_modal",
            Self::StartOver => "start_over",
        }
    }
}

/// Page errors
#[derive(Debug, Error)]
pub enum PageError {
    /// No product with this id.
    #[error("unknown product {0}")]
    UnknownProduct(String),

    /// The form is invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A list operation failed.
    #[error(transparent)]
    Buyback(#[from] BuybackError),

    /// The submission failed.
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

struct PreparedSubmission {
    email: String,
    store_id: String,
    items: Vec<BuybackItem>,
    total_value: Decimal,
}

/// Buyback page view model.
#[derive(Debug)]
pub struct BuybackPage {
    locale: LocaleState,
    translation: &'static Translation,
    catalog: Arc<CatalogStore>,
    buyback: Arc<BuybackListStore>,
    notifications: Arc<NotificationStore>,
    workflow: Arc<SubmissionWorkflow>,
    view: Signal<PageView>,
    selected_product: Signal<Option<String>>,
}

impl BuybackPage {
    /// Create the page for `locale` over the shared stores.
    pub fn new(
        locale: LocaleState,
        catalog: Arc<CatalogStore>,
        buyback: Arc<BuybackListStore>,
        notifications: Arc<NotificationStore>,
        workflow: Arc<SubmissionWorkflow>,
    ) -> Self {
        Self {
            translation: translation_for(&locale),
            locale,
            catalog,
            buyback,
            notifications,
            workflow,
            view: Signal::default(),
            selected_product: Signal::default(),
        }
    }

    /// Apply `action`.
    ///
    /// # Errors
    ///
    /// Returns a `PageError` when the action cannot be applied. The shopper has
    /// already been shown an error toast, either by the page or, for failed
    /// requests, by the pipeline.
    pub async fn dispatch(&self, action: PageAction) -> Result<(), PageError> {
        debug!(action = action.name(), "dispatching page action");

        match action {
            PageAction::SelectCategory(category_id) => self.catalog.select_category(category_id),
            PageAction::Search(query) => self.catalog.search(query),
            PageAction::SelectProduct(product_id) => self.select_product(product_id)?,
            PageAction::PickCondition {
                product_id,
                condition,
            } => self.pick_condition(&product_id, condition)?,
            PageAction::AdjustQuantity { item_id, quantity } => {
                self.buyback.update_quantity(item_id, quantity)?;
            }
            PageAction::RemoveItem(item_id) => self.remove_item(item_id)?,
            PageAction::UpdateCondition { item_id, condition } => {
                self.update_condition(item_id, condition)?;
            }
            PageAction::ClearList => self.request_clear_list(),
            PageAction::Submit(form) => {
                self.submit(&form).await?;
            }
            PageAction::DismissToast => self.notifications.close_toast(),
            PageAction::DismissModal => self.notifications.close_modal(),
            PageAction::ConfirmModal { kind, input } => self.confirm_modal(kind, input),
            PageAction::StartOver => {
                self.view.set(PageView::Browse);
            }
        }

        Ok(())
    }

    /// Validate `form` and submit the list, waiting for the result.
    ///
    /// # Errors
    ///
    /// Returns `PageError::Validation` without contacting the backend if the form
    /// is invalid, or `PageError::Submission` if the submission fails.
    pub async fn submit(&self, form: &SubmissionForm) -> Result<SubmissionResponse, PageError> {
        let prepared = self.prepare(form)?;

        let response = self
            .workflow
            .submit(
                &prepared.email,
                &prepared.store_id,
                &prepared.items,
                prepared.total_value,
            )
            .await
            .inspect_err(|error| self.toast_submission_error(error))?;

        self.finish_submission(&response);

        Ok(response)
    }

    /// Validate `form` and submit the list in the background.
    ///
    /// The task holds only a weak reference to the page. If the page is gone by
    /// the time the backend answers, the result is discarded; the submission
    /// itself is not cancelled.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` without spawning anything if the form is invalid.
    pub fn submit_detached(
        self: &Arc<Self>,
        form: &SubmissionForm,
    ) -> Result<JoinHandle<()>, ValidationError> {
        let prepared = self.prepare(form)?;
        let workflow = Arc::clone(&self.workflow);
        let page = Arc::downgrade(self);

        Ok(tokio::spawn(async move {
            let result = workflow
                .submit(
                    &prepared.email,
                    &prepared.store_id,
                    &prepared.items,
                    prepared.total_value,
                )
                .await;

            let Some(page) = page.upgrade() else {
                debug!(succeeded = result.is_ok(), "page dropped, discarding submission result");

                return;
            };

            match result {
                Ok(response) => page.finish_submission(&response),
                Err(error) => {
                    warn!(%error, "detached submission failed");

                    page.toast_submission_error(&error);
                }
            }
        }))
    }

    /// Resolved locale.
    pub fn locale(&self) -> &LocaleState {
        &self.locale
    }

    /// Strings for the locale.
    pub fn translation(&self) -> &'static Translation {
        self.translation
    }

    /// Catalog store.
    pub fn catalog(&self) -> &Arc<CatalogStore> {
        &self.catalog
    }

    /// Buyback list store.
    pub fn buyback(&self) -> &Arc<BuybackListStore> {
        &self.buyback
    }

    /// Notification store.
    pub fn notifications(&self) -> &Arc<NotificationStore> {
        &self.notifications
    }

    /// Submission workflow.
    pub fn workflow(&self) -> &Arc<SubmissionWorkflow> {
        &self.workflow
    }

    /// Current view.
    pub fn view(&self) -> PageView {
        self.view.get()
    }

    /// Subscribe to view transitions.
    pub fn subscribe_view(&self) -> watch::Receiver<PageView> {
        self.view.subscribe()
    }

    /// Product whose condition picker is open.
    pub fn selected_product(&self) -> Option<&Product> {
        self.selected_product
            .get()
            .and_then(|id| self.catalog.product(&id))
    }

    fn select_product(&self, product_id: Option<String>) -> Result<(), PageError> {
        if let Some(id) = &product_id
            && self.catalog.product(id).is_none()
        {
            return Err(PageError::UnknownProduct(id.clone()));
        }

        self.selected_product.set(product_id);

        Ok(())
    }

    fn pick_condition(&self, product_id: &str, condition: Condition) -> Result<(), PageError> {
        let product = self
            .catalog
            .product(product_id)
            .ok_or_else(|| PageError::UnknownProduct(product_id.to_string()))?;

        self.buyback
            .add_item(product, condition)
            .inspect_err(|error| self.toast_list_error(error))?;

        self.selected_product.set(None);
        self.notifications
            .open_timed_toast(Toast::success(self.translation.notifications.item_added));

        Ok(())
    }

    fn remove_item(&self, item_id: Uuid) -> Result<(), PageError> {
        self.buyback
            .remove_item(item_id)
            .ok_or(BuybackError::ItemNotFound(item_id))?;

        self.notifications
            .open_timed_toast(Toast::success(self.translation.notifications.item_removed));

        Ok(())
    }

    fn update_condition(&self, item_id: Uuid, condition: Condition) -> Result<(), PageError> {
        self.buyback
            .update_condition(item_id, condition)
            .inspect_err(|error| self.toast_list_error(error))?;

        Ok(())
    }

    fn request_clear_list(&self) {
        if self.buyback.is_empty() {
            return;
        }

        let strings = &self.translation.notifications;

        self.notifications.open_modal(
            Modal::new(ModalKind::Confirmation, CLEAR_LIST_MODAL_KEY).with_buttons(
                ModalButtons::Double {
                    confirm: strings.ok.to_string(),
                    cancel: strings.cancel.to_string(),
                },
            ),
        );
    }

    fn confirm_modal(&self, kind: ModalKind, input: Option<String>) {
        let clears_list = kind == ModalKind::Confirmation
            && self
                .notifications
                .modal()
                .is_some_and(|modal| modal.message_key == CLEAR_LIST_MODAL_KEY);

        self.notifications.confirm_modal(kind, input);

        if clears_list {
            self.buyback.clear_list();
            self.notifications
                .open_timed_toast(Toast::success(self.translation.notifications.list_cleared));
        }
    }

    fn prepare(&self, form: &SubmissionForm) -> Result<PreparedSubmission, ValidationError> {
        let valid = form
            .validate(&self.catalog, &self.locale, &self.buyback)
            .inspect_err(|error| {
                debug!(%error, "submission form rejected");

                self.notifications
                    .open_timed_toast(Toast::error(error.message(self.translation)));
            })?;

        let items = self.buyback.items();

        Ok(PreparedSubmission {
            email: valid.email.to_string(),
            store_id: valid.store_id.to_string(),
            total_value: BuybackSummary::of(&items).total_value,
            items,
        })
    }

    fn finish_submission(&self, response: &SubmissionResponse) {
        info!(confirmation_number = %response.confirmation_number, "showing confirmation");

        self.selected_product.set(None);
        self.view.set(PageView::Confirmation {
            confirmation_number: response.confirmation_number.clone(),
        });
        self.notifications.open_timed_toast(Toast::success(
            self.translation.notifications.submission_success,
        ));
    }

    fn toast_submission_error(&self, error: &SubmissionError) {
        let message = match error {
            SubmissionError::Rejected(message) if !message.trim().is_empty() => message.as_str(),
            SubmissionError::Rejected(_) => self.translation.errors.submission_rejected,
            SubmissionError::Pipeline(PipelineError::Decode(_) | PipelineError::Encode(_)) => {
                self.translation.errors.server
            }
            // Already toasted by the pipeline, or nothing new to report.
            SubmissionError::Pipeline(PipelineError::Http(_)) | SubmissionError::InProgress => {
                return;
            }
        };

        self.notifications.open_timed_toast(Toast::error(message));
    }

    fn toast_list_error(&self, error: &BuybackError) {
        let message = match error {
            BuybackError::ConditionUnavailable { .. } => {
                self.translation.validation.condition_unavailable
            }
            BuybackError::ItemNotFound(_) | BuybackError::Io(_) => return,
        };

        self.notifications.open_timed_toast(Toast::error(message));
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use testresult::TestResult;

    use crate::{
        http::{ApiResponse, FakeBackend, MockTransport, RequestPipeline, Transport},
        locale::{Language, Market},
        storage::PersistentStore,
    };

    use super::*;

    const SATSUMAS: &str = "10001";
    const INGOLF: &str = "10004";

    fn page(transport: Arc<dyn Transport>, market: Market) -> TestResult<Arc<BuybackPage>> {
        let locale = LocaleState::new(market, Language::En);
        let catalog = Arc::new(CatalogStore::bundled()?);
        let notifications = Arc::new(NotificationStore::new());
        let buyback = Arc::new(BuybackListStore::new(PersistentStore::in_memory()));
        let pipeline = Arc::new(RequestPipeline::new(
            locale.clone(),
            transport,
            Arc::clone(&notifications),
        ));
        let workflow = Arc::new(SubmissionWorkflow::new(pipeline, Arc::clone(&buyback)));

        Ok(Arc::new(BuybackPage::new(
            locale,
            catalog,
            buyback,
            notifications,
            workflow,
        )))
    }

    fn idle_transport() -> Arc<dyn Transport> {
        let mut transport = MockTransport::new();

        transport.expect_send().never();

        Arc::new(transport)
    }

    fn answering(status: u16, body: serde_json::Value) -> Arc<dyn Transport> {
        let mut transport = MockTransport::new();

        transport
            .expect_send()
            .once()
            .return_once(move |_| Ok(ApiResponse::new(status, body)));

        Arc::new(transport)
    }

    fn rejection(message: &str) -> serde_json::Value {
        json!({
            "success": false,
            "submissionId": Uuid::nil(),
            "confirmationNumber": "",
            "message": message
        })
    }

    fn valid_form() -> SubmissionForm {
        SubmissionForm {
            email: " shopper@example.com ".into(),
            store_id: Some("riyadh".into()),
            consent: true,
        }
    }

    fn toast_message(page: &BuybackPage) -> Option<String> {
        page.notifications().toast().map(|active| active.toast.message)
    }

    async fn pick(
        page: &BuybackPage,
        product_id: &str,
        condition: Condition,
    ) -> Result<(), PageError> {
        page.dispatch(PageAction::PickCondition {
            product_id: product_id.into(),
            condition,
        })
        .await
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@mail.example.sa"));
        assert!(!is_valid_email("plainaddress"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@example"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a@example."));
        assert!(!is_valid_email("a b@example.com"));
        assert!(!is_valid_email("a@b@example.com"));
    }

    #[tokio::test]
    async fn validation_order() -> TestResult {
        let page = page(idle_transport(), Market::Sa)?;
        let form = SubmissionForm::default();

        let validate = |form: &SubmissionForm| {
            form.validate(page.catalog(), page.locale(), page.buyback())
                .map(|_valid| ())
        };

        assert_eq!(validate(&form), Err(ValidationError::EmptyList));

        pick(&page, SATSUMAS, Condition::LikeNew).await?;

        assert_eq!(validate(&form), Err(ValidationError::InvalidEmail));

        let form = SubmissionForm {
            email: "shopper@example.com".into(),
            ..form
        };
        assert_eq!(validate(&form), Err(ValidationError::StoreRequired));

        let form = SubmissionForm {
            store_id: Some("riyadh".into()),
            ..form
        };
        assert_eq!(validate(&form), Err(ValidationError::ConsentRequired));

        let form = SubmissionForm {
            consent: true,
            ..form
        };
        assert_eq!(validate(&form), Ok(()));

        Ok(())
    }

    #[tokio::test]
    async fn store_must_belong_to_market() -> TestResult {
        let page = page(idle_transport(), Market::Bh)?;

        pick(&page, SATSUMAS, Condition::LikeNew).await?;

        let result = valid_form()
            .validate(page.catalog(), page.locale(), page.buyback())
            .map(|_valid| ());

        assert_eq!(result, Err(ValidationError::StoreRequired));

        Ok(())
    }

    #[tokio::test]
    async fn invalid_form_toasts_without_calling_backend() -> TestResult {
        let page = page(idle_transport(), Market::Sa)?;

        pick(&page, SATSUMAS, Condition::LikeNew).await?;

        let form = SubmissionForm {
            consent: false,
            ..valid_form()
        };

        let result = page.dispatch(PageAction::Submit(form)).await;

        assert!(matches!(
            result,
            Err(PageError::Validation(ValidationError::ConsentRequired))
        ));
        assert_eq!(
            toast_message(&page).as_deref(),
            Some("Please accept the terms and conditions.")
        );
        assert_eq!(page.buyback().item_count(), 1);
        assert_eq!(page.view(), PageView::Browse);

        Ok(())
    }

    #[tokio::test]
    async fn unavailable_condition_toasts_and_keeps_list() -> TestResult {
        let page = page(idle_transport(), Market::Sa)?;

        let result = pick(&page, INGOLF, Condition::WellUsed).await;

        assert!(matches!(
            result,
            Err(PageError::Buyback(BuybackError::ConditionUnavailable { .. }))
        ));
        assert!(page.buyback().is_empty());
        assert_eq!(
            toast_message(&page).as_deref(),
            Some("This condition is not available for this product.")
        );

        Ok(())
    }

    #[tokio::test]
    async fn picking_condition_closes_picker() -> TestResult {
        let page = page(idle_transport(), Market::Sa)?;

        page.dispatch(PageAction::SelectProduct(Some(SATSUMAS.into())))
            .await?;
        assert_eq!(page.selected_product().map(|p| p.name.as_str()), Some("SATSUMAS"));

        pick(&page, SATSUMAS, Condition::VeryGood).await?;

        assert!(page.selected_product().is_none());
        assert_eq!(
            toast_message(&page).as_deref(),
            Some("Item added to your buyback list")
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_product_is_rejected() -> TestResult {
        let page = page(idle_transport(), Market::Sa)?;

        let result = page
            .dispatch(PageAction::SelectProduct(Some("nope".into())))
            .await;

        assert!(matches!(result, Err(PageError::UnknownProduct(id)) if id == "nope"));

        Ok(())
    }

    #[tokio::test]
    async fn confirming_clear_list_modal_clears_list() -> TestResult {
        let page = page(idle_transport(), Market::Sa)?;

        pick(&page, SATSUMAS, Condition::LikeNew).await?;
        page.dispatch(PageAction::ClearList).await?;

        let modal = page.notifications().modal().ok_or("modal should be open")?;
        assert_eq!(modal.message_key, CLEAR_LIST_MODAL_KEY);

        page.dispatch(PageAction::ConfirmModal {
            kind: ModalKind::Confirmation,
            input: None,
        })
        .await?;

        assert!(page.buyback().is_empty());
        assert!(page.notifications().modal().is_none());

        Ok(())
    }

    #[tokio::test]
    async fn dismissing_clear_list_modal_keeps_list() -> TestResult {
        let page = page(idle_transport(), Market::Sa)?;

        pick(&page, SATSUMAS, Condition::LikeNew).await?;
        page.dispatch(PageAction::ClearList).await?;
        page.dispatch(PageAction::DismissModal).await?;
        page.dispatch(PageAction::ConfirmModal {
            kind: ModalKind::Confirmation,
            input: None,
        })
        .await?;

        assert_eq!(page.buyback().item_count(), 1);

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn successful_submit_shows_confirmation() -> TestResult {
        let page = page(Arc::new(FakeBackend::default()), Market::Sa)?;

        pick(&page, SATSUMAS, Condition::LikeNew).await?;

        let response = page.submit(&valid_form()).await?;

        assert_eq!(
            page.view(),
            PageView::Confirmation {
                confirmation_number: response.confirmation_number
            }
        );
        assert!(page.buyback().is_empty());

        page.dispatch(PageAction::StartOver).await?;

        assert_eq!(page.view(), PageView::Browse);

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn detached_submit_completes_while_page_alive() -> TestResult {
        let page = page(Arc::new(FakeBackend::new(Duration::from_secs(1))), Market::Sa)?;

        pick(&page, SATSUMAS, Condition::LikeNew).await?;

        page.submit_detached(&valid_form())?.await?;

        assert!(matches!(page.view(), PageView::Confirmation { .. }));

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_page_discards_detached_result() -> TestResult {
        let backend = Arc::new(FakeBackend::new(Duration::from_secs(1)));
        let page = page(backend.clone(), Market::Sa)?;
        let notifications = Arc::clone(page.notifications());
        let buyback = Arc::clone(page.buyback());

        pick(&page, SATSUMAS, Condition::LikeNew).await?;
        notifications.close_toast();

        let handle = page.submit_detached(&valid_form())?;
        drop(page);
        handle.await?;

        assert_eq!(backend.submissions(), 1);
        assert!(buyback.is_empty());
        assert!(
            notifications.toast().is_none(),
            "no confirmation toast once the page is gone"
        );

        Ok(())
    }

    #[tokio::test]
    async fn rejected_submission_toasts_server_message() -> TestResult {
        let page = page(answering(200, rejection("Store closed")), Market::Sa)?;

        pick(&page, SATSUMAS, Condition::LikeNew).await?;

        let result = page.dispatch(PageAction::Submit(valid_form())).await;

        assert!(matches!(
            result,
            Err(PageError::Submission(SubmissionError::Rejected(_)))
        ));
        assert_eq!(toast_message(&page).as_deref(), Some("Store closed"));
        assert_eq!(page.view(), PageView::Browse);
        assert_eq!(page.buyback().item_count(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn rejection_without_message_uses_translated_fallback() -> TestResult {
        let page = page(answering(200, rejection(" ")), Market::Sa)?;

        pick(&page, SATSUMAS, Condition::LikeNew).await?;

        assert!(page.submit(&valid_form()).await.is_err());
        assert_eq!(
            toast_message(&page).as_deref(),
            Some(page.translation().errors.submission_rejected)
        );

        Ok(())
    }

    #[tokio::test]
    async fn malformed_response_toasts_server_error() -> TestResult {
        let page = page(answering(200, json!({ "unexpected": true })), Market::Sa)?;

        pick(&page, SATSUMAS, Condition::LikeNew).await?;

        let result = page.submit(&valid_form()).await;

        assert!(matches!(
            result,
            Err(PageError::Submission(SubmissionError::Pipeline(
                PipelineError::Decode(_)
            )))
        ));
        assert_eq!(
            toast_message(&page).as_deref(),
            Some(page.translation().errors.server)
        );
        assert_eq!(page.view(), PageView::Browse);
        assert_eq!(page.buyback().item_count(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn detached_rejection_toasts_while_page_alive() -> TestResult {
        let page = page(answering(200, rejection("Store closed")), Market::Sa)?;

        pick(&page, SATSUMAS, Condition::LikeNew).await?;

        page.submit_detached(&valid_form())?.await?;

        assert_eq!(toast_message(&page).as_deref(), Some("Store closed"));
        assert_eq!(page.view(), PageView::Browse);

        Ok(())
    }
}
