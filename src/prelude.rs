//! Buyback prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    app::{AppError, BuybackApp},
    buyback::{BuybackError, BuybackItem, BuybackListStore, BuybackSummary},
    catalog::{CatalogError, CatalogStore, Category, Condition, Product, ProductFilter, Store},
    config::{AppConfig, LogFormat, LoggingConfig},
    http::{HttpError, Method, RequestFailure, RequestOptions, RequestPipeline, Transport},
    i18n::{Translation, translation, translation_for},
    locale::{Direction, Language, LocaleResolver, LocaleState, Market},
    notifications::{Modal, ModalKind, NotificationStore, Toast, ToastKind},
    page::{BuybackPage, PageAction, PageError, PageView, SubmissionForm, ValidationError},
    storage::{PersistentStore, StorageScope},
    submission::{SubmissionError, SubmissionResponse, SubmissionState, SubmissionWorkflow},
};
