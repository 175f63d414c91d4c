//! Application wiring

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::{
    buyback::BuybackListStore,
    catalog::{CatalogError, CatalogStore},
    config::AppConfig,
    http::{FakeBackend, ReqwestTransport, RequestPipeline, Transport, TransportError},
    i18n::{Translation, translation_for},
    locale::{LocaleResolver, LocaleState},
    notifications::NotificationStore,
    page::BuybackPage,
    storage::{PersistentStore, StorageError},
    submission::SubmissionWorkflow,
};

/// Errors raised while starting the application.
#[derive(Debug, Error)]
pub enum AppError {
    /// The catalog could not be loaded.
    #[error("failed to load catalog: {0}")]
    Catalog(#[from] CatalogError),

    /// Durable storage could not be opened.
    #[error("failed to open storage: {0}")]
    Storage(#[from] StorageError),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Transport(#[from] TransportError),
}

/// One shopper session: the stores, pipeline and page for a resolved locale.
#[derive(Debug)]
pub struct BuybackApp {
    locale: LocaleState,
    storage: PersistentStore,
    catalog: Arc<CatalogStore>,
    buyback: Arc<BuybackListStore>,
    notifications: Arc<NotificationStore>,
    pipeline: Arc<RequestPipeline>,
    workflow: Arc<SubmissionWorkflow>,
    page: Arc<BuybackPage>,
}

impl BuybackApp {
    /// Build the application for the request `path`, e.g. `/bh/ar/buyback`.
    ///
    /// # Errors
    ///
    /// Returns an `AppError` if the catalog, storage or HTTP client cannot be set up.
    pub fn new(config: &AppConfig, path: &str) -> Result<Self, AppError> {
        let locale =
            LocaleResolver::new(config.default_market, config.default_language).resolve(path);

        let storage = match &config.storage_dir {
            Some(dir) => PersistentStore::on_disk(dir)?,
            None => PersistentStore::in_memory(),
        };

        let catalog = match &config.catalog {
            Some(path) => CatalogStore::from_path(path)?,
            None => CatalogStore::bundled()?,
        };

        let transport: Arc<dyn Transport> = match &config.api_base_url {
            Some(base_url) => Arc::new(ReqwestTransport::new(base_url.as_str())?),
            None => Arc::new(FakeBackend::new(config.fake_delay())),
        };

        info!(
            market = %locale.market(),
            language = %locale.language(),
            direction = locale.direction().as_str(),
            durable = config.storage_dir.is_some(),
            remote = config.api_base_url.is_some(),
            "starting buyback session"
        );

        Ok(Self::with_parts(locale, storage, catalog, transport))
    }

    /// Assemble the application from already built parts.
    pub fn with_parts(
        locale: LocaleState,
        storage: PersistentStore,
        catalog: CatalogStore,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let catalog = Arc::new(catalog);
        let notifications = Arc::new(NotificationStore::new());
        let buyback = Arc::new(BuybackListStore::new(storage.clone()));
        let pipeline = Arc::new(RequestPipeline::new(
            locale.clone(),
            transport,
            Arc::clone(&notifications),
        ));
        let workflow = Arc::new(SubmissionWorkflow::new(
            Arc::clone(&pipeline),
            Arc::clone(&buyback),
        ));
        let page = Arc::new(BuybackPage::new(
            locale.clone(),
            Arc::clone(&catalog),
            Arc::clone(&buyback),
            Arc::clone(&notifications),
            Arc::clone(&workflow),
        ));

        Self {
            locale,
            storage,
            catalog,
            buyback,
            notifications,
            pipeline,
            workflow,
            page,
        }
    }

    /// Resolved locale.
    pub fn locale(&self) -> &LocaleState {
        &self.locale
    }

    /// Strings for the locale.
    pub fn translation(&self) -> &'static Translation {
        translation_for(&self.locale)
    }

    /// Persistent storage.
    pub fn storage(&self) -> &PersistentStore {
        &self.storage
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

    /// Request pipeline.
    pub fn pipeline(&self) -> &Arc<RequestPipeline> {
        &self.pipeline
    }

    /// Submission workflow.
    pub fn workflow(&self) -> &Arc<SubmissionWorkflow> {
        &self.workflow
    }

    /// Page view model.
    pub fn page(&self) -> &Arc<BuybackPage> {
        &self.page
    }
}
