//! Shared application state injected into every handler.

use std::sync::Arc;
use std::time::Duration;

use crate::api::middleware::cors::CorsPolicy;
use crate::application::services::{LinkService, VisitCountService, VisitCountSettings};
use crate::config::Config;
use crate::domain::repositories::MappingRepository;
use crate::utils::code_generator::{CodeGenerator, RandomCodeGenerator};

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn MappingRepository>>,
    pub visit_service: Arc<VisitCountService<dyn MappingRepository>>,
    /// Store handle kept for health checks.
    pub store: Arc<dyn MappingRepository>,
    /// Deadline for store calls made directly by handlers.
    pub store_timeout: Duration,
    pub cors: CorsPolicy,
}

impl AppState {
    pub fn new(
        link_service: Arc<LinkService<dyn MappingRepository>>,
        visit_service: Arc<VisitCountService<dyn MappingRepository>>,
        store: Arc<dyn MappingRepository>,
        store_timeout: Duration,
        cors: CorsPolicy,
    ) -> Self {
        Self {
            link_service,
            visit_service,
            store,
            store_timeout,
            cors,
        }
    }

    /// Wires both services around one long-lived store client.
    pub fn from_config(store: Arc<dyn MappingRepository>, config: &Config) -> Self {
        let generator: Arc<dyn CodeGenerator> =
            Arc::new(RandomCodeGenerator::new(config.short_code_length));

        let link_service = Arc::new(LinkService::new(
            store.clone(),
            generator,
            config.base_url.clone(),
            config.store_timeout(),
        ));

        let visit_service = Arc::new(VisitCountService::new(
            store.clone(),
            VisitCountSettings {
                store_timeout: config.store_timeout(),
                concurrency: config.visit_batch_concurrency,
                max_receive_count: config.visit_max_receive_count,
            },
        ));

        Self::new(
            link_service,
            visit_service,
            store,
            config.store_timeout(),
            CorsPolicy::new(config.frontend_domain.clone()),
        )
    }
}
