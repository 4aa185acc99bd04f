pub mod api;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;
use openwms_core::Module;
use openwms_host::{DocStore, EventHub, EventSink};

use service::WmsService;

/// WMS Module — warehouse pick/pack operations on top of the host
/// platform's document layer.
pub struct WmsModule {
    service: Arc<WmsService>,
    hub: Arc<EventHub>,
}

impl WmsModule {
    pub fn new(store: Arc<dyn DocStore>, hub: Arc<EventHub>) -> Self {
        let sink: Arc<dyn EventSink> = hub.clone();
        Self {
            service: Arc::new(WmsService::new(store, sink)),
            hub,
        }
    }

    /// Get a reference to the service for programmatic use (seeding, tests).
    pub fn service(&self) -> &Arc<WmsService> {
        &self.service
    }
}

impl Module for WmsModule {
    fn name(&self) -> &str {
        "wms"
    }

    fn routes(&self) -> Router {
        api::router(Arc::clone(&self.service), Arc::clone(&self.hub))
    }
}
