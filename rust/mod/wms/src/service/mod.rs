pub mod dashboard;
pub mod fulfill;
pub mod lifecycle;
pub mod lock;
pub mod pack;
pub mod progress;
pub mod query;
pub mod route;
pub mod scan;
pub mod session;
pub mod settings;

use std::sync::Arc;

use thiserror::Error;

use openwms_core::ServiceError;
use openwms_host::{DocOps, DocStore, EventSink, HostError};

use crate::model::doctype;
use crate::model::{
    BinRecord, DeliveryNote, Item, ItemBarcode, PickList, PickSession, SalesOrder, Shipment,
    StockEntry, WmsSettings,
};

/// The acting identity for a request, as injected by the host edge.
///
/// `session` is an opaque per-client id (one per browser tab); the lock
/// manager keys renewals on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user: String,
    pub session: String,
}

impl Actor {
    pub fn new(user: &str, session: &str) -> Self {
        Self {
            user: user.to_string(),
            session: session.to_string(),
        }
    }
}

/// WMS service error type.
#[derive(Debug, Error)]
pub enum WmsError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    /// Document is held by another operator/session.
    #[error("{message}")]
    LockConflict {
        /// User holding the lock.
        holder: String,
        message: String,
    },

    /// Stale write rejected by the host's document versioning.
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Storage(String),
}

impl From<HostError> for WmsError {
    fn from(e: HostError) -> Self {
        match e {
            HostError::NotFound(m) => WmsError::NotFound(m),
            HostError::Conflict(m) => WmsError::Conflict(m),
            HostError::Storage(m) => WmsError::Storage(m),
        }
    }
}

impl From<WmsError> for ServiceError {
    fn from(e: WmsError) -> Self {
        match e {
            WmsError::NotFound(m) => ServiceError::NotFound(m),
            WmsError::Validation(m) => ServiceError::Validation(m),
            WmsError::LockConflict { message, .. } => ServiceError::LockConflict(message),
            WmsError::Conflict(m) => ServiceError::Conflict(m),
            WmsError::Storage(m) => ServiceError::Storage(m),
        }
    }
}

/// WMS service — business logic over the host platform's document layer.
///
/// Holds one typed document handle per doctype it touches. All state
/// lives behind the `DocStore` seam; the service itself is stateless
/// between requests.
pub struct WmsService {
    pub(crate) events: Arc<dyn EventSink>,
    pub(crate) pick_lists: DocOps<PickList>,
    pub(crate) delivery_notes: DocOps<DeliveryNote>,
    pub(crate) sales_orders: DocOps<SalesOrder>,
    pub(crate) items: DocOps<Item>,
    pub(crate) barcodes: DocOps<ItemBarcode>,
    pub(crate) bins: DocOps<BinRecord>,
    pub(crate) stock_entries: DocOps<StockEntry>,
    pub(crate) sessions: DocOps<PickSession>,
    pub(crate) shipments: DocOps<Shipment>,
    pub(crate) settings: DocOps<WmsSettings>,
}

impl WmsService {
    pub fn new(store: Arc<dyn DocStore>, events: Arc<dyn EventSink>) -> Self {
        Self {
            events,
            pick_lists: DocOps::new(Arc::clone(&store), doctype::PICK_LIST),
            delivery_notes: DocOps::new(Arc::clone(&store), doctype::DELIVERY_NOTE),
            sales_orders: DocOps::new(Arc::clone(&store), doctype::SALES_ORDER),
            items: DocOps::new(Arc::clone(&store), doctype::ITEM),
            barcodes: DocOps::new(Arc::clone(&store), doctype::ITEM_BARCODE),
            bins: DocOps::new(Arc::clone(&store), doctype::BIN),
            stock_entries: DocOps::new(Arc::clone(&store), doctype::STOCK_ENTRY),
            sessions: DocOps::new(Arc::clone(&store), doctype::PICK_SESSION),
            shipments: DocOps::new(Arc::clone(&store), doctype::SHIPMENT),
            settings: DocOps::new(store, doctype::WMS_SETTINGS),
        }
    }
}
