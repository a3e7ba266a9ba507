use async_trait::async_trait;

use crate::domain::order::{Order, OrderRecord, StoredOrder};

#[derive(thiserror::Error, Debug)]
pub enum RepoError {
    #[error("db error: {0}")]
    DbError(String),
}

/// Which orders a count should include.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderFilter {
    All,
    /// Orders with at least one line item carrying this status.
    ItemStatus(String),
}

impl OrderFilter {
    pub fn item_status(status: impl Into<String>) -> Self {
        Self::ItemStatus(status.into())
    }

    pub fn matches(&self, order: &OrderRecord) -> bool {
        match self {
            OrderFilter::All => true,
            OrderFilter::ItemStatus(status) => order.has_item_status(status),
        }
    }
}

#[async_trait]
pub trait OrderRepository: Send + Sync + 'static {
    async fn insert(&self, order: Order) -> Result<StoredOrder, RepoError>;
    /// Every order document as stored, without store identifiers.
    async fn list_orders(&self) -> Result<Vec<OrderRecord>, RepoError>;
    /// Most recently inserted order whose phone equals `phone` exactly,
    /// including its `_id`.
    async fn latest_by_phone(&self, phone: &str) -> Result<Option<OrderRecord>, RepoError>;
    async fn count(&self, filter: OrderFilter) -> Result<u64, RepoError>;
    /// Full scan: sum of `price * quantity` over every item of every order.
    async fn revenue(&self) -> Result<f64, RepoError>;
}
