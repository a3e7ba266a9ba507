use async_trait::async_trait;
use dashmap::DashMap;
use restaurant_types::domain::order::{Order, OrderRecord, StoredOrder, ID_FIELD};
use restaurant_types::domain::reservation::Reservation;
use restaurant_types::domain::stats::revenue_of;
use restaurant_types::ports::order_repository::{OrderFilter, OrderRepository, RepoError};
use restaurant_types::ports::reservation_repository::ReservationRepository;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Process-local store. Entries are keyed by an insertion sequence so that
/// listing and "latest" lookups follow insertion order.
#[derive(Clone)]
pub struct InMemoryRepo {
    pub orders: Arc<DashMap<u64, OrderRecord>>,
    pub reservations: Arc<DashMap<u64, Reservation>>,
    seq: Arc<AtomicU64>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self {
            orders: Arc::new(DashMap::new()),
            reservations: Arc::new(DashMap::new()),
            seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Stores a document as-is, the way another writer to the same
    /// collection would. An `_id` is assigned when the document has none.
    pub fn seed_order(&self, mut record: OrderRecord) {
        if record.get(ID_FIELD).is_none() {
            record.0.insert(ID_FIELD.into(), new_id().into());
        }
        let key = self.next_seq();
        self.orders.insert(key, record);
    }

    /// There is no reservation write path in the API; this is how tests and
    /// local runs get data into the collection.
    pub fn seed_reservation(&self, reservation: Reservation) {
        let key = self.next_seq();
        self.reservations.insert(key, reservation);
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }

    fn sorted_orders(&self) -> Vec<OrderRecord> {
        let mut rows: Vec<_> = self
            .orders
            .iter()
            .map(|kv| (*kv.key(), kv.value().clone()))
            .collect();
        rows.sort_by_key(|(seq, _)| *seq);
        rows.into_iter().map(|(_, record)| record).collect()
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

impl Default for InMemoryRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderRepository for InMemoryRepo {
    async fn insert(&self, order: Order) -> Result<StoredOrder, RepoError> {
        let stored = StoredOrder {
            id: new_id(),
            order,
        };
        let record =
            OrderRecord::from_stored(&stored).map_err(|e| RepoError::DbError(e.to_string()))?;
        self.orders.insert(self.next_seq(), record);
        Ok(stored)
    }

    async fn list_orders(&self) -> Result<Vec<OrderRecord>, RepoError> {
        Ok(self
            .sorted_orders()
            .into_iter()
            .map(OrderRecord::without_id)
            .collect())
    }

    async fn latest_by_phone(&self, phone: &str) -> Result<Option<OrderRecord>, RepoError> {
        Ok(self
            .orders
            .iter()
            .filter(|kv| kv.value().phone() == Some(phone))
            .max_by_key(|kv| *kv.key())
            .map(|kv| kv.value().clone()))
    }

    async fn count(&self, filter: OrderFilter) -> Result<u64, RepoError> {
        Ok(self
            .orders
            .iter()
            .filter(|kv| filter.matches(kv.value()))
            .count() as u64)
    }

    async fn revenue(&self) -> Result<f64, RepoError> {
        Ok(revenue_of(&self.sorted_orders()))
    }
}

#[async_trait]
impl ReservationRepository for InMemoryRepo {
    async fn list_reservations(&self) -> Result<Vec<Reservation>, RepoError> {
        let mut rows: Vec<_> = self
            .reservations
            .iter()
            .map(|kv| (*kv.key(), kv.value().clone()))
            .collect();
        rows.sort_by_key(|(seq, _)| *seq);
        Ok(rows.into_iter().map(|(_, r)| r).collect())
    }
}
