#[cfg(not(any(feature = "memory", feature = "mongo")))]
compile_error!("Enable a repo feature: `memory` or `mongo`.");

use restaurant_types::domain::order::{Order, OrderRecord, StoredOrder};
use restaurant_types::domain::reservation::Reservation;
use restaurant_types::ports::order_repository::{OrderFilter, OrderRepository, RepoError};
use restaurant_types::ports::reservation_repository::ReservationRepository;

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "mongo")]
pub mod mongo;

/// The storage adapter the binary runs against, chosen at build time by
/// feature and at startup by whether a connection string is present.
#[derive(Clone)]
pub enum Repo {
    #[cfg(feature = "memory")]
    Memory(memory::InMemoryRepo),
    #[cfg(feature = "mongo")]
    Mongo(mongo::MongoRepo),
}

pub async fn build_repo(uri: Option<&str>) -> anyhow::Result<Repo> {
    Repo::build_repo(uri).await
}

impl Repo {
    #[allow(unreachable_code)]
    pub async fn build_repo(uri: Option<&str>) -> anyhow::Result<Self> {
        #[cfg(feature = "mongo")]
        {
            if let Some(uri) = uri {
                return Ok(Self::Mongo(mongo::MongoRepo::connect(uri).await?));
            }
        }

        #[cfg(feature = "memory")]
        {
            if uri.is_some() {
                tracing::warn!("connection string ignored: built without the `mongo` feature");
            }
            return Ok(Self::Memory(memory::InMemoryRepo::new()));
        }

        Err(anyhow::anyhow!("a MongoDB connection string is required"))
    }
}

#[async_trait::async_trait]
impl OrderRepository for Repo {
    async fn insert(&self, order: Order) -> Result<StoredOrder, RepoError> {
        match self {
            #[cfg(feature = "memory")]
            Repo::Memory(r) => r.insert(order).await,
            #[cfg(feature = "mongo")]
            Repo::Mongo(r) => r.insert(order).await,
        }
    }

    async fn list_orders(&self) -> Result<Vec<OrderRecord>, RepoError> {
        match self {
            #[cfg(feature = "memory")]
            Repo::Memory(r) => r.list_orders().await,
            #[cfg(feature = "mongo")]
            Repo::Mongo(r) => r.list_orders().await,
        }
    }

    async fn latest_by_phone(&self, phone: &str) -> Result<Option<OrderRecord>, RepoError> {
        match self {
            #[cfg(feature = "memory")]
            Repo::Memory(r) => r.latest_by_phone(phone).await,
            #[cfg(feature = "mongo")]
            Repo::Mongo(r) => r.latest_by_phone(phone).await,
        }
    }

    async fn count(&self, filter: OrderFilter) -> Result<u64, RepoError> {
        match self {
            #[cfg(feature = "memory")]
            Repo::Memory(r) => r.count(filter).await,
            #[cfg(feature = "mongo")]
            Repo::Mongo(r) => r.count(filter).await,
        }
    }

    async fn revenue(&self) -> Result<f64, RepoError> {
        match self {
            #[cfg(feature = "memory")]
            Repo::Memory(r) => r.revenue().await,
            #[cfg(feature = "mongo")]
            Repo::Mongo(r) => r.revenue().await,
        }
    }
}

#[async_trait::async_trait]
impl ReservationRepository for Repo {
    async fn list_reservations(&self) -> Result<Vec<Reservation>, RepoError> {
        match self {
            #[cfg(feature = "memory")]
            Repo::Memory(r) => r.list_reservations().await,
            #[cfg(feature = "mongo")]
            Repo::Mongo(r) => r.list_reservations().await,
        }
    }
}
