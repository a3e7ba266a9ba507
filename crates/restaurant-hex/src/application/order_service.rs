use crate::errors::AppError;
use chrono::Utc;
use restaurant_types::domain::order::{
    NewOrder, Order, OrderRecord, StoredOrder, STATUS_CONFIRMED, STATUS_DELIVERED,
};
use restaurant_types::domain::stats::OrderStats;
use restaurant_types::ports::order_repository::{OrderFilter, OrderRepository};

pub struct OrderService<R: OrderRepository> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn create_order(&self, req: NewOrder) -> Result<StoredOrder, AppError> {
        let order = Order::from_request(req, Utc::now());
        let stored = self
            .repo
            .insert(order)
            .await
            .map_err(AppError::storage("create order"))?;
        tracing::info!(id = %stored.id, phone = %stored.order.phone, "order created");
        Ok(stored)
    }

    pub async fn list_orders(&self) -> Result<Vec<OrderRecord>, AppError> {
        self.repo
            .list_orders()
            .await
            .map_err(AppError::storage("fetch orders"))
    }

    pub async fn latest_order(&self, phone: &str) -> Result<OrderRecord, AppError> {
        match self
            .repo
            .latest_by_phone(phone)
            .await
            .map_err(AppError::storage("fetch order"))?
        {
            Some(o) => Ok(o),
            None => Err(AppError::NotFound("Order not found".into())),
        }
    }

    /// Counts and revenue are recomputed from the store on every call.
    pub async fn stats(&self) -> Result<OrderStats, AppError> {
        let (total_orders, confirmed_orders, delivered_orders, revenue) = tokio::try_join!(
            self.repo.count(OrderFilter::All),
            self.repo.count(OrderFilter::item_status(STATUS_CONFIRMED)),
            self.repo.count(OrderFilter::item_status(STATUS_DELIVERED)),
            self.repo.revenue(),
        )
        .map_err(AppError::storage("fetch stats"))?;
        Ok(OrderStats {
            total_orders,
            confirmed_orders,
            delivered_orders,
            revenue,
        })
    }
}
