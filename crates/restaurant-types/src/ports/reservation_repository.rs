use async_trait::async_trait;

use super::order_repository::RepoError;
use crate::domain::reservation::Reservation;

#[async_trait]
pub trait ReservationRepository: Send + Sync + 'static {
    async fn list_reservations(&self) -> Result<Vec<Reservation>, RepoError>;
}
