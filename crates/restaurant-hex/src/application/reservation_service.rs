use crate::errors::AppError;
use restaurant_types::domain::reservation::Reservation;
use restaurant_types::ports::reservation_repository::ReservationRepository;

pub struct ReservationService<R: ReservationRepository> {
    repo: R,
}

impl<R: ReservationRepository> ReservationService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn list_reservations(&self) -> Result<Vec<Reservation>, AppError> {
        self.repo
            .list_reservations()
            .await
            .map_err(AppError::storage("fetch reservations"))
    }
}
