pub mod order_repository;
pub mod reservation_repository;
