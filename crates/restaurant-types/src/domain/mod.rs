pub mod order;
pub mod reservation;
pub mod stats;
