use restaurant_repo::{build_repo, Repo};
use restaurant_types::ports::order_repository::{OrderFilter, OrderRepository};
use restaurant_types::ports::reservation_repository::ReservationRepository;

#[tokio::test]
async fn builds_memory_repo_without_connection_string() {
    let repo: Repo = build_repo(None).await.expect("build repo");
    // basic sanity: reads should succeed and be empty
    assert!(repo.list_orders().await.expect("list").is_empty());
    assert!(repo.list_reservations().await.expect("list").is_empty());
    assert_eq!(repo.count(OrderFilter::All).await.expect("count"), 0);
}
