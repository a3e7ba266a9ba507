#![cfg(feature = "mongo")]

//! Runs against a live server only when `MONGO_TEST_URI` is set.

use chrono::Utc;
use restaurant_repo::mongo::{MongoRepo, DATABASE_NAME, ORDERS_COLLECTION};
use restaurant_types::domain::order::{LineItem, OrderBuilder};
use restaurant_types::ports::order_repository::{OrderFilter, OrderRepository};
use restaurant_types::ports::reservation_repository::ReservationRepository;
use uuid::Uuid;

async fn test_repo() -> Option<MongoRepo> {
    let uri = std::env::var("MONGO_TEST_URI").ok()?;
    Some(MongoRepo::connect(&uri).await.expect("connect"))
}

fn raw_orders(repo: &MongoRepo) -> mongodb::Collection<mongodb::bson::Document> {
    repo.client()
        .database(DATABASE_NAME)
        .collection(ORDERS_COLLECTION)
}

#[tokio::test]
async fn mongo_repo_latest_by_phone_returns_newest() {
    let Some(repo) = test_repo().await else {
        return;
    };
    let phone = format!("test-{}", Uuid::new_v4());

    let mut ids = Vec::new();
    for price in [1.0, 2.0, 3.0] {
        let order =
            OrderBuilder::new(phone.clone(), vec![LineItem::priced(price, 1.0)], Utc::now())
                .build();
        ids.push(repo.insert(order).await.unwrap().id);
    }

    let latest = repo.latest_by_phone(&phone).await.unwrap().unwrap();
    assert_eq!(latest.id(), ids.last().map(String::as_str));
    assert_eq!(latest.total(), 3.0);

    let listed = repo.list_orders().await.unwrap();
    let mine: Vec<_> = listed
        .iter()
        .filter(|o| o.phone() == Some(phone.as_str()))
        .collect();
    assert_eq!(mine.len(), 3);
    assert!(mine.iter().all(|o| o.id().is_none()));

    raw_orders(&repo)
        .delete_many(mongodb::bson::doc! { "phone": phone.as_str() })
        .await
        .unwrap();
}

#[tokio::test]
async fn mongo_repo_reads_documents_written_by_others() {
    let Some(repo) = test_repo().await else {
        return;
    };
    let phone = format!("legacy-{}", Uuid::new_v4());
    raw_orders(&repo)
        .insert_one(mongodb::bson::doc! {
            "phone": phone.as_str(),
            "table_no": 7,
            "items": [{ "price": "250", "quantity": 2 }, "Dal Makhani"],
        })
        .await
        .unwrap();

    let listed = repo.list_orders().await.unwrap();
    let legacy = listed
        .iter()
        .find(|o| o.phone() == Some(phone.as_str()))
        .expect("legacy order listed");
    assert_eq!(legacy.get("table_no"), Some(&serde_json::json!(7)));
    assert!(repo.revenue().await.is_ok());
    assert!(repo.latest_by_phone(&phone).await.unwrap().is_some());

    raw_orders(&repo)
        .delete_many(mongodb::bson::doc! { "phone": phone.as_str() })
        .await
        .unwrap();
}

#[tokio::test]
async fn mongo_repo_missing_phone_and_reads() {
    let Some(repo) = test_repo().await else {
        return;
    };
    let missing = repo
        .latest_by_phone(&format!("missing-{}", Uuid::new_v4()))
        .await
        .unwrap();
    assert!(missing.is_none());

    let total = repo.count(OrderFilter::All).await.unwrap();
    let confirmed = repo
        .count(OrderFilter::item_status("confirmed"))
        .await
        .unwrap();
    assert!(confirmed <= total);
    assert!(repo.revenue().await.unwrap() >= 0.0);
    repo.list_reservations().await.unwrap();
}
