use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use restaurant_types::domain::order::{Order, OrderRecord, StoredOrder};
use restaurant_types::domain::reservation::Reservation;
use restaurant_types::domain::stats::revenue_of;
use restaurant_types::ports::order_repository::{OrderFilter, OrderRepository, RepoError};
use restaurant_types::ports::reservation_repository::ReservationRepository;
use serde_json::{Map, Value};
use std::time::Duration;

pub const DATABASE_NAME: &str = "restaurant";
pub const ORDERS_COLLECTION: &str = "orders";
pub const RESERVATIONS_COLLECTION: &str = "reservations";
pub const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_millis(5000);

/// Owns the client and both collection handles for the life of the process.
#[derive(Clone)]
pub struct MongoRepo {
    client: Client,
    orders: Collection<Order>,
    reservations: Collection<Document>,
}

/// JSON form of a stored value. ObjectIds become their hex string and dates
/// their ISO-8601 string; everything else uses relaxed extended JSON.
pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(at) => match at.try_to_rfc3339_string() {
            Ok(iso) => Value::String(iso),
            Err(_) => Bson::DateTime(at).into_relaxed_extjson(),
        },
        Bson::Document(doc) => Value::Object(document_to_map(doc)),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

pub fn document_to_map(doc: Document) -> Map<String, Value> {
    doc.into_iter().map(|(k, v)| (k, bson_to_json(v))).collect()
}

fn db_err(e: mongodb::error::Error) -> RepoError {
    RepoError::DbError(e.to_string())
}

fn without_id() -> Document {
    doc! { "_id": 0 }
}

impl MongoRepo {
    /// Connects and pings the server; any failure here is meant to be fatal.
    pub async fn connect(uri: &str) -> anyhow::Result<Self> {
        let mut options = ClientOptions::parse(uri).await?;
        options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);
        let client = Client::with_options(options)?;

        let db = client.database(DATABASE_NAME);
        db.run_command(doc! { "ping": 1 }).await?;
        tracing::info!(database = DATABASE_NAME, "MongoDB connected");

        Ok(Self {
            orders: db.collection(ORDERS_COLLECTION),
            reservations: db.collection(RESERVATIONS_COLLECTION),
            client,
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    async fn find_orders(&self, projection: Document) -> Result<Vec<OrderRecord>, RepoError> {
        let docs: Vec<Document> = self
            .orders
            .clone_with_type::<Document>()
            .find(doc! {})
            .projection(projection)
            .await
            .map_err(db_err)?
            .try_collect()
            .await
            .map_err(db_err)?;
        Ok(docs
            .into_iter()
            .map(|d| OrderRecord(document_to_map(d)))
            .collect())
    }
}

#[async_trait]
impl OrderRepository for MongoRepo {
    async fn insert(&self, order: Order) -> Result<StoredOrder, RepoError> {
        let res = self.orders.insert_one(&order).await.map_err(db_err)?;
        let id = match res.inserted_id {
            Bson::ObjectId(oid) => oid.to_hex(),
            other => other.to_string(),
        };
        Ok(StoredOrder { id, order })
    }

    async fn list_orders(&self) -> Result<Vec<OrderRecord>, RepoError> {
        self.find_orders(without_id()).await
    }

    async fn latest_by_phone(&self, phone: &str) -> Result<Option<OrderRecord>, RepoError> {
        // ObjectIds grow with insertion time, so the highest one is the newest.
        let row = self
            .orders
            .clone_with_type::<Document>()
            .find_one(doc! { "phone": phone })
            .sort(doc! { "_id": -1 })
            .await
            .map_err(db_err)?;
        Ok(row.map(|d| OrderRecord(document_to_map(d))))
    }

    async fn count(&self, filter: OrderFilter) -> Result<u64, RepoError> {
        let query = match filter {
            OrderFilter::All => doc! {},
            OrderFilter::ItemStatus(status) => doc! { "items.status": status },
        };
        self.orders.count_documents(query).await.map_err(db_err)
    }

    async fn revenue(&self) -> Result<f64, RepoError> {
        let rows = self.find_orders(doc! { "_id": 0, "items": 1 }).await?;
        Ok(revenue_of(&rows))
    }
}

#[async_trait]
impl ReservationRepository for MongoRepo {
    async fn list_reservations(&self) -> Result<Vec<Reservation>, RepoError> {
        let docs: Vec<Document> = self
            .reservations
            .find(doc! {})
            .projection(without_id())
            .await
            .map_err(db_err)?
            .try_collect()
            .await
            .map_err(db_err)?;
        Ok(docs
            .into_iter()
            .map(|d| Reservation(document_to_map(d)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;
    use mongodb::bson::DateTime;
    use serde_json::json;

    #[test]
    fn legacy_order_document_reads_back_whole() {
        let oid = ObjectId::new();
        let legacy = doc! {
            "_id": oid,
            "phone": "5551234",
            "table_no": 7,
            "items": [
                { "name": "Paneer", "price": "250", "quantity": 2, "status": "confirmed" },
                "Dal Makhani",
                { "price": 10, "quantity": 3_i64 },
                { "price": 2.5 },
            ],
        };

        let record = OrderRecord(document_to_map(legacy));
        assert_eq!(record.id(), Some(oid.to_hex().as_str()));
        assert_eq!(record.get("table_no"), Some(&json!(7)));
        assert_eq!(record.items().len(), 4);
        assert_eq!(record.items()[1], json!("Dal Makhani"));
        assert!(record.has_item_status("confirmed"));
        assert_eq!(record.total(), 32.5);
        assert_eq!(revenue_of([&record]), 32.5);
    }

    #[test]
    fn dates_and_ids_render_as_strings() {
        let oid = ObjectId::new();
        let reservation = doc! {
            "guest": oid,
            "at": DateTime::from_millis(1_700_000_000_123),
            "party_size": 4,
        };
        let fields = document_to_map(reservation);
        assert_eq!(fields["guest"], json!(oid.to_hex()));
        let at = fields["at"].as_str().unwrap();
        assert!(at.starts_with("2023-11-14T22:13:20.123"));
        assert_eq!(fields["party_size"], json!(4));
    }
}
