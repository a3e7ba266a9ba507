use std::time::Duration;

use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{StatusCode, Url};
use restaurant_types::domain::order::{NewOrder, OrderRecord, StoredOrder};
use restaurant_types::domain::reservation::Reservation;
use restaurant_types::domain::stats::OrderStats;
use serde::{Deserialize, Serialize};

#[derive(Clone)]
pub struct RestaurantClientBuilder {
    base: Url,
    headers: HeaderMap,
    timeout: Option<Duration>,
    client: Option<reqwest::Client>,
}

#[derive(Clone)]
pub struct RestaurantClient {
    base: Url,
    client: reqwest::Client,
}

impl RestaurantClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::builder(base_url)?.build()
    }

    pub fn builder(base_url: &str) -> anyhow::Result<RestaurantClientBuilder> {
        let base = Url::parse(base_url).context("invalid base url")?;
        Ok(RestaurantClientBuilder {
            base,
            headers: HeaderMap::new(),
            timeout: None,
            client: None,
        })
    }

    fn url(&self, path: &str) -> anyhow::Result<Url> {
        self.base.join(path).context("failed to join url")
    }

    pub async fn create_order(&self, req: &NewOrder) -> anyhow::Result<CreateOrderResponse> {
        let res = self
            .client
            .post(self.url("api/orders")?)
            .json(req)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn list_orders(&self) -> anyhow::Result<Vec<OrderRecord>> {
        let res = self
            .client
            .get(self.url("api/orders")?)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    /// Latest order for `phone` as stored, `_id` included, or `None` when the
    /// server has none.
    pub async fn latest_order(&self, phone: &str) -> anyhow::Result<Option<OrderRecord>> {
        let mut url = self.url("api/orders")?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("base url cannot carry a path"))?
            .pop_if_empty()
            .push(phone);

        let res = self.client.get(url).send().await?;
        if res.status() == StatusCode::NOT_FOUND {
            tracing::debug!(phone, "no order for phone");
            return Ok(None);
        }
        Ok(Some(res.error_for_status()?.json().await?))
    }

    pub async fn list_reservations(&self) -> anyhow::Result<Vec<Reservation>> {
        let res = self
            .client
            .get(self.url("api/reservations")?)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn stats(&self) -> anyhow::Result<OrderStats> {
        let res = self
            .client
            .get(self.url("api/stats")?)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }
}

impl RestaurantClientBuilder {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(
        mut self,
        key: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> anyhow::Result<Self> {
        let header_name =
            HeaderName::from_bytes(key.as_ref().as_bytes()).context("invalid header name")?;
        let header_value = HeaderValue::from_str(value.as_ref()).context("invalid header value")?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    pub fn with_reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> anyhow::Result<RestaurantClient> {
        if let Some(client) = self.client {
            return Ok(RestaurantClient {
                base: self.base,
                client,
            });
        }

        let mut builder = reqwest::Client::builder();
        if !self.headers.is_empty() {
            builder = builder.default_headers(self.headers);
        }
        if let Some(t) = self.timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build()?;
        Ok(RestaurantClient {
            base: self.base,
            client,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CreateOrderResponse {
    pub message: String,
    pub order: StoredOrder,
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use restaurant_types::domain::order::OrderBuilder;
    use serde_json::json;

    fn sample_order() -> StoredOrder {
        StoredOrder {
            id: "65a1f0c2e4b0a1b2c3d4e5f6".into(),
            order: OrderBuilder::new("5551234".into(), vec![], chrono::Utc::now())
                .name(Some(json!("User")))
                .build(),
        }
    }

    #[tokio::test]
    async fn create_and_fetch_latest_order() {
        let server = MockServer::start();
        let stored = sample_order();
        let req = NewOrder {
            phone: Some(json!("5551234")),
            name: Some(json!("User")),
            ..NewOrder::default()
        };

        let create_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/orders")
                .json_body(json!({ "phone": "5551234", "name": "User" }));
            then.status(200).json_body_obj(&CreateOrderResponse {
                message: "Order created successfully".into(),
                order: stored.clone(),
            });
        });

        let latest_mock = server.mock(|when, then| {
            when.method(GET).path("/api/orders/5551234");
            then.status(200).json_body(json!({
                "_id": stored.id,
                "phone": "5551234",
                "name": "User",
                "table_no": 7,
                "items": ["Dal Makhani"]
            }));
        });

        let client = RestaurantClient::new(&server.base_url()).unwrap();
        let created = client.create_order(&req).await.unwrap();
        assert_eq!(created.order.id, stored.id);
        assert_eq!(created.message, "Order created successfully");

        let fetched = client.latest_order("5551234").await.unwrap().unwrap();
        assert_eq!(fetched.id(), Some(stored.id.as_str()));
        assert_eq!(fetched.get("table_no"), Some(&json!(7)));
        assert_eq!(fetched.items(), &[json!("Dal Makhani")]);

        create_mock.assert();
        latest_mock.assert();
    }

    #[tokio::test]
    async fn latest_order_maps_404_to_none() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/orders/nobody");
            then.status(404)
                .json_body(json!({ "message": "Order not found" }));
        });

        let client = RestaurantClient::new(&server.base_url()).unwrap();
        assert!(client.latest_order("nobody").await.unwrap().is_none());
        mock.assert();
    }

    #[tokio::test]
    async fn list_stats_and_reservations() {
        let server = MockServer::start();
        let stored = sample_order();

        let list_mock = server.mock(|when, then| {
            when.method(GET).path("/api/orders");
            then.status(200).json_body_obj(&vec![OrderRecord::from_stored(&stored)
                .unwrap()
                .without_id()]);
        });
        let stats_mock = server.mock(|when, then| {
            when.method(GET).path("/api/stats");
            then.status(200).json_body(json!({
                "total_orders": 4,
                "confirmed_orders": 2,
                "delivered_orders": 1,
                "revenue": 57.5
            }));
        });
        let reservations_mock = server.mock(|when, then| {
            when.method(GET).path("/api/reservations");
            then.status(200)
                .json_body(json!([{ "name": "Ada", "time": "19:00" }]));
        });

        let client = RestaurantClient::builder(&server.base_url())
            .unwrap()
            .with_timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        let listed = client.list_orders().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].phone(), Some("5551234"));
        assert_eq!(listed[0].get("name"), Some(&json!("User")));
        assert!(listed[0].id().is_none());

        let stats = client.stats().await.unwrap();
        assert_eq!(stats.total_orders, 4);
        assert_eq!(stats.revenue, 57.5);

        let reservations = client.list_reservations().await.unwrap();
        assert_eq!(reservations[0].get("time"), Some(&json!("19:00")));

        list_mock.assert();
        stats_mock.assert();
        reservations_mock.assert();
    }

    #[tokio::test]
    async fn server_errors_surface() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/stats");
            then.status(500)
                .json_body(json!({ "error": "Failed to fetch stats" }));
        });

        let client = RestaurantClient::new(&server.base_url()).unwrap();
        let err = client.stats().await.unwrap_err();
        let status = err.downcast_ref::<reqwest::Error>().and_then(|e| e.status());
        assert_eq!(status, Some(StatusCode::INTERNAL_SERVER_ERROR));
    }
}
