use axum::{
    extract::{FromRef, Path, State},
    routing::get,
    serve, Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::application::order_service::OrderService;
use crate::application::reservation_service::ReservationService;
use crate::errors::AppError;
use restaurant_types::domain::order::{NewOrder, OrderRecord, StoredOrder};
use restaurant_types::domain::reservation::Reservation;
use restaurant_types::domain::stats::OrderStats;
use restaurant_types::ports::order_repository::OrderRepository;
use restaurant_types::ports::reservation_repository::ReservationRepository;

#[derive(Clone)]
pub struct HttpServerConfig {
    pub port: String,
}

/// Services shared by every handler; each handler extracts only the one it
/// needs.
pub struct AppState<R>
where
    R: OrderRepository + ReservationRepository,
{
    pub orders: Arc<OrderService<R>>,
    pub reservations: Arc<ReservationService<R>>,
}

impl<R> Clone for AppState<R>
where
    R: OrderRepository + ReservationRepository,
{
    fn clone(&self) -> Self {
        Self {
            orders: self.orders.clone(),
            reservations: self.reservations.clone(),
        }
    }
}

impl<R> FromRef<AppState<R>> for Arc<OrderService<R>>
where
    R: OrderRepository + ReservationRepository,
{
    fn from_ref(state: &AppState<R>) -> Self {
        state.orders.clone()
    }
}

impl<R> FromRef<AppState<R>> for Arc<ReservationService<R>>
where
    R: OrderRepository + ReservationRepository,
{
    fn from_ref(state: &AppState<R>) -> Self {
        state.reservations.clone()
    }
}

#[derive(Clone)]
pub struct HttpServer<R>
where
    R: OrderRepository + ReservationRepository,
{
    pub state: AppState<R>,
    pub config: HttpServerConfig,
}

#[derive(Serialize)]
struct CreateOrderResponse {
    message: &'static str,
    order: StoredOrder,
}

impl<R> HttpServer<R>
where
    R: OrderRepository + ReservationRepository,
{
    pub async fn new(
        orders: OrderService<R>,
        reservations: ReservationService<R>,
        config: HttpServerConfig,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            state: AppState {
                orders: Arc::new(orders),
                reservations: Arc::new(reservations),
            },
            config,
        })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let app = router(self.state);

        let addr: SocketAddr = format!("0.0.0.0:{}", self.config.port).parse()?;
        tracing::info!("starting server on {}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}

pub fn router<R>(state: AppState<R>) -> Router
where
    R: OrderRepository + ReservationRepository,
{
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &axum::extract::Request<_>| {
            let uri = request.uri().to_string();
            let request_id = Uuid::new_v4();
            tracing::info_span!(
                "http_request",
                %request_id,
                method = %request.method(),
                uri
            )
        })
        .on_request(
            |request: &axum::extract::Request<_>, span: &tracing::Span| {
                tracing::info!(
                    parent: span,
                    method = %request.method(),
                    uri = %request.uri(),
                    "request"
                );
            },
        )
        .on_response(
            |response: &axum::response::Response, latency: Duration, span: &tracing::Span| {
                tracing::info!(
                    parent: span,
                    status = %response.status(),
                    latency_ms = %latency.as_millis(),
                    "response"
                );
            },
        );

    Router::new()
        .route("/health", get(health))
        .route("/api/orders", get(list_orders::<R>).post(create_order::<R>))
        .route("/api/orders/{phone}", get(latest_order::<R>))
        .route("/api/reservations", get(list_reservations::<R>))
        .route("/api/stats", get(stats::<R>))
        .layer(CorsLayer::permissive())
        .layer(trace_layer)
        .with_state(state)
}

async fn health() -> (axum::http::StatusCode, Json<serde_json::Value>) {
    (
        axum::http::StatusCode::OK,
        Json(serde_json::json!({ "status": "ok" })),
    )
}

async fn list_orders<R>(
    State(service): State<Arc<OrderService<R>>>,
) -> Result<Json<Vec<OrderRecord>>, AppError>
where
    R: OrderRepository + ReservationRepository,
{
    let list = service.list_orders().await?;
    Ok(Json(list))
}

async fn create_order<R>(
    State(service): State<Arc<OrderService<R>>>,
    Json(payload): Json<NewOrder>,
) -> Result<Json<CreateOrderResponse>, AppError>
where
    R: OrderRepository + ReservationRepository,
{
    let order = service.create_order(payload).await?;
    Ok(Json(CreateOrderResponse {
        message: "Order created successfully",
        order,
    }))
}

async fn latest_order<R>(
    State(service): State<Arc<OrderService<R>>>,
    Path(phone): Path<String>,
) -> Result<Json<OrderRecord>, AppError>
where
    R: OrderRepository + ReservationRepository,
{
    let order = service.latest_order(&phone).await?;
    Ok(Json(order))
}

async fn list_reservations<R>(
    State(service): State<Arc<ReservationService<R>>>,
) -> Result<Json<Vec<Reservation>>, AppError>
where
    R: OrderRepository + ReservationRepository,
{
    let list = service.list_reservations().await?;
    Ok(Json(list))
}

async fn stats<R>(
    State(service): State<Arc<OrderService<R>>>,
) -> Result<Json<OrderStats>, AppError>
where
    R: OrderRepository + ReservationRepository,
{
    let stats = service.stats().await?;
    Ok(Json(stats))
}
