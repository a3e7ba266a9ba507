///  To run :
///  cargo r --example client_example
use restaurant_client::RestaurantClient;
use restaurant_hex::application::order_service::OrderService;
use restaurant_hex::application::reservation_service::ReservationService;
use restaurant_hex::inbound::http::{HttpServer, HttpServerConfig};
use restaurant_repo::build_repo;
use restaurant_types::domain::order::{LineItem, NewOrder};

fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Start server on ephemeral port with the in-memory repo.
    let port = find_free_port();
    let addr = format!("http://127.0.0.1:{port}/");

    let repo = build_repo(None).await?;
    let server = HttpServer::new(
        OrderService::new(repo.clone()),
        ReservationService::new(repo),
        HttpServerConfig {
            port: port.to_string(),
        },
    )
    .await?;

    let handle = tokio::spawn(async move {
        server.run().await.expect("server run");
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let client = RestaurantClient::new(&addr)?;
    let created = client
        .create_order(&NewOrder {
            phone: Some("unknown".into()),
            caller_phone: Some("5559999".into()),
            items: Some(vec![LineItem::priced(12.5, 2.0).with_status("confirmed").0].into()),
            ..NewOrder::default()
        })
        .await?;
    println!(
        "{}: id={} phone={}",
        created.message, created.order.id, created.order.order.phone
    );

    let latest = client.latest_order(&created.order.order.phone).await?;
    println!("Latest for {}: {:?}", created.order.order.phone, latest.as_ref().and_then(|o| o.id()));

    let stats = client.stats().await?;
    println!(
        "orders={} confirmed={} delivered={} revenue={}",
        stats.total_orders, stats.confirmed_orders, stats.delivered_orders, stats.revenue
    );

    handle.abort();
    Ok(())
}
