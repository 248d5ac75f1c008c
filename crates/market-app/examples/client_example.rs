///  To run :
///  cargo r --example client_example
use chrono::NaiveDate;
use market_client::MarketClient;
use market_hex::application::Services;
use market_hex::inbound::http::{HttpServer, HttpServerConfig};
use market_repo::build_repo;
use market_types::domain::offer::NewOffer;
use market_types::domain::order::{NewOrder, OrderPatch};
use market_types::domain::user::NewUser;
use reqwest::StatusCode;
use tempfile::tempdir;

fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

fn person(first_name: &str, email: &str, role: &str) -> NewUser {
    NewUser {
        first_name: first_name.into(),
        last_name: "Example".into(),
        age: None,
        email: email.into(),
        role: role.into(),
        phone: None,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let port = find_free_port();
    let addr = format!("http://127.0.0.1:{port}/");

    // Temp file-backed SQLite DB, thrown away on exit.
    let tmp = tempdir()?;
    let db_path = tmp.path().join("market.db");
    let db_url = format!("sqlite://{}", db_path.display());

    let repo = build_repo(Some(db_url.as_str())).await?;
    let server = HttpServer::new(
        Services::new(repo.clone()),
        HttpServerConfig {
            port: port.to_string(),
        },
    )
    .await?;

    let handle = tokio::spawn(async move {
        server.run().await.expect("server run");
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let client = MarketClient::new(&addr)?;
    client
        .create_user(&person("Carol", "carol@example.com", "customer"))
        .await?;
    client
        .create_user(&person("Dave", "dave@example.com", "executor"))
        .await?;
    let users = client.list_users().await?;
    let customer = users.iter().find(|u| u.role == "customer").unwrap();
    let executor = users.iter().find(|u| u.role == "executor").unwrap();
    println!(
        "Users: {} (customer id={}, executor id={})",
        users.len(),
        customer.id,
        executor.id
    );

    client
        .create_order(&NewOrder {
            name: "Hang shelves".into(),
            description: "Three shelves in the study".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 10),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 20),
            address: "12 Example Way".into(),
            price: 7500,
            customer_id: customer.id,
            executor_id: None,
        })
        .await?;
    let order = client.list_orders().await?.remove(0);
    println!(
        "Created order id={} from {:?} to {:?}",
        order.id, order.start_date, order.end_date
    );

    client
        .create_offer(&NewOffer {
            order_id: order.id,
            executor_id: executor.id,
        })
        .await?;
    let offer = client.list_offers().await?.remove(0);
    println!("Offer id={} by executor {}", offer.id, offer.executor_id);

    client
        .update_order(
            order.id,
            &OrderPatch {
                executor_id: Some(Some(offer.executor_id)),
                ..Default::default()
            },
        )
        .await?;
    let assigned = client.get_order(order.id).await?;
    println!("Order {} assigned to {:?}", assigned.id, assigned.executor_id);

    // The executor is still referenced, so deleting them is refused.
    match client.delete_user(executor.id).await {
        Ok(()) => println!("Unexpectedly deleted executor"),
        Err(err) => {
            let status = err
                .downcast_ref::<reqwest::Error>()
                .and_then(|e| e.status());
            if status == Some(StatusCode::CONFLICT) {
                println!("Delete of referenced executor rejected with 409");
            } else {
                return Err(err);
            }
        }
    }

    client.delete_offer(offer.id).await?;
    client.delete_order(order.id).await?;
    println!("Cleaned up order and offer");

    handle.abort();
    repo.close().await;
    Ok(())
}
