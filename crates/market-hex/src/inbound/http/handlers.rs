use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::extract::ApiJson;
use crate::application::Services;
use crate::errors::AppError;
use market_types::domain::offer::{NewOffer, Offer, OfferPatch};
use market_types::domain::order::{NewOrder, Order, OrderPatch};
use market_types::domain::user::{NewUser, User, UserPatch};
use market_types::ports::Repository;

fn parse_id(raw: &str) -> Result<i64, AppError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::BadRequest(format!(
            "id must be a positive integer, got {raw:?}"
        ))),
    }
}

pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

// users

pub async fn list_users<R: Repository>(
    State(services): State<Services<R>>,
) -> Result<Json<Vec<User>>, AppError> {
    let list = services.users.list_users().await?;
    Ok(Json(list))
}

pub async fn create_user<R: Repository>(
    State(services): State<Services<R>>,
    ApiJson(payload): ApiJson<NewUser>,
) -> Result<StatusCode, AppError> {
    services.users.create_user(payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_user<R: Repository>(
    State(services): State<Services<R>>,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    let user = services.users.get_user(parse_id(&id)?).await?;
    Ok(Json(user))
}

pub async fn update_user<R: Repository>(
    State(services): State<Services<R>>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UserPatch>,
) -> Result<StatusCode, AppError> {
    services.users.update_user(parse_id(&id)?, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_user<R: Repository>(
    State(services): State<Services<R>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    services.users.delete_user(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

// orders

pub async fn list_orders<R: Repository>(
    State(services): State<Services<R>>,
) -> Result<Json<Vec<Order>>, AppError> {
    let list = services.orders.list_orders().await?;
    Ok(Json(list))
}

pub async fn create_order<R: Repository>(
    State(services): State<Services<R>>,
    ApiJson(payload): ApiJson<NewOrder>,
) -> Result<StatusCode, AppError> {
    services.orders.create_order(payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_order<R: Repository>(
    State(services): State<Services<R>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, AppError> {
    let order = services.orders.get_order(parse_id(&id)?).await?;
    Ok(Json(order))
}

pub async fn update_order<R: Repository>(
    State(services): State<Services<R>>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<OrderPatch>,
) -> Result<StatusCode, AppError> {
    services.orders.update_order(parse_id(&id)?, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_order<R: Repository>(
    State(services): State<Services<R>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    services.orders.delete_order(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

// offers

pub async fn list_offers<R: Repository>(
    State(services): State<Services<R>>,
) -> Result<Json<Vec<Offer>>, AppError> {
    let list = services.offers.list_offers().await?;
    Ok(Json(list))
}

pub async fn create_offer<R: Repository>(
    State(services): State<Services<R>>,
    ApiJson(payload): ApiJson<NewOffer>,
) -> Result<StatusCode, AppError> {
    services.offers.create_offer(payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_offer<R: Repository>(
    State(services): State<Services<R>>,
    Path(id): Path<String>,
) -> Result<Json<Offer>, AppError> {
    let offer = services.offers.get_offer(parse_id(&id)?).await?;
    Ok(Json(offer))
}

pub async fn update_offer<R: Repository>(
    State(services): State<Services<R>>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<OfferPatch>,
) -> Result<StatusCode, AppError> {
    services.offers.update_offer(parse_id(&id)?, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_offer<R: Repository>(
    State(services): State<Services<R>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    services.offers.delete_offer(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::parse_id;

    #[test]
    fn ids_must_be_positive_integers() {
        assert_eq!(parse_id("12").unwrap(), 12);
        assert!(parse_id("0").is_err());
        assert!(parse_id("-3").is_err());
        assert!(parse_id("abc").is_err());
    }
}
