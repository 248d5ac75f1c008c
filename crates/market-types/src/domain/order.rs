use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::wire::{self, nullable};

/// A job posted by a customer. `executor_id` stays empty until someone is
/// assigned, usually after an [`Offer`](super::offer::Offer) is picked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Order {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(with = "wire::date")]
    pub start_date: Option<NaiveDate>,
    #[serde(with = "wire::date")]
    pub end_date: Option<NaiveDate>,
    pub address: String,
    pub price: i64,
    pub customer_id: i64,
    pub executor_id: Option<i64>,
}

/// Body of `POST /orders`. Dates are `YYYY-MM-DD` strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewOrder {
    pub name: String,
    pub description: String,
    #[serde(
        default,
        deserialize_with = "wire::date::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "wire::date::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<NaiveDate>,
    pub address: String,
    pub price: i64,
    pub customer_id: i64,
    #[serde(default)]
    pub executor_id: Option<i64>,
}

/// Body of `PUT /orders/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "wire::date::deserialize_patch",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(
        default,
        deserialize_with = "wire::date::deserialize_patch",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i64>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub executor_id: Option<Option<i64>>,
}

impl Order {
    pub fn from_new(id: i64, new: NewOrder) -> Self {
        Self {
            id,
            name: new.name,
            description: new.description,
            start_date: new.start_date,
            end_date: new.end_date,
            address: new.address,
            price: new.price,
            customer_id: new.customer_id,
            executor_id: new.executor_id,
        }
    }

    pub fn apply(&mut self, patch: OrderPatch) {
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.description {
            self.description = v;
        }
        if let Some(v) = patch.start_date {
            self.start_date = v;
        }
        if let Some(v) = patch.end_date {
            self.end_date = v;
        }
        if let Some(v) = patch.address {
            self.address = v;
        }
        if let Some(v) = patch.price {
            self.price = v;
        }
        if let Some(v) = patch.customer_id {
            self.customer_id = v;
        }
        if let Some(v) = patch.executor_id {
            self.executor_id = v;
        }
    }
}
