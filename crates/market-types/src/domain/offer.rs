use serde::{Deserialize, Serialize};

/// A user's bid to execute an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Offer {
    pub id: i64,
    pub order_id: i64,
    pub executor_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewOffer {
    pub order_id: i64,
    pub executor_id: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OfferPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor_id: Option<i64>,
}

impl Offer {
    pub fn from_new(id: i64, new: NewOffer) -> Self {
        Self {
            id,
            order_id: new.order_id,
            executor_id: new.executor_id,
        }
    }

    pub fn apply(&mut self, patch: OfferPatch) {
        if let Some(v) = patch.order_id {
            self.order_id = v;
        }
        if let Some(v) = patch.executor_id {
            self.executor_id = v;
        }
    }
}
