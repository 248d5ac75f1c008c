use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use market_types::domain::offer::{NewOffer, Offer, OfferPatch};
use market_types::domain::order::{NewOrder, Order, OrderPatch};
use market_types::domain::user::{NewUser, User, UserPatch};
use market_types::ports::{OfferRepository, OrderRepository, RepoError, UserRepository};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Process-local store with the same constraint rules as the SQLite schema:
/// unique emails and foreign keys between the three tables.
#[derive(Clone, Default)]
pub struct InMemoryRepo {
    tables: Arc<Tables>,
}

#[derive(Default)]
struct Tables {
    users: DashMap<i64, User>,
    orders: DashMap<i64, Order>,
    offers: DashMap<i64, Offer>,
    // email -> user id
    emails: DashMap<String, i64>,
    last_user_id: AtomicI64,
    last_order_id: AtomicI64,
    last_offer_id: AtomicI64,
    // Held across every reference check and the write it guards, so a create
    // cannot land between a delete's check and its removal.
    writes: Mutex<()>,
}

fn next_id(counter: &AtomicI64) -> i64 {
    counter.fetch_add(1, Ordering::Relaxed) + 1
}

fn sorted<T: Clone>(map: &DashMap<i64, T>) -> Vec<T> {
    let mut rows: Vec<(i64, T)> = map.iter().map(|kv| (*kv.key(), kv.value().clone())).collect();
    rows.sort_by_key(|(id, _)| *id);
    rows.into_iter().map(|(_, v)| v).collect()
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn claim_email(&self, email: &str, id: i64) -> Result<(), RepoError> {
        match self.tables.emails.entry(email.to_string()) {
            Entry::Occupied(_) => Err(RepoError::Unique(format!("users.email {email}"))),
            Entry::Vacant(slot) => {
                slot.insert(id);
                Ok(())
            }
        }
    }

    fn require_user(&self, id: i64, column: &str) -> Result<(), RepoError> {
        if self.tables.users.contains_key(&id) {
            Ok(())
        } else {
            Err(RepoError::ForeignKey(format!("{column} -> users.id {id}")))
        }
    }

    fn check_order_refs(&self, order: &Order) -> Result<(), RepoError> {
        self.require_user(order.customer_id, "orders.customer_id")?;
        if let Some(executor) = order.executor_id {
            self.require_user(executor, "orders.executor_id")?;
        }
        Ok(())
    }

    fn check_offer_refs(&self, offer: &Offer) -> Result<(), RepoError> {
        if !self.tables.orders.contains_key(&offer.order_id) {
            return Err(RepoError::ForeignKey(format!(
                "offers.order_id -> orders.id {}",
                offer.order_id
            )));
        }
        self.require_user(offer.executor_id, "offers.executor_id")
    }
}

#[async_trait]
impl UserRepository for InMemoryRepo {
    async fn create_user(&self, new: NewUser) -> Result<User, RepoError> {
        let id = next_id(&self.tables.last_user_id);
        self.claim_email(&new.email, id)?;
        let user = User::from_new(id, new);
        self.tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, RepoError> {
        Ok(self.tables.users.get(&id).map(|r| r.clone()))
    }

    async fn list_users(&self) -> Result<Vec<User>, RepoError> {
        Ok(sorted(&self.tables.users))
    }

    async fn update_user(&self, id: i64, patch: UserPatch) -> Result<Option<User>, RepoError> {
        let Some(mut current) = self.tables.users.get_mut(&id) else {
            return Ok(None);
        };
        let mut next = current.clone();
        next.apply(patch);
        if next.email != current.email {
            self.claim_email(&next.email, id)?;
            self.tables.emails.remove(&current.email);
        }
        *current = next.clone();
        Ok(Some(next))
    }

    async fn delete_user(&self, id: i64) -> Result<bool, RepoError> {
        let _writes = self.tables.writes.lock().await;
        let referenced = self
            .tables
            .orders
            .iter()
            .any(|o| o.customer_id == id || o.executor_id == Some(id))
            || self.tables.offers.iter().any(|o| o.executor_id == id);
        if referenced {
            return Err(RepoError::ForeignKey(format!("users.id {id} is referenced")));
        }
        match self.tables.users.remove(&id) {
            Some((_, user)) => {
                self.tables.emails.remove(&user.email);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl OrderRepository for InMemoryRepo {
    async fn create_order(&self, new: NewOrder) -> Result<Order, RepoError> {
        let _writes = self.tables.writes.lock().await;
        let order = Order::from_new(next_id(&self.tables.last_order_id), new);
        self.check_order_refs(&order)?;
        self.tables.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn get_order(&self, id: i64) -> Result<Option<Order>, RepoError> {
        Ok(self.tables.orders.get(&id).map(|r| r.clone()))
    }

    async fn list_orders(&self) -> Result<Vec<Order>, RepoError> {
        Ok(sorted(&self.tables.orders))
    }

    async fn update_order(&self, id: i64, patch: OrderPatch) -> Result<Option<Order>, RepoError> {
        let _writes = self.tables.writes.lock().await;
        let Some(mut current) = self.tables.orders.get_mut(&id) else {
            return Ok(None);
        };
        let mut next = current.clone();
        next.apply(patch);
        self.check_order_refs(&next)?;
        *current = next.clone();
        Ok(Some(next))
    }

    async fn delete_order(&self, id: i64) -> Result<bool, RepoError> {
        let _writes = self.tables.writes.lock().await;
        if self.tables.offers.iter().any(|o| o.order_id == id) {
            return Err(RepoError::ForeignKey(format!("orders.id {id} is referenced")));
        }
        Ok(self.tables.orders.remove(&id).is_some())
    }
}

#[async_trait]
impl OfferRepository for InMemoryRepo {
    async fn create_offer(&self, new: NewOffer) -> Result<Offer, RepoError> {
        let _writes = self.tables.writes.lock().await;
        let offer = Offer::from_new(next_id(&self.tables.last_offer_id), new);
        self.check_offer_refs(&offer)?;
        self.tables.offers.insert(offer.id, offer.clone());
        Ok(offer)
    }

    async fn get_offer(&self, id: i64) -> Result<Option<Offer>, RepoError> {
        Ok(self.tables.offers.get(&id).map(|r| r.clone()))
    }

    async fn list_offers(&self) -> Result<Vec<Offer>, RepoError> {
        Ok(sorted(&self.tables.offers))
    }

    async fn update_offer(&self, id: i64, patch: OfferPatch) -> Result<Option<Offer>, RepoError> {
        let _writes = self.tables.writes.lock().await;
        let Some(mut current) = self.tables.offers.get_mut(&id) else {
            return Ok(None);
        };
        let mut next = current.clone();
        next.apply(patch);
        self.check_offer_refs(&next)?;
        *current = next.clone();
        Ok(Some(next))
    }

    async fn delete_offer(&self, id: i64) -> Result<bool, RepoError> {
        Ok(self.tables.offers.remove(&id).is_some())
    }
}
