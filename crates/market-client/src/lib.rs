use std::time::Duration;

use anyhow::Context;
use market_types::domain::offer::{NewOffer, Offer, OfferPatch};
use market_types::domain::order::{NewOrder, Order, OrderPatch};
use market_types::domain::user::{NewUser, User, UserPatch};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Clone)]
pub struct MarketClientBuilder {
    base: Url,
    headers: HeaderMap,
    timeout: Option<Duration>,
    client: Option<reqwest::Client>,
}

/// Typed client for the marketplace HTTP API. Error statuses come back as
/// `reqwest::Error` inside the `anyhow::Error`, so callers can downcast and
/// inspect `status()`.
#[derive(Clone)]
pub struct MarketClient {
    base: Url,
    client: reqwest::Client,
}

impl MarketClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::builder(base_url)?.build()
    }

    pub fn builder(base_url: &str) -> anyhow::Result<MarketClientBuilder> {
        let base = Url::parse(base_url).context("invalid base url")?;
        Ok(MarketClientBuilder {
            base,
            headers: HeaderMap::new(),
            timeout: None,
            client: None,
        })
    }

    fn url(&self, path: &str) -> anyhow::Result<Url> {
        self.base.join(path).context("failed to join url")
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let url = self.url(path)?;
        tracing::debug!(%url, "GET");
        let res = self.client.get(url).send().await?.error_for_status()?;
        Ok(res.json().await?)
    }

    async fn send_json<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> anyhow::Result<()> {
        let url = self.url(path)?;
        tracing::debug!(%url, %method, "sending");
        self.client
            .request(method, url)
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> anyhow::Result<()> {
        let url = self.url(path)?;
        tracing::debug!(%url, "DELETE");
        self.client.delete(url).send().await?.error_for_status()?;
        Ok(())
    }

    pub async fn list_users(&self) -> anyhow::Result<Vec<User>> {
        self.get_json("users").await
    }

    pub async fn get_user(&self, id: i64) -> anyhow::Result<User> {
        self.get_json(&format!("users/{id}")).await
    }

    /// The server does not return the new id; list to find it.
    pub async fn create_user(&self, new: &NewUser) -> anyhow::Result<()> {
        self.send_json(Method::POST, "users", new).await
    }

    pub async fn update_user(&self, id: i64, patch: &UserPatch) -> anyhow::Result<()> {
        self.send_json(Method::PUT, &format!("users/{id}"), patch).await
    }

    pub async fn delete_user(&self, id: i64) -> anyhow::Result<()> {
        self.delete(&format!("users/{id}")).await
    }

    pub async fn list_orders(&self) -> anyhow::Result<Vec<Order>> {
        self.get_json("orders").await
    }

    pub async fn get_order(&self, id: i64) -> anyhow::Result<Order> {
        self.get_json(&format!("orders/{id}")).await
    }

    pub async fn create_order(&self, new: &NewOrder) -> anyhow::Result<()> {
        self.send_json(Method::POST, "orders", new).await
    }

    pub async fn update_order(&self, id: i64, patch: &OrderPatch) -> anyhow::Result<()> {
        self.send_json(Method::PUT, &format!("orders/{id}"), patch).await
    }

    pub async fn delete_order(&self, id: i64) -> anyhow::Result<()> {
        self.delete(&format!("orders/{id}")).await
    }

    pub async fn list_offers(&self) -> anyhow::Result<Vec<Offer>> {
        self.get_json("offers").await
    }

    pub async fn get_offer(&self, id: i64) -> anyhow::Result<Offer> {
        self.get_json(&format!("offers/{id}")).await
    }

    pub async fn create_offer(&self, new: &NewOffer) -> anyhow::Result<()> {
        self.send_json(Method::POST, "offers", new).await
    }

    pub async fn update_offer(&self, id: i64, patch: &OfferPatch) -> anyhow::Result<()> {
        self.send_json(Method::PUT, &format!("offers/{id}"), patch).await
    }

    pub async fn delete_offer(&self, id: i64) -> anyhow::Result<()> {
        self.delete(&format!("offers/{id}")).await
    }
}

impl MarketClientBuilder {
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

    pub fn build(self) -> anyhow::Result<MarketClient> {
        if let Some(client) = self.client {
            return Ok(MarketClient {
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
        Ok(MarketClient {
            base: self.base,
            client,
        })
    }
}
