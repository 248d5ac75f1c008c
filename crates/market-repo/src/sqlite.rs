use async_trait::async_trait;
use chrono::NaiveDate;
use market_types::domain::offer::{NewOffer, Offer, OfferPatch};
use market_types::domain::order::{NewOrder, Order, OrderPatch};
use market_types::domain::user::{NewUser, User, UserPatch};
use market_types::ports::{OfferRepository, OrderRepository, RepoError, UserRepository};
use sqlx::error::ErrorKind;
use sqlx::migrate::Migrator;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{FromRow, Sqlite, SqlitePool, Transaction};
use std::str::FromStr;
use std::time::Duration;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Clone)]
pub struct SqliteRepo {
    pool: SqlitePool,
}

#[derive(FromRow)]
struct DbUser {
    id: i64,
    first_name: String,
    last_name: String,
    age: Option<i64>,
    email: String,
    role: String,
    phone: Option<String>,
}

impl DbUser {
    fn into_user(self) -> User {
        User {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            age: self.age,
            email: self.email,
            role: self.role,
            phone: self.phone,
        }
    }
}

#[derive(FromRow)]
struct DbOrder {
    id: i64,
    name: String,
    description: String,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    address: String,
    price: i64,
    customer_id: i64,
    executor_id: Option<i64>,
}

impl DbOrder {
    fn into_order(self) -> Order {
        Order {
            id: self.id,
            name: self.name,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            address: self.address,
            price: self.price,
            customer_id: self.customer_id,
            executor_id: self.executor_id,
        }
    }
}

#[derive(FromRow)]
struct DbOffer {
    id: i64,
    order_id: i64,
    executor_id: i64,
}

impl DbOffer {
    fn into_offer(self) -> Offer {
        Offer {
            id: self.id,
            order_id: self.order_id,
            executor_id: self.executor_id,
        }
    }
}

/// Sorts constraint failures into their own variants so callers can tell a
/// duplicate email or a dangling reference from an outage.
fn db_err(err: sqlx::Error) -> RepoError {
    if let sqlx::Error::Database(db) = &err {
        match db.kind() {
            ErrorKind::UniqueViolation => return RepoError::Unique(db.message().to_string()),
            ErrorKind::ForeignKeyViolation => {
                return RepoError::ForeignKey(db.message().to_string())
            }
            _ => {}
        }
    }
    RepoError::DbError(err.to_string())
}

/// Opens a write transaction on row `id` of `table` by touching `column`.
/// Writing first takes SQLite's write lock before anything is read, so a
/// concurrent writer makes this wait on the busy timeout instead of failing
/// a read-to-write lock upgrade. `None` when the row does not exist.
async fn begin_row_write(
    pool: &SqlitePool,
    table: &str,
    column: &str,
    id: i64,
) -> Result<Option<Transaction<'static, Sqlite>>, RepoError> {
    let sql = format!("UPDATE {table} SET {column} = {column} WHERE id = ?");
    let mut tx = pool.begin().await.map_err(db_err)?;
    let touched = sqlx::query(&sql)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;
    if touched.rows_affected() == 0 {
        return Ok(None);
    }
    Ok(Some(tx))
}

impl SqliteRepo {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePool::connect_with(options).await?;
        MIGRATOR.run(&pool).await?;
        tracing::info!(database_url, "sqlite store ready");

        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl UserRepository for SqliteRepo {
    async fn create_user(&self, new: NewUser) -> Result<User, RepoError> {
        let res = sqlx::query(
            "INSERT INTO users (first_name, last_name, age, email, role, phone)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(new.age)
        .bind(&new.email)
        .bind(&new.role)
        .bind(&new.phone)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(User::from_new(res.last_insert_rowid(), new))
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, RepoError> {
        let row: Option<DbUser> = sqlx::query_as(
            "SELECT id, first_name, last_name, age, email, role, phone FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(row.map(DbUser::into_user))
    }

    async fn list_users(&self) -> Result<Vec<User>, RepoError> {
        let rows: Vec<DbUser> = sqlx::query_as(
            "SELECT id, first_name, last_name, age, email, role, phone FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(rows.into_iter().map(DbUser::into_user).collect())
    }

    async fn update_user(&self, id: i64, patch: UserPatch) -> Result<Option<User>, RepoError> {
        let Some(mut tx) = begin_row_write(&self.pool, "users", "role", id).await? else {
            return Ok(None);
        };
        let row: Option<DbUser> = sqlx::query_as(
            "SELECT id, first_name, last_name, age, email, role, phone FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?;
        let Some(row) = row else {
            return Ok(None);
        };

        let mut user = row.into_user();
        user.apply(patch);
        sqlx::query(
            "UPDATE users SET first_name = ?, last_name = ?, age = ?, email = ?, role = ?, phone = ?
             WHERE id = ?",
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.age)
        .bind(&user.email)
        .bind(&user.role)
        .bind(&user.phone)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;
        tx.commit().await.map_err(db_err)?;
        Ok(Some(user))
    }

    async fn delete_user(&self, id: i64) -> Result<bool, RepoError> {
        let res = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(res.rows_affected() > 0)
    }
}

#[async_trait]
impl OrderRepository for SqliteRepo {
    async fn create_order(&self, new: NewOrder) -> Result<Order, RepoError> {
        let res = sqlx::query(
            "INSERT INTO orders (name, description, start_date, end_date, address, price, customer_id, executor_id)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(&new.address)
        .bind(new.price)
        .bind(new.customer_id)
        .bind(new.executor_id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(Order::from_new(res.last_insert_rowid(), new))
    }

    async fn get_order(&self, id: i64) -> Result<Option<Order>, RepoError> {
        let row: Option<DbOrder> = sqlx::query_as(
            "SELECT id, name, description, start_date, end_date, address, price, customer_id, executor_id
             FROM orders WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(row.map(DbOrder::into_order))
    }

    async fn list_orders(&self) -> Result<Vec<Order>, RepoError> {
        let rows: Vec<DbOrder> = sqlx::query_as(
            "SELECT id, name, description, start_date, end_date, address, price, customer_id, executor_id
             FROM orders ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(rows.into_iter().map(DbOrder::into_order).collect())
    }

    async fn update_order(&self, id: i64, patch: OrderPatch) -> Result<Option<Order>, RepoError> {
        let Some(mut tx) = begin_row_write(&self.pool, "orders", "name", id).await? else {
            return Ok(None);
        };
        let row: Option<DbOrder> = sqlx::query_as(
            "SELECT id, name, description, start_date, end_date, address, price, customer_id, executor_id
             FROM orders WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?;
        let Some(row) = row else {
            return Ok(None);
        };

        let mut order = row.into_order();
        order.apply(patch);
        sqlx::query(
            "UPDATE orders SET name = ?, description = ?, start_date = ?, end_date = ?, address = ?,
                 price = ?, customer_id = ?, executor_id = ?
             WHERE id = ?",
        )
        .bind(&order.name)
        .bind(&order.description)
        .bind(order.start_date)
        .bind(order.end_date)
        .bind(&order.address)
        .bind(order.price)
        .bind(order.customer_id)
        .bind(order.executor_id)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;
        tx.commit().await.map_err(db_err)?;
        Ok(Some(order))
    }

    async fn delete_order(&self, id: i64) -> Result<bool, RepoError> {
        let res = sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(res.rows_affected() > 0)
    }
}

#[async_trait]
impl OfferRepository for SqliteRepo {
    async fn create_offer(&self, new: NewOffer) -> Result<Offer, RepoError> {
        let res = sqlx::query("INSERT INTO offers (order_id, executor_id) VALUES (?, ?)")
            .bind(new.order_id)
            .bind(new.executor_id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(Offer::from_new(res.last_insert_rowid(), new))
    }

    async fn get_offer(&self, id: i64) -> Result<Option<Offer>, RepoError> {
        let row: Option<DbOffer> =
            sqlx::query_as("SELECT id, order_id, executor_id FROM offers WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;
        Ok(row.map(DbOffer::into_offer))
    }

    async fn list_offers(&self) -> Result<Vec<Offer>, RepoError> {
        let rows: Vec<DbOffer> =
            sqlx::query_as("SELECT id, order_id, executor_id FROM offers ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(db_err)?;
        Ok(rows.into_iter().map(DbOffer::into_offer).collect())
    }

    async fn update_offer(&self, id: i64, patch: OfferPatch) -> Result<Option<Offer>, RepoError> {
        let Some(mut tx) = begin_row_write(&self.pool, "offers", "order_id", id).await? else {
            return Ok(None);
        };
        let row: Option<DbOffer> =
            sqlx::query_as("SELECT id, order_id, executor_id FROM offers WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_err)?;
        let Some(row) = row else {
            return Ok(None);
        };

        let mut offer = row.into_offer();
        offer.apply(patch);
        sqlx::query("UPDATE offers SET order_id = ?, executor_id = ? WHERE id = ?")
            .bind(offer.order_id)
            .bind(offer.executor_id)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        tx.commit().await.map_err(db_err)?;
        Ok(Some(offer))
    }

    async fn delete_offer(&self, id: i64) -> Result<bool, RepoError> {
        let res = sqlx::query("DELETE FROM offers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(res.rows_affected() > 0)
    }
}
