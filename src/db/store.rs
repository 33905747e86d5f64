use std::path::{Path, PathBuf};

use async_trait::async_trait;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection};
use thiserror::Error;
use tracing::{debug, info};

use super::record::{Advocate, NewAdvocate};
use super::schema;
use crate::config::DatabaseConfig;
use crate::search::{OrderDirective, SearchPredicate};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database not configured")]
    NotConfigured,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("invalid specialties for advocate {id}: {source}")]
    Decode {
        id: i64,
        #[source]
        source: serde_json::Error,
    },
    #[error("store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Read access to directory records.
#[async_trait]
pub trait AdvocateStore: Send + Sync {
    /// Select every record matching `predicate` (or all records when `None`),
    /// ordered by `order`.
    async fn select(
        &self,
        predicate: Option<&SearchPredicate>,
        order: &OrderDirective,
    ) -> Result<Vec<Advocate>, StoreError>;
}

const SELECT_ADVOCATES: &str = "SELECT advocates.id, advocates.first_name, advocates.last_name, \
     advocates.city, advocates.degree, advocates.specialties, \
     advocates.years_of_experience, advocates.phone_number, advocates.created_at \
     FROM advocates";

// ---------------------------------------------------------------------------
// SqliteAdvocateStore
// ---------------------------------------------------------------------------

/// Pooled SQLite store backed by the `advocates` table and its FTS5 index.
///
/// Cloning is cheap; clones share the pool.
#[derive(Clone)]
pub struct SqliteAdvocateStore {
    pool: Pool<SqliteConnectionManager>,
    path: PathBuf,
}

impl SqliteAdvocateStore {
    /// Open (or create) the database at `path` and apply migrations.
    pub fn open(path: &Path, pool_size: u32) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let manager = SqliteConnectionManager::file(path)
            .with_init(|c| c.execute_batch("PRAGMA busy_timeout = 5000;"));
        let pool = Pool::builder().max_size(pool_size.max(1)).build(manager)?;

        {
            let conn = pool.get()?;
            schema::run_migrations(&conn)?;
        }

        info!(db = %path.display(), pool_size, "advocate store ready");

        Ok(Self {
            pool,
            path: path.to_path_buf(),
        })
    }

    /// Open the store described by `config`, or `None` when no database
    /// path is configured.
    pub fn from_config(config: &DatabaseConfig) -> Result<Option<Self>, StoreError> {
        match config.path.as_deref() {
            Some(path) => Self::open(path, config.pool_size).map(Some),
            None => Ok(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert `advocates` in a single transaction, returning the new ids.
    pub async fn insert_advocates(&self, advocates: &[NewAdvocate]) -> Result<Vec<i64>, StoreError> {
        let pool = self.pool.clone();
        let advocates = advocates.to_vec();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            insert_all(&mut conn, &advocates)
        })
        .await?
    }

    /// Insert `advocates` only when the table is empty. The emptiness check
    /// and the inserts share one transaction. Returns the new ids, if any.
    pub async fn seed_if_empty(&self, advocates: &[NewAdvocate]) -> Result<Vec<i64>, StoreError> {
        let pool = self.pool.clone();
        let advocates = advocates.to_vec();
        tokio::task::spawn_blocking(move || -> Result<Vec<i64>, StoreError> {
            let mut conn = pool.get()?;
            let tx = conn.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
            let existing: i64 = tx.query_row("SELECT count(*) FROM advocates", [], |row| row.get(0))?;
            if existing > 0 {
                debug!(existing, "store not empty, skipping seed");
                return Ok(Vec::new());
            }
            let ids = insert_rows(&tx, &advocates)?;
            tx.commit()?;
            Ok(ids)
        })
        .await?
    }

    /// Number of records in the store.
    pub async fn count(&self) -> Result<u64, StoreError> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<u64, StoreError> {
            let conn = pool.get()?;
            let n: i64 = conn.query_row("SELECT count(*) FROM advocates", [], |row| row.get(0))?;
            Ok(n.max(0) as u64)
        })
        .await?
    }
}

#[async_trait]
impl AdvocateStore for SqliteAdvocateStore {
    async fn select(
        &self,
        predicate: Option<&SearchPredicate>,
        order: &OrderDirective,
    ) -> Result<Vec<Advocate>, StoreError> {
        let pool = self.pool.clone();
        let predicate = predicate.cloned();
        let order = *order;
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            query_advocates(&conn, predicate.as_ref(), &order)
        })
        .await?
    }
}

// ---------------------------------------------------------------------------
// Query helpers
// ---------------------------------------------------------------------------

struct AdvocateRow {
    advocate: Advocate,
    specialties: String,
}

fn query_advocates(
    conn: &Connection,
    predicate: Option<&SearchPredicate>,
    order: &OrderDirective,
) -> Result<Vec<Advocate>, StoreError> {
    let mut sql = String::from(SELECT_ADVOCATES);
    if let Some(predicate) = predicate {
        sql.push_str(" WHERE ");
        sql.push_str(predicate.where_clause());
    }
    sql.push_str(" ORDER BY ");
    sql.push_str(&order.order_by_clause());

    debug!(%sql, term = predicate.map(|p| p.term()), "selecting advocates");

    let mut stmt = conn.prepare(&sql)?;
    let bound = predicate.and_then(|p| p.match_expression());
    let rows = stmt
        .query_map(rusqlite::params_from_iter(bound), |row| {
            Ok(AdvocateRow {
                advocate: Advocate {
                    id: row.get(0)?,
                    first_name: row.get(1)?,
                    last_name: row.get(2)?,
                    city: row.get(3)?,
                    degree: row.get(4)?,
                    specialties: Vec::new(),
                    years_of_experience: row.get(6)?,
                    phone_number: row.get(7)?,
                    created_at: row.get(8)?,
                },
                specialties: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|AdvocateRow { mut advocate, specialties }| {
            advocate.specialties =
                serde_json::from_str(&specialties).map_err(|source| StoreError::Decode {
                    id: advocate.id,
                    source,
                })?;
            Ok(advocate)
        })
        .collect()
}

fn insert_all(conn: &mut Connection, advocates: &[NewAdvocate]) -> Result<Vec<i64>, StoreError> {
    let tx = conn.transaction()?;
    let ids = insert_rows(&tx, advocates)?;
    tx.commit()?;
    debug!(inserted = ids.len(), "advocates inserted");
    Ok(ids)
}

fn insert_rows(conn: &Connection, advocates: &[NewAdvocate]) -> Result<Vec<i64>, StoreError> {
    let mut ids = Vec::with_capacity(advocates.len());
    let mut stmt = conn.prepare(
        "INSERT INTO advocates (first_name, last_name, city, degree, specialties,
                                years_of_experience, phone_number)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    for advocate in advocates {
        let specialties = serde_json::to_string(&advocate.specialties)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        stmt.execute(params![
            advocate.first_name,
            advocate.last_name,
            advocate.city,
            advocate.degree,
            specialties,
            advocate.years_of_experience,
            advocate.phone_number,
        ])?;
        ids.push(conn.last_insert_rowid());
    }
    Ok(ids)
}
