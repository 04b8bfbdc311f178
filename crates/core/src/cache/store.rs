//! The cache store capability and its SQLite implementation.
//!
//! The worker only sees [`CacheStorage`]; structural changes (creating and
//! deleting whole versions) belong to the lifecycle controller, content
//! changes (inserting entries) to the router.

use async_trait::async_trait;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

use super::connection::CacheDb;
use super::snapshot::Snapshot;
use crate::Error;

/// Versioned key-value store: named stores mapping request identity to a
/// response snapshot.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Create the named store if it does not already exist.
    async fn open_store(&self, name: &str) -> Result<(), Error>;

    /// Insert a snapshot under its identity, replacing any prior entry for
    /// the same identity (last write wins).
    async fn insert(&self, store: &str, snapshot: &Snapshot) -> Result<(), Error>;

    /// Exact-identity lookup. Returns `None` on a miss.
    async fn lookup(&self, store: &str, identity: &str) -> Result<Option<Snapshot>, Error>;

    /// Lookup that treats a miss as an error, for callers with no
    /// fallback of their own.
    async fn require(&self, store: &str, identity: &str) -> Result<Snapshot, Error> {
        self.lookup(store, identity)
            .await?
            .ok_or_else(|| Error::CacheMiss(identity.to_string()))
    }

    /// Remove a single entry. Returns whether an entry was removed.
    async fn remove(&self, store: &str, identity: &str) -> Result<bool, Error>;

    /// All store names known to this backend.
    async fn store_names(&self) -> Result<Vec<String>, Error>;

    /// Delete a whole store and its entries. Returns whether it existed.
    async fn delete_store(&self, name: &str) -> Result<bool, Error>;
}

#[async_trait]
impl CacheStorage for CacheDb {
    async fn open_store(&self, name: &str) -> Result<(), Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO stores (name, created_at) VALUES (?1, ?2)
                     ON CONFLICT(name) DO NOTHING",
                    params![name, chrono::Utc::now().to_rfc3339()],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn insert(&self, store: &str, snapshot: &Snapshot) -> Result<(), Error> {
        let store = store.to_string();
        let snapshot = snapshot.clone();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO entries (
                        store, identity, method, url, status,
                        content_type, headers_json, body, stored_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                    ON CONFLICT(store, identity) DO UPDATE SET
                        method = excluded.method,
                        url = excluded.url,
                        status = excluded.status,
                        content_type = excluded.content_type,
                        headers_json = excluded.headers_json,
                        body = excluded.body,
                        stored_at = excluded.stored_at",
                    params![
                        &store,
                        &snapshot.identity,
                        &snapshot.method,
                        &snapshot.url,
                        snapshot.status as i64,
                        &snapshot.content_type,
                        &snapshot.headers_json,
                        &snapshot.body,
                        &snapshot.stored_at,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn lookup(&self, store: &str, identity: &str) -> Result<Option<Snapshot>, Error> {
        let store = store.to_string();
        let identity = identity.to_string();
        self.conn
            .call(move |conn| -> Result<Option<Snapshot>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT identity, method, url, status,
                            content_type, headers_json, body, stored_at
                     FROM entries WHERE store = ?1 AND identity = ?2",
                )?;

                let result = stmt.query_row(params![store, identity], |row| {
                    Ok(Snapshot {
                        identity: row.get(0)?,
                        method: row.get(1)?,
                        url: row.get(2)?,
                        status: row.get::<_, i64>(3)? as u16,
                        content_type: row.get(4)?,
                        headers_json: row.get(5)?,
                        body: row.get(6)?,
                        stored_at: row.get(7)?,
                    })
                });

                match result {
                    Ok(s) => Ok(Some(s)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    async fn remove(&self, store: &str, identity: &str) -> Result<bool, Error> {
        let store = store.to_string();
        let identity = identity.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count = conn.execute(
                    "DELETE FROM entries WHERE store = ?1 AND identity = ?2",
                    params![store, identity],
                )?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }

    async fn store_names(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT name FROM stores ORDER BY name")?;
                let names = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }

    async fn delete_store(&self, name: &str) -> Result<bool, Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                // Entries go with the store via ON DELETE CASCADE.
                let count = conn.execute("DELETE FROM stores WHERE name = ?1", params![name])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }
}

impl CacheDb {
    /// Number of entries in the named store.
    pub async fn count_entries(&self, store: &str) -> Result<u64, Error> {
        let store = store.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM entries WHERE store = ?1",
                    params![store],
                    |row| row.get(0),
                )?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
