use anyhow::{Result, anyhow};
use autoscale_cuckoo_filter::CuckooFilter;
use futures_util::StreamExt;
use moka::future::Cache;
use sqlx::SqlitePool;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

/// Expected capacity and false-positive rate.
/// Tune these based on real user counts.
const FILTER_CAPACITY: usize = 100_000;
const FALSE_POSITIVE_RATE: f64 = 0.001;

/// Username availability without a database round trip in the common cases.
///
/// The cuckoo filter answers "definitely free"; the moka cache answers
/// "definitely taken" for recently active accounts. Everything else falls
/// through to the `users` table.
pub struct UsernameIndex {
    filter: RwLock<CuckooFilter<String>>,
    taken: Cache<String, ()>,
}

#[inline]
fn normalize(username: &str) -> String {
    username.trim().to_lowercase()
}

impl Default for UsernameIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl UsernameIndex {
    pub fn new() -> Self {
        Self {
            filter: RwLock::new(CuckooFilter::new(FILTER_CAPACITY, FALSE_POSITIVE_RATE)),
            taken: Cache::builder()
                .max_capacity(500_000)
                .time_to_live(Duration::from_secs(86400)) // 24h TTL
                .build(),
        }
    }

    /// Check if a username might exist (false positives possible)
    fn might_exist(&self, username: &str) -> bool {
        self.filter
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&username.to_string())
    }

    fn insert_batch(&self, usernames: &[String]) {
        let mut filter = self.filter.write().unwrap_or_else(PoisonError::into_inner);
        for username in usernames {
            filter.add(username);
        }
    }

    /// Records a freshly registered username in both layers.
    pub async fn mark_taken(&self, username: &str) {
        let username = normalize(username);
        self.insert_batch(std::slice::from_ref(&username));
        self.taken.insert(username, ()).await;
    }

    /// true  => username AVAILABLE
    /// false => username TAKEN
    pub async fn is_available(&self, pool: &SqlitePool, username: &str) -> Result<bool, sqlx::Error> {
        let username = normalize(username);

        // 1️⃣ Cuckoo filter: fast negative
        if !self.might_exist(&username) {
            return Ok(true);
        }

        // 2️⃣ Moka cache: fast positive
        if self.taken.contains_key(&username) {
            return Ok(false);
        }

        // 3️⃣ Database fallback
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE lower(username) = ? LIMIT 1)",
        )
        .bind(&username)
        .fetch_one(pool)
        .await?;

        Ok(!exists)
    }

    /// Streams every username into the filter and the recently active ones
    /// (logged in within `recent_days`) into the cache.
    pub async fn warmup(&self, pool: &SqlitePool, recent_days: u32, batch_size: usize) -> Result<()> {
        let mut stream = sqlx::query_as::<_, (String, bool)>(
            r#"
            SELECT username,
                   COALESCE(last_login_at >= datetime('now', ?), 0) AS recent
            FROM users
            "#,
        )
        .bind(format!("-{} days", recent_days))
        .fetch(pool);

        let mut batch = Vec::with_capacity(batch_size);
        let mut recent = Vec::new();
        let mut total = 0usize;

        while let Some(row) = stream.next().await {
            let (username, is_recent) = row.map_err(|e| anyhow!("DB row fetch failed: {}", e))?;
            let username = normalize(&username);
            if is_recent {
                recent.push(username.clone());
            }
            batch.push(username);
            total += 1;

            if batch.len() == batch_size {
                self.insert_batch(&batch);
                batch.clear();
            }
        }

        if !batch.is_empty() {
            self.insert_batch(&batch);
        }

        let inserts: Vec<_> = recent
            .iter()
            .map(|u| self.taken.insert(u.clone(), ()))
            .collect();
        futures::future::join_all(inserts).await;

        tracing::info!(
            users = total,
            recent = recent.len(),
            recent_days,
            "Username index warmup complete"
        );
        Ok(())
    }
}
