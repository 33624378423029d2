use crate::model::{
    department::Department, employee::Employee, outsourcing_company::OutsourcingCompany,
    position::Position,
};
use sqlx::{
    Encode, FromRow, QueryBuilder, Sqlite, SqlitePool, Type,
    sqlite::SqliteRow,
};
use std::collections::{BTreeSet, HashMap};

/// ===============================
/// Typed partial UPDATE
/// ===============================
///
/// Only columns given a `Some` value are written; nullable columns take
/// `Some(None)` to be cleared. Executing with nothing to
/// write still reports whether the row exists.
pub struct PartialUpdate<'args> {
    table: &'static str,
    builder: QueryBuilder<'args, Sqlite>,
    assignments: usize,
}

impl<'args> PartialUpdate<'args> {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            builder: QueryBuilder::new(format!("UPDATE {} SET ", table)),
            assignments: 0,
        }
    }

    pub fn set<T>(&mut self, column: &str, value: Option<T>) -> &mut Self
    where
        T: 'args + Encode<'args, Sqlite> + Send + Type<Sqlite>,
    {
        if let Some(value) = value {
            self.separator();
            self.builder.push(column).push(" = ").push_bind(value);
        }
        self
    }

    /// Like [`set`](Self::set), but `Some(None)` writes NULL.
    pub fn set_nullable<T>(&mut self, column: &str, value: Option<Option<T>>) -> &mut Self
    where
        T: 'args + Encode<'args, Sqlite> + Send + Type<Sqlite>,
    {
        if let Some(value) = value {
            self.separator();
            self.builder.push(column).push(" = ").push_bind(value);
        }
        self
    }

    /// Stamps `column` with the current time alongside the other assignments.
    pub fn touch(&mut self, column: &str) -> &mut Self {
        self.separator();
        self.builder.push(column).push(" = CURRENT_TIMESTAMP");
        self
    }

    fn separator(&mut self) {
        if self.assignments > 0 {
            self.builder.push(", ");
        }
        self.assignments += 1;
    }

    /// Returns the number of rows matched by `id` (0 or 1).
    pub async fn execute(mut self, pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
        if self.assignments == 0 {
            let sql = format!("SELECT COUNT(*) FROM {} WHERE id = ?", self.table);
            let count = sqlx::query_scalar::<_, i64>(&sql)
                .bind(id)
                .fetch_one(pool)
                .await?;
            return Ok(count as u64);
        }

        self.builder.push(" WHERE id = ").push_bind(id);
        tracing::debug!(sql = %self.builder.sql(), "Executing partial update");

        let result = self.builder.build().execute(pool).await?;
        Ok(result.rows_affected())
    }
}

/// Rows addressable by their primary key.
pub trait Keyed {
    fn key(&self) -> i64;
}

macro_rules! keyed {
    ($($ty:ty),* $(,)?) => {
        $(impl Keyed for $ty {
            fn key(&self) -> i64 {
                self.id
            }
        })*
    };
}

keyed!(Department, Employee, OutsourcingCompany, Position);

/// ===============================
/// Explicit relation fetch
/// ===============================
///
/// Loads the rows of `select` whose `id` is in `ids`, keyed by id. Missing
/// ids are simply absent from the map.
pub async fn fetch_by_ids<T>(
    pool: &SqlitePool,
    select: &str,
    ids: impl IntoIterator<Item = i64>,
) -> Result<HashMap<i64, T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, SqliteRow> + Keyed + Send + Unpin,
{
    let ids: BTreeSet<i64> = ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut builder = QueryBuilder::<Sqlite>::new(select);
    builder.push(" WHERE id IN (");
    let mut separated = builder.separated(", ");
    for id in &ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");

    let rows = builder.build_query_as::<T>().fetch_all(pool).await?;
    Ok(rows.into_iter().map(|row| (row.key(), row)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    async fn insert_department(pool: &SqlitePool, name: &str) -> i64 {
        sqlx::query_scalar::<_, i64>("INSERT INTO departments (name) VALUES (?) RETURNING id")
            .bind(name)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[actix_web::test]
    async fn partial_update_writes_only_given_columns() {
        let pool = test_pool().await;
        let id = insert_department(&pool, "Finance").await;

        let mut update = PartialUpdate::new("departments");
        update
            .set("location", Some("Building A".to_string()))
            .set::<String>("description", None)
            .touch("updated_at");
        assert_eq!(update.execute(&pool, id).await.unwrap(), 1);

        let row: (String, Option<String>, Option<String>) =
            sqlx::query_as("SELECT name, description, location FROM departments WHERE id = ?")
                .bind(id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(row.0, "Finance");
        assert_eq!(row.1, None);
        assert_eq!(row.2.as_deref(), Some("Building A"));
    }

    #[actix_web::test]
    async fn partial_update_clears_nullable_columns() {
        let pool = test_pool().await;
        let id = insert_department(&pool, "Marketing").await;
        sqlx::query("UPDATE departments SET location = 'Building C', description = 'Sales' WHERE id = ?")
            .bind(id)
            .execute(&pool)
            .await
            .unwrap();

        let mut update = PartialUpdate::new("departments");
        update
            .set_nullable::<String>("location", Some(None))
            .set_nullable::<String>("description", None);
        assert_eq!(update.execute(&pool, id).await.unwrap(), 1);

        let row: (Option<String>, Option<String>) =
            sqlx::query_as("SELECT description, location FROM departments WHERE id = ?")
                .bind(id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(row.0.as_deref(), Some("Sales"));
        assert_eq!(row.1, None);
    }

    #[actix_web::test]
    async fn partial_update_reports_missing_row() {
        let pool = test_pool().await;

        let mut update = PartialUpdate::new("departments");
        update.set("name", Some("Ghost".to_string()));
        assert_eq!(update.execute(&pool, 999).await.unwrap(), 0);

        assert_eq!(PartialUpdate::new("departments").execute(&pool, 999).await.unwrap(), 0);
    }

    #[actix_web::test]
    async fn fetch_by_ids_skips_unknown_ids() {
        let pool = test_pool().await;
        let hr = insert_department(&pool, "Human Resources").await;
        let eng = insert_department(&pool, "Engineering").await;

        let found: HashMap<i64, Department> =
            fetch_by_ids(&pool, "SELECT * FROM departments", [hr, eng, 404, hr])
                .await
                .unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[&eng].name, "Engineering");

        let none: HashMap<i64, Department> =
            fetch_by_ids(&pool, "SELECT * FROM departments", Vec::new())
                .await
                .unwrap();
        assert!(none.is_empty());
    }
}
