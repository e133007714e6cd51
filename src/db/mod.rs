mod projects;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePool, SqlitePoolOptions};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

/// Any failure coming out of the storage layer: connecting, running a
/// statement, or mapping a row.
#[derive(Debug, Error)]
#[error("database error: {0}")]
pub struct DbError(#[from] sqlx::Error);

/// Database connection pool
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the database named by the configuration and make sure the
    /// schema exists.
    pub async fn new(config: &Config) -> Result<Self, DbError> {
        let options = SqliteConnectOptions::from_str(config.database_url())?
            .create_if_missing(true)
            .foreign_keys(true);

        // One user, one command at a time.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        sqlx::raw_sql(include_str!("schema.sql"))
            .execute(&pool)
            .await?;

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Wait for the pooled connection to be released and close it.
    pub async fn close(&self) {
        self.get_pool().close().await;
    }

    /// Run `work` inside a transaction on a pooled connection.
    ///
    /// Commits when `work` succeeds. On failure the transaction is rolled
    /// back and the error comes back as a [`DbError`]. The connection goes
    /// back to the pool either way.
    pub(crate) async fn in_transaction<T, F>(&self, operation: &str, work: F) -> Result<T, DbError>
    where
        F: AsyncFnOnce(&mut SqliteConnection) -> Result<T, sqlx::Error>,
    {
        let mut tx = self.pool.begin().await?;

        match work(&mut *tx).await {
            Ok(value) => {
                tx.commit().await?;
                debug!(operation, "transaction committed");
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(operation, error = %rollback_err, "rollback failed");
                } else {
                    debug!(operation, error = %err, "transaction rolled back");
                }
                Err(DbError::from(err))
            }
        }
    }
}

/// Initialize the database connection pool
pub async fn init(config: &Config) -> Result<Database, DbError> {
    Database::new(config).await
}


#[cfg(test)]
mod tests {
    use super::test_support::temp_database;
    use super::*;

    async fn project_count(db: &Database) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM project")
            .fetch_one(db.get_pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_schema_is_created() {
        let (_dir, db) = temp_database().await;
        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(db.get_pool())
        .await
        .unwrap();

        assert_eq!(
            tables,
            vec!["category", "material", "project", "project_category", "step"]
        );
    }

    #[tokio::test]
    async fn test_reopening_keeps_existing_schema() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            database_url: format!("sqlite://{}", dir.path().join("projects.db").display()),
        };

        let db = Database::new(&config).await.unwrap();
        sqlx::query(
            "INSERT INTO project (project_name, estimated_hours, actual_hours, difficulty) VALUES ('Kept', '1.00', '1.00', 1)",
        )
        .execute(db.get_pool())
        .await
        .unwrap();
        db.get_pool().close().await;

        let db = Database::new(&config).await.unwrap();
        assert_eq!(project_count(&db).await, 1);
    }

    #[tokio::test]
    async fn test_transaction_commits_on_success() {
        let (_dir, db) = temp_database().await;

        let inserted = db
            .in_transaction("test", async |conn: &mut SqliteConnection| {
                sqlx::query(
                    "INSERT INTO project (project_name, estimated_hours, actual_hours, difficulty) VALUES ('A', '1.00', '2.00', 1)",
                )
                .execute(&mut *conn)
                .await
                .map(|result| result.rows_affected())
            })
            .await
            .unwrap();

        assert_eq!(inserted, 1);
        assert_eq!(project_count(&db).await, 1);
    }

    #[tokio::test]
    async fn test_transaction_rolls_back_on_failure() {
        let (_dir, db) = temp_database().await;

        let result: Result<(), DbError> = db
            .in_transaction("test", async |conn: &mut SqliteConnection| {
                sqlx::query(
                    "INSERT INTO project (project_name, estimated_hours, actual_hours, difficulty) VALUES ('A', '1.00', '2.00', 1)",
                )
                .execute(&mut *conn)
                .await?;

                sqlx::query("INSERT INTO no_such_table DEFAULT VALUES")
                    .execute(&mut *conn)
                    .await?;

                Ok(())
            })
            .await;

        assert!(result.is_err());
        assert_eq!(project_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_unreachable_database_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing").join("projects.db");
        let config = Config {
            database_url: format!("sqlite://{}", missing.display()),
        };
        assert!(Database::new(&config).await.is_err());
    }
}
