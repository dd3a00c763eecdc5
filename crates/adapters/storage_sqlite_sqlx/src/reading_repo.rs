//! `SQLite` implementation of [`ReadingSink`] and [`ReadingRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use hygrolog_app::ports::{ReadingRepository, ReadingSink};
use hygrolog_domain::error::HygroError;
use hygrolog_domain::query::{HistoryQuery, SortOrder};
use hygrolog_domain::reading::SensorReading;
use hygrolog_domain::time;

use crate::error::StorageError;

/// Wrapper for converting database rows into domain types without polluting
/// domain structs with database concerns.
struct Wrapper(SensorReading);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let timestamp: String = row.try_get("timestamp")?;
        let temperature: f64 = row.try_get("temperature")?;
        let humidity: i32 = row.try_get("humidity")?;

        let observed_at =
            time::parse(&timestamp).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(SensorReading::new(temperature, humidity, observed_at)))
    }
}

const CREATE_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS sensor_readings (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        timestamp TEXT NOT NULL,
        temperature REAL NOT NULL,
        humidity INTEGER NOT NULL
    )
";

const CREATE_TIMESTAMP_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS idx_sensor_readings_timestamp
    ON sensor_readings (timestamp)
";

const INSERT: &str = r"
    INSERT INTO sensor_readings (timestamp, temperature, humidity)
    VALUES (?, ?, ?)
";

const SELECT_ASC: &str = r"
    SELECT timestamp, temperature, humidity FROM sensor_readings
    ORDER BY timestamp ASC, id ASC
";

const SELECT_ASC_LIMIT: &str = r"
    SELECT timestamp, temperature, humidity FROM sensor_readings
    ORDER BY timestamp ASC, id ASC
    LIMIT ?
";

const SELECT_DESC: &str = r"
    SELECT timestamp, temperature, humidity FROM sensor_readings
    ORDER BY timestamp DESC, id DESC
";

const SELECT_DESC_LIMIT: &str = r"
    SELECT timestamp, temperature, humidity FROM sensor_readings
    ORDER BY timestamp DESC, id DESC
    LIMIT ?
";

const SELECT_LATEST: &str = r"
    SELECT timestamp, temperature, humidity FROM sensor_readings
    ORDER BY timestamp DESC, id DESC
    LIMIT 1
";

/// `SQLite`-backed reading store, shared by the collector and the HTTP API.
#[derive(Clone)]
pub struct SqliteReadingRepository {
    pool: SqlitePool,
}

impl SqliteReadingRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ReadingSink for SqliteReadingRepository {
    async fn ensure_schema(&self) -> Result<(), HygroError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        sqlx::query(CREATE_TABLE)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;
        sqlx::query(CREATE_TIMESTAMP_INDEX)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;

        tx.commit().await.map_err(StorageError::from)?;
        Ok(())
    }

    async fn record(&self, reading: &SensorReading) -> Result<(), HygroError> {
        sqlx::query(INSERT)
            .bind(time::format(&reading.observed_at))
            .bind(reading.temperature)
            .bind(reading.humidity)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}

impl ReadingRepository for SqliteReadingRepository {
    async fn list(&self, query: HistoryQuery) -> Result<Vec<SensorReading>, HygroError> {
        let rows: Vec<Wrapper> = if let Some(limit) = query.limit {
            let sql = match query.order {
                SortOrder::Asc => SELECT_ASC_LIMIT,
                SortOrder::Desc => SELECT_DESC_LIMIT,
            };
            sqlx::query_as(sql)
                .bind(i64::from(limit))
                .fetch_all(&self.pool)
                .await
                .map_err(StorageError::from)?
        } else {
            let sql = match query.order {
                SortOrder::Asc => SELECT_ASC,
                SortOrder::Desc => SELECT_DESC,
            };
            sqlx::query_as(sql)
                .fetch_all(&self.pool)
                .await
                .map_err(StorageError::from)?
        };

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn latest(&self) -> Result<Option<SensorReading>, HygroError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_LATEST)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use chrono::NaiveDate;

    async fn setup() -> SqliteReadingRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        let repo = SqliteReadingRepository::new(db.pool().clone());
        repo.ensure_schema().await.unwrap();
        repo
    }

    fn at(hour: u32, minute: u32) -> time::Timestamp {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_micro_opt(hour, minute, 0, 123_456)
            .unwrap()
    }

    async fn count(repo: &SqliteReadingRepository) -> i64 {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sensor_readings")
            .fetch_one(&repo.pool)
            .await
            .unwrap();
        count
    }

    #[tokio::test]
    async fn should_keep_rows_when_schema_ensured_twice() {
        let repo = setup().await;
        repo.record(&SensorReading::new(21.35, 47, at(10, 0)))
            .await
            .unwrap();

        repo.ensure_schema().await.unwrap();

        assert_eq!(count(&repo).await, 1);
    }

    #[tokio::test]
    async fn should_create_timestamp_index() {
        let repo = setup().await;

        let (name,): (String,) = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'index' AND tbl_name = 'sensor_readings'",
        )
        .fetch_one(&repo.pool)
        .await
        .unwrap();

        assert_eq!(name, "idx_sensor_readings_timestamp");
    }

    #[tokio::test]
    async fn should_store_timestamp_with_microseconds() {
        let repo = setup().await;
        repo.record(&SensorReading::new(21.35, 47, at(10, 5)))
            .await
            .unwrap();

        let (timestamp,): (String,) = sqlx::query_as("SELECT timestamp FROM sensor_readings")
            .fetch_one(&repo.pool)
            .await
            .unwrap();

        assert_eq!(timestamp, "2024-03-09 10:05:00.123456");
    }

    #[tokio::test]
    async fn should_record_and_read_latest() {
        let repo = setup().await;
        let older = SensorReading::new(20.1, 45, at(9, 45));
        let newer = SensorReading::new(21.35, 47, at(10, 0));
        repo.record(&newer).await.unwrap();
        repo.record(&older).await.unwrap();

        let latest = repo.latest().await.unwrap();

        assert_eq!(latest, Some(newer));
    }

    #[tokio::test]
    async fn should_return_none_when_empty() {
        let repo = setup().await;

        assert_eq!(repo.latest().await.unwrap(), None);
        assert!(repo.list(HistoryQuery::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_list_in_requested_order_with_limit() {
        let repo = setup().await;
        for (minute, humidity) in [(0, 40), (15, 41), (30, 42)] {
            repo.record(&SensorReading::new(20.0, humidity, at(8, minute)))
                .await
                .unwrap();
        }

        let desc = repo.list(HistoryQuery::default()).await.unwrap();
        let asc = repo
            .list(HistoryQuery::new(Some(2), SortOrder::Asc))
            .await
            .unwrap();
        let desc_limited = repo
            .list(HistoryQuery::new(Some(1), SortOrder::Desc))
            .await
            .unwrap();

        let humidities = |rows: &[SensorReading]| rows.iter().map(|r| r.humidity).collect::<Vec<_>>();
        assert_eq!(humidities(&desc), vec![42, 41, 40]);
        assert_eq!(humidities(&asc), vec![40, 41]);
        assert_eq!(humidities(&desc_limited), vec![42]);
    }

    #[tokio::test]
    async fn should_fail_when_schema_missing() {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        let repo = SqliteReadingRepository::new(db.pool().clone());

        let err = repo.latest().await.unwrap_err();

        assert!(matches!(err, HygroError::Storage(_)));
    }
}
