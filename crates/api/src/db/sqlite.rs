use anyhow::{anyhow, Context};
use async_trait::async_trait;
use climate_core::is_file;
use log::{debug, info};
use sqlx::{
    pool::PoolConnection,
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    Sqlite,
};
use std::{str::FromStr, time::Duration};
use time::Date;

use super::{Error, Observation, ObservationStore, ScanFilter, Station, StationCount};
use crate::{format_date, parse_stored_date};

const REQUIRED_TABLES: [&str; 2] = ["measurement", "station"];

/// Observation store backed by an existing SQLite file, opened read-only.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(path: &str, max_connections: u32) -> anyhow::Result<Self> {
        if !is_file(path) {
            return Err(anyhow!("observation database not found at: {}", path));
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .read_only(true)
            .create_if_missing(false)
            .pragma("busy_timeout", "5000")
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "MEMORY");

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open observation database: {}", path))?;

        info!("SQLite observation store opened read-only at: {}", path);
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("SQLite observation store closed");
    }

    /// Checks a connection out of the pool; it goes back when the guard drops,
    /// whichever way the calling query exits.
    async fn session(&self) -> Result<PoolConnection<Sqlite>, Error> {
        Ok(self.pool.acquire().await?)
    }

    async fn date_bound(&self, aggregate: &str) -> Result<Option<String>, Error> {
        let mut conn = self.session().await?;
        let query = format!("SELECT {}(date) FROM measurement", aggregate);
        let value: Option<String> = sqlx::query_scalar(&query)
            .fetch_one(&mut *conn)
            .await?;
        Ok(value)
    }
}

fn stored_date(value: &str) -> Result<Date, Error> {
    parse_stored_date(value).ok_or_else(|| Error::InvalidDate(value.to_owned()))
}

#[async_trait]
impl ObservationStore for SqliteStore {
    async fn min_date(&self) -> Result<Option<String>, Error> {
        self.date_bound("MIN").await
    }

    async fn max_date(&self) -> Result<Option<String>, Error> {
        self.date_bound("MAX").await
    }

    async fn scan(&self, filter: ScanFilter) -> Result<Vec<Observation>, Error> {
        let mut clauses = Vec::new();
        let mut values: Vec<String> = Vec::new();

        if let Some(start) = filter.start {
            clauses.push("date >= ?");
            values.push(format_date(start));
        }
        if let Some(end) = filter.end {
            clauses.push("date <= ?");
            values.push(format_date(end));
        }
        if let Some(station) = &filter.station {
            clauses.push("station = ?");
            values.push(station.clone());
        }

        let mut query = String::from(
            "SELECT station, date, CAST(prcp AS REAL) AS prcp, CAST(tobs AS REAL) AS tobs
             FROM measurement",
        );
        if !clauses.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&clauses.join(" AND "));
        }
        if filter.ordered {
            query.push_str(" ORDER BY date ASC, rowid ASC");
        }
        debug!("scanning measurements: {} {:?}", query, values);

        let mut q = sqlx::query_as::<_, (String, String, Option<f64>, Option<f64>)>(&query);
        for value in values {
            q = q.bind(value);
        }

        let mut conn = self.session().await?;
        let rows = q.fetch_all(&mut *conn).await?;

        rows.into_iter()
            .map(|(station, date, precipitation, temperature)| {
                Ok(Observation {
                    station,
                    date: stored_date(&date)?,
                    precipitation,
                    temperature,
                })
            })
            .collect()
    }

    async fn count_by_station(&self) -> Result<Vec<StationCount>, Error> {
        let mut conn = self.session().await?;
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT station, COUNT(*) AS count
             FROM measurement
             GROUP BY station
             ORDER BY count DESC",
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(station, count)| StationCount { station, count })
            .collect())
    }

    async fn distinct_dates(&self) -> Result<Vec<Date>, Error> {
        let mut conn = self.session().await?;
        let rows: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT date FROM measurement ORDER BY date")
                .fetch_all(&mut *conn)
                .await?;

        rows.iter().map(|date| stored_date(date)).collect()
    }

    async fn stations(&self) -> Result<Vec<Station>, Error> {
        let mut conn = self.session().await?;
        let rows: Vec<String> = sqlx::query_scalar("SELECT station FROM station")
            .fetch_all(&mut *conn)
            .await?;

        Ok(rows.into_iter().map(|id| Station { id }).collect())
    }

    async fn health_check(&self) -> Result<(), Error> {
        let mut conn = self.session().await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;

        for table in REQUIRED_TABLES {
            let found: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
            )
            .bind(table)
            .fetch_one(&mut *conn)
            .await?;
            if found == 0 {
                return Err(Error::MissingTable(table.to_owned()));
            }
        }

        Ok(())
    }
}
