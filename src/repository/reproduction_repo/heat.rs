// ==========================================
// 繁殖域仓储 - 发情观察记录
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::reproduction::Heat;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row::datetime_col;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// HeatRepository - 发情观察仓储
// ==========================================
pub struct HeatRepository {
    conn: Arc<Mutex<Connection>>,
}

impl HeatRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Heat> {
        Ok(Heat {
            id: row.get(0)?,
            cow_id: row.get(1)?,
            observation_time: datetime_col(row, 2)?,
            created_at: datetime_col(row, 3)?,
        })
    }

    pub fn insert_tx(conn: &Connection, rec: &Heat) -> RepositoryResult<i64> {
        conn.execute(
            "INSERT INTO heat (cow_id, observation_time, created_at) VALUES (?1, ?2, ?3)",
            params![
                rec.cow_id,
                rec.observation_time.to_rfc3339(),
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 指定时刻之前最近一次发情观察（间隔校验用，天数计算在校验器内完成）
    pub fn latest_before_tx(
        conn: &Connection,
        cow_id: i64,
        before: DateTime<Utc>,
    ) -> RepositoryResult<Option<Heat>> {
        let result = conn.query_row(
            r#"
            SELECT id, cow_id, observation_time, created_at
            FROM heat WHERE cow_id = ?1 AND observation_time < ?2
            ORDER BY observation_time DESC LIMIT 1
            "#,
            params![cow_id, before.to_rfc3339()],
            Self::map_row,
        );
        match result {
            Ok(rec) => Ok(Some(rec)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 同一自然日是否已有发情观察（RFC3339 前 10 位即 UTC 日期）
    pub fn exists_on_date_tx(
        conn: &Connection,
        cow_id: i64,
        date: NaiveDate,
    ) -> RepositoryResult<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM heat WHERE cow_id = ?1 AND substr(observation_time, 1, 10) = ?2",
            params![cow_id, date.to_string()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn list_by_cow(&self, cow_id: i64) -> RepositoryResult<Vec<Heat>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, cow_id, observation_time, created_at
            FROM heat WHERE cow_id = ?1 ORDER BY observation_time
            "#,
        )?;
        let rows = stmt.query_map(params![cow_id], Self::map_row)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}
