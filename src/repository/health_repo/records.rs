// ==========================================
// 健康域仓储 - 体重 / 淘汰 / 隔离记录
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::health::{CullingRecord, QuarantineRecord, WeightRecord};
use crate::domain::types::{CullingReason, QuarantineReason};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row::{date_col, date_col_opt, datetime_col, enum_col};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// WeightRecordRepository - 体重记录仓储
// ==========================================
pub struct WeightRecordRepository {
    conn: Arc<Mutex<Connection>>,
}

impl WeightRecordRepository {
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

    fn map_row(row: &Row<'_>) -> rusqlite::Result<WeightRecord> {
        Ok(WeightRecord {
            id: row.get(0)?,
            cow_id: row.get(1)?,
            weight_kg: row.get(2)?,
            date_taken: date_col(row, 3)?,
            created_at: datetime_col(row, 4)?,
        })
    }

    pub fn insert_tx(conn: &Connection, rec: &WeightRecord) -> RepositoryResult<i64> {
        conn.execute(
            r#"
            INSERT INTO weight_record (cow_id, weight_kg, date_taken, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                rec.cow_id,
                rec.weight_kg,
                rec.date_taken.to_string(),
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 同一 (cow, date) 是否已有记录（重复校验用）
    pub fn exists_on_date_tx(
        conn: &Connection,
        cow_id: i64,
        date_taken: NaiveDate,
    ) -> RepositoryResult<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM weight_record WHERE cow_id = ?1 AND date_taken = ?2",
            params![cow_id, date_taken.to_string()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn list_by_cow(&self, cow_id: i64) -> RepositoryResult<Vec<WeightRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, cow_id, weight_kg, date_taken, created_at
            FROM weight_record WHERE cow_id = ?1 ORDER BY date_taken
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

// ==========================================
// CullingRecordRepository - 淘汰记录仓储
// ==========================================
pub struct CullingRecordRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CullingRecordRepository {
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

    fn map_row(row: &Row<'_>) -> rusqlite::Result<CullingRecord> {
        Ok(CullingRecord {
            id: row.get(0)?,
            cow_id: row.get(1)?,
            reason: enum_col(row, 2, CullingReason::parse)?,
            notes: row.get(3)?,
            date_carried: date_col(row, 4)?,
            created_at: datetime_col(row, 5)?,
        })
    }

    /// 插入淘汰记录（cow_id 唯一，一牛一淘汰）
    pub fn insert_tx(conn: &Connection, rec: &CullingRecord) -> RepositoryResult<i64> {
        conn.execute(
            r#"
            INSERT INTO culling_record (cow_id, reason, notes, date_carried, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                rec.cow_id,
                rec.reason.as_str(),
                rec.notes,
                rec.date_carried.to_string(),
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_by_cow_tx(conn: &Connection, cow_id: i64) -> RepositoryResult<Option<CullingRecord>> {
        let result = conn.query_row(
            r#"
            SELECT id, cow_id, reason, notes, date_carried, created_at
            FROM culling_record WHERE cow_id = ?1
            "#,
            params![cow_id],
            Self::map_row,
        );
        match result {
            Ok(rec) => Ok(Some(rec)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn find_by_cow(&self, cow_id: i64) -> RepositoryResult<Option<CullingRecord>> {
        let conn = self.get_conn()?;
        Self::find_by_cow_tx(&conn, cow_id)
    }
}

// ==========================================
// QuarantineRecordRepository - 隔离记录仓储
// ==========================================
pub struct QuarantineRecordRepository {
    conn: Arc<Mutex<Connection>>,
}

impl QuarantineRecordRepository {
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

    fn map_row(row: &Row<'_>) -> rusqlite::Result<QuarantineRecord> {
        Ok(QuarantineRecord {
            id: row.get(0)?,
            cow_id: row.get(1)?,
            reason: enum_col(row, 2, QuarantineReason::parse)?,
            start_date: date_col(row, 3)?,
            end_date: date_col_opt(row, 4)?,
            notes: row.get(5)?,
            created_at: datetime_col(row, 6)?,
        })
    }

    pub fn insert_tx(conn: &Connection, rec: &QuarantineRecord) -> RepositoryResult<i64> {
        conn.execute(
            r#"
            INSERT INTO quarantine_record (cow_id, reason, start_date, end_date, notes, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                rec.cow_id,
                rec.reason.as_str(),
                rec.start_date.to_string(),
                rec.end_date.map(|d| d.to_string()),
                rec.notes,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn list_by_cow(&self, cow_id: i64) -> RepositoryResult<Vec<QuarantineRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, cow_id, reason, start_date, end_date, notes, created_at
            FROM quarantine_record WHERE cow_id = ?1 ORDER BY start_date DESC
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
