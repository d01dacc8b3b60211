// ==========================================
// 繁殖域仓储 - 妊娠记录
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::reproduction::Pregnancy;
use crate::domain::types::{PregnancyOutcome, PregnancyStatus};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row::{date_col, date_col_opt, datetime_col, enum_col, enum_col_opt};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// PregnancyRepository - 妊娠记录仓储
// ==========================================
pub struct PregnancyRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PregnancyRepository {
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

    const COLUMNS: &'static str = r#"
        id, cow_id, start_date, date_of_calving, pregnancy_status,
        pregnancy_notes, calving_notes, pregnancy_scan_date,
        pregnancy_failed_date, pregnancy_outcome, created_at, updated_at
    "#;

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Pregnancy> {
        Ok(Pregnancy {
            id: row.get(0)?,
            cow_id: row.get(1)?,
            start_date: date_col(row, 2)?,
            date_of_calving: date_col_opt(row, 3)?,
            pregnancy_status: enum_col(row, 4, PregnancyStatus::parse)?,
            pregnancy_notes: row.get(5)?,
            calving_notes: row.get(6)?,
            pregnancy_scan_date: date_col_opt(row, 7)?,
            pregnancy_failed_date: date_col_opt(row, 8)?,
            pregnancy_outcome: enum_col_opt(row, 9, PregnancyOutcome::parse)?,
            created_at: datetime_col(row, 10)?,
            updated_at: datetime_col(row, 11)?,
        })
    }

    pub fn insert_tx(conn: &Connection, rec: &Pregnancy) -> RepositoryResult<i64> {
        let now = Utc::now().to_rfc3339();
        conn.execute(
            r#"
            INSERT INTO pregnancy (
                cow_id, start_date, date_of_calving, pregnancy_status,
                pregnancy_notes, calving_notes, pregnancy_scan_date,
                pregnancy_failed_date, pregnancy_outcome, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                rec.cow_id,
                rec.start_date.to_string(),
                rec.date_of_calving.map(|d| d.to_string()),
                rec.pregnancy_status.as_str(),
                rec.pregnancy_notes,
                rec.calving_notes,
                rec.pregnancy_scan_date.map(|d| d.to_string()),
                rec.pregnancy_failed_date.map(|d| d.to_string()),
                rec.pregnancy_outcome.map(|o| o.as_str()),
                now,
                now,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn update_tx(conn: &Connection, rec: &Pregnancy) -> RepositoryResult<()> {
        let now = Utc::now().to_rfc3339();
        let affected = conn.execute(
            r#"
            UPDATE pregnancy SET
                start_date = ?1, date_of_calving = ?2, pregnancy_status = ?3,
                pregnancy_notes = ?4, calving_notes = ?5, pregnancy_scan_date = ?6,
                pregnancy_failed_date = ?7, pregnancy_outcome = ?8, updated_at = ?9
            WHERE id = ?10
            "#,
            params![
                rec.start_date.to_string(),
                rec.date_of_calving.map(|d| d.to_string()),
                rec.pregnancy_status.as_str(),
                rec.pregnancy_notes,
                rec.calving_notes,
                rec.pregnancy_scan_date.map(|d| d.to_string()),
                rec.pregnancy_failed_date.map(|d| d.to_string()),
                rec.pregnancy_outcome.map(|o| o.as_str()),
                now,
                rec.id,
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Pregnancy".to_string(),
                id: rec.id.to_string(),
            });
        }
        Ok(())
    }

    pub fn find_by_id_tx(conn: &Connection, id: i64) -> RepositoryResult<Option<Pregnancy>> {
        let sql = format!("SELECT {} FROM pregnancy WHERE id = ?1", Self::COLUMNS);
        let result = conn.query_row(&sql, params![id], Self::map_row);
        match result {
            Ok(rec) => Ok(Some(rec)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查找牛只的开放妊娠（未产犊且未失败），可排除指定记录（更新场景）
    pub fn find_open_for_cow_tx(
        conn: &Connection,
        cow_id: i64,
        exclude_id: Option<i64>,
    ) -> RepositoryResult<Option<Pregnancy>> {
        let sql = format!(
            r#"
            SELECT {} FROM pregnancy
            WHERE cow_id = ?1
              AND date_of_calving IS NULL
              AND pregnancy_status != 'Failed'
              AND id != ?2
            ORDER BY start_date DESC LIMIT 1
            "#,
            Self::COLUMNS
        );
        let result = conn.query_row(&sql, params![cow_id, exclude_id.unwrap_or(-1)], Self::map_row);
        match result {
            Ok(rec) => Ok(Some(rec)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 牛只最近一次产犊日期（发情 60 天窗口校验用）
    pub fn latest_calving_date_tx(
        conn: &Connection,
        cow_id: i64,
    ) -> RepositoryResult<Option<NaiveDate>> {
        let result: Option<String> = conn.query_row(
            "SELECT MAX(date_of_calving) FROM pregnancy WHERE cow_id = ?1",
            params![cow_id],
            |row| row.get(0),
        )?;
        match result {
            Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .map(Some)
                .map_err(|e| RepositoryError::FieldValueError {
                    field: "date_of_calving".to_string(),
                    message: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Pregnancy>> {
        let conn = self.get_conn()?;
        Self::find_by_id_tx(&conn, id)
    }

    pub fn list_by_cow(&self, cow_id: i64) -> RepositoryResult<Vec<Pregnancy>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM pregnancy WHERE cow_id = ?1 ORDER BY start_date",
            Self::COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![cow_id], Self::map_row)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}
