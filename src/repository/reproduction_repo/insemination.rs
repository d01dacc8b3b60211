// ==========================================
// 繁殖域仓储 - 配种记录
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::reproduction::Insemination;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row::datetime_col;
use chrono::Utc;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// InseminationRepository - 配种记录仓储
// ==========================================
pub struct InseminationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl InseminationRepository {
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

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Insemination> {
        Ok(Insemination {
            id: row.get(0)?,
            cow_id: row.get(1)?,
            pregnancy_id: row.get(2)?,
            success: row.get(3)?,
            notes: row.get(4)?,
            inseminator_id: row.get(5)?,
            date_of_insemination: datetime_col(row, 6)?,
            created_at: datetime_col(row, 7)?,
        })
    }

    pub fn insert_tx(conn: &Connection, rec: &Insemination) -> RepositoryResult<i64> {
        conn.execute(
            r#"
            INSERT INTO insemination (
                cow_id, pregnancy_id, success, notes, inseminator_id,
                date_of_insemination, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                rec.cow_id,
                rec.pregnancy_id,
                rec.success,
                rec.notes,
                rec.inseminator_id,
                rec.date_of_insemination.to_rfc3339(),
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 系统回填妊娠关联（成功配种反应器专用）
    pub fn link_pregnancy_tx(
        conn: &Connection,
        insemination_id: i64,
        pregnancy_id: i64,
    ) -> RepositoryResult<()> {
        let affected = conn.execute(
            "UPDATE insemination SET pregnancy_id = ?1 WHERE id = ?2",
            params![pregnancy_id, insemination_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Insemination".to_string(),
                id: insemination_id.to_string(),
            });
        }
        Ok(())
    }

    /// 牛只最近一次配种（间隔校验用），可排除指定记录
    pub fn latest_for_cow_tx(
        conn: &Connection,
        cow_id: i64,
        exclude_id: Option<i64>,
    ) -> RepositoryResult<Option<Insemination>> {
        let result = conn.query_row(
            r#"
            SELECT id, cow_id, pregnancy_id, success, notes, inseminator_id,
                   date_of_insemination, created_at
            FROM insemination WHERE cow_id = ?1 AND id != ?2
            ORDER BY date_of_insemination DESC LIMIT 1
            "#,
            params![cow_id, exclude_id.unwrap_or(-1)],
            Self::map_row,
        );
        match result {
            Ok(rec) => Ok(Some(rec)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn find_by_id_tx(conn: &Connection, id: i64) -> RepositoryResult<Option<Insemination>> {
        let result = conn.query_row(
            r#"
            SELECT id, cow_id, pregnancy_id, success, notes, inseminator_id,
                   date_of_insemination, created_at
            FROM insemination WHERE id = ?1
            "#,
            params![id],
            Self::map_row,
        );
        match result {
            Ok(rec) => Ok(Some(rec)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Insemination>> {
        let conn = self.get_conn()?;
        Self::find_by_id_tx(&conn, id)
    }
}
