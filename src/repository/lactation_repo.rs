// ==========================================
// 奶牛场管理系统 - 泌乳协作仓储
// ==========================================
// 说明: 泌乳属生产域（外部协作方），本仓储只实现核心消费的
//       创建/收尾契约，不承载泌乳内部规则
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::lactation::Lactation;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row::{date_col, date_col_opt, datetime_col};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// LactationRepository - 泌乳期仓储
// ==========================================
pub struct LactationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl LactationRepository {
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

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Lactation> {
        Ok(Lactation {
            id: row.get(0)?,
            cow_id: row.get(1)?,
            start_date: date_col(row, 2)?,
            end_date: date_col_opt(row, 3)?,
            pregnancy_id: row.get(4)?,
            lactation_number: row.get(5)?,
            created_at: datetime_col(row, 6)?,
        })
    }

    /// 契约: 开启泌乳期
    pub fn create_tx(
        conn: &Connection,
        cow_id: i64,
        start_date: NaiveDate,
        pregnancy_id: Option<i64>,
        lactation_number: i32,
    ) -> RepositoryResult<i64> {
        conn.execute(
            r#"
            INSERT INTO lactation (cow_id, start_date, end_date, pregnancy_id, lactation_number, created_at)
            VALUES (?1, ?2, NULL, ?3, ?4, ?5)
            "#,
            params![
                cow_id,
                start_date.to_string(),
                pregnancy_id,
                lactation_number,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 契约: 收尾泌乳期（写入 end_date）
    pub fn close_tx(
        conn: &Connection,
        lactation_id: i64,
        end_date: NaiveDate,
    ) -> RepositoryResult<()> {
        let affected = conn.execute(
            "UPDATE lactation SET end_date = ?1 WHERE id = ?2",
            params![end_date.to_string(), lactation_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Lactation".to_string(),
                id: lactation_id.to_string(),
            });
        }
        Ok(())
    }

    /// 牛只最近一期泌乳（产犊反应器滚动判断用）
    pub fn latest_for_cow_tx(
        conn: &Connection,
        cow_id: i64,
    ) -> RepositoryResult<Option<Lactation>> {
        let result = conn.query_row(
            r#"
            SELECT id, cow_id, start_date, end_date, pregnancy_id, lactation_number, created_at
            FROM lactation WHERE cow_id = ?1
            ORDER BY lactation_number DESC LIMIT 1
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

    pub fn list_by_cow(&self, cow_id: i64) -> RepositoryResult<Vec<Lactation>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, cow_id, start_date, end_date, pregnancy_id, lactation_number, created_at
            FROM lactation WHERE cow_id = ?1 ORDER BY lactation_number
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
