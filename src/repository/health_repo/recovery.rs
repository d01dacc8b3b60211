// ==========================================
// 健康域仓储 - 康复 / 治疗记录
// ==========================================
// 红线: recovery 行由反应器创建，recovery_date 由治疗完成反应器回填
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::health::{Recovery, Treatment};
use crate::domain::types::TreatmentStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row::{date_col, date_col_opt, datetime_col, enum_col};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// RecoveryRepository - 康复记录仓储
// ==========================================
pub struct RecoveryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RecoveryRepository {
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

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Recovery> {
        Ok(Recovery {
            id: row.get(0)?,
            cow_id: row.get(1)?,
            disease_id: row.get(2)?,
            diagnosis_date: date_col(row, 3)?,
            recovery_date: date_col_opt(row, 4)?,
            created_at: datetime_col(row, 5)?,
        })
    }

    /// 创建康复记录（recovery_date 初始为 NULL）
    pub fn insert_tx(
        conn: &Connection,
        cow_id: i64,
        disease_id: i64,
        diagnosis_date: NaiveDate,
    ) -> RepositoryResult<i64> {
        conn.execute(
            r#"
            INSERT INTO recovery (cow_id, disease_id, diagnosis_date, recovery_date, created_at)
            VALUES (?1, ?2, ?3, NULL, ?4)
            "#,
            params![
                cow_id,
                disease_id,
                diagnosis_date.to_string(),
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_by_cow_and_disease_tx(
        conn: &Connection,
        cow_id: i64,
        disease_id: i64,
    ) -> RepositoryResult<Option<Recovery>> {
        let result = conn.query_row(
            r#"
            SELECT id, cow_id, disease_id, diagnosis_date, recovery_date, created_at
            FROM recovery WHERE cow_id = ?1 AND disease_id = ?2
            "#,
            params![cow_id, disease_id],
            Self::map_row,
        );
        match result {
            Ok(rec) => Ok(Some(rec)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 回填康复日期（治疗完成反应器专用）
    pub fn set_recovery_date_tx(
        conn: &Connection,
        recovery_id: i64,
        recovery_date: NaiveDate,
    ) -> RepositoryResult<()> {
        let affected = conn.execute(
            "UPDATE recovery SET recovery_date = ?1 WHERE id = ?2",
            params![recovery_date.to_string(), recovery_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Recovery".to_string(),
                id: recovery_id.to_string(),
            });
        }
        Ok(())
    }

    pub fn find_by_cow_and_disease(
        &self,
        cow_id: i64,
        disease_id: i64,
    ) -> RepositoryResult<Option<Recovery>> {
        let conn = self.get_conn()?;
        Self::find_by_cow_and_disease_tx(&conn, cow_id, disease_id)
    }

    pub fn list_by_disease(&self, disease_id: i64) -> RepositoryResult<Vec<Recovery>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, cow_id, disease_id, diagnosis_date, recovery_date, created_at
            FROM recovery WHERE disease_id = ?1 ORDER BY id
            "#,
        )?;
        let rows = stmt.query_map(params![disease_id], Self::map_row)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}

// ==========================================
// TreatmentRepository - 治疗记录仓储
// ==========================================
pub struct TreatmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TreatmentRepository {
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

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Treatment> {
        Ok(Treatment {
            id: row.get(0)?,
            disease_id: row.get(1)?,
            cow_id: row.get(2)?,
            date_of_treatment: date_col(row, 3)?,
            treatment_method: row.get(4)?,
            notes: row.get(5)?,
            treatment_status: enum_col(row, 6, TreatmentStatus::parse)?,
            completion_date: date_col_opt(row, 7)?,
            created_at: datetime_col(row, 8)?,
        })
    }

    pub fn insert_tx(conn: &Connection, rec: &Treatment) -> RepositoryResult<i64> {
        conn.execute(
            r#"
            INSERT INTO treatment (
                disease_id, cow_id, date_of_treatment, treatment_method,
                notes, treatment_status, completion_date, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                rec.disease_id,
                rec.cow_id,
                rec.date_of_treatment.to_string(),
                rec.treatment_method,
                rec.notes,
                rec.treatment_status.as_str(),
                rec.completion_date.map(|d| d.to_string()),
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 更新治疗状态与完成日期
    pub fn update_tx(conn: &Connection, rec: &Treatment) -> RepositoryResult<()> {
        let affected = conn.execute(
            r#"
            UPDATE treatment SET
                date_of_treatment = ?1, treatment_method = ?2, notes = ?3,
                treatment_status = ?4, completion_date = ?5
            WHERE id = ?6
            "#,
            params![
                rec.date_of_treatment.to_string(),
                rec.treatment_method,
                rec.notes,
                rec.treatment_status.as_str(),
                rec.completion_date.map(|d| d.to_string()),
                rec.id,
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Treatment".to_string(),
                id: rec.id.to_string(),
            });
        }
        Ok(())
    }

    pub fn find_by_id_tx(conn: &Connection, id: i64) -> RepositoryResult<Option<Treatment>> {
        let result = conn.query_row(
            r#"
            SELECT id, disease_id, cow_id, date_of_treatment, treatment_method,
                   notes, treatment_status, completion_date, created_at
            FROM treatment WHERE id = ?1
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

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Treatment>> {
        let conn = self.get_conn()?;
        Self::find_by_id_tx(&conn, id)
    }

    pub fn list_by_cow(&self, cow_id: i64) -> RepositoryResult<Vec<Treatment>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, disease_id, cow_id, date_of_treatment, treatment_method,
                   notes, treatment_status, completion_date, created_at
            FROM treatment WHERE cow_id = ?1 ORDER BY id
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
