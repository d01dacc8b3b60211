// ==========================================
// 健康域仓储 - 病原体 / 疾病类别 / 症状 / 疾病
// ==========================================
// 说明: 疾病与牛只/症状的多对多关联通过连接表维护，
//       关联新增由 API 层在事务内调用并触发康复反应器
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::health::{Disease, DiseaseCategory, Pathogen, Symptom};
use crate::domain::types::{
    DiseaseCategoryName, PathogenName, SymptomLocation, SymptomSeverity, SymptomType,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row::{date_col, datetime_col, enum_col};
use chrono::Utc;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// PathogenRepository - 病原体词表仓储
// ==========================================
pub struct PathogenRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PathogenRepository {
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

    pub fn insert_tx(conn: &Connection, name: PathogenName) -> RepositoryResult<i64> {
        conn.execute(
            "INSERT INTO pathogen (name, created_at) VALUES (?1, ?2)",
            params![name.as_str(), Utc::now().to_rfc3339()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn exists_by_name_tx(conn: &Connection, name: PathogenName) -> RepositoryResult<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM pathogen WHERE name = ?1",
            params![name.as_str()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn find_by_id_tx(conn: &Connection, id: i64) -> RepositoryResult<Option<Pathogen>> {
        let result = conn.query_row(
            "SELECT id, name, created_at FROM pathogen WHERE id = ?1",
            params![id],
            |row| {
                Ok(Pathogen {
                    id: row.get(0)?,
                    name: enum_col(row, 1, PathogenName::parse)?,
                    created_at: datetime_col(row, 2)?,
                })
            },
        );
        match result {
            Ok(rec) => Ok(Some(rec)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Pathogen>> {
        let conn = self.get_conn()?;
        Self::find_by_id_tx(&conn, id)
    }

    /// 删除病原体（被疾病引用时由外键保护拒绝）
    pub fn delete(&self, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM pathogen WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Pathogen".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

// ==========================================
// DiseaseCategoryRepository - 疾病类别词表仓储
// ==========================================
pub struct DiseaseCategoryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DiseaseCategoryRepository {
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

    pub fn insert_tx(conn: &Connection, name: DiseaseCategoryName) -> RepositoryResult<i64> {
        conn.execute(
            "INSERT INTO disease_category (name, created_at) VALUES (?1, ?2)",
            params![name.as_str(), Utc::now().to_rfc3339()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn exists_by_name_tx(
        conn: &Connection,
        name: DiseaseCategoryName,
    ) -> RepositoryResult<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM disease_category WHERE name = ?1",
            params![name.as_str()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn find_by_id_tx(conn: &Connection, id: i64) -> RepositoryResult<Option<DiseaseCategory>> {
        let result = conn.query_row(
            "SELECT id, name, created_at FROM disease_category WHERE id = ?1",
            params![id],
            |row| {
                Ok(DiseaseCategory {
                    id: row.get(0)?,
                    name: enum_col(row, 1, DiseaseCategoryName::parse)?,
                    created_at: datetime_col(row, 2)?,
                })
            },
        );
        match result {
            Ok(rec) => Ok(Some(rec)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<DiseaseCategory>> {
        let conn = self.get_conn()?;
        Self::find_by_id_tx(&conn, id)
    }
}

// ==========================================
// SymptomRepository - 症状仓储
// ==========================================
pub struct SymptomRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SymptomRepository {
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

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Symptom> {
        Ok(Symptom {
            id: row.get(0)?,
            name: row.get(1)?,
            symptom_type: enum_col(row, 2, SymptomType::parse)?,
            description: row.get(3)?,
            severity: enum_col(row, 4, SymptomSeverity::parse)?,
            location: enum_col(row, 5, SymptomLocation::parse)?,
            date_observed: date_col(row, 6)?,
            created_at: datetime_col(row, 7)?,
        })
    }

    pub fn insert_tx(conn: &Connection, rec: &Symptom) -> RepositoryResult<i64> {
        conn.execute(
            r#"
            INSERT INTO symptom (name, symptom_type, description, severity, location, date_observed, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                rec.name,
                rec.symptom_type.as_str(),
                rec.description,
                rec.severity.as_str(),
                rec.location.as_str(),
                rec.date_observed.to_string(),
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_by_id_tx(conn: &Connection, id: i64) -> RepositoryResult<Option<Symptom>> {
        let result = conn.query_row(
            r#"
            SELECT id, name, symptom_type, description, severity, location, date_observed, created_at
            FROM symptom WHERE id = ?1
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

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Symptom>> {
        let conn = self.get_conn()?;
        Self::find_by_id_tx(&conn, id)
    }
}

// ==========================================
// DiseaseRepository - 疾病仓储（含多对多关联）
// ==========================================
pub struct DiseaseRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DiseaseRepository {
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

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Disease> {
        Ok(Disease {
            id: row.get(0)?,
            name: row.get(1)?,
            pathogen_id: row.get(2)?,
            category_id: row.get(3)?,
            date_reported: date_col(row, 4)?,
            occurrence_date: date_col(row, 5)?,
            notes: row.get(6)?,
            created_at: datetime_col(row, 7)?,
        })
    }

    pub fn insert_tx(conn: &Connection, rec: &Disease) -> RepositoryResult<i64> {
        conn.execute(
            r#"
            INSERT INTO disease (name, pathogen_id, category_id, date_reported, occurrence_date, notes, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                rec.name,
                rec.pathogen_id,
                rec.category_id,
                rec.date_reported.to_string(),
                rec.occurrence_date.to_string(),
                rec.notes,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_by_id_tx(conn: &Connection, id: i64) -> RepositoryResult<Option<Disease>> {
        let result = conn.query_row(
            r#"
            SELECT id, name, pathogen_id, category_id, date_reported, occurrence_date, notes, created_at
            FROM disease WHERE id = ?1
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

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Disease>> {
        let conn = self.get_conn()?;
        Self::find_by_id_tx(&conn, id)
    }

    /// 关联牛只（已关联则返回 false，不重复触发反应器）
    pub fn link_cow_tx(conn: &Connection, disease_id: i64, cow_id: i64) -> RepositoryResult<bool> {
        let affected = conn.execute(
            "INSERT OR IGNORE INTO disease_cow (disease_id, cow_id) VALUES (?1, ?2)",
            params![disease_id, cow_id],
        )?;
        Ok(affected > 0)
    }

    /// 解除牛只关联（康复记录保留，历史不可抹除）
    pub fn unlink_cow_tx(conn: &Connection, disease_id: i64, cow_id: i64) -> RepositoryResult<bool> {
        let affected = conn.execute(
            "DELETE FROM disease_cow WHERE disease_id = ?1 AND cow_id = ?2",
            params![disease_id, cow_id],
        )?;
        Ok(affected > 0)
    }

    pub fn link_symptom_tx(
        conn: &Connection,
        disease_id: i64,
        symptom_id: i64,
    ) -> RepositoryResult<bool> {
        let affected = conn.execute(
            "INSERT OR IGNORE INTO disease_symptom (disease_id, symptom_id) VALUES (?1, ?2)",
            params![disease_id, symptom_id],
        )?;
        Ok(affected > 0)
    }

    pub fn list_cow_ids(&self, disease_id: i64) -> RepositoryResult<Vec<i64>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT cow_id FROM disease_cow WHERE disease_id = ?1 ORDER BY cow_id")?;
        let rows = stmt.query_map(params![disease_id], |row| row.get(0))?;
        let mut ids = Vec::new();
        for row in rows {
            ids.push(row?);
        }
        Ok(ids)
    }
}
