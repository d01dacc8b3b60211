// ==========================================
// 奶牛场管理系统 - 牛群数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑，只负责数据访问
// 说明: *_tx 关联函数接收 &Connection，供 API 层在同一事务内组合调用
//       （rusqlite::Transaction 解引用为 Connection，可直接传入）
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::cow::{Cow, CowBreed, Inseminator};
use crate::domain::types::{
    CowAvailabilityStatus, CowBreedName, CowCategory, CowPregnancyStatus, CowProductionStatus,
    Sex,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row::{date_col, datetime_col, enum_col};
use chrono::Utc;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// CowBreedRepository - 品种参考数据仓储
// ==========================================
pub struct CowBreedRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CowBreedRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<CowBreed> {
        Ok(CowBreed {
            id: row.get(0)?,
            name: enum_col(row, 1, CowBreedName::parse)?,
            created_at: datetime_col(row, 2)?,
            updated_at: datetime_col(row, 3)?,
        })
    }

    /// 插入品种（name 唯一，重复时返回 UniqueConstraintViolation）
    pub fn insert_tx(conn: &Connection, name: CowBreedName) -> RepositoryResult<i64> {
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO cow_breed (name, created_at, updated_at) VALUES (?1, ?2, ?3)",
            params![name.as_str(), now, now],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_by_id_tx(conn: &Connection, id: i64) -> RepositoryResult<Option<CowBreed>> {
        let result = conn.query_row(
            "SELECT id, name, created_at, updated_at FROM cow_breed WHERE id = ?1",
            params![id],
            Self::map_row,
        );
        match result {
            Ok(breed) => Ok(Some(breed)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn exists_by_name_tx(conn: &Connection, name: CowBreedName) -> RepositoryResult<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM cow_breed WHERE name = ?1",
            params![name.as_str()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<CowBreed>> {
        let conn = self.get_conn()?;
        Self::find_by_id_tx(&conn, id)
    }

    pub fn list(&self) -> RepositoryResult<Vec<CowBreed>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT id, name, created_at, updated_at FROM cow_breed ORDER BY id")?;
        let rows = stmt.query_map([], Self::map_row)?;
        let mut breeds = Vec::new();
        for row in rows {
            breeds.push(row?);
        }
        Ok(breeds)
    }
}

// ==========================================
// InseminatorRepository - 配种员参考数据仓储
// ==========================================
pub struct InseminatorRepository {
    conn: Arc<Mutex<Connection>>,
}

impl InseminatorRepository {
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

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Inseminator> {
        Ok(Inseminator {
            id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            phone_number: row.get(3)?,
            license_number: row.get(4)?,
            created_at: datetime_col(row, 5)?,
            updated_at: datetime_col(row, 6)?,
        })
    }

    /// 插入配种员（license_number 唯一）
    pub fn insert_tx(conn: &Connection, rec: &Inseminator) -> RepositoryResult<i64> {
        let now = Utc::now().to_rfc3339();
        conn.execute(
            r#"
            INSERT INTO inseminator (first_name, last_name, phone_number, license_number, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                rec.first_name,
                rec.last_name,
                rec.phone_number,
                rec.license_number,
                now,
                now,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_by_id_tx(conn: &Connection, id: i64) -> RepositoryResult<Option<Inseminator>> {
        let result = conn.query_row(
            r#"
            SELECT id, first_name, last_name, phone_number, license_number, created_at, updated_at
            FROM inseminator WHERE id = ?1
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

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Inseminator>> {
        let conn = self.get_conn()?;
        Self::find_by_id_tx(&conn, id)
    }
}

// ==========================================
// CowRepository - 牛只主数据仓储
// ==========================================
/// 牛只主数据仓储
/// 职责: 管理 cow 表的 CRUD 与状态计数查询
pub struct CowRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CowRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    const COLUMNS: &'static str = r#"
        id, name, breed_id, gender, date_of_birth, category,
        availability_status, current_pregnancy_status, current_production_status,
        is_bought, tag_number, created_at, updated_at
    "#;

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Cow> {
        Ok(Cow {
            id: row.get(0)?,
            name: row.get(1)?,
            breed_id: row.get(2)?,
            gender: enum_col(row, 3, Sex::parse)?,
            date_of_birth: date_col(row, 4)?,
            category: enum_col(row, 5, CowCategory::parse)?,
            availability_status: enum_col(row, 6, CowAvailabilityStatus::parse)?,
            current_pregnancy_status: enum_col(row, 7, CowPregnancyStatus::parse)?,
            current_production_status: enum_col(row, 8, CowProductionStatus::parse)?,
            is_bought: row.get(9)?,
            tag_number: row.get(10)?,
            created_at: datetime_col(row, 11)?,
            updated_at: datetime_col(row, 12)?,
        })
    }

    /// 预估下一个序号（耳标号生成用）
    pub fn next_serial_tx(conn: &Connection) -> RepositoryResult<i64> {
        let next: i64 =
            conn.query_row("SELECT COALESCE(MAX(id), 0) + 1 FROM cow", [], |row| row.get(0))?;
        Ok(next)
    }

    /// 插入牛只
    ///
    /// # 参数
    /// - cow: 牛只实体（id 字段忽略，由数据库分配）
    ///
    /// # 返回
    /// - Ok(i64): 新记录 id
    pub fn insert_tx(conn: &Connection, cow: &Cow) -> RepositoryResult<i64> {
        let now = Utc::now().to_rfc3339();
        conn.execute(
            r#"
            INSERT INTO cow (
                name, breed_id, gender, date_of_birth, category,
                availability_status, current_pregnancy_status, current_production_status,
                is_bought, tag_number, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                cow.name,
                cow.breed_id,
                cow.gender.as_str(),
                cow.date_of_birth.to_string(),
                cow.category.as_str(),
                cow.availability_status.as_str(),
                cow.current_pregnancy_status.as_str(),
                cow.current_production_status.as_str(),
                cow.is_bought,
                cow.tag_number,
                now,
                now,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 全量更新牛只（按 id）
    pub fn update_tx(conn: &Connection, cow: &Cow) -> RepositoryResult<()> {
        let now = Utc::now().to_rfc3339();
        let affected = conn.execute(
            r#"
            UPDATE cow SET
                name = ?1, breed_id = ?2, gender = ?3, date_of_birth = ?4, category = ?5,
                availability_status = ?6, current_pregnancy_status = ?7,
                current_production_status = ?8, is_bought = ?9, updated_at = ?10
            WHERE id = ?11
            "#,
            params![
                cow.name,
                cow.breed_id,
                cow.gender.as_str(),
                cow.date_of_birth.to_string(),
                cow.category.as_str(),
                cow.availability_status.as_str(),
                cow.current_pregnancy_status.as_str(),
                cow.current_production_status.as_str(),
                cow.is_bought,
                now,
                cow.id,
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Cow".to_string(),
                id: cow.id.to_string(),
            });
        }
        Ok(())
    }

    /// 删除牛只（级联/保护规则由外键约束执行）
    pub fn delete_tx(conn: &Connection, id: i64) -> RepositoryResult<()> {
        let affected = conn.execute("DELETE FROM cow WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Cow".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    pub fn find_by_id_tx(conn: &Connection, id: i64) -> RepositoryResult<Option<Cow>> {
        let sql = format!("SELECT {} FROM cow WHERE id = ?1", Self::COLUMNS);
        let result = conn.query_row(&sql, params![id], Self::map_row);
        match result {
            Ok(cow) => Ok(Some(cow)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 盘点计数: 指定在场状态的牛只数
    pub fn count_by_availability_tx(
        conn: &Connection,
        status: CowAvailabilityStatus,
    ) -> RepositoryResult<u32> {
        let count: u32 = conn.query_row(
            "SELECT COUNT(*) FROM cow WHERE availability_status = ?1",
            params![status.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// 盘点计数: 在场（Alive）且指定性别的牛只数
    pub fn count_alive_by_gender_tx(conn: &Connection, gender: Sex) -> RepositoryResult<u32> {
        let count: u32 = conn.query_row(
            "SELECT COUNT(*) FROM cow WHERE availability_status = 'Alive' AND gender = ?1",
            params![gender.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Cow>> {
        let conn = self.get_conn()?;
        Self::find_by_id_tx(&conn, id)
    }

    pub fn list(&self) -> RepositoryResult<Vec<Cow>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM cow ORDER BY id", Self::COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], Self::map_row)?;
        let mut cows = Vec::new();
        for row in rows {
            cows.push(row?);
        }
        Ok(cows)
    }
}
