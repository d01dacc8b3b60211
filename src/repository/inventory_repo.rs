// ==========================================
// 奶牛场管理系统 - 牛群盘点仓储
// ==========================================
// 红线: 盘点行是显式单例（id 固定为 1，建表时 CHECK 约束）
//       首次写入时创建（get-or-create），读取时缺失是合法空态
// 红线: 每次保存追加一行盘点流水
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::cow::{CowInventory, CowInventoryUpdateHistory};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row::{date_col, datetime_col};
use chrono::Utc;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex, MutexGuard};

/// 单例行固定主键
const SINGLETON_ID: i64 = 1;

// ==========================================
// CowInventoryRepository - 盘点单例仓储
// ==========================================
pub struct CowInventoryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CowInventoryRepository {
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

    fn map_row(row: &Row<'_>) -> rusqlite::Result<CowInventory> {
        Ok(CowInventory {
            total_number_of_cows: row.get(0)?,
            number_of_male_cows: row.get(1)?,
            number_of_female_cows: row.get(2)?,
            number_of_sold_cows: row.get(3)?,
            number_of_dead_cows: row.get(4)?,
            last_update: datetime_col(row, 5)?,
        })
    }

    /// 读取盘点单例（缺失返回 None —— 合法空态，不是错误）
    pub fn find_tx(conn: &Connection) -> RepositoryResult<Option<CowInventory>> {
        let result = conn.query_row(
            r#"
            SELECT total_number_of_cows, number_of_male_cows, number_of_female_cows,
                   number_of_sold_cows, number_of_dead_cows, last_update
            FROM cow_inventory WHERE id = ?1
            "#,
            params![SINGLETON_ID],
            Self::map_row,
        );
        match result {
            Ok(inv) => Ok(Some(inv)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 首次写入时创建单例行（幂等）
    pub fn get_or_create_tx(conn: &Connection) -> RepositoryResult<CowInventory> {
        if let Some(inv) = Self::find_tx(conn)? {
            return Ok(inv);
        }
        let now = Utc::now();
        conn.execute(
            r#"
            INSERT OR IGNORE INTO cow_inventory (
                id, total_number_of_cows, number_of_male_cows, number_of_female_cows,
                number_of_sold_cows, number_of_dead_cows, last_update
            ) VALUES (?1, 0, 0, 0, 0, 0, ?2)
            "#,
            params![SINGLETON_ID, now.to_rfc3339()],
        )?;
        Self::find_tx(conn)?.ok_or_else(|| {
            RepositoryError::InternalError("盘点单例创建后仍不可读".to_string())
        })
    }

    /// 保存盘点计数并追加一行盘点流水
    ///
    /// # 说明
    /// - 流水随每次保存增长（非逻辑变化次数），与上游设计一致
    pub fn save_tx(conn: &Connection, inventory: &CowInventory) -> RepositoryResult<()> {
        Self::get_or_create_tx(conn)?;
        let now = Utc::now();
        conn.execute(
            r#"
            UPDATE cow_inventory SET
                total_number_of_cows = ?1, number_of_male_cows = ?2,
                number_of_female_cows = ?3, number_of_sold_cows = ?4,
                number_of_dead_cows = ?5, last_update = ?6
            WHERE id = ?7
            "#,
            params![
                inventory.total_number_of_cows,
                inventory.number_of_male_cows,
                inventory.number_of_female_cows,
                inventory.number_of_sold_cows,
                inventory.number_of_dead_cows,
                now.to_rfc3339(),
                SINGLETON_ID,
            ],
        )?;
        conn.execute(
            "INSERT INTO cow_inventory_update_history (number_of_cows, date_updated) VALUES (?1, ?2)",
            params![inventory.total_number_of_cows, now.date_naive().to_string()],
        )?;
        Ok(())
    }

    pub fn find(&self) -> RepositoryResult<Option<CowInventory>> {
        let conn = self.get_conn()?;
        Self::find_tx(&conn)
    }

    /// 盘点流水（按时间倒序）
    pub fn list_history(&self) -> RepositoryResult<Vec<CowInventoryUpdateHistory>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, number_of_cows, date_updated FROM cow_inventory_update_history ORDER BY id DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(CowInventoryUpdateHistory {
                id: row.get(0)?,
                number_of_cows: row.get(1)?,
                date_updated: date_col(row, 2)?,
            })
        })?;
        let mut history = Vec::new();
        for row in rows {
            history.push(row?);
        }
        Ok(history)
    }

    pub fn history_count(&self) -> RepositoryResult<u32> {
        let conn = self.get_conn()?;
        let count: u32 = conn.query_row(
            "SELECT COUNT(*) FROM cow_inventory_update_history",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
