// ==========================================
// 奶牛场管理系统 - 盘点 API（只读）
// ==========================================
// 红线: 盘点只由反应器写入；查询缺失返回 None（合法空态，不是错误）
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::cow::{CowInventory, CowInventoryUpdateHistory};
use crate::repository::inventory_repo::CowInventoryRepository;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

// ==========================================
// InventoryApi - 盘点业务接口
// ==========================================
pub struct InventoryApi {
    conn: Arc<Mutex<Connection>>,
}

impl InventoryApi {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 查询当前盘点（尚无任何牛只写入时为 None）
    pub fn get_inventory(&self) -> ApiResult<Option<CowInventory>> {
        let repo = CowInventoryRepository::from_connection(Arc::clone(&self.conn));
        Ok(repo.find()?)
    }

    /// 盘点流水（按时间倒序）
    pub fn list_history(&self) -> ApiResult<Vec<CowInventoryUpdateHistory>> {
        let repo = CowInventoryRepository::from_connection(Arc::clone(&self.conn));
        Ok(repo.list_history()?)
    }

    pub fn history_count(&self) -> ApiResult<u32> {
        let repo = CowInventoryRepository::from_connection(Arc::clone(&self.conn));
        Ok(repo.history_count()?)
    }
}
