// ==========================================
// 派生反应器 - 牛群盘点
// ==========================================
// 触发: 任意牛只创建/更新/删除
// 红线: 每次从 cow 表全量重算，绝不做增量加减 ——
//       全量重算以权威状态为源，在并发写下自愈（最后写入者胜），
//       增量计数器会丢失更新，属已废弃方案
// ==========================================

use crate::domain::cow::CowInventory;
use crate::domain::types::{CowAvailabilityStatus, Sex};
use crate::repository::cow_repo::CowRepository;
use crate::repository::error::RepositoryResult;
use crate::repository::inventory_repo::CowInventoryRepository;
use chrono::Utc;
use rusqlite::Connection;

// ==========================================
// InventoryReactor - 盘点反应器
// ==========================================
pub struct InventoryReactor;

impl InventoryReactor {
    /// 全量重算盘点并保存（附带追加一行盘点流水）
    ///
    /// # 返回
    /// - Ok(CowInventory): 重算后的盘点快照
    pub fn refresh(conn: &Connection) -> RepositoryResult<CowInventory> {
        let inventory = CowInventory {
            total_number_of_cows: CowRepository::count_by_availability_tx(
                conn,
                CowAvailabilityStatus::Alive,
            )?,
            number_of_male_cows: CowRepository::count_alive_by_gender_tx(conn, Sex::Male)?,
            number_of_female_cows: CowRepository::count_alive_by_gender_tx(conn, Sex::Female)?,
            number_of_sold_cows: CowRepository::count_by_availability_tx(
                conn,
                CowAvailabilityStatus::Sold,
            )?,
            number_of_dead_cows: CowRepository::count_by_availability_tx(
                conn,
                CowAvailabilityStatus::Dead,
            )?,
            last_update: Utc::now(),
        };

        CowInventoryRepository::save_tx(conn, &inventory)?;

        tracing::debug!(
            "盘点已重算: {}",
            serde_json::json!({
                "total": inventory.total_number_of_cows,
                "male": inventory.number_of_male_cows,
                "female": inventory.number_of_female_cows,
                "sold": inventory.number_of_sold_cows,
                "dead": inventory.number_of_dead_cows,
            })
        );

        Ok(inventory)
    }
}
