// ==========================================
// 派生反应器 - 牛只状态传播
// ==========================================
// 触发: 淘汰记录创建 / 隔离记录创建
// 说明: 幂等 —— 目标状态已生效时跳过，不重复写牛只行；
//       牛只行实际变化时在同一事务内重算盘点
// ==========================================

use crate::domain::types::{
    CowAvailabilityStatus, CowPregnancyStatus, CowProductionStatus,
};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::reactors::inventory::InventoryReactor;
use crate::repository::cow_repo::CowRepository;
use rusqlite::Connection;

// ==========================================
// CullingReactor - 淘汰状态传播
// ==========================================
pub struct CullingReactor;

impl CullingReactor {
    /// 淘汰记录创建后: 生产状态 → Culled，妊娠状态 → Unavailable
    pub fn apply(conn: &Connection, cow_id: i64) -> EngineResult<()> {
        let mut cow = CowRepository::find_by_id_tx(conn, cow_id)?.ok_or_else(|| {
            EngineError::ReactorPrecondition(format!("淘汰反应器: 牛只不存在 id={}", cow_id))
        })?;

        // 幂等: 已淘汰则跳过
        if cow.current_production_status == CowProductionStatus::Culled {
            return Ok(());
        }

        cow.current_production_status = CowProductionStatus::Culled;
        cow.current_pregnancy_status = CowPregnancyStatus::Unavailable;
        CowRepository::update_tx(conn, &cow)?;
        InventoryReactor::refresh(conn)?;

        tracing::info!("牛只已标记淘汰: cow_id={}, tag={}", cow.id, cow.tag_number);
        Ok(())
    }
}

// ==========================================
// QuarantineReactor - 隔离状态传播
// ==========================================
pub struct QuarantineReactor;

impl QuarantineReactor {
    /// 隔离记录创建后: 在场状态 → Quarantined
    pub fn apply(conn: &Connection, cow_id: i64) -> EngineResult<()> {
        let mut cow = CowRepository::find_by_id_tx(conn, cow_id)?.ok_or_else(|| {
            EngineError::ReactorPrecondition(format!("隔离反应器: 牛只不存在 id={}", cow_id))
        })?;

        // 幂等: 已隔离则跳过
        if cow.availability_status == CowAvailabilityStatus::Quarantined {
            return Ok(());
        }

        cow.availability_status = CowAvailabilityStatus::Quarantined;
        CowRepository::update_tx(conn, &cow)?;
        InventoryReactor::refresh(conn)?;

        tracing::info!("牛只已标记隔离: cow_id={}, tag={}", cow.id, cow.tag_number);
        Ok(())
    }
}
