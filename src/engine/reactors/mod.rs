// ==========================================
// 奶牛场管理系统 - 派生反应器
// ==========================================
// 契约: 反应器在主写入提交之后执行，读取当前状态并写入其他实体；
//       一次事件的全部反应器效果在同一事务内原子生效，
//       失败只回滚反应器自身效果，不追溯撤销已提交的主写入
// ==========================================

mod inventory;
mod recovery;
mod reproduction;
mod status;

pub use inventory::InventoryReactor;
pub use recovery::RecoveryReactor;
pub use reproduction::{CalvingReactor, PregnancyReactor};
pub use status::{CullingReactor, QuarantineReactor};

use crate::config::BreedingParams;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::events::{FarmEvent, FarmEventType};
use chrono::NaiveDate;
use rusqlite::Connection;

/// 按事件类型分发反应器（显式调用链，无隐式全局分发）
///
/// # 参数
/// - conn: 反应器事务连接（Transaction 解引用传入）
/// - event: 主写入事件
/// - params: 繁殖阈值（配种反应器创建妊娠时校验用）
/// - today: 当前日期（校验基准）
pub fn handle_event(
    conn: &Connection,
    event: &FarmEvent,
    params: &BreedingParams,
    today: NaiveDate,
) -> EngineResult<()> {
    tracing::debug!(
        "反应器分发: event_id={}, type={}, entity_id={}",
        event.event_id,
        event.event_type.as_str(),
        event.entity_id
    );

    match event.event_type {
        FarmEventType::CowSaved | FarmEventType::CowDeleted => {
            InventoryReactor::refresh(conn)?;
            Ok(())
        }
        FarmEventType::CullingRecorded => {
            let cow_id = require_cow_id(event)?;
            CullingReactor::apply(conn, cow_id)
        }
        FarmEventType::QuarantineRecorded => {
            let cow_id = require_cow_id(event)?;
            QuarantineReactor::apply(conn, cow_id)
        }
        FarmEventType::DiseaseCowLinked => {
            let cow_id = require_cow_id(event)?;
            RecoveryReactor::on_cow_linked(conn, event.entity_id, cow_id)
        }
        FarmEventType::TreatmentSaved => RecoveryReactor::on_treatment_saved(conn, event.entity_id),
        FarmEventType::InseminationSaved => {
            PregnancyReactor::on_insemination_saved(conn, event.entity_id, params, today)
        }
        FarmEventType::PregnancySaved => CalvingReactor::on_pregnancy_saved(conn, event.entity_id),
    }
}

fn require_cow_id(event: &FarmEvent) -> EngineResult<i64> {
    event.cow_id.ok_or_else(|| {
        EngineError::ReactorPrecondition(format!(
            "事件缺少 cow_id: type={}, entity_id={}",
            event.event_type.as_str(),
            event.entity_id
        ))
    })
}
