// ==========================================
// 奶牛场管理系统 - API 层
// ==========================================
// 职责: 应用服务接口，[校验 → 主写入 → 反应器] 的显式调用链
// 事务边界: 主写入一个事务；一次事件的全部反应器效果一个事务。
//           反应器在主写入提交后执行，失败只回滚反应器自身效果，
//           以 ReactorFailure 上抛并记录日志（待人工对账），
//           绝不追溯撤销已提交的主写入
// ==========================================

pub mod cow_api;
pub mod error;
pub mod health_api;
pub mod inventory_api;
pub mod reproduction_api;

// 重导出核心类型
pub use cow_api::{CowApi, CowRequest, InseminatorRequest};
pub use error::{ApiError, ApiResult};
pub use health_api::{DiseaseRequest, HealthApi, SymptomRequest, TreatmentRequest};
pub use inventory_api::InventoryApi;
pub use reproduction_api::{
    InseminationRequest, PregnancyRequest, PregnancyUpdateRequest, ReproductionApi,
};

use crate::config::ConfigManager;
use crate::engine::events::FarmEvent;
use crate::engine::reactors;
use chrono::Utc;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// 在单个事务内执行一批事件的全部反应器效果
///
/// # 失败语义
/// - 任一反应器失败则整个反应器事务回滚（无部分派生状态），
///   错误以 ReactorFailure 上抛；触发写入保持已提交
pub(crate) fn run_reactors(
    conn: &Arc<Mutex<Connection>>,
    config: &ConfigManager,
    events: &[FarmEvent],
) -> ApiResult<()> {
    if events.is_empty() {
        return Ok(());
    }

    let params = config.breeding_params()?;
    let today = Utc::now().date_naive();

    let guard = conn
        .lock()
        .map_err(|e| ApiError::DatabaseError(format!("锁获取失败: {}", e)))?;
    let tx = guard.unchecked_transaction()?;

    for event in events {
        if let Err(e) = reactors::handle_event(&tx, event, &params, today) {
            tracing::error!(
                "反应器执行失败: event_id={}, type={}, error={}",
                event.event_id,
                event.event_type.as_str(),
                e
            );
            return Err(ApiError::ReactorFailure(e.to_string()));
        }
    }

    tx.commit()?;
    Ok(())
}
