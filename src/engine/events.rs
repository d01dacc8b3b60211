// ==========================================
// 奶牛场管理系统 - 领域事件
// ==========================================
// 职责: 定义主记录写入后触发派生的事件类型
// 说明: 不做隐式全局分发 —— API 层在主写入提交后显式构造事件
//       并调用 reactors::handle_event，调用链可测试可追踪
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// 事件类型
// ==========================================

/// 主记录写入事件类型
///
/// 每个类型对应一组固定的派生反应器（见 reactors::handle_event）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FarmEventType {
    /// 牛只创建/更新
    CowSaved,
    /// 牛只删除
    CowDeleted,
    /// 淘汰记录创建
    CullingRecorded,
    /// 隔离记录创建
    QuarantineRecorded,
    /// 疾病与牛只关联新增
    DiseaseCowLinked,
    /// 治疗记录保存
    TreatmentSaved,
    /// 配种记录保存
    InseminationSaved,
    /// 妊娠记录保存
    PregnancySaved,
}

impl FarmEventType {
    /// 转换为字符串标识
    pub fn as_str(&self) -> &'static str {
        match self {
            FarmEventType::CowSaved => "CowSaved",
            FarmEventType::CowDeleted => "CowDeleted",
            FarmEventType::CullingRecorded => "CullingRecorded",
            FarmEventType::QuarantineRecorded => "QuarantineRecorded",
            FarmEventType::DiseaseCowLinked => "DiseaseCowLinked",
            FarmEventType::TreatmentSaved => "TreatmentSaved",
            FarmEventType::InseminationSaved => "InseminationSaved",
            FarmEventType::PregnancySaved => "PregnancySaved",
        }
    }
}

// ==========================================
// 事件
// ==========================================

/// 主记录写入事件
///
/// 只携带标识，反应器在自己的事务内按 id 重读当前状态
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarmEvent {
    /// 事件 ID（追踪用）
    pub event_id: Uuid,
    /// 事件类型
    pub event_type: FarmEventType,
    /// 触发实体 id（类型含义随事件而定）
    pub entity_id: i64,
    /// 涉及的牛只 id（关联类事件使用）
    pub cow_id: Option<i64>,
    /// 事件来源描述
    pub source: Option<String>,
    /// 发生时间
    pub occurred_at: DateTime<Utc>,
}

impl FarmEvent {
    pub fn new(event_type: FarmEventType, entity_id: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type,
            entity_id,
            cow_id: None,
            source: None,
            occurred_at: Utc::now(),
        }
    }

    /// 关联类事件（携带牛只 id）
    pub fn with_cow(event_type: FarmEventType, entity_id: i64, cow_id: i64) -> Self {
        Self {
            cow_id: Some(cow_id),
            ..Self::new(event_type, entity_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_as_str() {
        assert_eq!(FarmEventType::CowSaved.as_str(), "CowSaved");
        assert_eq!(FarmEventType::DiseaseCowLinked.as_str(), "DiseaseCowLinked");
    }

    #[test]
    fn test_with_cow_carries_cow_id() {
        let event = FarmEvent::with_cow(FarmEventType::DiseaseCowLinked, 3, 11);
        assert_eq!(event.entity_id, 3);
        assert_eq!(event.cow_id, Some(11));
    }
}
