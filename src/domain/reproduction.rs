// ==========================================
// 奶牛场管理系统 - 繁殖域领域模型
// ==========================================
// 状态链: 发情观察 → 配种 → 妊娠 →（产犊）→ 泌乳
// ==========================================

use crate::domain::types::{PregnancyOutcome, PregnancyStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// 标准妊娠期（天）
pub const GESTATION_DAYS: i64 = 285;

// ==========================================
// Pregnancy - 妊娠记录
// ==========================================
// 不变式: 见 PregnancyValidator（年龄/唯一开放妊娠/在场/日期/状态一致性/结局）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pregnancy {
    pub id: i64,
    pub cow_id: i64,
    pub start_date: NaiveDate,
    pub date_of_calving: Option<NaiveDate>,
    pub pregnancy_status: PregnancyStatus,
    pub pregnancy_notes: Option<String>,
    pub calving_notes: Option<String>,
    pub pregnancy_scan_date: Option<NaiveDate>,
    pub pregnancy_failed_date: Option<NaiveDate>,
    pub pregnancy_outcome: Option<PregnancyOutcome>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Pregnancy {
    /// 妊娠天数（已产犊则以产犊日为界，否则按当天计）
    pub fn duration_days(&self, today: NaiveDate) -> i64 {
        match self.date_of_calving {
            Some(calving) => (calving - self.start_date).num_days(),
            None => (today - self.start_date).num_days(),
        }
    }

    /// 预产期 = start_date + 285 天
    pub fn due_date(&self) -> NaiveDate {
        self.start_date + chrono::Duration::days(GESTATION_DAYS)
    }

    /// 开放妊娠: 未产犊且未失败
    pub fn is_open(&self) -> bool {
        self.date_of_calving.is_none() && self.pregnancy_status != PregnancyStatus::Failed
    }
}

// ==========================================
// Heat - 发情观察记录
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heat {
    pub id: i64,
    pub cow_id: i64,
    pub observation_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

// ==========================================
// Insemination - 配种记录
// ==========================================
// pregnancy_id 由系统回填（成功配种反应器创建妊娠后反向关联），客户端不可直接提交
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insemination {
    pub id: i64,
    pub cow_id: i64,
    pub pregnancy_id: Option<i64>,
    pub success: bool,
    pub notes: Option<String>,
    pub inseminator_id: i64,
    pub date_of_insemination: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Insemination {
    /// 距配种天数
    pub fn days_since(&self, now: DateTime<Utc>) -> i64 {
        (now - self.date_of_insemination).num_days()
    }
}
