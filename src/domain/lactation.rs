// ==========================================
// 奶牛场管理系统 - 泌乳协作域
// ==========================================
// 说明: 泌乳属于生产域（外部协作方）。本核心只消费其
//       创建/收尾契约: 产犊反应器开启新泌乳期、关闭上一期。
//       泌乳内部规则（产量、干奶策略等）不在本仓库范围。
// ==========================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Lactation - 泌乳期
// ==========================================
// 契约: create(cow, start_date, pregnancy, lactation_number) / close(end_date)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lactation {
    pub id: i64,
    pub cow_id: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub pregnancy_id: Option<i64>,
    pub lactation_number: i32,
    pub created_at: DateTime<Utc>,
}

impl Lactation {
    /// 开放泌乳期: 尚未收尾
    pub fn is_open(&self) -> bool {
        self.end_date.is_none()
    }
}
