// ==========================================
// 奶牛场管理系统 - 牛群领域模型
// ==========================================
// 根实体: Cow（所有健康/繁殖记录通过外键引用）
// 派生实体: CowInventory（单例聚合，仅由反应器写入）
// ==========================================

use crate::domain::types::{
    CowAvailabilityStatus, CowBreedName, CowCategory, CowPregnancyStatus, CowProductionStatus,
    Sex,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// CowBreed - 品种参考数据
// ==========================================
// 约束: name 唯一（duplicate_cow_breed）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CowBreed {
    pub id: i64,
    pub name: CowBreedName,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==========================================
// Inseminator - 配种员参考数据
// ==========================================
// 约束: license_number 唯一
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inseminator {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub license_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==========================================
// Cow - 牛只主数据
// ==========================================
// 不变式: availability_status 与 pregnancy/production 状态必须互相一致
//         （校验见 CowValidator::validate_status_consistency）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cow {
    pub id: i64,
    pub name: String,
    pub breed_id: i64,
    pub gender: Sex,
    pub date_of_birth: NaiveDate,
    pub category: CowCategory,
    pub availability_status: CowAvailabilityStatus,
    pub current_pregnancy_status: CowPregnancyStatus,
    pub current_production_status: CowProductionStatus,
    pub is_bought: bool,
    pub tag_number: String, // 生成规则: {品种前缀}-{出生年}-{序号}
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cow {
    /// 指定日期时的牛龄（天）
    pub fn age_days(&self, on: NaiveDate) -> i64 {
        (on - self.date_of_birth).num_days()
    }
}

// ==========================================
// CowInventory - 牛群盘点单例聚合
// ==========================================
// 红线: 每次全量重算，不做增量加减（并发下自愈，见 InventoryReactor）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CowInventory {
    pub total_number_of_cows: u32,
    pub number_of_male_cows: u32,
    pub number_of_female_cows: u32,
    pub number_of_sold_cows: u32,
    pub number_of_dead_cows: u32,
    pub last_update: DateTime<Utc>,
}

// ==========================================
// CowInventoryUpdateHistory - 盘点流水（只追加）
// ==========================================
// 每次盘点保存追加一行（随牛只写入次数增长，非逻辑变化次数）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CowInventoryUpdateHistory {
    pub id: i64,
    pub number_of_cows: u32,
    pub date_updated: NaiveDate,
}
