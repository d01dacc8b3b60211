// ==========================================
// 奶牛场管理系统 - 健康域领域模型
// ==========================================
// 实体: 体重 / 淘汰 / 隔离 / 病原体 / 疾病类别 / 症状 / 疾病 / 康复 / 治疗
// 红线: Recovery 只能由反应器创建与回填，客户端不可直接写
// ==========================================

use crate::domain::types::{
    CullingReason, DiseaseCategoryName, PathogenName, QuarantineReason, SymptomLocation,
    SymptomSeverity, SymptomType, TreatmentStatus,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// WeightRecord - 体重记录
// ==========================================
// 约束: (cow_id, date_taken) 唯一; 体重 10~1500kg; 牛只必须在场
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightRecord {
    pub id: i64,
    pub cow_id: i64,
    pub weight_kg: f64,
    pub date_taken: NaiveDate,
    pub created_at: DateTime<Utc>,
}

// ==========================================
// CullingRecord - 淘汰记录（与牛只一对一）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CullingRecord {
    pub id: i64,
    pub cow_id: i64,
    pub reason: CullingReason,
    pub notes: Option<String>,
    pub date_carried: NaiveDate,
    pub created_at: DateTime<Utc>,
}

// ==========================================
// QuarantineRecord - 隔离记录
// ==========================================
// 约束: end_date（如有）≥ start_date; reason=Calving 要求母牛且已妊娠
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuarantineRecord {
    pub id: i64,
    pub cow_id: i64,
    pub reason: QuarantineReason,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ==========================================
// Pathogen / DiseaseCategory - 参考词表
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pathogen {
    pub id: i64,
    pub name: PathogenName,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseCategory {
    pub id: i64,
    pub name: DiseaseCategoryName,
    pub created_at: DateTime<Utc>,
}

// ==========================================
// Symptom - 症状
// ==========================================
// 约束: 名称仅字母（可含空格）; 观察日期不在未来;
//       呼吸道症状部位限 Chest/Neck/Head/Whole body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symptom {
    pub id: i64,
    pub name: String,
    pub symptom_type: SymptomType,
    pub description: Option<String>,
    pub severity: SymptomSeverity,
    pub location: SymptomLocation,
    pub date_observed: NaiveDate,
    pub created_at: DateTime<Utc>,
}

// ==========================================
// Disease - 疾病
// ==========================================
// 关联: cows / symptoms 多对多（连接表 disease_cow / disease_symptom）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disease {
    pub id: i64,
    pub name: String,
    pub pathogen_id: i64,
    pub category_id: i64,
    pub date_reported: NaiveDate,
    pub occurrence_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ==========================================
// Recovery - 康复记录（派生实体）
// ==========================================
// 创建: 疾病关联牛只时由 RecoveryReactor 写入
// 回填: recovery_date 由治疗完成反应器写入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recovery {
    pub id: i64,
    pub cow_id: i64,
    pub disease_id: i64,
    pub diagnosis_date: NaiveDate,
    pub recovery_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

// ==========================================
// Treatment - 治疗记录
// ==========================================
// 副作用: completion_date 写入时回填对应 Recovery.recovery_date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Treatment {
    pub id: i64,
    pub disease_id: i64,
    pub cow_id: i64,
    pub date_of_treatment: NaiveDate,
    pub treatment_method: String,
    pub notes: Option<String>,
    pub treatment_status: TreatmentStatus,
    pub completion_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}
