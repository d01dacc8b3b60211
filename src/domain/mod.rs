// ==========================================
// 奶牛场管理系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、业务规则接口
// 红线: 不含数据访问逻辑，不含反应器逻辑
// ==========================================

pub mod cow;
pub mod health;
pub mod lactation;
pub mod reproduction;
pub mod types;

// 重导出核心类型
pub use cow::{Cow, CowBreed, CowInventory, CowInventoryUpdateHistory, Inseminator};
pub use health::{
    CullingRecord, Disease, DiseaseCategory, Pathogen, QuarantineRecord, Recovery, Symptom,
    Treatment, WeightRecord,
};
pub use lactation::Lactation;
pub use reproduction::{Heat, Insemination, Pregnancy, GESTATION_DAYS};
pub use types::{
    CowAvailabilityStatus, CowBreedName, CowCategory, CowPregnancyStatus, CowProductionStatus,
    CullingReason, DiseaseCategoryName, PathogenName, PregnancyOutcome, PregnancyStatus,
    QuarantineReason, Sex, SymptomLocation, SymptomSeverity, SymptomType, TreatmentStatus,
};
