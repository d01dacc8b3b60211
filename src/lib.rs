// ==========================================
// 奶牛场管理系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 牛群/健康/繁殖记录的领域一致性引擎
//           校验器门禁状态迁移，派生反应器维护跨实体一致性
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 规则引擎层 - 校验器 / 事件 / 派生反应器
pub mod engine;

// 配置层 - 繁殖阈值等系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建库）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    CowAvailabilityStatus, CowBreedName, CowCategory, CowPregnancyStatus, CowProductionStatus,
    CullingReason, DiseaseCategoryName, PathogenName, PregnancyOutcome, PregnancyStatus,
    QuarantineReason, Sex, SymptomLocation, SymptomSeverity, SymptomType, TreatmentStatus,
};

// 领域实体
pub use domain::{
    Cow, CowBreed, CowInventory, CowInventoryUpdateHistory, CullingRecord, Disease,
    DiseaseCategory, Heat, Insemination, Inseminator, Lactation, Pathogen, Pregnancy,
    QuarantineRecord, Recovery, Symptom, Treatment, WeightRecord,
};

// API 接口
pub use api::{
    ApiError, ApiResult, CowApi, HealthApi, InventoryApi, ReproductionApi,
};

/// 版本号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
