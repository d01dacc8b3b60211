// ==========================================
// 奶牛场管理系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 约定: *_tx 关联函数接收 &Connection，供 API 层在同一事务内组合
// ==========================================

pub mod error;
mod row;

pub mod cow_repo;
pub mod health_repo;
pub mod inventory_repo;
pub mod lactation_repo;
pub mod reproduction_repo;

pub use cow_repo::{CowBreedRepository, CowRepository, InseminatorRepository};
pub use error::{RepositoryError, RepositoryResult};
pub use health_repo::{
    CullingRecordRepository, DiseaseCategoryRepository, DiseaseRepository, PathogenRepository,
    QuarantineRecordRepository, RecoveryRepository, SymptomRepository, TreatmentRepository,
    WeightRecordRepository,
};
pub use inventory_repo::CowInventoryRepository;
pub use lactation_repo::LactationRepository;
pub use reproduction_repo::{HeatRepository, InseminationRepository, PregnancyRepository};
