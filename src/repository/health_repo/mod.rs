// ==========================================
// 奶牛场管理系统 - 健康域数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

mod disease;
mod records;
mod recovery;

pub use disease::{DiseaseCategoryRepository, DiseaseRepository, PathogenRepository, SymptomRepository};
pub use records::{CullingRecordRepository, QuarantineRecordRepository, WeightRecordRepository};
pub use recovery::{RecoveryRepository, TreatmentRepository};
