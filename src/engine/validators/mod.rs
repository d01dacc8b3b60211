// ==========================================
// 规则引擎 - 校验器
// ==========================================
// 契约: 每个实体的写入路径在持久化前同步执行对应校验器，
//       失败即整体拒绝（无部分持久化）；更新时全量重校验
// ==========================================

mod cow;
mod health;
mod reproduction;

pub use cow::{CowBreedValidator, CowValidator};
pub use health::{
    DiseaseCategoryValidator, DiseaseValidator, PathogenValidator, QuarantineValidator,
    SymptomValidator, WeightRecordValidator, MAX_COW_WEIGHT_KG, MIN_COW_WEIGHT_KG,
};
pub use reproduction::{HeatValidator, InseminationValidator, PregnancyValidator};
