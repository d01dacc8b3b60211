// ==========================================
// 派生反应器 - 康复记录维护
// ==========================================
// 触发: 疾病关联牛只新增 / 治疗记录保存
// 说明: 康复记录是历史档案 —— 只在关联新增时创建，
//       解除关联不删除（见 DESIGN.md 决策）
// ==========================================

use crate::engine::error::{EngineError, EngineResult};
use crate::repository::health_repo::{DiseaseRepository, RecoveryRepository, TreatmentRepository};
use rusqlite::Connection;

// ==========================================
// RecoveryReactor - 康复反应器
// ==========================================
pub struct RecoveryReactor;

impl RecoveryReactor {
    /// 疾病关联牛只后: 创建康复记录
    ///
    /// # 规则
    /// - diagnosis_date = disease.date_reported
    /// - recovery_date 初始为 NULL，由治疗完成反应器回填
    /// - 每个 (cow, disease) 组合只创建一次（重复关联跳过）
    pub fn on_cow_linked(conn: &Connection, disease_id: i64, cow_id: i64) -> EngineResult<()> {
        let disease = DiseaseRepository::find_by_id_tx(conn, disease_id)?.ok_or_else(|| {
            EngineError::ReactorPrecondition(format!(
                "康复反应器: 疾病不存在 id={}",
                disease_id
            ))
        })?;

        if RecoveryRepository::find_by_cow_and_disease_tx(conn, cow_id, disease_id)?.is_some() {
            return Ok(());
        }

        RecoveryRepository::insert_tx(conn, cow_id, disease_id, disease.date_reported)?;
        tracing::info!(
            "康复记录已创建: cow_id={}, disease_id={}, diagnosis_date={}",
            cow_id,
            disease_id,
            disease.date_reported
        );
        Ok(())
    }

    /// 治疗保存后: completion_date 已写入时回填对应康复记录
    ///
    /// # 失败语义
    /// - 找不到匹配的 Recovery(cow, disease) 说明此前的疾病关联缺失，
    ///   属数据完整性断裂: 上抛 ReactorPrecondition，记录日志，绝不静默吞掉
    pub fn on_treatment_saved(conn: &Connection, treatment_id: i64) -> EngineResult<()> {
        let treatment = TreatmentRepository::find_by_id_tx(conn, treatment_id)?.ok_or_else(|| {
            EngineError::ReactorPrecondition(format!(
                "治疗完成反应器: 治疗记录不存在 id={}",
                treatment_id
            ))
        })?;

        let Some(completion_date) = treatment.completion_date else {
            return Ok(());
        };

        let recovery = RecoveryRepository::find_by_cow_and_disease_tx(
            conn,
            treatment.cow_id,
            treatment.disease_id,
        )?;

        match recovery {
            Some(recovery) => {
                RecoveryRepository::set_recovery_date_tx(conn, recovery.id, completion_date)?;
                tracing::info!(
                    "康复日期已回填: cow_id={}, disease_id={}, recovery_date={}",
                    treatment.cow_id,
                    treatment.disease_id,
                    completion_date
                );
                Ok(())
            }
            None => {
                tracing::error!(
                    "治疗完成但无匹配康复记录，需人工对账: cow_id={}, disease_id={}, treatment_id={}",
                    treatment.cow_id,
                    treatment.disease_id,
                    treatment.id
                );
                Err(EngineError::ReactorPrecondition(format!(
                    "治疗完成但无匹配康复记录: cow_id={}, disease_id={}",
                    treatment.cow_id, treatment.disease_id
                )))
            }
        }
    }
}
