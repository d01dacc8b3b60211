// ==========================================
// 奶牛场管理系统 - 健康域 API
// ==========================================
// 职责: 体重/淘汰/隔离/病原体/疾病类别/症状/疾病/治疗的写入路径
// 调用链: [校验 → 主写入(事务) → 反应器(事务)] 显式串联
// 红线: Recovery 不提供客户端写入口（只读列表），由反应器维护
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::run_reactors;
use crate::config::ConfigManager;
use crate::domain::health::{
    CullingRecord, Disease, DiseaseCategory, Pathogen, QuarantineRecord, Recovery, Symptom,
    Treatment, WeightRecord,
};
use crate::domain::types::{
    CullingReason, DiseaseCategoryName, PathogenName, QuarantineReason, SymptomLocation,
    SymptomSeverity, SymptomType, TreatmentStatus,
};
use crate::engine::events::{FarmEvent, FarmEventType};
use crate::engine::validators::{
    DiseaseCategoryValidator, DiseaseValidator, PathogenValidator, QuarantineValidator,
    SymptomValidator, WeightRecordValidator,
};
use crate::engine::ValidationError;
use crate::repository::cow_repo::CowRepository;
use crate::repository::health_repo::{
    CullingRecordRepository, DiseaseCategoryRepository, DiseaseRepository, PathogenRepository,
    QuarantineRecordRepository, RecoveryRepository, SymptomRepository, TreatmentRepository,
    WeightRecordRepository,
};
use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// 请求结构
// ==========================================

/// 症状创建请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomRequest {
    pub name: String,
    pub symptom_type: SymptomType,
    pub description: Option<String>,
    pub severity: SymptomSeverity,
    pub location: SymptomLocation,
    pub date_observed: NaiveDate,
}

/// 疾病创建请求（cows/symptoms 为关联集合）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseRequest {
    pub name: String,
    pub pathogen_id: i64,
    pub category_id: i64,
    pub occurrence_date: NaiveDate,
    pub notes: Option<String>,
    pub cow_ids: Vec<i64>,
    pub symptom_ids: Vec<i64>,
}

/// 治疗创建/更新请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreatmentRequest {
    pub disease_id: i64,
    pub cow_id: i64,
    pub treatment_method: String,
    pub notes: Option<String>,
    pub treatment_status: TreatmentStatus,
    pub completion_date: Option<NaiveDate>,
}

// ==========================================
// HealthApi - 健康域业务接口
// ==========================================
pub struct HealthApi {
    conn: Arc<Mutex<Connection>>,
    config: ConfigManager,
}

impl HealthApi {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        let config = ConfigManager::from_connection(Arc::clone(&conn));
        Self { conn, config }
    }

    fn get_conn(&self) -> ApiResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ApiError::DatabaseError(format!("锁获取失败: {}", e)))
    }

    // ==========================================
    // 体重记录
    // ==========================================

    /// 创建体重记录
    ///
    /// 校验: 体重范围 / 牛只在场 / 同日唯一
    pub fn create_weight_record(
        &self,
        cow_id: i64,
        weight_kg: f64,
        date_taken: Option<NaiveDate>,
    ) -> ApiResult<WeightRecord> {
        let date_taken = date_taken.unwrap_or_else(|| Utc::now().date_naive());
        WeightRecordValidator::validate_weight(weight_kg)?;

        let record = {
            let conn = self.get_conn()?;
            let tx = conn.unchecked_transaction()?;

            let cow = CowRepository::find_by_id_tx(&tx, cow_id)?
                .ok_or_else(|| ApiError::NotFound(format!("Cow(id={})不存在", cow_id)))?;
            WeightRecordValidator::validate_cow_availability(&cow)?;
            WeightRecordValidator::validate_frequency(&tx, cow_id, date_taken)?;

            let rec = WeightRecord {
                id: 0,
                cow_id,
                weight_kg,
                date_taken,
                created_at: Utc::now(),
            };
            let id = WeightRecordRepository::insert_tx(&tx, &rec)?;
            tx.commit()?;
            WeightRecord { id, ..rec }
        };
        Ok(record)
    }

    pub fn list_weight_records(&self, cow_id: i64) -> ApiResult<Vec<WeightRecord>> {
        let repo = WeightRecordRepository::from_connection(Arc::clone(&self.conn));
        Ok(repo.list_by_cow(cow_id)?)
    }

    // ==========================================
    // 淘汰记录
    // ==========================================

    /// 创建淘汰记录（一牛一淘汰）
    ///
    /// 副作用: 牛只生产状态 → Culled，妊娠状态 → Unavailable
    pub fn create_culling_record(
        &self,
        cow_id: i64,
        reason: &str,
        notes: Option<String>,
        date_carried: Option<NaiveDate>,
    ) -> ApiResult<CullingRecord> {
        let reason = CullingReason::parse(reason).ok_or_else(|| {
            ValidationError::new("invalid_culling_reason", format!("无效的淘汰原因: {}", reason))
        })?;
        let date_carried = date_carried.unwrap_or_else(|| Utc::now().date_naive());

        let (record, event) = {
            let conn = self.get_conn()?;
            let tx = conn.unchecked_transaction()?;

            CowRepository::find_by_id_tx(&tx, cow_id)?
                .ok_or_else(|| ApiError::NotFound(format!("Cow(id={})不存在", cow_id)))?;
            if CullingRecordRepository::find_by_cow_tx(&tx, cow_id)?.is_some() {
                return Err(ApiError::Conflict(format!(
                    "Cow(id={})已有淘汰记录",
                    cow_id
                )));
            }

            let rec = CullingRecord {
                id: 0,
                cow_id,
                reason,
                notes,
                date_carried,
                created_at: Utc::now(),
            };
            let id = CullingRecordRepository::insert_tx(&tx, &rec)?;
            tx.commit()?;
            (
                CullingRecord { id, ..rec },
                FarmEvent::with_cow(FarmEventType::CullingRecorded, id, cow_id),
            )
        };

        run_reactors(&self.conn, &self.config, &[event])?;
        Ok(record)
    }

    // ==========================================
    // 隔离记录
    // ==========================================

    /// 创建隔离记录
    ///
    /// 校验: 原因（Calving 要求妊娠母牛）/ 日期区间
    /// 副作用: 牛只在场状态 → Quarantined
    pub fn create_quarantine_record(
        &self,
        cow_id: i64,
        reason: &str,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        notes: Option<String>,
    ) -> ApiResult<QuarantineRecord> {
        let reason = QuarantineReason::parse(reason).ok_or_else(|| {
            ValidationError::new(
                "invalid_quarantine_reason",
                format!("无效的隔离原因: {}", reason),
            )
        })?;
        QuarantineValidator::validate_date_range(start_date, end_date)?;

        let (record, event) = {
            let conn = self.get_conn()?;
            let tx = conn.unchecked_transaction()?;

            let cow = CowRepository::find_by_id_tx(&tx, cow_id)?
                .ok_or_else(|| ApiError::NotFound(format!("Cow(id={})不存在", cow_id)))?;
            QuarantineValidator::validate_reason(reason, &cow)?;

            let rec = QuarantineRecord {
                id: 0,
                cow_id,
                reason,
                start_date,
                end_date,
                notes,
                created_at: Utc::now(),
            };
            let id = QuarantineRecordRepository::insert_tx(&tx, &rec)?;
            tx.commit()?;
            (
                QuarantineRecord { id, ..rec },
                FarmEvent::with_cow(FarmEventType::QuarantineRecorded, id, cow_id),
            )
        };

        run_reactors(&self.conn, &self.config, &[event])?;
        Ok(record)
    }

    pub fn list_quarantine_records(&self, cow_id: i64) -> ApiResult<Vec<QuarantineRecord>> {
        let repo = QuarantineRecordRepository::from_connection(Arc::clone(&self.conn));
        Ok(repo.list_by_cow(cow_id)?)
    }

    // ==========================================
    // 病原体 / 疾病类别
    // ==========================================

    /// 创建病原体
    ///
    /// # 错误
    /// - invalid_pathogen_name: 名称不在封闭词表内
    /// - duplicate_pathogen: 已存在
    pub fn create_pathogen(&self, name: &str) -> ApiResult<Pathogen> {
        let pathogen_name = PathogenName::parse(name).ok_or_else(|| {
            ValidationError::new("invalid_pathogen_name", format!("无效的病原体名: {}", name))
        })?;

        let pathogen = {
            let conn = self.get_conn()?;
            let tx = conn.unchecked_transaction()?;
            PathogenValidator::validate_unique_name(&tx, pathogen_name)?;
            let id = PathogenRepository::insert_tx(&tx, pathogen_name)?;
            let pathogen = PathogenRepository::find_by_id_tx(&tx, id)?
                .ok_or_else(|| ApiError::InternalError("病原体插入后不可读".to_string()))?;
            tx.commit()?;
            pathogen
        };
        Ok(pathogen)
    }

    /// 删除病原体（被疾病引用时外键保护 → Conflict）
    pub fn delete_pathogen(&self, id: i64) -> ApiResult<()> {
        let repo = PathogenRepository::from_connection(Arc::clone(&self.conn));
        repo.delete(id)?;
        Ok(())
    }

    /// 创建疾病类别
    ///
    /// # 错误
    /// - invalid_disease_category_name / duplicate_disease_category
    pub fn create_disease_category(&self, name: &str) -> ApiResult<DiseaseCategory> {
        let category_name = DiseaseCategoryName::parse(name).ok_or_else(|| {
            ValidationError::new(
                "invalid_disease_category_name",
                format!("无效的疾病类别名: {}", name),
            )
        })?;

        let category = {
            let conn = self.get_conn()?;
            let tx = conn.unchecked_transaction()?;
            DiseaseCategoryValidator::validate_unique_name(&tx, category_name)?;
            let id = DiseaseCategoryRepository::insert_tx(&tx, category_name)?;
            let category = DiseaseCategoryRepository::find_by_id_tx(&tx, id)?
                .ok_or_else(|| ApiError::InternalError("疾病类别插入后不可读".to_string()))?;
            tx.commit()?;
            category
        };
        Ok(category)
    }

    // ==========================================
    // 症状
    // ==========================================

    /// 创建症状
    ///
    /// 校验: 名称仅字母 / 观察日期不在未来 / 类型与部位兼容
    pub fn create_symptom(&self, req: SymptomRequest) -> ApiResult<Symptom> {
        let today = Utc::now().date_naive();
        SymptomValidator::validate_name(&req.name)?;
        SymptomValidator::validate_date_observed(req.date_observed, today)?;
        SymptomValidator::validate_type_and_location(req.symptom_type, req.location)?;

        let symptom = {
            let conn = self.get_conn()?;
            let tx = conn.unchecked_transaction()?;
            let rec = Symptom {
                id: 0,
                name: req.name,
                symptom_type: req.symptom_type,
                description: req.description,
                severity: req.severity,
                location: req.location,
                date_observed: req.date_observed,
                created_at: Utc::now(),
            };
            let id = SymptomRepository::insert_tx(&tx, &rec)?;
            tx.commit()?;
            Symptom { id, ..rec }
        };
        Ok(symptom)
    }

    // ==========================================
    // 疾病
    // ==========================================

    /// 创建疾病并建立关联
    ///
    /// 副作用: 每头新关联的牛各创建一条康复记录
    ///         （diagnosis_date = 疾病上报日）
    pub fn create_disease(&self, req: DiseaseRequest) -> ApiResult<Disease> {
        let today = Utc::now().date_naive();
        DiseaseValidator::validate_occurrence_date(req.occurrence_date, today)?;

        let (disease, events) = {
            let conn = self.get_conn()?;
            let tx = conn.unchecked_transaction()?;

            PathogenRepository::find_by_id_tx(&tx, req.pathogen_id)?.ok_or_else(|| {
                ApiError::NotFound(format!("Pathogen(id={})不存在", req.pathogen_id))
            })?;
            DiseaseCategoryRepository::find_by_id_tx(&tx, req.category_id)?.ok_or_else(|| {
                ApiError::NotFound(format!("DiseaseCategory(id={})不存在", req.category_id))
            })?;

            let rec = Disease {
                id: 0,
                name: req.name,
                pathogen_id: req.pathogen_id,
                category_id: req.category_id,
                date_reported: today,
                occurrence_date: req.occurrence_date,
                notes: req.notes,
                created_at: Utc::now(),
            };
            let id = DiseaseRepository::insert_tx(&tx, &rec)?;

            for symptom_id in &req.symptom_ids {
                SymptomRepository::find_by_id_tx(&tx, *symptom_id)?.ok_or_else(|| {
                    ApiError::NotFound(format!("Symptom(id={})不存在", symptom_id))
                })?;
                DiseaseRepository::link_symptom_tx(&tx, id, *symptom_id)?;
            }

            // 关联新增才触发康复反应器，重复关联不触发
            let mut events = Vec::new();
            for cow_id in &req.cow_ids {
                CowRepository::find_by_id_tx(&tx, *cow_id)?
                    .ok_or_else(|| ApiError::NotFound(format!("Cow(id={})不存在", cow_id)))?;
                if DiseaseRepository::link_cow_tx(&tx, id, *cow_id)? {
                    events.push(FarmEvent::with_cow(
                        FarmEventType::DiseaseCowLinked,
                        id,
                        *cow_id,
                    ));
                }
            }

            tx.commit()?;
            (Disease { id, ..rec }, events)
        };

        run_reactors(&self.conn, &self.config, &events)?;
        Ok(disease)
    }

    /// 为已有疾病追加牛只关联
    pub fn link_cow_to_disease(&self, disease_id: i64, cow_id: i64) -> ApiResult<()> {
        let events = {
            let conn = self.get_conn()?;
            let tx = conn.unchecked_transaction()?;
            DiseaseRepository::find_by_id_tx(&tx, disease_id)?
                .ok_or_else(|| ApiError::NotFound(format!("Disease(id={})不存在", disease_id)))?;
            CowRepository::find_by_id_tx(&tx, cow_id)?
                .ok_or_else(|| ApiError::NotFound(format!("Cow(id={})不存在", cow_id)))?;
            let newly_linked = DiseaseRepository::link_cow_tx(&tx, disease_id, cow_id)?;
            tx.commit()?;
            if newly_linked {
                vec![FarmEvent::with_cow(
                    FarmEventType::DiseaseCowLinked,
                    disease_id,
                    cow_id,
                )]
            } else {
                Vec::new()
            }
        };
        run_reactors(&self.conn, &self.config, &events)?;
        Ok(())
    }

    /// 解除疾病与牛只的关联（康复记录保留，只在新增时创建、从不随移除删除）
    pub fn unlink_cow_from_disease(&self, disease_id: i64, cow_id: i64) -> ApiResult<()> {
        let conn = self.get_conn()?;
        DiseaseRepository::unlink_cow_tx(&conn, disease_id, cow_id)?;
        Ok(())
    }

    // ==========================================
    // 治疗
    // ==========================================

    /// 创建治疗记录
    ///
    /// 副作用: completion_date 已填时回填对应康复记录的 recovery_date；
    ///         无匹配康复记录 → ReactorFailure（治疗保留，待人工对账）
    pub fn create_treatment(
        &self,
        req: TreatmentRequest,
        date_of_treatment: Option<NaiveDate>,
    ) -> ApiResult<Treatment> {
        let date_of_treatment = date_of_treatment.unwrap_or_else(|| Utc::now().date_naive());

        let (treatment, event) = {
            let conn = self.get_conn()?;
            let tx = conn.unchecked_transaction()?;

            DiseaseRepository::find_by_id_tx(&tx, req.disease_id)?.ok_or_else(|| {
                ApiError::NotFound(format!("Disease(id={})不存在", req.disease_id))
            })?;
            CowRepository::find_by_id_tx(&tx, req.cow_id)?
                .ok_or_else(|| ApiError::NotFound(format!("Cow(id={})不存在", req.cow_id)))?;

            let rec = Treatment {
                id: 0,
                disease_id: req.disease_id,
                cow_id: req.cow_id,
                date_of_treatment,
                treatment_method: req.treatment_method,
                notes: req.notes,
                treatment_status: req.treatment_status,
                completion_date: req.completion_date,
                created_at: Utc::now(),
            };
            let id = TreatmentRepository::insert_tx(&tx, &rec)?;
            tx.commit()?;
            (
                Treatment { id, ..rec },
                FarmEvent::new(FarmEventType::TreatmentSaved, id),
            )
        };

        run_reactors(&self.conn, &self.config, &[event])?;
        Ok(treatment)
    }

    /// 更新治疗记录（全量重校验 + 重新触发完成反应器）
    pub fn update_treatment(&self, id: i64, req: TreatmentRequest) -> ApiResult<Treatment> {
        let (treatment, event) = {
            let conn = self.get_conn()?;
            let tx = conn.unchecked_transaction()?;

            let mut treatment = TreatmentRepository::find_by_id_tx(&tx, id)?
                .ok_or_else(|| ApiError::NotFound(format!("Treatment(id={})不存在", id)))?;
            treatment.treatment_method = req.treatment_method;
            treatment.notes = req.notes;
            treatment.treatment_status = req.treatment_status;
            treatment.completion_date = req.completion_date;

            TreatmentRepository::update_tx(&tx, &treatment)?;
            tx.commit()?;
            (treatment, FarmEvent::new(FarmEventType::TreatmentSaved, id))
        };

        run_reactors(&self.conn, &self.config, &[event])?;
        Ok(treatment)
    }

    pub fn get_treatment(&self, id: i64) -> ApiResult<Treatment> {
        let repo = TreatmentRepository::from_connection(Arc::clone(&self.conn));
        repo.find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("Treatment(id={})不存在", id)))
    }

    pub fn list_treatments_by_cow(&self, cow_id: i64) -> ApiResult<Vec<Treatment>> {
        let repo = TreatmentRepository::from_connection(Arc::clone(&self.conn));
        Ok(repo.list_by_cow(cow_id)?)
    }

    // ==========================================
    // 康复（只读）
    // ==========================================

    pub fn get_recovery(&self, cow_id: i64, disease_id: i64) -> ApiResult<Option<Recovery>> {
        let repo = RecoveryRepository::from_connection(Arc::clone(&self.conn));
        Ok(repo.find_by_cow_and_disease(cow_id, disease_id)?)
    }

    pub fn list_recoveries_by_disease(&self, disease_id: i64) -> ApiResult<Vec<Recovery>> {
        let repo = RecoveryRepository::from_connection(Arc::clone(&self.conn));
        Ok(repo.list_by_disease(disease_id)?)
    }
}
