// ==========================================
// 奶牛场管理系统 - 繁殖域 API
// ==========================================
// 职责: 发情/配种/妊娠的写入路径
// 调用链: [校验 → 主写入(事务) → 反应器(事务)] 显式串联
// 红线: insemination.pregnancy_id 由系统回填，客户端不可提交
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::run_reactors;
use crate::config::ConfigManager;
use crate::domain::reproduction::{Heat, Insemination, Pregnancy};
use crate::domain::types::{PregnancyOutcome, PregnancyStatus};
use crate::engine::events::{FarmEvent, FarmEventType};
use crate::engine::validators::{HeatValidator, InseminationValidator, PregnancyValidator};
use crate::repository::cow_repo::{CowRepository, InseminatorRepository};
use crate::repository::reproduction_repo::{
    HeatRepository, InseminationRepository, PregnancyRepository,
};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// 请求结构
// ==========================================

/// 配种创建请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InseminationRequest {
    pub cow_id: i64,
    pub inseminator_id: i64,
    pub success: bool,
    pub notes: Option<String>,
    /// 缺省为当前时刻
    pub date_of_insemination: Option<DateTime<Utc>>,
}

/// 妊娠创建请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PregnancyRequest {
    pub cow_id: i64,
    pub start_date: NaiveDate,
    pub pregnancy_notes: Option<String>,
    pub pregnancy_scan_date: Option<NaiveDate>,
}

/// 妊娠更新请求（状态推进 / 产犊登记 / 失败登记）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PregnancyUpdateRequest {
    pub date_of_calving: Option<NaiveDate>,
    pub pregnancy_status: PregnancyStatus,
    pub pregnancy_notes: Option<String>,
    pub calving_notes: Option<String>,
    pub pregnancy_scan_date: Option<NaiveDate>,
    pub pregnancy_failed_date: Option<NaiveDate>,
    pub pregnancy_outcome: Option<PregnancyOutcome>,
}

// ==========================================
// ReproductionApi - 繁殖域业务接口
// ==========================================
pub struct ReproductionApi {
    conn: Arc<Mutex<Connection>>,
    config: ConfigManager,
}

impl ReproductionApi {
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
    // 发情观察
    // ==========================================

    /// 登记发情观察（信息性记录，无下游派生）
    ///
    /// 校验: 非妊娠 / 未淘汰 / 未死亡 / 母牛 / 产犊 60 天外 /
    ///       距上次发情 ≥21 天 / 牛龄达标 / 当日未重复登记
    pub fn create_heat(
        &self,
        cow_id: i64,
        observation_time: Option<DateTime<Utc>>,
    ) -> ApiResult<Heat> {
        let observation_time = observation_time.unwrap_or_else(Utc::now);
        let params = self.config.breeding_params()?;

        let heat = {
            let conn = self.get_conn()?;
            let tx = conn.unchecked_transaction()?;

            let cow = CowRepository::find_by_id_tx(&tx, cow_id)?
                .ok_or_else(|| ApiError::NotFound(format!("Cow(id={})不存在", cow_id)))?;

            HeatValidator::validate_not_pregnant(&cow)?;
            HeatValidator::validate_not_culled(&cow)?;
            HeatValidator::validate_not_dead(&cow)?;
            HeatValidator::validate_gender(&cow)?;
            HeatValidator::validate_min_age(&cow, observation_time.date_naive(), &params)?;
            HeatValidator::validate_post_calving_window(&tx, cow_id, observation_time, &params)?;
            // 同日重复先于间隔判定（同日也落在 21 天窗口内）
            HeatValidator::validate_not_already_in_heat(
                &tx,
                cow_id,
                observation_time.date_naive(),
            )?;
            HeatValidator::validate_heat_interval(&tx, cow_id, observation_time, &params)?;

            let rec = Heat {
                id: 0,
                cow_id,
                observation_time,
                created_at: Utc::now(),
            };
            let id = HeatRepository::insert_tx(&tx, &rec)?;
            tx.commit()?;
            Heat { id, ..rec }
        };
        Ok(heat)
    }

    pub fn list_heats(&self, cow_id: i64) -> ApiResult<Vec<Heat>> {
        let repo = HeatRepository::from_connection(Arc::clone(&self.conn));
        Ok(repo.list_by_cow(cow_id)?)
    }

    // ==========================================
    // 配种
    // ==========================================

    /// 登记配种
    ///
    /// 校验: 距上次配种 ≥21 天 / 当日无发情观察冲突
    /// 副作用: success=true 且未关联妊娠时，创建妊娠并反向关联
    pub fn create_insemination(&self, req: InseminationRequest) -> ApiResult<Insemination> {
        let date_of_insemination = req.date_of_insemination.unwrap_or_else(Utc::now);
        let params = self.config.breeding_params()?;

        let (id, event) = {
            let conn = self.get_conn()?;
            let tx = conn.unchecked_transaction()?;

            CowRepository::find_by_id_tx(&tx, req.cow_id)?
                .ok_or_else(|| ApiError::NotFound(format!("Cow(id={})不存在", req.cow_id)))?;
            InseminatorRepository::find_by_id_tx(&tx, req.inseminator_id)?.ok_or_else(|| {
                ApiError::NotFound(format!("Inseminator(id={})不存在", req.inseminator_id))
            })?;

            InseminationValidator::validate_insemination_interval(
                &tx,
                req.cow_id,
                date_of_insemination,
                None,
                &params,
            )?;
            InseminationValidator::validate_no_heat_conflict(
                &tx,
                req.cow_id,
                date_of_insemination.date_naive(),
            )?;

            let rec = Insemination {
                id: 0,
                cow_id: req.cow_id,
                pregnancy_id: None,
                success: req.success,
                notes: req.notes,
                inseminator_id: req.inseminator_id,
                date_of_insemination,
                created_at: Utc::now(),
            };
            let id = InseminationRepository::insert_tx(&tx, &rec)?;
            tx.commit()?;
            (id, FarmEvent::new(FarmEventType::InseminationSaved, id))
        };

        run_reactors(&self.conn, &self.config, &[event])?;

        // 反应器可能已回填 pregnancy_id，重读返回
        self.get_insemination(id)
    }

    pub fn get_insemination(&self, id: i64) -> ApiResult<Insemination> {
        let repo = InseminationRepository::from_connection(Arc::clone(&self.conn));
        repo.find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("Insemination(id={})不存在", id)))
    }

    // ==========================================
    // 妊娠
    // ==========================================

    /// 登记妊娠
    ///
    /// 校验: 牛龄 / 在场 / 无并发开放妊娠 / 日期
    /// 副作用: 牛只妊娠状态 → Pregnant（反应器）
    pub fn create_pregnancy(&self, req: PregnancyRequest) -> ApiResult<Pregnancy> {
        let today = Utc::now().date_naive();
        let params = self.config.breeding_params()?;

        let (pregnancy, event) = {
            let conn = self.get_conn()?;
            let tx = conn.unchecked_transaction()?;

            let cow = CowRepository::find_by_id_tx(&tx, req.cow_id)?
                .ok_or_else(|| ApiError::NotFound(format!("Cow(id={})不存在", req.cow_id)))?;

            let rec = Pregnancy {
                id: 0,
                cow_id: req.cow_id,
                start_date: req.start_date,
                date_of_calving: None,
                pregnancy_status: PregnancyStatus::Unconfirmed,
                pregnancy_notes: req.pregnancy_notes,
                calving_notes: None,
                pregnancy_scan_date: req.pregnancy_scan_date,
                pregnancy_failed_date: None,
                pregnancy_outcome: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };

            PregnancyValidator::validate_age(&cow, rec.start_date, &params)?;
            PregnancyValidator::validate_cow_availability(&cow)?;
            PregnancyValidator::validate_no_concurrent_pregnancy(&tx, &cow, None)?;
            PregnancyValidator::validate_dates(rec.start_date, None, today)?;
            PregnancyValidator::validate_status(&rec, today, &params)?;

            let id = PregnancyRepository::insert_tx(&tx, &rec)?;
            tx.commit()?;
            (
                Pregnancy { id, ..rec },
                FarmEvent::new(FarmEventType::PregnancySaved, id),
            )
        };

        run_reactors(&self.conn, &self.config, &[event])?;
        Ok(pregnancy)
    }

    /// 更新妊娠（全量重校验）
    ///
    /// 副作用: 结局为 Live/Stillborn 且有产犊日期时，
    ///         标记牛只新产犊并滚动泌乳期（流产绝不触发泌乳）
    pub fn update_pregnancy(&self, id: i64, req: PregnancyUpdateRequest) -> ApiResult<Pregnancy> {
        let today = Utc::now().date_naive();
        let params = self.config.breeding_params()?;

        let (pregnancy, event) = {
            let conn = self.get_conn()?;
            let tx = conn.unchecked_transaction()?;

            let mut rec = PregnancyRepository::find_by_id_tx(&tx, id)?
                .ok_or_else(|| ApiError::NotFound(format!("Pregnancy(id={})不存在", id)))?;
            let cow = CowRepository::find_by_id_tx(&tx, rec.cow_id)?
                .ok_or_else(|| ApiError::NotFound(format!("Cow(id={})不存在", rec.cow_id)))?;

            rec.date_of_calving = req.date_of_calving;
            rec.pregnancy_status = req.pregnancy_status;
            rec.pregnancy_notes = req.pregnancy_notes;
            rec.calving_notes = req.calving_notes;
            rec.pregnancy_scan_date = req.pregnancy_scan_date;
            rec.pregnancy_failed_date = req.pregnancy_failed_date;
            rec.pregnancy_outcome = req.pregnancy_outcome;

            PregnancyValidator::validate_age(&cow, rec.start_date, &params)?;
            PregnancyValidator::validate_cow_availability(&cow)?;
            PregnancyValidator::validate_no_concurrent_pregnancy(&tx, &cow, Some(id))?;
            PregnancyValidator::validate_dates(rec.start_date, rec.date_of_calving, today)?;
            PregnancyValidator::validate_status(&rec, today, &params)?;
            PregnancyValidator::validate_outcome(
                rec.pregnancy_outcome,
                rec.pregnancy_status,
                rec.date_of_calving,
            )?;

            PregnancyRepository::update_tx(&tx, &rec)?;
            tx.commit()?;
            (rec, FarmEvent::new(FarmEventType::PregnancySaved, id))
        };

        run_reactors(&self.conn, &self.config, &[event])?;
        Ok(pregnancy)
    }

    pub fn get_pregnancy(&self, id: i64) -> ApiResult<Pregnancy> {
        let repo = PregnancyRepository::from_connection(Arc::clone(&self.conn));
        repo.find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("Pregnancy(id={})不存在", id)))
    }

    pub fn list_pregnancies(&self, cow_id: i64) -> ApiResult<Vec<Pregnancy>> {
        let repo = PregnancyRepository::from_connection(Arc::clone(&self.conn));
        Ok(repo.list_by_cow(cow_id)?)
    }

    // ==========================================
    // 泌乳（生产域协作方，只读视图）
    // ==========================================

    pub fn list_lactations(&self, cow_id: i64) -> ApiResult<Vec<crate::domain::Lactation>> {
        let repo =
            crate::repository::LactationRepository::from_connection(Arc::clone(&self.conn));
        Ok(repo.list_by_cow(cow_id)?)
    }
}
