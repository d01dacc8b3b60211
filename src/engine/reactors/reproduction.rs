// ==========================================
// 派生反应器 - 繁殖链
// ==========================================
// 状态链: 配种成功 → 创建妊娠并反向关联
//         妊娠产犊（Live/Stillborn）→ 标记新产犊 + 滚动泌乳期
// 红线: 流产等失败结局绝不触发泌乳
// ==========================================

use crate::config::BreedingParams;
use crate::domain::reproduction::Pregnancy;
use crate::domain::types::{
    CowCategory, CowPregnancyStatus, CowProductionStatus, PregnancyOutcome, PregnancyStatus,
};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::reactors::inventory::InventoryReactor;
use crate::engine::validators::PregnancyValidator;
use crate::repository::cow_repo::CowRepository;
use crate::repository::lactation_repo::LactationRepository;
use crate::repository::reproduction_repo::{InseminationRepository, PregnancyRepository};
use chrono::{Duration, NaiveDate, Utc};
use rusqlite::Connection;

// ==========================================
// PregnancyReactor - 成功配种 → 妊娠
// ==========================================
pub struct PregnancyReactor;

impl PregnancyReactor {
    /// 配种保存后: success=true 且尚未关联妊娠时，创建妊娠并反向关联
    ///
    /// # 说明
    /// - 新妊娠 start_date = 配种日期，状态 Unconfirmed
    /// - 创建前执行妊娠校验器（与客户端直接创建同一套规则）
    pub fn on_insemination_saved(
        conn: &Connection,
        insemination_id: i64,
        params: &BreedingParams,
        today: NaiveDate,
    ) -> EngineResult<()> {
        let insemination =
            InseminationRepository::find_by_id_tx(conn, insemination_id)?.ok_or_else(|| {
                EngineError::ReactorPrecondition(format!(
                    "配种反应器: 配种记录不存在 id={}",
                    insemination_id
                ))
            })?;

        if !insemination.success || insemination.pregnancy_id.is_some() {
            return Ok(());
        }

        let mut cow = CowRepository::find_by_id_tx(conn, insemination.cow_id)?.ok_or_else(|| {
            EngineError::ReactorPrecondition(format!(
                "配种反应器: 牛只不存在 id={}",
                insemination.cow_id
            ))
        })?;

        // 已有妊娠（状态或开放记录）时跳过，不创建第二条
        if cow.current_pregnancy_status == CowPregnancyStatus::Pregnant
            || PregnancyRepository::find_open_for_cow_tx(conn, cow.id, None)?.is_some()
        {
            tracing::info!(
                "跳过妊娠创建: 牛只已有妊娠 cow_id={}, insemination_id={}",
                cow.id,
                insemination_id
            );
            return Ok(());
        }

        let start_date = insemination.date_of_insemination.date_naive();
        let rec = Pregnancy {
            id: 0,
            cow_id: cow.id,
            start_date,
            date_of_calving: None,
            pregnancy_status: PregnancyStatus::Unconfirmed,
            pregnancy_notes: None,
            calving_notes: None,
            pregnancy_scan_date: None,
            pregnancy_failed_date: None,
            pregnancy_outcome: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        PregnancyValidator::validate_age(&cow, start_date, params)?;
        PregnancyValidator::validate_cow_availability(&cow)?;
        PregnancyValidator::validate_dates(start_date, None, today)?;

        let pregnancy_id = PregnancyRepository::insert_tx(conn, &rec)?;
        InseminationRepository::link_pregnancy_tx(conn, insemination_id, pregnancy_id)?;

        cow.current_pregnancy_status = CowPregnancyStatus::Pregnant;
        CowRepository::update_tx(conn, &cow)?;
        InventoryReactor::refresh(conn)?;

        tracing::info!(
            "成功配种已创建妊娠: insemination_id={}, pregnancy_id={}, cow_id={}",
            insemination_id,
            pregnancy_id,
            cow.id
        );
        Ok(())
    }
}

// ==========================================
// CalvingReactor - 产犊 → 泌乳滚动
// ==========================================
pub struct CalvingReactor;

impl CalvingReactor {
    /// 妊娠保存后: 结局为 Live/Stillborn 且有产犊日期时，
    /// 标记牛只新产犊并滚动泌乳期
    ///
    /// # 泌乳滚动
    /// - 存在开放泌乳期: 以 产犊日-1天 收尾，再开启 lactation_number+1
    /// - 此前无任何泌乳期: 开启 lactation_number=1
    /// - 流产（Miscarriage）或无结局: 不触碰泌乳
    pub fn on_pregnancy_saved(conn: &Connection, pregnancy_id: i64) -> EngineResult<()> {
        let pregnancy =
            PregnancyRepository::find_by_id_tx(conn, pregnancy_id)?.ok_or_else(|| {
                EngineError::ReactorPrecondition(format!(
                    "产犊反应器: 妊娠记录不存在 id={}",
                    pregnancy_id
                ))
            })?;

        let Some(calving_date) = pregnancy.date_of_calving else {
            // 未产犊: 同步牛只妊娠状态（开放 → Pregnant，失败 → Open）
            Self::sync_open_status(conn, &pregnancy)?;
            return Ok(());
        };
        if !matches!(
            pregnancy.pregnancy_outcome,
            Some(PregnancyOutcome::Live) | Some(PregnancyOutcome::Stillborn)
        ) {
            return Ok(());
        }

        Self::mark_recently_calved(conn, pregnancy.cow_id)?;
        Self::roll_lactation(conn, &pregnancy, calving_date)?;
        Ok(())
    }

    /// 未产犊妊娠保存后的牛只状态同步
    fn sync_open_status(conn: &Connection, pregnancy: &Pregnancy) -> EngineResult<()> {
        let mut cow = CowRepository::find_by_id_tx(conn, pregnancy.cow_id)?.ok_or_else(|| {
            EngineError::ReactorPrecondition(format!(
                "产犊反应器: 牛只不存在 id={}",
                pregnancy.cow_id
            ))
        })?;

        let target = if pregnancy.pregnancy_status == PregnancyStatus::Failed {
            // 妊娠失败: 曾标记 Pregnant 的牛回到 Open
            if cow.current_pregnancy_status != CowPregnancyStatus::Pregnant {
                return Ok(());
            }
            CowPregnancyStatus::Open
        } else {
            // Unavailable（淘汰等）不被妊娠保存反向覆盖
            if !matches!(
                cow.current_pregnancy_status,
                CowPregnancyStatus::Open | CowPregnancyStatus::Calved
            ) {
                return Ok(());
            }
            CowPregnancyStatus::Pregnant
        };

        cow.current_pregnancy_status = target;
        CowRepository::update_tx(conn, &cow)?;
        InventoryReactor::refresh(conn)?;
        Ok(())
    }

    /// 标记牛只新产犊（妊娠状态 Calved，生产状态 Lactating）
    fn mark_recently_calved(conn: &Connection, cow_id: i64) -> EngineResult<()> {
        let mut cow = CowRepository::find_by_id_tx(conn, cow_id)?.ok_or_else(|| {
            EngineError::ReactorPrecondition(format!("产犊反应器: 牛只不存在 id={}", cow_id))
        })?;

        // 幂等: 已是新产犊泌乳态则跳过
        if cow.current_pregnancy_status == CowPregnancyStatus::Calved
            && cow.current_production_status == CowProductionStatus::Lactating
        {
            return Ok(());
        }

        cow.current_pregnancy_status = CowPregnancyStatus::Calved;
        cow.current_production_status = CowProductionStatus::Lactating;
        cow.category = CowCategory::MilkingCow;
        CowRepository::update_tx(conn, &cow)?;
        InventoryReactor::refresh(conn)?;
        Ok(())
    }

    /// 泌乳期滚动（消费生产域的 create/close 契约）
    fn roll_lactation(
        conn: &Connection,
        pregnancy: &Pregnancy,
        calving_date: NaiveDate,
    ) -> EngineResult<()> {
        match LactationRepository::latest_for_cow_tx(conn, pregnancy.cow_id)? {
            Some(previous) => {
                // 同一妊娠的重复保存不重复开期
                if previous.pregnancy_id == Some(pregnancy.id) {
                    return Ok(());
                }
                if previous.is_open() {
                    LactationRepository::close_tx(
                        conn,
                        previous.id,
                        calving_date - Duration::days(1),
                    )?;
                }
                LactationRepository::create_tx(
                    conn,
                    pregnancy.cow_id,
                    calving_date,
                    Some(pregnancy.id),
                    previous.lactation_number + 1,
                )?;
                tracing::info!(
                    "泌乳期已滚动: cow_id={}, lactation_number={}",
                    pregnancy.cow_id,
                    previous.lactation_number + 1
                );
            }
            None => {
                LactationRepository::create_tx(
                    conn,
                    pregnancy.cow_id,
                    calving_date,
                    Some(pregnancy.id),
                    1,
                )?;
                tracing::info!("首期泌乳已开启: cow_id={}", pregnancy.cow_id);
            }
        }
        Ok(())
    }
}
