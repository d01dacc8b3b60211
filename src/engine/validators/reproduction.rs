// ==========================================
// 规则引擎 - 繁殖域校验器
// ==========================================
// 契约: 写入前同步执行，更新时全量重校验
//       阈值（最低配种年龄/间隔窗口）来自 BreedingParams，默认值见 config 层
// ==========================================

use crate::config::BreedingParams;
use crate::domain::cow::Cow;
use crate::domain::reproduction::Pregnancy;
use crate::domain::types::{
    CowAvailabilityStatus, CowPregnancyStatus, CowProductionStatus, PregnancyOutcome,
    PregnancyStatus, Sex,
};
use crate::engine::error::{EngineResult, ValidationError};
use crate::repository::reproduction_repo::{
    HeatRepository, InseminationRepository, PregnancyRepository,
};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Connection;

// ==========================================
// PregnancyValidator - 妊娠校验器
// ==========================================
pub struct PregnancyValidator;

impl PregnancyValidator {
    /// 校验配种年龄: 妊娠开始日时牛龄须达到最低配种年龄
    pub fn validate_age(
        cow: &Cow,
        start_date: NaiveDate,
        params: &BreedingParams,
    ) -> Result<(), ValidationError> {
        if cow.age_days(start_date) < params.min_breeding_age_days {
            return Err(ValidationError::new(
                "invalid_breeding_age",
                format!(
                    "牛龄不足: 配种要求至少 {} 天，实际 {} 天",
                    params.min_breeding_age_days,
                    cow.age_days(start_date)
                ),
            ));
        }
        Ok(())
    }

    /// 校验不存在并发的开放妊娠
    ///
    /// # 参数
    /// - exclude_id: 更新场景下排除自身记录；None 表示新建
    pub fn validate_no_concurrent_pregnancy(
        conn: &Connection,
        cow: &Cow,
        exclude_id: Option<i64>,
    ) -> EngineResult<()> {
        if exclude_id.is_none() && cow.current_pregnancy_status == CowPregnancyStatus::Pregnant {
            return Err(ValidationError::new(
                "pregnancy_status_conflict",
                "该牛已处于妊娠状态",
            )
            .into());
        }
        if PregnancyRepository::find_open_for_cow_tx(conn, cow.id, exclude_id)?.is_some() {
            return Err(ValidationError::new(
                "pregnancy_status_conflict",
                "该牛已有未了结的妊娠记录",
            )
            .into());
        }
        Ok(())
    }

    /// 校验牛只在场
    pub fn validate_cow_availability(cow: &Cow) -> Result<(), ValidationError> {
        if cow.availability_status != CowAvailabilityStatus::Alive {
            return Err(ValidationError::new(
                "invalid_availability_status",
                format!("只能为在场的牛登记妊娠，当前状态: {}", cow.availability_status),
            ));
        }
        Ok(())
    }

    /// 校验日期: 开始日不在未来；产犊日不早于开始日
    pub fn validate_dates(
        start_date: NaiveDate,
        date_of_calving: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<(), ValidationError> {
        if start_date > today {
            return Err(ValidationError::new(
                "invalid_start_date",
                "妊娠开始日期不能在未来",
            ));
        }
        if let Some(calving) = date_of_calving {
            if calving < start_date {
                return Err(ValidationError::new(
                    "invalid_calving_date",
                    "产犊日期不能早于妊娠开始日期",
                ));
            }
        }
        Ok(())
    }

    /// 校验状态/持续天数/失败日期的相互一致性
    pub fn validate_status(
        rec: &Pregnancy,
        today: NaiveDate,
        params: &BreedingParams,
    ) -> Result<(), ValidationError> {
        match (rec.pregnancy_status, rec.pregnancy_failed_date) {
            (PregnancyStatus::Failed, None) => {
                return Err(ValidationError::new(
                    "invalid_pregnancy_status",
                    "失败的妊娠必须登记失败日期",
                ));
            }
            (PregnancyStatus::Failed, Some(failed)) => {
                if failed < rec.start_date || failed > today {
                    return Err(ValidationError::new(
                        "invalid_pregnancy_status",
                        "妊娠失败日期必须介于开始日期与今天之间",
                    ));
                }
            }
            (_, Some(_)) => {
                return Err(ValidationError::new(
                    "invalid_pregnancy_status",
                    "只有失败的妊娠才能登记失败日期",
                ));
            }
            (_, None) => {}
        }

        if rec.is_open() && rec.duration_days(today) > params.max_open_pregnancy_days {
            return Err(ValidationError::new(
                "invalid_pregnancy_duration",
                format!(
                    "开放妊娠持续 {} 天，超过上限 {} 天",
                    rec.duration_days(today),
                    params.max_open_pregnancy_days
                ),
            ));
        }
        Ok(())
    }

    /// 校验妊娠结局
    ///
    /// 规则:
    /// - Live/Stillborn 要求产犊日期且状态为 Confirmed
    /// - Miscarriage 要求状态为 Failed
    pub fn validate_outcome(
        outcome: Option<PregnancyOutcome>,
        status: PregnancyStatus,
        date_of_calving: Option<NaiveDate>,
    ) -> Result<(), ValidationError> {
        let Some(outcome) = outcome else {
            return Ok(());
        };
        match outcome {
            PregnancyOutcome::Live | PregnancyOutcome::Stillborn => {
                if date_of_calving.is_none() {
                    return Err(ValidationError::new(
                        "invalid_pregnancy_outcome",
                        format!("结局为 {} 的妊娠必须登记产犊日期", outcome),
                    ));
                }
                if status != PregnancyStatus::Confirmed {
                    return Err(ValidationError::new(
                        "invalid_pregnancy_outcome",
                        format!("结局为 {} 的妊娠状态必须为 Confirmed", outcome),
                    ));
                }
            }
            PregnancyOutcome::Miscarriage => {
                if status != PregnancyStatus::Failed {
                    return Err(ValidationError::new(
                        "invalid_pregnancy_outcome",
                        "流产结局要求妊娠状态为 Failed",
                    ));
                }
            }
        }
        Ok(())
    }
}

// ==========================================
// HeatValidator - 发情观察校验器
// ==========================================
pub struct HeatValidator;

impl HeatValidator {
    pub fn validate_not_pregnant(cow: &Cow) -> Result<(), ValidationError> {
        if cow.current_pregnancy_status == CowPregnancyStatus::Pregnant {
            return Err(ValidationError::new(
                "cow_already_pregnant",
                "妊娠中的牛不能登记发情观察",
            ));
        }
        Ok(())
    }

    pub fn validate_not_culled(cow: &Cow) -> Result<(), ValidationError> {
        if cow.current_production_status == CowProductionStatus::Culled {
            return Err(ValidationError::new(
                "culled_cow",
                "已淘汰的牛不能登记发情观察",
            ));
        }
        Ok(())
    }

    pub fn validate_not_dead(cow: &Cow) -> Result<(), ValidationError> {
        if cow.availability_status == CowAvailabilityStatus::Dead {
            return Err(ValidationError::new("dead_cow", "死亡的牛不能登记发情观察"));
        }
        Ok(())
    }

    pub fn validate_gender(cow: &Cow) -> Result<(), ValidationError> {
        if cow.gender != Sex::Female {
            return Err(ValidationError::new(
                "invalid_gender",
                "只有母牛可以登记发情观察",
            ));
        }
        Ok(())
    }

    /// 校验产犊后窗口: 距最近一次产犊须满指定天数
    pub fn validate_post_calving_window(
        conn: &Connection,
        cow_id: i64,
        observation_time: DateTime<Utc>,
        params: &BreedingParams,
    ) -> EngineResult<()> {
        if let Some(calving) = PregnancyRepository::latest_calving_date_tx(conn, cow_id)? {
            let days = (observation_time.date_naive() - calving).num_days();
            if days >= 0 && days < params.post_calving_window_days {
                return Err(ValidationError::new(
                    "recently_calved",
                    format!(
                        "产犊后 {} 天内不登记发情观察（距产犊 {} 天）",
                        params.post_calving_window_days, days
                    ),
                )
                .into());
            }
        }
        Ok(())
    }

    /// 校验发情间隔: 距上一次发情观察须满指定天数
    pub fn validate_heat_interval(
        conn: &Connection,
        cow_id: i64,
        observation_time: DateTime<Utc>,
        params: &BreedingParams,
    ) -> EngineResult<()> {
        if let Some(prev) = HeatRepository::latest_before_tx(conn, cow_id, observation_time)? {
            let days = (observation_time - prev.observation_time).num_days();
            if days < params.heat_interval_days {
                return Err(ValidationError::new(
                    "heat_interval_too_short",
                    format!(
                        "距上次发情观察仅 {} 天，要求至少 {} 天",
                        days, params.heat_interval_days
                    ),
                )
                .into());
            }
        }
        Ok(())
    }

    /// 校验最低配种年龄
    pub fn validate_min_age(
        cow: &Cow,
        observation_date: NaiveDate,
        params: &BreedingParams,
    ) -> Result<(), ValidationError> {
        if cow.age_days(observation_date) < params.min_breeding_age_days {
            return Err(ValidationError::new(
                "invalid_breeding_age",
                format!(
                    "牛龄不足: 发情登记要求至少 {} 天，实际 {} 天",
                    params.min_breeding_age_days,
                    cow.age_days(observation_date)
                ),
            ));
        }
        Ok(())
    }

    /// 校验同一自然日不重复登记发情
    pub fn validate_not_already_in_heat(
        conn: &Connection,
        cow_id: i64,
        observation_date: NaiveDate,
    ) -> EngineResult<()> {
        if HeatRepository::exists_on_date_tx(conn, cow_id, observation_date)? {
            return Err(ValidationError::new(
                "already_in_heat",
                "该牛今日已登记发情观察",
            )
            .into());
        }
        Ok(())
    }
}

// ==========================================
// InseminationValidator - 配种校验器
// ==========================================
pub struct InseminationValidator;

impl InseminationValidator {
    /// 校验配种间隔: 距上一次配种须满指定天数
    pub fn validate_insemination_interval(
        conn: &Connection,
        cow_id: i64,
        date_of_insemination: DateTime<Utc>,
        exclude_id: Option<i64>,
        params: &BreedingParams,
    ) -> EngineResult<()> {
        if let Some(prev) = InseminationRepository::latest_for_cow_tx(conn, cow_id, exclude_id)? {
            let days = (date_of_insemination - prev.date_of_insemination).num_days();
            if days < params.insemination_interval_days {
                return Err(ValidationError::new(
                    "insemination_interval_too_short",
                    format!(
                        "距上次配种仅 {} 天，要求至少 {} 天",
                        days, params.insemination_interval_days
                    ),
                )
                .into());
            }
        }
        Ok(())
    }

    /// 校验站立发情冲突: 配种当日已有发情观察记录时拒绝
    /// （发情观察与配种须分别登记在不同自然日，见 DESIGN.md 决策）
    pub fn validate_no_heat_conflict(
        conn: &Connection,
        cow_id: i64,
        date_of_insemination: NaiveDate,
    ) -> EngineResult<()> {
        if HeatRepository::exists_on_date_tx(conn, cow_id, date_of_insemination)? {
            return Err(ValidationError::new(
                "already_in_heat",
                "该牛当日已登记发情观察，不能同日登记配种",
            )
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::CowCategory;

    fn heifer(dob: NaiveDate) -> Cow {
        Cow {
            id: 7,
            name: "Daisy".to_string(),
            breed_id: 1,
            gender: Sex::Female,
            date_of_birth: dob,
            category: CowCategory::Heifer,
            availability_status: CowAvailabilityStatus::Alive,
            current_pregnancy_status: CowPregnancyStatus::Open,
            current_production_status: CowProductionStatus::Open,
            is_bought: false,
            tag_number: "JE-2023-7".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn pregnancy(start: NaiveDate) -> Pregnancy {
        Pregnancy {
            id: 1,
            cow_id: 7,
            start_date: start,
            date_of_calving: None,
            pregnancy_status: PregnancyStatus::Unconfirmed,
            pregnancy_notes: None,
            calving_notes: None,
            pregnancy_scan_date: None,
            pregnancy_failed_date: None,
            pregnancy_outcome: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_validate_age_below_threshold() {
        let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let params = BreedingParams::default();
        let young = heifer(today - chrono::Duration::days(200));
        let err = PregnancyValidator::validate_age(&young, today, &params).unwrap_err();
        assert_eq!(err.code, "invalid_breeding_age");

        let mature = heifer(today - chrono::Duration::days(400));
        assert!(PregnancyValidator::validate_age(&mature, today, &params).is_ok());
    }

    #[test]
    fn test_validate_status_failed_requires_failed_date() {
        let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let params = BreedingParams::default();
        let mut rec = pregnancy(today - chrono::Duration::days(100));
        rec.pregnancy_status = PregnancyStatus::Failed;
        let err = PregnancyValidator::validate_status(&rec, today, &params).unwrap_err();
        assert_eq!(err.code, "invalid_pregnancy_status");

        rec.pregnancy_failed_date = Some(today - chrono::Duration::days(10));
        assert!(PregnancyValidator::validate_status(&rec, today, &params).is_ok());
    }

    #[test]
    fn test_validate_status_duration_bound() {
        let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let params = BreedingParams::default();
        let rec = pregnancy(today - chrono::Duration::days(300));
        let err = PregnancyValidator::validate_status(&rec, today, &params).unwrap_err();
        assert_eq!(err.code, "invalid_pregnancy_duration");
    }

    #[test]
    fn test_validate_outcome_rules() {
        let calving = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        // Live 要求产犊日期 + Confirmed
        assert_eq!(
            PregnancyValidator::validate_outcome(
                Some(PregnancyOutcome::Live),
                PregnancyStatus::Confirmed,
                None
            )
            .unwrap_err()
            .code,
            "invalid_pregnancy_outcome"
        );
        assert!(PregnancyValidator::validate_outcome(
            Some(PregnancyOutcome::Live),
            PregnancyStatus::Confirmed,
            Some(calving)
        )
        .is_ok());
        // Miscarriage 要求 Failed
        assert_eq!(
            PregnancyValidator::validate_outcome(
                Some(PregnancyOutcome::Miscarriage),
                PregnancyStatus::Confirmed,
                None
            )
            .unwrap_err()
            .code,
            "invalid_pregnancy_outcome"
        );
    }

    #[test]
    fn test_heat_gender_and_status_rules() {
        let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let mut cow = heifer(today - chrono::Duration::days(500));

        cow.gender = Sex::Male;
        assert_eq!(
            HeatValidator::validate_gender(&cow).unwrap_err().code,
            "invalid_gender"
        );

        cow.gender = Sex::Female;
        cow.current_pregnancy_status = CowPregnancyStatus::Pregnant;
        assert_eq!(
            HeatValidator::validate_not_pregnant(&cow).unwrap_err().code,
            "cow_already_pregnant"
        );

        cow.current_pregnancy_status = CowPregnancyStatus::Open;
        cow.availability_status = CowAvailabilityStatus::Dead;
        assert_eq!(
            HeatValidator::validate_not_dead(&cow).unwrap_err().code,
            "dead_cow"
        );
    }
}
