// ==========================================
// 规则引擎 - 牛只校验器
// ==========================================
// 不变式: 在场状态与妊娠/生产状态必须互相一致
// ==========================================

use crate::domain::cow::Cow;
use crate::domain::types::{
    CowAvailabilityStatus, CowBreedName, CowPregnancyStatus, CowProductionStatus,
};
use crate::engine::error::{EngineResult, ValidationError};
use crate::repository::CowBreedRepository;
use chrono::NaiveDate;
use rusqlite::Connection;

// ==========================================
// CowBreedValidator - 品种校验器
// ==========================================
pub struct CowBreedValidator;

impl CowBreedValidator {
    /// 校验品种名唯一（duplicate_cow_breed）
    pub fn validate_unique_name(conn: &Connection, name: CowBreedName) -> EngineResult<()> {
        if CowBreedRepository::exists_by_name_tx(conn, name)? {
            return Err(ValidationError::new(
                "duplicate_cow_breed",
                format!("品种已存在: {}", name),
            )
            .into());
        }
        Ok(())
    }
}

// ==========================================
// CowValidator - 牛只校验器
// ==========================================
pub struct CowValidator;

impl CowValidator {
    /// 校验牛名: 至少 2 个字符，仅字母（可含空格）
    pub fn validate_name(name: &str) -> Result<(), ValidationError> {
        let stripped: String = name.chars().filter(|c| !c.is_whitespace()).collect();
        if stripped.chars().count() < 2 || !stripped.chars().all(|c| c.is_alphabetic()) {
            return Err(ValidationError::new(
                "invalid_cow_name",
                format!("牛名无效: '{}'（至少 2 个字母，不允许数字/符号）", name),
            ));
        }
        Ok(())
    }

    /// 校验出生日期不在未来
    pub fn validate_date_of_birth(
        date_of_birth: NaiveDate,
        today: NaiveDate,
    ) -> Result<(), ValidationError> {
        if date_of_birth > today {
            return Err(ValidationError::new(
                "invalid_date_of_birth",
                format!("出生日期不能在未来: {}", date_of_birth),
            ));
        }
        Ok(())
    }

    /// 校验状态组合一致性
    ///
    /// 规则:
    /// - Dead/Sold 的牛不能处于妊娠中，也不能在泌乳/孕期生产状态
    /// - 生产状态为 Culled 时妊娠状态必须为 Unavailable
    pub fn validate_status_consistency(cow: &Cow) -> Result<(), ValidationError> {
        let gone = matches!(
            cow.availability_status,
            CowAvailabilityStatus::Dead | CowAvailabilityStatus::Sold
        );
        if gone {
            if cow.current_pregnancy_status == CowPregnancyStatus::Pregnant {
                return Err(ValidationError::new(
                    "invalid_status_combination",
                    format!(
                        "{} 的牛不能处于妊娠状态",
                        cow.availability_status
                    ),
                ));
            }
            if matches!(
                cow.current_production_status,
                CowProductionStatus::Lactating | CowProductionStatus::PregnantNotLactating
            ) {
                return Err(ValidationError::new(
                    "invalid_status_combination",
                    format!(
                        "{} 的牛生产状态不能为 {}",
                        cow.availability_status, cow.current_production_status
                    ),
                ));
            }
        }
        if cow.current_production_status == CowProductionStatus::Culled
            && cow.current_pregnancy_status != CowPregnancyStatus::Unavailable
        {
            return Err(ValidationError::new(
                "invalid_status_combination",
                "已淘汰的牛妊娠状态必须为 Unavailable",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{CowCategory, Sex};
    use chrono::Utc;

    fn sample_cow() -> Cow {
        Cow {
            id: 1,
            name: "Bessie".to_string(),
            breed_id: 1,
            gender: Sex::Female,
            date_of_birth: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            category: CowCategory::Heifer,
            availability_status: CowAvailabilityStatus::Alive,
            current_pregnancy_status: CowPregnancyStatus::Open,
            current_production_status: CowProductionStatus::Open,
            is_bought: false,
            tag_number: "FR-2022-1".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_validate_name() {
        assert!(CowValidator::validate_name("Bessie").is_ok());
        assert!(CowValidator::validate_name("General Cow").is_ok());
        let err = CowValidator::validate_name("B3ssie").unwrap_err();
        assert_eq!(err.code, "invalid_cow_name");
        assert_eq!(
            CowValidator::validate_name("B").unwrap_err().code,
            "invalid_cow_name"
        );
    }

    #[test]
    fn test_dead_cow_cannot_be_pregnant() {
        let mut cow = sample_cow();
        cow.availability_status = CowAvailabilityStatus::Dead;
        cow.current_pregnancy_status = CowPregnancyStatus::Pregnant;
        let err = CowValidator::validate_status_consistency(&cow).unwrap_err();
        assert_eq!(err.code, "invalid_status_combination");
    }

    #[test]
    fn test_culled_requires_unavailable_pregnancy_status() {
        let mut cow = sample_cow();
        cow.current_production_status = CowProductionStatus::Culled;
        assert!(CowValidator::validate_status_consistency(&cow).is_err());

        cow.current_pregnancy_status = CowPregnancyStatus::Unavailable;
        assert!(CowValidator::validate_status_consistency(&cow).is_ok());
    }
}
