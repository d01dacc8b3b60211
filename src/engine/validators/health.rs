// ==========================================
// 规则引擎 - 健康域校验器
// ==========================================
// 契约: 无状态校验函数，写入前同步执行，更新时全量重校验
//       跨记录规则接收 &Connection，在触发写入的同一事务内读取
// ==========================================

use crate::domain::cow::Cow;
use crate::domain::types::{
    CowAvailabilityStatus, CowPregnancyStatus, DiseaseCategoryName, PathogenName,
    QuarantineReason, Sex, SymptomLocation, SymptomType,
};
use crate::engine::error::{EngineResult, ValidationError};
use crate::repository::health_repo::WeightRecordRepository;
use crate::repository::{DiseaseCategoryRepository, PathogenRepository};
use chrono::NaiveDate;
use rusqlite::Connection;

/// 体重下限（kg）
pub const MIN_COW_WEIGHT_KG: f64 = 10.0;
/// 体重上限（kg）
pub const MAX_COW_WEIGHT_KG: f64 = 1500.0;

// ==========================================
// WeightRecordValidator - 体重记录校验器
// ==========================================
pub struct WeightRecordValidator;

impl WeightRecordValidator {
    /// 校验体重范围 [10, 1500] kg
    pub fn validate_weight(weight_kg: f64) -> Result<(), ValidationError> {
        if weight_kg < MIN_COW_WEIGHT_KG {
            return Err(ValidationError::new(
                "invalid_weight",
                format!("牛的体重不能低于 {} kg: {}", MIN_COW_WEIGHT_KG, weight_kg),
            ));
        }
        if weight_kg > MAX_COW_WEIGHT_KG {
            return Err(ValidationError::new(
                "invalid_weight",
                format!("牛的体重不能超过 {} kg: {}", MAX_COW_WEIGHT_KG, weight_kg),
            ));
        }
        Ok(())
    }

    /// 校验牛只在场（仅 Alive 可记录体重）
    pub fn validate_cow_availability(cow: &Cow) -> Result<(), ValidationError> {
        if cow.availability_status != CowAvailabilityStatus::Alive {
            return Err(ValidationError::new(
                "invalid_availability_status",
                format!(
                    "只能为在场的牛记录体重，当前状态: {}",
                    cow.availability_status
                ),
            ));
        }
        Ok(())
    }

    /// 校验同一 (cow, date) 只允许一条记录
    pub fn validate_frequency(
        conn: &Connection,
        cow_id: i64,
        date_taken: NaiveDate,
    ) -> EngineResult<()> {
        if WeightRecordRepository::exists_on_date_tx(conn, cow_id, date_taken)? {
            return Err(ValidationError::new(
                "duplicate_weight_record",
                "该牛在此日期已有体重记录",
            )
            .into());
        }
        Ok(())
    }
}

// ==========================================
// QuarantineValidator - 隔离校验器
// ==========================================
pub struct QuarantineValidator;

impl QuarantineValidator {
    /// 校验隔离原因
    ///
    /// 规则: reason=Calving 时要求母牛且当前妊娠状态为 Pregnant
    pub fn validate_reason(reason: QuarantineReason, cow: &Cow) -> Result<(), ValidationError> {
        if reason == QuarantineReason::Calving {
            if cow.gender != Sex::Female {
                return Err(ValidationError::new(
                    "invalid_quarantine_reason",
                    "隔离原因无效: 只有母牛可以因产犊隔离",
                ));
            }
            if cow.current_pregnancy_status != CowPregnancyStatus::Pregnant {
                return Err(ValidationError::new(
                    "invalid_quarantine_reason",
                    "隔离原因无效: 只有妊娠中的母牛可以因产犊隔离",
                ));
            }
        }
        Ok(())
    }

    /// 校验日期区间: end_date（如有）≥ start_date
    pub fn validate_date_range(
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Result<(), ValidationError> {
        if let Some(end) = end_date {
            if start_date > end {
                return Err(ValidationError::new(
                    "invalid_date_range",
                    "隔离日期区间无效: 结束日期必须不早于开始日期",
                ));
            }
        }
        Ok(())
    }
}

// ==========================================
// PathogenValidator / DiseaseCategoryValidator - 词表校验器
// ==========================================
// 说明: 成员资格由封闭枚举在解析时保证（invalid_pathogen_name /
//       invalid_disease_category_name 由 API 层在解析失败时给出），
//       这里只负责唯一性
pub struct PathogenValidator;

impl PathogenValidator {
    pub fn validate_unique_name(conn: &Connection, name: PathogenName) -> EngineResult<()> {
        if PathogenRepository::exists_by_name_tx(conn, name)? {
            return Err(ValidationError::new(
                "duplicate_pathogen",
                format!("病原体已存在: {}", name),
            )
            .into());
        }
        Ok(())
    }
}

pub struct DiseaseCategoryValidator;

impl DiseaseCategoryValidator {
    pub fn validate_unique_name(conn: &Connection, name: DiseaseCategoryName) -> EngineResult<()> {
        if DiseaseCategoryRepository::exists_by_name_tx(conn, name)? {
            return Err(ValidationError::new(
                "duplicate_disease_category",
                format!("疾病类别已存在: {}", name),
            )
            .into());
        }
        Ok(())
    }
}

// ==========================================
// SymptomValidator - 症状校验器
// ==========================================
pub struct SymptomValidator;

impl SymptomValidator {
    /// 校验症状名: 仅字母（可含空格）
    pub fn validate_name(name: &str) -> Result<(), ValidationError> {
        let stripped: String = name.chars().filter(|c| *c != ' ').collect();
        if stripped.is_empty() || !stripped.chars().all(|c| c.is_alphabetic()) {
            return Err(ValidationError::new(
                "invalid_symptom_name",
                "症状名只能包含字母（不允许数字）",
            ));
        }
        Ok(())
    }

    /// 校验观察日期不在未来
    pub fn validate_date_observed(
        date_observed: NaiveDate,
        today: NaiveDate,
    ) -> Result<(), ValidationError> {
        if date_observed > today {
            return Err(ValidationError::new(
                "invalid_date_observed",
                "观察日期不能在未来",
            ));
        }
        Ok(())
    }

    /// 校验症状类型与部位的解剖学兼容性
    ///
    /// 规则: 呼吸道症状部位限 Chest / Neck / Head / Whole body
    pub fn validate_type_and_location(
        symptom_type: SymptomType,
        location: SymptomLocation,
    ) -> Result<(), ValidationError> {
        if symptom_type == SymptomType::Respiratory
            && !matches!(
                location,
                SymptomLocation::Chest
                    | SymptomLocation::Neck
                    | SymptomLocation::Head
                    | SymptomLocation::WholeBody
            )
        {
            return Err(ValidationError::new(
                "incompatible_type_and_location",
                "呼吸道症状的部位必须是 Chest、Neck、Head 或 Whole body",
            ));
        }
        Ok(())
    }
}

// ==========================================
// DiseaseValidator - 疾病校验器
// ==========================================
pub struct DiseaseValidator;

impl DiseaseValidator {
    /// 校验发病日期不在未来
    pub fn validate_occurrence_date(
        occurrence_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<(), ValidationError> {
        if occurrence_date > today {
            return Err(ValidationError::new(
                "invalid_occurrence_date",
                "发病日期不能在未来",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_weight_bounds() {
        assert!(WeightRecordValidator::validate_weight(9.9).is_err());
        assert!(WeightRecordValidator::validate_weight(10.0).is_ok());
        assert!(WeightRecordValidator::validate_weight(1500.0).is_ok());
        assert_eq!(
            WeightRecordValidator::validate_weight(1500.1)
                .unwrap_err()
                .code,
            "invalid_weight"
        );
    }

    #[test]
    fn test_quarantine_date_range() {
        let d = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        assert!(QuarantineValidator::validate_date_range(d, None).is_ok());
        assert!(QuarantineValidator::validate_date_range(d, Some(d)).is_ok());
        let err = QuarantineValidator::validate_date_range(d, Some(d - chrono::Duration::days(1)))
            .unwrap_err();
        assert_eq!(err.code, "invalid_date_range");
    }

    #[test]
    fn test_symptom_name_alphabetic_only() {
        assert!(SymptomValidator::validate_name("Nasal discharge").is_ok());
        assert_eq!(
            SymptomValidator::validate_name("Fever 39C").unwrap_err().code,
            "invalid_symptom_name"
        );
    }

    #[test]
    fn test_respiratory_location_compatibility() {
        assert!(SymptomValidator::validate_type_and_location(
            SymptomType::Respiratory,
            SymptomLocation::Chest
        )
        .is_ok());
        let err = SymptomValidator::validate_type_and_location(
            SymptomType::Respiratory,
            SymptomLocation::Legs,
        )
        .unwrap_err();
        assert_eq!(err.code, "incompatible_type_and_location");
        // 非呼吸道症状不受部位限制
        assert!(SymptomValidator::validate_type_and_location(
            SymptomType::Physical,
            SymptomLocation::Legs
        )
        .is_ok());
    }
}
