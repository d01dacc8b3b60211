// ==========================================
// 健康域 API 集成测试
// ==========================================
// 测试目标: 体重/隔离/淘汰/词表/症状校验规则（稳定 code）
//           疾病关联 → 康复创建、治疗完成 → 康复回填
// ==========================================

mod test_helpers;

use dairy_farm_ms::api::{
    ApiError, CowApi, DiseaseRequest, HealthApi, SymptomRequest, TreatmentRequest,
};
use dairy_farm_ms::domain::types::{
    CowAvailabilityStatus, CowPregnancyStatus, CowProductionStatus, Sex, SymptomLocation,
    SymptomSeverity, SymptomType, TreatmentStatus,
};
use dairy_farm_ms::logging;
use chrono::{Duration, Utc};

fn setup() -> (
    tempfile::NamedTempFile,
    CowApi,
    HealthApi,
    i64, // breed_id
) {
    logging::init_test();
    let (temp_file, conn) = test_helpers::create_test_db();
    let cow_api = CowApi::from_connection(conn.clone());
    let health_api = HealthApi::from_connection(conn);
    let breed = cow_api.create_breed("Friesian").unwrap();
    (temp_file, cow_api, health_api, breed.id)
}

// ==========================================
// 体重记录
// ==========================================

#[test]
fn test_weight_record_bounds() {
    let (_t, cow_api, health_api, breed_id) = setup();
    let cow = test_helpers::create_breeding_cow(&cow_api, breed_id, "Bessie");

    let err = health_api
        .create_weight_record(cow.id, 9.5, None)
        .unwrap_err();
    test_helpers::assert_validation_code(err, "invalid_weight");

    let err = health_api
        .create_weight_record(cow.id, 1500.5, None)
        .unwrap_err();
    test_helpers::assert_validation_code(err, "invalid_weight");

    let record = health_api.create_weight_record(cow.id, 420.0, None).unwrap();
    assert_eq!(record.cow_id, cow.id);
    assert!((record.weight_kg - 420.0).abs() < f64::EPSILON);
}

#[test]
fn test_weight_record_requires_alive_cow() {
    let (_t, cow_api, health_api, breed_id) = setup();
    let dob = Utc::now().date_naive() - Duration::days(730);
    let mut req = test_helpers::cow_request(breed_id, "Ghost", Sex::Female, dob);
    req.availability_status = CowAvailabilityStatus::Dead;
    let cow = cow_api.create_cow(req).unwrap();

    let err = health_api
        .create_weight_record(cow.id, 300.0, None)
        .unwrap_err();
    test_helpers::assert_validation_code(err, "invalid_availability_status");
}

#[test]
fn test_duplicate_weight_record_same_day() {
    let (_t, cow_api, health_api, breed_id) = setup();
    let cow = test_helpers::create_breeding_cow(&cow_api, breed_id, "Bessie");
    let date = Utc::now().date_naive();

    health_api
        .create_weight_record(cow.id, 400.0, Some(date))
        .unwrap();
    let err = health_api
        .create_weight_record(cow.id, 405.0, Some(date))
        .unwrap_err();
    test_helpers::assert_validation_code(err, "duplicate_weight_record");

    // 另一天可以
    health_api
        .create_weight_record(cow.id, 405.0, Some(date - Duration::days(1)))
        .unwrap();
}

// ==========================================
// 隔离记录
// ==========================================

#[test]
fn test_quarantine_calving_reason_rules() {
    let (_t, cow_api, health_api, breed_id) = setup();
    let today = Utc::now().date_naive();
    let dob = today - Duration::days(730);

    // 公牛: 拒绝
    let bull = cow_api
        .create_cow(test_helpers::cow_request(breed_id, "Ferdinand", Sex::Male, dob))
        .unwrap();
    let err = health_api
        .create_quarantine_record(bull.id, "Calving", today, None, None)
        .unwrap_err();
    test_helpers::assert_validation_code(err, "invalid_quarantine_reason");

    // 未妊娠母牛: 拒绝
    let open_cow = test_helpers::create_breeding_cow(&cow_api, breed_id, "Clover");
    let err = health_api
        .create_quarantine_record(open_cow.id, "Calving", today, None, None)
        .unwrap_err();
    test_helpers::assert_validation_code(err, "invalid_quarantine_reason");

    // 妊娠母牛: 通过，并传播在场状态 → Quarantined
    let mut req = test_helpers::cow_request(breed_id, "Daisy", Sex::Female, dob);
    req.current_pregnancy_status = CowPregnancyStatus::Pregnant;
    let pregnant = cow_api.create_cow(req).unwrap();
    health_api
        .create_quarantine_record(pregnant.id, "Calving", today, None, None)
        .unwrap();
    let refreshed = cow_api.get_cow(pregnant.id).unwrap();
    assert_eq!(
        refreshed.availability_status,
        CowAvailabilityStatus::Quarantined
    );
}

#[test]
fn test_quarantine_date_range() {
    let (_t, cow_api, health_api, breed_id) = setup();
    let cow = test_helpers::create_breeding_cow(&cow_api, breed_id, "Clover");
    let start = Utc::now().date_naive();

    let err = health_api
        .create_quarantine_record(cow.id, "Sick Cow", start, Some(start - Duration::days(1)), None)
        .unwrap_err();
    test_helpers::assert_validation_code(err, "invalid_date_range");

    // end_date == start_date 合法
    health_api
        .create_quarantine_record(cow.id, "Sick Cow", start, Some(start), None)
        .unwrap();

    // 未知原因字符串
    let err = health_api
        .create_quarantine_record(cow.id, "Vacation", start, None, None)
        .unwrap_err();
    test_helpers::assert_validation_code(err, "invalid_quarantine_reason");
}

// ==========================================
// 淘汰记录
// ==========================================

#[test]
fn test_culling_propagates_cow_statuses() {
    let (_t, cow_api, health_api, breed_id) = setup();
    let cow = test_helpers::create_breeding_cow(&cow_api, breed_id, "Clover");

    health_api
        .create_culling_record(cow.id, "Age", Some("老龄淘汰".to_string()), None)
        .unwrap();

    let refreshed = cow_api.get_cow(cow.id).unwrap();
    assert_eq!(
        refreshed.current_production_status,
        CowProductionStatus::Culled
    );
    assert_eq!(
        refreshed.current_pregnancy_status,
        CowPregnancyStatus::Unavailable
    );

    // 一牛一淘汰
    let err = health_api
        .create_culling_record(cow.id, "Age", None, None)
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)), "实际: {:?}", err);

    // 未知原因
    let other = test_helpers::create_breeding_cow(&cow_api, breed_id, "Marigold");
    let err = health_api
        .create_culling_record(other.id, "Bad Mood", None, None)
        .unwrap_err();
    test_helpers::assert_validation_code(err, "invalid_culling_reason");
}

// ==========================================
// 词表
// ==========================================

#[test]
fn test_pathogen_and_category_vocabulary() {
    let (_t, _cow_api, health_api, _breed_id) = setup();

    let err = health_api.create_pathogen("Parasite").unwrap_err();
    test_helpers::assert_validation_code(err, "invalid_pathogen_name");

    health_api.create_pathogen("Bacteria").unwrap();
    let err = health_api.create_pathogen("Bacteria").unwrap_err();
    test_helpers::assert_validation_code(err, "duplicate_pathogen");

    let err = health_api.create_disease_category("Magic").unwrap_err();
    test_helpers::assert_validation_code(err, "invalid_disease_category_name");

    health_api.create_disease_category("Infectious").unwrap();
    let err = health_api.create_disease_category("Infectious").unwrap_err();
    test_helpers::assert_validation_code(err, "duplicate_disease_category");
}

// ==========================================
// 症状
// ==========================================

#[test]
fn test_symptom_validation_rules() {
    let (_t, _cow_api, health_api, _breed_id) = setup();
    let today = Utc::now().date_naive();

    let base = SymptomRequest {
        name: "Coughing".to_string(),
        symptom_type: SymptomType::Respiratory,
        description: None,
        severity: SymptomSeverity::Moderate,
        location: SymptomLocation::Chest,
        date_observed: today,
    };

    // 名称含数字
    let mut req = base.clone();
    req.name = "Fever 39".to_string();
    test_helpers::assert_validation_code(
        health_api.create_symptom(req).unwrap_err(),
        "invalid_symptom_name",
    );

    // 未来观察日期
    let mut req = base.clone();
    req.date_observed = today + Duration::days(1);
    test_helpers::assert_validation_code(
        health_api.create_symptom(req).unwrap_err(),
        "invalid_date_observed",
    );

    // 呼吸道症状部位不兼容
    let mut req = base.clone();
    req.location = SymptomLocation::Legs;
    test_helpers::assert_validation_code(
        health_api.create_symptom(req).unwrap_err(),
        "incompatible_type_and_location",
    );

    // 合法
    health_api.create_symptom(base).unwrap();
}

// ==========================================
// 疾病 → 康复 → 治疗
// ==========================================

fn create_disease_for(
    health_api: &HealthApi,
    cow_ids: Vec<i64>,
) -> dairy_farm_ms::domain::Disease {
    let pathogen = health_api.create_pathogen("Virus").unwrap();
    let category = health_api.create_disease_category("Infectious").unwrap();
    health_api
        .create_disease(DiseaseRequest {
            name: "Foot and Mouth".to_string(),
            pathogen_id: pathogen.id,
            category_id: category.id,
            occurrence_date: Utc::now().date_naive() - Duration::days(3),
            notes: None,
            cow_ids,
            symptom_ids: vec![],
        })
        .unwrap()
}

#[test]
fn test_disease_link_creates_recovery_per_cow() {
    let (_t, cow_api, health_api, breed_id) = setup();
    let cow_a = test_helpers::create_breeding_cow(&cow_api, breed_id, "Clover");
    let cow_b = test_helpers::create_breeding_cow(&cow_api, breed_id, "Marigold");

    let disease = create_disease_for(&health_api, vec![cow_a.id, cow_b.id]);

    let recoveries = health_api.list_recoveries_by_disease(disease.id).unwrap();
    assert_eq!(recoveries.len(), 2);
    for recovery in &recoveries {
        assert_eq!(recovery.diagnosis_date, disease.date_reported);
        assert!(recovery.recovery_date.is_none());
    }

    // 重复关联不再创建
    health_api.link_cow_to_disease(disease.id, cow_a.id).unwrap();
    assert_eq!(
        health_api.list_recoveries_by_disease(disease.id).unwrap().len(),
        2
    );

    // 解除关联保留康复记录（历史档案）
    health_api
        .unlink_cow_from_disease(disease.id, cow_a.id)
        .unwrap();
    assert_eq!(
        health_api.list_recoveries_by_disease(disease.id).unwrap().len(),
        2
    );
}

#[test]
fn test_treatment_completion_backfills_recovery() {
    let (_t, cow_api, health_api, breed_id) = setup();
    let cow = test_helpers::create_breeding_cow(&cow_api, breed_id, "Clover");
    let disease = create_disease_for(&health_api, vec![cow.id]);
    let completion = Utc::now().date_naive();

    // 未完成的治疗不回填
    let treatment = health_api
        .create_treatment(
            TreatmentRequest {
                disease_id: disease.id,
                cow_id: cow.id,
                treatment_method: "抗生素注射".to_string(),
                notes: None,
                treatment_status: TreatmentStatus::InProgress,
                completion_date: None,
            },
            None,
        )
        .unwrap();
    let recovery = health_api.get_recovery(cow.id, disease.id).unwrap().unwrap();
    assert!(recovery.recovery_date.is_none());

    // 完成治疗: 回填 recovery_date = completion_date
    let mut req = TreatmentRequest {
        disease_id: disease.id,
        cow_id: cow.id,
        treatment_method: "抗生素注射".to_string(),
        notes: None,
        treatment_status: TreatmentStatus::Completed,
        completion_date: Some(completion),
    };
    health_api.update_treatment(treatment.id, req.clone()).unwrap();

    let recovery = health_api.get_recovery(cow.id, disease.id).unwrap().unwrap();
    assert_eq!(recovery.recovery_date, Some(completion));

    // 再次保存幂等
    req.notes = Some("复查".to_string());
    health_api.update_treatment(treatment.id, req).unwrap();
    let recovery = health_api.get_recovery(cow.id, disease.id).unwrap().unwrap();
    assert_eq!(recovery.recovery_date, Some(completion));
}

#[test]
fn test_treatment_without_recovery_is_reactor_failure() {
    let (_t, cow_api, health_api, breed_id) = setup();
    let cow = test_helpers::create_breeding_cow(&cow_api, breed_id, "Clover");
    // 疾病未关联该牛 → 无康复记录
    let disease = create_disease_for(&health_api, vec![]);

    let err = health_api
        .create_treatment(
            TreatmentRequest {
                disease_id: disease.id,
                cow_id: cow.id,
                treatment_method: "补液".to_string(),
                notes: None,
                treatment_status: TreatmentStatus::Completed,
                completion_date: Some(Utc::now().date_naive()),
            },
            None,
        )
        .unwrap_err();
    assert!(matches!(err, ApiError::ReactorFailure(_)), "实际: {:?}", err);

    // 主写入已提交: 治疗记录保留，待人工对账
    let treatments = health_api.list_treatments_by_cow(cow.id).unwrap();
    assert_eq!(treatments.len(), 1);
}

#[test]
fn test_protected_pathogen_delete() {
    let (_t, cow_api, health_api, breed_id) = setup();
    let cow = test_helpers::create_breeding_cow(&cow_api, breed_id, "Clover");
    let disease = create_disease_for(&health_api, vec![cow.id]);

    // 病原体被疾病引用: 保护删除
    let err = health_api.delete_pathogen(disease.pathogen_id).unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)), "实际: {:?}", err);
}
