// ==========================================
// 繁殖链集成测试
// ==========================================
// 测试目标: 发情/配种校验规则、成功配种 → 妊娠、
//           产犊 → 泌乳滚动、端到端繁殖场景
// ==========================================

mod test_helpers;

use dairy_farm_ms::api::{
    CowApi, InseminationRequest, InventoryApi, PregnancyRequest, PregnancyUpdateRequest,
    ReproductionApi,
};
use dairy_farm_ms::domain::types::{
    CowAvailabilityStatus, CowPregnancyStatus, CowProductionStatus, PregnancyOutcome,
    PregnancyStatus, Sex,
};
use dairy_farm_ms::logging;
use chrono::{DateTime, Duration, NaiveDate, Utc};

fn setup() -> (
    tempfile::NamedTempFile,
    CowApi,
    ReproductionApi,
    i64, // breed_id
    i64, // inseminator_id
) {
    logging::init_test();
    let (temp_file, conn) = test_helpers::create_test_db();
    let cow_api = CowApi::from_connection(conn.clone());
    let repro_api = ReproductionApi::from_connection(conn);
    let breed = cow_api.create_breed("Jersey").unwrap();
    let inseminator = cow_api
        .create_inseminator(dairy_farm_ms::api::InseminatorRequest {
            first_name: "Wang".to_string(),
            last_name: "Lei".to_string(),
            phone_number: None,
            license_number: "INS-001".to_string(),
        })
        .unwrap();
    (temp_file, cow_api, repro_api, breed.id, inseminator.id)
}

fn days_ago(days: i64) -> DateTime<Utc> {
    Utc::now() - Duration::days(days)
}

fn insemination_request(
    cow_id: i64,
    inseminator_id: i64,
    success: bool,
    at: DateTime<Utc>,
) -> InseminationRequest {
    InseminationRequest {
        cow_id,
        inseminator_id,
        success,
        notes: None,
        date_of_insemination: Some(at),
    }
}

// ==========================================
// 发情观察
// ==========================================

#[test]
fn test_heat_gender_age_and_status_rules() {
    let (_t, cow_api, repro_api, breed_id, _ins) = setup();
    let today = Utc::now().date_naive();

    // 公牛
    let bull = cow_api
        .create_cow(test_helpers::cow_request(
            breed_id,
            "Ferdinand",
            Sex::Male,
            today - Duration::days(800),
        ))
        .unwrap();
    test_helpers::assert_validation_code(
        repro_api.create_heat(bull.id, None).unwrap_err(),
        "invalid_gender",
    );

    // 牛龄不足
    let calf = cow_api
        .create_cow(test_helpers::cow_request(
            breed_id,
            "Junior",
            Sex::Female,
            today - Duration::days(200),
        ))
        .unwrap();
    test_helpers::assert_validation_code(
        repro_api.create_heat(calf.id, None).unwrap_err(),
        "invalid_breeding_age",
    );

    // 妊娠中
    let mut req = test_helpers::cow_request(
        breed_id,
        "Daisy",
        Sex::Female,
        today - Duration::days(800),
    );
    req.current_pregnancy_status = CowPregnancyStatus::Pregnant;
    let pregnant = cow_api.create_cow(req).unwrap();
    test_helpers::assert_validation_code(
        repro_api.create_heat(pregnant.id, None).unwrap_err(),
        "cow_already_pregnant",
    );

    // 死亡
    let mut req = test_helpers::cow_request(
        breed_id,
        "Ghost",
        Sex::Female,
        today - Duration::days(800),
    );
    req.availability_status = CowAvailabilityStatus::Dead;
    let dead = cow_api.create_cow(req).unwrap();
    test_helpers::assert_validation_code(
        repro_api.create_heat(dead.id, None).unwrap_err(),
        "dead_cow",
    );
}

#[test]
fn test_heat_interval_and_same_day_rules() {
    let (_t, cow_api, repro_api, breed_id, _ins) = setup();
    let cow = test_helpers::create_breeding_cow(&cow_api, breed_id, "Clover");

    repro_api
        .create_heat(cow.id, Some(days_ago(30)))
        .unwrap();

    // 同日重复
    test_helpers::assert_validation_code(
        repro_api.create_heat(cow.id, Some(days_ago(30))).unwrap_err(),
        "already_in_heat",
    );

    // 间隔不足 21 天
    test_helpers::assert_validation_code(
        repro_api.create_heat(cow.id, Some(days_ago(20))).unwrap_err(),
        "heat_interval_too_short",
    );

    // 满 21 天后合法
    repro_api.create_heat(cow.id, Some(days_ago(9))).unwrap();
    assert_eq!(repro_api.list_heats(cow.id).unwrap().len(), 2);
}

// ==========================================
// 配种
// ==========================================

#[test]
fn test_insemination_interval_rule() {
    let (_t, cow_api, repro_api, breed_id, inseminator_id) = setup();
    let cow = test_helpers::create_breeding_cow(&cow_api, breed_id, "Clover");

    repro_api
        .create_insemination(insemination_request(
            cow.id,
            inseminator_id,
            false,
            days_ago(10),
        ))
        .unwrap();

    test_helpers::assert_validation_code(
        repro_api
            .create_insemination(insemination_request(
                cow.id,
                inseminator_id,
                false,
                days_ago(0),
            ))
            .unwrap_err(),
        "insemination_interval_too_short",
    );
}

#[test]
fn test_insemination_same_day_heat_conflict() {
    let (_t, cow_api, repro_api, breed_id, inseminator_id) = setup();
    let cow = test_helpers::create_breeding_cow(&cow_api, breed_id, "Clover");

    repro_api.create_heat(cow.id, Some(days_ago(1))).unwrap();

    // 发情观察当日不登记配种
    test_helpers::assert_validation_code(
        repro_api
            .create_insemination(insemination_request(
                cow.id,
                inseminator_id,
                true,
                days_ago(1),
            ))
            .unwrap_err(),
        "already_in_heat",
    );

    // 次日合法
    repro_api
        .create_insemination(insemination_request(
            cow.id,
            inseminator_id,
            false,
            days_ago(0),
        ))
        .unwrap();
}

#[test]
fn test_successful_insemination_creates_pregnancy() {
    let (_t, cow_api, repro_api, breed_id, inseminator_id) = setup();
    let cow = test_helpers::create_breeding_cow(&cow_api, breed_id, "Clover");

    let insemination = repro_api
        .create_insemination(insemination_request(
            cow.id,
            inseminator_id,
            true,
            days_ago(30),
        ))
        .unwrap();

    // 妊娠已创建并反向关联
    let pregnancy_id = insemination.pregnancy_id.expect("妊娠应已关联");
    let pregnancy = repro_api.get_pregnancy(pregnancy_id).unwrap();
    assert_eq!(pregnancy.cow_id, cow.id);
    assert_eq!(
        pregnancy.start_date,
        insemination.date_of_insemination.date_naive()
    );
    assert_eq!(pregnancy.pregnancy_status, PregnancyStatus::Unconfirmed);

    // 牛只状态同步
    let refreshed = cow_api.get_cow(cow.id).unwrap();
    assert_eq!(
        refreshed.current_pregnancy_status,
        CowPregnancyStatus::Pregnant
    );

    // 第二次成功配种（满间隔）不创建第二条妊娠
    let second = repro_api
        .create_insemination(insemination_request(
            cow.id,
            inseminator_id,
            true,
            days_ago(5),
        ))
        .unwrap();
    assert!(second.pregnancy_id.is_none());
    assert_eq!(repro_api.list_pregnancies(cow.id).unwrap().len(), 1);

    // 失败配种不创建妊娠
    let other = test_helpers::create_breeding_cow(&cow_api, breed_id, "Marigold");
    let failed = repro_api
        .create_insemination(insemination_request(
            other.id,
            inseminator_id,
            false,
            days_ago(3),
        ))
        .unwrap();
    assert!(failed.pregnancy_id.is_none());
    assert!(repro_api.list_pregnancies(other.id).unwrap().is_empty());
}

// ==========================================
// 妊娠
// ==========================================

#[test]
fn test_pregnancy_validation_rules() {
    let (_t, cow_api, repro_api, breed_id, _ins) = setup();
    let today = Utc::now().date_naive();

    // 牛龄不足
    let calf = cow_api
        .create_cow(test_helpers::cow_request(
            breed_id,
            "Junior",
            Sex::Female,
            today - Duration::days(300),
        ))
        .unwrap();
    test_helpers::assert_validation_code(
        repro_api
            .create_pregnancy(PregnancyRequest {
                cow_id: calf.id,
                start_date: today - Duration::days(10),
                pregnancy_notes: None,
                pregnancy_scan_date: None,
            })
            .unwrap_err(),
        "invalid_breeding_age",
    );

    // 非在场牛
    let mut req = test_helpers::cow_request(
        breed_id,
        "Ghost",
        Sex::Female,
        today - Duration::days(800),
    );
    req.availability_status = CowAvailabilityStatus::Dead;
    let dead = cow_api.create_cow(req).unwrap();
    test_helpers::assert_validation_code(
        repro_api
            .create_pregnancy(PregnancyRequest {
                cow_id: dead.id,
                start_date: today - Duration::days(10),
                pregnancy_notes: None,
                pregnancy_scan_date: None,
            })
            .unwrap_err(),
        "invalid_availability_status",
    );

    // 并发开放妊娠
    let cow = test_helpers::create_breeding_cow(&cow_api, breed_id, "Clover");
    repro_api
        .create_pregnancy(PregnancyRequest {
            cow_id: cow.id,
            start_date: today - Duration::days(30),
            pregnancy_notes: None,
            pregnancy_scan_date: None,
        })
        .unwrap();
    test_helpers::assert_validation_code(
        repro_api
            .create_pregnancy(PregnancyRequest {
                cow_id: cow.id,
                start_date: today - Duration::days(1),
                pregnancy_notes: None,
                pregnancy_scan_date: None,
            })
            .unwrap_err(),
        "pregnancy_status_conflict",
    );
}

#[test]
fn test_pregnancy_calving_date_and_outcome_rules() {
    let (_t, cow_api, repro_api, breed_id, _ins) = setup();
    let today = Utc::now().date_naive();
    let cow = test_helpers::create_breeding_cow(&cow_api, breed_id, "Clover");
    let start = today - Duration::days(285);

    let pregnancy = repro_api
        .create_pregnancy(PregnancyRequest {
            cow_id: cow.id,
            start_date: start,
            pregnancy_notes: None,
            pregnancy_scan_date: None,
        })
        .unwrap();

    // 产犊日早于开始日
    test_helpers::assert_validation_code(
        repro_api
            .update_pregnancy(
                pregnancy.id,
                PregnancyUpdateRequest {
                    date_of_calving: Some(start - Duration::days(1)),
                    pregnancy_status: PregnancyStatus::Confirmed,
                    pregnancy_notes: None,
                    calving_notes: None,
                    pregnancy_scan_date: None,
                    pregnancy_failed_date: None,
                    pregnancy_outcome: Some(PregnancyOutcome::Live),
                },
            )
            .unwrap_err(),
        "invalid_calving_date",
    );

    // 结局要求产犊日期
    test_helpers::assert_validation_code(
        repro_api
            .update_pregnancy(
                pregnancy.id,
                PregnancyUpdateRequest {
                    date_of_calving: None,
                    pregnancy_status: PregnancyStatus::Confirmed,
                    pregnancy_notes: None,
                    calving_notes: None,
                    pregnancy_scan_date: None,
                    pregnancy_failed_date: None,
                    pregnancy_outcome: Some(PregnancyOutcome::Live),
                },
            )
            .unwrap_err(),
        "invalid_pregnancy_outcome",
    );

    // 失败状态要求失败日期
    test_helpers::assert_validation_code(
        repro_api
            .update_pregnancy(
                pregnancy.id,
                PregnancyUpdateRequest {
                    date_of_calving: None,
                    pregnancy_status: PregnancyStatus::Failed,
                    pregnancy_notes: None,
                    calving_notes: None,
                    pregnancy_scan_date: None,
                    pregnancy_failed_date: None,
                    pregnancy_outcome: None,
                },
            )
            .unwrap_err(),
        "invalid_pregnancy_status",
    );
}

// ==========================================
// 产犊 → 泌乳滚动
// ==========================================

fn calve(
    repro_api: &ReproductionApi,
    pregnancy_id: i64,
    calving_date: NaiveDate,
    outcome: PregnancyOutcome,
) {
    let (status, failed_date) = match outcome {
        PregnancyOutcome::Miscarriage => (
            PregnancyStatus::Failed,
            Some(calving_date),
        ),
        _ => (PregnancyStatus::Confirmed, None),
    };
    repro_api
        .update_pregnancy(
            pregnancy_id,
            PregnancyUpdateRequest {
                date_of_calving: match outcome {
                    PregnancyOutcome::Miscarriage => None,
                    _ => Some(calving_date),
                },
                pregnancy_status: status,
                pregnancy_notes: None,
                calving_notes: None,
                pregnancy_scan_date: None,
                pregnancy_failed_date: failed_date,
                pregnancy_outcome: Some(outcome),
            },
        )
        .unwrap();
}

#[test]
fn test_live_calving_creates_and_rolls_lactation() {
    let (_t, cow_api, repro_api, breed_id, _ins) = setup();
    let today = Utc::now().date_naive();
    let cow = test_helpers::create_breeding_cow(&cow_api, breed_id, "Clover");

    // 第一胎
    let first = repro_api
        .create_pregnancy(PregnancyRequest {
            cow_id: cow.id,
            start_date: today - Duration::days(290),
            pregnancy_notes: None,
            pregnancy_scan_date: None,
        })
        .unwrap();
    let first_calving = today - Duration::days(5);
    calve(&repro_api, first.id, first_calving, PregnancyOutcome::Live);

    let lactations = repro_api.list_lactations(cow.id).unwrap();
    assert_eq!(lactations.len(), 1);
    assert_eq!(lactations[0].lactation_number, 1);
    assert_eq!(lactations[0].start_date, first_calving);
    assert!(lactations[0].end_date.is_none());

    let refreshed = cow_api.get_cow(cow.id).unwrap();
    assert_eq!(refreshed.current_pregnancy_status, CowPregnancyStatus::Calved);
    assert_eq!(
        refreshed.current_production_status,
        CowProductionStatus::Lactating
    );

    // 第二胎: 关闭上一期（产犊日-1），开启 lactation_number=2
    let second = repro_api
        .create_pregnancy(PregnancyRequest {
            cow_id: cow.id,
            start_date: today - Duration::days(2),
            pregnancy_notes: None,
            pregnancy_scan_date: None,
        })
        .unwrap();
    let second_calving = today;
    calve(&repro_api, second.id, second_calving, PregnancyOutcome::Stillborn);

    let lactations = repro_api.list_lactations(cow.id).unwrap();
    assert_eq!(lactations.len(), 2);
    assert_eq!(lactations[0].end_date, Some(second_calving - Duration::days(1)));
    assert_eq!(lactations[1].lactation_number, 2);
    assert_eq!(lactations[1].start_date, second_calving);
    assert!(lactations[1].end_date.is_none());
}

#[test]
fn test_miscarriage_never_creates_lactation() {
    let (_t, cow_api, repro_api, breed_id, _ins) = setup();
    let today = Utc::now().date_naive();
    let cow = test_helpers::create_breeding_cow(&cow_api, breed_id, "Clover");

    let pregnancy = repro_api
        .create_pregnancy(PregnancyRequest {
            cow_id: cow.id,
            start_date: today - Duration::days(60),
            pregnancy_notes: None,
            pregnancy_scan_date: None,
        })
        .unwrap();
    calve(
        &repro_api,
        pregnancy.id,
        today - Duration::days(1),
        PregnancyOutcome::Miscarriage,
    );

    assert!(repro_api.list_lactations(cow.id).unwrap().is_empty());
    // 妊娠失败: 牛只回到 Open
    let refreshed = cow_api.get_cow(cow.id).unwrap();
    assert_eq!(refreshed.current_pregnancy_status, CowPregnancyStatus::Open);
}

// ==========================================
// 端到端场景
// ==========================================

#[test]
fn test_full_reproduction_chain_end_to_end() {
    logging::init_test();

    println!("\n=== 测试：繁殖链端到端场景 ===");

    let (_temp_file, conn) = test_helpers::create_test_db();
    let cow_api = CowApi::from_connection(conn.clone());
    let repro_api = ReproductionApi::from_connection(conn.clone());
    let inventory_api = InventoryApi::from_connection(conn);
    println!("✓ 步骤 1: 测试数据库已创建");

    let breed = cow_api.create_breed("Friesian").unwrap();
    let inseminator = cow_api
        .create_inseminator(dairy_farm_ms::api::InseminatorRequest {
            first_name: "Li".to_string(),
            last_name: "Hua".to_string(),
            phone_number: Some("+8613800000000".to_string()),
            license_number: "INS-E2E".to_string(),
        })
        .unwrap();

    // 创建在场母牛
    let cow = test_helpers::create_breeding_cow(&cow_api, breed.id, "Bessie");
    let total_before = inventory_api
        .get_inventory()
        .unwrap()
        .unwrap()
        .total_number_of_cows;
    println!("✓ 步骤 2: 母牛已创建并计入盘点");

    // 发情观察 → 次日配种成功 → 妊娠自动创建
    repro_api.create_heat(cow.id, Some(days_ago(286))).unwrap();
    println!("✓ 步骤 3: 发情观察已登记");

    let insemination = repro_api
        .create_insemination(insemination_request(
            cow.id,
            inseminator.id,
            true,
            days_ago(285),
        ))
        .unwrap();
    let pregnancy_id = insemination.pregnancy_id.expect("妊娠应已自动创建");
    println!("✓ 步骤 4: 配种成功，妊娠已自动创建并反向关联");

    // 产犊登记 → 泌乳开启，牛只标记新产犊
    let calving_date = Utc::now().date_naive();
    repro_api
        .update_pregnancy(
            pregnancy_id,
            PregnancyUpdateRequest {
                date_of_calving: Some(calving_date),
                pregnancy_status: PregnancyStatus::Confirmed,
                pregnancy_notes: None,
                calving_notes: Some("顺产".to_string()),
                pregnancy_scan_date: None,
                pregnancy_failed_date: None,
                pregnancy_outcome: Some(PregnancyOutcome::Live),
            },
        )
        .unwrap();

    let lactations = repro_api.list_lactations(cow.id).unwrap();
    assert_eq!(lactations.len(), 1);
    assert_eq!(lactations[0].lactation_number, 1);
    assert_eq!(lactations[0].start_date, calving_date);
    assert_eq!(lactations[0].pregnancy_id, Some(pregnancy_id));

    let refreshed = cow_api.get_cow(cow.id).unwrap();
    assert_eq!(refreshed.current_pregnancy_status, CowPregnancyStatus::Calved);
    assert_eq!(
        refreshed.current_production_status,
        CowProductionStatus::Lactating
    );
    println!("✓ 步骤 5: 产犊已登记，泌乳开启，牛只标记新产犊");

    // 牛只始终在场: 盘点总数不变
    let total_after = inventory_api
        .get_inventory()
        .unwrap()
        .unwrap()
        .total_number_of_cows;
    assert_eq!(total_after, total_before);
    println!("✓ 步骤 6: 盘点总数不变（牛只始终在场）");
}
