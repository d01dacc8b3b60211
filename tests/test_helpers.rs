// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成等功能
// ==========================================

use dairy_farm_ms::api::{ApiError, CowApi, CowRequest};
use dairy_farm_ms::db;
use dairy_farm_ms::domain::cow::Cow;
use dairy_farm_ms::domain::types::{
    CowAvailabilityStatus, CowCategory, CowPregnancyStatus, CowProductionStatus, Sex,
};
use chrono::{Duration, NaiveDate, Utc};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - Arc<Mutex<Connection>>: 共享连接（所有 API 共用，保证事务边界一致）
pub fn create_test_db() -> (NamedTempFile, Arc<Mutex<Connection>>) {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = temp_file
        .path()
        .to_str()
        .expect("Invalid temp path")
        .to_string();

    let conn = db::open_sqlite_connection(&db_path).expect("Failed to open test db");
    db::init_schema(&conn).expect("Failed to init schema");

    (temp_file, Arc::new(Mutex::new(conn)))
}

/// 默认牛只请求（在场、开放状态的母牛）
pub fn cow_request(breed_id: i64, name: &str, gender: Sex, date_of_birth: NaiveDate) -> CowRequest {
    CowRequest {
        name: name.to_string(),
        breed_id,
        gender,
        date_of_birth,
        category: CowCategory::Heifer,
        availability_status: CowAvailabilityStatus::Alive,
        current_pregnancy_status: CowPregnancyStatus::Open,
        current_production_status: CowProductionStatus::Open,
        is_bought: false,
    }
}

/// 创建达到配种年龄的测试母牛（约 2 岁）
pub fn create_breeding_cow(cow_api: &CowApi, breed_id: i64, name: &str) -> Cow {
    let dob = Utc::now().date_naive() - Duration::days(730);
    cow_api
        .create_cow(cow_request(breed_id, name, Sex::Female, dob))
        .expect("Failed to create cow")
}

/// 断言错误为指定 code 的校验错误
pub fn assert_validation_code(err: ApiError, expected: &str) {
    match err {
        ApiError::Validation { code, .. } => assert_eq!(code, expected, "校验 code 不匹配"),
        other => panic!("期望校验错误 code={}, 实际: {:?}", expected, other),
    }
}
