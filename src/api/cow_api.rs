// ==========================================
// 奶牛场管理系统 - 牛群 API
// ==========================================
// 职责: 牛只/品种/配种员的写入路径
// 调用链: [校验 → 主写入(事务) → 反应器(事务)] 显式串联
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::run_reactors;
use crate::config::ConfigManager;
use crate::domain::cow::{Cow, CowBreed, Inseminator};
use crate::domain::types::{
    CowAvailabilityStatus, CowBreedName, CowCategory, CowPregnancyStatus, CowProductionStatus,
    Sex,
};
use crate::engine::events::{FarmEvent, FarmEventType};
use crate::engine::validators::{CowBreedValidator, CowValidator};
use crate::engine::ValidationError;
use crate::repository::cow_repo::{CowBreedRepository, CowRepository, InseminatorRepository};
use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// 请求结构
// ==========================================

/// 牛只创建/更新请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CowRequest {
    pub name: String,
    pub breed_id: i64,
    pub gender: Sex,
    pub date_of_birth: NaiveDate,
    pub category: CowCategory,
    pub availability_status: CowAvailabilityStatus,
    pub current_pregnancy_status: CowPregnancyStatus,
    pub current_production_status: CowProductionStatus,
    pub is_bought: bool,
}

/// 配种员创建请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InseminatorRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub license_number: String,
}

// ==========================================
// CowApi - 牛群业务接口
// ==========================================
pub struct CowApi {
    conn: Arc<Mutex<Connection>>,
    config: ConfigManager,
}

impl CowApi {
    /// 从共享连接创建（与其他 API 共用一个连接，保证事务边界一致）
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
    // 品种
    // ==========================================

    /// 创建品种
    ///
    /// # 错误
    /// - invalid_cow_breed: 名称不在封闭品种词表内
    /// - duplicate_cow_breed: 品种已存在
    pub fn create_breed(&self, name: &str) -> ApiResult<CowBreed> {
        let breed_name = CowBreedName::parse(name).ok_or_else(|| {
            ValidationError::new("invalid_cow_breed", format!("无效的品种名: {}", name))
        })?;

        let breed = {
            let conn = self.get_conn()?;
            let tx = conn.unchecked_transaction()?;
            CowBreedValidator::validate_unique_name(&tx, breed_name)?;
            let id = CowBreedRepository::insert_tx(&tx, breed_name)?;
            let breed = CowBreedRepository::find_by_id_tx(&tx, id)?
                .ok_or_else(|| ApiError::InternalError("品种插入后不可读".to_string()))?;
            tx.commit()?;
            breed
        };
        Ok(breed)
    }

    pub fn list_breeds(&self) -> ApiResult<Vec<CowBreed>> {
        let repo = CowBreedRepository::from_connection(Arc::clone(&self.conn));
        Ok(repo.list()?)
    }

    // ==========================================
    // 配种员
    // ==========================================

    pub fn create_inseminator(&self, req: InseminatorRequest) -> ApiResult<Inseminator> {
        let rec = Inseminator {
            id: 0,
            first_name: req.first_name,
            last_name: req.last_name,
            phone_number: req.phone_number,
            license_number: req.license_number,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let inseminator = {
            let conn = self.get_conn()?;
            let tx = conn.unchecked_transaction()?;
            let id = InseminatorRepository::insert_tx(&tx, &rec)?;
            let inseminator = InseminatorRepository::find_by_id_tx(&tx, id)?
                .ok_or_else(|| ApiError::InternalError("配种员插入后不可读".to_string()))?;
            tx.commit()?;
            inseminator
        };
        Ok(inseminator)
    }

    // ==========================================
    // 牛只
    // ==========================================

    /// 创建牛只
    ///
    /// 校验: 牛名 / 出生日期 / 状态组合一致性
    /// 副作用: 盘点反应器全量重算
    pub fn create_cow(&self, req: CowRequest) -> ApiResult<Cow> {
        let today = Utc::now().date_naive();
        CowValidator::validate_name(&req.name)?;
        CowValidator::validate_date_of_birth(req.date_of_birth, today)?;

        let (cow, event) = {
            let conn = self.get_conn()?;
            let tx = conn.unchecked_transaction()?;

            let breed = CowBreedRepository::find_by_id_tx(&tx, req.breed_id)?
                .ok_or_else(|| ApiError::NotFound(format!("CowBreed(id={})不存在", req.breed_id)))?;

            let serial = CowRepository::next_serial_tx(&tx)?;
            let tag_number = Self::generate_tag_number(breed.name, req.date_of_birth, serial);

            let candidate = Cow {
                id: 0,
                name: req.name,
                breed_id: req.breed_id,
                gender: req.gender,
                date_of_birth: req.date_of_birth,
                category: req.category,
                availability_status: req.availability_status,
                current_pregnancy_status: req.current_pregnancy_status,
                current_production_status: req.current_production_status,
                is_bought: req.is_bought,
                tag_number,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            CowValidator::validate_status_consistency(&candidate)?;

            let id = CowRepository::insert_tx(&tx, &candidate)?;
            let cow = CowRepository::find_by_id_tx(&tx, id)?
                .ok_or_else(|| ApiError::InternalError("牛只插入后不可读".to_string()))?;
            tx.commit()?;
            (cow, FarmEvent::new(FarmEventType::CowSaved, id))
        };

        run_reactors(&self.conn, &self.config, &[event])?;
        Ok(cow)
    }

    /// 更新牛只（全量重校验）
    pub fn update_cow(&self, id: i64, req: CowRequest) -> ApiResult<Cow> {
        let today = Utc::now().date_naive();
        CowValidator::validate_name(&req.name)?;
        CowValidator::validate_date_of_birth(req.date_of_birth, today)?;

        let (cow, event) = {
            let conn = self.get_conn()?;
            let tx = conn.unchecked_transaction()?;

            let mut cow = CowRepository::find_by_id_tx(&tx, id)?
                .ok_or_else(|| ApiError::NotFound(format!("Cow(id={})不存在", id)))?;
            CowBreedRepository::find_by_id_tx(&tx, req.breed_id)?
                .ok_or_else(|| ApiError::NotFound(format!("CowBreed(id={})不存在", req.breed_id)))?;

            cow.name = req.name;
            cow.breed_id = req.breed_id;
            cow.gender = req.gender;
            cow.date_of_birth = req.date_of_birth;
            cow.category = req.category;
            cow.availability_status = req.availability_status;
            cow.current_pregnancy_status = req.current_pregnancy_status;
            cow.current_production_status = req.current_production_status;
            cow.is_bought = req.is_bought;
            CowValidator::validate_status_consistency(&cow)?;

            CowRepository::update_tx(&tx, &cow)?;
            tx.commit()?;
            (cow, FarmEvent::new(FarmEventType::CowSaved, id))
        };

        run_reactors(&self.conn, &self.config, &[event])?;
        Ok(cow)
    }

    /// 删除牛只
    ///
    /// 删除规则: 体重/隔离/发情等从属记录级联删除；
    ///           存在配种/妊娠引用时被外键保护拒绝（Conflict）
    pub fn delete_cow(&self, id: i64) -> ApiResult<()> {
        let event = {
            let conn = self.get_conn()?;
            let tx = conn.unchecked_transaction()?;
            CowRepository::delete_tx(&tx, id)?;
            tx.commit()?;
            FarmEvent::new(FarmEventType::CowDeleted, id)
        };
        run_reactors(&self.conn, &self.config, &[event])?;
        Ok(())
    }

    pub fn get_cow(&self, id: i64) -> ApiResult<Cow> {
        let repo = CowRepository::from_connection(Arc::clone(&self.conn));
        repo.find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("Cow(id={})不存在", id)))
    }

    pub fn list_cows(&self) -> ApiResult<Vec<Cow>> {
        let repo = CowRepository::from_connection(Arc::clone(&self.conn));
        Ok(repo.list()?)
    }

    /// 耳标号生成: {品种前缀2位}-{出生年}-{序号}
    fn generate_tag_number(breed: CowBreedName, date_of_birth: NaiveDate, serial: i64) -> String {
        use chrono::Datelike;
        let prefix: String = breed.as_str().chars().take(2).collect();
        format!("{}-{}-{}", prefix.to_uppercase(), date_of_birth.year(), serial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_tag_number() {
        let dob = NaiveDate::from_ymd_opt(2023, 4, 2).unwrap();
        assert_eq!(
            CowApi::generate_tag_number(CowBreedName::Friesian, dob, 12),
            "FR-2023-12"
        );
        assert_eq!(
            CowApi::generate_tag_number(CowBreedName::Jersey, dob, 1),
            "JE-2023-1"
        );
    }
}
