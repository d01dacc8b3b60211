// ==========================================
// 奶牛场管理系统 - 配置管理器
// ==========================================
// 职责: 繁殖阈值等配置的加载与覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::db::open_sqlite_connection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

// ==========================================
// BreedingParams - 繁殖阈值参数
// ==========================================
/// 繁殖规则阈值（天）
///
/// 默认值为编译期常量，config_kv 中的 global 配置可覆写
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreedingParams {
    /// 最低配种年龄
    pub min_breeding_age_days: i64,
    /// 两次发情观察的最小间隔
    pub heat_interval_days: i64,
    /// 产犊后不允许发情观察的窗口
    pub post_calving_window_days: i64,
    /// 两次配种的最小间隔
    pub insemination_interval_days: i64,
    /// 开放妊娠的最长持续天数（超出视为状态不一致）
    pub max_open_pregnancy_days: i64,
}

impl Default for BreedingParams {
    fn default() -> Self {
        Self {
            min_breeding_age_days: 365,
            heat_interval_days: 21,
            post_calving_window_days: 60,
            insemination_interval_days: 21,
            max_open_pregnancy_days: 295,
        }
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 写入 global scope 配置值（upsert）
    pub fn set_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    fn get_i64_or(&self, key: &str, default: i64) -> RepositoryResult<i64> {
        match self.get_config_value(key)? {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(v) if v > 0 => Ok(v),
                _ => {
                    tracing::warn!("配置值无效，回退默认: key={}, value={}", key, raw);
                    Ok(default)
                }
            },
            None => Ok(default),
        }
    }

    /// 读取繁殖阈值参数（缺失项回退编译期默认值）
    pub fn breeding_params(&self) -> RepositoryResult<BreedingParams> {
        let defaults = BreedingParams::default();
        Ok(BreedingParams {
            min_breeding_age_days: self
                .get_i64_or("breeding.min_breeding_age_days", defaults.min_breeding_age_days)?,
            heat_interval_days: self
                .get_i64_or("breeding.heat_interval_days", defaults.heat_interval_days)?,
            post_calving_window_days: self.get_i64_or(
                "breeding.post_calving_window_days",
                defaults.post_calving_window_days,
            )?,
            insemination_interval_days: self.get_i64_or(
                "breeding.insemination_interval_days",
                defaults.insemination_interval_days,
            )?,
            max_open_pregnancy_days: self.get_i64_or(
                "breeding.max_open_pregnancy_days",
                defaults.max_open_pregnancy_days,
            )?,
        })
    }
}
