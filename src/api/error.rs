// ==========================================
// 奶牛场管理系统 - API 层错误类型
// ==========================================
// 职责: 错误分类学（§错误处理设计）
// - Validation: 客户端违反业务规则，携带稳定 code，不重试
// - Conflict: 唯一约束/保护引用冲突，不重试
// - ReactorFailure: 反应器前置条件断裂，内部错误，记录日志待人工对账
// - NotFound: 查询目标不存在（盘点单例缺失除外 —— 那是合法空态）
// ==========================================

use crate::engine::error::{EngineError, ValidationError};
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API 层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== 业务规则错误 =====
    #[error("校验失败 [{code}]: {message}")]
    Validation { code: &'static str, message: String },

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("冲突: {0}")]
    Conflict(String),

    // ===== 派生反应器错误 =====
    /// 主写入已提交，反应器效果未生效，需人工对账
    #[error("反应器执行失败（主写入已提交，需人工对账）: {0}")]
    ReactorFailure(String),

    // ===== 数据访问错误 =====
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 校验错误的稳定 code（非校验错误返回 None）
    pub fn validation_code(&self) -> Option<&'static str> {
        match self {
            ApiError::Validation { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation {
            code: err.code,
            message: err.message,
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// 目的: 将仓储层的技术错误转换为调用方可分类的业务错误
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::Conflict(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::Conflict(format!("外键约束违反: {}", msg))
            }
            RepositoryError::DatabaseConnectionError(msg)
            | RepositoryError::DatabaseTransactionError(msg)
            | RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::DatabaseError(format!("字段值错误 (field={}): {}", field, message))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(e) => ApiError::Other(e),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Validation(e) => e.into(),
            EngineError::ReactorPrecondition(msg) => ApiError::ReactorFailure(msg),
            EngineError::Repository(e) => e.into(),
        }
    }
}

impl From<rusqlite::Error> for ApiError {
    fn from(err: rusqlite::Error) -> Self {
        RepositoryError::from(err).into()
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
