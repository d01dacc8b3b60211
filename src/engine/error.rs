// ==========================================
// 奶牛场管理系统 - 规则引擎错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 校验错误必须携带稳定 code（机器可读）+ 人类可读消息
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 业务校验错误
///
/// code 与规则一一对应且保持稳定（例如 invalid_weight / duplicate_weight_record），
/// 供 API 调用方做程序化分支；message 面向人
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} (code={code})")]
pub struct ValidationError {
    pub code: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// 引擎层错误类型
///
/// 校验器的跨记录规则需要读库，因此校验/仓储错误在此汇合；
/// 反应器前置条件缺失单独成枚举（§数据完整性断裂，需人工对账）
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("反应器前置条件缺失: {0}")]
    ReactorPrecondition(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
