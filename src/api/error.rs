// ==========================================
// 门店自提预订系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换仓储层错误为调用方友好的错误消息
// 约束: 所有错误信息必须包含显式原因，不得静默吞错
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入校验错误（调用方可修正后重试）
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    // ==========================================
    // 资源耗尽错误（可换时段重试）
    // ==========================================
    #[error("时段已满: {0}")]
    SlotFull(String),

    #[error("无可用时段: {0}")]
    NoSlotsAvailable(String),

    // ==========================================
    // 引用过期错误（客户端刷新目录后重试）
    // ==========================================
    #[error("商品已下架或不存在: {0}")]
    StaleProduct(String),

    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// 目的: 将仓储层的技术错误转换为调用方友好的业务错误
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            // 业务资源错误
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::SlotFull { slot_id } => {
                ApiError::SlotFull(format!("时段{}已被约满，请选择其他时段", slot_id))
            }
            RepositoryError::NoSlotsAvailable { store_id } => {
                ApiError::NoSlotsAvailable(format!("门店{}当前没有可预订的时段", store_id))
            }
            RepositoryError::StaleProduct { product_id } => {
                ApiError::StaleProduct(format!("商品{}已不在目录中，请刷新后重试", product_id))
            }
            RepositoryError::InvalidStateTransition { from, to } => {
                ApiError::InvalidStateTransition { from, to }
            }

            // 数据库错误
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("外键约束违反: {}", msg))
            }
            RepositoryError::CheckConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("检查约束违反: {}", msg))
            }

            // 数据质量错误
            RepositoryError::ValidationError(msg) => ApiError::ValidationError(msg),

            // 通用错误
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_conversion() {
        // NotFound错误转换
        let repo_err = RepositoryError::NotFound {
            entity: "Order".to_string(),
            id: "O001".to_string(),
        };
        let api_err: ApiError = repo_err.into();
        match api_err {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("Order"));
                assert!(msg.contains("O001"));
            }
            _ => panic!("Expected NotFound"),
        }

        // SlotFull错误转换
        let repo_err = RepositoryError::SlotFull {
            slot_id: "S001".to_string(),
        };
        let api_err: ApiError = repo_err.into();
        match api_err {
            ApiError::SlotFull(msg) => assert!(msg.contains("S001")),
            _ => panic!("Expected SlotFull"),
        }

        // 状态转换错误保留 from/to
        let repo_err = RepositoryError::InvalidStateTransition {
            from: "COMPLETED".to_string(),
            to: "READY".to_string(),
        };
        let api_err: ApiError = repo_err.into();
        match api_err {
            ApiError::InvalidStateTransition { from, to } => {
                assert_eq!(from, "COMPLETED");
                assert_eq!(to, "READY");
            }
            _ => panic!("Expected InvalidStateTransition"),
        }
    }
}
