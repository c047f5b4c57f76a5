//! 身份引擎统一错误定义
//!
//! 聚焦数据管理器、乐观锁、事件分发与序列化的最小必要集合；
//! 实体管理器自身不做任何转换，协作者返回的错误原样向上传播。
//!
use thiserror::Error;

/// 统一错误类型（基础库最小必要集）
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum IdmError {
    // --- 数据访问 ---
    #[error("not found: entity_type={entity_type}, id={id}")]
    NotFound { entity_type: String, id: String },
    #[error("already exists: entity_type={entity_type}, id={id}")]
    AlreadyExists { entity_type: String, id: String },
    #[error("optimistic lock: entity_type={entity_type}, id={id}, expected={expected}, actual={actual}")]
    OptimisticLock {
        entity_type: String,
        id: String,
        expected: i32,
        actual: i32,
    },
    #[error("data manager error: {reason}")]
    DataManager { reason: String },

    // --- 事件系统 ---
    #[error("event listener error: listener={listener}, reason={reason}")]
    EventListener { listener: String, reason: String },
    #[error("invalid event: {reason}")]
    InvalidEvent { reason: String },
    #[error("event stream error: {reason}")]
    EventStream { reason: String },

    // --- 序列化 ---
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },
}

impl IdmError {
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        IdmError::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    pub fn data_manager(reason: impl Into<String>) -> Self {
        IdmError::DataManager {
            reason: reason.into(),
        }
    }
}

/// 统一 Result 类型别名
pub type IdmResult<T> = Result<T, IdmError>;
