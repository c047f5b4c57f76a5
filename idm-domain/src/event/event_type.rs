use crate::error::{IdmError, IdmResult};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// 实体生命周期事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityEventType {
    /// 实体已持久化
    EntityCreated,
    /// 实体已创建且完成初始化（总在 `EntityCreated` 之后）
    EntityInitialized,
    EntityUpdated,
    EntityDeleted,
}

impl EntityEventType {
    pub const ALL: [EntityEventType; 4] = [
        EntityEventType::EntityCreated,
        EntityEventType::EntityInitialized,
        EntityEventType::EntityUpdated,
        EntityEventType::EntityDeleted,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            EntityEventType::EntityCreated => "ENTITY_CREATED",
            EntityEventType::EntityInitialized => "ENTITY_INITIALIZED",
            EntityEventType::EntityUpdated => "ENTITY_UPDATED",
            EntityEventType::EntityDeleted => "ENTITY_DELETED",
        }
    }
}

impl fmt::Display for EntityEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityEventType {
    type Err = IdmError;

    fn from_str(s: &str) -> IdmResult<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| IdmError::InvalidEvent {
                reason: format!("unknown event type: {s}"),
            })
    }
}
