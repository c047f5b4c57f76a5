use crate::entity::Entity;
use crate::error::{IdmError, IdmResult};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::event_type::EntityEventType;
use super::metadata::EventMetadata;

/// 生命周期事件：事件类型 + 元数据 + 触发时刻的实体快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityEvent {
    pub event_type: EntityEventType,
    pub metadata: EventMetadata,
    pub payload: serde_json::Value,
}

impl EntityEvent {
    /// 以实体当前状态构建事件（载荷为实体的 JSON 快照）
    pub fn for_entity<E>(event_type: EntityEventType, entity: &E) -> IdmResult<Self>
    where
        E: Entity,
    {
        let metadata = EventMetadata::builder()
            .event_id(Uuid::new_v4().to_string())
            .entity_id(entity.id().to_string())
            .entity_type(E::TYPE.to_string())
            .occurred_at(Utc::now())
            .build();

        Ok(Self {
            event_type,
            metadata,
            payload: serde_json::to_value(entity)?,
        })
    }

    pub fn entity_id(&self) -> &str {
        self.metadata.entity_id()
    }

    pub fn entity_type(&self) -> &str {
        self.metadata.entity_type()
    }

    /// 是否由实体类型 `E` 触发
    pub fn is_for<E: Entity>(&self) -> bool {
        self.entity_type() == E::TYPE
    }

    /// 将载荷还原为具体实体，类型标签不匹配时报错
    pub fn entity<E>(&self) -> IdmResult<E>
    where
        E: Entity + DeserializeOwned,
    {
        if !self.is_for::<E>() {
            return Err(IdmError::InvalidEvent {
                reason: format!(
                    "entity type mismatch: expected={}, found={}",
                    E::TYPE,
                    self.entity_type()
                ),
            });
        }
        Ok(serde_json::from_value(self.payload.clone())?)
    }
}
