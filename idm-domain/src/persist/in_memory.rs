//! 内存版数据管理器（InMemoryDataManager）
//!
//! 基于 `DashMap` 的轻量实现，满足 `DataManager` 协议：
//! - `insert`：标识为空时分配 UUID，重复标识报 `AlreadyExists`；
//! - `update`/`delete`：对支持修订号的实体做乐观锁校验，`update` 成功后修订号前进；
//! - 典型用途：测试环境、示例与本地开发。

use crate::entity::Entity;
use crate::error::{IdmError, IdmResult};
use crate::persist::DataManager;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

pub struct InMemoryDataManager<E> {
    entities: DashMap<String, E>,
}

impl<E> Default for InMemoryDataManager<E> {
    fn default() -> Self {
        Self {
            entities: DashMap::new(),
        }
    }
}

impl<E> InMemoryDataManager<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl<E> InMemoryDataManager<E>
where
    E: Entity,
{
    // 存储中的修订号必须与调用方持有的一致
    fn check_revision(stored: &E, given: &E) -> IdmResult<()> {
        if let (Some(stored_rev), Some(given_rev)) = (stored.revisioned(), given.revisioned()) {
            if stored_rev.revision() != given_rev.revision() {
                return Err(IdmError::OptimisticLock {
                    entity_type: E::TYPE.to_string(),
                    id: given.id().to_string(),
                    expected: given_rev.revision(),
                    actual: stored_rev.revision(),
                });
            }
        }
        Ok(())
    }
}

impl<E> DataManager<E> for InMemoryDataManager<E>
where
    E: Entity + Clone,
{
    fn find_by_id(&self, id: &str) -> IdmResult<Option<E>> {
        Ok(self.entities.get(id).map(|e| e.value().clone()))
    }

    fn create(&self) -> E {
        E::default()
    }

    fn insert(&self, entity: &mut E) -> IdmResult<()> {
        if entity.id().is_empty() {
            entity.set_id(Uuid::new_v4().to_string());
        }

        match self.entities.entry(entity.id().to_string()) {
            Entry::Occupied(_) => Err(IdmError::AlreadyExists {
                entity_type: E::TYPE.to_string(),
                id: entity.id().to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(entity.clone());
                Ok(())
            }
        }
    }

    fn update(&self, entity: &E) -> IdmResult<E> {
        let mut stored = self
            .entities
            .get_mut(entity.id())
            .ok_or_else(|| IdmError::not_found(E::TYPE, entity.id()))?;

        Self::check_revision(stored.value(), entity)?;

        let mut updated = entity.clone();
        if let Some(rev) = updated.revisioned_mut() {
            let next = rev.revision_next();
            rev.set_revision(next);
        }
        *stored = updated.clone();

        Ok(updated)
    }

    fn delete(&self, entity: &E) -> IdmResult<()> {
        match self.entities.entry(entity.id().to_string()) {
            Entry::Vacant(_) => Err(IdmError::not_found(E::TYPE, entity.id())),
            Entry::Occupied(slot) => {
                Self::check_revision(slot.get(), entity)?;
                slot.remove();
                Ok(())
            }
        }
    }
}
