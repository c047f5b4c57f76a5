//! 实体管理器（EntityManager）
//!
//! 面向单一实体类型的 CRUD 入口：
//! - 存储操作全部委托给注入的 `DataManager`；
//! - 生命周期事件通过注入的 `EventDispatcher` 分发，且总在持久化完成之后；
//! - 插入时若实体支持修订号，先将其推进到“下一个”修订号。
//!
//! 管理器本身无状态，除协作者句柄外不持有任何可变数据，可在线程间共享。
//!
use crate::entity::Entity;
use crate::error::{IdmError, IdmResult};
use crate::event::{EntityEvent, EntityEventType};
use crate::eventing::EventDispatcher;
use crate::persist::DataManager;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

pub struct EntityManager<E, D> {
    data_manager: D,
    event_dispatcher: Arc<dyn EventDispatcher>,
    _entity: PhantomData<fn() -> E>,
}

impl<E, D> EntityManager<E, D>
where
    E: Entity,
    D: DataManager<E>,
{
    pub fn new(data_manager: D, event_dispatcher: Arc<dyn EventDispatcher>) -> Self {
        Self {
            data_manager,
            event_dispatcher,
            _entity: PhantomData,
        }
    }

    /// 该实体类型的数据管理器
    pub fn data_manager(&self) -> &D {
        &self.data_manager
    }

    pub fn event_dispatcher(&self) -> &Arc<dyn EventDispatcher> {
        &self.event_dispatcher
    }

    pub fn find_by_id(&self, id: &str) -> IdmResult<Option<E>> {
        self.data_manager.find_by_id(id)
    }

    /// 创建未持久化的新实例，不触及存储
    pub fn create(&self) -> E {
        self.data_manager.create()
    }

    /// 插入并分发创建事件，等价于 `insert_with(entity, true)`
    pub fn insert(&self, entity: &mut E) -> IdmResult<()> {
        self.insert_with(entity, true)
    }

    /// 插入实体
    ///
    /// `fire_create_event` 为 `true` 且分发器启用时，依次分发
    /// `EntityCreated` 与 `EntityInitialized`。
    pub fn insert_with(&self, entity: &mut E, fire_create_event: bool) -> IdmResult<()> {
        if let Some(rev) = entity.revisioned_mut() {
            let next = rev.revision_next();
            rev.set_revision(next);
        }

        self.data_manager.insert(entity)?;
        debug!(entity_type = E::TYPE, id = entity.id(), "entity inserted");

        if fire_create_event && self.event_dispatcher.is_enabled() {
            self.dispatch(EntityEventType::EntityCreated, entity)?;
            self.dispatch(EntityEventType::EntityInitialized, entity)?;
        }
        Ok(())
    }

    /// 更新实体，返回数据管理器给出的更新后实体；
    /// `EntityUpdated` 事件携带的是调用方传入的实体
    pub fn update(&self, entity: &E) -> IdmResult<E> {
        let updated = self.data_manager.update(entity)?;
        debug!(entity_type = E::TYPE, id = entity.id(), "entity updated");

        if self.event_dispatcher.is_enabled() {
            self.dispatch(EntityEventType::EntityUpdated, entity)?;
        }
        Ok(updated)
    }

    /// 按标识删除；标识不存在时返回 `NotFound`，不触及存储也不分发事件
    pub fn delete_by_id(&self, id: &str) -> IdmResult<()> {
        let entity = self
            .find_by_id(id)?
            .ok_or_else(|| IdmError::not_found(E::TYPE, id))?;
        self.delete(&entity)
    }

    pub fn delete(&self, entity: &E) -> IdmResult<()> {
        self.data_manager.delete(entity)?;
        debug!(entity_type = E::TYPE, id = entity.id(), "entity deleted");

        if self.event_dispatcher.is_enabled() {
            self.dispatch(EntityEventType::EntityDeleted, entity)?;
        }
        Ok(())
    }

    fn dispatch(&self, event_type: EntityEventType, entity: &E) -> IdmResult<()> {
        let event = EntityEvent::for_entity(event_type, entity)?;
        self.event_dispatcher.dispatch_event(&event)
    }
}
