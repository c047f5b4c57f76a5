//! 引擎配置（IdmEngineConfig）
//!
//! 持有进程级事件分发器的装配参数；`build_engine` 之后得到 `IdmEngine`，
//! 由它创建的所有实体管理器共享同一个分发器实例。
//!
use crate::entity::Entity;
use crate::entity_manager::EntityManager;
use crate::event::EntityEventType;
use crate::eventing::{DefaultEventDispatcher, EventDispatcher, EventListener};
use crate::persist::DataManager;
use bon::Builder;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Builder, Clone)]
pub struct IdmEngineConfig {
    /// 是否启用事件分发
    #[builder(default = true)]
    pub enable_event_dispatcher: bool,
    /// 接收全部事件类型的监听器
    #[builder(default)]
    pub event_listeners: Vec<Arc<dyn EventListener>>,
    /// 按事件类型注册的监听器
    #[builder(default)]
    pub typed_event_listeners: HashMap<EntityEventType, Vec<Arc<dyn EventListener>>>,
}

impl Default for IdmEngineConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl IdmEngineConfig {
    /// 初始化事件分发器并注册配置中的监听器
    pub fn build_engine(self) -> IdmEngine {
        let dispatcher = DefaultEventDispatcher::new(self.enable_event_dispatcher);

        for listener in &self.event_listeners {
            dispatcher.add_event_listener(Arc::clone(listener));
        }
        for (event_type, listeners) in &self.typed_event_listeners {
            for listener in listeners {
                dispatcher.add_typed_event_listener(Arc::clone(listener), &[*event_type]);
            }
        }

        debug!(
            enabled = self.enable_event_dispatcher,
            listeners = self.event_listeners.len(),
            typed_listeners = self.typed_event_listeners.values().map(Vec::len).sum::<usize>(),
            "event dispatcher initialized"
        );

        IdmEngine {
            event_dispatcher: Arc::new(dispatcher),
        }
    }
}

/// 已装配的引擎：持有共享的事件分发器
#[derive(Clone)]
pub struct IdmEngine {
    event_dispatcher: Arc<DefaultEventDispatcher>,
}

impl IdmEngine {
    pub fn event_dispatcher(&self) -> &Arc<DefaultEventDispatcher> {
        &self.event_dispatcher
    }

    /// 为某一实体类型创建管理器，注入给定的数据管理器与共享分发器
    pub fn entity_manager<E, D>(&self, data_manager: D) -> EntityManager<E, D>
    where
        E: Entity,
        D: DataManager<E>,
    {
        let dispatcher: Arc<dyn EventDispatcher> = self.event_dispatcher.clone();
        EntityManager::new(data_manager, dispatcher)
    }
}
