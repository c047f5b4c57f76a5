//! 事件分发器（EventDispatcher）
//!
//! `EventDispatcher` 是实体管理器消费的协议：先询问是否启用，再同步分发事件。
//! `DefaultEventDispatcher` 为进程级共享实现，生命周期由 `IdmEngineConfig` 管理。
//!
use crate::error::{IdmError, IdmResult};
use crate::event::{EntityEvent, EntityEventType};
use crate::eventing::EventListener;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{trace, warn};

/// 事件分发器：负责把生命周期事件广播给已注册的监听器
pub trait EventDispatcher: Send + Sync {
    /// 是否启用；未启用时调用方不应分发任何事件
    fn is_enabled(&self) -> bool;

    /// 同步分发事件
    fn dispatch_event(&self, event: &EntityEvent) -> IdmResult<()>;
}

impl<T> EventDispatcher for Arc<T>
where
    T: EventDispatcher + ?Sized,
{
    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }

    fn dispatch_event(&self, event: &EntityEvent) -> IdmResult<()> {
        (**self).dispatch_event(event)
    }
}

/// 默认分发器
/// - 全量监听器接收所有类型的事件，先于按类型注册的监听器被通知
/// - 同一类别内按注册顺序通知
/// - 通知前对监听器列表做快照，监听器内可安全地注册/注销
pub struct DefaultEventDispatcher {
    enabled: AtomicBool,
    listeners: RwLock<Vec<Arc<dyn EventListener>>>,
    typed_listeners: DashMap<EntityEventType, Vec<Arc<dyn EventListener>>>,
}

impl Default for DefaultEventDispatcher {
    fn default() -> Self {
        Self::new(true)
    }
}

impl DefaultEventDispatcher {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            listeners: RwLock::new(Vec::new()),
            typed_listeners: DashMap::new(),
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    /// 注册接收全部事件类型的监听器（重复注册同一实例将被忽略）
    pub fn add_event_listener(&self, listener: Arc<dyn EventListener>) {
        let mut listeners = self.listeners.write();
        if !listeners.iter().any(|l| same_listener(l, &listener)) {
            listeners.push(listener);
        }
    }

    /// 注册仅接收指定事件类型的监听器；`types` 为空时等同于 `add_event_listener`
    pub fn add_typed_event_listener(
        &self,
        listener: Arc<dyn EventListener>,
        types: &[EntityEventType],
    ) {
        if types.is_empty() {
            self.add_event_listener(listener);
            return;
        }

        for event_type in types {
            let mut entry = self.typed_listeners.entry(*event_type).or_default();
            if !entry.iter().any(|l| same_listener(l, &listener)) {
                entry.push(Arc::clone(&listener));
            }
        }
    }

    /// 从全量与按类型注册表中移除监听器，返回是否有移除发生
    pub fn remove_event_listener(&self, listener: &Arc<dyn EventListener>) -> bool {
        let mut removed = false;

        {
            let mut listeners = self.listeners.write();
            let before = listeners.len();
            listeners.retain(|l| !same_listener(l, listener));
            removed |= listeners.len() != before;
        }

        for mut entry in self.typed_listeners.iter_mut() {
            let before = entry.len();
            entry.retain(|l| !same_listener(l, listener));
            removed |= entry.len() != before;
        }

        removed
    }

    fn snapshot(&self, event_type: EntityEventType) -> Vec<Arc<dyn EventListener>> {
        let mut out: Vec<Arc<dyn EventListener>> = self.listeners.read().clone();
        if let Some(typed) = self.typed_listeners.get(&event_type) {
            out.extend(typed.iter().cloned());
        }
        out
    }

    fn notify(listener: &Arc<dyn EventListener>, event: &EntityEvent) -> IdmResult<()> {
        trace!(
            listener = listener.listener_name(),
            event_type = %event.event_type,
            entity_id = event.entity_id(),
            "notify listener"
        );

        if let Err(err) = listener.on_event(event) {
            if listener.fail_on_exception() {
                return Err(IdmError::EventListener {
                    listener: listener.listener_name().to_string(),
                    reason: format!("{err:#}"),
                });
            }
            warn!(
                listener = listener.listener_name(),
                event_type = %event.event_type,
                error = %format!("{err:#}"),
                "event listener failed, continuing dispatch"
            );
        }
        Ok(())
    }
}

impl EventDispatcher for DefaultEventDispatcher {
    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    fn dispatch_event(&self, event: &EntityEvent) -> IdmResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        for listener in self.snapshot(event.event_type) {
            Self::notify(&listener, event)?;
        }
        Ok(())
    }
}

// 仅比较数据指针，忽略 vtable
fn same_listener(a: &Arc<dyn EventListener>, b: &Arc<dyn EventListener>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}
