//! 事件子系统（eventing）
//!
//! 提供生命周期事件的分发与监听：
//! - `EventDispatcher`：实体管理器依赖的分发协议（是否启用 + 同步分发）；
//! - `DefaultEventDispatcher`：可启停、支持全量/按类型注册监听器的默认实现；
//! - `EventListener`：对事件进行消费处理，并声明失败时是否中断分发；
//! - `BroadcastEventListener`：把事件桥接到 tokio broadcast，供异步任务订阅。
//!
pub mod dispatcher;
pub mod listener;

#[cfg(feature = "broadcast")]
pub mod broadcast;

#[cfg(feature = "broadcast")]
pub use broadcast::BroadcastEventListener;
pub use dispatcher::{DefaultEventDispatcher, EventDispatcher};
pub use listener::EventListener;
