//! 事件监听器（EventListener）
//!
//! 定义消费生命周期事件的处理逻辑与元信息（名称、失败策略）。
//!
use crate::event::EntityEvent;

/// 事件监听器：处理分发器下发的生命周期事件
pub trait EventListener: Send + Sync {
    /// 监听器名称（用于日志与错误定位）
    fn listener_name(&self) -> &str;

    /// 处理事件
    fn on_event(&self, event: &EntityEvent) -> anyhow::Result<()>;

    /// 处理失败时是否中断分发并将错误返回给调用方；
    /// 为 `false` 时仅记录告警，继续通知其余监听器
    fn fail_on_exception(&self) -> bool {
        false
    }
}
