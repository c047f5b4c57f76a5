//! 广播监听器（BroadcastEventListener）
//!
//! 基于 `tokio::sync::broadcast` 把同步分发的生命周期事件桥接为异步事件流：
//! - `on_event`：克隆并广播事件（同步发送，不阻塞实体管理器）；
//! - `subscribe`：返回 `'static` 生命周期事件流，便于在 `tokio::spawn` 中使用；
//! - 典型用途：审计、缓存失效等需要在异步任务中消费事件的场景。
//!
//! 注意：若无订阅者，发送将被忽略；订阅者落后超过缓冲容量时会收到 `IdmError::EventStream`，
//! 随后继续接收仍在缓冲区内的事件。

use crate::error::{IdmError, IdmResult};
use crate::event::EntityEvent;
use crate::eventing::EventListener;
use futures_core::stream::BoxStream;
use futures_util::StreamExt;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

/// 把事件转发到内存广播通道的监听器
#[derive(Clone)]
pub struct BroadcastEventListener {
    name: String,
    tx: broadcast::Sender<EntityEvent>,
}

impl BroadcastEventListener {
    /// 创建广播监听器，`capacity` 为广播缓冲区容量（最小为 1，传入 0 按 1 处理）
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self {
            name: name.into(),
            tx,
        }
    }

    /// 返回一个 'static 生命周期的事件流，仅包含订阅之后分发的事件
    pub fn subscribe(&self) -> BoxStream<'static, IdmResult<EntityEvent>> {
        let rx = self.tx.subscribe();
        let stream = BroadcastStream::new(rx).map(|r| {
            r.map_err(|e| IdmError::EventStream {
                reason: e.to_string(),
            })
        });
        Box::pin(stream)
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl EventListener for BroadcastEventListener {
    fn listener_name(&self) -> &str {
        &self.name
    }

    fn on_event(&self, event: &EntityEvent) -> anyhow::Result<()> {
        // 若当前无订阅者，broadcast 的 send 会返回错误，这里视为非致命并忽略
        let _ = self.tx.send(event.clone());
        Ok(())
    }
}
