//! 实体生命周期事件（Entity Event）
//!
//! 定义生命周期事件类型（`EntityEventType`）、事件元数据（`EventMetadata`），
//! 以及将实体快照与元数据封装后的 `EntityEvent`。

mod entity_event;
mod event_type;
mod metadata;

pub use entity_event::EntityEvent;
pub use event_type::EntityEventType;
pub use metadata::EventMetadata;
