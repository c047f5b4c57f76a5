//! 实体（Entity）基础抽象
//!
//! 为身份引擎中的持久化记录提供统一的标识能力，以及可选的修订号（revision）能力：
//! - `Entity`：字符串标识 + 类型标签，可序列化为事件载荷；
//! - `HasRevision`：乐观锁使用的修订号，由实体自行决定“下一个”修订号如何计算。
//!
//! 管理器只检查修订能力是否存在（`revisioned_mut`），不关心实体的具体类型。
//!
use serde::Serialize;

/// 具备唯一标识的可持久化实体
pub trait Entity: Default + Serialize + Send + Sync {
    /// 实体类型标签（如 `user`、`group`），随事件一同下发
    const TYPE: &'static str;

    /// 获取实体标识
    fn id(&self) -> &str;

    /// 设置实体标识（通常由数据管理器在首次插入时分配）
    fn set_id(&mut self, id: String);

    /// 修订能力；默认不支持
    fn revisioned(&self) -> Option<&dyn HasRevision> {
        None
    }

    /// 修订能力（可变）；默认不支持
    fn revisioned_mut(&mut self) -> Option<&mut dyn HasRevision> {
        None
    }
}

/// 修订号能力（用于乐观锁与并发控制）
pub trait HasRevision {
    /// 当前修订号
    fn revision(&self) -> i32;

    fn set_revision(&mut self, revision: i32);

    /// 下一个修订号，默认 `revision + 1`，到达 `i32::MAX` 后回绕
    fn revision_next(&self) -> i32 {
        self.revision().wrapping_add(1)
    }
}
