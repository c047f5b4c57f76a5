use crate::entity::Entity;
use crate::error::IdmResult;
use std::sync::Arc;

/// 数据管理器：某一类实体的实际存储操作
///
/// 实体实例由调用方持有，数据管理器只接收引用；`insert` 允许就地修改实体
/// （例如分配标识），`update` 返回存储后的实体，可能与入参不同。
pub trait DataManager<E>: Send + Sync
where
    E: Entity,
{
    /// 按标识查找，不存在时返回 `None`
    fn find_by_id(&self, id: &str) -> IdmResult<Option<E>>;

    /// 创建一个未持久化的新实例
    fn create(&self) -> E;

    fn insert(&self, entity: &mut E) -> IdmResult<()>;

    fn update(&self, entity: &E) -> IdmResult<E>;

    fn delete(&self, entity: &E) -> IdmResult<()>;
}

impl<E, T> DataManager<E> for Arc<T>
where
    E: Entity,
    T: DataManager<E> + ?Sized,
{
    fn find_by_id(&self, id: &str) -> IdmResult<Option<E>> {
        (**self).find_by_id(id)
    }

    fn create(&self) -> E {
        (**self).create()
    }

    fn insert(&self, entity: &mut E) -> IdmResult<()> {
        (**self).insert(entity)
    }

    fn update(&self, entity: &E) -> IdmResult<E> {
        (**self).update(entity)
    }

    fn delete(&self, entity: &E) -> IdmResult<()> {
        (**self).delete(entity)
    }
}
