//! 持久化协作者（persist）
//!
//! 定义实体管理器委托的数据访问协议 `DataManager`，以及基于内存的参考实现
//! `InMemoryDataManager`（带修订号校验），具体存储后端由上层提供实现并注入。
//!
mod data_manager;
mod in_memory;

pub use data_manager::DataManager;
pub use in_memory::InMemoryDataManager;
