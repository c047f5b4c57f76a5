//! 身份引擎实体持久化基础库（idm-domain）
//!
//! 提供单一实体类型的 CRUD 与生命周期事件分发：
//! - 实体（`entity`）与可选的修订号能力（`HasRevision`）
//! - 生命周期事件（`event`）：`ENTITY_CREATED`/`ENTITY_INITIALIZED`/`ENTITY_UPDATED`/`ENTITY_DELETED`
//! - 事件系统（`eventing`）：分发器、监听器与 broadcast 桥接
//! - 数据访问协作者（`persist`）：`DataManager` 协议与内存实现
//! - 实体管理器（`entity_manager`）：委托存储、推进修订号、按序分发事件
//! - 引擎配置（`config`）：进程级事件分发器的装配
//!
//! 本 crate 不绑定任何存储后端，所有持久化与事务语义由注入的 `DataManager` 负责。
//!
//! 典型用法：
//! 1. 使用 `#[entity]` 定义实体，按需开启 `revision`；
//! 2. 实现或选用 `DataManager`（如 `InMemoryDataManager`）；
//! 3. 通过 `IdmEngineConfig` 构建分发器并注册监听器；
//! 4. 以 `EntityManager` 执行 insert/update/delete，监听器按序收到生命周期事件。
//!
pub mod config;
pub mod entity;
pub mod entity_manager;
pub mod error;
pub mod event;
pub mod eventing;
pub mod identity;
pub mod persist;

pub use idm_macros::entity;

// 允许在本 crate 内部通过 ::idm_domain 进行自引用，
// 以便过程宏在本 crate 内展开时也能解析到 ::idm_domain 路径。
extern crate self as idm_domain;
