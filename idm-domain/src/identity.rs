//! 身份实体（identity）
//!
//! 用户、用户组带修订号，参与乐观锁；成员关系为纯关联记录，不带修订号。
//!
use crate::entity_manager::EntityManager;
use idm_macros::entity;

#[entity(name = "user", revision = true)]
#[derive(PartialEq)]
pub struct UserEntity {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: Option<String>,
}

#[entity(name = "group", revision = true)]
#[derive(PartialEq)]
pub struct GroupEntity {
    pub name: String,
    pub group_type: String,
}

/// 用户与用户组的成员关系
#[entity(name = "membership")]
#[derive(PartialEq)]
pub struct MembershipEntity {
    pub user_id: String,
    pub group_id: String,
}

pub type UserEntityManager<D> = EntityManager<UserEntity, D>;
pub type GroupEntityManager<D> = EntityManager<GroupEntity, D>;
pub type MembershipEntityManager<D> = EntityManager<MembershipEntity, D>;
