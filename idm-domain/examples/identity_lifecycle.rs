use futures_util::StreamExt;
use idm_domain::config::IdmEngineConfig;
use idm_domain::error::IdmResult;
use idm_domain::event::{EntityEvent, EntityEventType};
use idm_domain::eventing::{BroadcastEventListener, EventListener};
use idm_domain::identity::{
    GroupEntity, GroupEntityManager, MembershipEntity, MembershipEntityManager, UserEntity,
    UserEntityManager,
};
use idm_domain::persist::InMemoryDataManager;
use std::collections::HashMap;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// 只关心删除事件的审计监听器
struct DeletionAudit;

impl EventListener for DeletionAudit {
    fn listener_name(&self) -> &str {
        "deletion-audit"
    }

    fn on_event(&self, event: &EntityEvent) -> anyhow::Result<()> {
        println!(
            "🗑  {} {} removed",
            event.entity_type(),
            event.entity_id()
        );
        Ok(())
    }
}

#[tokio::main]
async fn main() -> IdmResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
        .init();

    println!("=== 身份实体生命周期示例 ===\n");

    let stream_listener = BroadcastEventListener::new("stream", 64);
    let mut events = stream_listener.subscribe();

    let engine = IdmEngineConfig::builder()
        .event_listeners(vec![Arc::new(stream_listener) as Arc<dyn EventListener>])
        .typed_event_listeners(HashMap::from([(
            EntityEventType::EntityDeleted,
            vec![Arc::new(DeletionAudit) as Arc<dyn EventListener>],
        )]))
        .build()
        .build_engine();

    let users: UserEntityManager<_> =
        engine.entity_manager(InMemoryDataManager::<UserEntity>::new());
    let groups: GroupEntityManager<_> =
        engine.entity_manager(InMemoryDataManager::<GroupEntity>::new());
    let memberships: MembershipEntityManager<_> =
        engine.entity_manager(InMemoryDataManager::<MembershipEntity>::new());

    let mut ada = users.create();
    ada.first_name = "Ada".into();
    ada.last_name = "Lovelace".into();
    ada.email = "ada@example.com".into();
    users.insert(&mut ada)?;
    println!("✅ 新增用户 {}（revision={}）", ada.id, ada.revision);

    let mut admins = groups.create();
    admins.name = "admins".into();
    admins.group_type = "security-role".into();
    groups.insert(&mut admins)?;
    println!("✅ 新增用户组 {}（revision={}）", admins.id, admins.revision);

    let mut membership = MembershipEntity {
        user_id: ada.id.clone(),
        group_id: admins.id.clone(),
        ..Default::default()
    };
    memberships.insert_with(&mut membership, false)?;
    println!("✅ 关联成员关系（不分发创建事件）");

    ada.email = "countess@example.com".into();
    let ada = users.update(&ada)?;
    println!("✅ 更新邮箱，revision -> {}", ada.revision);

    memberships.delete(&membership)?;
    groups.delete_by_id(&admins.id)?;
    users.delete(&ada)?;

    // 引擎与监听器随作用域结束释放后，事件流自然结束
    drop((users, groups, memberships, engine));

    println!("\n--- 事件流 ---");
    while let Some(event) = events.next().await {
        let event = event?;
        println!("{} {} {}", event.event_type, event.entity_type(), event.entity_id());
    }

    Ok(())
}
