use idm_domain::entity::{Entity, HasRevision};
use idm_domain::entity_manager::EntityManager;
use idm_domain::error::{IdmError, IdmResult};
use idm_domain::event::{EntityEvent, EntityEventType};
use idm_domain::eventing::EventDispatcher;
use idm_domain::persist::DataManager;
use idm_macros::entity;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[entity(name = "plain_user")]
#[derive(PartialEq)]
struct PlainUser {
    name: String,
}

#[entity(name = "revisioned_user", revision = true)]
#[derive(PartialEq)]
struct RevisionedUser {
    name: String,
}

type Log = Arc<Mutex<Vec<String>>>;

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// 记录调用顺序的数据管理器；`update` 返回经 `on_update` 加工后的新实例
struct RecordingDataManager<E> {
    log: Log,
    rows: Mutex<HashMap<String, E>>,
    on_update: fn(&E) -> E,
    fail_insert: bool,
}

impl<E: Entity + Clone> RecordingDataManager<E> {
    fn new(log: &Log, on_update: fn(&E) -> E) -> Self {
        Self {
            log: Arc::clone(log),
            rows: Mutex::new(HashMap::new()),
            on_update,
            fail_insert: false,
        }
    }

    fn seed(&self, entity: E) {
        self.rows
            .lock()
            .unwrap()
            .insert(entity.id().to_string(), entity);
    }
}

impl<E: Entity + Clone> DataManager<E> for RecordingDataManager<E> {
    fn find_by_id(&self, id: &str) -> IdmResult<Option<E>> {
        self.log.lock().unwrap().push(format!("dm.find:{id}"));
        Ok(self.rows.lock().unwrap().get(id).cloned())
    }

    fn create(&self) -> E {
        self.log.lock().unwrap().push("dm.create".to_string());
        E::default()
    }

    fn insert(&self, entity: &mut E) -> IdmResult<()> {
        let rev = entity
            .revisioned()
            .map(|r| format!("@{}", r.revision()))
            .unwrap_or_default();
        self.log
            .lock()
            .unwrap()
            .push(format!("dm.insert:{}{rev}", entity.id()));
        if self.fail_insert {
            return Err(IdmError::data_manager("disk full"));
        }
        self.seed(entity.clone());
        Ok(())
    }

    fn update(&self, entity: &E) -> IdmResult<E> {
        self.log
            .lock()
            .unwrap()
            .push(format!("dm.update:{}", entity.id()));
        let updated = (self.on_update)(entity);
        self.seed(updated.clone());
        Ok(updated)
    }

    fn delete(&self, entity: &E) -> IdmResult<()> {
        self.log
            .lock()
            .unwrap()
            .push(format!("dm.delete:{}", entity.id()));
        self.rows.lock().unwrap().remove(entity.id());
        Ok(())
    }
}

/// 记录分发事件的分发器；统计 `dispatch_event` 被调用的次数
struct RecordingDispatcher {
    enabled: bool,
    log: Log,
    events: Mutex<Vec<EntityEvent>>,
    dispatch_calls: AtomicUsize,
    fail: bool,
}

impl RecordingDispatcher {
    fn new(log: &Log, enabled: bool) -> Self {
        Self {
            enabled,
            log: Arc::clone(log),
            events: Mutex::new(Vec::new()),
            dispatch_calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    fn events(&self) -> Vec<EntityEvent> {
        self.events.lock().unwrap().clone()
    }

    fn types(&self) -> Vec<EntityEventType> {
        self.events().iter().map(|e| e.event_type).collect()
    }
}

impl EventDispatcher for RecordingDispatcher {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn dispatch_event(&self, event: &EntityEvent) -> IdmResult<()> {
        self.dispatch_calls.fetch_add(1, Ordering::SeqCst);
        self.log
            .lock()
            .unwrap()
            .push(format!("event:{}:{}", event.event_type, event.entity_id()));
        if self.fail {
            return Err(IdmError::EventListener {
                listener: "recording".into(),
                reason: "rejected".into(),
            });
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

fn identity<E: Clone>(e: &E) -> E {
    e.clone()
}

fn renamed(u: &PlainUser) -> PlainUser {
    PlainUser {
        id: u.id.clone(),
        name: format!("{}'", u.name),
    }
}

fn plain(id: &str, name: &str) -> PlainUser {
    PlainUser {
        id: id.into(),
        name: name.into(),
    }
}

struct Fixture<E> {
    log: Log,
    dm: Arc<RecordingDataManager<E>>,
    dispatcher: Arc<RecordingDispatcher>,
    em: EntityManager<E, Arc<RecordingDataManager<E>>>,
}

fn fixture<E: Entity + Clone>(enabled: bool, on_update: fn(&E) -> E) -> Fixture<E> {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let dm = Arc::new(RecordingDataManager::new(&log, on_update));
    let dispatcher = Arc::new(RecordingDispatcher::new(&log, enabled));
    let em = EntityManager::new(
        Arc::clone(&dm),
        dispatcher.clone() as Arc<dyn EventDispatcher>,
    );
    Fixture {
        log,
        dm,
        dispatcher,
        em,
    }
}

#[test]
fn insert_plain_entity_persists_then_fires_created_and_initialized() {
    let f = fixture::<PlainUser>(true, identity);
    let mut u1 = plain("U1", "alice");

    f.em.insert(&mut u1).unwrap();

    assert_eq!(
        entries(&f.log),
        vec![
            "dm.insert:U1",
            "event:ENTITY_CREATED:U1",
            "event:ENTITY_INITIALIZED:U1",
        ]
    );
    let events = f.dispatcher.events();
    assert_eq!(events.len(), 2);
    for ev in &events {
        assert_eq!(ev.entity_type(), "plain_user");
        assert_eq!(ev.entity::<PlainUser>().unwrap(), u1);
    }
}

#[test]
fn insert_revisioned_entity_with_disabled_dispatcher_advances_revision_once() {
    let f = fixture::<RevisionedUser>(false, identity);
    let mut u2 = RevisionedUser {
        id: "U2".into(),
        name: "bob".into(),
        ..Default::default()
    };
    assert_eq!(u2.revision_next(), 1);

    f.em.insert_with(&mut u2, true).unwrap();

    assert_eq!(u2.revision, 1);
    // 修订号在持久化之前就已推进
    assert_eq!(entries(&f.log), vec!["dm.insert:U2@1"]);
    assert_eq!(f.dispatcher.dispatch_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn revision_follows_the_pre_call_next_value() {
    let f = fixture::<RevisionedUser>(true, identity);
    let mut u = RevisionedUser {
        id: "U3".into(),
        revision: 7,
        ..Default::default()
    };
    let expected = u.revision_next();

    f.em.insert(&mut u).unwrap();

    assert_eq!(u.revision, expected);
    let events = f.dispatcher.events();
    assert!(events.iter().all(|e| e.payload["revision"] == expected));
}

#[test]
fn insert_without_create_event_never_dispatches() {
    for enabled in [true, false] {
        let f = fixture::<PlainUser>(enabled, identity);
        let mut u = plain("U4", "carol");

        f.em.insert_with(&mut u, false).unwrap();

        assert_eq!(entries(&f.log), vec!["dm.insert:U4"]);
        assert_eq!(f.dispatcher.dispatch_calls.load(Ordering::SeqCst), 0);
    }
}

#[test]
fn update_fires_with_original_and_returns_collaborator_value() {
    let f = fixture::<PlainUser>(true, renamed);
    let u1 = plain("U1", "alice");
    f.dm.seed(u1.clone());

    let updated = f.em.update(&u1).unwrap();

    assert_eq!(updated, plain("U1", "alice'"));
    assert_ne!(updated, u1);
    assert_eq!(f.dispatcher.types(), vec![EntityEventType::EntityUpdated]);
    let payload: PlainUser = f.dispatcher.events()[0].entity().unwrap();
    assert_eq!(payload, u1);
    assert_eq!(
        entries(&f.log),
        vec!["dm.update:U1", "event:ENTITY_UPDATED:U1"]
    );
}

#[test]
fn update_with_disabled_dispatcher_still_returns_updated_value() {
    let f = fixture::<PlainUser>(false, renamed);
    let u1 = plain("U1", "alice");

    let updated = f.em.update(&u1).unwrap();

    assert_eq!(updated.name, "alice'");
    assert_eq!(f.dispatcher.dispatch_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn delete_entity_fires_deleted_only_when_enabled() {
    let f = fixture::<PlainUser>(true, identity);
    let u = plain("U5", "dave");
    f.dm.seed(u.clone());

    f.em.delete(&u).unwrap();
    assert_eq!(
        entries(&f.log),
        vec!["dm.delete:U5", "event:ENTITY_DELETED:U5"]
    );
    assert_eq!(f.dispatcher.events()[0].entity::<PlainUser>().unwrap(), u);

    let f = fixture::<PlainUser>(false, identity);
    f.em.delete(&u).unwrap();
    assert_eq!(entries(&f.log), vec!["dm.delete:U5"]);
    assert_eq!(f.dispatcher.dispatch_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn delete_by_id_resolves_then_deletes() {
    let by_id = fixture::<PlainUser>(true, identity);
    let explicit = fixture::<PlainUser>(true, identity);
    let u = plain("U6", "erin");
    by_id.dm.seed(u.clone());
    explicit.dm.seed(u.clone());

    by_id.em.delete_by_id("U6").unwrap();

    let found = explicit.em.find_by_id("U6").unwrap().unwrap();
    explicit.em.delete(&found).unwrap();

    assert_eq!(
        entries(&by_id.log),
        vec!["dm.find:U6", "dm.delete:U6", "event:ENTITY_DELETED:U6"]
    );
    assert_eq!(entries(&by_id.log), entries(&explicit.log));
    assert_eq!(
        by_id.dispatcher.events()[0].payload,
        explicit.dispatcher.events()[0].payload
    );
}

#[test]
fn delete_by_missing_id_fails_without_side_effects() {
    let f = fixture::<PlainUser>(true, identity);

    let err = f.em.delete_by_id("missing-id").unwrap_err();

    match err {
        IdmError::NotFound { entity_type, id } => {
            assert_eq!(entity_type, "plain_user");
            assert_eq!(id, "missing-id");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(entries(&f.log), vec!["dm.find:missing-id"]);
    assert_eq!(f.dispatcher.dispatch_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn find_and_create_are_pure_delegation() {
    let f = fixture::<PlainUser>(true, identity);

    assert!(f.em.find_by_id("nobody").unwrap().is_none());
    let fresh = f.em.create();

    assert_eq!(fresh, PlainUser::default());
    assert_eq!(entries(&f.log), vec!["dm.find:nobody", "dm.create"]);
    assert_eq!(f.dispatcher.dispatch_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn persistence_failure_propagates_and_skips_events() {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let mut dm = RecordingDataManager::<PlainUser>::new(&log, identity);
    dm.fail_insert = true;
    let dispatcher = Arc::new(RecordingDispatcher::new(&log, true));
    let em: EntityManager<PlainUser, _> =
        EntityManager::new(dm, dispatcher.clone() as Arc<dyn EventDispatcher>);

    let mut u = plain("U7", "frank");
    match em.insert(&mut u).unwrap_err() {
        IdmError::DataManager { reason } => assert_eq!(reason, "disk full"),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(entries(&log), vec!["dm.insert:U7"]);
    assert_eq!(dispatcher.dispatch_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn dispatch_failure_propagates_after_persistence() {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let dm = Arc::new(RecordingDataManager::<PlainUser>::new(&log, identity));
    let mut dispatcher = RecordingDispatcher::new(&log, true);
    dispatcher.fail = true;
    let em: EntityManager<PlainUser, _> = EntityManager::new(
        Arc::clone(&dm),
        Arc::new(dispatcher) as Arc<dyn EventDispatcher>,
    );

    let mut u = plain("U8", "grace");
    match em.insert(&mut u).unwrap_err() {
        IdmError::EventListener { listener, .. } => assert_eq!(listener, "recording"),
        other => panic!("unexpected {other:?}"),
    }
    // 持久化已经发生，第一个事件失败后不再分发第二个
    assert_eq!(
        entries(&log),
        vec!["dm.insert:U8", "event:ENTITY_CREATED:U8"]
    );
    assert!(dm.rows.lock().unwrap().contains_key("U8"));
}
