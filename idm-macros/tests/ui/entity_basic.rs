use idm_domain::entity::Entity;
use idm_macros::entity;

#[entity]
struct TokenEntity {
    value: String,
}

#[entity(name = "identity_info")]
struct Info {
    key: String,
    value: Option<String>,
}

fn main() {
    assert_eq!(TokenEntity::TYPE, "token");
    assert_eq!(Info::TYPE, "identity_info");

    let mut t = TokenEntity::default();
    t.set_id("t-1".to_string());
    t.value = "secret".into();
    assert_eq!(t.id(), "t-1");
    assert!(t.revisioned().is_none());

    let copy = t.clone();
    let _ = format!("{:?}", copy);

    let info = Info {
        id: "i-1".into(),
        key: "phone".into(),
        value: None,
    };
    assert_eq!(info.id(), "i-1");
}
