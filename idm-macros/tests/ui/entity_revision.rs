use idm_domain::entity::{Entity, HasRevision};
use idm_macros::entity;

#[entity(name = "user", revision = true)]
#[derive(PartialEq)]
struct UserEntity {
    // 已声明的 revision 字段会被复用并移到 id 之后
    display_name: String,
    #[serde(default)]
    revision: i32,
}

fn main() {
    let mut u = UserEntity {
        id: "u-1".into(),
        revision: 0,
        display_name: "Ada".into(),
    };
    assert_eq!(u.revision_next(), 1);

    let cap = u.revisioned_mut().expect("revision capability");
    let next = cap.revision_next();
    cap.set_revision(next);
    assert_eq!(u.revision(), 1);
    assert_eq!(u.display_name, "Ada");
    assert!(u == u.clone());
}
