use idm_domain::entity::Entity;
use idm_macros::entity;

#[entity(name = "credential", debug = false)]
struct CredentialEntity {
    secret: String,
}

impl std::fmt::Debug for CredentialEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CredentialEntity({}, ..)", self.id)
    }
}

fn main() {
    let c = CredentialEntity {
        id: "c-1".into(),
        secret: "hunter2".into(),
    };
    // 使用手写 Debug，实现可编译则说明未自动派生 Debug
    assert_eq!(format!("{:?}", c), "CredentialEntity(c-1, ..)");
    assert_eq!(CredentialEntity::TYPE, "credential");
    assert_eq!(c.secret.len(), 7);
}
