use proc_macro::TokenStream;

mod derive_utils;
mod entity;
mod field_utils;

/// 实体宏
/// - 追加字段：`id: String`，以及开启 `revision` 时的 `revision: i32`（若缺失）并置于字段最前
/// - 合并派生：`Debug`（可关闭）、`Clone`、`Default`、`Serialize`、`Deserialize`
/// - 自动实现 `::idm_domain::entity::Entity`，开启 `revision` 时同时实现 `HasRevision`
/// - 支持参数：`#[entity(name = "user", revision = true, debug = false)]`
///   - `name` 默认取结构体名的 snake_case（去掉 `Entity` 后缀）
///   - `revision` 默认 `false`
///   - `debug` 默认 `true`
#[proc_macro_attribute]
pub fn entity(attr: TokenStream, item: TokenStream) -> TokenStream {
    entity::expand(attr, item)
}
