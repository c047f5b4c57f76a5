use quote::ToTokens;
use std::collections::HashSet;
use syn::{Attribute, Path, Token, punctuated::Punctuated};

/// 把实体宏要求的派生与用户已写的 `#[derive(..)]` 合并为一条，置于属性最前
/// - 要求的派生在前，用户派生在后，按名称去重
/// - 其余属性（如 `#[serde(..)]`、文档注释）保持原顺序
pub(crate) fn apply_derives(attrs: &mut Vec<Attribute>, required: Vec<Path>) {
    let (derive_attrs, retained): (Vec<Attribute>, Vec<Attribute>) =
        attrs.drain(..).partition(|a| a.path().is_ident("derive"));

    let user_paths = derive_attrs.iter().flat_map(|a| {
        a.parse_args_with(Punctuated::<Path, Token![,]>::parse_terminated)
            .map(|list| list.into_iter().collect::<Vec<_>>())
            .unwrap_or_default()
    });

    let mut seen = HashSet::new();
    let merged: Vec<Path> = required
        .into_iter()
        .chain(user_paths)
        .filter(|p| seen.insert(derive_key(p)))
        .collect();

    attrs.push(syn::parse_quote!(#[derive(#(#merged),*)]));
    attrs.extend(retained);
}

// `Serialize` 与 `serde::Serialize` 视为同一个派生
fn derive_key(p: &Path) -> String {
    match p.segments.last().map(|s| s.ident.to_string()) {
        Some(last) if last == "Serialize" || last == "Deserialize" => format!("serde::{last}"),
        Some(last) => last,
        None => p.to_token_stream().to_string(),
    }
}
