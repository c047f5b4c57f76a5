use crate::derive_utils::apply_derives;
use crate::field_utils::{default_type_name, ensure_leading_fields};
use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Item, LitStr, Result, Token, Type, parse::Parse, parse::ParseStream, parse_macro_input};

/// #[entity] 宏实现
/// - 若缺失则追加字段：`id: String`（及 `revision: i32`），并置于字段最前
/// - 自动实现 `::idm_domain::entity::Entity`（TYPE/id/set_id，及修订能力）
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as EntityAttrConfig);
    let input = parse_macro_input!(item as Item);

    let mut st = match input {
        Item::Struct(s) => s,
        other => {
            return syn::Error::new(other.span(), "#[entity] only on struct")
                .to_compile_error()
                .into();
        }
    };

    // 仅支持具名字段结构体
    let fields_named = match &mut st.fields {
        syn::Fields::Named(f) => f,
        _ => {
            return syn::Error::new(st.span(), "only supports named-field struct")
                .to_compile_error()
                .into();
        }
    };

    let revision = cfg.revision.unwrap_or(false);

    let string_ty: Type = syn::parse_quote! { String };
    let i32_ty: Type = syn::parse_quote! { i32 };
    let mut required: Vec<(&str, &Type)> = vec![("id", &string_ty)];
    if revision {
        required.push(("revision", &i32_ty));
    }
    ensure_leading_fields(fields_named, &required);

    let mut derives: Vec<syn::Path> = vec![
        syn::parse_quote!(Clone),
        syn::parse_quote!(Default),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
    ];
    if cfg.derive_debug.unwrap_or(true) {
        derives.insert(0, syn::parse_quote!(Debug));
    }
    apply_derives(&mut st.attrs, derives);

    let ident = &st.ident;
    let type_name = cfg
        .name
        .map(|n| n.value())
        .unwrap_or_else(|| default_type_name(ident));
    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

    let revision_impl = if revision {
        quote! {
            impl #impl_generics ::idm_domain::entity::HasRevision for #ident #ty_generics #where_clause {
                fn revision(&self) -> i32 { self.revision }

                fn set_revision(&mut self, revision: i32) { self.revision = revision; }
            }
        }
    } else {
        quote! {}
    };

    let revision_accessors = if revision {
        quote! {
            fn revisioned(&self) -> ::core::option::Option<&dyn ::idm_domain::entity::HasRevision> {
                ::core::option::Option::Some(self)
            }

            fn revisioned_mut(&mut self) -> ::core::option::Option<&mut dyn ::idm_domain::entity::HasRevision> {
                ::core::option::Option::Some(self)
            }
        }
    } else {
        quote! {}
    };

    let expanded = quote! {
        #st

        impl #impl_generics ::idm_domain::entity::Entity for #ident #ty_generics #where_clause {
            const TYPE: &'static str = #type_name;

            fn id(&self) -> &str { &self.id }

            fn set_id(&mut self, id: ::std::string::String) { self.id = id; }

            #revision_accessors
        }

        #revision_impl
    };

    TokenStream::from(expanded)
}

// -------- parsing --------

#[derive(Default)]
struct EntityAttrConfig {
    name: Option<LitStr>,
    revision: Option<bool>,
    derive_debug: Option<bool>,
}

impl Parse for EntityAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut cfg = Self::default();

        if input.is_empty() {
            return Ok(cfg);
        }

        let elems: Punctuated<EntityAttrElem, Token![,]> =
            Punctuated::<EntityAttrElem, Token![,]>::parse_terminated(input)?;

        for elem in elems.into_iter() {
            match elem {
                EntityAttrElem::Name(lit) => {
                    if cfg.name.is_some() {
                        return Err(syn::Error::new(lit.span(), "duplicate key 'name' in attribute"));
                    }
                    if lit.value().is_empty() {
                        return Err(syn::Error::new(lit.span(), "'name' must not be empty"));
                    }
                    cfg.name = Some(lit);
                }
                EntityAttrElem::Revision(span, b) => {
                    if cfg.revision.is_some() {
                        return Err(syn::Error::new(span, "duplicate key 'revision' in attribute"));
                    }
                    cfg.revision = Some(b);
                }
                EntityAttrElem::Debug(span, b) => {
                    if cfg.derive_debug.is_some() {
                        return Err(syn::Error::new(span, "duplicate key 'debug' in attribute"));
                    }
                    cfg.derive_debug = Some(b);
                }
            }
        }

        Ok(cfg)
    }
}

enum EntityAttrElem {
    Name(LitStr),
    Revision(proc_macro2::Span, bool),
    Debug(proc_macro2::Span, bool),
}

impl Parse for EntityAttrElem {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: syn::Ident = input.parse()?;
        let _eq: Token![=] = input.parse()?;
        if key == "name" {
            Ok(EntityAttrElem::Name(input.parse()?))
        } else if key == "revision" {
            Ok(EntityAttrElem::Revision(key.span(), parse_bool(input, "revision")?))
        } else if key == "debug" {
            Ok(EntityAttrElem::Debug(key.span(), parse_bool(input, "debug")?))
        } else {
            Err(syn::Error::new(
                key.span(),
                "unknown key in attribute; expected 'name', 'revision' or 'debug'",
            ))
        }
    }
}

fn parse_bool(input: ParseStream, key: &str) -> Result<bool> {
    let expr: syn::Expr = input.parse()?;
    match expr {
        syn::Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Bool(b),
            ..
        }) => Ok(b.value()),
        other => Err(syn::Error::new(
            other.span(),
            format!("expected boolean literal for '{key}'"),
        )),
    }
}
