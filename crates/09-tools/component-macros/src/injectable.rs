//! `#[derive(Injectable)]` 实现

use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Field, Fields, Ident, Index, LitStr, Member, Result, Token};

use crate::utils::{
    extract_arc_type, extract_vec_arc_type, find_field_attribute, is_trait_object,
};

/// `#[inject(...)]` 参数
#[derive(Debug, Default)]
struct InjectArgs {
    /// 对象别名
    name: Option<LitStr>,
    /// 注入接口的全部实现
    all: bool,
    /// 按别名过滤实现的正则表达式
    filter: Option<LitStr>,
}

impl InjectArgs {
    fn from_field(field: &Field) -> Result<Option<Self>> {
        let Some(attr) = find_field_attribute(field, "inject") else {
            return Ok(None);
        };

        let mut args = InjectArgs::default();
        if matches!(attr.meta, syn::Meta::Path(_)) {
            return Ok(Some(args));
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                args.name = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("all") {
                args.all = true;
                if meta.input.peek(Token![=]) {
                    args.filter = Some(meta.value()?.parse()?);
                }
                Ok(())
            } else {
                Err(meta.error("未知的 inject 参数，支持 name = \"alias\" 与 all"))
            }
        })?;

        if args.all && args.name.is_some() {
            return Err(syn::Error::new(
                attr.span(),
                "inject(all) 按接口收集实现，不能同时指定 name",
            ));
        }
        Ok(Some(args))
    }
}

/// `#[value("key", optional)]` 参数
#[derive(Debug)]
struct ValueArgs {
    key: LitStr,
    optional: bool,
}

impl Parse for ValueArgs {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: LitStr = input.parse()?;
        let mut optional = false;

        while input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
            if input.is_empty() {
                break;
            }
            let flag: Ident = input.parse()?;
            if flag == "optional" {
                optional = true;
            } else {
                return Err(syn::Error::new(flag.span(), "未知的 value 参数，只支持 optional"));
            }
        }

        Ok(Self { key, optional })
    }
}

/// 生成 `Injectable` 实现
pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return Err(syn::Error::new(
                input.ident.span(),
                "Injectable 只能用于结构体",
            ))
        }
    };

    let initializers = match fields {
        Fields::Named(named) => named
            .named
            .iter()
            .map(|field| {
                let member = Member::Named(field.ident.clone().ok_or_else(|| {
                    syn::Error::new(field.span(), "具名字段缺少名称")
                })?);
                field_initializer(member, field)
            })
            .collect::<Result<Vec<_>>>()?,
        Fields::Unnamed(unnamed) => unnamed
            .unnamed
            .iter()
            .enumerate()
            .map(|(index, field)| field_initializer(Member::Unnamed(Index::from(index)), field))
            .collect::<Result<Vec<_>>>()?,
        Fields::Unit => Vec::new(),
    };

    Ok(quote! {
        impl #impl_generics ::di_abstractions::Injectable for #name #ty_generics #where_clause {
            fn inject(
                resolver: &mut dyn ::di_abstractions::Resolver,
            ) -> ::infrastructure_common::ContainerResult<Self> {
                ::core::result::Result::Ok(Self {
                    #(#initializers,)*
                })
            }
        }
    })
}

/// 生成单个字段的初始化表达式
fn field_initializer(member: Member, field: &Field) -> Result<TokenStream> {
    let inject = InjectArgs::from_field(field)?;
    let value = find_field_attribute(field, "value");
    let ty = &field.ty;

    let expr = match (inject, value) {
        (Some(_), Some(attr)) => {
            return Err(syn::Error::new(
                attr.span(),
                "同一个字段不能同时使用 inject 与 value",
            ))
        }
        (Some(args), None) if args.all => {
            let interface = extract_vec_arc_type(ty)
                .filter(|inner| is_trait_object(inner))
                .ok_or_else(|| {
                    syn::Error::new(ty.span(), "inject(all) 字段类型必须是 Vec<Arc<dyn Trait>>")
                })?;
            let filter = match &args.filter {
                Some(pattern) => quote!(::core::option::Option::Some(#pattern)),
                None => quote!(::core::option::Option::None),
            };
            quote!(resolver.interfaces::<#interface>(#filter)?)
        }
        (Some(args), None) => {
            let inner = extract_arc_type(ty).ok_or_else(|| {
                syn::Error::new(ty.span(), "inject 字段类型必须是 Arc<T> 或 Arc<dyn Trait>")
            })?;
            if is_trait_object(inner) {
                // 接口按注册顺序取第一个实现，别名不参与
                quote!(resolver.interface::<#inner>()?)
            } else {
                let alias = args
                    .name
                    .map(|name| name.value())
                    .unwrap_or_default();
                quote!(resolver.object::<#inner>(#alias)?)
            }
        }
        (None, Some(attr)) => {
            let args: ValueArgs = attr.parse_args()?;
            let key = &args.key;
            if args.optional {
                quote!(resolver.optional_value::<#ty>(#key)?.unwrap_or_default())
            } else {
                quote!(resolver.value::<#ty>(#key)?)
            }
        }
        (None, None) => quote!(::core::default::Default::default()),
    };

    Ok(quote!(#member: #expr))
}
