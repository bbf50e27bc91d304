//! 宏工具函数

use syn::{Attribute, Field, GenericArgument, PathArguments, Type};

/// 从 `Wrapper<T>` 中提取唯一的泛型参数，外层类型名必须是 `wrapper`
pub fn extract_generic_type<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }

    match &segment.arguments {
        PathArguments::AngleBracketed(args) if args.args.len() == 1 => match args.args.first() {
            Some(GenericArgument::Type(inner)) => Some(inner),
            _ => None,
        },
        _ => None,
    }
}

/// 提取 `Arc<T>` 中的 `T`
pub fn extract_arc_type(ty: &Type) -> Option<&Type> {
    extract_generic_type(ty, "Arc")
}

/// 提取 `Vec<Arc<T>>` 中的 `T`
pub fn extract_vec_arc_type(ty: &Type) -> Option<&Type> {
    extract_generic_type(ty, "Vec").and_then(extract_arc_type)
}

/// 检查类型是否为 trait 对象（`dyn Trait`）
pub fn is_trait_object(ty: &Type) -> bool {
    match ty {
        Type::TraitObject(_) => true,
        Type::Paren(inner) => is_trait_object(&inner.elem),
        Type::Group(inner) => is_trait_object(&inner.elem),
        _ => false,
    }
}

/// 查找字段上指定名称的属性
pub fn find_field_attribute<'a>(field: &'a Field, attr_name: &str) -> Option<&'a Attribute> {
    field
        .attrs
        .iter()
        .find(|attr| attr.path().is_ident(attr_name))
}
