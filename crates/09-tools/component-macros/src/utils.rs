//! 宏工具函数

use syn::{
    Attribute, Fields, GenericArgument, Ident, PathArguments, Result, Type, TypePath,
};

/// 检查属性列表中是否有指定名称的属性
pub fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}

/// 查找指定名称的属性
pub fn find_attribute<'a>(attrs: &'a [Attribute], name: &str) -> Option<&'a Attribute> {
    attrs.iter().find(|attr| attr.path().is_ident(name))
}

/// 提取 `Wrapper<T>` 中的 `T`
///
/// 只比较路径的最后一段，因此 `std::boxed::Box<T>` 与 `Box<T>` 都能识别。
pub fn extract_wrapped_type<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(TypePath { qself: None, path }) = ty else {
        return None;
    };
    let segment = path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    match args.args.first() {
        Some(GenericArgument::Type(inner)) => Some(inner),
        _ => None,
    }
}

/// 提取具名字段列表，单元结构体视为没有字段
pub fn named_fields<'a>(ident: &Ident, fields: &'a Fields) -> Result<Vec<&'a syn::Field>> {
    match fields {
        Fields::Named(named) => Ok(named.named.iter().collect()),
        Fields::Unit => Ok(Vec::new()),
        Fields::Unnamed(_) => Err(syn::Error::new_spanned(
            ident,
            "Composable 只支持具名字段结构体或单元结构体",
        )),
    }
}
