//! `#[derive(Composable)]` 实现
//!
//! 把结构体上的组合标记翻译成 `TypeDescriptor` 构建代码。

use crate::utils::{extract_wrapped_type, find_attribute, has_attribute, named_fields};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    parse::ParseStream, punctuated::Punctuated, Attribute, DeriveInput, Data, Ident, Meta, Result,
    Token, Type,
};

/// 结构体级别的组合标记
#[derive(Default)]
struct ComposableArgs {
    /// `None` 表示没有导出标记，`Some(None)` 表示以自身导出
    export: Option<Option<Type>>,
    /// 实现的契约
    implements: Vec<Type>,
    /// 是否带有导入构造函数标记
    import_constructor: bool,
}

impl ComposableArgs {
    fn from_attributes(attrs: &[Attribute]) -> Result<Self> {
        let mut args = Self::default();

        if let Some(attr) = find_attribute(attrs, "export") {
            args.export = Some(parse_export(attr)?);
        }

        for attr in attrs.iter().filter(|attr| attr.path().is_ident("implements")) {
            let contracts =
                attr.parse_args_with(Punctuated::<Type, Token![,]>::parse_terminated)?;
            args.implements.extend(contracts);
        }

        if let Some(attr) = find_attribute(attrs, "import_constructor") {
            if !matches!(attr.meta, Meta::Path(_)) {
                return Err(syn::Error::new_spanned(attr, "#[import_constructor] 不接受参数"));
            }
            args.import_constructor = true;
        }

        Ok(args)
    }

    /// 导出契约也需要对应的契约绑定，去掉重复的声明
    fn contract_bindings(&self) -> Vec<&Type> {
        let mut bindings: Vec<&Type> = Vec::new();
        let exported = self.export.as_ref().and_then(Option::as_ref);
        for contract in exported.into_iter().chain(self.implements.iter()) {
            let key = quote!(#contract).to_string();
            if !bindings.iter().any(|seen| quote!(#seen).to_string() == key) {
                bindings.push(contract);
            }
        }
        bindings
    }
}

/// 解析 `#[export]` 或 `#[export(contract = dyn Trait)]`
fn parse_export(attr: &Attribute) -> Result<Option<Type>> {
    match &attr.meta {
        Meta::Path(_) => Ok(None),
        Meta::List(_) => attr
            .parse_args_with(|input: ParseStream<'_>| {
                let key: Ident = input.parse()?;
                if key != "contract" {
                    return Err(syn::Error::new(key.span(), "期望 `contract = 类型`"));
                }
                input.parse::<Token![=]>()?;
                input.parse::<Type>()
            })
            .map(Some),
        Meta::NameValue(_) => Err(syn::Error::new_spanned(
            attr,
            "期望 #[export] 或 #[export(contract = 类型)]",
        )),
    }
}

/// 字段的注入方式
enum FieldRole<'a> {
    /// 构造函数参数，字段类型为 `Box<P>`
    Inject(&'a Type),
    /// 导入属性，字段类型为 `Option<Box<P>>`
    Import(&'a Type),
    /// 使用 `Default::default()` 初始化
    Plain,
}

fn field_role(field: &syn::Field) -> Result<FieldRole<'_>> {
    let inject = has_attribute(&field.attrs, "inject");
    let import = has_attribute(&field.attrs, "import");

    match (inject, import) {
        (true, true) => Err(syn::Error::new_spanned(
            field,
            "字段不能同时标记 #[inject] 和 #[import]",
        )),
        (true, false) => extract_wrapped_type(&field.ty, "Box")
            .map(FieldRole::Inject)
            .ok_or_else(|| syn::Error::new_spanned(&field.ty, "#[inject] 字段的类型必须是 Box<T>")),
        (false, true) => extract_wrapped_type(&field.ty, "Option")
            .and_then(|boxed| extract_wrapped_type(boxed, "Box"))
            .map(FieldRole::Import)
            .ok_or_else(|| {
                syn::Error::new_spanned(&field.ty, "#[import] 字段的类型必须是 Option<Box<T>>")
            }),
        (false, false) => Ok(FieldRole::Plain),
    }
}

/// 实现 `#[derive(Composable)]`
pub fn derive_composable_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Composable 不支持泛型类型",
        ));
    }
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(struct_name, "Composable 只能用于结构体"));
    };

    let args = ComposableArgs::from_attributes(&input.attrs)?;
    let fields = named_fields(struct_name, &data.fields)?;

    let mut parameters = Vec::new();
    let mut field_inits = Vec::new();
    let mut imports = Vec::new();

    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        match field_role(field)? {
            FieldRole::Inject(parameter) => {
                if !args.import_constructor {
                    return Err(syn::Error::new_spanned(
                        field,
                        "#[inject] 字段需要在结构体上标记 #[import_constructor]",
                    ));
                }
                parameters.push(parameter);
                field_inits.push(quote! { #ident: arguments.take::<#parameter>()? });
            }
            FieldRole::Import(property) => {
                let name = ident.to_string();
                imports.push(quote! {
                    .import::<#property, _>(#name, |component, value| {
                        component.#ident = ::std::option::Option::Some(value);
                    })
                });
                field_inits.push(quote! { #ident: ::std::option::Option::None });
            }
            FieldRole::Plain => {
                field_inits.push(quote! { #ident: ::std::default::Default::default() });
            }
        }
    }

    let export = match &args.export {
        Some(Some(contract)) => quote! { .export_as::<#contract>() },
        Some(None) => quote! { .export() },
        None => quote! {},
    };

    let bindings = args.contract_bindings().into_iter().map(|contract| {
        quote! {
            .implements::<#contract, _>(
                |component: ::std::boxed::Box<Self>| -> ::std::boxed::Box<#contract> { component },
            )
        }
    });

    let import_constructor = if args.import_constructor {
        quote! { .import_constructor() }
    } else {
        quote! {}
    };

    // 没有构造参数时不使用 arguments，避免未使用变量警告
    let arguments = if parameters.is_empty() {
        format_ident!("_arguments")
    } else {
        format_ident!("arguments")
    };

    Ok(quote! {
        impl ::infrastructure_common::Composable for #struct_name {
            fn descriptor() -> ::infrastructure_common::TypeDescriptor {
                ::infrastructure_common::TypeDescriptor::builder::<Self>()
                    #export
                    #(#bindings)*
                    #import_constructor
                    .constructor(
                        ::std::vec![#(::infrastructure_common::TypeInfo::of::<#parameters>()),*],
                        |#arguments: &mut ::infrastructure_common::Arguments| {
                            ::std::result::Result::Ok(Self { #(#field_inits),* })
                        },
                    )
                    #(#imports)*
                    .build()
            }
        }

        impl ::infrastructure_common::Contract for #struct_name {
            fn imports() -> ::std::vec::Vec<::infrastructure_common::PropertyDescriptor> {
                <Self as ::infrastructure_common::Composable>::descriptor()
                    .properties()
                    .to_vec()
            }
        }
    })
}
