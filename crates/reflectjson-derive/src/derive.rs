/*
 * Copyright (C) 2025 Reflect JSON Contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, Ident};

/// Parsed `#[json(...)]` attributes on one field.
#[derive(Default)]
struct FieldAttrs {
    rename: Option<String>,
    skip: bool,
    since: Option<f64>,
    flatten: bool,
}

impl FieldAttrs {
    fn parse(attrs: &[syn::Attribute]) -> syn::Result<Self> {
        let mut out = FieldAttrs::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident("json")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let lit: syn::LitStr = meta.value()?.parse()?;
                    out.rename = Some(lit.value());
                } else if meta.path.is_ident("skip") {
                    out.skip = true;
                } else if meta.path.is_ident("since") {
                    let lit: syn::LitStr = meta.value()?.parse()?;
                    out.since = Some(lit.value().parse().map_err(|_| {
                        meta.error("`since` must be a float literal string, e.g. \"1.1\"")
                    })?);
                } else if meta.path.is_ident("flatten") {
                    out.flatten = true;
                } else {
                    return Err(meta.error("unrecognized `json` attribute"));
                }
                Ok(())
            })?;
        }
        Ok(out)
    }
}

/// Parsed struct/class-level `#[json(since = "...")]`.
fn class_since(attrs: &[syn::Attribute]) -> syn::Result<Option<f64>> {
    let mut since = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("json")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("since") {
                let lit: syn::LitStr = meta.value()?.parse()?;
                since = Some(lit.value().parse().map_err(|_| {
                    meta.error("`since` must be a float literal string, e.g. \"1.1\"")
                })?);
                Ok(())
            } else {
                // Field-level-only attributes (rename/skip/flatten) are
                // invalid at class scope; let FieldAttrs::parse's own pass
                // over field attrs surface those errors instead of double
                // reporting here.
                Ok(())
            }
        })?;
    }
    Ok(since)
}

fn derives_default(attrs: &[syn::Attribute]) -> bool {
    attrs.iter().filter(|a| a.path().is_ident("derive")).any(|a| {
        a.parse_args_with(syn::punctuated::Punctuated::<syn::Path, syn::Token![,]>::parse_terminated)
            .map(|paths| paths.iter().any(|p| p.is_ident("Default")))
            .unwrap_or(false)
    })
}

pub fn expand(input: TokenStream) -> syn::Result<TokenStream> {
    let input: DeriveInput = syn::parse2(input)?;
    let ident = &input.ident;

    match &input.data {
        Data::Struct(data) => expand_struct(&input, ident, data),
        Data::Enum(data) => expand_enum(&input, ident, data),
        Data::Union(_) => Err(syn::Error::new(input.span(), "#[derive(Json)] does not support unions")),
    }
}

fn expand_struct(input: &DeriveInput, ident: &Ident, data: &syn::DataStruct) -> syn::Result<TokenStream> {
    let fields = match &data.fields {
        Fields::Named(named) => &named.named,
        Fields::Unit => {
            return expand_unit_struct(input, ident);
        }
        Fields::Unnamed(_) => {
            return Err(syn::Error::new(
                data.fields.span(),
                "#[derive(Json)] requires named fields (tuple structs are not supported)",
            ));
        }
    };

    let class_version = class_since(&input.attrs)?;

    struct Prepared<'a> {
        field_ident: &'a Ident,
        ty: &'a syn::Type,
        json_name: String,
        attrs: FieldAttrs,
        descriptor_ident: Ident,
    }

    let mut prepared = Vec::new();
    for field in fields.iter() {
        let field_ident = field.ident.as_ref().expect("Fields::Named implies an ident");
        let attrs = FieldAttrs::parse(&field.attrs)?;
        let json_name = attrs.rename.clone().unwrap_or_else(|| field_ident.to_string());
        let descriptor_ident = format_ident!("__REFLECTJSON_FIELD_{}", field_ident.to_string().to_uppercase());
        prepared.push(Prepared { field_ident, ty: &field.ty, json_name, attrs, descriptor_ident });
    }

    let flatten_idents: Vec<&Ident> =
        prepared.iter().filter(|p| p.attrs.flatten).map(|p| p.field_ident).collect();
    let own_fields: Vec<&Prepared> = prepared.iter().filter(|p| !p.attrs.flatten && !p.attrs.skip).collect();
    let transient_fields: Vec<&Prepared> = prepared.iter().filter(|p| p.attrs.skip).collect();

    // `declared_index` runs over this struct's own (non-flattened) fields
    // in source order; flattened ancestors are prepended at runtime instead
    // of being counted here, matching the ancestors-before-descendants
    // ordering `shape()`/`declared_fields()` build below.
    let descriptors = own_fields.iter().chain(transient_fields.iter()).enumerate().map(|(index, p)| {
        let descriptor_ident = &p.descriptor_ident;
        let json_name = &p.json_name;
        let field_name = p.field_ident.to_string();
        let modifiers = if p.attrs.skip {
            quote! { ::reflectjson::FieldModifiers::TRANSIENT }
        } else {
            quote! { ::reflectjson::FieldModifiers::NONE }
        };
        let min_version = match p.attrs.since.or(class_version) {
            Some(v) => quote! { Some(#v) },
            None => quote! { None },
        };
        quote! {
            #[allow(non_upper_case_globals)]
            static #descriptor_ident: ::reflectjson::FieldDescriptor = ::reflectjson::FieldDescriptor {
                name: #field_name,
                json_name: #json_name,
                declared_index: #index,
                modifiers: #modifiers,
                min_version: #min_version,
                synthetic: false,
            };
        }
    });

    let shape_flatten = flatten_idents.iter().map(|ident| {
        quote! {
            if let ::reflectjson::Shape::Object(inner) = ::reflectjson::Reflect::shape(&self.#ident) {
                __fields.extend(inner);
            }
        }
    });
    let shape_own = own_fields.iter().chain(transient_fields.iter()).map(|p| {
        let field_ident = p.field_ident;
        let descriptor_ident = &p.descriptor_ident;
        quote! {
            __fields.push(::reflectjson::FieldSlot { descriptor: &#descriptor_ident, value: &self.#field_ident });
        }
    });

    let set_field_arms = own_fields.iter().chain(transient_fields.iter()).map(|p| {
        let field_ident = p.field_ident;
        let json_name = &p.json_name;
        let ty = p.ty;
        quote! {
            #json_name => {
                self.#field_ident = <#ty as ::reflectjson::ReflectMut>::from_json_value(value, ctx)?;
                Ok(())
            }
        }
    });
    let set_field_fallback = if flatten_idents.is_empty() {
        quote! { _ => Ok(()) }
    } else {
        quote! {
            _ => {
                #( ::reflectjson::ReflectMut::set_field(&mut self.#flatten_idents, json_name, value, ctx)?; )*
                Ok(())
            }
        }
    };

    let flatten_tys: Vec<&syn::Type> =
        prepared.iter().filter(|p| p.attrs.flatten).map(|p| p.ty).collect();

    let declared_fields_impl = if flatten_idents.is_empty() {
        let own_array = own_fields.iter().chain(transient_fields.iter()).map(|p| {
            let d = &p.descriptor_ident;
            quote! { #d }
        });
        let len = own_fields.len() + transient_fields.len();
        quote! {
            fn declared_fields() -> &'static [::reflectjson::FieldDescriptor] {
                static FIELDS: [::reflectjson::FieldDescriptor; #len] = [#(#own_array),*];
                &FIELDS
            }
        }
    } else {
        let own_array = own_fields.iter().chain(transient_fields.iter()).map(|p| {
            let d = &p.descriptor_ident;
            quote! { #d }
        });
        quote! {
            fn declared_fields() -> &'static [::reflectjson::FieldDescriptor] {
                static CELL: ::once_cell::sync::OnceCell<::std::vec::Vec<::reflectjson::FieldDescriptor>> =
                    ::once_cell::sync::OnceCell::new();
                CELL.get_or_init(|| {
                    let mut v: ::std::vec::Vec<::reflectjson::FieldDescriptor> = ::std::vec::Vec::new();
                    #( v.extend_from_slice(<#flatten_tys as ::reflectjson::ReflectMut>::declared_fields()); )*
                    #( v.push(#own_array); )*
                    v
                }).as_slice()
            }
        }
    };

    let has_default = derives_default(&input.attrs);
    let construct_body = if has_default {
        quote! { ::std::result::Result::Ok(<Self as ::std::default::Default>::default()) }
    } else {
        let type_name = ident.to_string();
        quote! { ::std::result::Result::Err(::reflectjson::Error::Unconstructible { type_name: #type_name }) }
    };

    let expanded = quote! {
        #(#descriptors)*

        impl ::reflectjson::Reflect for #ident {
            fn type_info() -> ::reflectjson::TypeInfo {
                ::reflectjson::TypeInfo::of::<#ident>()
            }
            fn dyn_type_info(&self) -> ::reflectjson::TypeInfo {
                <Self as ::reflectjson::Reflect>::type_info()
            }
            fn shape(&self) -> ::reflectjson::Shape<'_> {
                let mut __fields = ::std::vec::Vec::new();
                #(#shape_flatten)*
                #(#shape_own)*
                ::reflectjson::Shape::Object(__fields)
            }
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
        }

        impl ::reflectjson::Construct for #ident {
            fn construct() -> ::reflectjson::Result<Self> {
                #construct_body
            }
        }

        impl ::reflectjson::ReflectMut for #ident {
            fn type_info() -> ::reflectjson::TypeInfo {
                ::reflectjson::TypeInfo::of::<#ident>()
            }
            fn from_json_value(value: &::serde_json::Value, ctx: &mut ::reflectjson::DeContext) -> ::reflectjson::Result<Self> {
                <Self as ::reflectjson::ReflectMut>::construct_and_populate(value, ctx)
            }
            fn set_field(&mut self, json_name: &'static str, value: &::serde_json::Value, ctx: &mut ::reflectjson::DeContext) -> ::reflectjson::Result<()> {
                match json_name {
                    #(#set_field_arms,)*
                    #set_field_fallback
                }
            }
            #declared_fields_impl
        }
    };
    Ok(expanded)
}

fn expand_unit_struct(_input: &DeriveInput, ident: &Ident) -> syn::Result<TokenStream> {
    Ok(quote! {
        impl ::reflectjson::Reflect for #ident {
            fn type_info() -> ::reflectjson::TypeInfo {
                ::reflectjson::TypeInfo::of::<#ident>()
            }
            fn dyn_type_info(&self) -> ::reflectjson::TypeInfo {
                <Self as ::reflectjson::Reflect>::type_info()
            }
            fn shape(&self) -> ::reflectjson::Shape<'_> {
                ::reflectjson::Shape::Object(::std::vec::Vec::new())
            }
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
        }
        impl ::reflectjson::Construct for #ident {
            fn construct() -> ::reflectjson::Result<Self> {
                ::std::result::Result::Ok(#ident)
            }
        }
        impl ::reflectjson::ReflectMut for #ident {
            fn type_info() -> ::reflectjson::TypeInfo {
                ::reflectjson::TypeInfo::of::<#ident>()
            }
            fn from_json_value(_value: &::serde_json::Value, _ctx: &mut ::reflectjson::DeContext) -> ::reflectjson::Result<Self> {
                ::std::result::Result::Ok(#ident)
            }
        }
    })
}

fn expand_enum(_input: &DeriveInput, ident: &Ident, data: &syn::DataEnum) -> syn::Result<TokenStream> {
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new(
                variant.span(),
                "#[derive(Json)] on an enum only supports unit variants (no associated data)",
            ));
        }
    }

    let variant_idents: Vec<&Ident> = data.variants.iter().map(|v| &v.ident).collect();
    let variant_names: Vec<String> = variant_idents.iter().map(|v| v.to_string()).collect();

    let shape_arms = variant_idents.iter().zip(variant_names.iter()).map(|(v, name)| {
        quote! { #ident::#v => #name }
    });
    let from_str_arms = variant_idents.iter().zip(variant_names.iter()).map(|(v, name)| {
        quote! { #name => ::std::result::Result::Ok(#ident::#v) }
    });
    let type_name = ident.to_string();

    Ok(quote! {
        impl ::reflectjson::Reflect for #ident {
            fn type_info() -> ::reflectjson::TypeInfo {
                ::reflectjson::TypeInfo::of::<#ident>()
            }
            fn dyn_type_info(&self) -> ::reflectjson::TypeInfo {
                <Self as ::reflectjson::Reflect>::type_info()
            }
            fn shape(&self) -> ::reflectjson::Shape<'_> {
                let variant_name = match self {
                    #(#shape_arms,)*
                };
                ::reflectjson::Shape::Enum { variant_name }
            }
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
        }

        impl ::reflectjson::Construct for #ident {}

        impl ::reflectjson::ReflectMut for #ident {
            fn type_info() -> ::reflectjson::TypeInfo {
                ::reflectjson::TypeInfo::of::<#ident>()
            }
            fn from_json_value(value: &::serde_json::Value, _ctx: &mut ::reflectjson::DeContext) -> ::reflectjson::Result<Self> {
                let name = value.as_str().ok_or_else(|| ::reflectjson::Error::TypeMismatch {
                    expected: <Self as ::reflectjson::Reflect>::type_info(),
                    found: "not a string",
                })?;
                match name {
                    #(#from_str_arms,)*
                    _ => ::std::result::Result::Err(::reflectjson::Error::TypeMismatch {
                        expected: <Self as ::reflectjson::Reflect>::type_info(),
                        found: "an unrecognized variant name",
                    }),
                }
            }
        }
    })
}
