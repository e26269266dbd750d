//! Derive macros for document field → column mappings.
//!
//! This crate provides the `#[derive(Document)]` macro for mapping the fields
//! of a model struct to the column names stored in the documents.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::meta::ParseNestedMeta;
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, Expr, Fields, Ident, Lit, LitStr, Meta,
    Token, Type,
};

/// Derives the `Document` trait for a struct, generating typed field markers.
///
/// # Container Attributes
///
/// - `#[document(rename_all = "camelCase")]` - Renames every field without
///   an explicit name. `#[serde(rename_all = "...")]` is honored too, with
///   `document` taking precedence. The `serialize` side of
///   `rename_all(serialize = "...", deserialize = "...")` applies. Supported rules: `lowercase`,
///   `UPPERCASE`, `PascalCase`, `camelCase`, `snake_case`,
///   `SCREAMING_SNAKE_CASE`, `kebab-case`, `SCREAMING-KEBAB-CASE`.
///
/// # Field Attributes
///
/// - `#[column(name = "column_name")]` - Specifies the stored column name
/// - `#[column(skip)]` - Leaves the field out of the mapping
/// - `#[serde(rename = "...")]`, `#[serde(rename(serialize = "..."))]` and
///   `#[serde(skip)]` - Used when no `column` attribute says otherwise
///
/// # Generated Items
///
/// For a struct `Person`, this macro generates:
///
/// - `impl Document for Person` with the field → column table
/// - `PersonFields` - A module containing one marker type per field
///   (`FirstName`, `Email`, ...) implementing `Field`
/// - Field accessor methods on `Person` returning those markers
#[proc_macro_derive(Document, attributes(document, column))]
pub fn derive_document(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_document_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn derive_document_impl(input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Document derive does not support generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Document derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Document derive only supports structs",
            ));
        }
    };

    let rename_rule = parse_container_attrs(&input.attrs)?;

    let mut field_infos: Vec<FieldInfo> = Vec::new();
    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        let attrs = parse_field_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }

        let rust_name = field_name.to_string();
        let rust_name = rust_name.strip_prefix("r#").unwrap_or(&rust_name).to_string();
        let column_name = attrs
            .name
            .unwrap_or_else(|| rename_rule.map_or_else(|| rust_name.clone(), |r| r.apply(&rust_name)));

        field_infos.push(FieldInfo {
            field_name: field_name.clone(),
            rust_name,
            field_type: field.ty.clone(),
            column_name,
        });
    }

    let marker_names: Vec<Ident> = field_infos
        .iter()
        .map(|f| format_ident!("{}", to_pascal_case(&f.rust_name)))
        .collect();

    let fields_mod_name = format_ident!("{}Fields", struct_name);

    let marker_structs: Vec<TokenStream2> = field_infos
        .iter()
        .zip(marker_names.iter())
        .map(|(info, marker)| {
            let column_name = &info.column_name;
            let field_type = &info.field_type;

            quote! {
                /// Field marker for typed queries.
                #[derive(Debug, Clone, Copy)]
                pub struct #marker;

                impl ::docquery_core::schema::Field for #marker {
                    type Document = super::#struct_name;
                    type Type = #field_type;

                    const NAME: &'static str = #column_name;
                }
            }
        })
        .collect();

    let accessors: Vec<TokenStream2> = field_infos
        .iter()
        .zip(marker_names.iter())
        .map(|(info, marker)| {
            let method_name = &info.field_name;
            quote! {
                /// Returns the field marker for typed queries.
                #[inline]
                pub const fn #method_name() -> #fields_mod_name::#marker {
                    #fields_mod_name::#marker
                }
            }
        })
        .collect();

    let mappings: Vec<TokenStream2> = field_infos
        .iter()
        .map(|info| {
            let rust_name = &info.rust_name;
            let column_name = &info.column_name;
            quote! {
                ::docquery_core::schema::FieldMapping {
                    field: #rust_name,
                    column: #column_name,
                }
            }
        })
        .collect();

    let expanded = quote! {
        /// Field markers for `#struct_name`.
        #[allow(non_snake_case)]
        pub mod #fields_mod_name {
            #[allow(unused_imports)]
            use super::*;

            #(#marker_structs)*
        }

        impl ::docquery_core::schema::Document for #struct_name {
            const FIELDS: &'static [::docquery_core::schema::FieldMapping] = &[
                #(#mappings),*
            ];
        }

        impl #struct_name {
            #(#accessors)*
        }
    };

    Ok(expanded)
}

struct FieldInfo {
    field_name: Ident,
    rust_name: String,
    field_type: Type,
    column_name: String,
}

#[derive(Default)]
struct FieldAttrs {
    name: Option<String>,
    skip: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RenameRule {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl RenameRule {
    fn from_lit(lit: &LitStr) -> syn::Result<Self> {
        match lit.value().as_str() {
            "lowercase" => Ok(Self::Lower),
            "UPPERCASE" => Ok(Self::Upper),
            "PascalCase" => Ok(Self::Pascal),
            "camelCase" => Ok(Self::Camel),
            "snake_case" => Ok(Self::Snake),
            "SCREAMING_SNAKE_CASE" => Ok(Self::ScreamingSnake),
            "kebab-case" => Ok(Self::Kebab),
            "SCREAMING-KEBAB-CASE" => Ok(Self::ScreamingKebab),
            other => Err(syn::Error::new_spanned(
                lit,
                format!("unknown rename rule `{other}`"),
            )),
        }
    }

    /// Applies the rule to a snake_case field name.
    fn apply(self, field: &str) -> String {
        match self {
            Self::Lower | Self::Snake => field.to_ascii_lowercase(),
            Self::Upper | Self::ScreamingSnake => field.to_ascii_uppercase(),
            Self::Pascal => to_pascal_case(field),
            Self::Camel => to_camel_case(field),
            Self::Kebab => field.replace('_', "-"),
            Self::ScreamingKebab => field.to_ascii_uppercase().replace('_', "-"),
        }
    }
}

fn parse_container_attrs(attrs: &[Attribute]) -> syn::Result<Option<RenameRule>> {
    let mut document_rule = None;
    let mut serde_rule = None;

    for attr in attrs {
        if attr.path().is_ident("document") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") {
                    let lit: LitStr = meta.value()?.parse()?;
                    document_rule = Some(RenameRule::from_lit(&lit)?);
                    Ok(())
                } else {
                    Err(meta.error("unsupported document attribute"))
                }
            })?;
        } else if attr.path().is_ident("serde") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") {
                    if let Some(lit) = parse_serialize_name(&meta)? {
                        serde_rule = Some(RenameRule::from_lit(&lit)?);
                    }
                    Ok(())
                } else {
                    skip_meta_value(&meta)
                }
            })?;
        }
    }

    Ok(document_rule.or(serde_rule))
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut column = FieldAttrs::default();
    let mut serde = FieldAttrs::default();

    for attr in attrs {
        if attr.path().is_ident("column") {
            // Handle empty attribute like #[column]
            if matches!(attr.meta, Meta::Path(_)) {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    column.skip = true;
                } else if meta.path.is_ident("name") {
                    let value: Expr = meta.value()?.parse()?;
                    if let Expr::Lit(lit) = value {
                        if let Lit::Str(s) = lit.lit {
                            column.name = Some(s.value());
                        }
                    }
                } else {
                    return Err(meta.error("unsupported column attribute"));
                }
                Ok(())
            })?;
        } else if attr.path().is_ident("serde") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    serde.skip = true;
                    Ok(())
                } else if meta.path.is_ident("rename") {
                    if let Some(lit) = parse_serialize_name(&meta)? {
                        serde.name = Some(lit.value());
                    }
                    Ok(())
                } else {
                    skip_meta_value(&meta)
                }
            })?;
        }
    }

    Ok(FieldAttrs {
        name: column.name.or(serde.name),
        skip: column.skip || serde.skip,
    })
}

/// Reads `key = "x"` or the serialize side of `key(serialize = "x")`.
fn parse_serialize_name(meta: &ParseNestedMeta) -> syn::Result<Option<LitStr>> {
    if meta.input.peek(Token![=]) {
        let lit: LitStr = meta.value()?.parse()?;
        return Ok(Some(lit));
    }

    let mut name = None;
    meta.parse_nested_meta(|nested| {
        if nested.path.is_ident("serialize") {
            name = Some(nested.value()?.parse::<LitStr>()?);
            Ok(())
        } else {
            skip_meta_value(&nested)
        }
    })?;
    Ok(name)
}

/// Consumes the value of a serde key this macro does not interpret.
fn skip_meta_value(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        let _: Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|nested| skip_meta_value(&nested))?;
    }
    Ok(())
}

fn to_pascal_case(s: &str) -> String {
    let mut result = String::new();
    let mut capitalize_next = true;
    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }
    result
}

fn to_camel_case(s: &str) -> String {
    let pascal = to_pascal_case(s);
    let mut chars = pascal.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_ascii_lowercase().to_string() + chars.as_str()
    })
}
