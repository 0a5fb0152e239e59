//! Procedural macros for the typedstore project.
//!
//! Provides `#[derive(Record)]`, which implements the `Record` trait for a
//! struct: the `id()` accessor, the collection name from the mandatory
//! `#[record(collection = "...")]` attribute, and the declared-field
//! descriptor table.
//!
//! Field type tags are inferred from the Rust field types. Only concrete
//! scalar types get a precise tag (`String`, integer widths, floats,
//! `bool`, bare `DateTime`); any generic or otherwise unresolved type falls
//! back to the unchecked `Any` tag. Serialized field names are taken from
//! the field identifiers, so records must not rename fields with serde
//! attributes.
//!
//! The generated code refers to the `typedstore` facade crate by name.

#[allow(unused_extern_crates)]
extern crate self as typedstore_macros;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Error, Fields, LitStr, Result, Type, parse_macro_input};

/// Derives the `Record` trait.
///
/// # Example
///
/// ```ignore
/// use typedstore::prelude::*;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize, Record)]
/// #[record(collection = "users")]
/// pub struct User {
///     pub id: String,
///     pub created_at: bson::DateTime,
///     pub updated_at: bson::DateTime,
///     pub name: String,
///     pub age: i64,
/// }
/// ```
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand_record(input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

fn expand_record(input: DeriveInput) -> Result<TokenStream2> {
    let name = &input.ident;
    let collection = collection_attr(&input)?;

    let Data::Struct(data) = &input.data else {
        return Err(Error::new_spanned(
            name,
            "Record can only be derived for structs",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(Error::new_spanned(
            name,
            "Record can only be derived for structs with named fields",
        ));
    };

    if !fields
        .named
        .iter()
        .any(|field| field.ident.as_ref().is_some_and(|ident| ident == "id"))
    {
        return Err(Error::new_spanned(
            name,
            "Record requires an `id: String` field",
        ));
    }

    let handles = fields.named.iter().map(|field| {
        let field_name = field.ident.as_ref().unwrap().to_string();
        let kind = field_kind(&field.ty);

        quote! { ::typedstore::fields::FieldHandle { name: #field_name, kind: #kind } }
    });

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::typedstore::record::Record for #name #ty_generics #where_clause {
            fn id(&self) -> &str {
                &self.id
            }

            fn collection_name() -> &'static str {
                #collection
            }

            fn fields() -> &'static [::typedstore::fields::FieldHandle] {
                &[#(#handles),*]
            }
        }
    })
}

fn collection_attr(input: &DeriveInput) -> Result<LitStr> {
    let mut collection = None;

    for attr in &input.attrs {
        if !attr.path().is_ident("record") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("collection") {
                collection = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("unsupported record attribute"))
            }
        })?;
    }

    collection.ok_or_else(|| {
        Error::new_spanned(
            &input.ident,
            "missing #[record(collection = \"...\")] attribute",
        )
    })
}

/// Maps a Rust field type to its declared type tag.
///
/// Anything carrying generic arguments (`Option<_>`, `Vec<_>`, chrono's
/// `DateTime<Tz>`) is not a concrete scalar at this level and gets the
/// unchecked `Any` tag; a bare `DateTime` segment is `bson::DateTime`.
fn field_kind(ty: &Type) -> TokenStream2 {
    let kind = quote!(::typedstore::fields::FieldKind);

    let Type::Path(path) = ty else {
        return quote!(#kind::Any);
    };
    let Some(segment) = path.path.segments.last() else {
        return quote!(#kind::Any);
    };
    if !segment.arguments.is_none() {
        return quote!(#kind::Any);
    }

    match segment.ident.to_string().as_str() {
        "String" => quote!(#kind::Str),
        "i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32" | "u64" | "isize" | "usize" => {
            quote!(#kind::Int)
        }
        "f32" | "f64" => quote!(#kind::Double),
        "bool" => quote!(#kind::Bool),
        "DateTime" => quote!(#kind::DateTime),
        _ => quote!(#kind::Any),
    }
}
