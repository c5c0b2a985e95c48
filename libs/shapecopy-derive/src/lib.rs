use std::collections::HashSet;

use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, parse_quote, Data, DeriveInput, Fields, LitStr};

/// Derive macro for record shapes.
///
/// Implements `shapecopy::Shape` for a struct with named fields. The record
/// descriptor lists the fields in declaration order, which is the order the
/// engine copies them in.
///
/// Field attributes:
///
/// - `#[shape(rename = "ID")]`: name used for matching against other records.
/// - `#[shape(readonly)]`: writes into the field fail with `CannotSetValue`.
///
/// # Example
///
/// ```ignore
/// #[derive(Shape, Default)]
/// pub struct User {
///     #[shape(rename = "ID")]
///     pub id: i64,
///     pub name: String,
///     #[shape(readonly)]
///     pub created_by: String,
/// }
/// ```
///
/// Type parameters get a `Shape` bound.
#[proc_macro_derive(Shape, attributes(shape))]
pub fn derive_shape(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_impl(&input) {
        Ok(tokens) => tokens,
        Err(e) => e.to_compile_error().into(),
    }
}

fn derive_impl(input: &DeriveInput) -> Result<TokenStream, syn::Error> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Shape only supports structs with named fields",
                ))
            }
        },
        _ => return Err(syn::Error::new_spanned(name, "Shape only supports structs")),
    };

    let mut seen = HashSet::new();
    let mut descriptor_tokens = Vec::new();
    let mut to_value_tokens = Vec::new();
    let mut from_value_tokens = Vec::new();

    for field in fields {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected named field"))?;
        let ty = &field.ty;

        // Parse #[shape(...)] attribute.
        let mut rename: Option<String> = None;
        let mut readonly = false;

        for attr in &field.attrs {
            if !attr.path().is_ident("shape") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    rename = Some(value.value());
                } else if meta.path.is_ident("readonly") {
                    readonly = true;
                } else {
                    return Err(meta.error("unknown shape attribute (expected 'rename' or 'readonly')"));
                }
                Ok(())
            })?;
        }

        let field_name = rename.unwrap_or_else(|| ident.unraw().to_string());
        if !seen.insert(field_name.clone()) {
            return Err(syn::Error::new_spanned(
                ident,
                format!("duplicate field name '{field_name}'"),
            ));
        }

        descriptor_tokens.push(quote! {
            ::shapecopy::FieldDescriptor::new(
                #field_name,
                <#ty as ::shapecopy::Shape>::descriptor(),
                #readonly,
            )
        });

        to_value_tokens.push(quote! {
            ::shapecopy::FieldValue::new(
                #field_name,
                ::shapecopy::Shape::to_value(&self.#ident),
                #readonly,
            )
        });

        from_value_tokens.push(quote! {
            #ident: <#ty as ::shapecopy::Shape>::from_value(__record.take(#field_name)?)
                .map_err(|e| e.with_context(::std::format!("field '{}'", #field_name)))?
        });
    }

    let mut generics = input.generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(::shapecopy::Shape));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let record_ty = quote! {
        ::shapecopy::RecordDescriptor::lazy(
            ::std::any::type_name::<Self>(),
            || ::std::vec![#(#descriptor_tokens),*],
        )
    };

    let expanded = quote! {
        impl #impl_generics ::shapecopy::Shape for #name #ty_generics #where_clause {
            fn descriptor() -> ::shapecopy::Descriptor {
                ::shapecopy::Descriptor::Record(#record_ty)
            }

            fn to_value(&self) -> ::shapecopy::Value {
                ::shapecopy::Value::Record(::shapecopy::Record::new(
                    #record_ty,
                    ::std::vec![#(#to_value_tokens),*],
                ))
            }

            fn from_value(
                __value: ::shapecopy::Value,
            ) -> ::std::result::Result<Self, ::shapecopy::CopyError> {
                #[allow(unused_mut, unused_variables)]
                let mut __record = __value.into_record()?;
                ::std::result::Result::Ok(Self {
                    #(#from_value_tokens),*
                })
            }
        }
    };

    Ok(TokenStream::from(expanded))
}
