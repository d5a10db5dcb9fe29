use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, ext::IdentExt, parse_macro_input};

/// Derive macro for decodable record types.
///
/// Generates a `propdecode::Record` implementation whose declaration lists
/// every named field in order.
///
/// Field attributes:
///
/// - `#[prop(rename = "ProcessId")]`: read the field from a differently named
///   property.
/// - `#[prop(skip)]`: never populate the field. Its type need not implement
///   `FromValue`.
///
/// Struct attribute:
///
/// - `#[prop(unmarshal)]`: decode through the type's `propdecode::Unmarshal`
///   implementation instead of field by field.
///
/// The struct must implement `Default`.
///
/// # Example
///
/// ```ignore
/// #[derive(Record, Default)]
/// pub struct Process {
///     #[prop(rename = "ProcessId")]
///     pub pid: u32,
///
///     #[prop(rename = "Name")]
///     pub name: String,
///
///     #[prop(skip)]
///     pub note: String,
/// }
/// ```
#[proc_macro_derive(Record, attributes(prop))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_impl(&input) {
        Ok(tokens) => tokens,
        Err(e) => e.to_compile_error().into(),
    }
}

fn derive_impl(input: &DeriveInput) -> Result<TokenStream, syn::Error> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut self_decoding = false;
    for attr in &input.attrs {
        if !attr.path().is_ident("prop") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("unmarshal") {
                self_decoding = true;
                Ok(())
            } else {
                Err(meta.error("unknown struct attribute (expected 'unmarshal')"))
            }
        })?;
    }

    if self_decoding {
        let expanded = quote! {
            impl #impl_generics ::propdecode::Record for #name #ty_generics #where_clause {
                fn declaration() -> ::propdecode::Declaration<Self> {
                    ::propdecode::Declaration::self_decoding()
                }
            }
        };
        return Ok(TokenStream::from(expanded));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            Fields::Unit => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Record needs named fields or #[prop(unmarshal)]",
                ));
            }
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Record only supports structs with named fields",
                ));
            }
        },
        _ => return Err(syn::Error::new_spanned(name, "Record only supports structs")),
    };

    let mut decl_tokens = Vec::new();

    for field in fields {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected named field"))?;
        let field_name_str = field_name.unraw().to_string();
        let field_ty = &field.ty;

        // Parse #[prop(...)] attribute.
        let mut rename: Option<String> = None;
        let mut skip = false;

        for attr in &field.attrs {
            if !attr.path().is_ident("prop") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    if rename.is_some() {
                        return Err(meta.error("duplicate rename"));
                    }
                    rename = Some(value.value());
                } else if meta.path.is_ident("skip") {
                    skip = true;
                } else {
                    return Err(meta.error("unknown field attribute (expected 'rename' or 'skip')"));
                }
                Ok(())
            })?;
        }

        let base = if skip {
            quote! { ::propdecode::FieldDecl::<Self>::skipped(#field_name_str) }
        } else {
            quote! {
                ::propdecode::FieldDecl::<Self>::typed::<#field_ty>(
                    #field_name_str,
                    |__record: &mut Self,
                     __value: &::propdecode::Value|
                     -> ::core::result::Result<(), ::propdecode::ConversionError> {
                        __record.#field_name =
                            <#field_ty as ::propdecode::FromValue>::from_value(__value)?;
                        ::core::result::Result::Ok(())
                    },
                )
            }
        };

        // Directive text is validated by the schema resolver.
        let decl = match rename {
            Some(property) => quote! { #base.rename(#property) },
            None => base,
        };
        decl_tokens.push(decl);
    }

    let expanded = quote! {
        impl #impl_generics ::propdecode::Record for #name #ty_generics #where_clause {
            fn declaration() -> ::propdecode::Declaration<Self> {
                ::propdecode::Declaration::Fields(::std::vec![
                    #(#decl_tokens),*
                ])
            }
        }
    };

    Ok(TokenStream::from(expanded))
}
