//! Procedural macros for forkful

use darling::{FromDeriveInput, FromField, FromVariant};
use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

/// Container-level attributes for #[derive(Action)]
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(action), supports(enum_any))]
struct ActionOpts {
    ident: syn::Ident,
    generics: syn::Generics,
    data: darling::ast::Data<ActionVariant, ()>,

    /// Qualify every variant name with this slice (`cart` -> `cart/add`)
    #[darling(default)]
    slice: Option<String>,
}

/// Variant-level attributes
#[derive(Debug, FromVariant)]
#[darling(attributes(action))]
struct ActionVariant {
    ident: syn::Ident,
    fields: darling::ast::Fields<ActionField>,

    /// Explicit name override (used verbatim, no slice prefix)
    #[darling(default)]
    rename: Option<String>,

    /// Wraps another action enum; delegate `name()` and generate `From`
    #[darling(default)]
    nested: bool,
}

#[derive(Debug, FromField)]
struct ActionField {
    ty: syn::Type,
}

/// Convert PascalCase to lowerCamelCase
fn to_lower_camel(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
    }
}

/// Derive macro for the Action trait
///
/// Generates a `name()` method returning a static string per variant.
///
/// - Without attributes, the name is the variant name (`Tick`).
/// - With `#[action(slice = "cart")]` on the enum, names are qualified by
///   slice and lowerCamelCased (`CartAction::DidLoad` -> `cart/didLoad`),
///   and a `SLICE` constant is generated.
/// - `#[action(rename = "...")]` on a variant sets its name verbatim.
/// - `#[action(nested)]` on a single-field tuple variant delegates `name()`
///   to the wrapped action and generates `From<Inner> for Outer`.
///
/// # Example
/// ```ignore
/// #[derive(Action, Clone, Debug)]
/// #[action(slice = "cart")]
/// enum CartAction {
///     Fetch,
///     DidLoad { generation: u64, items: Vec<CartItem> },
/// }
///
/// #[derive(Action, Clone, Debug)]
/// enum Action {
///     #[action(nested)]
///     Cart(CartAction),
/// }
///
/// let action: Action = CartAction::Fetch.into();
/// assert_eq!(action.name(), "cart/fetch");
/// ```
#[proc_macro_derive(Action, attributes(action))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let opts = match ActionOpts::from_derive_input(&input) {
        Ok(opts) => opts,
        Err(e) => return e.write_errors().into(),
    };

    let name = &opts.ident;
    let (impl_generics, ty_generics, where_clause) = opts.generics.split_for_impl();

    let variants = match &opts.data {
        darling::ast::Data::Enum(variants) => variants,
        _ => {
            return syn::Error::new_spanned(&input, "Action can only be derived for enums")
                .to_compile_error()
                .into();
        }
    };

    let mut name_arms = Vec::new();
    let mut from_impls = Vec::new();

    for v in variants.iter() {
        let variant_name = &v.ident;

        if v.nested {
            let inner = match (&v.fields.style, v.fields.fields.as_slice()) {
                (darling::ast::Style::Tuple, [field]) => &field.ty,
                _ => {
                    return syn::Error::new_spanned(
                        variant_name,
                        "#[action(nested)] requires a tuple variant with exactly one field",
                    )
                    .to_compile_error()
                    .into();
                }
            };

            name_arms.push(quote! {
                #name::#variant_name(inner) => ::forkful::Action::name(inner)
            });
            from_impls.push(quote! {
                impl #impl_generics ::core::convert::From<#inner> for #name #ty_generics #where_clause {
                    fn from(action: #inner) -> Self {
                        #name::#variant_name(action)
                    }
                }
            });
            continue;
        }

        let variant_str = match (&v.rename, &opts.slice) {
            (Some(rename), _) => rename.clone(),
            (None, Some(slice)) => format!("{}/{}", slice, to_lower_camel(&variant_name.to_string())),
            (None, None) => variant_name.to_string(),
        };

        name_arms.push(match &v.fields.style {
            darling::ast::Style::Unit => quote! {
                #name::#variant_name => #variant_str
            },
            darling::ast::Style::Tuple => quote! {
                #name::#variant_name(..) => #variant_str
            },
            darling::ast::Style::Struct => quote! {
                #name::#variant_name { .. } => #variant_str
            },
        });
    }

    let slice_const = opts.slice.as_ref().map(|slice| {
        quote! {
            impl #impl_generics #name #ty_generics #where_clause {
                /// Slice that qualifies every action name of this enum.
                pub const SLICE: &'static str = #slice;
            }
        }
    });

    let expanded = quote! {
        impl #impl_generics ::forkful::Action for #name #ty_generics #where_clause {
            fn name(&self) -> &'static str {
                match self {
                    #(#name_arms),*
                }
            }
        }

        #slice_const

        #(#from_impls)*
    };

    TokenStream::from(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_lower_camel() {
        assert_eq!(to_lower_camel("DidFailCreate"), "didFailCreate");
        assert_eq!(to_lower_camel("Logout"), "logout");
        assert_eq!(to_lower_camel(""), "");
    }
}
