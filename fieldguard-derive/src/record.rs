use crate::attrs;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use proc_macro2::{Ident, TokenTree};
use quote::{ToTokens, quote};
use syn::ext::IdentExt;
use syn::{Data, DataStruct, DeriveInput, Fields, Generics, Type, parse_macro_input};

pub fn record_derive_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(named),
            ..
        }) => &named.named,
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Record can only be derived for structs with named fields",
            ));
        }
    };

    let rename_all = attrs::container_rename_all(&input.attrs)?;

    let mut names: Vec<String> = Vec::new();
    let mut arms = Vec::new();
    let mut bounds = Vec::new();

    for field in fields {
        let field_attrs = attrs::field_attrs(&field.attrs)?;
        if field_attrs.skip {
            continue;
        }

        let Some(ident) = &field.ident else {
            continue;
        };

        let rust_name = ident.unraw().to_string();
        let external = match (field_attrs.rename, rename_all) {
            (Some(rename), _) => rename,
            (None, Some(rule)) => rule.apply(&rust_name),
            (None, None) => rust_name,
        };

        // Two accessors under one name would make the second unreachable
        if names.contains(&external) {
            return Err(syn::Error::new_spanned(
                ident,
                format!("duplicate external field name `{}`", external),
            ));
        }

        if uses_type_param(&field.ty, &input.generics) {
            let ty = &field.ty;
            bounds.push(quote! { #ty: ::fieldguard::ToValue });
        }

        arms.push(quote! {
            #external => ::core::option::Option::Some(::fieldguard::ToValue::to_value(&self.#ident)),
        });
        names.push(external);
    }

    let type_name = name.to_string();
    let mut generics = input.generics.clone();
    if !bounds.is_empty() {
        let where_clause = generics.make_where_clause();
        for bound in &bounds {
            where_clause.predicates.push(syn::parse2(bound.clone())?);
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::fieldguard::Record for #name #ty_generics #where_clause {
            fn field(&self, name: &str) -> ::core::option::Option<::fieldguard::Value<'_>> {
                match name {
                    #(#arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl #impl_generics ::fieldguard::Schema for #name #ty_generics #where_clause {
            const NAME: &'static str = #type_name;
            const FIELD_NAMES: &'static [&'static str] = &[#(#names),*];
        }
    })
}

/// Whether a field type mentions one of the struct's type parameters
fn uses_type_param(ty: &Type, generics: &Generics) -> bool {
    let params: Vec<&Ident> = generics.type_params().map(|param| &param.ident).collect();
    if params.is_empty() {
        return false;
    }

    ty.to_token_stream().into_iter().any(|token| mentions(&token, &params))
}

fn mentions(token: &TokenTree, params: &[&Ident]) -> bool {
    match token {
        TokenTree::Ident(ident) => params.iter().any(|param| *param == ident),
        TokenTree::Group(group) => group.stream().into_iter().any(|inner| mentions(&inner, params)),
        _ => false,
    }
}
