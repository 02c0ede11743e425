// #[controller] implementation
// Reads action names, parameter names/types and verbs off an impl block

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::{
    parse_macro_input, Attribute, FnArg, GenericArgument, Ident, ImplItem, ImplItemFn, ItemImpl,
    LitStr, Pat, PathArguments, Token, Type,
};

const HELPER_ATTRS: [&str; 3] = ["action", "verbs", "non_action"];

const KNOWN_VERBS: [&str; 9] = [
    "GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS", "CONNECT", "TRACE",
];

pub fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            "#[controller] takes no arguments",
        )
        .to_compile_error()
        .into();
    }

    let mut item_impl = parse_macro_input!(item as ItemImpl);

    match expand_impl(&mut item_impl) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand_impl(item_impl: &mut ItemImpl) -> syn::Result<TokenStream2> {
    if let Some((_, path, _)) = &item_impl.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[controller] goes on an inherent impl block, not a trait impl",
        ));
    }

    if !item_impl.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item_impl.generics,
            "generic controllers are not supported",
        ));
    }

    let mut actions = Vec::new();
    for item in item_impl.items.iter_mut() {
        if let ImplItem::Fn(method) = item {
            let is_action = method.sig.receiver().is_some() && !has_attr(&method.attrs, "non_action");
            if is_action {
                actions.push(action_tokens(method)?);
            }
            method
                .attrs
                .retain(|a| !HELPER_ATTRS.iter().any(|name| a.path().is_ident(name)));
        }
    }

    let self_ty = &item_impl.self_ty;

    Ok(quote! {
        #item_impl

        impl ::routeprobe::router::Controller for #self_ty {
            fn descriptor() -> ::routeprobe::router::ControllerDescriptor {
                ::routeprobe::router::ControllerDescriptor::new(::std::any::type_name::<Self>())
                    #( .with_action(#actions) )*
            }
        }
    })
}

/// Generates the ActionDescriptor expression for one method
fn action_tokens(method: &ImplItemFn) -> syn::Result<TokenStream2> {
    let method_name = method.sig.ident.to_string();
    let method_name = method_name.trim_start_matches("r#").to_string();

    let action_name = action_name(&method.attrs)?.unwrap_or_else(|| method_name.clone());

    let verbs = match verbs(&method.attrs)? {
        Some(verbs) => quote! {
            .with_verbs([#( ::routeprobe::router::Method::#verbs ),*])
        },
        None => quote! { .with_conventional_verbs() },
    };

    let parameters = method
        .sig
        .inputs
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(pat_type) => Some(pat_type),
            FnArg::Receiver(_) => None,
        })
        .enumerate()
        .map(|(idx, pat_type)| {
            let name = match &*pat_type.pat {
                Pat::Ident(pat_ident) => pat_ident.ident.to_string().trim_start_matches("r#").to_string(),
                Pat::Wild(_) => format!("_{}", idx),
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        "action parameters must be plain identifiers",
                    ))
                }
            };
            let ty = &pat_type.ty;
            let type_name = quote!(#ty).to_string().replace(' ', "");
            let optional = is_option(ty);
            Ok(quote! {
                .with_parameter(::routeprobe::router::ParameterDescriptor::new(#name, #type_name, #optional))
            })
        })
        .collect::<syn::Result<Vec<_>>>()?;

    Ok(quote! {
        ::routeprobe::router::ActionDescriptor::new(#action_name, #method_name)
            #verbs
            #( #parameters )*
    })
}

fn has_attr(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|a| a.path().is_ident(name))
}

/// Reads `#[action(name = "...")]`
fn action_name(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut name = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("action")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                name = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("expected `name = \"...\"`"))
            }
        })?;
    }
    Ok(name)
}

/// Reads `#[verbs(GET, POST)]`
fn verbs(attrs: &[Attribute]) -> syn::Result<Option<Vec<Ident>>> {
    let Some(attr) = attrs.iter().find(|a| a.path().is_ident("verbs")) else {
        return Ok(None);
    };

    let idents = attr.parse_args_with(Punctuated::<Ident, Token![,]>::parse_terminated)?;
    let mut verbs = Vec::new();
    for ident in idents {
        let upper = ident.to_string().to_ascii_uppercase();
        if !KNOWN_VERBS.contains(&upper.as_str()) {
            return Err(syn::Error::new_spanned(
                &ident,
                format!("unknown HTTP method '{}'", ident),
            ));
        }
        verbs.push(Ident::new(&upper, ident.span()));
    }

    if verbs.is_empty() {
        return Err(syn::Error::new_spanned(attr, "#[verbs] needs at least one method"));
    }

    Ok(Some(verbs))
}

/// Whether a type is `Option<_>`
fn is_option(ty: &Type) -> bool {
    let Type::Path(type_path) = ty else {
        return false;
    };

    type_path
        .path
        .segments
        .last()
        .map(|segment| {
            segment.ident == "Option"
                && matches!(
                    &segment.arguments,
                    PathArguments::AngleBracketed(args)
                        if matches!(args.args.first(), Some(GenericArgument::Type(_)))
                )
        })
        .unwrap_or(false)
}
