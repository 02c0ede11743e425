// call!() implementation
// Turns `|c: Controller| c.action(args)` into a runtime CallExpr tree

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, ToTokens};
use syn::{parse_macro_input, Expr, ExprClosure, ExprLit, Ident, Lit, Pat, Stmt, Type, UnOp};

pub fn expand(input: TokenStream) -> TokenStream {
    let closure = parse_macro_input!(input as ExprClosure);

    match expand_closure(&closure) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand_closure(closure: &ExprClosure) -> syn::Result<TokenStream2> {
    if closure.inputs.len() != 1 {
        return Err(syn::Error::new_spanned(
            &closure.inputs,
            "call! expects one controller parameter, e.g. |c: HomeController| c.index()",
        ));
    }

    let Pat::Type(pat_type) = &closure.inputs[0] else {
        return Err(syn::Error::new_spanned(
            &closure.inputs[0],
            "the controller parameter needs a type annotation",
        ));
    };

    let Pat::Ident(pat_ident) = &*pat_type.pat else {
        return Err(syn::Error::new_spanned(
            &pat_type.pat,
            "the controller parameter must be a plain identifier",
        ));
    };

    let receiver = &pat_ident.ident;
    let controller_ty = match &*pat_type.ty {
        Type::Reference(reference) => &*reference.elem,
        other => other,
    };
    let body = &*closure.body;
    let tree = expr_tree(body, receiver)?;
    let checked = strip_conversions(body);

    Ok(quote! {{
        #[allow(unused_mut, clippy::let_unit_value)]
        let _ = |#receiver: &mut #controller_ty| {
            let _ = #checked;
        };
        ::routeprobe::ActionCall::<#controller_ty>::new(#tree)
    }})
}

fn expr_tree(expr: &Expr, receiver: &Ident) -> syn::Result<TokenStream2> {
    let tree = match expr {
        Expr::Paren(paren) => return expr_tree(&paren.expr, receiver),
        Expr::Group(group) => return expr_tree(&group.expr, receiver),
        Expr::Block(block) if block.block.stmts.len() == 1 => match &block.block.stmts[0] {
            Stmt::Expr(inner, None) => return expr_tree(inner, receiver),
            _ => other(expr),
        },
        Expr::Cast(cast) => convert(expr_tree(&cast.expr, receiver)?),
        Expr::MethodCall(call) if call.method == "into" && call.args.is_empty() => {
            convert(expr_tree(&call.receiver, receiver)?)
        }
        Expr::MethodCall(call) => {
            let target = expr_tree(&call.receiver, receiver)?;
            let method = call.method.to_string();
            let args = call
                .args
                .iter()
                .map(|arg| expr_tree(arg, receiver))
                .collect::<syn::Result<Vec<_>>>()?;
            quote! {
                ::routeprobe::CallExpr::MethodCall {
                    receiver: ::std::boxed::Box::new(#target),
                    method: ::std::string::String::from(#method),
                    args: ::std::vec![#(#args),*],
                }
            }
        }
        Expr::Field(field) => {
            let target = expr_tree(&field.base, receiver)?;
            let member = field.member.to_token_stream().to_string();
            quote! {
                ::routeprobe::CallExpr::FieldAccess {
                    receiver: ::std::boxed::Box::new(#target),
                    field: ::std::string::String::from(#member),
                }
            }
        }
        Expr::Lit(ExprLit { lit, .. }) => match literal(lit, false)? {
            Some(value) => quote! { ::routeprobe::CallExpr::Literal(#value) },
            None => other(expr),
        },
        Expr::Unary(unary) if matches!(unary.op, UnOp::Neg(_)) => match &*unary.expr {
            Expr::Lit(ExprLit { lit, .. }) => match literal(lit, true)? {
                Some(value) => quote! { ::routeprobe::CallExpr::Literal(#value) },
                None => other(expr),
            },
            _ => other(expr),
        },
        Expr::Path(path) if path.qself.is_none() => match path.path.get_ident() {
            Some(ident) if ident == receiver => {
                let name = ident.to_string();
                quote! { ::routeprobe::CallExpr::Parameter(::std::string::String::from(#name)) }
            }
            Some(ident) if ident == "None" => {
                quote! { ::routeprobe::CallExpr::Literal(::routeprobe::Value::Null) }
            }
            _ if is_constant(&path.path) => {
                let constant = &path.path;
                quote! { ::routeprobe::CallExpr::Literal(::routeprobe::Value::from(#constant)) }
            }
            _ => other(expr),
        },
        Expr::Call(call) if call.args.len() == 1 => match &*call.func {
            Expr::Path(func) if func.path.is_ident("Some") => {
                return expr_tree(&call.args[0], receiver)
            }
            _ => other(expr),
        },
        _ => other(expr),
    };

    Ok(tree)
}

/// Outer casts and `.into()` calls need a target type the check closure does
/// not have, so only the call underneath is compiled
fn strip_conversions(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) => strip_conversions(&paren.expr),
        Expr::Cast(cast) => strip_conversions(&cast.expr),
        Expr::MethodCall(call) if call.method == "into" && call.args.is_empty() => {
            strip_conversions(&call.receiver)
        }
        _ => expr,
    }
}

fn convert(inner: TokenStream2) -> TokenStream2 {
    quote! { ::routeprobe::CallExpr::Convert(::std::boxed::Box::new(#inner)) }
}

fn other(expr: &Expr) -> TokenStream2 {
    let text = expr.to_token_stream().to_string();
    quote! { ::routeprobe::CallExpr::Other(::std::string::String::from(#text)) }
}

/// Literal to a `Value` constructor, or `None` for literal kinds that are
/// not route values (byte strings, C strings)
fn literal(lit: &Lit, negate: bool) -> syn::Result<Option<TokenStream2>> {
    let value = match lit {
        Lit::Int(int) => {
            let parsed: i64 = int.base10_parse()?;
            let parsed = if negate { -parsed } else { parsed };
            quote! { ::routeprobe::Value::Int(#parsed) }
        }
        Lit::Float(float) => {
            let parsed: f64 = float.base10_parse()?;
            let parsed = if negate { -parsed } else { parsed };
            quote! { ::routeprobe::Value::Float(#parsed) }
        }
        Lit::Str(text) if !negate => {
            let text = text.value();
            quote! { ::routeprobe::Value::Str(::std::string::String::from(#text)) }
        }
        Lit::Char(ch) if !negate => {
            let text = ch.value().to_string();
            quote! { ::routeprobe::Value::Str(::std::string::String::from(#text)) }
        }
        Lit::Bool(flag) if !negate => {
            let flag = flag.value;
            quote! { ::routeprobe::Value::Bool(#flag) }
        }
        _ => return Ok(None),
    };

    Ok(Some(value))
}

/// `SCREAMING_CASE` paths (`MAX_ID`, `limits::PAGE_SIZE`) are taken as constants
fn is_constant(path: &syn::Path) -> bool {
    path.segments.last().is_some_and(|segment| {
        let name = segment.ident.to_string();
        segment.arguments.is_none()
            && name.chars().any(|c| c.is_ascii_uppercase())
            && name
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
    })
}
