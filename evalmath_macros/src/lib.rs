use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, FnArg, ItemFn, PatType, ReturnType, Type};

fn is_f64(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident == "f64")
            .unwrap_or(false),
        _ => false,
    }
}

/// Turns `fn name(x: f64, ...) -> f64 { ... }` into a built-in with the
/// slice calling convention used by the function registry:
/// `fn name(args: &[f64]) -> crate::error::Result<f64>`.
#[proc_macro_attribute]
pub fn builtin_fn(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    let fn_vis = &input.vis;
    let fn_name = &input.sig.ident;
    let fn_body = &input.block;
    let fn_name_str = fn_name.to_string();

    if let ReturnType::Type(_, ty) = &input.sig.output {
        if !is_f64(ty) {
            panic!("Built-in '{}' must return f64", fn_name_str);
        }
    } else {
        panic!("Built-in '{}' must return f64", fn_name_str);
    }

    let mut arg_extractions = Vec::new();

    for (i, arg) in input.sig.inputs.iter().enumerate() {
        if let FnArg::Typed(PatType { pat, ty, .. }) = arg {
            let arg_name = match **pat {
                syn::Pat::Ident(ref ident) => &ident.ident,
                _ => panic!("Unsupported pattern"),
            };
            if !is_f64(ty) {
                panic!(
                    "Expected argument {} ('{}') of {} to be f64",
                    i, arg_name, fn_name_str
                );
            }
            arg_extractions.push(quote! {
                let #arg_name: f64 = args[#i];
            });
        } else {
            panic!("Built-in '{}' cannot take self", fn_name_str);
        }
    }

    let args_len = arg_extractions.len();
    let expanded = quote! {
        #fn_vis fn #fn_name(args: &[f64]) -> crate::error::Result<f64> {
            if args.len() != #args_len {
                return Err(crate::error::EvalError::WrongArgumentCount {
                    function: #fn_name_str.to_string(),
                    given: args.len(),
                    expected: #args_len,
                });
            }

            #(#arg_extractions)*

            Ok(#fn_body)
        }
    };

    TokenStream::from(expanded)
}
