use heck::{ToShoutySnakeCase, ToSnakeCase};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::binding::{MethodBinding, ServiceBinding};
use crate::error::Result;

use super::{doc_attrs, fn_ident, parse_type, type_ident};

pub(super) fn tokens(rt: &syn::Path, service: &ServiceBinding) -> Result<TokenStream> {
    let trait_ident = type_ident(&service.client_name);
    let impl_ident = format_ident!("{}Impl", trait_ident);
    let ctor_ident = format_ident!("new_{}", service.client_name.to_snake_case());
    let const_ident = format_ident!("{}_SUBJECT_PREFIX", service.name.to_shouty_snake_case());
    let prefix = &service.subject_prefix;

    let const_doc = format!(" Default subject prefix of the `{}` service.", service.name);
    let ctor_doc = format!(" Client for the `{}` service publishing under `prefix`.", service.name);
    let mut trait_docs = doc_attrs(service.comments.as_deref());
    if trait_docs.is_empty() {
        let doc = format!(" Client API for the `{}` service.", service.name);
        trait_docs.push(quote! { #[doc = #doc] });
    }

    let streaming: Vec<&str> = service
        .methods
        .iter()
        .filter(|m| !m.flavor.is_unary())
        .map(|m| m.name.as_str())
        .collect();
    if !streaming.is_empty() {
        let note = format!(
            " Streaming methods ({}) have no client calls.",
            streaming.join(", ")
        );
        trait_docs.push(quote! { #[doc = ""] });
        trait_docs.push(quote! { #[doc = #note] });
    }

    let mut declarations = Vec::new();
    let mut bodies = Vec::new();
    for method in service.unary_methods() {
        let (declaration, body) = method_tokens(rt, method)?;
        declarations.push(declaration);
        bodies.push(body);
    }

    Ok(quote! {
        #[doc = #const_doc]
        pub const #const_ident: &str = #prefix;

        #(#trait_docs)*
        #[#rt::async_trait]
        pub trait #trait_ident: Send + Sync {
            #(#declarations)*
        }

        struct #impl_ident {
            c: #rt::Client,
            prefix: String,
        }

        #[doc = #ctor_doc]
        pub fn #ctor_ident(prefix: impl Into<String>, c: #rt::Client) -> impl #trait_ident {
            #impl_ident {
                c,
                prefix: prefix.into(),
            }
        }

        #[#rt::async_trait]
        impl #trait_ident for #impl_ident {
            #(#bodies)*
        }
    })
}

/// Trait declarations and impl bodies of one unary method.
fn method_tokens(rt: &syn::Path, method: &MethodBinding) -> Result<(TokenStream, TokenStream)> {
    let input = parse_type(&method.input_type)?;
    let output = parse_type(&method.output_type)?;
    let request_fn = fn_ident(&method.signatures.request.name);
    let publish_fn = fn_ident(&method.signatures.publish.name);
    let subject = format!("{{}}.{}", method.subject_suffix);
    let docs = doc_attrs(method.comments.as_deref());

    let declaration = quote! {
        #(#docs)*
        async fn #request_fn(&self, req: &#input) -> #rt::Result<#output>;

        async fn #publish_fn(&self, req: &#input) -> #rt::Result<()>;
    };

    let body = quote! {
        async fn #request_fn(&self, req: &#input) -> #rt::Result<#output> {
            let mut res = <#output>::default();
            self.c
                .request(&format!(#subject, self.prefix), req, &mut res, #rt::DEFAULT_TIMEOUT)
                .await?;
            Ok(res)
        }

        async fn #publish_fn(&self, req: &#input) -> #rt::Result<()> {
            self.c.publish(&format!(#subject, self.prefix), req).await
        }
    };

    Ok((declaration, body))
}
