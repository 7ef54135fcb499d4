use proc_macro2::{Ident, TokenStream};
use quote::quote;

use crate::binding::{MethodBinding, ServiceBinding};
use crate::error::Result;

use super::{doc_attrs, fn_ident, parse_type, type_ident};

#[derive(Debug, Clone, Copy)]
enum Wiring {
    Queue,
    Broadcast,
}

pub(super) fn tokens(rt: &syn::Path, service: &ServiceBinding) -> Result<TokenStream> {
    let handlers = service
        .methods
        .iter()
        .map(|method| handler_alias(rt, method))
        .collect::<Result<Vec<_>>>()?;

    let queue = wiring_type(rt, service, Wiring::Queue)?;
    let broadcast = wiring_type(rt, service, Wiring::Broadcast)?;

    Ok(quote! {
        #(#handlers)*
        #queue
        #broadcast
    })
}

fn handler_alias(rt: &syn::Path, method: &MethodBinding) -> Result<TokenStream> {
    let handler = &method.signatures.handler;
    let ident = type_ident(&handler.name);
    let docs = doc_attrs(method.comments.as_deref());

    let mut params = vec![quote! { &'a #rt::Context }];
    if let Some(request) = &handler.request {
        let ty = parse_type(request)?;
        params.push(quote! { &'a #ty });
    }
    if let Some(response) = &handler.response {
        let ty = parse_type(response)?;
        params.push(quote! { &'a mut #ty });
    }

    Ok(quote! {
        #(#docs)*
        pub type #ident = ::std::sync::Arc<
            dyn for<'a> Fn(#(#params),*) -> ::std::pin::Pin<
                    ::std::boxed::Box<
                        dyn ::std::future::Future<Output = #rt::Result<()>> + Send + 'a,
                    >,
                > + Send
                + Sync,
        >;
    })
}

fn wiring_type(rt: &syn::Path, service: &ServiceBinding, wiring: Wiring) -> Result<TokenStream> {
    let (name, doc) = match wiring {
        Wiring::Queue => (
            &service.queue_subscribe_name,
            format!(
                " Load-balanced handlers for the `{}` service, one queue group per method.",
                service.name
            ),
        ),
        Wiring::Broadcast => (
            &service.subscribe_name,
            format!(" Broadcast handlers for the `{}` service.", service.name),
        ),
    };
    let ident = type_ident(name);

    let registrations = service
        .methods
        .iter()
        .map(|method| registration(rt, method, wiring))
        .collect::<Result<Vec<_>>>()?;

    Ok(quote! {
        #[doc = #doc]
        pub struct #ident {
            m: #rt::Micro,
            prefix: String,
        }

        impl #ident {
            pub fn new(prefix: impl Into<String>, m: #rt::Micro) -> Self {
                Self {
                    m,
                    prefix: prefix.into(),
                }
            }

            #(#registrations)*
        }
    })
}

fn registration(rt: &syn::Path, method: &MethodBinding, wiring: Wiring) -> Result<TokenStream> {
    let register_fn = fn_ident(&method.name);
    let handler: Ident = type_ident(&method.signatures.handler.name);

    if !method.flavor.is_unary() {
        return Ok(quote! {
            pub fn #register_fn(&self, _h: #handler) {}
        });
    }

    let input = parse_type(&method.input_type)?;
    let output = parse_type(&method.output_type)?;
    let subject = format!("{{}}.{}", method.subject_suffix);
    let doc = format!(
        " Register `h` on `<prefix>.{}`. A failed reply publish is dropped: the handler has already succeeded.",
        method.subject_suffix
    );

    let callback = quote! {
        move |ctx: #rt::Context| {
            let h = h.clone();
            ::std::boxed::Box::pin(async move {
                let mut req = <#input>::default();
                ctx.decode(ctx.data(), &mut req)?;

                let mut res = <#output>::default();
                h(&ctx, &req, &mut res).await?;

                if let Some(reply) = ctx.reply().filter(|reply| !reply.is_empty()) {
                    if let Err(_err) = ctx.publish(reply, &res).await {}
                }

                Ok(())
            })
        }
    };

    let subscribe = match wiring {
        Wiring::Queue => quote! { self.m.queue_subscribe(&subj, &subj, #callback); },
        Wiring::Broadcast => quote! { self.m.subscribe(&subj, #callback); },
    };

    Ok(quote! {
        #[doc = #doc]
        pub fn #register_fn(&self, h: #handler) {
            let subj = format!(#subject, self.prefix);
            #subscribe
        }
    })
}
