//! Rust bindings, built as token streams and pretty-printed.
//!
//! Every service is parsed back into a `syn::File` before printing, so a
//! malformed type name surfaces as [`Error::Render`](crate::Error::Render)
//! instead of as broken output.

mod client;
mod server;

use heck::ToSnakeCase;
use proc_macro2::{Ident, Span, TokenStream};

use crate::binding::{FileBinding, ServiceBinding};
use crate::code_writer::CodeWriter;
use crate::config::Target;
use crate::error::{Error, Result};
use crate::naming;

use super::Emitter;

#[derive(Debug, Clone)]
pub struct RustEmitter {
    runtime: String,
}

impl RustEmitter {
    pub fn new(runtime: impl Into<String>) -> Self {
        Self {
            runtime: runtime.into(),
        }
    }

    /// Absolute path of the runtime crate, `::micro`.
    fn runtime_path(&self) -> Result<syn::Path> {
        if self.runtime.is_empty() {
            return Err(Error::render_msg("runtime crate name is empty"));
        }
        syn::parse_str(&format!("::{}", self.runtime)).map_err(|err| {
            Error::render(format!("invalid runtime crate name '{}'", self.runtime), err)
        })
    }
}

impl Emitter for RustEmitter {
    fn target(&self) -> Target {
        Target::Rust
    }

    fn output_name(&self, source: &str) -> String {
        super::output_name(source, "rs")
    }

    fn writer(&self) -> CodeWriter {
        CodeWriter::new("    ")
    }

    fn emit_preamble(&self, file: &FileBinding, w: &mut CodeWriter) -> Result<()> {
        super::header_comment(w, &file.source);
        if !file.package.is_empty() {
            w.p(&format!("// package: {}", file.package));
        }
        Ok(())
    }

    fn emit_client(&self, service: &ServiceBinding, w: &mut CodeWriter) -> Result<()> {
        let tokens = client::tokens(&self.runtime_path()?, service)?;
        w.blank();
        print_items(tokens, w)
    }

    fn emit_server(&self, service: &ServiceBinding, w: &mut CodeWriter) -> Result<()> {
        let tokens = server::tokens(&self.runtime_path()?, service)?;
        w.blank();
        print_items(tokens, w)
    }
}

/// Parse `tokens` as a sequence of items and print them through `w`.
fn print_items(tokens: TokenStream, w: &mut CodeWriter) -> Result<()> {
    let file: syn::File = syn::parse2(tokens)?;
    w.p_text(&prettyplease::unparse(&file));
    Ok(())
}

/// A resolved type name as a `syn::Type`.
fn parse_type(name: &str) -> Result<syn::Type> {
    syn::parse_str(name)
        .map_err(|err| Error::render(format!("'{}' is not a Rust type", name), err))
}

/// snake_case function identifier, keywords and `new` suffixed with `_`.
fn fn_ident(name: &str) -> Ident {
    let mut ident = name.to_snake_case();
    if naming::is_rust_keyword(&ident) || ident == "new" {
        ident.push('_');
    }
    Ident::new(&ident, Span::call_site())
}

/// Type identifier, `_` separators removed.
fn type_ident(name: &str) -> Ident {
    let mut ident: String = name.split('_').filter(|s| !s.is_empty()).collect();
    if naming::is_rust_keyword(&ident) {
        ident.push('_');
    }
    Ident::new(&ident, Span::call_site())
}

/// `#[doc = "..."]` attributes for schema comments.
fn doc_attrs(comments: Option<&str>) -> Vec<TokenStream> {
    comments
        .into_iter()
        .flat_map(str::lines)
        .map(|line| {
            let line = format!(" {}", line.strip_prefix(' ').unwrap_or(line));
            quote::quote! { #[doc = #line] }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fn_ident() {
        assert_eq!(fn_ident("SayHello").to_string(), "say_hello");
        assert_eq!(fn_ident("Type").to_string(), "type_");
        assert_eq!(fn_ident("New").to_string(), "new_");
    }

    #[test]
    fn test_type_ident() {
        assert_eq!(type_ident("SayHelloHandler").to_string(), "SayHelloHandler");
        assert_eq!(type_ident("Reset_Handler").to_string(), "ResetHandler");
        assert_eq!(type_ident("Self").to_string(), "Self_");
    }

    #[test]
    fn test_parse_type() {
        assert!(parse_type("super::common::Money").is_ok());
        assert!(parse_type("r#type::Kind").is_ok());
        assert_eq!(parse_type("not a type").unwrap_err().category(), "render");
    }

    #[test]
    fn test_doc_attrs() {
        let docs = doc_attrs(Some(" Sends a greeting\n second"));
        assert_eq!(docs.len(), 2);
        assert!(docs[0].to_string().contains("\" Sends a greeting\""));
        assert!(doc_attrs(None).is_empty());
    }

    #[test]
    fn test_invalid_runtime_name() {
        let emitter = RustEmitter::new("not a crate");
        assert!(emitter.runtime_path().is_err());

        let err = RustEmitter::new("").runtime_path().unwrap_err();
        assert_eq!(err.category(), "render");
        assert!(err.to_string().contains("runtime crate name is empty"));
    }
}
