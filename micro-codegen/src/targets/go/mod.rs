//! Go bindings, printed line by line in gofmt layout.

mod client;
mod server;

use crate::binding::{FileBinding, ServiceBinding};
use crate::code_writer::CodeWriter;
use crate::config::Target;
use crate::descriptor::Import;
use crate::error::Result;
use crate::signature::{ClientSignature, HandlerSignature, Response};

use super::Emitter;

#[derive(Debug, Clone)]
pub struct GoEmitter {
    alias: String,
    runtime_import: String,
}

impl GoEmitter {
    pub fn new(alias: impl Into<String>, runtime_import: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            runtime_import: runtime_import.into(),
        }
    }

    /// `alias.name`
    fn runtime(&self, name: &str) -> String {
        format!("{}.{}", self.alias, name)
    }

    /// Runtime import plus the recorded ones, sorted by path as gofmt sorts them.
    fn import_specs(&self, recorded: &[Import]) -> Vec<Import> {
        let mut specs = Vec::with_capacity(recorded.len() + 1);
        specs.push(Import {
            alias: self.alias.clone(),
            path: self.runtime_import.clone(),
        });
        specs.extend(
            recorded
                .iter()
                .filter(|import| import.path != self.runtime_import)
                .cloned(),
        );
        specs.sort_by(|a, b| a.path.cmp(&b.path));
        specs
    }
}

impl Emitter for GoEmitter {
    fn target(&self) -> Target {
        Target::Go
    }

    fn output_name(&self, source: &str) -> String {
        super::output_name(source, "go")
    }

    fn writer(&self) -> CodeWriter {
        CodeWriter::with_tabs()
    }

    fn emit_preamble(&self, file: &FileBinding, w: &mut CodeWriter) -> Result<()> {
        super::header_comment(w, &file.source);
        w.p(&format!("package {}", file.package));
        w.blank();
        w.p("import (");
        {
            let _indent = w.indent();
            for import in self.import_specs(&file.imports) {
                w.p(&format!("{} {}", import.alias, quote(&import.path)));
            }
        }
        w.p(")");
        Ok(())
    }

    fn emit_client(&self, service: &ServiceBinding, w: &mut CodeWriter) -> Result<()> {
        client::emit(self, service, w);
        Ok(())
    }

    fn emit_server(&self, service: &ServiceBinding, w: &mut CodeWriter) -> Result<()> {
        server::emit(self, service, w);
        Ok(())
    }
}

/// Go interpreted string literal.
pub(crate) fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// `Name(req *In) (*Out, error)`, `Name() (Svc_NameClient, error)` or `Name(req *In) error`
pub(crate) fn client_signature(sig: &ClientSignature) -> String {
    let arg = sig
        .request
        .as_ref()
        .map(|ty| format!("req *{}", ty))
        .unwrap_or_default();
    let ret = match &sig.response {
        Response::Message(ty) => format!("(*{}, error)", ty),
        Response::Stream(ty) => format!("({}, error)", ty),
        Response::Nothing => "error".to_string(),
    };
    format!("{}({}) {}", sig.name, arg, ret)
}

/// `type NameHandler func(*alias.Context, *In, *Out) error`
pub(crate) fn handler_type(sig: &HandlerSignature, alias: &str) -> String {
    let mut args = vec![format!("*{}.Context", alias)];
    args.extend(sig.request.iter().map(|ty| format!("*{}", ty)));
    args.extend(sig.response.iter().map(|ty| format!("*{}", ty)));
    format!("type {} func({}) error", sig.name, args.join(", "))
}

/// Struct fields with their types aligned.
fn struct_fields(w: &mut CodeWriter, fields: &[(&str, String)]) {
    let width = fields.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, ty) in fields {
        w.p(&format!("{:width$} {}", name, ty, width = width));
    }
}

/// Keyed composite literal elements with their values aligned.
fn keyed_elements(w: &mut CodeWriter, elements: &[(&str, &str)]) {
    let width = elements
        .iter()
        .map(|(key, _)| key.len() + 1)
        .max()
        .unwrap_or(0);
    for (key, value) in elements {
        w.p(&format!("{:width$} {},", format!("{}:", key), value, width = width));
    }
}

/// Constructor returning a pointer to a struct holding a runtime handle and the prefix.
fn constructor(
    w: &mut CodeWriter,
    header: &str,
    struct_name: &str,
    handle: &str,
) {
    w.block(header, |w| {
        w.p(&format!("return &{}{{", struct_name));
        {
            let _indent = w.indent();
            keyed_elements(w, &[(handle, handle), ("prefix", "prefix")]);
        }
        w.p("}");
    });
}
