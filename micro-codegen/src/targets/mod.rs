//! Rendering of the binding model into target source text

use crate::binding::{FileBinding, ServiceBinding};
use crate::code_writer::CodeWriter;
use crate::config::{GeneratorConfig, Target};
use crate::error::Result;
use crate::plugin::PLUGIN_NAME;

pub mod go;
pub mod rust;

pub use go::GoEmitter;
pub use rust::RustEmitter;

/// Renders bindings for one target language.
///
/// The driver calls `emit_preamble` once per file, then `emit_client` and
/// `emit_server` for each service in declaration order, all on one writer.
pub trait Emitter {
    fn target(&self) -> Target;

    /// Name of the generated file for the schema file `source`.
    fn output_name(&self, source: &str) -> String;

    fn writer(&self) -> CodeWriter;

    /// Header, package clause and import declaration.
    fn emit_preamble(&self, file: &FileBinding, w: &mut CodeWriter) -> Result<()>;

    /// Capability declaration, private client, constructor and unary bodies.
    fn emit_client(&self, service: &ServiceBinding, w: &mut CodeWriter) -> Result<()>;

    /// Handler types and both subscription wiring types.
    fn emit_server(&self, service: &ServiceBinding, w: &mut CodeWriter) -> Result<()>;
}

/// Emitter for the configured target.
pub fn emitter_for(config: &GeneratorConfig) -> Box<dyn Emitter> {
    match config.target {
        Target::Go => Box::new(GoEmitter::new(
            &config.naming.package_alias,
            config.runtime_import_path(),
        )),
        Target::Rust => Box::new(RustEmitter::new(&config.naming.package_alias)),
    }
}

/// `dir/name.proto` -> `dir/name.micro.<extension>`
pub(crate) fn output_name(source: &str, extension: &str) -> String {
    let stem = source.strip_suffix(".proto").unwrap_or(source);
    format!("{}.{}.{}", stem, PLUGIN_NAME, extension)
}

/// The two comment lines every generated file starts with.
pub(crate) fn header_comment(w: &mut CodeWriter, source: &str) {
    w.p(&format!(
        "// Code generated by protoc-gen-{}. DO NOT EDIT.",
        PLUGIN_NAME
    ));
    w.p(&format!("// source: {}", source));
    w.blank();
}
