//! Per-file orchestration: bind, then print.

use prost_types::FileDescriptorProto;

use crate::binding::FileBinding;
use crate::config::GeneratorConfig;
use crate::descriptor::SchemaIndex;
use crate::error::{Error, Result};
use crate::targets::{emitter_for, Emitter};

/// Name the plugin registers under; protoc invokes `protoc-gen-micro` for `--micro_out`.
pub const PLUGIN_NAME: &str = "micro";

/// One generated source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub name: String,
    pub content: String,
}

/// Generates bindings for schema files of one request.
///
/// Holds no state between files: each call binds and prints from scratch.
pub struct Generator<'i, 'a> {
    index: &'i SchemaIndex<'a>,
    config: GeneratorConfig,
    emitter: Box<dyn Emitter>,
}

impl<'i, 'a> Generator<'i, 'a> {
    pub fn new(index: &'i SchemaIndex<'a>, config: GeneratorConfig) -> Self {
        let emitter = emitter_for(&config);
        Self {
            index,
            config,
            emitter,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn file(&self, name: &str) -> Result<&'a FileDescriptorProto> {
        self.index
            .file(name)
            .ok_or_else(|| Error::file_not_found(name))
    }

    /// Binding model of a file, `None` when it declares no services.
    pub fn bind_file(&self, name: &str) -> Result<Option<FileBinding>> {
        let file = self.file(name)?;
        if file.service.is_empty() {
            tracing::debug!(file = %name, "no services, nothing to generate");
            return Ok(None);
        }
        FileBinding::build(self.index, file, &self.config).map(Some)
    }

    /// Generate the bindings of one file, `None` when it declares no services.
    pub fn generate_file(&self, name: &str) -> Result<Option<GeneratedFile>> {
        let Some(binding) = self.bind_file(name)? else {
            return Ok(None);
        };
        let content = self.render(&binding)?;

        let output = self.emitter.output_name(&binding.source);
        tracing::info!(
            source = %binding.source,
            output = %output,
            services = binding.services.len(),
            target = %self.config.target,
            "generated bindings"
        );

        Ok(Some(GeneratedFile {
            name: output,
            content,
        }))
    }

    /// Print a bound file: preamble, then client and server of each service in order.
    pub fn render(&self, binding: &FileBinding) -> Result<String> {
        let mut w = self.emitter.writer();
        self.emitter.emit_preamble(binding, &mut w)?;
        for service in &binding.services {
            self.emitter.emit_client(service, &mut w)?;
            self.emitter.emit_server(service, &mut w)?;
        }
        Ok(w.into_string())
    }

    /// Generate every named file, stopping at the first error.
    pub fn generate<S: AsRef<str>>(&self, files: &[S]) -> Result<Vec<GeneratedFile>> {
        let mut generated = Vec::new();
        for name in files {
            if let Some(file) = self.generate_file(name.as_ref())? {
                generated.push(file);
            }
        }
        Ok(generated)
    }
}
