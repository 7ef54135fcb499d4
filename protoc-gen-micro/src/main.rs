//! protoc-gen-micro - protoc plugin emitting micro message-bus bindings
//!
//! Invoked by protoc (`protoc --micro_out=target=go:. greeter.proto`) it
//! reads a `CodeGeneratorRequest` from stdin and writes the response to
//! stdout. Given `--descriptor-set` it runs standalone against the output
//! of `protoc --include_source_info --descriptor_set_out`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use micro_codegen::{host, Generator, GeneratorConfig, SchemaIndex};
use prost::Message;
use prost_types::compiler::CodeGeneratorRequest;
use prost_types::FileDescriptorSet;

#[derive(Debug, ValueEnum, Clone, Copy)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The log level to use; logs go to stderr
    #[arg(value_enum, long, default_value = "warn")]
    log_level: LogLevel,

    /// Read a FileDescriptorSet instead of a protoc request on stdin
    #[arg(long, value_name = "FILE")]
    descriptor_set: Option<PathBuf>,

    /// Schema file to generate (repeatable); defaults to every file in the set
    #[arg(long = "file", value_name = "PROTO", requires = "descriptor_set")]
    files: Vec<String>,

    /// Plugin parameter, as passed through --micro_out=PARAMETER:DIR
    #[arg(long)]
    parameter: Option<String>,

    /// Directory generated files are written to
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Print the binding model as JSON instead of writing files
    #[arg(long, requires = "descriptor_set")]
    describe: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(tracing::Level::from(args.log_level))
        .init();

    match &args.descriptor_set {
        None => {
            tracing::debug!("running as protoc plugin");
            host::run(io::stdin().lock(), io::stdout().lock())
                .context("protoc plugin run failed")
        }
        Some(path) => {
            let request = offline_request(path, &args)?;
            if args.describe {
                describe(&request)
            } else {
                write_files(&request, &args.out)
            }
        }
    }
}

fn offline_request(path: &Path, args: &Args) -> Result<CodeGeneratorRequest> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read descriptor set {}", path.display()))?;
    let set = FileDescriptorSet::decode(bytes.as_slice())
        .with_context(|| format!("{} is not a FileDescriptorSet", path.display()))?;

    let file_to_generate = if args.files.is_empty() {
        set.file.iter().map(|file| file.name().to_string()).collect()
    } else {
        args.files.clone()
    };

    Ok(CodeGeneratorRequest {
        file_to_generate,
        parameter: args.parameter.clone(),
        proto_file: set.file,
        ..Default::default()
    })
}

fn describe(request: &CodeGeneratorRequest) -> Result<()> {
    let config = GeneratorConfig::from_parameter(request.parameter.as_deref())?;
    let index = SchemaIndex::new(&request.proto_file);
    let generator = Generator::new(&index, config);

    let mut bindings = Vec::new();
    for name in &request.file_to_generate {
        if let Some(binding) = generator.bind_file(name)? {
            bindings.push(binding);
        }
    }

    println!("{}", serde_json::to_string_pretty(&bindings)?);
    Ok(())
}

fn write_files(request: &CodeGeneratorRequest, out: &Path) -> Result<()> {
    let response = host::handle_request(request)?;
    if let Some(error) = response.error {
        bail!("{}", error);
    }

    for file in &response.file {
        let path = out.join(file.name());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&path, file.content())
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote bindings");
    }

    Ok(())
}
