//! # micro-codegen - message-bus RPC bindings from protobuf services
//!
//! Turns the service declarations of compiled `.proto` files into bindings
//! for the `micro` message-bus runtime. Every RPC method becomes a subject
//! (`<prefix>.<lowercased method>`) and the generated code offers:
//!
//! - a client with a blocking `Request` and a one-way `Publish` per method;
//! - a handler type per method;
//! - a `QueueSubscribe` wiring type (load-balanced, one queue group per
//!   subject) and a `Subscribe` wiring type (broadcast).
//!
//! Go output follows the protoc-gen-go layout; Rust output targets the same
//! runtime contract through an `async_trait` client.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use micro_codegen::{GeneratorConfig, Generator, SchemaIndex};
//!
//! let index = SchemaIndex::new(&request.proto_file);
//! let generator = Generator::new(&index, GeneratorConfig::default());
//!
//! for file in generator.generate(&request.file_to_generate)? {
//!     std::fs::write(&file.name, file.content)?;
//! }
//! ```
//!
//! Inside protoc, [`host::run`] does the same over stdin and stdout.
//!
//! ## Streaming
//!
//! Only unary methods get bodies. Streaming methods keep their signatures,
//! handler types and empty registration methods, or fail the run with
//! `streaming=reject`.

pub mod binding;
pub mod code_writer;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod host;
pub mod naming;
pub mod plugin;
pub mod signature;
pub mod targets;



// Re-exports
pub use binding::{FileBinding, MethodBinding, ServiceBinding};
pub use config::{GeneratorConfig, StreamingPolicy, Target};
pub use descriptor::SchemaIndex;
pub use error::{Error, Result};
pub use naming::{NamingContext, ReservedNames};
pub use plugin::{GeneratedFile, Generator, PLUGIN_NAME};
pub use signature::Flavor;
