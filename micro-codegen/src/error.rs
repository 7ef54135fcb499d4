//! Error types for the micro-codegen library

use thiserror::Error;

/// Main error type for binding generation
#[derive(Error, Debug)]
pub enum Error {
    /// A method references a message that no supplied schema file declares
    #[error("Type '{name}' referenced by {referrer} is not declared in any supplied schema file")]
    UnresolvedType { name: String, referrer: String },

    /// The host asked for a file it did not supply
    #[error("Schema file '{name}' was not supplied by the host")]
    FileNotFound { name: String },

    /// Streaming method encountered while streaming=reject
    #[error("Streaming method '{service}.{method}' cannot be bound: streaming bodies are not generated")]
    StreamingUnsupported { service: String, method: String },

    /// Plugin parameter errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        field: Option<String>,
    },

    /// Host protocol errors (undecodable request, unencodable response)
    #[error("Protocol error: {message}")]
    Protocol {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Generated token stream failed to parse as Rust
    #[error("Render error: {message}")]
    Render {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create an unresolved type error
    pub fn unresolved_type(name: impl Into<String>, referrer: impl Into<String>) -> Self {
        Self::UnresolvedType {
            name: name.into(),
            referrer: referrer.into(),
        }
    }

    /// Create a file not found error
    pub fn file_not_found(name: impl Into<String>) -> Self {
        Self::FileNotFound { name: name.into() }
    }

    /// Create a streaming unsupported error
    pub fn streaming_unsupported(service: impl Into<String>, method: impl Into<String>) -> Self {
        Self::StreamingUnsupported {
            service: service.into(),
            method: method.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>, field: Option<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            field,
        }
    }

    /// Create a protocol error with source
    pub fn protocol<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Protocol {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a protocol error without source
    pub fn protocol_msg(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
            source: None,
        }
    }

    /// Create a render error with source
    pub fn render<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Render {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a render error without source
    pub fn render_msg(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
            source: None,
        }
    }

    /// Whether the error describes the input schema or parameters.
    ///
    /// Reportable errors travel back to protoc inside the response; the rest
    /// abort the plugin process with a non-zero status.
    pub fn is_reportable(&self) -> bool {
        match self {
            Error::UnresolvedType { .. } => true,
            Error::FileNotFound { .. } => true,
            Error::StreamingUnsupported { .. } => true,
            Error::Configuration { .. } => true,
            Error::Protocol { .. } => false,
            Error::Render { .. } => false,
            Error::Io { .. } => false,
        }
    }

    /// Get error category for debugging
    pub fn category(&self) -> &'static str {
        match self {
            Error::UnresolvedType { .. } => "type_resolution",
            Error::FileNotFound { .. } => "schema_lookup",
            Error::StreamingUnsupported { .. } => "streaming",
            Error::Configuration { .. } => "configuration",
            Error::Protocol { .. } => "protocol",
            Error::Render { .. } => "render",
            Error::Io { .. } => "io",
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<prost::DecodeError> for Error {
    fn from(err: prost::DecodeError) -> Self {
        Error::protocol("Failed to decode CodeGeneratorRequest", err)
    }
}

impl From<prost::EncodeError> for Error {
    fn from(err: prost::EncodeError) -> Self {
        Error::protocol("Failed to encode CodeGeneratorResponse", err)
    }
}

impl From<syn::Error> for Error {
    fn from(err: syn::Error) -> Self {
        Error::render("Generated Rust bindings do not parse", err)
    }
}

/// Result type for micro-codegen operations
pub type Result<T> = std::result::Result<T, Error>;
