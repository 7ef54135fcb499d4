//! Per-method signatures, computed as data.
//!
//! Emitters render these; they never decide what a signature contains.

use serde::Serialize;

use crate::naming;

/// Streaming shape of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Flavor {
    Unary,
    ClientStreaming,
    ServerStreaming,
    BidiStreaming,
}

impl Flavor {
    pub fn of(client_streaming: bool, server_streaming: bool) -> Self {
        match (client_streaming, server_streaming) {
            (false, false) => Flavor::Unary,
            (true, false) => Flavor::ClientStreaming,
            (false, true) => Flavor::ServerStreaming,
            (true, true) => Flavor::BidiStreaming,
        }
    }

    /// Only unary methods get generated bodies.
    pub fn is_unary(self) -> bool {
        self == Flavor::Unary
    }

    pub fn streams_request(self) -> bool {
        matches!(self, Flavor::ClientStreaming | Flavor::BidiStreaming)
    }

    pub fn streams_response(self) -> bool {
        matches!(self, Flavor::ServerStreaming | Flavor::BidiStreaming)
    }
}

/// What a client call hands back besides the error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "type", rename_all = "snake_case")]
pub enum Response {
    /// A pointer to a freshly decoded response message.
    Message(String),
    /// The streaming placeholder type.
    Stream(String),
    /// Only the send error (publish).
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientSignature {
    pub name: String,
    /// Request message type, absent when the client streams its requests.
    pub request: Option<String>,
    pub response: Response,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandlerSignature {
    pub name: String,
    pub request: Option<String>,
    /// Response message the handler fills in, unary only.
    pub response: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodSignatures {
    pub request: ClientSignature,
    pub publish: ClientSignature,
    pub handler: HandlerSignature,
}

/// Inputs for [`build`]. Type names are already resolved for the target.
#[derive(Debug, Clone, Copy)]
pub struct MethodShape<'a> {
    pub service: &'a str,
    pub method: &'a str,
    /// Camel-cased method name before reserved-word disambiguation.
    pub stream_method: &'a str,
    pub input_type: &'a str,
    pub output_type: &'a str,
    pub flavor: Flavor,
}

/// Build the request, publish and handler signatures of one method.
pub fn build(shape: MethodShape<'_>) -> MethodSignatures {
    let request_arg = if shape.flavor.streams_request() {
        None
    } else {
        Some(shape.input_type.to_string())
    };

    let response = if shape.flavor.is_unary() {
        Response::Message(shape.output_type.to_string())
    } else {
        Response::Stream(naming::stream_type_name(shape.service, shape.stream_method))
    };

    MethodSignatures {
        request: ClientSignature {
            name: format!("{}Request", shape.method),
            request: request_arg.clone(),
            response,
        },
        publish: ClientSignature {
            name: format!("{}Publish", shape.method),
            request: request_arg.clone(),
            response: Response::Nothing,
        },
        handler: HandlerSignature {
            name: naming::handler_type_name(shape.method),
            request: request_arg,
            response: shape
                .flavor
                .is_unary()
                .then(|| shape.output_type.to_string()),
        },
    }
}
