//! protoc plugin protocol: a `CodeGeneratorRequest` on stdin, a
//! `CodeGeneratorResponse` on stdout.

use std::io::{Read, Write};

use prost::Message;
use prost_types::compiler::code_generator_response::{Feature, File};
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};

use crate::config::GeneratorConfig;
use crate::descriptor::SchemaIndex;
use crate::error::{Error, Result};
use crate::plugin::Generator;

/// Answer one request.
///
/// Problems with the schema or the parameter are reported inside the
/// response. Any other failure is returned as an error.
pub fn handle_request(request: &CodeGeneratorRequest) -> Result<CodeGeneratorResponse> {
    match generate(request) {
        Ok(file) => Ok(CodeGeneratorResponse {
            supported_features: Some(Feature::Proto3Optional as u64),
            file,
            ..Default::default()
        }),
        Err(err) if err.is_reportable() => {
            tracing::error!(category = err.category(), "{}", err);
            Ok(CodeGeneratorResponse {
                error: Some(err.to_string()),
                supported_features: Some(Feature::Proto3Optional as u64),
                ..Default::default()
            })
        }
        Err(err) => Err(err),
    }
}

fn generate(request: &CodeGeneratorRequest) -> Result<Vec<File>> {
    let config = GeneratorConfig::from_parameter(request.parameter.as_deref())?;
    let index = SchemaIndex::new(&request.proto_file);
    let generator = Generator::new(&index, config);

    Ok(generator
        .generate(&request.file_to_generate)?
        .into_iter()
        .map(|generated| File {
            name: Some(generated.name),
            content: Some(generated.content),
            ..Default::default()
        })
        .collect())
}

/// Decode a request from `input`, write the encoded response to `output`.
pub fn run<R: Read, W: Write>(mut input: R, mut output: W) -> Result<()> {
    let mut buf = Vec::new();
    input.read_to_end(&mut buf)?;
    if buf.is_empty() {
        return Err(Error::protocol_msg(
            "no CodeGeneratorRequest on stdin; run through protoc or pass a descriptor set",
        ));
    }

    let request = CodeGeneratorRequest::decode(buf.as_slice())?;
    tracing::debug!(
        files = request.file_to_generate.len(),
        parameter = request.parameter.as_deref().unwrap_or_default(),
        "received request"
    );

    let response = handle_request(&request)?;

    let mut encoded = Vec::with_capacity(response.encoded_len());
    response.encode(&mut encoded)?;
    output.write_all(&encoded)?;
    output.flush()?;
    Ok(())
}
