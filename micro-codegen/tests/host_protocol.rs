//! protoc plugin protocol round trips

mod common;

use common::*;
use micro_codegen::host;
use prost::Message;
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};

fn run(request: &CodeGeneratorRequest) -> CodeGeneratorResponse {
    let mut output = Vec::new();
    host::run(request.encode_to_vec().as_slice(), &mut output).expect("plugin run failed");
    CodeGeneratorResponse::decode(output.as_slice()).expect("response decodes")
}

#[test]
fn test_generates_requested_files_only() {
    let request = request(
        vec![money_file(), orders_file(), greeter_file()],
        &["greeter.proto", "common/money.proto"],
        None,
    );
    let response = run(&request);

    assert_eq!(response.error, None);
    // money.proto has no services
    assert_eq!(response.file.len(), 1);
    assert_eq!(response.file[0].name(), "greeter.micro.go");
    assert!(response.file[0].content().contains("type GreeterClient interface {"));
    assert_eq!(response.supported_features, Some(1));
}

#[test]
fn test_parameter_selects_rust_target() {
    let request = request(vec![greeter_file()], &["greeter.proto"], Some("target=rust"));
    let response = run(&request);

    assert_eq!(response.error, None);
    assert_eq!(response.file[0].name(), "greeter.micro.rs");
}

#[test]
fn test_unresolved_type_is_reported_in_response() {
    let mut orders = orders_file();
    orders.dependency.clear();
    // money.proto is not supplied, so .common.Money cannot resolve
    let request = request(vec![orders], &["shop/orders.proto"], None);
    let response = run(&request);

    let error = response.error.expect("error reported");
    assert!(error.contains(".common.Money"));
    assert!(error.contains("OrderService.Refund"));
    assert!(response.file.is_empty());
}

#[test]
fn test_bad_parameter_is_reported_in_response() {
    let request = request(vec![greeter_file()], &["greeter.proto"], Some("target=cobol"));
    let response = run(&request);

    assert!(response.error.unwrap().contains("unknown target 'cobol'"));
}

#[test]
fn test_streaming_reject_is_reported_in_response() {
    let request = request(
        vec![money_file(), orders_file()],
        &["shop/orders.proto"],
        Some("streaming=reject"),
    );
    let response = run(&request);

    assert!(response
        .error
        .unwrap()
        .contains("OrderService.WatchOrders"));
}

#[test]
fn test_garbage_input_is_a_plugin_failure() {
    let mut output = Vec::new();
    let err = host::run(&[0x0a_u8, 0xff][..], &mut output).unwrap_err();

    assert_eq!(err.category(), "protocol");
    assert!(output.is_empty());
}

#[test]
fn test_handle_request_directly() {
    let request = request(vec![greeter_file()], &["greeter.proto"], Some("prefix=prod"));
    let response = host::handle_request(&request).unwrap();

    assert!(response.file[0]
        .content()
        .contains("const GreeterSubjectPrefix = \"prod\""));
}

#[test]
fn test_empty_input_is_a_plugin_failure() {
    let mut output = Vec::new();
    let err = host::run(std::io::empty(), &mut output).unwrap_err();

    assert_eq!(err.category(), "protocol");
    assert!(err.to_string().contains("no CodeGeneratorRequest"));
    assert!(output.is_empty());
}
