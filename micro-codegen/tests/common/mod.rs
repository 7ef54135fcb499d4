//! Descriptor fixtures shared by the integration tests
//!
//! protoc is not needed: descriptors are assembled by hand the way protoc
//! would hand them to the plugin, fully-qualified type names included.

#![allow(dead_code)]

use prost_types::compiler::CodeGeneratorRequest;
use prost_types::source_code_info::Location;
use prost_types::{
    DescriptorProto, FileDescriptorProto, FileOptions, MethodDescriptorProto,
    ServiceDescriptorProto, SourceCodeInfo,
};

pub fn message(name: &str) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        ..Default::default()
    }
}

pub fn unary(name: &str, input: &str, output: &str) -> MethodDescriptorProto {
    streaming(name, input, output, false, false)
}

pub fn streaming(
    name: &str,
    input: &str,
    output: &str,
    client_streaming: bool,
    server_streaming: bool,
) -> MethodDescriptorProto {
    MethodDescriptorProto {
        name: Some(name.to_string()),
        input_type: Some(input.to_string()),
        output_type: Some(output.to_string()),
        client_streaming: Some(client_streaming),
        server_streaming: Some(server_streaming),
        ..Default::default()
    }
}

pub fn service(name: &str, methods: Vec<MethodDescriptorProto>) -> ServiceDescriptorProto {
    ServiceDescriptorProto {
        name: Some(name.to_string()),
        method: methods,
        ..Default::default()
    }
}

pub fn proto_file(
    name: &str,
    package: &str,
    messages: Vec<DescriptorProto>,
    services: Vec<ServiceDescriptorProto>,
) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(name.to_string()),
        package: Some(package.to_string()),
        message_type: messages,
        service: services,
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

/// Attach a leading comment to method `method` of service `service`.
pub fn comment_method(file: &mut FileDescriptorProto, service: i32, method: i32, text: &str) {
    file.source_code_info
        .get_or_insert_with(SourceCodeInfo::default)
        .location
        .push(Location {
            path: vec![6, service, 2, method],
            leading_comments: Some(text.to_string()),
            ..Default::default()
        });
}

/// greeter.proto: `service Greeter { rpc SayHello(HelloRequest) returns (HelloReply); }`
pub fn greeter_file() -> FileDescriptorProto {
    let mut file = proto_file(
        "greeter.proto",
        "greeter",
        vec![message("HelloRequest"), message("HelloReply")],
        vec![service(
            "Greeter",
            vec![unary("SayHello", ".greeter.HelloRequest", ".greeter.HelloReply")],
        )],
    );
    comment_method(&mut file, 0, 0, " Sends a greeting\n");
    file
}

/// common/money.proto, imported by the orders fixture.
pub fn money_file() -> FileDescriptorProto {
    let mut file = proto_file("common/money.proto", "common", vec![message("Money")], vec![]);
    file.options = Some(FileOptions {
        go_package: Some("example.com/shop/common".to_string()),
        ..Default::default()
    });
    file
}

/// shop/orders.proto: unary, cross-file and streaming methods in one service.
pub fn orders_file() -> FileDescriptorProto {
    let mut file = proto_file(
        "shop/orders.proto",
        "orders",
        vec![
            message("CreateOrderRequest"),
            message("Order"),
            message("OrderEvent"),
        ],
        vec![service(
            "OrderService",
            vec![
                unary("CreateOrder", ".orders.CreateOrderRequest", ".orders.Order"),
                unary("Refund", ".orders.Order", ".common.Money"),
                streaming("WatchOrders", ".orders.Order", ".orders.OrderEvent", false, true),
                streaming("ImportOrders", ".orders.Order", ".orders.Order", true, true),
            ],
        )],
    );
    file.dependency = vec!["common/money.proto".to_string()];
    file.options = Some(FileOptions {
        go_package: Some("example.com/shop/orders;orders".to_string()),
        ..Default::default()
    });
    file
}

pub fn request(
    files: Vec<FileDescriptorProto>,
    to_generate: &[&str],
    parameter: Option<&str>,
) -> CodeGeneratorRequest {
    CodeGeneratorRequest {
        file_to_generate: to_generate.iter().map(|name| name.to_string()).collect(),
        parameter: parameter.map(str::to_string),
        proto_file: files,
        ..Default::default()
    }
}
