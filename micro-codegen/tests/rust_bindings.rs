//! Rust output of whole schema files
//!
//! prettyplease owns the exact layout, so these tests look for items and
//! expressions rather than whole files. Every output is re-parsed with syn.

mod common;

use common::*;
use micro_codegen::{Generator, GeneratorConfig, SchemaIndex, Target};

fn generate(files: &[prost_types::FileDescriptorProto], name: &str) -> String {
    let index = SchemaIndex::new(files);
    let generated = Generator::new(&index, GeneratorConfig::default().with_target(Target::Rust))
        .generate_file(name)
        .expect("generation failed")
        .expect("file has services");
    assert!(generated.name.ends_with(".micro.rs"));
    generated.content
}

/// Squash whitespace so assertions do not depend on line breaking.
fn compact(source: &str) -> String {
    source.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[test]
fn test_greeter_output_parses() {
    let content = generate(&[greeter_file()], "greeter.proto");

    assert!(content.starts_with("// Code generated by protoc-gen-micro. DO NOT EDIT.\n"));
    syn::parse_file(&content).expect("generated Rust parses");
}

#[test]
fn test_greeter_client() {
    let content = compact(&generate(&[greeter_file()], "greeter.proto"));

    assert!(content.contains("pub const GREETER_SUBJECT_PREFIX: &str = \"greeter\";"));
    assert!(content.contains("pub trait GreeterClient: Send + Sync"));
    assert!(content.contains("/// Sends a greeting"));
    assert!(content.contains(
        "async fn say_hello_request(&self, req: &HelloRequest) -> ::micro::Result<HelloReply>;"
    ));
    assert!(content.contains(
        "async fn say_hello_publish(&self, req: &HelloRequest) -> ::micro::Result<()>;"
    ));
    assert!(content.contains("struct GreeterClientImpl"));
    assert!(content.contains("pub fn new_greeter_client("));
    assert!(content.contains("format!(\"{}.sayhello\", self.prefix)"));
    assert!(content.contains("::micro::DEFAULT_TIMEOUT"));
}

#[test]
fn test_greeter_server() {
    let content = compact(&generate(&[greeter_file()], "greeter.proto"));

    assert!(content.contains("pub type SayHelloHandler = ::std::sync::Arc<"));
    assert!(content.contains("&'a ::micro::Context, &'a HelloRequest, &'a mut HelloReply"));
    assert!(content.contains("pub struct GreeterQueueSubscribe"));
    assert!(content.contains("pub struct GreeterSubscribe"));
    assert!(content.contains("pub fn say_hello(&self, h: SayHelloHandler)"));
    assert!(content.contains("queue_subscribe("));
    assert!(content.contains("&subj, &subj, move |ctx: ::micro::Context|"));
    assert!(content.contains(".subscribe("));
    assert!(content.contains("ctx.decode(ctx.data(), &mut req)?;"));
}

#[test]
fn test_reply_publish_failure_is_visible() {
    let content = compact(&generate(&[greeter_file()], "greeter.proto"));

    assert!(content.contains("if let Err(_err) = ctx.publish(reply, &res).await {}"));
    assert!(!content.contains("let _ ="));
    assert!(content.contains("/// Register `h` on `<prefix>.sayhello`. A failed reply publish is dropped"));
}

#[test]
fn test_cross_package_types_use_relative_paths() {
    let content = compact(&generate(&[money_file(), orders_file()], "shop/orders.proto"));

    assert!(content.contains("-> ::micro::Result<super::common::Money>;"));
    syn::parse_file(&generate(&[money_file(), orders_file()], "shop/orders.proto"))
        .expect("generated Rust parses");
}

#[test]
fn test_streaming_methods_have_shells_only() {
    let content = compact(&generate(&[money_file(), orders_file()], "shop/orders.proto"));

    assert!(content.contains("pub fn watch_orders(&self, _h: WatchOrdersHandler) {}"));
    assert!(content.contains("pub fn import_orders(&self, _h: ImportOrdersHandler) {}"));
    assert!(!content.contains("watch_orders_request"));
    assert!(content.contains("/// Streaming methods (WatchOrders, ImportOrders) have no client calls."));
}

#[test]
fn test_well_known_types_come_from_prost_types() {
    let empty = proto_file(
        "google/protobuf/empty.proto",
        "google.protobuf",
        vec![message("Empty")],
        vec![],
    );
    let mut health = proto_file(
        "health.proto",
        "health",
        vec![message("Pong")],
        vec![service(
            "Health",
            vec![unary("Ping", ".google.protobuf.Empty", ".health.Pong")],
        )],
    );
    health.dependency = vec!["google/protobuf/empty.proto".to_string()];

    let source = generate(&[empty, health], "health.proto");
    let content = compact(&source);

    assert!(content.contains(
        "async fn ping_request(&self, req: &::prost_types::Empty) -> ::micro::Result<Pong>;"
    ));
    assert!(!content.contains("super::google"));
    syn::parse_file(&source).expect("generated Rust parses");
}
