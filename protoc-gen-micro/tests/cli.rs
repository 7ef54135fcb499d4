//! Offline mode of the plugin binary, driven through a descriptor set on disk

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use prost::Message;
use prost_types::{
    DescriptorProto, FileDescriptorProto, FileDescriptorSet, MethodDescriptorProto,
    ServiceDescriptorProto,
};

fn message(name: &str) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        ..Default::default()
    }
}

fn greeter_file(output_type: &str) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("greeter.proto".to_string()),
        package: Some("greeter".to_string()),
        message_type: vec![message("HelloRequest"), message("HelloReply")],
        service: vec![ServiceDescriptorProto {
            name: Some("Greeter".to_string()),
            method: vec![MethodDescriptorProto {
                name: Some("SayHello".to_string()),
                input_type: Some(".greeter.HelloRequest".to_string()),
                output_type: Some(output_type.to_string()),
                ..Default::default()
            }],
            ..Default::default()
        }],
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

fn empty_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("common.proto".to_string()),
        package: Some("common".to_string()),
        message_type: vec![message("Nothing")],
        ..Default::default()
    }
}

/// Encode `files` as a FileDescriptorSet under `dir`.
fn write_set(dir: &Path, files: Vec<FileDescriptorProto>) -> PathBuf {
    let path = dir.join("set.pb");
    let set = FileDescriptorSet { file: files };
    fs::write(&path, set.encode_to_vec()).unwrap();
    path
}

fn plugin(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_protoc-gen-micro"))
        .args(args)
        .output()
        .expect("plugin binary runs")
}

#[test]
fn test_writes_bindings_into_out_dir() {
    let dir = tempfile::tempdir().unwrap();
    let set = write_set(
        dir.path(),
        vec![empty_file(), greeter_file(".greeter.HelloReply")],
    );
    let out = dir.path().join("gen");

    let output = plugin(&[
        "--descriptor-set",
        set.to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
    ]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let content = fs::read_to_string(out.join("greeter.micro.go")).unwrap();
    assert!(content.starts_with("// Code generated by protoc-gen-micro. DO NOT EDIT.\n"));
    assert!(content.contains("type GreeterClient interface {"));
    // A file without services produces nothing
    assert!(!out.join("common.micro.go").exists());
}

#[test]
fn test_parameter_and_file_selection() {
    let dir = tempfile::tempdir().unwrap();
    let set = write_set(
        dir.path(),
        vec![empty_file(), greeter_file(".greeter.HelloReply")],
    );
    let out = dir.path().join("gen");

    let output = plugin(&[
        "--descriptor-set",
        set.to_str().unwrap(),
        "--file",
        "greeter.proto",
        "--parameter",
        "target=rust,prefix=prod",
        "--out",
        out.to_str().unwrap(),
    ]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let content = fs::read_to_string(out.join("greeter.micro.rs")).unwrap();
    assert!(content.contains("pub const GREETER_SUBJECT_PREFIX: &str = \"prod\";"));
}

#[test]
fn test_describe_prints_binding_model() {
    let dir = tempfile::tempdir().unwrap();
    let set = write_set(dir.path(), vec![greeter_file(".greeter.HelloReply")]);

    let output = plugin(&["--descriptor-set", set.to_str().unwrap(), "--describe"]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("\"client_struct\": \"greeterClient\""));

    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json[0]["services"][0]["methods"][0]["subject"], "greeter.sayhello");
}

#[test]
fn test_unresolved_type_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let set = write_set(dir.path(), vec![greeter_file(".greeter.Missing")]);
    let out = dir.path().join("gen");

    let output = plugin(&[
        "--descriptor-set",
        set.to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
    ]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains(".greeter.Missing"));
    assert!(!out.join("greeter.micro.go").exists());
}

#[test]
fn test_unreadable_descriptor_set_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.pb");

    let output = plugin(&["--descriptor-set", missing.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read descriptor set"));
}
