//! Read-only view over the descriptor tree handed to the plugin.
//!
//! [`SchemaIndex`] is built once per run from every file the host supplied
//! and answers "where is this message declared". [`TypeResolver`] turns type
//! references into names for the target language and remembers which other
//! files the generated code now has to import.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use heck::{ToSnakeCase, ToUpperCamelCase};
use prost_types::{
    DescriptorProto, FileDescriptorProto, MethodDescriptorProto, ServiceDescriptorProto,
};
use serde::Serialize;

use crate::config::{join_import_path, Target};
use crate::error::{Error, Result};
use crate::naming::{self, ReservedNames};
use crate::signature::Flavor;

/// Field numbers of `FileDescriptorProto.service` and `ServiceDescriptorProto.method`.
const FILE_SERVICE_FIELD: i32 = 6;
const SERVICE_METHOD_FIELD: i32 = 2;

/// Well-known types live in `prost_types`, not in generated modules.
const WELL_KNOWN_PACKAGE: &str = "google.protobuf";
const WELL_KNOWN_CRATE: &str = "::prost_types";

/// Where a message type is declared.
#[derive(Debug, Clone)]
pub struct TypeEntry<'a> {
    pub file: &'a FileDescriptorProto,
    pub package: &'a str,
    /// Message names from the outermost enclosing message inwards.
    pub nesting: Vec<&'a str>,
}

/// Every message declared by the supplied files, keyed by fully-qualified name.
#[derive(Debug, Default)]
pub struct SchemaIndex<'a> {
    files: BTreeMap<&'a str, &'a FileDescriptorProto>,
    types: HashMap<String, TypeEntry<'a>>,
}

impl<'a> SchemaIndex<'a> {
    pub fn new(files: &'a [FileDescriptorProto]) -> Self {
        let mut index = Self::default();
        for file in files {
            index.files.insert(file.name(), file);
            let scope = match file.package() {
                "" => String::new(),
                package => format!(".{}", package),
            };
            index.add_messages(file, &scope, &[], &file.message_type);
        }
        tracing::debug!(
            files = index.files.len(),
            types = index.types.len(),
            "indexed schema"
        );
        index
    }

    fn add_messages(
        &mut self,
        file: &'a FileDescriptorProto,
        scope: &str,
        parents: &[&'a str],
        messages: &'a [DescriptorProto],
    ) {
        for message in messages {
            let full_name = format!("{}.{}", scope, message.name());
            let mut nesting = parents.to_vec();
            nesting.push(message.name());

            self.add_messages(file, &full_name, &nesting, &message.nested_type);
            self.types.insert(
                full_name,
                TypeEntry {
                    file,
                    package: file.package(),
                    nesting,
                },
            );
        }
    }

    pub fn file(&self, name: &str) -> Option<&'a FileDescriptorProto> {
        self.files.get(name).copied()
    }

    pub fn files(&self) -> impl Iterator<Item = &'a FileDescriptorProto> + '_ {
        self.files.values().copied()
    }

    /// Look up a type reference. References without a leading dot are treated as absolute.
    pub fn lookup(&self, type_ref: &str) -> Option<&TypeEntry<'a>> {
        if type_ref.starts_with('.') {
            self.types.get(type_ref)
        } else {
            self.types.get(&format!(".{}", type_ref))
        }
    }
}

/// Go package clause and import path of a schema file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoPackage {
    pub name: String,
    pub import_path: String,
}

impl GoPackage {
    /// Derived from `go_package`, else the schema package, else the file stem.
    pub fn of(file: &FileDescriptorProto, import_prefix: &str) -> Self {
        let option = file
            .options
            .as_ref()
            .map(|options| options.go_package())
            .unwrap_or_default();
        let file_dir = match file.name().rsplit_once('/') {
            Some((dir, _)) => dir,
            None => "",
        };

        let (path, name) = if let Some((path, name)) = option.split_once(';') {
            (path.to_string(), name.to_string())
        } else if option.contains('/') {
            let last = option.rsplit('/').next().unwrap_or(option);
            (option.to_string(), last.to_string())
        } else if !option.is_empty() {
            (file_dir.to_string(), option.to_string())
        } else if !file.package().is_empty() {
            (file_dir.to_string(), file.package().to_string())
        } else {
            let base = file.name().rsplit('/').next().unwrap_or_default();
            let stem = base.strip_suffix(".proto").unwrap_or(base);
            (file_dir.to_string(), stem.to_string())
        };

        Self {
            name: sanitize_go_package_name(&name),
            import_path: join_import_path(import_prefix, &path),
        }
    }
}

fn sanitize_go_package_name(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// A Go import the generated file depends on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Import {
    pub alias: String,
    pub path: String,
}

/// Resolves type references from one schema file into target-language names.
#[derive(Debug)]
pub struct TypeResolver<'i, 'a> {
    index: &'i SchemaIndex<'a>,
    current: &'a FileDescriptorProto,
    target: Target,
    import_prefix: String,
    current_go: GoPackage,
    /// Import path -> alias.
    imports: BTreeMap<String, String>,
    taken_aliases: BTreeSet<String>,
}

impl<'i, 'a> TypeResolver<'i, 'a> {
    pub fn new(
        index: &'i SchemaIndex<'a>,
        current: &'a FileDescriptorProto,
        target: Target,
        import_prefix: &str,
        runtime_alias: &str,
    ) -> Self {
        Self {
            index,
            current,
            target,
            import_prefix: import_prefix.to_string(),
            current_go: GoPackage::of(current, import_prefix),
            imports: BTreeMap::new(),
            taken_aliases: BTreeSet::from([runtime_alias.to_string()]),
        }
    }

    pub fn go_package(&self) -> &GoPackage {
        &self.current_go
    }

    /// Resolve `type_ref` for use in the current file.
    ///
    /// `referrer` names the method for the error message. Fails when the
    /// type was never declared in any supplied file.
    pub fn resolve_type_name(&mut self, type_ref: &str, referrer: &str) -> Result<String> {
        let entry = self
            .index
            .lookup(type_ref)
            .ok_or_else(|| Error::unresolved_type(type_ref, referrer))?
            .clone();

        Ok(match self.target {
            Target::Go => self.go_type_name(&entry),
            Target::Rust => self.rust_type_path(&entry),
        })
    }

    fn go_type_name(&mut self, entry: &TypeEntry<'a>) -> String {
        let local = entry
            .nesting
            .iter()
            .map(|name| naming::camel_case(name))
            .collect::<Vec<_>>()
            .join("_");

        let package = GoPackage::of(entry.file, &self.import_prefix);
        if package.import_path == self.current_go.import_path {
            return local;
        }

        let alias = self.record_import(package);
        format!("{}.{}", alias, local)
    }

    fn record_import(&mut self, package: GoPackage) -> String {
        if let Some(alias) = self.imports.get(&package.import_path) {
            return alias.clone();
        }

        let mut alias = package.name.clone();
        let mut counter = 1;
        while self.taken_aliases.contains(&alias) {
            alias = format!("{}{}", package.name, counter);
            counter += 1;
        }

        tracing::debug!(path = %package.import_path, alias = %alias, "recorded import");
        self.taken_aliases.insert(alias.clone());
        self.imports.insert(package.import_path, alias.clone());
        alias
    }

    fn rust_type_path(&self, entry: &TypeEntry<'a>) -> String {
        let mut segments = Vec::new();

        if entry.package == WELL_KNOWN_PACKAGE {
            // prost-build's default extern path
            segments.push(WELL_KNOWN_CRATE.to_string());
        } else if entry.package != self.current.package() {
            let depth = package_segments(self.current.package()).count();
            segments.extend(std::iter::repeat("super".to_string()).take(depth));
            segments.extend(package_segments(entry.package).map(rust_module_ident));
        }

        if let Some((last, outer)) = entry.nesting.split_last() {
            segments.extend(outer.iter().map(|name| rust_module_ident(name)));
            segments.push(rust_type_ident(last));
        }

        segments.join("::")
    }

    /// Imports recorded so far, sorted by path.
    pub fn imports(&self) -> Vec<Import> {
        self.imports
            .iter()
            .map(|(path, alias)| Import {
                alias: alias.clone(),
                path: path.clone(),
            })
            .collect()
    }
}

fn package_segments(package: &str) -> impl Iterator<Item = &str> {
    package.split('.').filter(|segment| !segment.is_empty())
}

/// prost module naming: snake case, raw identifier for keywords.
fn rust_module_ident(name: &str) -> String {
    let ident = name.to_snake_case();
    match ident.as_str() {
        "self" | "super" | "crate" => format!("{}_", ident),
        _ if naming::is_rust_keyword(&ident) => format!("r#{}", ident),
        _ => ident,
    }
}

/// prost type naming: upper camel case, `Self` suffixed.
fn rust_type_ident(name: &str) -> String {
    let ident = name.to_upper_camel_case();
    if ident == "Self" {
        format!("{}_", ident)
    } else {
        ident
    }
}

/// Exported form of a schema identifier, reserved names disambiguated.
pub fn exported_name(raw: &str, reserved: &ReservedNames) -> String {
    reserved.disambiguate(naming::camel_case(raw))
}

/// Leading comments keyed by source location path.
#[derive(Debug, Default)]
pub struct SourceComments<'a> {
    by_path: HashMap<&'a [i32], &'a str>,
}

impl<'a> SourceComments<'a> {
    pub fn of(file: &'a FileDescriptorProto) -> Self {
        let by_path = file
            .source_code_info
            .iter()
            .flat_map(|info| info.location.iter())
            .filter(|location| !location.leading_comments().trim().is_empty())
            .map(|location| (location.path.as_slice(), location.leading_comments()))
            .collect();
        Self { by_path }
    }

    pub fn service(&self, service: usize) -> Option<String> {
        self.lookup(&[FILE_SERVICE_FIELD, service as i32])
    }

    pub fn method(&self, service: usize, method: usize) -> Option<String> {
        self.lookup(&[
            FILE_SERVICE_FIELD,
            service as i32,
            SERVICE_METHOD_FIELD,
            method as i32,
        ])
    }

    fn lookup(&self, path: &[i32]) -> Option<String> {
        self.by_path
            .get(path)
            .map(|text| text.trim_end_matches('\n').to_string())
    }
}

/// One service of a schema file.
#[derive(Debug, Clone, Copy)]
pub struct ServiceAdapter<'a> {
    pub index: usize,
    file: &'a FileDescriptorProto,
    proto: &'a ServiceDescriptorProto,
}

impl<'a> ServiceAdapter<'a> {
    /// Services of `file` in declaration order.
    pub fn all(file: &'a FileDescriptorProto) -> impl Iterator<Item = ServiceAdapter<'a>> {
        file.service
            .iter()
            .enumerate()
            .map(move |(index, proto)| ServiceAdapter { index, file, proto })
    }

    pub fn name(&self) -> &'a str {
        self.proto.name()
    }

    pub fn package(&self) -> &'a str {
        self.file.package()
    }

    /// Methods in declaration order.
    pub fn methods(&self) -> impl Iterator<Item = MethodAdapter<'a>> {
        let proto = self.proto;
        proto
            .method
            .iter()
            .enumerate()
            .map(|(index, proto)| MethodAdapter { index, proto })
    }
}

/// One method of a service.
#[derive(Debug, Clone, Copy)]
pub struct MethodAdapter<'a> {
    pub index: usize,
    proto: &'a MethodDescriptorProto,
}

impl<'a> MethodAdapter<'a> {
    pub fn name(&self) -> &'a str {
        self.proto.name()
    }

    pub fn input_type(&self) -> &'a str {
        self.proto.input_type()
    }

    pub fn output_type(&self) -> &'a str {
        self.proto.output_type()
    }

    pub fn client_streaming(&self) -> bool {
        self.proto.client_streaming()
    }

    pub fn server_streaming(&self) -> bool {
        self.proto.server_streaming()
    }

    pub fn flavor(&self) -> Flavor {
        Flavor::of(self.client_streaming(), self.server_streaming())
    }
}
