//! Identifier and subject conventions shared by every target.
//!
//! Everything here is a pure function of its inputs. The generated code of
//! one service and the generated code that talks to it must agree on these
//! names, so both sides derive them from the same rules.

use std::collections::{BTreeSet, HashSet};

use once_cell::sync::Lazy;
use serde::Serialize;

static RUST_KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
        "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
        "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait",
        "true", "type", "unsafe", "use", "where", "while", "abstract", "become", "box", "do",
        "final", "gen", "macro", "override", "priv", "try", "typeof", "unsized", "virtual",
        "yield",
    ]
    .into_iter()
    .collect()
});

/// Convert a schema identifier into an exported identifier.
///
/// Mirrors the protoc-gen-go rule: a leading underscore becomes `X`, an
/// underscore followed by a lower-case letter is dropped and the letter is
/// upper-cased, digits are copied and a lower-case letter that starts a word
/// is upper-cased. Other underscores survive.
pub fn camel_case(name: &str) -> String {
    let bytes = name.as_bytes();
    let mut out = String::with_capacity(bytes.len() + 1);
    let mut i = 0;

    if bytes.first() == Some(&b'_') {
        out.push('X');
        i += 1;
    }

    while i < bytes.len() {
        let c = bytes[i];
        if c == b'_' && i + 1 < bytes.len() && bytes[i + 1].is_ascii_lowercase() {
            i += 1;
            continue;
        }
        if c.is_ascii_digit() {
            out.push(c as char);
            i += 1;
            continue;
        }
        out.push(c.to_ascii_uppercase() as char);
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_lowercase() {
            out.push(bytes[i] as char);
            i += 1;
        }
    }

    out
}

/// Lower-case only the first character of an identifier.
pub fn unexport(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Wire-level address of a method: `prefix + "." + lowercase(method)`.
///
/// `method` is the exported method name. The prefix is used verbatim.
pub fn subject(prefix: &str, method: &str) -> String {
    format!("{}.{}", prefix, subject_suffix(method))
}

/// The method part of a subject.
pub fn subject_suffix(method: &str) -> String {
    method.to_ascii_lowercase()
}

/// Queue group for a method's competing consumers. Always the subject itself.
pub fn queue_group(subject: &str) -> &str {
    subject
}

/// `<Service>Client`
pub fn client_interface_name(service: &str) -> String {
    format!("{}Client", service)
}

/// `unexport(<Service>Client)`, the private implementation of the client.
pub fn client_struct_name(service: &str) -> String {
    unexport(&client_interface_name(service))
}

/// `New<Service>Client`
pub fn client_constructor_name(service: &str) -> String {
    format!("New{}", client_interface_name(service))
}

/// `<Method>Handler`
pub fn handler_type_name(method: &str) -> String {
    format!("{}Handler", method)
}

/// `<Service>QueueSubscribe`
pub fn queue_subscribe_type_name(service: &str) -> String {
    format!("{}QueueSubscribe", service)
}

/// `<Service>Subscribe`
pub fn subscribe_type_name(service: &str) -> String {
    format!("{}Subscribe", service)
}

/// `<Service>_<Method>Client`, the placeholder returned by streaming calls.
pub fn stream_type_name(service: &str, method: &str) -> String {
    format!("{}_{}Client", service, method)
}

/// Whether `ident` is a strict or reserved Rust keyword.
pub fn is_rust_keyword(ident: &str) -> bool {
    RUST_KEYWORDS.contains(ident)
}

/// Identifiers that generated names must not collide with.
///
/// A colliding name gets a trailing `_`. Empty unless configured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReservedNames {
    names: BTreeSet<String>,
}

impl ReservedNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Append `_` when `name` is reserved.
    pub fn disambiguate(&self, name: String) -> String {
        if self.contains(&name) {
            name + "_"
        } else {
            name
        }
    }
}

impl<S: Into<String>> FromIterator<S> for ReservedNames {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Per-run naming inputs threaded into every emitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamingContext {
    /// Overrides the per-service default prefix when set.
    pub subject_prefix: Option<String>,
    /// Identifier the generated code uses to reach the runtime package.
    pub package_alias: String,
}

impl Default for NamingContext {
    fn default() -> Self {
        Self {
            subject_prefix: None,
            package_alias: crate::config::DEFAULT_RUNTIME_ALIAS.to_string(),
        }
    }
}

impl NamingContext {
    /// The configured prefix, else the schema package, else the lower-cased service name.
    pub fn prefix_for(&self, package: &str, service: &str) -> String {
        match &self.subject_prefix {
            Some(prefix) => prefix.clone(),
            None if !package.is_empty() => package.to_string(),
            None => service.to_lowercase(),
        }
    }
}
