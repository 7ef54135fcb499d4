//! The binding model: every name, subject and signature a schema file's
//! generated code needs, computed before any text is printed.

use prost_types::FileDescriptorProto;
use serde::Serialize;

use crate::config::{GeneratorConfig, StreamingPolicy, Target};
use crate::descriptor::{
    exported_name, Import, MethodAdapter, SchemaIndex, ServiceAdapter, SourceComments,
    TypeResolver,
};
use crate::error::{Error, Result};
use crate::naming;
use crate::signature::{self, Flavor, MethodShape, MethodSignatures};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodBinding {
    /// Declaration index within the service.
    pub index: usize,
    pub proto_name: String,
    /// Exported name, reserved names disambiguated.
    pub name: String,
    /// Method part of the subject. Derived from the camel-cased name without
    /// reserved-word disambiguation, so configuring the reserved table never
    /// moves a method to a different subject.
    pub subject_suffix: String,
    /// Subject under the service's default prefix.
    pub subject: String,
    pub input_type: String,
    pub output_type: String,
    pub flavor: Flavor,
    pub signatures: MethodSignatures,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceBinding {
    pub index: usize,
    pub proto_name: String,
    pub name: String,
    pub client_name: String,
    pub client_struct: String,
    pub client_constructor: String,
    pub queue_subscribe_name: String,
    pub subscribe_name: String,
    pub subject_prefix: String,
    pub comments: Option<String>,
    pub methods: Vec<MethodBinding>,
}

impl ServiceBinding {
    pub fn unary_methods(&self) -> impl Iterator<Item = &MethodBinding> {
        self.methods.iter().filter(|m| m.flavor.is_unary())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileBinding {
    /// Schema file path as the host named it.
    pub source: String,
    pub target: Target,
    /// Go package clause; the schema package for Rust.
    pub package: String,
    /// Cross-file imports, sorted by path. Always empty for Rust.
    pub imports: Vec<Import>,
    pub services: Vec<ServiceBinding>,
}

impl FileBinding {
    /// Bind every service of `file`.
    ///
    /// Fails on the first unresolved type, or on the first streaming method
    /// when streaming is rejected.
    pub fn build(
        index: &SchemaIndex<'_>,
        file: &FileDescriptorProto,
        config: &GeneratorConfig,
    ) -> Result<Self> {
        let mut resolver = TypeResolver::new(
            index,
            file,
            config.target,
            &config.import_prefix,
            &config.naming.package_alias,
        );
        let comments = SourceComments::of(file);

        let services = ServiceAdapter::all(file)
            .map(|service| bind_service(service, &mut resolver, &comments, config))
            .collect::<Result<Vec<_>>>()?;

        let package = match config.target {
            Target::Go => resolver.go_package().name.clone(),
            Target::Rust => file.package().to_string(),
        };

        Ok(Self {
            source: file.name().to_string(),
            target: config.target,
            package,
            imports: resolver.imports(),
            services,
        })
    }
}

fn bind_service(
    service: ServiceAdapter<'_>,
    resolver: &mut TypeResolver<'_, '_>,
    comments: &SourceComments<'_>,
    config: &GeneratorConfig,
) -> Result<ServiceBinding> {
    let name = naming::camel_case(service.name());
    let subject_prefix = config.naming.prefix_for(service.package(), service.name());

    tracing::debug!(
        service = %name,
        prefix = %subject_prefix,
        methods = service.methods().count(),
        "binding service"
    );

    let methods = service
        .methods()
        .map(|method| {
            bind_method(
                &name,
                &subject_prefix,
                service.index,
                method,
                resolver,
                comments,
                config,
            )
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ServiceBinding {
        index: service.index,
        proto_name: service.name().to_string(),
        client_name: naming::client_interface_name(&name),
        client_struct: naming::client_struct_name(&name),
        client_constructor: naming::client_constructor_name(&name),
        queue_subscribe_name: naming::queue_subscribe_type_name(&name),
        subscribe_name: naming::subscribe_type_name(&name),
        subject_prefix,
        comments: comments.service(service.index),
        methods,
        name,
    })
}

fn bind_method(
    service_name: &str,
    subject_prefix: &str,
    service_index: usize,
    method: MethodAdapter<'_>,
    resolver: &mut TypeResolver<'_, '_>,
    comments: &SourceComments<'_>,
    config: &GeneratorConfig,
) -> Result<MethodBinding> {
    let flavor = method.flavor();
    let referrer = format!("{}.{}", service_name, method.name());

    if !flavor.is_unary() {
        match config.streaming {
            StreamingPolicy::Reject => {
                return Err(Error::streaming_unsupported(service_name, method.name()))
            }
            StreamingPolicy::Shell => {
                tracing::warn!(
                    method = %referrer,
                    flavor = ?flavor,
                    "streaming method gets declarations only"
                );
            }
        }
    }

    let input_type = resolver.resolve_type_name(method.input_type(), &referrer)?;
    let output_type = resolver.resolve_type_name(method.output_type(), &referrer)?;

    let camel = naming::camel_case(method.name());
    let name = exported_name(method.name(), &config.reserved);
    let signatures = signature::build(MethodShape {
        service: service_name,
        method: &name,
        stream_method: &camel,
        input_type: &input_type,
        output_type: &output_type,
        flavor,
    });

    Ok(MethodBinding {
        index: method.index,
        proto_name: method.name().to_string(),
        subject_suffix: naming::subject_suffix(&camel),
        subject: naming::subject(subject_prefix, &camel),
        input_type,
        output_type,
        flavor,
        signatures,
        comments: comments.method(service_index, method.index),
        name,
    })
}
