use crate::binding::{MethodBinding, ServiceBinding};
use crate::code_writer::CodeWriter;

use super::{client_signature, constructor, quote, struct_fields, GoEmitter};

pub(super) fn emit(emitter: &GoEmitter, service: &ServiceBinding, w: &mut CodeWriter) {
    let client_type = emitter.runtime("Client");

    w.blank();
    w.p(&format!(
        "// {}SubjectPrefix is the default subject prefix of the {} service.",
        service.name, service.name
    ));
    w.p(&format!(
        "const {}SubjectPrefix = {}",
        service.name,
        quote(&service.subject_prefix)
    ));
    w.blank();
    w.p(&format!("// Client API for {} service", service.name));
    w.blank();

    if let Some(comments) = &service.comments {
        w.comment(comments);
    }
    w.block(&format!("type {} interface", service.client_name), |w| {
        for method in &service.methods {
            if let Some(comments) = &method.comments {
                w.comment(comments);
            }
            w.p(&client_signature(&method.signatures.request));
            w.p(&client_signature(&method.signatures.publish));
        }
    });
    w.blank();

    w.block(&format!("type {} struct", service.client_struct), |w| {
        struct_fields(w, &[("c", client_type.clone()), ("prefix", "string".to_string())]);
    });
    w.blank();

    constructor(
        w,
        &format!(
            "func {}(prefix string, c {}) {}",
            service.client_constructor, client_type, service.client_name
        ),
        &service.client_struct,
        "c",
    );

    for method in service.unary_methods() {
        w.blank();
        request_method(emitter, service, method, w);
        w.blank();
        publish_method(service, method, w);
    }
}

fn receiver(service: &ServiceBinding) -> String {
    format!("func (c *{})", service.client_struct)
}

fn subject_expr(method: &MethodBinding) -> String {
    format!("c.prefix+{}", quote(&format!(".{}", method.subject_suffix)))
}

fn request_method(
    emitter: &GoEmitter,
    service: &ServiceBinding,
    method: &MethodBinding,
    w: &mut CodeWriter,
) {
    let header = format!(
        "{} {}",
        receiver(service),
        client_signature(&method.signatures.request)
    );
    w.block(&header, |w| {
        w.p(&format!("res := new({})", method.output_type));
        w.p(&format!(
            "err := c.c.Request({}, req, res, {})",
            subject_expr(method),
            emitter.runtime("DefaultTimeout")
        ));
        w.block("if err != nil", |w| w.p("return nil, err"));
        w.p("return res, nil");
    });
}

fn publish_method(service: &ServiceBinding, method: &MethodBinding, w: &mut CodeWriter) {
    let header = format!(
        "{} {}",
        receiver(service),
        client_signature(&method.signatures.publish)
    );
    w.block(&header, |w| {
        w.p(&format!("return c.c.Publish({}, req)", subject_expr(method)));
    });
}
