use crate::binding::{MethodBinding, ServiceBinding};
use crate::code_writer::CodeWriter;

use super::{constructor, handler_type, quote, struct_fields, GoEmitter};

/// How a wiring type attaches its callbacks to the runtime.
#[derive(Debug, Clone, Copy)]
enum Wiring {
    /// Load-balanced: one consumer per queue group receives each message.
    Queue,
    /// Every subscriber receives every message.
    Broadcast,
}

impl Wiring {
    fn type_name(self, service: &ServiceBinding) -> &str {
        match self {
            Wiring::Queue => &service.queue_subscribe_name,
            Wiring::Broadcast => &service.subscribe_name,
        }
    }

    fn receiver(self) -> &'static str {
        match self {
            Wiring::Queue => "dq",
            Wiring::Broadcast => "ds",
        }
    }

    /// Opening line of the runtime subscription call.
    fn subscribe_call(self, alias: &str) -> String {
        let recv = self.receiver();
        match self {
            Wiring::Queue => format!(
                "{}.m.QueueSubscribe(subj, subj, func(ctx *{}.Context) error {{",
                recv, alias
            ),
            Wiring::Broadcast => format!(
                "{}.m.Subscribe(subj, func(ctx *{}.Context) error {{",
                recv, alias
            ),
        }
    }
}

pub(super) fn emit(emitter: &GoEmitter, service: &ServiceBinding, w: &mut CodeWriter) {
    w.blank();
    w.p(&format!("// Server API for {} service", service.name));
    w.blank();

    for method in &service.methods {
        w.p(&handler_type(&method.signatures.handler, &emitter.alias));
    }

    for wiring in [Wiring::Queue, Wiring::Broadcast] {
        wiring_type(emitter, service, wiring, w);
    }
}

fn wiring_type(emitter: &GoEmitter, service: &ServiceBinding, wiring: Wiring, w: &mut CodeWriter) {
    let type_name = wiring.type_name(service);

    w.blank();
    w.block(&format!("type {} struct", type_name), |w| {
        struct_fields(
            w,
            &[
                ("m", format!("*{}", emitter.runtime("Micro"))),
                ("prefix", "string".to_string()),
            ],
        );
    });
    w.blank();

    constructor(
        w,
        &format!(
            "func New{}(prefix string, m *{}) *{}",
            type_name,
            emitter.runtime("Micro"),
            type_name
        ),
        type_name,
        "m",
    );

    for method in &service.methods {
        w.blank();
        registration(emitter, type_name, method, wiring, w);
    }
}

fn registration(
    emitter: &GoEmitter,
    type_name: &str,
    method: &MethodBinding,
    wiring: Wiring,
    w: &mut CodeWriter,
) {
    let recv = wiring.receiver();
    let header = format!(
        "func ({} *{}) {}(h {})",
        recv, type_name, method.name, method.signatures.handler.name
    );

    if !method.flavor.is_unary() {
        // Declared so every method can be registered; nothing is subscribed.
        w.block(&header, |_| {});
        return;
    }

    w.block(&header, |w| {
        w.p(&format!(
            "subj := {}.prefix + {}",
            recv,
            quote(&format!(".{}", method.subject_suffix))
        ));
        w.p(&wiring.subscribe_call(&emitter.alias));
        {
            let _indent = w.indent();
            w.p(&format!("req := new({})", method.input_type));
            w.block("if err := ctx.Decode(ctx.Data, req); err != nil", |w| {
                w.p("return err")
            });
            w.blank();
            w.p(&format!("res := new({})", method.output_type));
            w.block("if err := h(ctx, req, res); err != nil", |w| {
                w.p("return err")
            });
            w.blank();
            w.block("if ctx.Reply != \"\"", |w| w.p("ctx.Publish(ctx.Reply, res)"));
            w.blank();
            w.p("return nil");
        }
        w.p("})");
    });
}
