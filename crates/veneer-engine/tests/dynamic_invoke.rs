//! Integration tests for the dynamic invocation path
//!
//! Covers identity and argument fidelity delivered to the base's
//! invoker, return-value unboxing, generic-method specialization,
//! lazy not-implemented errors, and unchanged propagation of invoker
//! failures.

use std::sync::{Arc, Mutex};

use veneer_engine::{BaseDescriptor, InterfaceDescriptor, ProxyBinder};
use veneer_sdk::{
    BaseInstance, DispatchError, DispatchResult, DynamicInvoker, MethodIdentity, MethodSig,
    TypeRef, Value,
};

/// Records every dynamic invocation and answers with a canned response
/// computed by `respond`.
struct Recorder {
    calls: Mutex<Vec<(MethodIdentity, Vec<Value>)>>,
    respond: fn(&MethodIdentity, &[Value]) -> DispatchResult<Value>,
}

impl Recorder {
    fn new(respond: fn(&MethodIdentity, &[Value]) -> DispatchResult<Value>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            respond,
        }
    }

    fn calls(&self) -> Vec<(MethodIdentity, Vec<Value>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl DynamicInvoker for Recorder {
    fn invoke(&self, method: &MethodIdentity, args: Vec<Value>) -> DispatchResult<Value> {
        self.calls.lock().unwrap().push((method.clone(), args.clone()));
        (self.respond)(method, &args)
    }
}

impl BaseInstance for Recorder {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn invoker(&self) -> Option<&dyn DynamicInvoker> {
        Some(self)
    }
}

fn recorder_base(
    name: &str,
    respond: fn(&MethodIdentity, &[Value]) -> DispatchResult<Value>,
) -> Arc<BaseDescriptor> {
    BaseDescriptor::builder(name)
        .constructor(vec![], move |_| {
            Ok(Arc::new(Recorder::new(respond)) as Arc<dyn BaseInstance>)
        })
        .dynamic_invoker()
        .build()
}

#[test]
fn test_invoke_receives_identity_and_arguments() {
    let iface = InterfaceDescriptor::builder("ITransport")
        .method(
            MethodSig::new("send")
                .returns(TypeRef::named("bool"))
                .with_param(TypeRef::named("string"))
                .with_param(TypeRef::named("i32")),
        )
        .build();
    let base = recorder_base("Transport", |_, _| Ok(Value::bool(true)));

    let binder = ProxyBinder::new();
    let proxy_type = binder.get_or_create(&iface, &base).unwrap();
    let proxy = proxy_type.instantiate(&[]).unwrap();

    let result = proxy
        .call("send", &[Value::str("payload"), Value::i32(3)])
        .unwrap();
    assert_eq!(result, Value::bool(true));

    // Exactly one invocation, with the method identity and the argument
    // sequence equal in order and value to the call site.
    let recorder = proxy.base_as::<Recorder>().unwrap();
    let calls = recorder.calls();
    assert_eq!(calls.len(), 1);
    let (identity, args) = &calls[0];
    assert_eq!(identity.interface, "ITransport");
    assert_eq!(identity.name(), "send");
    assert!(identity.type_args.is_empty());
    assert_eq!(args, &vec![Value::str("payload"), Value::i32(3)]);
}

#[test]
fn test_return_value_unboxed_to_declared_type() {
    let iface = InterfaceDescriptor::builder("ICounter")
        .method(MethodSig::new("next").returns(TypeRef::named("i32")))
        .build();
    let base = recorder_base("Counter", |_, _| Ok(Value::i32(41)));

    let binder = ProxyBinder::new();
    let proxy_type = binder.get_or_create(&iface, &base).unwrap();
    let proxy = proxy_type.instantiate(&[]).unwrap();

    assert_eq!(proxy.call("next", &[]).unwrap(), Value::i32(41));
}

#[test]
fn test_return_kind_mismatch_is_rejected() {
    let iface = InterfaceDescriptor::builder("ICounter")
        .method(MethodSig::new("next").returns(TypeRef::named("i32")))
        .build();
    // Handler answers with an i64 where the interface declares i32; the
    // unbox must fail rather than convert.
    let base = recorder_base("Counter", |_, _| Ok(Value::i64(41)));

    let binder = ProxyBinder::new();
    let proxy_type = binder.get_or_create(&iface, &base).unwrap();
    let proxy = proxy_type.instantiate(&[]).unwrap();

    let err = proxy.call("next", &[]).unwrap_err();
    assert_eq!(
        err,
        DispatchError::TypeMismatch {
            expected: "i32".to_string(),
            got: "i64".to_string(),
        }
    );
}

#[test]
fn test_void_return_is_discarded() {
    let iface = InterfaceDescriptor::builder("ISink")
        .method(MethodSig::new("flush"))
        .build();
    // Whatever the handler returns for a void method is discarded.
    let base = recorder_base("Sink", |_, _| Ok(Value::str("ignored")));

    let binder = ProxyBinder::new();
    let proxy_type = binder.get_or_create(&iface, &base).unwrap();
    let proxy = proxy_type.instantiate(&[]).unwrap();

    assert_eq!(proxy.call("flush", &[]).unwrap(), Value::Null);
}

#[test]
fn test_generic_round_trip_with_specialized_identity() {
    let iface = InterfaceDescriptor::builder("ITube")
        .method(
            MethodSig::new("receive")
                .with_type_params(1)
                .with_param(TypeRef::param(0))
                .returns(TypeRef::param(0)),
        )
        .build();
    // Identity-style handler: echo the single argument back.
    let base = recorder_base("Tube", |_, args| Ok(args[0].clone()));

    let binder = ProxyBinder::new();
    let proxy_type = binder.get_or_create(&iface, &base).unwrap();
    let proxy = proxy_type.instantiate(&[]).unwrap();

    let result = proxy
        .call_generic("receive", &[TypeRef::named("i32")], &[Value::i32(7)])
        .unwrap();
    assert_eq!(result, Value::i32(7));

    let recorder = proxy.base_as::<Recorder>().unwrap();
    let calls = recorder.calls();
    assert_eq!(calls.len(), 1);
    let (identity, _) = &calls[0];
    // The identity crosses the channel specialized with the call site's
    // concrete type argument.
    assert_eq!(identity.type_args, vec![TypeRef::named("i32")]);
    assert_eq!(identity.resolved_return_type(), TypeRef::named("i32"));
}

#[test]
fn test_generic_argument_conformance_uses_type_arguments() {
    let iface = InterfaceDescriptor::builder("ITube")
        .method(
            MethodSig::new("receive")
                .with_type_params(1)
                .with_param(TypeRef::param(0))
                .returns(TypeRef::param(0)),
        )
        .build();
    let base = recorder_base("Tube", |_, args| Ok(args[0].clone()));

    let binder = ProxyBinder::new();
    let proxy_type = binder.get_or_create(&iface, &base).unwrap();
    let proxy = proxy_type.instantiate(&[]).unwrap();

    // The argument must conform to the substituted parameter type.
    let err = proxy
        .call_generic("receive", &[TypeRef::named("i32")], &[Value::str("seven")])
        .unwrap_err();
    assert!(matches!(err, DispatchError::TypeMismatch { .. }));

    // Type-argument arity is enforced.
    let err = proxy.call("receive", &[Value::i32(7)]).unwrap_err();
    assert_eq!(
        err,
        DispatchError::TypeArityMismatch {
            method: "receive".to_string(),
            expected: 1,
            got: 0,
        }
    );
}

#[test]
fn test_unimplemented_is_lazy_and_siblings_stay_usable() {
    struct Plain;

    impl BaseInstance for Plain {
        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    let iface = InterfaceDescriptor::builder("IService")
        .method(MethodSig::new("ready").returns(TypeRef::named("bool")))
        .method(MethodSig::new("shutdown"))
        .build();
    // No invoker and no match for shutdown: synthesis still succeeds.
    let base = BaseDescriptor::builder("Service")
        .constructor(vec![], |_| Ok(Arc::new(Plain) as Arc<dyn BaseInstance>))
        .method(
            MethodSig::new("ready").returns(TypeRef::named("bool")),
            |_, _, _| Ok(Value::bool(true)),
        )
        .build();

    let binder = ProxyBinder::new();
    let proxy_type = binder.get_or_create(&iface, &base).unwrap();
    let proxy = proxy_type.instantiate(&[]).unwrap();

    let err = proxy.call("shutdown", &[]).unwrap_err();
    assert_eq!(
        err,
        DispatchError::NotImplemented {
            method: "shutdown()".to_string()
        }
    );

    // The unimplementable sibling does not poison the rest of the proxy.
    assert_eq!(proxy.call("ready", &[]).unwrap(), Value::bool(true));
}

#[test]
fn test_property_access_routes_through_invoker() {
    use veneer_engine::PropertySig;

    let iface = InterfaceDescriptor::builder("IGauge")
        .property(PropertySig::read_write("Level", TypeRef::named("i32")))
        .build();
    // No accessor methods on the base; both accessors take the dynamic
    // route.
    let base = recorder_base("Gauge", |identity, args| {
        if identity.name() == "get_Level" {
            Ok(Value::i32(5))
        } else {
            assert_eq!(args.len(), 1);
            Ok(Value::Null)
        }
    });

    let binder = ProxyBinder::new();
    let proxy_type = binder.get_or_create(&iface, &base).unwrap();
    let proxy = proxy_type.instantiate(&[]).unwrap();

    assert_eq!(proxy.get("Level", &[]).unwrap(), Value::i32(5));
    proxy.set("Level", &[], Value::i32(9)).unwrap();

    let recorder = proxy.base_as::<Recorder>().unwrap();
    let calls = recorder.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0.name(), "get_Level");
    assert_eq!(calls[1].0.name(), "set_Level");
    assert_eq!(calls[1].1, vec![Value::i32(9)]);
}

#[test]
fn test_invoker_failure_propagates_unchanged() {
    let iface = InterfaceDescriptor::builder("IFlaky")
        .method(MethodSig::new("poke"))
        .build();
    let base = recorder_base("Flaky", |_, _| {
        Err(DispatchError::Failed("downstream unavailable".to_string()))
    });

    let binder = ProxyBinder::new();
    let proxy_type = binder.get_or_create(&iface, &base).unwrap();
    let proxy = proxy_type.instantiate(&[]).unwrap();

    let err = proxy.call("poke", &[]).unwrap_err();
    assert_eq!(
        err,
        DispatchError::Failed("downstream unavailable".to_string())
    );
}

#[test]
fn test_declared_but_absent_invoker_is_reported() {
    struct Plain;

    impl BaseInstance for Plain {
        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    let iface = InterfaceDescriptor::builder("IAny")
        .method(MethodSig::new("poke"))
        .build();
    // The descriptor claims the capability but instances never provide
    // an invoker.
    let base = BaseDescriptor::builder("Liar")
        .constructor(vec![], |_| Ok(Arc::new(Plain) as Arc<dyn BaseInstance>))
        .dynamic_invoker()
        .build();

    let binder = ProxyBinder::new();
    let proxy_type = binder.get_or_create(&iface, &base).unwrap();
    let proxy = proxy_type.instantiate(&[]).unwrap();

    let err = proxy.call("poke", &[]).unwrap_err();
    assert_eq!(
        err,
        DispatchError::MissingInvoker {
            type_name: "Liar".to_string()
        }
    );
}

#[test]
fn test_structural_match_wins_over_invoker() {
    struct Hybrid {
        invoked: Mutex<bool>,
    }

    impl DynamicInvoker for Hybrid {
        fn invoke(&self, _method: &MethodIdentity, _args: Vec<Value>) -> DispatchResult<Value> {
            *self.invoked.lock().unwrap() = true;
            Ok(Value::Null)
        }
    }

    impl BaseInstance for Hybrid {
        fn as_any(&self) -> &dyn std::any::Any {
            self
        }

        fn invoker(&self) -> Option<&dyn DynamicInvoker> {
            Some(self)
        }
    }

    let ping = MethodSig::new("ping").returns(TypeRef::named("bool"));
    let iface = InterfaceDescriptor::builder("IPing")
        .method(ping.clone())
        .build();
    let base = BaseDescriptor::builder("Hybrid")
        .constructor(vec![], |_| {
            Ok(Arc::new(Hybrid {
                invoked: Mutex::new(false),
            }) as Arc<dyn BaseInstance>)
        })
        .method(ping, |_, _, _| Ok(Value::bool(true)))
        .dynamic_invoker()
        .build();

    let binder = ProxyBinder::new();
    let proxy_type = binder.get_or_create(&iface, &base).unwrap();
    let proxy = proxy_type.instantiate(&[]).unwrap();

    assert_eq!(proxy.call("ping", &[]).unwrap(), Value::bool(true));
    let hybrid = proxy.base_as::<Hybrid>().unwrap();
    assert!(!*hybrid.invoked.lock().unwrap());
}
