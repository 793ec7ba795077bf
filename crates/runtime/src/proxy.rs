//!
//! Proxies: transparent wrappers around a target object.
//!
//! A handler may intercept the two internal methods enumeration relies on (`ownKeys` and
//! `getOwnPropertyDescriptor`). Everything else is forwarded to the target.
//!

use std::{collections::HashSet, fmt::Debug, sync::Arc};

use tracing::{debug, trace};

use crate::{
    conf::RuntimeConf,
    errors::{ObjectError, ObjectResult},
    gc::{GcCell, GcReadOnlyCell},
    props::{Property, PropertyKey, PropertySlot},
    reflect,
    values::{ObjectRef, ProxyRef, Value},
};

/// Result of a trap, failing with a message (what the trap threw)
pub type TrapResult<T> = Result<T, String>;

/// Handler of a proxy
///
/// Each trap returns `None` when it is not implemented, in which case the operation
/// is forwarded to the target.
pub trait ProxyHandler: Debug + Send + Sync {
    /// `ownKeys` trap
    fn own_keys(&self, _target: &Value) -> Option<TrapResult<Vec<PropertyKey>>> {
        None
    }

    /// `getOwnPropertyDescriptor` trap
    fn get_own_property(
        &self,
        _target: &Value,
        _key: &PropertyKey,
    ) -> Option<TrapResult<Option<Property>>> {
        None
    }
}

/// Handler without any trap (`new Proxy(target, {})`)
#[derive(Debug, Default, Clone, Copy)]
pub struct TransparentHandler;

impl ProxyHandler for TransparentHandler {}

/// Content of a proxy
#[derive(Debug)]
pub struct ProxyValue {
    /// Target and handler, cleared on revocation
    state: GcCell<Option<ProxyState>>,

    /// Was the target callable when the proxy was created?
    callable: bool,
}

#[derive(Debug, Clone)]
struct ProxyState {
    target: Value,
    handler: Arc<dyn ProxyHandler>,
}

impl ProxyValue {
    /// Create a proxy (`new Proxy(target, handler)`)
    pub fn new(target: Value, handler: impl ProxyHandler + 'static) -> ObjectResult<Value> {
        Self::create(target, Arc::new(handler)).map(Value::Proxy)
    }

    /// Create a proxy that can be revoked (`Proxy.revocable(target, handler)`)
    pub fn revocable(
        target: Value,
        handler: impl ProxyHandler + 'static,
    ) -> ObjectResult<(Value, ProxyRevoker)> {
        let proxy = Self::create(target, Arc::new(handler))?;

        Ok((
            Value::Proxy(proxy.clone()),
            ProxyRevoker { proxy: Some(proxy) },
        ))
    }

    fn create(target: Value, handler: Arc<dyn ProxyHandler>) -> ObjectResult<ProxyRef> {
        if !target.is_object() {
            return Err(ObjectError::NotAnObject {
                operation: "Proxy",
                found: target.type_of(),
            });
        }

        let callable = target.is_callable();

        Ok(GcReadOnlyCell::new(Self {
            state: GcCell::new(Some(ProxyState { target, handler })),
            callable,
        }))
    }

    pub fn is_callable(&self) -> bool {
        self.callable
    }

    pub fn is_revoked(&self) -> bool {
        self.state.read().is_none()
    }

    /// Get the proxy's target, if it was not revoked
    pub fn target(&self) -> Option<Value> {
        self.state
            .read()
            .as_ref()
            .map(|state| state.target.clone())
    }

    /// Get a copy of the proxy's state
    ///
    /// The lock is released before returning so traps can freely access the proxy.
    fn state(&self, operation: &'static str) -> ObjectResult<ProxyState> {
        self.state
            .read()
            .clone()
            .ok_or(ObjectError::RevokedProxy { operation })
    }

    /// `[[OwnPropertyKeys]]`
    pub(crate) fn own_keys(
        &self,
        conf: &RuntimeConf,
        depth: usize,
    ) -> ObjectResult<Vec<PropertyKey>> {
        check_depth(conf, depth)?;

        let ProxyState { target, handler } = self.state("ownKeys")?;

        let keys = match handler.own_keys(&target) {
            None => {
                trace!("no 'ownKeys' trap, forwarding to target");
                return reflect::own_keys_at(&target, conf, depth + 1);
            }

            Some(Err(message)) => {
                return Err(ObjectError::TrapFailed {
                    trap: "ownKeys",
                    message,
                });
            }

            Some(Ok(keys)) => keys,
        };

        let invariant = |reason: String| {
            debug!(%reason, "'ownKeys' trap broke an invariant");

            ObjectError::TrapInvariant {
                trap: "ownKeys",
                reason,
            }
        };

        let mut reported = HashSet::with_capacity(keys.len());

        for key in &keys {
            if !reported.insert(key) {
                return Err(invariant(format!("duplicate entry {key}")));
            }
        }

        let extensible = reflect::is_extensible_at(&target, conf, depth + 1)?;
        let target_keys = reflect::own_keys_at(&target, conf, depth + 1)?;

        for key in &target_keys {
            if reported.contains(key) {
                continue;
            }

            if !extensible {
                return Err(invariant(format!(
                    "must report key {key} of non-extensible target"
                )));
            }

            let property = reflect::get_own_property_at(&target, key, conf, depth + 1)?;

            if property.is_some_and(|prop| !prop.configurable) {
                return Err(invariant(format!(
                    "must report non-configurable key {key}"
                )));
            }
        }

        if !extensible && reported.len() != target_keys.len() {
            return Err(invariant(
                "cannot report keys that don't exist on a non-extensible target".to_owned(),
            ));
        }

        Ok(keys)
    }

    /// `[[GetOwnProperty]]`
    pub(crate) fn get_own_property(
        &self,
        key: &PropertyKey,
        conf: &RuntimeConf,
        depth: usize,
    ) -> ObjectResult<Option<Property>> {
        check_depth(conf, depth)?;

        let ProxyState { target, handler } = self.state("getOwnPropertyDescriptor")?;

        let reported = match handler.get_own_property(&target, key) {
            None => return reflect::get_own_property_at(&target, key, conf, depth + 1),

            Some(Err(message)) => {
                return Err(ObjectError::TrapFailed {
                    trap: "getOwnPropertyDescriptor",
                    message,
                });
            }

            Some(Ok(reported)) => reported,
        };

        let invariant = |reason: String| {
            debug!(%reason, "'getOwnPropertyDescriptor' trap broke an invariant");

            ObjectError::TrapInvariant {
                trap: "getOwnPropertyDescriptor",
                reason,
            }
        };

        let actual = reflect::get_own_property_at(&target, key, conf, depth + 1)?;
        let extensible = reflect::is_extensible_at(&target, conf, depth + 1)?;

        match (&reported, &actual) {
            (None, None) => {}

            (None, Some(actual)) => {
                if !actual.configurable {
                    return Err(invariant(format!(
                        "cannot report non-configurable property {key} as non-existent"
                    )));
                }

                if !extensible {
                    return Err(invariant(format!(
                        "cannot report existing property {key} of a non-extensible target as non-existent"
                    )));
                }
            }

            (Some(reported), actual) => {
                if actual.is_none() && !extensible {
                    return Err(invariant(format!(
                        "cannot report a new property {key} on a non-extensible target"
                    )));
                }

                if let Some(actual) = actual {
                    if let Some(reason) = incompatible_descriptor(reported, actual) {
                        return Err(invariant(format!("property {key}: {reason}")));
                    }
                }

                if !reported.configurable {
                    match actual {
                        None => {
                            return Err(invariant(format!(
                                "cannot report non-existent property {key} as non-configurable"
                            )));
                        }

                        Some(actual) if actual.configurable => {
                            return Err(invariant(format!(
                                "cannot report configurable property {key} as non-configurable"
                            )));
                        }

                        Some(actual) => {
                            if matches!(
                                reported.slot,
                                PropertySlot::Data {
                                    writable: false,
                                    ..
                                }
                            ) && actual.writable() == Some(true)
                            {
                                return Err(invariant(format!(
                                    "cannot report writable property {key} as non-configurable and non-writable"
                                )));
                            }
                        }
                    }
                }
            }
        }

        Ok(reported)
    }

    /// `IsArray`, which looks through proxies
    pub(crate) fn is_array(&self, conf: &RuntimeConf, depth: usize) -> ObjectResult<bool> {
        check_depth(conf, depth)?;

        let ProxyState { target, handler: _ } = self.state("IsArray")?;

        reflect::is_array_at(&target, conf, depth + 1)
    }

    /// `[[IsExtensible]]`
    pub(crate) fn is_extensible(&self, conf: &RuntimeConf, depth: usize) -> ObjectResult<bool> {
        check_depth(conf, depth)?;

        let ProxyState { target, handler: _ } = self.state("isExtensible")?;

        reflect::is_extensible_at(&target, conf, depth + 1)
    }
}

/// Revocation function of a revocable proxy
#[derive(Debug)]
pub struct ProxyRevoker {
    proxy: Option<ProxyRef>,
}

impl ProxyRevoker {
    /// Revoke the proxy; revoking a second time has no effect
    pub fn revoke(&mut self) {
        if let Some(proxy) = self.proxy.take() {
            debug!("revoking proxy");
            *proxy.state.write() = None;
        }
    }
}

/// Check a reported descriptor against a non-configurable property of the target
/// (`IsCompatiblePropertyDescriptor`)
fn incompatible_descriptor(reported: &Property, actual: &Property) -> Option<&'static str> {
    if actual.configurable {
        return None;
    }

    if reported.configurable {
        return Some("cannot report a non-configurable property as configurable");
    }

    if reported.enumerable != actual.enumerable {
        return Some("cannot change the enumerability of a non-configurable property");
    }

    match (&reported.slot, &actual.slot) {
        (
            PropertySlot::Data {
                value: reported_value,
                writable: reported_writable,
            },
            PropertySlot::Data {
                value: actual_value,
                writable: false,
            },
        ) => {
            if *reported_writable {
                return Some("cannot report a non-writable property as writable");
            }

            if !reported_value.same_value(actual_value) {
                return Some("cannot report a different value for a non-writable property");
            }

            None
        }

        (PropertySlot::Data { .. }, PropertySlot::Data { writable: true, .. }) => None,

        (
            PropertySlot::Accessor {
                get: reported_get,
                set: reported_set,
            },
            PropertySlot::Accessor {
                get: actual_get,
                set: actual_set,
            },
        ) => {
            let same = |a: &Option<Value>, b: &Option<Value>| match (a, b) {
                (None, None) => true,
                (Some(a), Some(b)) => a.same_value(b),
                _ => false,
            };

            if !same(reported_get, actual_get) || !same(reported_set, actual_set) {
                return Some("cannot report different accessors for a non-configurable property");
            }

            None
        }

        (PropertySlot::Data { .. }, PropertySlot::Accessor { .. })
        | (PropertySlot::Accessor { .. }, PropertySlot::Data { .. }) => {
            Some("cannot switch a non-configurable property between data and accessor")
        }
    }
}

fn check_depth(conf: &RuntimeConf, depth: usize) -> ObjectResult<()> {
    if depth >= conf.proxy_depth_limit {
        return Err(ObjectError::ProxyDepthExceeded {
            limit: conf.proxy_depth_limit,
        });
    }

    Ok(())
}

/// Find the object a mutation applies to, looking through proxies
///
/// Returns `None` for primitives. Mutations and integrity queries don't take a configuration,
/// so the chain is always bounded by the default [`RuntimeConf::proxy_depth_limit`].
pub(crate) fn resolve_target(
    value: &Value,
    operation: &'static str,
) -> ObjectResult<Option<ObjectRef>> {
    let conf = RuntimeConf::default();

    let mut current = value.clone();
    let mut depth = 0;

    loop {
        match current {
            Value::Object(obj) => return Ok(Some(obj)),

            Value::Proxy(proxy) => {
                check_depth(&conf, depth)?;

                current = proxy.state(operation)?.target;
                depth += 1;
            }

            Value::Undefined
            | Value::Null
            | Value::Bool(_)
            | Value::Number(_)
            | Value::BigInt(_)
            | Value::String(_)
            | Value::Symbol(_) => return Ok(None),
        }
    }
}
