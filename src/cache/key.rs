//! Key Derivation Module
//!
//! Turns an operation name plus its argument list into a stable cache key.

use serde::Serialize;
use serde_json::Value;

// == Key Deriver ==
/// Produces the cache key for one `(operation, arguments)` pair.
///
/// Implementations must be deterministic: the same inputs must always yield
/// the same key. The cache does not verify this; a non-deterministic deriver
/// produces unpredictable hits and misses.
pub trait KeyDeriver: Send + Sync {
    fn derive(&self, operation: &str, args: &[Value]) -> String;
}

// == Default JSON Deriver ==
/// Default deriver: the compact JSON encoding of `[operation, ...args]`.
///
/// Object keys are emitted in sorted order and floats in their shortest
/// round-trip form, so structurally equal arguments always share a key.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonKeyDeriver;

impl KeyDeriver for JsonKeyDeriver {
    fn derive(&self, operation: &str, args: &[Value]) -> String {
        let mut parts = Vec::with_capacity(args.len() + 1);
        parts.push(Value::String(operation.to_string()));
        parts.extend(args.iter().cloned());
        Value::Array(parts).to_string()
    }
}

impl<F> KeyDeriver for F
where
    F: Fn(&str, &[Value]) -> String + Send + Sync,
{
    fn derive(&self, operation: &str, args: &[Value]) -> String {
        self(operation, args)
    }
}

// == Call Arguments ==
/// The argument list of one call, as a tuple of serializable values.
///
/// Only tuples implement this, so the arity is part of the type: `(v,)` is
/// always one argument even when `v` serializes to an array or `null`.
pub trait CallArgs {
    /// Serializes each argument in order.
    fn to_values(&self) -> serde_json::Result<Vec<Value>>;
}

impl CallArgs for () {
    fn to_values(&self) -> serde_json::Result<Vec<Value>> {
        Ok(Vec::new())
    }
}

macro_rules! impl_call_args {
    ($($index:tt: $arg:ident),+) => {
        impl<$($arg: Serialize),+> CallArgs for ($($arg,)+) {
            fn to_values(&self) -> serde_json::Result<Vec<Value>> {
                Ok(vec![$(serde_json::to_value(&self.$index)?),+])
            }
        }
    };
}

impl_call_args!(0: A);
impl_call_args!(0: A, 1: B);
impl_call_args!(0: A, 1: B, 2: C);
impl_call_args!(0: A, 1: B, 2: C, 3: D);
impl_call_args!(0: A, 1: B, 2: C, 3: D, 4: E);
impl_call_args!(0: A, 1: B, 2: C, 3: D, 4: E, 5: F);
impl_call_args!(0: A, 1: B, 2: C, 3: D, 4: E, 5: F, 6: G);
impl_call_args!(0: A, 1: B, 2: C, 3: D, 4: E, 5: F, 6: G, 7: H);
