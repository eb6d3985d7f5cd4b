//! Argument and result marshaling for bound functions.
//!
//! A [`BoundFunction`] pairs a [`Signature`] (built once, at bind time)
//! with a type-erased invoker. A call goes through four steps:
//!
//! 1. the raw request is split into one unparsed JSON fragment per argument
//! 2. the argument count is checked against the signature's arity
//! 3. the invoker decodes every fragment into its declared type and only
//!    then calls the host function
//! 4. the host function's return values are folded into an [`Envelope`]

mod host_fn;
mod returns;


pub use host_fn::{variadic, IntoBoundFunction, Variadic};
pub use returns::{IntoReturns, Json, ReturnValue};

use std::any::{type_name, Any};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use serde::de::DeserializeOwned;
use serde_json::value::RawValue;
use tether_common::{BindError, CallError};

use crate::envelope::Envelope;

/// Shape of one declared return slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnKind {
    Value,
    Error,
}

/// Bind-time description of a host function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Parameter type names. For a variadic function the last entry is the
    /// element type of the trailing arguments.
    pub params: Vec<&'static str>,
    pub variadic: bool,
    pub returns: Vec<ReturnKind>,
}

impl Signature {
    pub fn new(params: Vec<&'static str>, variadic: bool, returns: Vec<ReturnKind>) -> Self {
        Self {
            params,
            variadic,
            returns,
        }
    }

    /// Number of declared parameters, counting the variadic slot.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Reject return shapes other than none, one value, or value + error.
    pub fn validate(&self) -> Result<(), BindError> {
        if self.variadic && self.params.is_empty() {
            return Err(BindError::UnsupportedSignature(
                "variadic function has no variadic parameter".into(),
            ));
        }
        match self.returns.as_slice() {
            [] | [_] | [_, ReturnKind::Error] => Ok(()),
            [_, ReturnKind::Value] => Err(BindError::UnsupportedSignature(
                "second return value must be an error".into(),
            )),
            more => Err(BindError::UnsupportedSignature(format!(
                "function may only return a value or a value+error, found {} return values",
                more.len()
            ))),
        }
    }

    pub fn check_arity(&self, supplied: usize) -> Result<(), CallError> {
        let declared = self.arity();
        let ok = if self.variadic {
            supplied + 1 >= declared
        } else {
            supplied == declared
        };
        if ok {
            Ok(())
        } else {
            Err(CallError::ArgumentCount {
                expected: declared,
                variadic: self.variadic,
                got: supplied,
            })
        }
    }
}

/// Decoded-on-demand argument list of one call.
pub type RawArgs = [Box<RawValue>];

type Invoker = Box<dyn Fn(&RawArgs) -> Result<Vec<ReturnValue>, CallError> + Send + Sync>;

/// A host function ready to be registered under a page-visible name.
pub struct BoundFunction {
    signature: Signature,
    invoker: Invoker,
}

impl BoundFunction {
    /// Wrap a typed closure. See [`IntoBoundFunction`] for accepted shapes.
    pub fn new<M, F: IntoBoundFunction<M>>(function: F) -> Self {
        function.into_bound_function()
    }

    /// Build a function from an explicit signature and invoker.
    ///
    /// The invoker receives exactly as many fragments as the arity check
    /// allows and must return one [`ReturnValue`] per declared return slot.
    pub fn from_parts<I>(signature: Signature, invoker: I) -> Self
    where
        I: Fn(&RawArgs) -> Result<Vec<ReturnValue>, CallError> + Send + Sync + 'static,
    {
        Self {
            signature,
            invoker: Box::new(invoker),
        }
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Run one call against a raw JSON arguments array.
    pub fn call(&self, request: &str) -> Envelope {
        match self.try_call(request) {
            Ok(returns) => settle(returns),
            Err(e) => Envelope::failure(e),
        }
    }

    fn try_call(&self, request: &str) -> Result<Vec<ReturnValue>, CallError> {
        let args = parse_args(request)?;
        self.signature.check_arity(args.len())?;
        catch_unwind(AssertUnwindSafe(|| (self.invoker)(args.as_slice())))
            .map_err(|payload| CallError::Panicked(panic_message(payload.as_ref())))?
    }
}

impl fmt::Debug for BoundFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundFunction")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Split a request into unparsed per-argument fragments.
pub fn parse_args(request: &str) -> Result<Vec<Box<RawValue>>, CallError> {
    serde_json::from_str(request).map_err(CallError::InvalidRequest)
}

/// Decode argument `index` into `T`.
pub fn decode_arg<T: DeserializeOwned>(index: usize, raw: &RawValue) -> Result<T, CallError> {
    serde_json::from_str(raw.get()).map_err(|source| CallError::ArgumentType {
        index,
        expected: type_name::<T>(),
        source,
    })
}

/// Fold a function's return values into an envelope.
///
/// A present error always wins and the value half is dropped; otherwise the
/// value (or `null`) is the success payload.
pub fn settle(returns: Vec<ReturnValue>) -> Envelope {
    let mut returns = returns.into_iter();
    match (returns.next(), returns.next(), returns.next()) {
        (None, None, None) | (Some(ReturnValue::Error(None)), None, None) => Envelope::empty(),
        (Some(ReturnValue::Error(Some(message))), None, None)
        | (Some(_), Some(ReturnValue::Error(Some(message))), None) => Envelope::failure(message),
        (Some(ReturnValue::Value(value)), None, None)
        | (Some(ReturnValue::Value(value)), Some(ReturnValue::Error(None)), None) => {
            encode(value)
        }
        _ => Envelope::failure("unexpected return values"),
    }
}

fn encode(value: Result<serde_json::Value, serde_json::Error>) -> Envelope {
    match value {
        Ok(value) => Envelope::success(&value),
        Err(e) => Envelope::failure(CallError::Encoding(e)),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
