//! Conversion of host return types into declared return slots.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::Hash;

use serde::Serialize;
use tether_common::CallError;

use super::ReturnKind;

/// One produced return value.
#[derive(Debug)]
pub enum ReturnValue {
    /// A value, already encoded. Encoding failures are kept so they can
    /// surface as a failure envelope.
    Value(Result<serde_json::Value, serde_json::Error>),
    /// An error slot; `None` means no error occurred.
    Error(Option<String>),
}

impl ReturnValue {
    pub fn value<T: Serialize + ?Sized>(value: &T) -> Self {
        Self::Value(serde_json::to_value(value))
    }

    pub fn error<E: fmt::Display>(error: Option<E>) -> Self {
        Self::Error(error.map(|e| e.to_string()))
    }

    pub fn kind(&self) -> ReturnKind {
        match self {
            Self::Value(_) => ReturnKind::Value,
            Self::Error(_) => ReturnKind::Error,
        }
    }
}

/// Host function return types.
///
/// - `()` declares no return values
/// - `Result<T, E>` declares a value and an error
/// - scalars, strings, `Vec`, `Option`, maps, `serde_json::Value` and
///   [`Json`] declare a single value
pub trait IntoReturns {
    fn return_kinds() -> Vec<ReturnKind>;
    fn into_returns(self) -> Vec<ReturnValue>;
}

/// Marks any `Serialize` type as a single return value.
#[derive(Debug, Clone, PartialEq)]
pub struct Json<T>(pub T);

impl IntoReturns for () {
    fn return_kinds() -> Vec<ReturnKind> {
        Vec::new()
    }

    fn into_returns(self) -> Vec<ReturnValue> {
        Vec::new()
    }
}

impl<T: Serialize, E: fmt::Display> IntoReturns for Result<T, E> {
    fn return_kinds() -> Vec<ReturnKind> {
        vec![ReturnKind::Value, ReturnKind::Error]
    }

    fn into_returns(self) -> Vec<ReturnValue> {
        match self {
            Ok(value) => vec![ReturnValue::value(&value), ReturnValue::Error(None)],
            Err(e) => vec![
                ReturnValue::Value(Ok(serde_json::Value::Null)),
                ReturnValue::error(Some(CallError::Host(e.to_string()))),
            ],
        }
    }
}

impl<T: Serialize> IntoReturns for Json<T> {
    fn return_kinds() -> Vec<ReturnKind> {
        vec![ReturnKind::Value]
    }

    fn into_returns(self) -> Vec<ReturnValue> {
        vec![ReturnValue::value(&self.0)]
    }
}

macro_rules! single_value_returns {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoReturns for $ty {
                fn return_kinds() -> Vec<ReturnKind> {
                    vec![ReturnKind::Value]
                }

                fn into_returns(self) -> Vec<ReturnValue> {
                    vec![ReturnValue::value(&self)]
                }
            }
        )*
    };
}

single_value_returns!(
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    isize,
    u8,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
    String,
    &'static str,
    serde_json::Value,
);

impl<T: Serialize> IntoReturns for Vec<T> {
    fn return_kinds() -> Vec<ReturnKind> {
        vec![ReturnKind::Value]
    }

    fn into_returns(self) -> Vec<ReturnValue> {
        vec![ReturnValue::value(&self)]
    }
}

impl<T: Serialize> IntoReturns for Option<T> {
    fn return_kinds() -> Vec<ReturnKind> {
        vec![ReturnKind::Value]
    }

    fn into_returns(self) -> Vec<ReturnValue> {
        vec![ReturnValue::value(&self)]
    }
}

impl<K: Serialize + Eq + Hash, V: Serialize> IntoReturns for HashMap<K, V> {
    fn return_kinds() -> Vec<ReturnKind> {
        vec![ReturnKind::Value]
    }

    fn into_returns(self) -> Vec<ReturnValue> {
        vec![ReturnValue::value(&self)]
    }
}

impl<K: Serialize + Ord, V: Serialize> IntoReturns for BTreeMap<K, V> {
    fn return_kinds() -> Vec<ReturnKind> {
        vec![ReturnKind::Value]
    }

    fn into_returns(self) -> Vec<ReturnValue> {
        vec![ReturnValue::value(&self)]
    }
}
