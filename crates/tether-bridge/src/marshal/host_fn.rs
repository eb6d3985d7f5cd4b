//! Typed closures as bound functions.
//!
//! Closures of up to eight parameters are accepted. Every parameter must be
//! `DeserializeOwned` and the return type must implement [`IntoReturns`].
//! The `Marker` parameter only keeps the per-arity impls apart.

use std::any::type_name;

use serde::de::DeserializeOwned;

use super::{decode_arg, BoundFunction, IntoReturns, RawArgs, Signature};

pub trait IntoBoundFunction<Marker> {
    fn into_bound_function(self) -> BoundFunction;
}

/// A closure whose last parameter, a `Vec<T>`, collects every trailing
/// argument. Built with [`variadic`].
pub struct Variadic<F>(F);

/// Mark `function` as variadic: `variadic(|sep: String, parts: Vec<String>| ..)`
/// accepts one or more arguments.
pub fn variadic<F>(function: F) -> Variadic<F> {
    Variadic(function)
}

impl IntoBoundFunction<()> for BoundFunction {
    fn into_bound_function(self) -> BoundFunction {
        self
    }
}

macro_rules! fixed_arity {
    ($($ty:ident $arg:ident $idx:tt),*) => {
        impl<F, R, $($ty,)*> IntoBoundFunction<fn($($ty,)*) -> R> for F
        where
            F: Fn($($ty),*) -> R + Send + Sync + 'static,
            R: IntoReturns,
            $($ty: DeserializeOwned,)*
        {
            fn into_bound_function(self) -> BoundFunction {
                let signature = Signature::new(
                    vec![$(type_name::<$ty>()),*],
                    false,
                    R::return_kinds(),
                );
                let function = self;
                BoundFunction::from_parts(signature, move |args: &RawArgs| {
                    let _ = args;
                    $(let $arg: $ty = decode_arg($idx, &args[$idx])?;)*
                    Ok(function($($arg),*).into_returns())
                })
            }
        }
    };
}

fixed_arity!();
fixed_arity!(A1 a1 0);
fixed_arity!(A1 a1 0, A2 a2 1);
fixed_arity!(A1 a1 0, A2 a2 1, A3 a3 2);
fixed_arity!(A1 a1 0, A2 a2 1, A3 a3 2, A4 a4 3);
fixed_arity!(A1 a1 0, A2 a2 1, A3 a3 2, A4 a4 3, A5 a5 4);
fixed_arity!(A1 a1 0, A2 a2 1, A3 a3 2, A4 a4 3, A5 a5 4, A6 a6 5);
fixed_arity!(A1 a1 0, A2 a2 1, A3 a3 2, A4 a4 3, A5 a5 4, A6 a6 5, A7 a7 6);
fixed_arity!(A1 a1 0, A2 a2 1, A3 a3 2, A4 a4 3, A5 a5 4, A6 a6 5, A7 a7 6, A8 a8 7);

macro_rules! variadic_arity {
    ($fixed:expr; $($ty:ident $arg:ident $idx:tt),*) => {
        impl<F, R, T, $($ty,)*> IntoBoundFunction<(Variadic<()>, fn($($ty,)* Vec<T>) -> R)>
            for Variadic<F>
        where
            F: Fn($($ty,)* Vec<T>) -> R + Send + Sync + 'static,
            R: IntoReturns,
            T: DeserializeOwned,
            $($ty: DeserializeOwned,)*
        {
            fn into_bound_function(self) -> BoundFunction {
                let signature = Signature::new(
                    vec![$(type_name::<$ty>(),)* type_name::<T>()],
                    true,
                    R::return_kinds(),
                );
                let function = self.0;
                BoundFunction::from_parts(signature, move |args: &RawArgs| {
                    $(let $arg: $ty = decode_arg($idx, &args[$idx])?;)*
                    let rest = args[$fixed..]
                        .iter()
                        .enumerate()
                        .map(|(i, raw)| decode_arg::<T>($fixed + i, raw))
                        .collect::<Result<Vec<T>, _>>()?;
                    Ok(function($($arg,)* rest).into_returns())
                })
            }
        }
    };
}

variadic_arity!(0;);
variadic_arity!(1; A1 a1 0);
variadic_arity!(2; A1 a1 0, A2 a2 1);
variadic_arity!(3; A1 a1 0, A2 a2 1, A3 a3 2);
variadic_arity!(4; A1 a1 0, A2 a2 1, A3 a3 2, A4 a4 3);
variadic_arity!(5; A1 a1 0, A2 a2 1, A3 a3 2, A4 a4 3, A5 a5 4);
variadic_arity!(6; A1 a1 0, A2 a2 1, A3 a3 2, A4 a4 3, A5 a5 4, A6 a6 5);
variadic_arity!(7; A1 a1 0, A2 a2 1, A3 a3 2, A4 a4 3, A5 a5 4, A6 a6 5, A7 a7 6);
