//! Module containing concept of an Ethereum RPC method.

use crate::{
    jsonrpc::Value,
    normalize::{self, Normalizer},
    shape::{self, Verdict},
};
use serde::{Serialize, Serializer};
use std::borrow::Cow;

/// A trait defining an Ethereum RPC method.
///
/// A method knows how to encode its parameters into the request envelope, and
/// how to shape the `result` of an error-free response.
pub trait Method {
    type Params;

    fn name(&self) -> Cow<'static, str>;

    fn serialize_params<S>(value: &Self::Params, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer;

    /// Rewrites the response `result` in place and decides whether the call
    /// succeeded.
    fn shape(
        params: &Self::Params,
        normalizer: &Normalizer,
        result: &mut Value,
    ) -> Result<Verdict, normalize::Error>;
}

macro_rules! impl_method_for_stringlike {
    ($($str:ty,)*) => {$(
        impl Method for $str {
            type Params = Value;

            fn name(&self) -> Cow<'static, str> {
                Cow::Owned(self.to_string())
            }

            fn serialize_params<S>(value: &Self::Params, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                value.serialize(serializer)
            }

            fn shape(
                params: &Self::Params,
                normalizer: &Normalizer,
                result: &mut Value,
            ) -> Result<Verdict, normalize::Error> {
                shape::passthrough(params, normalizer, result)
            }
        }
    )*};
}

impl_method_for_stringlike! {
    str,
    &'_ str,
    String,
    Cow<'_, str>,
}

#[macro_export]
macro_rules! method {
    (
        $(#[$attr:meta])*
        $pub:vis struct $type:ident as $name:literal $params:ty => $shape:path;
    ) => {
        $crate::method! {
            $(#[$attr])* $pub struct $type as $name
                $params [<$params>] => $shape;
        }
    };

    (
        $(#[$attr:meta])*
        $pub:vis struct $type:ident as $name:literal
            $params:ty [$($paramsas:tt)*] => $shape:path;
    ) => {
        $(#[$attr])*
        #[derive(Clone, Copy, Default)]
        $pub struct $type;

        impl ::std::fmt::Debug for $type {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                f.debug_tuple(stringify!($type))
                    .field(&$name)
                    .finish()
            }
        }

        #[allow(unused_imports)]
        impl $crate::method::Method for $type {
            type Params = $params;

            fn name(&self) -> ::std::borrow::Cow<'static, str> {
                ::std::borrow::Cow::Borrowed($name)
            }

            fn serialize_params<S>(value: &Self::Params, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                use ::serde::Serialize as _;
                $($paramsas)*::serialize(value, serializer)
            }

            fn shape(
                params: &Self::Params,
                normalizer: &$crate::normalize::Normalizer,
                result: &mut $crate::jsonrpc::Value,
            ) -> Result<$crate::shape::Verdict, $crate::normalize::Error> {
                $shape(params, normalizer, result)
            }
        }

        impl ::serde::Serialize for $type {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                use $crate::method::Method as _;
                self.name().serialize(serializer)
            }
        }
    };
}

#[macro_export]
macro_rules! module {
    (
        $(#[$attr:meta])*
        $pub:vis mod $mod:ident {
            $(
                $(#[$ma:meta])*
                $mv:vis struct $mt:ident as $mn:literal
                    $mp:ty $([$($mpp:tt)*])? => $ms:path;
            )*
        }
    ) => {
        $(#[$attr])*
        $pub mod $mod {
            #[allow(unused_imports)]
            use super::*;

            $(
                $crate::method! {
                    $(#[$ma])* $mv struct $mt as $mn
                        $mp $([$($mpp)*])* => $ms;
                }
            )*
        }
    };
}
