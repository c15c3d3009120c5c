use std::{fmt, marker::PhantomData, str::FromStr};

use serde::de;

use crate::Error;

/**
Define a closed enumeration that's written as a lowercase name but also
accepts its integer value.

Names are matched case-insensitively, with or without the given prefix.
*/
macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident ($what:literal, prefix = $prefix:literal) {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $value:literal => $text:literal,
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        #[repr(i32)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                $variant = $value,
            )*
        }

        impl $name {
            pub fn as_i32(self) -> i32 {
                self as i32
            }

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)*
                }
            }
        }

        impl ::std::convert::TryFrom<i64> for $name {
            type Error = $crate::Error;

            fn try_from(value: i64) -> Result<Self, $crate::Error> {
                match value {
                    $($value => Ok($name::$variant),)*
                    _ => Err($crate::Error::msg(format_args!(
                        "`{}` is not a valid {}",
                        value,
                        $what,
                    ))),
                }
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::Error;

            fn from_str(s: &str) -> Result<Self, $crate::Error> {
                let s = s.trim();

                if let Ok(value) = s.parse::<i64>() {
                    return Self::try_from(value);
                }

                let lower = s.to_ascii_lowercase();
                match lower.strip_prefix($prefix).unwrap_or(&lower) {
                    $($text => Ok($name::$variant),)*
                    _ => Err($crate::Error::msg(format_args!(
                        "`{}` is not a valid {}",
                        s,
                        $what,
                    ))),
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserializer.deserialize_any($crate::parse::IntOrName::<$name>::new($what))
            }
        }
    };
}

pub(crate) struct IntOrName<T> {
    what: &'static str,
    _marker: PhantomData<T>,
}

impl<T> IntOrName<T> {
    pub(crate) fn new(what: &'static str) -> Self {
        IntOrName {
            what,
            _marker: PhantomData,
        }
    }
}

impl<'de, T> de::Visitor<'de> for IntOrName<T>
where
    T: TryFrom<i64, Error = Error> + FromStr<Err = Error>,
{
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "an integer or name of a {}", self.what)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<T, E> {
        T::try_from(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<T, E> {
        let v = i64::try_from(v).map_err(E::custom)?;

        self.visit_i64(v)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<T, E> {
        v.parse().map_err(E::custom)
    }
}
