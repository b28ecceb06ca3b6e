use crate::{Error, Result, Value, consume_while, truncate_long};
use anyhow::Context;
use atoi::{FromRadix10Checked, FromRadix10SignedChecked};
use fast_float::parse_partial;
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use std::{any, borrow::Cow, fmt::Display, rc::Rc, sync::Arc};
use time::format_description::parse_borrowed;
use uuid::Uuid;

/// Conversion from the dynamically typed [`Value`] delivered by cursors into
/// native Rust types.
///
/// Every type implementing `AsValue` is also a [`ScanTarget`](crate::ScanTarget):
/// a single column can be assigned to it. This is the conversion a column
/// assignment performs and nothing more, the engine does no other coercion.
///
/// # Implementing `AsValue` for custom types
/// A record that decodes itself from one column implements `AsValue` and
/// marks itself with `#[scanx(decode)]`, it is then classified as scannable.
///
/// # Parsing contract
/// - `parse` delegates to `extract` then verifies the input is exhausted.
/// - `extract` updates the input slice only on success.
///
/// # Examples
/// ```rust
/// use scanx_core::{AsValue, Value};
/// let n: i64 = AsValue::try_from_value(Value::Int32(Some(42))).unwrap();
/// assert_eq!(n, 42);
/// assert!(matches!(i64::as_empty_value(), Value::Int64(None)));
/// ```
pub trait AsValue {
    /// The typed null for this type, also used to describe column types.
    fn as_empty_value() -> Value;
    /// Convert a dynamic [`Value`] into `Self`.
    ///
    /// Accepts the canonical variant, narrower or wider numeric variants when
    /// the content fits, and `Value::Unknown` text through [`AsValue::parse`].
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
    /// Parse the whole input, fails if something is left over.
    fn parse(input: impl AsRef<str>) -> Result<Self>
    where
        Self: Sized,
    {
        let mut value = input.as_ref();
        let result = Self::extract(&mut value)?;
        if !value.is_empty() {
            return Err(Error::msg(format!(
                "Value `{}` parsed correctly as {} but it did not consume all the input (remaining: `{}`)",
                truncate_long!(input.as_ref()),
                any::type_name::<Self>(),
                truncate_long!(value),
            )));
        }
        Ok(result)
    }
    /// Parse a prefix of the input, advancing the slice on success.
    fn extract(value: &mut &str) -> Result<Self>
    where
        Self: Sized,
    {
        Err(Error::msg(format!(
            "Cannot parse `{}` as {}",
            truncate_long!(*value),
            any::type_name::<Self>()
        )))
    }
}

fn narrow<S, T>(value: S, from: &str) -> Result<T>
where
    S: Display + Copy,
    T: TryFrom<S>,
{
    T::try_from(value).map_err(|_| {
        Error::msg(format!(
            "Value {value}: {from} is out of range for {}",
            any::type_name::<T>()
        ))
    })
}

fn split_quote<'s>(value: &mut &'s str) -> &'s str {
    if value.starts_with(['"', '\'']) {
        let quote = &value[..1];
        *value = &value[1..];
        quote
    } else {
        ""
    }
}

macro_rules! impl_as_value_integer {
    ($source:ty, $destination:path, $wide:ty, $radix:ident) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    Value::Int8(Some(v)) => narrow(v, "i8"),
                    Value::Int16(Some(v)) => narrow(v, "i16"),
                    Value::Int32(Some(v)) => narrow(v, "i32"),
                    Value::Int64(Some(v)) => narrow(v, "i64"),
                    Value::Int128(Some(v)) => narrow(v, "i128"),
                    Value::UInt8(Some(v)) => narrow(v, "u8"),
                    Value::UInt16(Some(v)) => narrow(v, "u16"),
                    Value::UInt32(Some(v)) => narrow(v, "u32"),
                    Value::UInt64(Some(v)) => narrow(v, "u64"),
                    Value::UInt128(Some(v)) => narrow(v, "u128"),
                    Value::Decimal(Some(v), ..) => {
                        if !v.is_integer() {
                            return Err(Error::msg(format!(
                                "Value {v}: Decimal is not an integer, cannot convert it to {}",
                                any::type_name::<Self>(),
                            )));
                        }
                        let integer = v.to_i128().ok_or_else(|| {
                            Error::msg(format!("Value {v}: Decimal does not fit into i128"))
                        })?;
                        narrow(integer, "Decimal")
                    }
                    Value::Unknown(Some(ref v)) => <Self as AsValue>::parse(v),
                    _ => Err(Error::msg(format!(
                        "Cannot convert {value:?} to {}",
                        any::type_name::<Self>(),
                    ))),
                }
            }
            fn extract(input: &mut &str) -> Result<Self> {
                let original = *input;
                let mut value = original;
                let quote = split_quote(&mut value);
                let (parsed, len) = <$wide>::$radix(value.as_bytes());
                if len == 0 {
                    return Err(Error::msg(format!(
                        "Cannot extract {} from `{}`",
                        any::type_name::<Self>(),
                        truncate_long!(original),
                    )));
                }
                let Some(parsed) = parsed else {
                    return Err(Error::msg(format!(
                        "Value `{}` is out of range for {}",
                        truncate_long!(original),
                        any::type_name::<Self>(),
                    )));
                };
                let result = narrow(parsed, stringify!($wide))?;
                let Some(rest) = value[len..].strip_prefix(quote) else {
                    return Err(Error::msg(format!(
                        "Unterminated quote while extracting {} from `{}`",
                        any::type_name::<Self>(),
                        truncate_long!(original),
                    )));
                };
                *input = rest;
                Ok(result)
            }
        }
    };
}
impl_as_value_integer!(i8, Value::Int8, i128, from_radix_10_signed_checked);
impl_as_value_integer!(i16, Value::Int16, i128, from_radix_10_signed_checked);
impl_as_value_integer!(i32, Value::Int32, i128, from_radix_10_signed_checked);
impl_as_value_integer!(i64, Value::Int64, i128, from_radix_10_signed_checked);
impl_as_value_integer!(i128, Value::Int128, i128, from_radix_10_signed_checked);
impl_as_value_integer!(isize, Value::Int64, i128, from_radix_10_signed_checked);
impl_as_value_integer!(u8, Value::UInt8, u128, from_radix_10_checked);
impl_as_value_integer!(u16, Value::UInt16, u128, from_radix_10_checked);
impl_as_value_integer!(u32, Value::UInt32, u128, from_radix_10_checked);
impl_as_value_integer!(u64, Value::UInt64, u128, from_radix_10_checked);
impl_as_value_integer!(u128, Value::UInt128, u128, from_radix_10_checked);
impl_as_value_integer!(usize, Value::UInt64, u128, from_radix_10_checked);

impl AsValue for bool {
    fn as_empty_value() -> Value {
        Value::Boolean(None)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Boolean(Some(v)) => Ok(v),
            Value::Int8(Some(v)) => Ok(v != 0),
            Value::Int16(Some(v)) => Ok(v != 0),
            Value::Int32(Some(v)) => Ok(v != 0),
            Value::Int64(Some(v)) => Ok(v != 0),
            Value::Int128(Some(v)) => Ok(v != 0),
            Value::UInt8(Some(v)) => Ok(v != 0),
            Value::UInt16(Some(v)) => Ok(v != 0),
            Value::UInt32(Some(v)) => Ok(v != 0),
            Value::UInt64(Some(v)) => Ok(v != 0),
            Value::UInt128(Some(v)) => Ok(v != 0),
            Value::Unknown(Some(ref v)) => <Self as AsValue>::parse(v),
            _ => Err(Error::msg(format!("Cannot convert {value:?} to bool"))),
        }
    }
    fn extract(input: &mut &str) -> Result<Self> {
        let mut value = *input;
        let word = consume_while(&mut value, |v| v.is_alphanumeric() || *v == '_');
        let result = match word {
            x if x.eq_ignore_ascii_case("true") || x.eq_ignore_ascii_case("t") || x == "1" => true,
            x if x.eq_ignore_ascii_case("false") || x.eq_ignore_ascii_case("f") || x == "0" => {
                false
            }
            _ => {
                return Err(Error::msg(format!(
                    "Cannot parse boolean from `{}`",
                    truncate_long!(*input)
                )));
            }
        };
        *input = value;
        Ok(result)
    }
}

macro_rules! impl_as_value_float {
    ($source:ty, $destination:path $(, $pat_rest:pat => $expr_rest:expr)* $(,)?) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    $destination(Some(v)) => Ok(v),
                    $($pat_rest => $expr_rest,)*
                    Value::Int8(Some(v)) => Ok(v as _),
                    Value::Int16(Some(v)) => Ok(v as _),
                    Value::UInt8(Some(v)) => Ok(v as _),
                    Value::UInt16(Some(v)) => Ok(v as _),
                    Value::Decimal(Some(v), ..) => v.to_f64().map(|v| v as _).ok_or_else(|| {
                        Error::msg(format!(
                            "Value {v}: Decimal cannot be represented as {}",
                            any::type_name::<Self>()
                        ))
                    }),
                    Value::Unknown(Some(ref v)) => <Self as AsValue>::parse(v),
                    _ => Err(Error::msg(format!(
                        "Cannot convert {value:?} to {}",
                        any::type_name::<Self>(),
                    ))),
                }
            }
            fn extract(input: &mut &str) -> Result<Self> {
                let original = *input;
                let mut value = original;
                let quote = split_quote(&mut value);
                let context = || {
                    format!(
                        "Cannot extract a floating point value from `{}`",
                        truncate_long!(original)
                    )
                };
                let (num, len) = parse_partial::<$source, _>(value).with_context(context)?;
                let Some(rest) = value[len..].strip_prefix(quote) else {
                    return Err(Error::msg(context()));
                };
                *input = rest;
                Ok(num)
            }
        }
    };
}
impl_as_value_float!(
    f32,
    Value::Float32,
    Value::Float64(Some(v)) => Ok(v as _),
);
impl_as_value_float!(
    f64,
    Value::Float64,
    Value::Float32(Some(v)) => Ok(v as _),
    Value::Int32(Some(v)) => Ok(v as _),
    Value::UInt32(Some(v)) => Ok(v as _),
);

impl AsValue for char {
    fn as_empty_value() -> Value {
        Value::Char(None)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Char(Some(v)) => Ok(v),
            Value::Varchar(Some(ref v)) | Value::Unknown(Some(ref v)) => {
                let mut chars = v.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(c),
                    _ => Err(Error::msg(format!(
                        "Cannot convert {value:?} into a char, it must contain exactly one character"
                    ))),
                }
            }
            _ => Err(Error::msg(format!("Cannot convert {value:?} to char"))),
        }
    }
}

impl AsValue for String {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Varchar(Some(v)) => Ok(v),
            Value::Char(Some(v)) => Ok(v.into()),
            Value::Unknown(Some(v)) => Ok(v),
            _ => Err(Error::msg(format!("Cannot convert {value:?} to String"))),
        }
    }
    fn extract(input: &mut &str) -> Result<Self> {
        let original = *input;
        let mut value = original;
        let Some(delimiter) = split_quote(&mut value).chars().next() else {
            let result = consume_while(&mut value, |c| !c.is_whitespace() && *c != ',');
            *input = value;
            return Ok(result.into());
        };
        let mut result = String::with_capacity(value.len());
        let mut chars = value.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            if c == delimiter {
                // A doubled delimiter stands for the delimiter itself
                if chars.peek().is_some_and(|(_, next)| *next == delimiter) {
                    result.push(c);
                    chars.next();
                    continue;
                }
                *input = &value[i + c.len_utf8()..];
                return Ok(result);
            }
            result.push(c);
        }
        Err(Error::msg(format!(
            "Unterminated string `{}`",
            truncate_long!(original)
        )))
    }
}

impl<'a> AsValue for Cow<'a, str> {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        String::try_from_value(value).map(Into::into)
    }
    fn extract(input: &mut &str) -> Result<Self> {
        <String as AsValue>::extract(input).map(Into::into)
    }
}

impl AsValue for Box<[u8]> {
    fn as_empty_value() -> Value {
        Value::Blob(None)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(Some(v)) => Ok(v),
            Value::Varchar(Some(v)) => Ok(v.into_bytes().into()),
            _ => Err(Error::msg(format!("Cannot convert {value:?} to a blob"))),
        }
    }
}

impl AsValue for Decimal {
    fn as_empty_value() -> Value {
        Value::Decimal(None, 0, 0)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        let error = || Error::msg(format!("Cannot convert {value:?} to Decimal"));
        match value {
            Value::Decimal(Some(v), ..) => Ok(v),
            Value::Int8(Some(v)) => Ok(v.into()),
            Value::Int16(Some(v)) => Ok(v.into()),
            Value::Int32(Some(v)) => Ok(v.into()),
            Value::Int64(Some(v)) => Ok(v.into()),
            Value::Int128(Some(v)) => Decimal::from_i128(v).ok_or_else(error),
            Value::UInt8(Some(v)) => Ok(v.into()),
            Value::UInt16(Some(v)) => Ok(v.into()),
            Value::UInt32(Some(v)) => Ok(v.into()),
            Value::UInt64(Some(v)) => Ok(v.into()),
            Value::UInt128(Some(v)) => Decimal::from_u128(v).ok_or_else(error),
            Value::Float32(Some(v)) => Decimal::from_f32(v).ok_or_else(error),
            Value::Float64(Some(v)) => Decimal::from_f64(v).ok_or_else(error),
            Value::Unknown(Some(ref v)) => <Self as AsValue>::parse(v),
            _ => Err(error()),
        }
    }
    fn extract(input: &mut &str) -> Result<Self> {
        let original = *input;
        let mut value = original;
        let error = || Error::msg(format!("Cannot extract Decimal from `{}`", truncate_long!(original)));
        let (integer, len) = i128::from_radix_10_signed_checked(value.as_bytes());
        let integer = integer.filter(|_| len > 0).ok_or_else(error)?;
        value = &value[len..];
        let result = if let Some(rest) = value.strip_prefix('.') {
            let (fraction, len) = u128::from_radix_10_checked(rest.as_bytes());
            let fraction = fraction.ok_or_else(error)? as i128;
            value = &rest[len..];
            let scale = 10i128.checked_pow(len as _).ok_or_else(error)?;
            let signum = if original.trim_start().starts_with('-') { -1 } else { 1 };
            let mantissa = integer
                .checked_mul(scale)
                .and_then(|v| v.checked_add(signum * fraction))
                .ok_or_else(error)?;
            Decimal::try_from_i128_with_scale(mantissa, len as _).map_err(|_| error())?
        } else {
            Decimal::from_i128(integer).ok_or_else(error)?
        };
        *input = value;
        Ok(result)
    }
}

impl AsValue for Uuid {
    fn as_empty_value() -> Value {
        Value::Uuid(None)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Uuid(Some(v)) => Ok(v),
            Value::Varchar(Some(ref v)) | Value::Unknown(Some(ref v)) => {
                <Self as AsValue>::parse(v)
            }
            _ => Err(Error::msg(format!("Cannot convert {value:?} to Uuid"))),
        }
    }
    fn extract(input: &mut &str) -> Result<Self> {
        let original = *input;
        let mut value = original;
        let quote = split_quote(&mut value);
        let context = || format!("Cannot extract a uuid value from `{}`", truncate_long!(original));
        let text = value.get(..36).ok_or_else(|| Error::msg(context()))?;
        let uuid = Uuid::parse_str(text).with_context(context)?;
        let Some(rest) = value[36..].strip_prefix(quote) else {
            return Err(Error::msg(context()));
        };
        *input = rest;
        Ok(uuid)
    }
}

macro_rules! parse_time {
    ($value:ident, $($formats:literal),+ $(,)?) => {
        'value: {
            for format in [$($formats,)+] {
                let format = parse_borrowed::<2>(format)?;
                let mut parsed = time::parsing::Parsed::new();
                if let Ok(remaining) = parsed.parse_items($value.as_bytes(), &format) {
                    let result = parsed.try_into()?;
                    *$value = &$value[($value.len() - remaining.len())..];
                    break 'value Ok(result);
                }
            }
            Err(Error::msg(format!(
                "Cannot extract from `{}` as {}",
                truncate_long!(*$value),
                any::type_name::<Self>()
            )))
        }
    };
}

macro_rules! impl_as_value_time {
    ($source:ty, $destination:path, $($formats:literal),+ $(,)?) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    $destination(Some(v)) => Ok(v),
                    Value::Varchar(Some(ref v)) | Value::Unknown(Some(ref v)) => {
                        <Self as AsValue>::parse(v)
                    }
                    _ => Err(Error::msg(format!(
                        "Cannot convert {value:?} to {}",
                        any::type_name::<Self>(),
                    ))),
                }
            }
            fn extract(input: &mut &str) -> Result<Self> {
                parse_time!(input, $($formats),+)
            }
        }
    };
}
impl_as_value_time!(time::Date, Value::Date, "[year]-[month]-[day]");
impl_as_value_time!(
    time::Time,
    Value::Time,
    "[hour]:[minute]:[second].[subsecond]",
    "[hour]:[minute]:[second]",
    "[hour]:[minute]",
);
impl_as_value_time!(
    time::PrimitiveDateTime,
    Value::Timestamp,
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]",
    "[year]-[month]-[day]T[hour]:[minute]:[second]",
    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]",
    "[year]-[month]-[day] [hour]:[minute]:[second]",
);
impl_as_value_time!(
    time::OffsetDateTime,
    Value::TimestampWithTimezone,
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond][offset_hour sign:mandatory]:[offset_minute]",
    "[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]",
    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond][offset_hour sign:mandatory]:[offset_minute]",
    "[year]-[month]-[day] [hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]",
);

impl<T: AsValue> AsValue for Vec<T> {
    fn as_empty_value() -> Value {
        Value::List(None, Box::new(T::as_empty_value()))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::List(Some(v), ..) => v.into_iter().map(T::try_from_value).collect(),
            Value::List(None, ..) => Ok(Vec::new()),
            _ => Err(Error::msg(format!(
                "Cannot convert {value:?} to {}",
                any::type_name::<Self>(),
            ))),
        }
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Ok(if value.is_null() {
            None
        } else {
            Some(T::try_from_value(value)?)
        })
    }
    fn extract(input: &mut &str) -> Result<Self> {
        let mut value = *input;
        let word = consume_while(&mut value, |v| v.is_alphanumeric() || *v == '_');
        if word.eq_ignore_ascii_case("null") {
            *input = value;
            return Ok(None);
        };
        T::extract(input).map(Some)
    }
}

impl<T: AsValue> AsValue for Box<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn try_from_value(value: Value) -> Result<Self> {
        T::try_from_value(value).map(Box::new)
    }
    fn extract(value: &mut &str) -> Result<Self> {
        T::extract(value).map(Box::new)
    }
}

macro_rules! impl_as_value_shared {
    ($source:ident) => {
        impl<T: AsValue> AsValue for $source<T> {
            fn as_empty_value() -> Value {
                T::as_empty_value()
            }
            fn try_from_value(value: Value) -> Result<Self> {
                T::try_from_value(value).map($source::new)
            }
            fn extract(value: &mut &str) -> Result<Self> {
                T::extract(value).map($source::new)
            }
        }
    };
}
impl_as_value_shared!(Arc);
impl_as_value_shared!(Rc);
