// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! [`ScalarValue`]: a single typed value, the unit rows are made of

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, BinaryArray, BooleanArray, Date32Array, Decimal128Array,
    Float32Array, Float64Array, Int16Array, Int32Array, Int64Array, Int8Array,
    LargeStringArray, NullArray, StringArray, TimestampMicrosecondArray,
    TimestampMillisecondArray, UInt16Array, UInt32Array, UInt64Array, UInt8Array,
};
use arrow::compute::cast;
use arrow::datatypes::{DataType, TimeUnit};

use crate::error::{Result, StreamWinError};
use crate::null_equality::NullEquality;
use crate::{downcast_value, internal_err, not_impl_err};

/// A dynamically typed, nullable single value.
///
/// Every variant carries its own type tag, so a NULL still knows which
/// column type it came from. Two values are only ever equal when their tags
/// match: there is no implicit coercion between, say, `Int32` and `Int64`.
///
/// Floating point values are compared by their total order, so `NaN` equals
/// `NaN` and `-0.0` is distinct from `0.0`.
#[derive(Clone, Debug)]
pub enum ScalarValue {
    /// represents `DataType::Null`
    Null,
    /// true or false value
    Boolean(Option<bool>),
    /// 32bit float
    Float32(Option<f32>),
    /// 64bit float
    Float64(Option<f64>),
    /// 128bit decimal, using the i128 to represent the decimal, precision scale
    Decimal128(Option<i128>, u8, i8),
    /// signed 8bit int
    Int8(Option<i8>),
    /// signed 16bit int
    Int16(Option<i16>),
    /// signed 32bit int
    Int32(Option<i32>),
    /// signed 64bit int
    Int64(Option<i64>),
    /// unsigned 8bit int
    UInt8(Option<u8>),
    /// unsigned 16bit int
    UInt16(Option<u16>),
    /// unsigned 32bit int
    UInt32(Option<u32>),
    /// unsigned 64bit int
    UInt64(Option<u64>),
    /// utf-8 encoded string.
    Utf8(Option<String>),
    /// utf-8 encoded string representing a LargeString's arrow type.
    LargeUtf8(Option<String>),
    /// binary
    Binary(Option<Vec<u8>>),
    /// Date stored as a signed 32bit int days since UNIX epoch 1970-01-01
    Date32(Option<i32>),
    /// Timestamp Milliseconds
    TimestampMillisecond(Option<i64>, Option<Arc<str>>),
    /// Timestamp Microseconds
    TimestampMicrosecond(Option<i64>, Option<Arc<str>>),
}

macro_rules! typed_cast {
    ($array:expr, $index:expr, $ARRAYTYPE:ident, $SCALAR:ident) => {{
        let array = downcast_value!($array, $ARRAYTYPE);
        ScalarValue::$SCALAR(match array.is_null($index) {
            true => None,
            #[allow(clippy::useless_conversion)]
            false => Some(array.value($index).into()),
        })
    }};
}

macro_rules! build_array_from_option {
    ($scalars:expr, $data_type:expr, $SCALAR:ident, $ARRAYTYPE:ident) => {{
        $scalars
            .into_iter()
            .map(|sv| match sv {
                ScalarValue::$SCALAR(v) => Ok(v),
                ScalarValue::Null => Ok(None),
                sv => internal_err!(
                    "Inconsistent types in ScalarValue::iter_to_array. \
                     Expected {}, got {:?}",
                    $data_type,
                    sv
                ),
            })
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .collect::<$ARRAYTYPE>()
    }};
}

/// Compares two optional payloads of the same type tag
fn option_eq<T>(
    left: &Option<T>,
    right: &Option<T>,
    null_equality: NullEquality,
    eq: impl Fn(&T, &T) -> bool,
) -> bool {
    match (left, right) {
        (Some(l), Some(r)) => eq(l, r),
        (None, None) => null_equality == NullEquality::NullEqualsNull,
        _ => false,
    }
}

/// Orders two optional payloads of the same type tag, NULLs first
fn option_cmp<T>(
    left: &Option<T>,
    right: &Option<T>,
    cmp: impl Fn(&T, &T) -> Ordering,
) -> Ordering {
    match (left, right) {
        (Some(l), Some(r)) => cmp(l, r),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
    }
}

impl ScalarValue {
    /// Getter for the `DataType` of the value
    pub fn data_type(&self) -> DataType {
        match self {
            ScalarValue::Null => DataType::Null,
            ScalarValue::Boolean(_) => DataType::Boolean,
            ScalarValue::Float32(_) => DataType::Float32,
            ScalarValue::Float64(_) => DataType::Float64,
            ScalarValue::Decimal128(_, precision, scale) => {
                DataType::Decimal128(*precision, *scale)
            }
            ScalarValue::Int8(_) => DataType::Int8,
            ScalarValue::Int16(_) => DataType::Int16,
            ScalarValue::Int32(_) => DataType::Int32,
            ScalarValue::Int64(_) => DataType::Int64,
            ScalarValue::UInt8(_) => DataType::UInt8,
            ScalarValue::UInt16(_) => DataType::UInt16,
            ScalarValue::UInt32(_) => DataType::UInt32,
            ScalarValue::UInt64(_) => DataType::UInt64,
            ScalarValue::Utf8(_) => DataType::Utf8,
            ScalarValue::LargeUtf8(_) => DataType::LargeUtf8,
            ScalarValue::Binary(_) => DataType::Binary,
            ScalarValue::Date32(_) => DataType::Date32,
            ScalarValue::TimestampMillisecond(_, tz) => {
                DataType::Timestamp(TimeUnit::Millisecond, tz.clone())
            }
            ScalarValue::TimestampMicrosecond(_, tz) => {
                DataType::Timestamp(TimeUnit::Microsecond, tz.clone())
            }
        }
    }

    /// whether this value is null or not.
    pub fn is_null(&self) -> bool {
        match self {
            ScalarValue::Null => true,
            ScalarValue::Boolean(v) => v.is_none(),
            ScalarValue::Float32(v) => v.is_none(),
            ScalarValue::Float64(v) => v.is_none(),
            ScalarValue::Decimal128(v, _, _) => v.is_none(),
            ScalarValue::Int8(v) => v.is_none(),
            ScalarValue::Int16(v) => v.is_none(),
            ScalarValue::Int32(v) => v.is_none(),
            ScalarValue::Int64(v) => v.is_none(),
            ScalarValue::UInt8(v) => v.is_none(),
            ScalarValue::UInt16(v) => v.is_none(),
            ScalarValue::UInt32(v) => v.is_none(),
            ScalarValue::UInt64(v) => v.is_none(),
            ScalarValue::Utf8(v) | ScalarValue::LargeUtf8(v) => v.is_none(),
            ScalarValue::Binary(v) => v.is_none(),
            ScalarValue::Date32(v) => v.is_none(),
            ScalarValue::TimestampMillisecond(v, _)
            | ScalarValue::TimestampMicrosecond(v, _) => v.is_none(),
        }
    }

    /// Equality on the pair of type tags.
    ///
    /// Values with different tags are never equal. Decimals must also agree on
    /// precision and scale, timestamps on their timezone. Whether two NULLs of
    /// the same type are equal is decided by `null_equality`.
    pub fn eq_with_nulls(&self, other: &Self, null_equality: NullEquality) -> bool {
        use ScalarValue::*;
        let n = null_equality;
        match (self, other) {
            (Null, Null) => n == NullEquality::NullEqualsNull,
            (Boolean(l), Boolean(r)) => option_eq(l, r, n, |l, r| l == r),
            (Float32(l), Float32(r)) => option_eq(l, r, n, |l, r| l.total_cmp(r).is_eq()),
            (Float64(l), Float64(r)) => option_eq(l, r, n, |l, r| l.total_cmp(r).is_eq()),
            (Decimal128(l, lp, ls), Decimal128(r, rp, rs)) => {
                lp == rp && ls == rs && option_eq(l, r, n, |l, r| l == r)
            }
            (Int8(l), Int8(r)) => option_eq(l, r, n, |l, r| l == r),
            (Int16(l), Int16(r)) => option_eq(l, r, n, |l, r| l == r),
            (Int32(l), Int32(r)) => option_eq(l, r, n, |l, r| l == r),
            (Int64(l), Int64(r)) => option_eq(l, r, n, |l, r| l == r),
            (UInt8(l), UInt8(r)) => option_eq(l, r, n, |l, r| l == r),
            (UInt16(l), UInt16(r)) => option_eq(l, r, n, |l, r| l == r),
            (UInt32(l), UInt32(r)) => option_eq(l, r, n, |l, r| l == r),
            (UInt64(l), UInt64(r)) => option_eq(l, r, n, |l, r| l == r),
            (Utf8(l), Utf8(r)) => option_eq(l, r, n, |l, r| l == r),
            (LargeUtf8(l), LargeUtf8(r)) => option_eq(l, r, n, |l, r| l == r),
            (Binary(l), Binary(r)) => option_eq(l, r, n, |l, r| l == r),
            (Date32(l), Date32(r)) => option_eq(l, r, n, |l, r| l == r),
            (TimestampMillisecond(l, ltz), TimestampMillisecond(r, rtz))
            | (TimestampMicrosecond(l, ltz), TimestampMicrosecond(r, rtz)) => {
                ltz == rtz && option_eq(l, r, n, |l, r| l == r)
            }
            _ => false,
        }
    }

    /// Converts a value in `array` at `index` into a ScalarValue.
    ///
    /// Dictionary encoded arrays produce a value of their value type.
    pub fn try_from_array(array: &dyn Array, index: usize) -> Result<Self> {
        if index >= array.len() {
            return internal_err!(
                "Index {index} out of bounds for array of length {}",
                array.len()
            );
        }

        Ok(match array.data_type() {
            DataType::Null => ScalarValue::Null,
            DataType::Boolean => typed_cast!(array, index, BooleanArray, Boolean),
            DataType::Float32 => typed_cast!(array, index, Float32Array, Float32),
            DataType::Float64 => typed_cast!(array, index, Float64Array, Float64),
            DataType::Decimal128(precision, scale) => {
                let array = downcast_value!(array, Decimal128Array);
                let value = array.is_valid(index).then(|| array.value(index));
                ScalarValue::Decimal128(value, *precision, *scale)
            }
            DataType::Int8 => typed_cast!(array, index, Int8Array, Int8),
            DataType::Int16 => typed_cast!(array, index, Int16Array, Int16),
            DataType::Int32 => typed_cast!(array, index, Int32Array, Int32),
            DataType::Int64 => typed_cast!(array, index, Int64Array, Int64),
            DataType::UInt8 => typed_cast!(array, index, UInt8Array, UInt8),
            DataType::UInt16 => typed_cast!(array, index, UInt16Array, UInt16),
            DataType::UInt32 => typed_cast!(array, index, UInt32Array, UInt32),
            DataType::UInt64 => typed_cast!(array, index, UInt64Array, UInt64),
            DataType::Utf8 => typed_cast!(array, index, StringArray, Utf8),
            DataType::LargeUtf8 => typed_cast!(array, index, LargeStringArray, LargeUtf8),
            DataType::Binary => typed_cast!(array, index, BinaryArray, Binary),
            DataType::Date32 => typed_cast!(array, index, Date32Array, Date32),
            DataType::Timestamp(TimeUnit::Millisecond, tz) => {
                let array = downcast_value!(array, TimestampMillisecondArray);
                let value = array.is_valid(index).then(|| array.value(index));
                ScalarValue::TimestampMillisecond(value, tz.clone())
            }
            DataType::Timestamp(TimeUnit::Microsecond, tz) => {
                let array = downcast_value!(array, TimestampMicrosecondArray);
                let value = array.is_valid(index).then(|| array.value(index));
                ScalarValue::TimestampMicrosecond(value, tz.clone())
            }
            DataType::Dictionary(_, value_type) => {
                let unpacked = cast(&array.slice(index, 1), value_type)?;
                Self::try_from_array(unpacked.as_ref(), 0)?
            }
            other => {
                return not_impl_err!(
                    "Can't create a scalar from array of type \"{other}\""
                );
            }
        })
    }

    /// Converts an iterator of scalars into an array of `data_type`.
    ///
    /// Every scalar must carry `data_type`'s tag (untyped `Null`s are
    /// accepted as nulls). A dictionary `data_type` is built from its value
    /// type and then encoded.
    pub fn iter_to_array(
        scalars: impl IntoIterator<Item = ScalarValue>,
        data_type: &DataType,
    ) -> Result<ArrayRef> {
        let array: ArrayRef = match data_type {
            DataType::Null => {
                let len = scalars
                    .into_iter()
                    .map(|sv| match sv {
                        ScalarValue::Null => Ok(()),
                        sv => internal_err!(
                            "Inconsistent types in ScalarValue::iter_to_array. \
                             Expected Null, got {sv:?}"
                        ),
                    })
                    .collect::<Result<Vec<_>>>()?
                    .len();
                Arc::new(NullArray::new(len))
            }
            DataType::Boolean => {
                Arc::new(build_array_from_option!(scalars, data_type, Boolean, BooleanArray))
            }
            DataType::Float32 => {
                Arc::new(build_array_from_option!(scalars, data_type, Float32, Float32Array))
            }
            DataType::Float64 => {
                Arc::new(build_array_from_option!(scalars, data_type, Float64, Float64Array))
            }
            DataType::Decimal128(precision, scale) => {
                let values = scalars
                    .into_iter()
                    .map(|sv| match sv {
                        ScalarValue::Decimal128(v, p, s) if p == *precision && s == *scale => {
                            Ok(v)
                        }
                        ScalarValue::Null => Ok(None),
                        sv => internal_err!(
                            "Inconsistent types in ScalarValue::iter_to_array. \
                             Expected {data_type}, got {sv:?}"
                        ),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Arc::new(
                    Decimal128Array::from(values)
                        .with_precision_and_scale(*precision, *scale)?,
                )
            }
            DataType::Int8 => {
                Arc::new(build_array_from_option!(scalars, data_type, Int8, Int8Array))
            }
            DataType::Int16 => {
                Arc::new(build_array_from_option!(scalars, data_type, Int16, Int16Array))
            }
            DataType::Int32 => {
                Arc::new(build_array_from_option!(scalars, data_type, Int32, Int32Array))
            }
            DataType::Int64 => {
                Arc::new(build_array_from_option!(scalars, data_type, Int64, Int64Array))
            }
            DataType::UInt8 => {
                Arc::new(build_array_from_option!(scalars, data_type, UInt8, UInt8Array))
            }
            DataType::UInt16 => {
                Arc::new(build_array_from_option!(scalars, data_type, UInt16, UInt16Array))
            }
            DataType::UInt32 => {
                Arc::new(build_array_from_option!(scalars, data_type, UInt32, UInt32Array))
            }
            DataType::UInt64 => {
                Arc::new(build_array_from_option!(scalars, data_type, UInt64, UInt64Array))
            }
            DataType::Utf8 => {
                Arc::new(build_array_from_option!(scalars, data_type, Utf8, StringArray))
            }
            DataType::LargeUtf8 => Arc::new(build_array_from_option!(
                scalars,
                data_type,
                LargeUtf8,
                LargeStringArray
            )),
            DataType::Binary => {
                Arc::new(build_array_from_option!(scalars, data_type, Binary, BinaryArray))
            }
            DataType::Date32 => {
                Arc::new(build_array_from_option!(scalars, data_type, Date32, Date32Array))
            }
            DataType::Timestamp(unit, tz) => {
                let values = scalars
                    .into_iter()
                    .map(|sv| match (unit, sv) {
                        (TimeUnit::Millisecond, ScalarValue::TimestampMillisecond(v, t))
                        | (TimeUnit::Microsecond, ScalarValue::TimestampMicrosecond(v, t))
                            if &t == tz =>
                        {
                            Ok(v)
                        }
                        (_, ScalarValue::Null) => Ok(None),
                        (_, sv) => internal_err!(
                            "Inconsistent types in ScalarValue::iter_to_array. \
                             Expected {data_type}, got {sv:?}"
                        ),
                    })
                    .collect::<Result<Vec<_>>>()?;
                match unit {
                    TimeUnit::Millisecond => Arc::new(
                        TimestampMillisecondArray::from(values).with_timezone_opt(tz.clone()),
                    ),
                    TimeUnit::Microsecond => Arc::new(
                        TimestampMicrosecondArray::from(values).with_timezone_opt(tz.clone()),
                    ),
                    _ => {
                        return not_impl_err!(
                            "Can't create an array of type \"{data_type}\""
                        );
                    }
                }
            }
            DataType::Dictionary(_, value_type) => {
                let values = Self::iter_to_array(scalars, value_type)?;
                cast(&values, data_type)?
            }
            other => {
                return not_impl_err!("Can't create an array of type \"{other}\"");
            }
        };
        Ok(array)
    }
}

impl PartialEq for ScalarValue {
    /// NULLs of the same type compare equal, matching [`Eq`]
    fn eq(&self, other: &Self) -> bool {
        self.eq_with_nulls(other, NullEquality::NullEqualsNull)
    }
}

impl Eq for ScalarValue {}

impl PartialOrd for ScalarValue {
    /// Orders values of the same type, NULLs first. Values of different
    /// types (or decimals of different precision and scale, timestamps of
    /// different timezones) are not comparable.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        use ScalarValue::*;
        Some(match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Boolean(l), Boolean(r)) => option_cmp(l, r, Ord::cmp),
            (Float32(l), Float32(r)) => option_cmp(l, r, f32::total_cmp),
            (Float64(l), Float64(r)) => option_cmp(l, r, f64::total_cmp),
            (Decimal128(l, lp, ls), Decimal128(r, rp, rs)) if lp == rp && ls == rs => {
                option_cmp(l, r, Ord::cmp)
            }
            (Int8(l), Int8(r)) => option_cmp(l, r, Ord::cmp),
            (Int16(l), Int16(r)) => option_cmp(l, r, Ord::cmp),
            (Int32(l), Int32(r)) => option_cmp(l, r, Ord::cmp),
            (Int64(l), Int64(r)) => option_cmp(l, r, Ord::cmp),
            (UInt8(l), UInt8(r)) => option_cmp(l, r, Ord::cmp),
            (UInt16(l), UInt16(r)) => option_cmp(l, r, Ord::cmp),
            (UInt32(l), UInt32(r)) => option_cmp(l, r, Ord::cmp),
            (UInt64(l), UInt64(r)) => option_cmp(l, r, Ord::cmp),
            (Utf8(l), Utf8(r)) => option_cmp(l, r, Ord::cmp),
            (LargeUtf8(l), LargeUtf8(r)) => option_cmp(l, r, Ord::cmp),
            (Binary(l), Binary(r)) => option_cmp(l, r, Ord::cmp),
            (Date32(l), Date32(r)) => option_cmp(l, r, Ord::cmp),
            (TimestampMillisecond(l, ltz), TimestampMillisecond(r, rtz))
            | (TimestampMicrosecond(l, ltz), TimestampMicrosecond(r, rtz))
                if ltz == rtz =>
            {
                option_cmp(l, r, Ord::cmp)
            }
            _ => return None,
        })
    }
}

impl TryFrom<&DataType> for ScalarValue {
    type Error = StreamWinError;

    /// Create a typed NULL of `data_type`; fails for types that have no
    /// scalar representation
    fn try_from(data_type: &DataType) -> Result<Self> {
        Ok(match data_type {
            DataType::Null => ScalarValue::Null,
            DataType::Boolean => ScalarValue::Boolean(None),
            DataType::Float32 => ScalarValue::Float32(None),
            DataType::Float64 => ScalarValue::Float64(None),
            DataType::Decimal128(precision, scale) => {
                ScalarValue::Decimal128(None, *precision, *scale)
            }
            DataType::Int8 => ScalarValue::Int8(None),
            DataType::Int16 => ScalarValue::Int16(None),
            DataType::Int32 => ScalarValue::Int32(None),
            DataType::Int64 => ScalarValue::Int64(None),
            DataType::UInt8 => ScalarValue::UInt8(None),
            DataType::UInt16 => ScalarValue::UInt16(None),
            DataType::UInt32 => ScalarValue::UInt32(None),
            DataType::UInt64 => ScalarValue::UInt64(None),
            DataType::Utf8 => ScalarValue::Utf8(None),
            DataType::LargeUtf8 => ScalarValue::LargeUtf8(None),
            DataType::Binary => ScalarValue::Binary(None),
            DataType::Date32 => ScalarValue::Date32(None),
            DataType::Timestamp(TimeUnit::Millisecond, tz) => {
                ScalarValue::TimestampMillisecond(None, tz.clone())
            }
            DataType::Timestamp(TimeUnit::Microsecond, tz) => {
                ScalarValue::TimestampMicrosecond(None, tz.clone())
            }
            DataType::Dictionary(_, value_type) => value_type.as_ref().try_into()?,
            _ => {
                return not_impl_err!(
                    "Can't create a scalar from data_type \"{data_type}\""
                );
            }
        })
    }
}

/// Renders an unscaled decimal integer with `scale` fractional digits
fn format_decimal(value: i128, scale: i8) -> String {
    if scale <= 0 {
        return format!("{value}{}", "0".repeat(scale.unsigned_abs() as usize));
    }
    let scale = scale as usize;
    let digits = format!("{:0>width$}", value.unsigned_abs(), width = scale + 1);
    let (int_part, frac_part) = digits.split_at(digits.len() - scale);
    let sign = if value < 0 { "-" } else { "" };
    format!("{sign}{int_part}.{frac_part}")
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        macro_rules! format_option {
            ($F:expr, $EXPR:expr) => {{
                match $EXPR {
                    Some(e) => write!($F, "{e}"),
                    None => write!($F, "NULL"),
                }
            }};
        }

        match self {
            ScalarValue::Decimal128(v, _, s) => {
                format_option!(f, v.map(|v| format_decimal(v, *s)))?
            }
            ScalarValue::Boolean(e) => format_option!(f, e)?,
            ScalarValue::Float32(e) => format_option!(f, e)?,
            ScalarValue::Float64(e) => format_option!(f, e)?,
            ScalarValue::Int8(e) => format_option!(f, e)?,
            ScalarValue::Int16(e) => format_option!(f, e)?,
            ScalarValue::Int32(e) => format_option!(f, e)?,
            ScalarValue::Int64(e) => format_option!(f, e)?,
            ScalarValue::UInt8(e) => format_option!(f, e)?,
            ScalarValue::UInt16(e) => format_option!(f, e)?,
            ScalarValue::UInt32(e) => format_option!(f, e)?,
            ScalarValue::UInt64(e) => format_option!(f, e)?,
            ScalarValue::Utf8(e) | ScalarValue::LargeUtf8(e) => format_option!(f, e)?,
            ScalarValue::Binary(e) => match e {
                Some(bytes) => {
                    for byte in bytes {
                        write!(f, "{byte:02x}")?;
                    }
                }
                None => write!(f, "NULL")?,
            },
            ScalarValue::Date32(e) => format_option!(f, e)?,
            ScalarValue::TimestampMillisecond(e, _)
            | ScalarValue::TimestampMicrosecond(e, _) => format_option!(f, e)?,
            ScalarValue::Null => write!(f, "NULL")?,
        };
        Ok(())
    }
}
