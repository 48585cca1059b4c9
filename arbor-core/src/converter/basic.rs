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

use super::{expect_source, SingleValueConverter};
use crate::error::Error;
use crate::types::{Object, TypeDescriptor};
use std::any::Any;
use std::fmt::Display;
use std::marker::PhantomData;
use std::str::FromStr;

/// Decodes an integer literal the way XML documents in the wild spell them.
///
/// Accepts an optional sign followed by a decimal number, a hexadecimal number
/// prefixed with `0x`, `0X` or `#`, or an octal number with a leading `0`.
///
/// ```rust
/// use arbor_core::converter::decode_i64;
///
/// assert_eq!(decode_i64("42").unwrap(), 42);
/// assert_eq!(decode_i64("-0x1F").unwrap(), -31);
/// assert_eq!(decode_i64("#ff").unwrap(), 255);
/// assert_eq!(decode_i64("017").unwrap(), 15);
/// assert!(decode_i64("0x").is_err());
/// ```
pub fn decode_i64(text: &str) -> Result<i64, Error> {
    let invalid = || Error::invalid_data(format!("Cannot decode '{}' as an integer", text));
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        Some(_) => (false, text),
        None => return Err(invalid()),
    };
    let (radix, digits) = if let Some(d) = rest
        .strip_prefix("0x")
        .or_else(|| rest.strip_prefix("0X"))
        .or_else(|| rest.strip_prefix('#'))
    {
        (16, d)
    } else if rest.len() > 1 && rest.starts_with('0') {
        (8, &rest[1..])
    } else {
        (10, rest)
    };
    if digits.is_empty() || digits.starts_with('+') || digits.starts_with('-') {
        return Err(invalid());
    }
    let magnitude = u64::from_str_radix(digits, radix).map_err(|_| invalid())?;
    if negative {
        if magnitude > i64::MAX as u64 + 1 {
            return Err(invalid());
        }
        Ok((magnitude as i64).wrapping_neg())
    } else {
        if magnitude > i64::MAX as u64 {
            return Err(invalid());
        }
        Ok(magnitude as i64)
    }
}

/// `i32` converter that reads decimal, hex and octal literals.
///
/// Values up to `0xFFFFFFFF` are accepted and wrap into the negative range,
/// so documents holding an unsigned 32-bit spelling still read back.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntConverter;

impl IntConverter {
    pub fn parse(&self, text: &str) -> Result<i32, Error> {
        let value = decode_i64(text)?;
        if value < i32::MIN as i64 || value > 0xFFFF_FFFF {
            return Err(Error::invalid_data(format!(
                "Value {} is out of range for a 32-bit integer",
                text
            )));
        }
        Ok(value as i32)
    }
}

impl SingleValueConverter for IntConverter {
    fn can_convert(&self, ty: &TypeDescriptor) -> bool {
        ty.is::<i32>()
    }

    fn to_text(&self, source: &dyn Object) -> Result<String, Error> {
        Ok(expect_source::<i32>(source)?.to_string())
    }

    fn from_text(&self, text: &str) -> Result<Box<dyn Any>, Error> {
        Ok(Box::new(self.parse(text)?))
    }
}

/// `i64` converter that reads decimal, hex and octal literals.
#[derive(Clone, Copy, Debug, Default)]
pub struct LongConverter;

impl SingleValueConverter for LongConverter {
    fn can_convert(&self, ty: &TypeDescriptor) -> bool {
        ty.is::<i64>()
    }

    fn to_text(&self, source: &dyn Object) -> Result<String, Error> {
        Ok(expect_source::<i64>(source)?.to_string())
    }

    fn from_text(&self, text: &str) -> Result<Box<dyn Any>, Error> {
        Ok(Box::new(decode_i64(text)?))
    }
}

/// Converter for any type with matching `Display` and `FromStr` impls.
pub struct NumberConverter<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> NumberConverter<T> {
    pub fn new() -> Self {
        NumberConverter {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for NumberConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SingleValueConverter for NumberConverter<T>
where
    T: Any + Display + FromStr,
    T::Err: Display,
{
    fn can_convert(&self, ty: &TypeDescriptor) -> bool {
        ty.is::<T>()
    }

    fn to_text(&self, source: &dyn Object) -> Result<String, Error> {
        Ok(expect_source::<T>(source)?.to_string())
    }

    fn from_text(&self, text: &str) -> Result<Box<dyn Any>, Error> {
        text.trim()
            .parse::<T>()
            .map(|v| Box::new(v) as Box<dyn Any>)
            .map_err(|e| {
                Error::enhance_with_type::<T>(Error::invalid_data(format!(
                    "Cannot parse '{}': {}",
                    text, e
                )))
            })
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BoolConverter;

impl SingleValueConverter for BoolConverter {
    fn can_convert(&self, ty: &TypeDescriptor) -> bool {
        ty.is::<bool>()
    }

    fn to_text(&self, source: &dyn Object) -> Result<String, Error> {
        Ok(expect_source::<bool>(source)?.to_string())
    }

    fn from_text(&self, text: &str) -> Result<Box<dyn Any>, Error> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("true") {
            Ok(Box::new(true))
        } else if text.eq_ignore_ascii_case("false") {
            Ok(Box::new(false))
        } else {
            Err(Error::invalid_data(format!(
                "Cannot parse '{}' as a boolean",
                text
            )))
        }
    }
}

/// `char` converter. The NUL character is written as empty text.
#[derive(Clone, Copy, Debug, Default)]
pub struct CharConverter;

impl SingleValueConverter for CharConverter {
    fn can_convert(&self, ty: &TypeDescriptor) -> bool {
        ty.is::<char>()
    }

    fn to_text(&self, source: &dyn Object) -> Result<String, Error> {
        let ch = *expect_source::<char>(source)?;
        if ch == '\0' {
            Ok(String::new())
        } else {
            Ok(ch.to_string())
        }
    }

    fn from_text(&self, text: &str) -> Result<Box<dyn Any>, Error> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Ok(Box::new('\0')),
            (Some(ch), None) => Ok(Box::new(ch)),
            _ => Err(Error::invalid_data(format!(
                "Expected a single character, got '{}'",
                text
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct StringConverter;

impl SingleValueConverter for StringConverter {
    fn can_convert(&self, ty: &TypeDescriptor) -> bool {
        ty.is::<String>()
    }

    fn to_text(&self, source: &dyn Object) -> Result<String, Error> {
        Ok(expect_source::<String>(source)?.clone())
    }

    fn from_text(&self, text: &str) -> Result<Box<dyn Any>, Error> {
        Ok(Box::new(text.to_string()))
    }
}
