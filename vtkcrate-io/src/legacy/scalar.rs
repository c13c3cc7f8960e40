//! Scalar data types of the legacy format and their binary encoding
//!
//! Binary legacy files are always big-endian. `vtkIdType` is stored as a
//! 32-bit integer and `long` as a 64-bit integer.

use byteorder::{BigEndian, ByteOrder};
use serde::{Deserialize, Serialize};
use std::fmt;
use vtkcrate_core::{Error, Result};

/// Data type tag of an array in a legacy file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    Bit,
    UnsignedChar,
    Char,
    UnsignedShort,
    Short,
    UnsignedInt,
    Int,
    UnsignedLong,
    Long,
    Float,
    Double,
    IdType,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
}

impl ScalarType {
    /// Parse a type keyword, ignoring case
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let ty = match keyword.to_ascii_lowercase().as_str() {
            "bit" => ScalarType::Bit,
            "unsigned_char" => ScalarType::UnsignedChar,
            "char" => ScalarType::Char,
            "unsigned_short" => ScalarType::UnsignedShort,
            "short" => ScalarType::Short,
            "unsigned_int" => ScalarType::UnsignedInt,
            "int" => ScalarType::Int,
            "unsigned_long" => ScalarType::UnsignedLong,
            "long" => ScalarType::Long,
            "float" => ScalarType::Float,
            "double" => ScalarType::Double,
            "vtkidtype" => ScalarType::IdType,
            "vtktypeint8" => ScalarType::Int8,
            "vtktypeuint8" => ScalarType::UInt8,
            "vtktypeint16" => ScalarType::Int16,
            "vtktypeuint16" => ScalarType::UInt16,
            "vtktypeint32" => ScalarType::Int32,
            "vtktypeuint32" => ScalarType::UInt32,
            "vtktypeint64" => ScalarType::Int64,
            "vtktypeuint64" => ScalarType::UInt64,
            "vtktypefloat32" => ScalarType::Float32,
            "vtktypefloat64" => ScalarType::Float64,
            _ => return None,
        };
        Some(ty)
    }

    /// The keyword written to files
    pub fn keyword(&self) -> &'static str {
        match self {
            ScalarType::Bit => "bit",
            ScalarType::UnsignedChar => "unsigned_char",
            ScalarType::Char => "char",
            ScalarType::UnsignedShort => "unsigned_short",
            ScalarType::Short => "short",
            ScalarType::UnsignedInt => "unsigned_int",
            ScalarType::Int => "int",
            ScalarType::UnsignedLong => "unsigned_long",
            ScalarType::Long => "long",
            ScalarType::Float => "float",
            ScalarType::Double => "double",
            ScalarType::IdType => "vtkIdType",
            ScalarType::Int8 => "vtktypeint8",
            ScalarType::UInt8 => "vtktypeuint8",
            ScalarType::Int16 => "vtktypeint16",
            ScalarType::UInt16 => "vtktypeuint16",
            ScalarType::Int32 => "vtktypeint32",
            ScalarType::UInt32 => "vtktypeuint32",
            ScalarType::Int64 => "vtktypeint64",
            ScalarType::UInt64 => "vtktypeuint64",
            ScalarType::Float32 => "vtktypefloat32",
            ScalarType::Float64 => "vtktypefloat64",
        }
    }

    /// Size in bytes of one binary value; `None` for packed bits
    pub fn byte_size(&self) -> Option<usize> {
        let size = match self {
            ScalarType::Bit => return None,
            ScalarType::UnsignedChar | ScalarType::Char | ScalarType::Int8 | ScalarType::UInt8 => 1,
            ScalarType::UnsignedShort | ScalarType::Short | ScalarType::Int16 | ScalarType::UInt16 => 2,
            ScalarType::UnsignedInt
            | ScalarType::Int
            | ScalarType::IdType
            | ScalarType::Int32
            | ScalarType::UInt32
            | ScalarType::Float
            | ScalarType::Float32 => 4,
            ScalarType::UnsignedLong
            | ScalarType::Long
            | ScalarType::Int64
            | ScalarType::UInt64
            | ScalarType::Double
            | ScalarType::Float64 => 8,
        };
        Some(size)
    }

    /// Check if the type holds floating point values
    pub fn is_float(&self) -> bool {
        matches!(
            self,
            ScalarType::Float | ScalarType::Double | ScalarType::Float32 | ScalarType::Float64
        )
    }

    /// Check if the type is a single precision float
    pub fn is_single_precision(&self) -> bool {
        matches!(self, ScalarType::Float | ScalarType::Float32)
    }

    /// Number of bytes `count` values occupy in a binary file, `None` on overflow
    pub fn binary_len(&self, count: usize) -> Option<usize> {
        match self.byte_size() {
            Some(size) => size.checked_mul(count),
            None => Some(count.div_ceil(8)),
        }
    }

    /// Decode `count` big-endian values
    pub fn decode(&self, bytes: &[u8], count: usize) -> Result<Vec<f64>> {
        let len = self.binary_len(count).ok_or_else(|| {
            Error::InvalidData(format!("{} values of {} data overflow the address space", count, self.keyword()))
        })?;
        if bytes.len() < len {
            return Err(Error::InvalidData(format!(
                "expected {} bytes of {} data, found {}",
                len,
                self.keyword(),
                bytes.len()
            )));
        }

        if *self == ScalarType::Bit {
            return Ok((0..count)
                .map(|i| ((bytes[i / 8] >> (7 - i % 8)) & 1) as f64)
                .collect());
        }

        let size = self.byte_size().unwrap_or(1);
        let values = bytes[..len]
            .chunks_exact(size)
            .map(|chunk| match self {
                ScalarType::UnsignedChar | ScalarType::UInt8 => chunk[0] as f64,
                ScalarType::Char | ScalarType::Int8 => chunk[0] as i8 as f64,
                ScalarType::UnsignedShort | ScalarType::UInt16 => BigEndian::read_u16(chunk) as f64,
                ScalarType::Short | ScalarType::Int16 => BigEndian::read_i16(chunk) as f64,
                ScalarType::UnsignedInt | ScalarType::UInt32 => BigEndian::read_u32(chunk) as f64,
                ScalarType::Int | ScalarType::IdType | ScalarType::Int32 => {
                    BigEndian::read_i32(chunk) as f64
                }
                ScalarType::UnsignedLong | ScalarType::UInt64 => BigEndian::read_u64(chunk) as f64,
                ScalarType::Long | ScalarType::Int64 => BigEndian::read_i64(chunk) as f64,
                ScalarType::Float | ScalarType::Float32 => BigEndian::read_f32(chunk) as f64,
                ScalarType::Double | ScalarType::Float64 => BigEndian::read_f64(chunk),
                ScalarType::Bit => 0.0,
            })
            .collect();
        Ok(values)
    }

    /// Encode values as big-endian bytes
    pub fn encode(&self, values: &[f64]) -> Vec<u8> {
        if *self == ScalarType::Bit {
            let mut bytes = vec![0u8; values.len().div_ceil(8)];
            for (i, v) in values.iter().enumerate() {
                if *v != 0.0 {
                    bytes[i / 8] |= 1 << (7 - i % 8);
                }
            }
            return bytes;
        }

        let size = self.byte_size().unwrap_or(1);
        let mut bytes = vec![0u8; size * values.len()];
        for (chunk, &v) in bytes.chunks_exact_mut(size).zip(values) {
            match self {
                ScalarType::UnsignedChar | ScalarType::UInt8 => chunk[0] = v as u8,
                ScalarType::Char | ScalarType::Int8 => chunk[0] = v as i8 as u8,
                ScalarType::UnsignedShort | ScalarType::UInt16 => BigEndian::write_u16(chunk, v as u16),
                ScalarType::Short | ScalarType::Int16 => BigEndian::write_i16(chunk, v as i16),
                ScalarType::UnsignedInt | ScalarType::UInt32 => BigEndian::write_u32(chunk, v as u32),
                ScalarType::Int | ScalarType::IdType | ScalarType::Int32 => {
                    BigEndian::write_i32(chunk, v as i32)
                }
                ScalarType::UnsignedLong | ScalarType::UInt64 => BigEndian::write_u64(chunk, v as u64),
                ScalarType::Long | ScalarType::Int64 => BigEndian::write_i64(chunk, v as i64),
                ScalarType::Float | ScalarType::Float32 => BigEndian::write_f32(chunk, v as f32),
                ScalarType::Double | ScalarType::Float64 => BigEndian::write_f64(chunk, v),
                ScalarType::Bit => {}
            }
        }
        bytes
    }

    /// Format one value for an ASCII file
    pub fn format_ascii(&self, value: f64) -> String {
        if self.is_single_precision() {
            format!("{}", value as f32)
        } else if self.is_float() {
            format!("{}", value)
        } else {
            format!("{}", value as i64)
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(ScalarType::from_keyword("FLOAT"), Some(ScalarType::Float));
        assert_eq!(ScalarType::from_keyword("vtkIdType"), Some(ScalarType::IdType));
        assert_eq!(ScalarType::from_keyword("vtktypeint64"), Some(ScalarType::Int64));
        assert_eq!(ScalarType::from_keyword("quaternion"), None);
    }

    #[test]
    fn test_binary_sizes() {
        assert_eq!(ScalarType::IdType.binary_len(3), Some(12));
        assert_eq!(ScalarType::Long.binary_len(2), Some(16));
        assert_eq!(ScalarType::Bit.binary_len(9), Some(2));
        assert_eq!(ScalarType::Double.binary_len(usize::MAX / 4), None);
    }

    #[test]
    fn test_big_endian_float_decoding() {
        let bytes = [0x3f, 0x80, 0x00, 0x00, 0xc0, 0x00, 0x00, 0x00];
        let values = ScalarType::Float.decode(&bytes, 2).unwrap();
        assert_eq!(values, vec![1.0, -2.0]);

        assert_eq!(ScalarType::Float.encode(&[1.0, -2.0]), bytes.to_vec());
    }

    #[test]
    fn test_bits_are_packed_most_significant_first() {
        let values = vec![1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0];
        let bytes = ScalarType::Bit.encode(&values);
        assert_eq!(bytes, vec![0b1011_0000, 0b1000_0000]);
        assert_eq!(ScalarType::Bit.decode(&bytes, values.len()).unwrap(), values);
    }

    #[test]
    fn test_short_buffer_is_an_error() {
        assert!(ScalarType::Double.decode(&[0u8; 7], 1).is_err());
        assert!(ScalarType::Float.decode(&[0u8; 8], usize::MAX / 2).is_err());
    }

    #[test]
    fn test_ascii_formatting() {
        assert_eq!(ScalarType::Int.format_ascii(42.0), "42");
        assert_eq!(ScalarType::Float.format_ascii(0.1f32 as f64), "0.1");
        assert_eq!(ScalarType::Double.format_ascii(0.25), "0.25");
    }
}
