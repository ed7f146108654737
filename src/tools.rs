//!
//! Contains a number of tools that are useful when working with EBML encoded files.
//!
//! Everything in here is a pure function over byte slices: variable length integers (vints) used for element ids and
//! sizes, plus the fixed-width scalar encodings used for element content.
//!

use std::convert::TryInto;

use super::errors::tool::ToolError;
use super::tags::EbmlSize;

///
/// Trait to enable easy serialization to a vint.
///
/// This is only available for types that can be cast as `u64`.
///
pub trait Vint: Into<u64> + Copy {
    ///
    /// Returns a representation of the current value as a vint array.
    ///
    /// The shortest length that can hold the value is used.  A vint with every value bit set is reserved for the
    /// "unknown size" marker, so a value like `127` needs two bytes.
    ///
    /// # Errors
    ///
    /// This can return an error if the value is too large to be representable as a vint.
    ///
    fn as_vint(&self) -> Result<Vec<u8>, ToolError> {
        let val: u64 = (*self).into();
        check_size_u64(val, 8)?;
        let mut length = 1;
        while length < 8 {
            if val < max_vint_value(length) {
                break;
            }
            length += 1;
        }

        Ok(as_vint_no_check_u64(val, length))
    }

    ///
    /// Returns a representation of the current value as a vint array with a specified length.
    ///
    /// # Errors
    ///
    /// This can return an error if the value is too large to be representable as a vint of that length, or if the
    /// length is not between 1 and 8.
    ///
    fn as_vint_with_length(&self, length: usize) -> Result<Vec<u8>, ToolError> {
        let val: u64 = (*self).into();
        check_size_u64(val, length)?;
        Ok(as_vint_no_check_u64(val, length))
    }
}

impl Vint for u64 { }
impl Vint for u32 { }
impl Vint for u16 { }
impl Vint for u8 { }

#[inline]
fn max_vint_value(length: usize) -> u64 {
    (1 << (7 * length)) - 1
}

#[inline]
fn check_size_u64(val: u64, length: usize) -> Result<(), ToolError> {
    if length == 0 || length > 8 || val >= max_vint_value(length) {
        Err(ToolError::WriteVintOverflow(val))
    } else {
        Ok(())
    }
}

#[inline]
fn as_vint_no_check_u64(val: u64, length: usize) -> Vec<u8> {
    let bytes: [u8; 8] = val.to_be_bytes();
    let mut result: Vec<u8> = Vec::from(&bytes[(8-length)..]);
    result[0] |= 1 << (8 - length);
    result
}

///
/// Returns the 8 byte "unknown size" vint (`[0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]`).
///
pub fn unknown_size_vint() -> [u8; 8] {
    [0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]
}

///
/// Reads a vint from the beginning of the input array slice.
///
/// This method returns an option with the `None` variant used to indicate there was not enough data in the buffer to completely read a vint.
///
/// The returned tuple contains the value of the vint (`u64`) and the length of the vint (`usize`).  The length will be less than or equal to the length of the input slice.
///
/// # Errors
///
/// This method can return a `ToolError` if the input array cannot be read as a vint.
///
pub fn read_vint(buffer: &[u8]) -> Result<Option<(u64, usize)>, ToolError> {
    if buffer.is_empty() {
        return Ok(None);
    }

    if buffer[0] == 0 {
        return Err(ToolError::ReadVintOverflow)
    }

    let length = 8 - buffer[0].ilog2() as usize;

    if length > buffer.len() {
        // Not enough data in the buffer to read out the vint value
        return Ok(None);
    }

    let mut value = buffer[0] as u64;
    value -= 1 << (8 - length);

    for item in buffer.iter().take(length).skip(1) {
        value <<= 8;
        value += *item as u64;
    }

    Ok(Some((value, length)))
}

///
/// Reads a vint starting at `offset` within the input slice.  See [`read_vint`].
///
pub fn read_vint_at(buffer: &[u8], offset: usize) -> Result<Option<(u64, usize)>, ToolError> {
    match buffer.get(offset..) {
        Some(remaining) => read_vint(remaining),
        None => Ok(None),
    }
}

///
/// Reads an element id from the beginning of the input slice.
///
/// Unlike [`read_vint`], the returned id keeps its vint marker bit, which is how ids are written in the Matroska specification (e.g. `0x1A45DFA3`).
///
pub fn read_element_id(buffer: &[u8]) -> Result<Option<(u64, usize)>, ToolError> {
    Ok(read_vint(buffer)?.map(|(value, length)| (value + (1 << (7 * length)), length)))
}

///
/// Reads an element size from the beginning of the input slice.
///
/// A size with every value bit set is returned as [`EbmlSize::Unknown`], whatever its length.
///
pub fn read_size_vint(buffer: &[u8]) -> Result<Option<(EbmlSize, usize)>, ToolError> {
    Ok(read_vint(buffer)?.map(|(value, length)| (EbmlSize::new(value, length), length)))
}

///
/// Reads a `u64` value from any length array slice.
///
/// Rather than forcing the input to be a `[u8; 8]` like standard library methods, this can interpret a `u64` from a slice of any length < 8.  Bytes are assumed to be least significant when reading the value - i.e. an array of `[4, 0]` would return a value of `1024`.  An empty slice reads as `0`.
///
/// # Errors
///
/// This method will return an error if the input slice has a length > 8.
///
/// ## Example
///
/// ```
/// # use ebml_seek::tools::arr_to_u64;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let result = arr_to_u64(&[16,0])?;
/// assert_eq!(result, 4096);
/// # Ok(())
/// # }
/// ```
///
pub fn arr_to_u64(arr: &[u8]) -> Result<u64, ToolError> {
    if arr.len() > 8 {
        return Err(ToolError::ReadU64Overflow(Vec::from(arr)));
    }

    let mut val = 0u64;
    for byte in arr {
        val <<= 8;
        val += *byte as u64;
    }
    Ok(val)
}

///
/// Reads an `i64` value from any length array slice.
///
/// The input is read as a big endian two's complement number, sign extended from its first byte.  An empty slice reads as `0`.
///
/// # Errors
///
/// This method will return an error if the input slice has a length > 8.
///
/// ## Example
///
/// ```
/// # use ebml_seek::tools::arr_to_i64;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// assert_eq!(arr_to_i64(&[4,0])?, 1024);
/// assert_eq!(arr_to_i64(&[0xff,0xfe])?, -2);
/// # Ok(())
/// # }
/// ```
///
pub fn arr_to_i64(arr: &[u8]) -> Result<i64, ToolError> {
    if arr.len() > 8 {
        return Err(ToolError::ReadI64Overflow(Vec::from(arr)));
    }

    let mut val: i64 = match arr.first() {
        Some(first) if *first > 127 => -1,
        _ => 0,
    };
    for byte in arr {
        val = (val << 8) | *byte as i64;
    }
    Ok(val)
}

///
/// Reads an `f64` value from an array slice of length 0, 4 or 8.
///
/// This method wraps `f32` and `f64` conversions from big endian byte arrays and casts the result as an `f64`.  An empty slice reads as `0.0`.
///
/// # Errors
///
/// This method will throw an error if the input slice length is not 0, 4 or 8.
///
pub fn arr_to_f64(arr: &[u8]) -> Result<f64, ToolError> {
    match arr.len() {
        0 => Ok(0.0),
        4 => Ok(f32::from_be_bytes([arr[0], arr[1], arr[2], arr[3]]) as f64),
        8 => Ok(f64::from_be_bytes(arr.try_into().map_err(|_| ToolError::ReadF64Mismatch(Vec::from(arr)))?)),
        _ => Err(ToolError::ReadF64Mismatch(Vec::from(arr))),
    }
}

///
/// Reads an EBML date from an array slice of length 0 or 8.
///
/// Dates are signed nanoseconds relative to 2001-01-01T00:00:00 UTC.  An empty slice reads as `0` (the epoch itself).
///
/// # Errors
///
/// This method will throw an error if the input slice length is not 0 or 8.
///
pub fn arr_to_date(arr: &[u8]) -> Result<i64, ToolError> {
    match arr.len() {
        0 => Ok(0),
        8 => arr_to_i64(arr),
        _ => Err(ToolError::ReadDateMismatch(Vec::from(arr))),
    }
}

///
/// Reads a UTF-8 string from an array slice.
///
/// EBML allows string elements to be padded with trailing zero bytes; those are trimmed.
///
/// # Errors
///
/// This method will return an error if the data is not valid UTF-8.
///
pub fn arr_to_string(arr: &[u8]) -> Result<String, ToolError> {
    let end = arr.iter().rposition(|b| *b != 0).map_or(0, |last| last + 1);
    String::from_utf8(arr[..end].to_vec()).map_err(|e| ToolError::FromUtf8Error(Vec::from(arr), e))
}

///
/// Writes a `u64` as big endian bytes, trimmed to the fewest bytes that hold the value (at least one).
///
pub fn u64_to_arr(val: u64) -> Vec<u8> {
    let bytes = val.to_be_bytes();
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(7);
    bytes[first..].to_vec()
}

///
/// Writes an `i64` as big endian two's complement bytes, using 1, 2, 4 or 8 bytes.
///
pub fn i64_to_arr(val: i64) -> Vec<u8> {
    if let Ok(n) = i8::try_from(val) {
        n.to_be_bytes().to_vec()
    } else if let Ok(n) = i16::try_from(val) {
        n.to_be_bytes().to_vec()
    } else if let Ok(n) = i32::try_from(val) {
        n.to_be_bytes().to_vec()
    } else {
        val.to_be_bytes().to_vec()
    }
}

///
/// Writes an `f64` as 8 big endian bytes.
///
pub fn f64_to_arr(val: f64) -> Vec<u8> {
    val.to_be_bytes().to_vec()
}

///
/// Returns the bytes of an element id as they appear in a file (e.g. `0x1A45DFA3` becomes `[0x1A, 0x45, 0xDF, 0xA3]`).
///
pub fn id_to_bytes(id: u64) -> Vec<u8> {
    id.to_be_bytes().iter().skip_while(|&v| *v == 0u8).copied().collect()
}

///
/// Returns a lowercase hex string of the input bytes.
///
pub fn to_hex_string(arr: &[u8]) -> String {
    hex::encode(arr)
}

///
/// Returns an uppercase hex string of an element id, as element ids are usually written (e.g. `"1F43B675"`).
///
pub fn id_to_hex(id: u64) -> String {
    hex::encode_upper(id_to_bytes(id))
}

///
/// Compares the raw bytes of a `SeekID` element against an element id.
///
pub fn seek_id_matches(seek_id: &[u8], id: u64) -> bool {
    to_hex_string(seek_id) == to_hex_string(&id_to_bytes(id))
}
