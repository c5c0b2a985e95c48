use shapecopy::{Converter, Shape};

use crate::{lift, ConvertError};

/// `i64` to its decimal representation.
pub fn int_to_string() -> Converter {
    Converter::new(Some(i64::descriptor()), Some(String::descriptor()), |value| {
        let n: i64 = lift(value)?;
        Ok(n.to_string().to_value())
    })
}

/// Decimal string to `i64`. Parse failures are returned as-is.
pub fn string_to_int() -> Converter {
    Converter::new(Some(String::descriptor()), Some(i64::descriptor()), |value| {
        let s: String = lift(value)?;
        let n = s.parse::<i64>().map_err(ConvertError::from)?;
        Ok(n.to_value())
    })
}
