use shapecopy::{Converter, Shape, Value};

use crate::lift;

/// Any slot holding a string to `String`.
pub fn any_to_string() -> Converter {
    Converter::new(None, Some(String::descriptor()), |value| {
        let s: String = lift(value)?;
        Ok(s.to_value())
    })
}

/// `String` into an any slot.
pub fn string_to_any() -> Converter {
    Converter::new(Some(String::descriptor()), None, |value| {
        let s: String = lift(value)?;
        Ok(Value::Any(Some(Box::new(s.to_value()))))
    })
}
