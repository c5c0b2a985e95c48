use shapecopy::{Converter, Shape};
use uuid::Uuid;

use crate::{lift, ConvertError};

/// `Uuid` to its hyphenated lowercase form.
pub fn uuid_to_string() -> Converter {
    Converter::new(Some(Uuid::descriptor()), Some(String::descriptor()), |value| {
        let id: Uuid = lift(value)?;
        Ok(id.hyphenated().to_string().to_value())
    })
}

/// String to `Uuid`. The empty string maps to the nil id.
pub fn string_to_uuid() -> Converter {
    Converter::new(Some(String::descriptor()), Some(Uuid::descriptor()), |value| {
        let s: String = lift(value)?;
        if s.is_empty() {
            return Ok(Uuid::nil().to_value());
        }
        let id = Uuid::parse_str(&s).map_err(ConvertError::from)?;
        Ok(id.to_value())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_through_string() {
        let id = Uuid::new_v4();
        let text = uuid_to_string().convert(&id.to_value()).unwrap();
        assert_eq!(text.as_str(), Some(id.to_string().as_str()));

        let back = string_to_uuid().convert(&text).unwrap();
        assert_eq!(Uuid::from_value(back).unwrap(), id);
    }

    #[test]
    fn test_empty_string_is_nil_id() {
        let out = string_to_uuid().convert(&String::new().to_value()).unwrap();
        assert_eq!(Uuid::from_value(out).unwrap(), Uuid::nil());
    }

    #[test]
    fn test_malformed_uuid() {
        let err = string_to_uuid()
            .convert(&"not-a-uuid".to_string().to_value())
            .unwrap_err();
        assert!(err.to_string().starts_with("failed to parse uuid from string: "));
    }
}
