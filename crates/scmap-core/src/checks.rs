//! Named assertions used by every loader.
//!
//! Each check returns a [`CheckError`] whose message names the field and the
//! value that was rejected, so a failed load reads like
//! `ddspf.size: expected 32, got 24`.

use std::any::Any;
use std::fmt::Debug;

use crate::error::CheckError;

/// `actual == expected`.
pub fn equal<T: PartialEq + Debug>(name: &str, actual: T, expected: T) -> Result<(), CheckError> {
    if actual == expected {
        Ok(())
    } else {
        Err(CheckError::new(
            name,
            format!("expected {expected:?}, got {actual:?}"),
        ))
    }
}

/// `min <= value <= max`.
pub fn between<T: PartialOrd + Debug>(
    name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<(), CheckError> {
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(CheckError::new(
            name,
            format!("{value:?} not in range [{min:?}, {max:?}]"),
        ))
    }
}

/// `value` is one of `allowed`.
pub fn one_of<T: PartialEq + Debug>(name: &str, value: T, allowed: &[T]) -> Result<(), CheckError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(CheckError::new(
            name,
            format!("{value:?} is not one of {allowed:?}"),
        ))
    }
}

/// Every bit of `mask` is set in `value`.
pub fn bits_set(name: &str, value: u32, mask: u32) -> Result<(), CheckError> {
    if value & mask == mask {
        Ok(())
    } else {
        Err(CheckError::new(
            name,
            format!("{value:#010x} is missing required bits {:#010x}", mask & !value),
        ))
    }
}

/// No bit of `mask` is set in `value`.
pub fn bits_not_set(name: &str, value: u32, mask: u32) -> Result<(), CheckError> {
    if value & mask == 0 {
        Ok(())
    } else {
        Err(CheckError::new(
            name,
            format!("{value:#010x} has forbidden bits {:#010x}", value & mask),
        ))
    }
}

/// Downcast a dynamically typed value, failing with the expected type name.
pub fn type_is<'a, T: Any>(name: &str, value: &'a dyn Any) -> Result<&'a T, CheckError> {
    value.downcast_ref::<T>().ok_or_else(|| {
        CheckError::new(
            name,
            format!("expected a value of type {}", std::any::type_name::<T>()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal() {
        assert!(equal("size", 124u32, 124).is_ok());
        let err = equal("size", 120u32, 124).unwrap_err();
        assert_eq!(err.name, "size");
        assert_eq!(err.to_string(), "size: expected 124, got 120");
    }

    #[test]
    fn test_between_inclusive() {
        assert!(between("army", -1, -1, 15).is_ok());
        assert!(between("army", 15, -1, 15).is_ok());
        assert!(between("army", 16, -1, 15).is_err());
        assert!(between("elevation", 1.5f32, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_one_of() {
        assert!(one_of("bpp", 32u32, &[24, 32]).is_ok());
        let err = one_of("bpp", 16u32, &[24, 32]).unwrap_err();
        assert!(err.message.contains("16"));
    }

    #[test]
    fn test_bits_set_and_not_set() {
        assert!(bits_set("flags", 0x1007, 0x1006).is_ok());
        let err = bits_set("flags", 0x0001, 0x1006).unwrap_err();
        assert!(err.message.contains("0x00001006"));

        assert!(bits_not_set("flags", 0x40, 0x04).is_ok());
        assert!(bits_not_set("flags", 0x44, 0x04).is_err());
    }

    #[test]
    fn test_type_is() {
        let value: Box<dyn Any> = Box::new(42u32);
        assert_eq!(*type_is::<u32>("count", value.as_ref()).expect("is u32"), 42);

        let err = type_is::<String>("count", value.as_ref()).unwrap_err();
        assert!(err.message.contains("String"));
    }
}
