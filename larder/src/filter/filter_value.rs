use std::fmt::Debug;

use crate::common::Value;
use crate::errors::LarderResult;

/// A type that can serve as a filter's reference value or candidate.
///
/// Plain Rust values are never null. `Option<T>` (when `None`) and
/// [Value::Null] are, and filters reject them with `NullArgument`.
/// `to_value` is what a filter binds when it is translated for a backing
/// store.
pub trait FilterValue: Clone + PartialOrd + Debug + Send + Sync {
    #[inline]
    fn is_null(&self) -> bool {
        false
    }

    fn to_value(&self) -> Value;
}

macro_rules! filter_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FilterValue for $ty {
                #[inline]
                fn to_value(&self) -> Value {
                    Value::from(self.clone())
                }
            }
        )*
    };
}

filter_value!(bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, char, String);

impl FilterValue for &str {
    #[inline]
    fn to_value(&self) -> Value {
        Value::from(*self)
    }
}

impl FilterValue for Value {
    #[inline]
    fn is_null(&self) -> bool {
        Value::is_null(self)
    }

    #[inline]
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl<T: FilterValue> FilterValue for Option<T> {
    #[inline]
    fn is_null(&self) -> bool {
        match self {
            Some(v) => v.is_null(),
            None => true,
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

/// Something that can evaluate a candidate in memory.
///
/// Every filter kind implements this for the candidate shape it accepts, so
/// a [FilterChain](super::FilterChain) can mix scalar, membership and
/// distance filters over the same candidate type.
pub trait Checkable<C: ?Sized>: Send + Sync {
    /// Returns whether `candidate` satisfies the filter.
    ///
    /// # Errors
    ///
    /// Returns `NullArgument` when the candidate is null.
    fn check(&self, candidate: &C) -> LarderResult<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_values_are_never_null() {
        assert!(!5i32.is_null());
        assert!(!"".is_null());
        assert!(!String::new().is_null());
        assert!(!f64::NAN.is_null());
    }

    #[test]
    fn options_and_null_values_are_null() {
        assert!(None::<i32>.is_null());
        assert!(!Some(3i32).is_null());
        assert!(Some(Value::Null).is_null());
        assert!(FilterValue::is_null(&Value::Null));
        assert!(!FilterValue::is_null(&Value::I32(0)));
    }

    #[test]
    fn to_value_converts() {
        assert_eq!("DAIRY_COLD".to_value(), Value::from("DAIRY_COLD"));
        assert_eq!(12u8.to_value(), Value::U32(12));
        assert_eq!(Some(2.5f64).to_value(), Value::F64(2.5));
        assert!(None::<String>.to_value().is_null());
    }
}
