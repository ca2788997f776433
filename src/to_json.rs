//! The [`ToJson`] conversion trait.

use std::borrow::Cow;

use crate::builder::{arr, bool as bool_value, float, int, null, str as str_value};
use crate::value::Value;

/// Types that convert into a JSON [`Value`].
///
/// Lets call sites hand plain Rust data to the builder API without
/// spelling the constructor for every leaf:
///
/// ```
/// use fastjson::{obj, ToJson};
///
/// let tags = vec!["fast", "compact"];
/// let value = obj()
///     .set("name", "fastjson".to_json())
///     .set("stars", 42.to_json())
///     .set("tags", tags.to_json());
/// assert_eq!(value.get("stars").int64(), 42);
/// ```
///
/// Implemented for strings, all primitive integers, floats, `bool`,
/// `Option<T>` (where `None` becomes null), slices, `Vec<T>`, fixed
/// arrays, and `Value` itself (pass-through clone).
pub trait ToJson {
    /// Convert this value to a JSON value.
    fn to_json(&self) -> Value;
}

impl ToJson for str {
    #[inline]
    fn to_json(&self) -> Value {
        str_value(self)
    }
}

impl ToJson for String {
    #[inline]
    fn to_json(&self) -> Value {
        str_value(self)
    }
}

impl ToJson for Cow<'_, str> {
    #[inline]
    fn to_json(&self) -> Value {
        str_value(self.as_ref())
    }
}

macro_rules! impl_to_json_int {
    ($($ty:ty),*) => {
        $(
            impl ToJson for $ty {
                #[inline]
                fn to_json(&self) -> Value {
                    int(*self as i64)
                }
            }
        )*
    };
}

// u64/usize beyond i64::MAX wrap; JSON consumers rarely get that far
impl_to_json_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl ToJson for f32 {
    #[inline]
    fn to_json(&self) -> Value {
        float(f64::from(*self))
    }
}

impl ToJson for f64 {
    #[inline]
    fn to_json(&self) -> Value {
        float(*self)
    }
}

impl ToJson for bool {
    #[inline]
    fn to_json(&self) -> Value {
        bool_value(*self)
    }
}

impl<T: ToJson> ToJson for Option<T> {
    #[inline]
    fn to_json(&self) -> Value {
        match self {
            Some(v) => v.to_json(),
            None => null(),
        }
    }
}

impl<T: ToJson> ToJson for [T] {
    fn to_json(&self) -> Value {
        let out = arr();
        for item in self {
            out.append(item.to_json());
        }
        out
    }
}

impl<T: ToJson> ToJson for Vec<T> {
    #[inline]
    fn to_json(&self) -> Value {
        self.as_slice().to_json()
    }
}

impl<T: ToJson, const N: usize> ToJson for [T; N] {
    #[inline]
    fn to_json(&self) -> Value {
        self.as_slice().to_json()
    }
}

impl ToJson for Value {
    #[inline]
    fn to_json(&self) -> Value {
        self.clone()
    }
}

impl<T: ToJson + ?Sized> ToJson for &T {
    #[inline]
    fn to_json(&self) -> Value {
        (*self).to_json()
    }
}

impl<T: ToJson + ?Sized> ToJson for Box<T> {
    #[inline]
    fn to_json(&self) -> Value {
        (**self).to_json()
    }
}
