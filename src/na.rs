use std::fmt::{self, Debug, Display};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A possibly-missing observation value (NA, Not Available)
///
/// Sensor fields are frequently absent for a given record. Missing values are
/// kept as `NA::NA` and elided by the extraction helpers; they are never
/// replaced by zero.
///
/// On the wire an `NA<T>` is a plain `Option<T>`: `null` (or a missing key
/// when the containing field has `#[serde(default)]`) reads as `NA::NA`.
#[derive(Clone, Copy)]
pub enum NA<T> {
    /// Value is present
    Value(T),
    /// Value is missing
    NA,
}

impl<T> NA<T> {
    /// Check whether the value is missing
    pub fn is_na(&self) -> bool {
        match self {
            NA::Value(_) => false,
            NA::NA => true,
        }
    }

    /// Check whether a value is present
    pub fn is_value(&self) -> bool {
        !self.is_na()
    }

    /// Borrow the value if present
    pub fn value(&self) -> Option<&T> {
        match self {
            NA::Value(v) => Some(v),
            NA::NA => None,
        }
    }

    /// Map the contained value
    pub fn map<U, F>(&self, f: F) -> NA<U>
    where
        F: FnOnce(&T) -> U,
    {
        match self {
            NA::Value(v) => NA::Value(f(v)),
            NA::NA => NA::NA,
        }
    }
}

impl<T: Copy> NA<T> {
    /// Copy the value out if present
    pub fn get(&self) -> Option<T> {
        self.value().copied()
    }
}

impl NA<f64> {
    /// Present and finite. Non-finite readings are treated as missing by the
    /// extraction helpers.
    pub fn finite(&self) -> Option<f64> {
        self.get().filter(|v| v.is_finite())
    }
}

impl<T> Default for NA<T> {
    fn default() -> Self {
        NA::NA
    }
}

impl<T> From<T> for NA<T> {
    fn from(value: T) -> Self {
        NA::Value(value)
    }
}

impl<T> From<Option<T>> for NA<T> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => NA::Value(v),
            None => NA::NA,
        }
    }
}

impl<T> From<NA<T>> for Option<T> {
    fn from(na: NA<T>) -> Self {
        match na {
            NA::Value(v) => Some(v),
            NA::NA => None,
        }
    }
}

impl<T: Debug> Debug for NA<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NA::Value(v) => write!(f, "{:?}", v),
            NA::NA => write!(f, "NA"),
        }
    }
}

impl<T: Display> Display for NA<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NA::Value(v) => write!(f, "{}", v),
            NA::NA => write!(f, "NA"),
        }
    }
}

impl<T: PartialEq> PartialEq for NA<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NA::Value(a), NA::Value(b)) => a == b,
            (NA::NA, NA::NA) => true,
            _ => false,
        }
    }
}

impl<T: Serialize> Serialize for NA<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            NA::Value(v) => serializer.serialize_some(v),
            NA::NA => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for NA<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(NA::from)
    }
}
