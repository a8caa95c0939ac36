//! Tag values

use std::collections::BTreeMap;

/// A tag value as exposed to detector profiles.
///
/// Vendor blocks that carry their own structure (for example Olympus SIS)
/// are exposed as [`TagValue::Map`].
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    /// ASCII string
    Ascii(String),
    /// Unsigned integers (BYTE is kept separately as `Bytes`)
    Unsigned(Vec<u64>),
    /// Signed integers
    Signed(Vec<i64>),
    /// Floating point values
    Float(Vec<f64>),
    /// Unsigned rationals (numerator, denominator)
    Rational(Vec<(u64, u64)>),
    /// Raw bytes (BYTE / UNDEFINED)
    Bytes(Vec<u8>),
    /// Named fields of a vendor structure
    Map(BTreeMap<String, TagValue>),
}

impl TagValue {
    /// Get as string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::Ascii(s) => Some(s),
            _ => None,
        }
    }

    /// Get as single unsigned value
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            TagValue::Unsigned(v) => v.first().copied(),
            TagValue::Signed(v) => v.first().and_then(|&x| u64::try_from(x).ok()),
            TagValue::Bytes(v) => v.first().map(|&b| b as u64),
            _ => None,
        }
    }

    /// Get as single floating point value
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TagValue::Float(v) => v.first().copied(),
            TagValue::Unsigned(v) => v.first().map(|&x| x as f64),
            TagValue::Signed(v) => v.first().map(|&x| x as f64),
            TagValue::Rational(v) => v
                .first()
                .and_then(|&(n, d)| if d == 0 { None } else { Some(n as f64 / d as f64) }),
            _ => None,
        }
    }

    /// Get as map of named fields
    pub fn as_map(&self) -> Option<&BTreeMap<String, TagValue>> {
        match self {
            TagValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Look up a named field of a map value
    pub fn field(&self, key: &str) -> Option<&TagValue> {
        self.as_map().and_then(|m| m.get(key))
    }
}

#[cfg(feature = "codec")]
mod convert {
    use super::TagValue;
    use tiff::decoder::ifd::Value;

    enum Scalar {
        Unsigned(u64),
        Signed(i64),
        Float(f64),
        Rational(u64, u64),
        Byte(u8),
        Text(String),
    }

    fn scalar(value: Value, out: &mut Vec<Scalar>) {
        match value {
            Value::Byte(v) => out.push(Scalar::Byte(v)),
            Value::Short(v) => out.push(Scalar::Unsigned(v as u64)),
            Value::Unsigned(v) => out.push(Scalar::Unsigned(v as u64)),
            Value::UnsignedBig(v) => out.push(Scalar::Unsigned(v)),
            Value::Ifd(v) => out.push(Scalar::Unsigned(v as u64)),
            Value::IfdBig(v) => out.push(Scalar::Unsigned(v)),
            Value::Signed(v) => out.push(Scalar::Signed(v as i64)),
            Value::SignedBig(v) => out.push(Scalar::Signed(v)),
            Value::Float(v) => out.push(Scalar::Float(v as f64)),
            Value::Double(v) => out.push(Scalar::Float(v)),
            Value::Rational(n, d) => out.push(Scalar::Rational(n as u64, d as u64)),
            Value::RationalBig(n, d) => out.push(Scalar::Rational(n, d)),
            Value::SRational(n, d) => out.push(Scalar::Float(ratio(n as i64, d as i64))),
            Value::SRationalBig(n, d) => out.push(Scalar::Float(ratio(n, d))),
            Value::Ascii(s) => out.push(Scalar::Text(s)),
            Value::List(items) => {
                for item in items {
                    scalar(item, out);
                }
            }
            // `Value` is non-exhaustive upstream
            _ => {}
        }
    }

    fn ratio(numerator: i64, denominator: i64) -> f64 {
        if denominator == 0 {
            f64::NAN
        } else {
            numerator as f64 / denominator as f64
        }
    }

    impl Scalar {
        fn kind(&self) -> Kind {
            match self {
                Scalar::Unsigned(_) => Kind::Unsigned,
                Scalar::Signed(_) => Kind::Signed,
                Scalar::Float(_) => Kind::Float,
                Scalar::Rational(..) => Kind::Rational,
                Scalar::Byte(_) => Kind::Byte,
                Scalar::Text(_) => Kind::Text,
            }
        }
    }

    #[derive(Clone, Copy)]
    enum Kind {
        Unsigned,
        Signed,
        Float,
        Rational,
        Byte,
        Text,
    }

    impl TagValue {
        /// Convert a decoded `tiff` value. Mixed-type lists are rejected.
        pub(crate) fn from_tiff(value: Value) -> Option<TagValue> {
            let mut items = Vec::new();
            scalar(value, &mut items);
            let kind = items.first()?.kind();

            match kind {
                Kind::Text => collect(items, |s| match s {
                    Scalar::Text(s) => Some(s),
                    _ => None,
                })
                .map(|parts| TagValue::Ascii(parts.concat())),
                Kind::Byte => collect(items, |s| match s {
                    Scalar::Byte(b) => Some(b),
                    _ => None,
                })
                .map(TagValue::Bytes),
                Kind::Unsigned => collect(items, |s| match s {
                    Scalar::Unsigned(v) => Some(v),
                    _ => None,
                })
                .map(TagValue::Unsigned),
                Kind::Signed => collect(items, |s| match s {
                    Scalar::Signed(v) => Some(v),
                    _ => None,
                })
                .map(TagValue::Signed),
                Kind::Float => collect(items, |s| match s {
                    Scalar::Float(v) => Some(v),
                    _ => None,
                })
                .map(TagValue::Float),
                Kind::Rational => collect(items, |s| match s {
                    Scalar::Rational(n, d) => Some((n, d)),
                    _ => None,
                })
                .map(TagValue::Rational),
            }
        }
    }

    fn collect<T>(items: Vec<Scalar>, f: impl Fn(Scalar) -> Option<T>) -> Option<Vec<T>> {
        items.into_iter().map(f).collect()
    }

}
