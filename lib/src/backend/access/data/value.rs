use std::fmt::Display;


/// A single cell of a table.
///
/// Only the two families the file format can carry are represented: numbers and text.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Text(String),
}



impl FieldValue {

    /// Infers the value held by a raw cell.
    ///
    /// | input                         | result    |
    /// | ----------------------------- | --------- |
    /// | canonical integer (`42`, `-7`) | `Integer` |
    /// | finite float (`1.5`, `2e3`)   | `Float`   |
    /// | anything else, incl. `""`     | `Text`    |
    ///
    /// Integers with leading zeros or a `+` sign stay text so `007` keeps its spelling.
    pub fn parse(obj: &str) -> FieldValue {

        if let Ok(v) = obj.parse::<i64>() {
            if v.to_string() == obj { return FieldValue::Integer(v) }
        }

        // `f64::from_str` accepts "inf" and "NaN", neither of which is a number a user typed
        let looks_numeric = obj.bytes().any(|b| b.is_ascii_digit())
            && obj.bytes().all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'));

        if looks_numeric {
            if let Ok(v) = obj.parse::<f64>() {
                if v.is_finite() && FieldValue::Float(v).to_string() == obj { return FieldValue::Float(v) }
            }
        }

        // if all else fails just return the object as a string value
        FieldValue::Text(obj.to_string())
    }


    pub fn is_number(&self) -> bool { !matches!(self, FieldValue::Text(_)) }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(v) => Some(*v as f64),
            FieldValue::Float(v) => Some(*v),
            FieldValue::Text(_) => None,
        }
    }
}


impl Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Integer(v) => write!(f, "{v}"),
            // debug formatting keeps the fractional part on whole floats (2.0, not 2)
            FieldValue::Float(v) => write!(f, "{v:?}"),
            FieldValue::Text(v) => write!(f, "{v}"),
        }
    }
}


impl From<&str> for FieldValue {
    fn from(value: &str) -> Self { FieldValue::Text(value.to_string()) }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self { FieldValue::Text(value) }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self { FieldValue::Integer(value) }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self { FieldValue::Float(value) }
}



#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_integers_floats_and_text() {
        assert_eq!(FieldValue::parse("42"), FieldValue::Integer(42));
        assert_eq!(FieldValue::parse("-7"), FieldValue::Integer(-7));
        assert_eq!(FieldValue::parse("1.5"), FieldValue::Float(1.5));
        assert_eq!(FieldValue::parse("2.0"), FieldValue::Float(2.0));
        assert_eq!(FieldValue::parse("Ann"), FieldValue::Text("Ann".to_string()));
        assert_eq!(FieldValue::parse(""), FieldValue::Text(String::new()));
    }

    #[test]
    fn non_canonical_numbers_stay_text() {
        assert_eq!(FieldValue::parse("007"), FieldValue::from("007"));
        assert_eq!(FieldValue::parse("+5"), FieldValue::from("+5"));
        assert_eq!(FieldValue::parse("1.50"), FieldValue::from("1.50"));
        assert_eq!(FieldValue::parse("inf"), FieldValue::from("inf"));
        assert_eq!(FieldValue::parse("NaN"), FieldValue::from("NaN"));
        assert_eq!(FieldValue::parse(" 42"), FieldValue::from(" 42"));
    }

    #[test]
    fn display_is_read_back_by_parse() {
        for v in [FieldValue::Integer(-3), FieldValue::Float(2.0), FieldValue::Float(0.25), FieldValue::Float(1e-7)] {
            assert_eq!(FieldValue::parse(&v.to_string()), v);
        }
    }
}
