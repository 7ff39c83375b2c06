use std::borrow::Cow;
use std::fmt;

/// A single parameter value before it is stringified for signing.
#[derive(Clone, Debug, PartialEq)]
pub enum Parameter<'a> {
    StringValue(Cow<'a, str>),
    IntValue(i64),
    UIntValue(u64),
    BoolValue(bool),
}

impl<'a> From<&'a str> for Parameter<'a> {
    fn from(s: &'a str) -> Self {
        Parameter::<'a>::StringValue(s.into())
    }
}

impl<'a> From<&'a String> for Parameter<'a> {
    fn from(s: &'a String) -> Self {
        Parameter::<'a>::StringValue(s.as_str().into())
    }
}

impl From<String> for Parameter<'_> {
    fn from(s: String) -> Self {
        Parameter::StringValue(s.into())
    }
}

impl<'a> From<Cow<'a, str>> for Parameter<'a> {
    fn from(s: Cow<'a, str>) -> Self {
        Parameter::StringValue(s)
    }
}

impl From<i64> for Parameter<'_> {
    fn from(n: i64) -> Self {
        Parameter::IntValue(n)
    }
}

impl From<u64> for Parameter<'_> {
    fn from(n: u64) -> Self {
        Parameter::UIntValue(n)
    }
}

impl From<bool> for Parameter<'_> {
    fn from(b: bool) -> Self {
        Parameter::BoolValue(b)
    }
}

impl fmt::Display for Parameter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameter::StringValue(s) => f.write_str(s),
            Parameter::IntValue(n) => write!(f, "{}", n),
            Parameter::UIntValue(n) => write!(f, "{}", n),
            // the server compares against Ruby's `to_s`, so keep these lowercase
            Parameter::BoolValue(b) => f.write_str(if *b { "true" } else { "false" }),
        }
    }
}

/// Insertion-ordered parameter set.
///
/// Signing sorts by key, but URLs are serialized in the order the keys were
/// first inserted. Re-inserting a key replaces its value and keeps its position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Parameters {
    entries: Vec<(String, String)>,
}

impl Parameters {
    pub fn new() -> Self {
        Parameters {
            entries: Vec::new(),
        }
    }

    pub fn insert<'a, K, V>(&mut self, key: K, value: V) -> &mut Parameters
    where
        K: Into<String>,
        V: Into<Parameter<'a>>,
    {
        let key = key.into();
        let value: Parameter<'a> = value.into();
        let value = value.to_string();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    /// Inserts only when `value` is `Some`.
    pub fn insert_opt<'a, K, V>(&mut self, key: K, value: Option<V>) -> &mut Parameters
    where
        K: Into<String>,
        V: Into<Parameter<'a>>,
    {
        if let Some(value) = value {
            self.insert(key, value);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K, V> std::iter::FromIterator<(K, V)> for Parameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Parameters::new();
        for (k, v) in iter {
            let v: String = v.into();
            params.insert(k, v);
        }
        params
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stringify_values() {
        assert_eq!(Parameter::from("abc").to_string(), "abc");
        assert_eq!(Parameter::from(-42i64).to_string(), "-42");
        assert_eq!(Parameter::from(1_350_000_000u64).to_string(), "1350000000");
        assert_eq!(Parameter::from(true).to_string(), "true");
        assert_eq!(Parameter::from(false).to_string(), "false");
    }

    #[test]
    fn test_insert_keeps_first_position() {
        let mut params = Parameters::new();
        params
            .insert("zeta", "1")
            .insert("alpha", "2")
            .insert("zeta", "3");
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, vec![("zeta", "3"), ("alpha", "2")]);
    }

    #[test]
    fn test_insert_opt_and_remove() {
        let mut params = Parameters::new();
        params
            .insert_opt("address2", None as Option<&str>)
            .insert_opt("city", Some("Boston"));
        assert!(!params.contains_key("address2"));
        assert_eq!(params.get("city"), Some("Boston"));
        assert_eq!(params.remove("city"), Some("Boston".to_string()));
        assert!(params.is_empty());
        assert_eq!(params.remove("city"), None);
    }
}
