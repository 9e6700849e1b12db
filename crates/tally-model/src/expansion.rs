use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Named values available for `${name}` substitution, based on [`BTreeMap`].
///
/// Commands read their inputs through expansions and publish their results
/// back into them, so a later command can consume what an earlier one
/// produced.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Expansions(pub BTreeMap<String, String>);

impl Expansions {
    /// Create an empty set of expansions.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns `true` if no expansions are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of named values present.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Insert or overwrite a named value.
    ///
    /// Returns `self` for chaining.
    pub fn put<K, V>(&mut self, name: K, val: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.insert(name.into(), val.into());
        self
    }

    /// Get the value for a name, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(|s| s.as_str())
    }

    /// Iterate through all expansions as `(&str, &str)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Substitute every `${name}` reference in `input`.
    ///
    /// A reference may carry a fallback as `${name|default}`. An absent
    /// name without a fallback resolves to the empty string. A `${` with
    /// no closing `}` is an error.
    pub fn expand(&self, input: &str) -> ModelResult<String> {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let tail = &rest[start + 2..];

            let Some(end) = tail.find('}') else {
                return Err(ModelError::UnterminatedExpansion(input.to_string()));
            };

            let reference = &tail[..end];
            let (name, fallback) = match reference.split_once('|') {
                Some((name, fallback)) => (name, fallback),
                None => (reference, ""),
            };

            out.push_str(self.get(name).unwrap_or(fallback));
            rest = &tail[end + 1..];
        }

        out.push_str(rest);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_replaces_known_names() {
        let mut exp = Expansions::new();
        exp.put("key", "testkey");

        let out = exp.expand("counter ${key} bumped").unwrap();

        assert_eq!(out, "counter testkey bumped");
    }

    #[test]
    fn expand_resolves_absent_name_to_empty() {
        let exp = Expansions::new();

        let out = exp.expand("a${missing}b").unwrap();

        assert_eq!(out, "ab");
    }

    #[test]
    fn expand_uses_fallback_for_absent_name() {
        let exp = Expansions::new();

        let out = exp.expand("${host|localhost}:8080").unwrap();

        assert_eq!(out, "localhost:8080");
    }

    #[test]
    fn expand_prefers_value_over_fallback() {
        let mut exp = Expansions::new();
        exp.put("host", "counter.internal");

        let out = exp.expand("${host|localhost}").unwrap();

        assert_eq!(out, "counter.internal");
    }

    #[test]
    fn expand_handles_multiple_references() {
        let mut exp = Expansions::new();
        exp.put("a", "1").put("b", "2");

        let out = exp.expand("${a}-${b}-${a}").unwrap();

        assert_eq!(out, "1-2-1");
    }

    #[test]
    fn expand_leaves_plain_text_untouched() {
        let exp = Expansions::new();

        let out = exp.expand("no references here").unwrap();

        assert_eq!(out, "no references here");
    }

    #[test]
    fn expand_rejects_unterminated_reference() {
        let exp = Expansions::new();

        let err = exp.expand("broken ${name").unwrap_err();

        assert!(matches!(err, ModelError::UnterminatedExpansion(_)));
    }

    #[test]
    fn expansions_serialize_as_plain_map() {
        let mut exp = Expansions::new();
        exp.put("value", "2");

        let json = serde_json::to_string(&exp).unwrap();

        assert_eq!(json, r#"{"value":"2"}"#);
    }
}
