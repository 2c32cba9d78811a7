//! Raw query parameters
//!
//! An ordered collection of `key -> values` pairs, as handed over by the HTTP
//! layer. Repeated occurrences of the same key, compared ASCII
//! case-insensitively, are grouped into one multi-valued parameter at the
//! position and with the spelling of the first occurrence.

use url::form_urlencoded;

/// One query parameter and all of its values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParameter {
    pub key: String,
    pub values: Vec<String>,
}

impl QueryParameter {
    pub fn new(key: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            key: key.into(),
            values,
        }
    }

    /// First value, trimmed.
    pub fn first_value(&self) -> Option<&str> {
        self.values.first().map(|value| value.trim())
    }
}

/// Ordered parameter collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParameters {
    params: Vec<QueryParameter>,
}

impl QueryParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode an `application/x-www-form-urlencoded` query string.
    ///
    /// A leading `?` is ignored.
    pub fn from_query_string(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        form_urlencoded::parse(query.as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect()
    }

    /// Append `value` to the parameter named `key` (any letter case), creating it if needed.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self
            .params
            .iter_mut()
            .find(|param| param.key.eq_ignore_ascii_case(&key))
        {
            Some(param) => param.values.push(value),
            None => self.params.push(QueryParameter::new(key, vec![value])),
        }
    }

    pub fn get(&self, key: &str) -> Option<&QueryParameter> {
        self.params
            .iter()
            .find(|param| param.key.eq_ignore_ascii_case(key))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QueryParameter> {
        self.params.iter()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParameters::new();
        for (key, value) in iter {
            params.push(key, value);
        }
        params
    }
}

impl From<Vec<QueryParameter>> for QueryParameters {
    fn from(params: Vec<QueryParameter>) -> Self {
        Self { params }
    }
}

impl<'a> IntoIterator for &'a QueryParameters {
    type Item = &'a QueryParameter;
    type IntoIter = std::slice::Iter<'a, QueryParameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_repeated_keys_in_first_seen_order() {
        let params: QueryParameters = [
            ("PatientName", "Doe"),
            ("limit", "10"),
            ("PatientName", "Roe"),
        ]
        .into_iter()
        .collect();

        assert_eq!(params.len(), 2);
        let keys: Vec<&str> = params.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["PatientName", "limit"]);
        assert_eq!(params.get("PatientName").unwrap().values, vec!["Doe", "Roe"]);
    }

    #[test]
    fn keys_group_case_insensitively_keeping_first_spelling() {
        let params: QueryParameters = [("limit", "5"), ("LIMIT", "500")].into_iter().collect();
        assert_eq!(params.len(), 1);
        let limit = params.get("Limit").unwrap();
        assert_eq!(limit.key, "limit");
        assert_eq!(limit.values, vec!["5", "500"]);
    }

    #[test]
    fn decodes_query_strings() {
        let params = QueryParameters::from_query_string(
            "?PatientName=Doe%5EJane&StudyDate=20190101-20190105&includefield=all",
        );
        assert_eq!(params.len(), 3);
        assert_eq!(params.get("PatientName").unwrap().first_value(), Some("Doe^Jane"));
        assert_eq!(
            params.get("StudyDate").unwrap().first_value(),
            Some("20190101-20190105")
        );
    }

    #[test]
    fn first_value_is_trimmed() {
        let param = QueryParameter::new("limit", vec![" 5 ".into(), "6".into()]);
        assert_eq!(param.first_value(), Some("5"));
        assert_eq!(QueryParameter::new("limit", Vec::new()).first_value(), None);
    }

    #[test]
    fn empty_query_string_has_no_parameters() {
        assert!(QueryParameters::from_query_string("").is_empty());
        assert!(QueryParameters::from_query_string("?").is_empty());
    }
}
