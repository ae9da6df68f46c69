use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

//one untyped row from the upstream trade report, in header order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawTradeRow {
    fields: IndexMap<String, String>,

    //set when the source record could not be decoded into fields
    #[serde(skip)]
    invalid: Option<String>,
}

impl RawTradeRow {
    pub fn new() -> Self {
        RawTradeRow::default()
    }

    //placeholder for a source record that could not be read, rejected at normalization
    pub fn undecodable(reason: impl Into<String>) -> Self {
        RawTradeRow {
            fields: IndexMap::new(),
            invalid: Some(reason.into()),
        }
    }

    pub fn invalid(&self) -> Option<&str> {
        self.invalid.as_deref()
    }

    //builder-style insert, handy for constructing rows by hand
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.fields.insert(key.trim().to_string(), value.to_string());
    }

    //returns the trimmed value, treating empty strings as absent
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    //first non-empty value among the given aliases
    pub fn get_any(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.get(key))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawTradeRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RawTradeRow::new();
        for (k, v) in iter {
            let key: String = k.into();
            let value: String = v.into();
            row.insert(&key, &value);
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_whitespace_values_are_absent() {
        let row = RawTradeRow::new()
            .with("strike", "")
            .with("symbol", "  ")
            .with("quantity", " 2 ");

        assert_eq!(row.get("strike"), None);
        assert_eq!(row.get("symbol"), None);
        assert_eq!(row.get("quantity"), Some("2"));
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn get_any_prefers_first_present_alias() {
        let row = RawTradeRow::new()
            .with("ibCommission", "-1.05")
            .with("commission", "");

        assert_eq!(row.get_any(&["commission", "ibCommission"]), Some("-1.05"));
    }

    #[test]
    fn undecodable_row_has_no_fields() {
        let row = RawTradeRow::undecodable("bad bytes");
        assert!(row.is_empty());
        assert_eq!(row.invalid(), Some("bad bytes"));
        assert_eq!(RawTradeRow::new().with("strike", "1").invalid(), None);
    }
}
