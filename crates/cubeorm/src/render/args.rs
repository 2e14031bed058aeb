//! Argument types accepted by the builder's modifiers and terminals.

use crate::driver::Param;

/// An ordered list of SQL fragments (columns, ORDER BY or GROUP BY terms),
/// rendered joined with `,`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Terms(Vec<String>);

impl Terms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one term.
    pub fn push(mut self, term: impl Into<String>) -> Self {
        self.0.push(term.into());
        self
    }

    /// `true` when there is nothing to render.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(String::is_empty)
    }

    /// Non-empty terms joined with `,`.
    pub fn join(&self) -> String {
        self.0
            .iter()
            .filter(|t| !t.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl From<&str> for Terms {
    fn from(term: &str) -> Self {
        Terms(vec![term.to_string()])
    }
}

impl From<String> for Terms {
    fn from(term: String) -> Self {
        Terms(vec![term])
    }
}

impl From<&String> for Terms {
    fn from(term: &String) -> Self {
        Terms(vec![term.clone()])
    }
}

impl<S: Into<String>> From<Vec<S>> for Terms {
    fn from(terms: Vec<S>) -> Self {
        Terms(terms.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Terms {
    fn from(terms: [S; N]) -> Self {
        Terms(terms.into_iter().map(Into::into).collect())
    }
}

impl<S: AsRef<str>> From<&[S]> for Terms {
    fn from(terms: &[S]) -> Self {
        Terms(terms.iter().map(|t| t.as_ref().to_string()).collect())
    }
}

/// Ordered `column -> literal` pairs. Values are pasted into the SQL text
/// exactly as given, so string literals must carry their own quotes.
///
/// ```rust
/// use cubeorm::Fields;
///
/// let fields = Fields::new().set("username", "\"lin\"").set("phone", 123);
/// assert_eq!(fields.columns(), vec!["username", "phone"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields(Vec<(String, String)>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `column` to `value`. Setting a column twice keeps its original
    /// position and replaces the value.
    pub fn set(mut self, column: impl Into<String>, value: impl ToString) -> Self {
        self.insert(column.into(), value.to_string());
        self
    }

    fn insert(&mut self, column: String, value: String) {
        match self.0.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => self.0.push((column, value)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn columns(&self) -> Vec<&str> {
        self.0.iter().map(|(c, _)| c.as_str()).collect()
    }

    pub fn values(&self) -> Vec<&str> {
        self.0.iter().map(|(_, v)| v.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(c, v)| (c.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (column, value) in iter {
            fields.insert(column.into(), value.to_string());
        }
        fields
    }
}

impl<K: Into<String>, V: ToString, const N: usize> From<[(K, V); N]> for Fields {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Into<String>, V: ToString> From<Vec<(K, V)>> for Fields {
    fn from(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().collect()
    }
}

/// The `SET` part of an UPDATE: column pairs, or a raw fragment used verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignments {
    Pairs(Fields),
    Raw(String),
}

impl Assignments {
    pub fn is_empty(&self) -> bool {
        match self {
            Assignments::Pairs(fields) => fields.is_empty(),
            Assignments::Raw(raw) => raw.is_empty(),
        }
    }

    pub(crate) fn render(&self) -> String {
        match self {
            Assignments::Pairs(fields) => fields
                .iter()
                .map(|(c, v)| format!("{c}={v}"))
                .collect::<Vec<_>>()
                .join(","),
            Assignments::Raw(raw) => raw.clone(),
        }
    }
}

impl From<Fields> for Assignments {
    fn from(fields: Fields) -> Self {
        Assignments::Pairs(fields)
    }
}

impl From<&str> for Assignments {
    fn from(raw: &str) -> Self {
        Assignments::Raw(raw.to_string())
    }
}

impl From<String> for Assignments {
    fn from(raw: String) -> Self {
        Assignments::Raw(raw)
    }
}

impl<K: Into<String>, V: ToString, const N: usize> From<[(K, V); N]> for Assignments {
    fn from(pairs: [(K, V); N]) -> Self {
        Assignments::Pairs(pairs.into())
    }
}

impl<K: Into<String>, V: ToString> From<Vec<(K, V)>> for Assignments {
    fn from(pairs: Vec<(K, V)>) -> Self {
        Assignments::Pairs(pairs.into())
    }
}

/// Ordered `column -> Param` pairs for the bound-parameter path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundFields(Vec<(String, Param)>);

impl BoundFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, column: impl Into<String>, value: impl Into<Param>) -> Self {
        let column = column.into();
        let value = value.into();
        match self.0.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => self.0.push((column, value)),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn columns(&self) -> Vec<&str> {
        self.0.iter().map(|(c, _)| c.as_str()).collect()
    }

    pub(crate) fn into_params(self) -> Vec<Param> {
        self.0.into_iter().map(|(_, p)| p).collect()
    }
}
