use std::fmt;

/// Cache key: an ordered tuple of string parts
///
/// Invalidation works on prefixes, so `["brands"]` covers every brand list
/// page and `["wishlist", "7"]` covers the wishlist and its membership
/// checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    /// Append one part
    pub fn with(mut self, part: impl ToString) -> Self {
        self.0.push(part.to_string());
        self
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    /// Whether `self` starts with every part of `prefix`
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for QueryKey {
    fn from(parts: [S; N]) -> Self {
        Self::new(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_matching() {
        let page = QueryKey::from(["brands", "0", "12", "name,asc"]);
        assert!(page.starts_with(&QueryKey::from(["brands"])));
        assert!(page.starts_with(&page));
        assert!(!page.starts_with(&QueryKey::from(["brand"])));
        assert!(!QueryKey::from(["brands"]).starts_with(&page));
    }

    #[test]
    fn test_parts_are_whole_segments() {
        let key = QueryKey::from(["wishlist", "17"]);
        assert!(!key.starts_with(&QueryKey::from(["wishlist", "1"])));
        assert_eq!(key.with("product").with(3).to_string(), "[wishlist, 17, product, 3]");
    }
}
