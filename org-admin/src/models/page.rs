/// Pagination and search for list endpoints (`first`/`max`/`search`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub first: u32,
    pub max: u32,
    pub search: Option<String>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            first: 0,
            max: 100,
            search: None,
        }
    }
}

impl PageRequest {
    pub fn new(first: u32, max: u32) -> Self {
        Self {
            first,
            max,
            search: None,
        }
    }

    /// Blank search text is treated as no search.
    pub fn search(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.search = if text.trim().is_empty() { None } else { Some(text) };
        self
    }

    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("first", self.first.to_string()), ("max", self.max.to_string())];
        if let Some(search) = &self.search {
            query.push(("search", search.clone()));
        }
        query
    }
}
