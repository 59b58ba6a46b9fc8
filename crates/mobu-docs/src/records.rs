//! Parsed documentation records.
//!
//! One `DocPage` per fetched HTML page, one `DocMember` per documented
//! property/method on it. Records live only for the duration of a
//! reconciliation pass; nothing here is persisted.

#[derive(Debug, Clone, PartialEq)]
pub struct DocParam {
    pub name: String,
    /// Declared C++-like type string, verbatim from the page.
    pub type_name: String,
    /// Default value source text, when the name cell carried an `=default`.
    pub default: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocMember {
    pub name: String,
    /// Declared C++-like type string (return type for methods).
    pub type_name: String,
    /// Body documentation, converted to restricted markdown.
    pub doc: String,
    pub params: Vec<DocParam>,
    /// Relative URL of the page this member came from.
    pub source_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocPage {
    pub name: String,
    pub members: Vec<DocMember>,
}

impl DocPage {
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// All members sharing `name`, in page order.
    pub fn members_named<'a, 'b>(&'a self, name: &'b str) -> impl Iterator<Item = &'a DocMember> + use<'a, 'b> {
        self.members.iter().filter(move |m| m.name == name)
    }
}
