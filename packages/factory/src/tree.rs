//! Owned tag trees handed to factories.
//!
//! A [`TagNode`] is a tag name, an optional text value and an ordered list
//! of children, plus the attributes found on the element. Trees are
//! usually converted from a `roxmltree` document, but can be assembled by
//! hand when the payload comes from somewhere else.

use std::collections::BTreeMap;

use roxmltree::{Document, Node};

use crate::error::Result;

/// Read-only key/value context found on an element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(BTreeMap<String, String>);

impl Attributes {
    /// Create an empty attribute set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an attribute value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A single node of the input tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagNode {
    /// Tag name without namespace.
    pub tag: String,
    /// Trimmed text content; `None` when absent or whitespace only.
    pub text: Option<String>,
    /// Attributes on the element.
    pub attributes: Attributes,
    /// Element children in document order.
    pub children: Vec<TagNode>,
}

impl TagNode {
    /// Create a leaf node carrying a text value.
    ///
    /// # Examples
    /// ```
    /// use nationscript_factory::tree::TagNode;
    ///
    /// let node = TagNode::leaf("PRICE", "12.5");
    /// assert_eq!(node.text(), Some("12.5"));
    /// assert!(node.children.is_empty());
    /// ```
    #[must_use]
    pub fn leaf(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: normalize_text(&text.into()),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    /// Create a node with children and no text.
    #[must_use]
    pub fn branch(tag: impl Into<String>, children: impl IntoIterator<Item = TagNode>) -> Self {
        Self {
            tag: tag.into(),
            text: None,
            attributes: Attributes::new(),
            children: children.into_iter().collect(),
        }
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.0.insert(name.into(), value.into());
        self
    }

    /// Convert an element of a parsed XML document, recursively.
    ///
    /// Non-element children (text, comments, processing instructions) are
    /// dropped; the element's own text is kept.
    #[must_use]
    pub fn from_xml(node: Node<'_, '_>) -> Self {
        Self {
            tag: node.tag_name().name().to_string(),
            text: node.text().and_then(normalize_text),
            attributes: node
                .attributes()
                .map(|attr| (attr.name(), attr.value()))
                .collect(),
            children: node
                .children()
                .filter(|child| child.is_element())
                .map(Self::from_xml)
                .collect(),
        }
    }

    /// Text value of the node.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Find the first child with the given tag name.
    #[must_use]
    pub fn child(&self, tag: &str) -> Option<&TagNode> {
        self.children.iter().find(|child| child.tag == tag)
    }

    /// Iterate over all children with the given tag name.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a TagNode> {
        self.children.iter().filter(move |child| child.tag == tag)
    }

    /// Find this node or its first descendant, depth first, with the given tag.
    #[must_use]
    pub fn find(&self, tag: &str) -> Option<&TagNode> {
        if self.tag == tag {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(tag))
    }

    /// Whether the node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Parse an XML payload and return its root element as a [`TagNode`].
///
/// # Errors
/// Returns `NsError::Xml` when the payload is not well-formed.
///
/// # Examples
/// ```
/// use nationscript_factory::tree::parse_document;
///
/// let root = parse_document("<SECTORS><PUBLIC>8.5</PUBLIC></SECTORS>").unwrap();
/// assert_eq!(root.tag, "SECTORS");
/// assert_eq!(root.child("PUBLIC").and_then(|n| n.text()), Some("8.5"));
/// ```
pub fn parse_document(xml: &str) -> Result<TagNode> {
    let doc = Document::parse(xml)?;
    Ok(TagNode::from_xml(doc.root_element()))
}

fn normalize_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_document_keeps_structure() {
        let xml = r#"<CARD id="42" season="3">
            <NAME>Testland</NAME>
            <!-- comment -->
            <MARKETS>
                <MARKET><PRICE>1.00</PRICE></MARKET>
                <MARKET><PRICE>2.00</PRICE></MARKET>
            </MARKETS>
        </CARD>"#;
        let root = parse_document(xml).unwrap();

        assert_eq!(root.tag, "CARD");
        assert_eq!(root.attributes.get("id"), Some("42"));
        assert_eq!(root.attributes.get("season"), Some("3"));
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.child("NAME").and_then(TagNode::text), Some("Testland"));

        let markets = root.child("MARKETS").unwrap();
        assert_eq!(markets.children_named("MARKET").count(), 2);
        assert!(markets.text().is_none());
    }

    #[test]
    fn test_parse_document_invalid() {
        let err = parse_document("<SECTORS>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Xml);
    }

    #[test]
    fn test_find_descends() {
        let root = parse_document("<NATION><ECONOMY><SECTORS/></ECONOMY></NATION>").unwrap();
        assert_eq!(root.find("NATION").map(|n| n.tag.as_str()), Some("NATION"));
        assert_eq!(root.find("SECTORS").map(|n| n.tag.as_str()), Some("SECTORS"));
        assert!(root.find("MARKETS").is_none());
    }

    #[test]
    fn test_leaf_trims_and_drops_blank_text() {
        assert_eq!(TagNode::leaf("A", "  x  ").text(), Some("x"));
        assert_eq!(TagNode::leaf("A", "   ").text(), None);
        assert!(TagNode::leaf("A", "").is_leaf());
    }

    #[test]
    fn test_attributes_from_iter() {
        let attrs: Attributes = [("b", "2"), ("a", "1")].into_iter().collect();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.iter().next(), Some(("a", "1")));
        assert!(Attributes::new().is_empty());
    }

    #[test]
    fn test_branch_with_attribute() {
        let node = TagNode::branch("NATION", [TagNode::leaf("NAME", "Testland")])
            .with_attribute("id", "testland");
        assert_eq!(node.attributes.get("id"), Some("testland"));
        assert_eq!(node.child("NAME").and_then(TagNode::text), Some("Testland"));
        assert!(node.child("MISSING").is_none());
    }
}
