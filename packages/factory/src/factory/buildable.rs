//! Capability trait for types built by a factory.

use crate::error::{NsError, Result};
use crate::tree::{parse_document, Attributes, TagNode};
use crate::value::Product;

use super::core::Factory;

/// A type that can be built from a tag tree.
///
/// Implementors describe their tag layout in [`factory`](Self::factory)
/// and convert the finished [`Product`] in
/// [`from_product`](Self::from_product). Both are required, so a shape
/// without a factory does not compile.
pub trait Buildable: Sized + 'static {
    /// Tag of the element this type is built from.
    const TAG: &'static str;

    /// Create a factory for one element, given the element's attributes.
    fn factory(attributes: &Attributes) -> Result<Factory>;

    /// Convert a finished product into the typed value.
    fn from_product(product: Product) -> Result<Self>;

    /// Build from a node whose tag is [`TAG`](Self::TAG).
    fn from_node(node: &TagNode) -> Result<Self> {
        let product = Self::factory(&node.attributes)?.build(node)?;
        Self::from_product(product)
    }

    /// Parse an XML payload and build from the first element tagged
    /// [`TAG`](Self::TAG), which may be the root itself.
    ///
    /// # Errors
    /// `Xml` when the payload is malformed; `PropertyMissing` naming the
    /// tag when the payload does not contain it.
    fn from_xml(xml: &str) -> Result<Self> {
        let root = parse_document(xml)?;
        let node = root
            .find(Self::TAG)
            .ok_or_else(|| NsError::missing(Self::TAG, None))?;
        Self::from_node(node)
    }
}
