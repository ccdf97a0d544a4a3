//! The factory: a stateful builder fed one tag at a time.

use std::fmt;

use crate::config::FactoryConfig;
use crate::error::{NsError, Result};
use crate::tree::{Attributes, TagNode};
use crate::value::{Product, Value};

use super::dispatch::{unknown_tag, DispatchTable, TagHandler};

/// Lifecycle state of a [`Factory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactoryState {
    /// Accepting tags.
    Building,
    /// Accepting tags, but refusing to hand out its product.
    Withheld,
    /// Complete. The product is readable and no further input is accepted.
    Finalised,
}

/// Builds one [`Product`] from the children of a tag.
///
/// A factory owns a dispatch table mapping child tag names to
/// [`TagHandler`]s. Each processed child is routed to its handler, which
/// stores a converted value or the product of a child factory. Once
/// finalised, the factory rejects further input with
/// `NsError::FactoryFinalised`.
///
/// # Examples
/// ```
/// use nationscript_factory::{convert, Factory, TagHandler, TagNode};
///
/// let factory = Factory::new()
///     .on_tag("NATION", TagHandler::text("nation"))?
///     .on_tag("PRICE", TagHandler::build("bank", convert::number))?;
///
/// let root = TagNode::branch("MARKET", [
///     TagNode::leaf("NATION", "testland"),
///     TagNode::leaf("PRICE", "12.5"),
/// ]);
/// let product = factory.build(&root)?;
/// assert_eq!(product.text("nation")?, "testland");
/// assert_eq!(product.number("bank")?, 12.5);
/// # Ok::<(), nationscript_factory::NsError>(())
/// ```
pub struct Factory {
    state: FactoryState,
    attributes: Attributes,
    product: Product,
    dispatch: DispatchTable,
    config: FactoryConfig,
}

impl Factory {
    /// Create a top-level factory with no root attributes.
    #[must_use]
    pub fn new() -> Self {
        Self::with_attributes(Attributes::new())
    }

    /// Create a top-level factory for a root tag carrying `attributes`.
    #[must_use]
    pub fn with_attributes(attributes: Attributes) -> Self {
        Self {
            state: FactoryState::Building,
            attributes,
            product: Product::new(),
            dispatch: DispatchTable::new(),
            config: FactoryConfig::default(),
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: FactoryConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn state(&self) -> FactoryState {
        self.state
    }

    /// Attributes of the root tag.
    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    #[must_use]
    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Dotted path of the property this factory builds, if nested.
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.product.parent()
    }

    #[must_use]
    pub fn dispatch(&self) -> &DispatchTable {
        &self.dispatch
    }

    /// Register a handler for a child tag.
    ///
    /// # Errors
    /// `FactoryFinalised` once finalised; `DuplicateHandler` when the tag
    /// is already registered and the configuration rejects duplicates.
    pub fn register(&mut self, tag: impl Into<String>, handler: TagHandler) -> Result<()> {
        self.ensure_open()?;
        self.dispatch
            .register(tag, handler, self.config.duplicate_handlers)
    }

    /// Chaining form of [`register`](Self::register).
    pub fn on_tag(mut self, tag: impl Into<String>, handler: TagHandler) -> Result<Self> {
        self.register(tag, handler)?;
        Ok(self)
    }

    /// Store a value directly, typically derived from the root attributes.
    pub fn preset(mut self, property: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        self.ensure_open()?;
        self.product.insert(property, value);
        Ok(self)
    }

    /// Dispatch a single child tag to its handler.
    ///
    /// Tags without a handler are ignored or rejected according to the
    /// unknown-tag policy. Errors from handlers propagate unchanged; the
    /// factory should be discarded after one.
    pub fn process(&mut self, node: &TagNode) -> Result<()> {
        self.ensure_open()?;

        let Some(handler) = self.dispatch.get(&node.tag) else {
            return unknown_tag(&self.config, &node.tag, self.product.parent());
        };

        tracing::trace!(
            tag = %node.tag,
            property = handler.property(),
            parent = ?self.product.parent(),
            "Dispatching tag"
        );
        if let Some(value) = handler.run(node, self.product.parent(), &self.config)? {
            self.product.insert(handler.property(), value);
        }
        Ok(())
    }

    /// Dispatch every child of `node`, in document order.
    pub fn process_children(&mut self, node: &TagNode) -> Result<()> {
        node.children.iter().try_for_each(|child| self.process(child))
    }

    /// Refuse to hand out the product until [`resume`](Self::resume) or
    /// [`finalise`](Self::finalise) is called.
    pub fn withhold(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.transition(FactoryState::Withheld);
        Ok(())
    }

    /// Leave the withheld state.
    pub fn resume(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.transition(FactoryState::Building);
        Ok(())
    }

    /// Complete the product.
    ///
    /// # Errors
    /// `FactoryFinalised` when called twice; `PropertyMissing` naming the
    /// first required property, in registration order, that was never
    /// filled. A failed check leaves the state unchanged.
    pub fn finalise(&mut self) -> Result<()> {
        self.ensure_open()?;

        if let Some(property) = self
            .dispatch
            .required_properties()
            .find(|property| !self.product.contains(property))
        {
            return Err(NsError::missing(property, self.product.parent()));
        }

        self.transition(FactoryState::Finalised);
        Ok(())
    }

    /// Borrow the finished product.
    ///
    /// # Errors
    /// `ProductWithheld` unless the factory is finalised.
    pub fn product(&self) -> Result<&Product> {
        match self.state {
            FactoryState::Finalised => Ok(&self.product),
            FactoryState::Building | FactoryState::Withheld => Err(NsError::ProductWithheld),
        }
    }

    /// Take the finished product.
    pub fn into_product(self) -> Result<Product> {
        match self.state {
            FactoryState::Finalised => Ok(self.product),
            FactoryState::Building | FactoryState::Withheld => Err(NsError::ProductWithheld),
        }
    }

    /// Process all children of `root`, finalise and return the product.
    pub fn build(mut self, root: &TagNode) -> Result<Product> {
        self.process_children(root)?;
        self.finalise()?;
        self.into_product()
    }

    /// Attach a child factory to its parent's property path and policies.
    pub(crate) fn adopt(&mut self, path: String, config: FactoryConfig) {
        self.product.set_parent(Some(path));
        self.config = config;
    }

    fn ensure_open(&self) -> Result<()> {
        match self.state {
            FactoryState::Finalised => Err(NsError::FactoryFinalised),
            FactoryState::Building | FactoryState::Withheld => Ok(()),
        }
    }

    fn transition(&mut self, to: FactoryState) {
        tracing::trace!(
            from = ?self.state,
            to = ?to,
            parent = ?self.product.parent(),
            "Factory state change"
        );
        self.state = to;
    }
}

impl Default for Factory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("state", &self.state)
            .field("parent", &self.product.parent())
            .field("attributes", &self.attributes)
            .field("properties", &self.product.len())
            .field("dispatch", &self.dispatch)
            .field("config", &self.config)
            .finish()
    }
}
