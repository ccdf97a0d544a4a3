//! Tag handlers and the per-factory dispatch table.

use std::collections::HashMap;
use std::fmt;

use crate::config::{DuplicateHandlerPolicy, FactoryConfig, UnknownTagPolicy};
use crate::convert::{self, Converter, Field};
use crate::error::{qualify, NsError, Result};
use crate::tree::{Attributes, TagNode};
use crate::value::{Product, Value};

use super::buildable::Buildable;
use super::core::Factory;

/// Function creating a child factory from the attributes of its root tag.
pub type CreateFn = dyn Fn(&Attributes) -> Result<Factory>;

enum Action {
    /// Convert the tag text and store it.
    Convert(Box<Converter>),
    /// Build the tag's children with a child factory and store its product.
    Delegate(Box<CreateFn>),
    /// Build every `item_tag` child with its own child factory and store the list.
    List {
        item_tag: String,
        create: Box<CreateFn>,
    },
}

/// What a factory does with one tag: the property it fills and how.
pub struct TagHandler {
    property: String,
    action: Action,
    optional: bool,
}

impl TagHandler {
    /// Store the tag text under `property`, run through `converter`.
    ///
    /// # Examples
    /// ```
    /// use nationscript_factory::{convert, TagHandler};
    ///
    /// let handler = TagHandler::build("bank", convert::number);
    /// assert_eq!(handler.property(), "bank");
    /// assert!(!handler.is_optional());
    /// ```
    pub fn build(
        property: impl Into<String>,
        converter: impl Fn(&Field<'_>) -> Result<Value> + 'static,
    ) -> Self {
        Self::new(property, Action::Convert(Box::new(converter)))
    }

    /// Store the tag text under `property` unchanged.
    pub fn text(property: impl Into<String>) -> Self {
        Self::build(property, convert::text)
    }

    /// Build the tag's children with the factory returned by `create` and
    /// store its product under `property`.
    pub fn delegate(
        property: impl Into<String>,
        create: impl Fn(&Attributes) -> Result<Factory> + 'static,
    ) -> Self {
        Self::new(property, Action::Delegate(Box::new(create)))
    }

    /// Build every `item_tag` child of the tag with its own factory and
    /// store the products, in document order, as a list under `property`.
    pub fn list(
        property: impl Into<String>,
        item_tag: impl Into<String>,
        create: impl Fn(&Attributes) -> Result<Factory> + 'static,
    ) -> Self {
        Self::new(
            property,
            Action::List {
                item_tag: item_tag.into(),
                create: Box::new(create),
            },
        )
    }

    /// [`delegate`](Self::delegate) to the factory of a [`Buildable`] type.
    pub fn nested<T: Buildable>(property: impl Into<String>) -> Self {
        Self::delegate(property, T::factory)
    }

    /// [`list`](Self::list) of a [`Buildable`] type, keyed on its tag.
    pub fn list_of<T: Buildable>(property: impl Into<String>) -> Self {
        Self::list(property, T::TAG, T::factory)
    }

    /// Mark the property as optional: finalising does not require it.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Output property this handler fills.
    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    fn new(property: impl Into<String>, action: Action) -> Self {
        Self {
            property: property.into(),
            action,
            optional: false,
        }
    }

    /// Produce the value for `node`, or `None` when an optional tag
    /// arrived without text.
    ///
    /// `parent` is the dotted path of the product being built.
    pub(crate) fn run(
        &self,
        node: &TagNode,
        parent: Option<&str>,
        config: &FactoryConfig,
    ) -> Result<Option<Value>> {
        match &self.action {
            Action::Convert(_) if self.optional && node.text().is_none() => {
                tracing::trace!(
                    tag = %node.tag,
                    parent = ?parent,
                    "Skipping empty optional tag"
                );
                Ok(None)
            }
            Action::Convert(converter) => {
                let field = Field::new(&self.property, node.text())
                    .within(parent)
                    .with_attributes(&node.attributes);
                converter(&field).map(Some)
            }
            Action::Delegate(create) => {
                let path = qualify(parent, &self.property);
                let product = build_child(create, node, path, config)?;
                Ok(Some(Value::Object(product)))
            }
            Action::List { item_tag, create } => {
                let path = qualify(parent, &self.property);
                let mut items = Vec::new();
                for child in &node.children {
                    if child.tag == *item_tag {
                        let item_path = format!("{path}[{}]", items.len());
                        items.push(Value::Object(build_child(create, child, item_path, config)?));
                    } else {
                        unknown_tag(config, &child.tag, Some(path.as_str()))?;
                    }
                }
                Ok(Some(Value::List(items)))
            }
        }
    }
}

impl fmt::Debug for TagHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match &self.action {
            Action::Convert(_) => "convert".to_string(),
            Action::Delegate(_) => "delegate".to_string(),
            Action::List { item_tag, .. } => format!("list of <{item_tag}>"),
        };
        f.debug_struct("TagHandler")
            .field("property", &self.property)
            .field("action", &action)
            .field("optional", &self.optional)
            .finish()
    }
}

fn build_child(
    create: &CreateFn,
    node: &TagNode,
    path: String,
    config: &FactoryConfig,
) -> Result<Product> {
    let mut child = create(&node.attributes)?;
    child.adopt(path, *config);
    child.build(node)
}

/// Apply the unknown-tag policy to a tag without a handler.
pub(crate) fn unknown_tag(config: &FactoryConfig, tag: &str, parent: Option<&str>) -> Result<()> {
    match config.unknown_tags {
        UnknownTagPolicy::Ignore => {
            tracing::debug!(tag = %tag, parent = ?parent, "Ignoring tag without handler");
            Ok(())
        }
        UnknownTagPolicy::Reject => Err(NsError::UnexpectedTag {
            tag: tag.to_string(),
            parent: parent.map(str::to_string),
        }),
    }
}

/// Mapping from tag name to handler.
///
/// Registration order is remembered so that missing required properties
/// are reported deterministically.
#[derive(Debug, Default)]
pub struct DispatchTable {
    handlers: HashMap<String, TagHandler>,
    order: Vec<String>,
}

impl DispatchTable {
    /// Create a new empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a tag name, honouring the duplicate policy.
    pub fn register(
        &mut self,
        tag: impl Into<String>,
        handler: TagHandler,
        policy: DuplicateHandlerPolicy,
    ) -> Result<()> {
        let tag = tag.into();
        if self.handlers.contains_key(&tag) {
            match policy {
                DuplicateHandlerPolicy::Reject => return Err(NsError::DuplicateHandler { tag }),
                DuplicateHandlerPolicy::Overwrite => {
                    tracing::warn!(
                        tag = %tag,
                        property = handler.property(),
                        "Overwriting tag handler"
                    );
                }
            }
        } else {
            self.order.push(tag.clone());
        }
        self.handlers.insert(tag, handler);
        Ok(())
    }

    /// Get the handler for a tag name.
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&TagHandler> {
        self.handlers.get(tag)
    }

    /// Check if a handler is registered for a tag.
    #[must_use]
    pub fn has_handler(&self, tag: &str) -> bool {
        self.handlers.contains_key(tag)
    }

    /// Registered tag names, in registration order.
    pub fn registered_tags(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Properties of all non-optional handlers, in registration order.
    pub fn required_properties(&self) -> impl Iterator<Item = &str> {
        self.order
            .iter()
            .filter_map(|tag| self.handlers.get(tag))
            .filter(|handler| !handler.optional)
            .map(TagHandler::property)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
