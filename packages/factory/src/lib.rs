//! NationScript factories - build typed NationStates objects from XML.
//!
//! The NationStates API answers in XML. Rather than hand-writing a parser
//! per response shape, each shape registers a [`Factory`]: a table mapping
//! tag names to [`TagHandler`]s that convert a tag's text or delegate its
//! children to a nested factory. Feeding the parsed tree through the
//! factory yields a [`Product`], which the shape converts into its typed
//! form.
//!
//! # Example
//!
//! ```
//! use nationscript_factory::shapes::Market;
//! use nationscript_factory::Buildable;
//!
//! let xml = "<MARKET>\
//!     <NATION>testland</NATION>\
//!     <PRICE>12.5</PRICE>\
//!     <TYPE>ask</TYPE>\
//!     <TIMESTAMP>1000</TIMESTAMP>\
//!     </MARKET>";
//! let market = Market::from_xml(xml).unwrap();
//! assert_eq!(market.nation, "testland");
//! assert!(market.is_ask);
//! ```
//!
//! # Architecture
//!
//! - [`error`]: Error taxonomy and Result alias
//! - [`config`]: Constants and factory policies
//! - [`tree`]: Owned tag trees and XML conversion
//! - [`value`]: Built values and products
//! - [`convert`]: Converters from raw text to values
//! - [`factory`]: Factories, dispatch tables and the `Buildable` trait
//! - [`shapes`]: Typed API shapes built with factories

pub mod config;
pub mod convert;
pub mod error;
pub mod factory;
pub mod shapes;
pub mod tree;
pub mod value;

// Re-export commonly used items
pub use config::FactoryConfig;
pub use error::{ApiError, ErrorKind, NsError, Result};
pub use factory::{Buildable, Factory, FactoryState, TagHandler};
pub use tree::{parse_document, Attributes, TagNode};
pub use value::{Product, Value};
