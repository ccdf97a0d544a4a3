//! Declarative factories for building products from tag trees.
//!
//! A [`Factory`] maps child tag names to [`TagHandler`]s and walks a
//! [`TagNode`](crate::tree::TagNode) depth first, storing converted values
//! or the products of child factories. Shapes that know how to build
//! themselves implement [`Buildable`].

mod buildable;
mod core;
mod dispatch;

pub use self::buildable::Buildable;
pub use self::core::{Factory, FactoryState};
pub use self::dispatch::{CreateFn, DispatchTable, TagHandler};
