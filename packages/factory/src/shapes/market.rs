//! Trading card market entries.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::ASK_SENTINEL;
use crate::convert;
use crate::error::Result;
use crate::factory::{Buildable, Factory, TagHandler};
use crate::tree::Attributes;
use crate::value::Product;

/// An open ask or bid on a trading card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    /// Nation that placed the order.
    pub nation: String,
    /// Price in bank.
    pub bank: f64,
    /// `true` for an ask, `false` for a bid.
    pub is_ask: bool,
    /// Unix timestamp of the order.
    pub timestamp: i64,
}

impl Market {
    /// Time the order was placed, if the timestamp is in range.
    #[must_use]
    pub fn traded_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

impl Buildable for Market {
    const TAG: &'static str = "MARKET";

    fn factory(attributes: &Attributes) -> Result<Factory> {
        Factory::with_attributes(attributes.clone())
            .on_tag("NATION", TagHandler::text("nation"))?
            .on_tag("PRICE", TagHandler::build("bank", convert::number))?
            .on_tag("TYPE", TagHandler::build("isAsk", convert::equals(ASK_SENTINEL)))?
            .on_tag("TIMESTAMP", TagHandler::build("timestamp", convert::integer))
    }

    fn from_product(product: Product) -> Result<Self> {
        Ok(Self {
            nation: product.text("nation")?.to_string(),
            bank: product.number("bank")?,
            is_ask: product.bool("isAsk")?,
            timestamp: product.integer("timestamp")?,
        })
    }
}
