//! Trading card details.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::convert::{self, Field};
use crate::error::{NsError, Result};
use crate::factory::{Buildable, Factory, TagHandler};
use crate::tree::Attributes;
use crate::value::{Product, Value};

use super::market::Market;

/// Rarity of a trading card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardCategory {
    Common,
    Uncommon,
    Rare,
    UltraRare,
    Epic,
    Legendary,
}

impl CardCategory {
    const NAMES: &'static [&'static str] =
        &["common", "uncommon", "rare", "ultra-rare", "epic", "legendary"];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Uncommon => "uncommon",
            Self::Rare => "rare",
            Self::UltraRare => "ultra-rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        }
    }
}

impl FromStr for CardCategory {
    type Err = NsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "common" => Ok(Self::Common),
            "uncommon" => Ok(Self::Uncommon),
            "rare" => Ok(Self::Rare),
            "ultra-rare" => Ok(Self::UltraRare),
            "epic" => Ok(Self::Epic),
            "legendary" => Ok(Self::Legendary),
            other => Err(NsError::invalid("category", other, None)),
        }
    }
}

impl fmt::Display for CardCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trading card, as returned by the card info shard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardInfo {
    /// Card id, equal to the depicted nation's id.
    pub id: i64,
    pub season: i64,
    /// Name of the depicted nation.
    pub name: String,
    pub region: Option<String>,
    pub category: CardCategory,
    pub market_value: f64,
    /// Open asks and bids; empty when the markets shard was not requested.
    pub markets: Vec<Market>,
}

impl Buildable for CardInfo {
    const TAG: &'static str = "CARD";

    fn factory(attributes: &Attributes) -> Result<Factory> {
        let id = attribute(attributes, "id")?;
        let season = attribute(attributes, "season")?;

        Factory::with_attributes(attributes.clone())
            .preset("id", id)?
            .preset("season", season)?
            .on_tag("NAME", TagHandler::text("name"))?
            .on_tag("REGION", TagHandler::text("region").optional())?
            .on_tag(
                "CATEGORY",
                TagHandler::build("category", convert::one_of(CardCategory::NAMES)),
            )?
            .on_tag("MARKET_VALUE", TagHandler::build("marketValue", convert::number))?
            .on_tag("MARKETS", TagHandler::list_of::<Market>("markets").optional())
    }

    fn from_product(mut product: Product) -> Result<Self> {
        let markets = if product.contains("markets") {
            product
                .objects("markets")?
                .into_iter()
                .map(Market::from_product)
                .collect::<Result<Vec<_>>>()?
        } else {
            Vec::new()
        };

        Ok(Self {
            id: product.integer("id")?,
            season: product.integer("season")?,
            name: product.text("name")?.to_string(),
            region: product.opt_text("region")?.map(str::to_string),
            category: product.text("category")?.parse()?,
            market_value: product.number("marketValue")?,
            markets,
        })
    }
}

/// Read a whole-number attribute of the root tag.
fn attribute(attributes: &Attributes, name: &str) -> Result<Value> {
    convert::integer(&Field::new(name, attributes.get(name)))
}
