//! Economic overview of a nation.

use serde::Serialize;

use crate::error::{NsError, Result};
use crate::factory::{Buildable, Factory, TagHandler};
use crate::tree::Attributes;
use crate::value::Product;

use super::sectors::SectorsData;

/// Name, currency and GDP sector breakdown of a nation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NationEconomy {
    /// Nation id, from the `id` attribute of the root tag.
    pub id: String,
    pub name: String,
    pub currency: Option<String>,
    pub sectors: SectorsData,
}

impl Buildable for NationEconomy {
    const TAG: &'static str = "NATION";

    fn factory(attributes: &Attributes) -> Result<Factory> {
        let id = attributes
            .get("id")
            .ok_or_else(|| NsError::missing("id", None))?
            .to_string();

        Factory::with_attributes(attributes.clone())
            .preset("id", id)?
            .on_tag("NAME", TagHandler::text("name"))?
            .on_tag("CURRENCY", TagHandler::text("currency").optional())?
            .on_tag("SECTORS", TagHandler::nested::<SectorsData>("sectors"))
    }

    fn from_product(mut product: Product) -> Result<Self> {
        let sectors = SectorsData::from_product(product.object("sectors")?)?;
        Ok(Self {
            id: product.text("id")?.to_string(),
            name: product.text("name")?.to_string(),
            currency: product.opt_text("currency")?.map(str::to_string),
            sectors,
        })
    }
}
