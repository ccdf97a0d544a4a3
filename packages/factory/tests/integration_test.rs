//! End-to-end tests: XML payloads through factories into typed shapes.

use std::fs;
use std::path::Path;
use std::sync::Once;

use pretty_assertions::assert_eq;
use serde_json::json;

use nationscript_factory::config::{FactoryConfig, UnknownTagPolicy};
use nationscript_factory::convert;
use nationscript_factory::shapes::{CardCategory, CardInfo, Market, NationEconomy, SectorsData};
use nationscript_factory::{
    parse_document, ApiError, Buildable, ErrorKind, Factory, FactoryState, NsError, TagHandler,
    TagNode,
};

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Load fixture file content.
fn load_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

/// Untyped market factory, registered the same way a caller would.
fn market_factory() -> Factory {
    Factory::new()
        .on_tag("NATION", TagHandler::text("nation"))
        .and_then(|f| f.on_tag("PRICE", TagHandler::build("bank", convert::number)))
        .and_then(|f| f.on_tag("TYPE", TagHandler::build("isAsk", convert::equals("ask"))))
        .and_then(|f| f.on_tag("TIMESTAMP", TagHandler::build("timestamp", convert::integer)))
        .unwrap()
}

#[test]
fn test_market_product_shape() {
    init_tracing();
    let root = parse_document(&load_fixture("market.xml")).unwrap();
    let product = market_factory().build(&root).unwrap();

    assert_eq!(
        serde_json::to_value(&product).unwrap(),
        json!({ "nation": "testland", "bank": 12.5, "isAsk": true, "timestamp": 1000 })
    );
}

#[test]
fn test_market_typed() {
    init_tracing();
    let market = Market::from_xml(&load_fixture("market.xml")).unwrap();

    assert_eq!(
        market,
        Market {
            nation: "testland".to_string(),
            bank: 12.5,
            is_ask: true,
            timestamp: 1000,
        }
    );
}

#[test]
fn test_sectors_breakdown() {
    init_tracing();
    let sectors = SectorsData::from_xml(&load_fixture("sectors.xml")).unwrap();

    assert_eq!(
        serde_json::to_value(sectors).unwrap(),
        json!({ "blackMarket": 1.5, "government": 20.0, "private": 70.0, "stateOwned": 8.5 })
    );
}

#[test]
fn test_card_with_markets_and_unknown_tags() {
    init_tracing();
    let card = CardInfo::from_xml(&load_fixture("card.xml")).unwrap();

    assert_eq!(card.id, 1234);
    assert_eq!(card.season, 3);
    assert_eq!(card.category, CardCategory::Rare);
    assert_eq!(card.region.as_deref(), Some("The Test Region"));
    assert_eq!(
        card.markets
            .iter()
            .map(|m| (m.nation.as_str(), m.bank, m.is_ask))
            .collect::<Vec<_>>(),
        vec![("collector", 0.5, false), ("dealer", 0.75, true)]
    );
}

#[test]
fn test_nation_economy_ignores_unknown_tags() {
    init_tracing();
    let nation = NationEconomy::from_xml(&load_fixture("nation.xml")).unwrap();

    assert_eq!(
        serde_json::to_value(&nation).unwrap(),
        json!({
            "id": "testland",
            "name": "Testland",
            "currency": "Kro",
            "sectors": {
                "blackMarket": 1.5,
                "government": 20.0,
                "private": 70.0,
                "stateOwned": 8.5
            }
        })
    );
}

#[test]
fn test_strict_config_rejects_unknown_tags() {
    init_tracing();
    let config = FactoryConfig::from_yaml_str("unknown-tags: reject").unwrap();
    assert_eq!(config.unknown_tags, UnknownTagPolicy::Reject);

    let root = parse_document(&load_fixture("nation.xml")).unwrap();
    let factory = NationEconomy::factory(&root.attributes)
        .unwrap()
        .with_config(config);

    let err = factory.build(&root).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedTag);
    assert_eq!(err.to_string(), "No handler for tag <ANIMAL>");
}

#[test]
fn test_unregistered_tag_contributes_nothing() {
    let root = TagNode::branch(
        "MARKET",
        [
            TagNode::leaf("NATION", "testland"),
            TagNode::leaf("PRICE", "12.5"),
            TagNode::leaf("COMMENT", "new upstream tag"),
            TagNode::leaf("TYPE", "bid"),
            TagNode::leaf("TIMESTAMP", "1000"),
        ],
    );
    let product = market_factory().build(&root).unwrap();

    assert_eq!(product.len(), 4);
    assert!(!product.contains("COMMENT"));
    assert!(!product.bool("isAsk").unwrap());
}

#[test]
fn test_finalised_factory_is_sealed() {
    let mut factory = market_factory();
    let root = parse_document(&load_fixture("market.xml")).unwrap();
    factory.process_children(&root).unwrap();
    factory.finalise().unwrap();
    assert_eq!(factory.state(), FactoryState::Finalised);

    for node in &root.children {
        assert_eq!(
            factory.process(node).unwrap_err().kind(),
            ErrorKind::FactoryFinalised
        );
    }
    assert!(matches!(factory.finalise(), Err(NsError::FactoryFinalised)));

    // the product is unaffected by the refused input
    assert_eq!(factory.product().unwrap().text("nation").unwrap(), "testland");
}

#[test]
fn test_withheld_factory_never_yields_partial_product() {
    let mut factory = market_factory();
    factory.process(&TagNode::leaf("NATION", "testland")).unwrap();
    factory.withhold().unwrap();

    assert!(matches!(factory.product(), Err(NsError::ProductWithheld)));
    assert!(matches!(factory.into_product(), Err(NsError::ProductWithheld)));
}

#[test]
fn test_malformed_payload() {
    let err = Market::from_xml("<MARKET><PRICE>1</MARKET>").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Xml);
    assert!(err.is_malformed_data());
}

#[test]
fn test_payload_without_expected_tag() {
    let err = SectorsData::from_xml("<NATION id=\"testland\"/>").unwrap_err();
    assert_eq!(err.to_string(), "Missing property: SECTORS");
}

#[test]
fn test_ratelimit_hint() {
    let err = NsError::from(ApiError::ratelimit_from_header(Some("45")));
    assert_eq!(err.retry_after().map(|d| d.as_secs()), Some(45));

    let err = NsError::from(ApiError::ratelimit_from_header(None));
    assert_eq!(err.retry_after().map(|d| d.as_secs()), Some(30));
}
