// ═══════════════════════════════════════════════════════════════════
// Model Tests — AssetId, AssetMap, Portfolio, results, wire shapes
// ═══════════════════════════════════════════════════════════════════

use profit_gazer_core::errors::{PredictionError, ValidationError};
use profit_gazer_core::models::allocation::{adjust_allocation, AssetMap};
use profit_gazer_core::models::asset::{display_name, find_asset, AssetId, DEFAULT_ASSETS};
use profit_gazer_core::models::portfolio::{ChangeConvention, Portfolio};
use profit_gazer_core::models::prediction::{PredictionResponse, SimulationResponse};
use profit_gazer_core::models::result::{AssetBreakdownEntry, CalculationResult};
use profit_gazer_core::models::settings::{Settings, DEFAULT_MODEL};

// ═══════════════════════════════════════════════════════════════════
// AssetId
// ═══════════════════════════════════════════════════════════════════

mod asset_id {
    use super::*;

    #[test]
    fn uppercases_and_trims() {
        let id = AssetId::new("  btc ").unwrap();
        assert_eq!(id.as_str(), "BTC");
        assert_eq!(id.to_string(), "BTC");
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(
            AssetId::new("   "),
            Err(ValidationError::InvalidAssetId("   ".into()))
        );
    }

    #[test]
    fn free_form_symbols_allowed() {
        let id = AssetId::new("my-token").unwrap();
        assert_eq!(id.as_str(), "MY-TOKEN");
    }

    #[test]
    fn deserialize_normalizes() {
        let id: AssetId = serde_json::from_str("\"eth\"").unwrap();
        assert_eq!(id.as_str(), "ETH");
        assert!(serde_json::from_str::<AssetId>("\"\"").is_err());
    }

    #[test]
    fn catalogue_lookup() {
        assert_eq!(DEFAULT_ASSETS.len(), 5);
        assert_eq!(find_asset("sol").map(|a| a.name), Some("Solana"));
        assert_eq!(find_asset("Bitcoin").map(|a| a.symbol), Some("BTC"));
        assert!(find_asset("DOGE").is_none());
    }

    #[test]
    fn display_name_falls_back_to_symbol() {
        assert_eq!(display_name(&AssetId::new("SUI").unwrap()), "Sui");
        assert_eq!(display_name(&AssetId::new("PEPE").unwrap()), "PEPE");
    }
}

// ═══════════════════════════════════════════════════════════════════
// AssetMap
// ═══════════════════════════════════════════════════════════════════

mod asset_map {
    use super::*;

    #[test]
    fn from_pairs_keeps_order() {
        let map = AssetMap::from_pairs([("SUI", 5.0), ("BTC", 95.0)]).unwrap();
        let ids: Vec<&str> = map.ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["SUI", "BTC"]);
        assert_eq!(map.len(), 2);
        assert!((map.total() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn from_pairs_rejects_duplicates_case_insensitively() {
        let err = AssetMap::from_pairs([("btc", 50.0), ("BTC", 50.0)]).unwrap_err();
        assert_eq!(err, ValidationError::DuplicateAsset(AssetId::new("BTC").unwrap()));
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut map = AssetMap::from_pairs([("BTC", 10.0), ("ETH", 20.0)]).unwrap();
        let old = map.insert(AssetId::new("BTC").unwrap(), 80.0);
        assert_eq!(old, Some(10.0));
        let entries: Vec<(String, f64)> = map.iter().map(|(k, v)| (k.to_string(), v)).collect();
        assert_eq!(entries, vec![("BTC".into(), 80.0), ("ETH".into(), 20.0)]);
    }

    #[test]
    fn remove_and_lookup() {
        let mut map = AssetMap::from_pairs([("BTC", 10.0), ("ETH", 20.0)]).unwrap();
        assert_eq!(map.get_symbol("eth"), Some(20.0));
        assert_eq!(map.remove(&AssetId::new("ETH").unwrap()), Some(20.0));
        assert_eq!(map.get_symbol("ETH"), None);
        assert_eq!(map.remove(&AssetId::new("ETH").unwrap()), None);
    }

    #[test]
    fn empty_map() {
        let map = AssetMap::new();
        assert!(map.is_empty());
        assert_eq!(map.total(), 0.0);
    }

    #[test]
    fn serializes_as_object_in_insertion_order() {
        let map = AssetMap::from_pairs([("SOL", 15.0), ("BTC", 85.0)]).unwrap();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"SOL":15.0,"BTC":85.0}"#);
    }

    #[test]
    fn deserializes_in_document_order() {
        let map: AssetMap = serde_json::from_str(r#"{"xrp":10,"ETH":90}"#).unwrap();
        let ids: Vec<&str> = map.ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["XRP", "ETH"]);
    }

    #[test]
    fn deserialize_rejects_duplicate_keys() {
        let result: Result<AssetMap, _> = serde_json::from_str(r#"{"BTC":10,"btc":90}"#);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Duplicate asset"), "{err}");
    }

    #[test]
    fn deserialize_rejects_non_numbers() {
        assert!(serde_json::from_str::<AssetMap>(r#"{"BTC":"ten"}"#).is_err());
        assert!(serde_json::from_str::<AssetMap>("[1,2]").is_err());
    }
}

// ═══════════════════════════════════════════════════════════════════
// adjust_allocation (form +/- buttons)
// ═══════════════════════════════════════════════════════════════════

mod adjust {
    use super::*;

    #[test]
    fn steps_up_and_down() {
        let mut map = AssetMap::from_pairs([("BTC", 40.0)]).unwrap();
        let btc = AssetId::new("BTC").unwrap();
        assert_eq!(adjust_allocation(&mut map, &btc, 5.0), 45.0);
        assert_eq!(adjust_allocation(&mut map, &btc, -10.0), 35.0);
        assert_eq!(map.get(&btc), Some(35.0));
    }

    #[test]
    fn clamps_to_bounds() {
        let mut map = AssetMap::from_pairs([("BTC", 98.0), ("ETH", 2.0)]).unwrap();
        let btc = AssetId::new("BTC").unwrap();
        let eth = AssetId::new("ETH").unwrap();
        assert_eq!(adjust_allocation(&mut map, &btc, 5.0), 100.0);
        assert_eq!(adjust_allocation(&mut map, &eth, -5.0), 0.0);
    }

    #[test]
    fn adds_missing_asset() {
        let mut map = AssetMap::new();
        let sol = AssetId::new("SOL").unwrap();
        assert_eq!(adjust_allocation(&mut map, &sol, 1.0), 1.0);
        assert!(map.contains(&sol));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Portfolio & ChangeConvention
// ═══════════════════════════════════════════════════════════════════

mod portfolio {
    use super::*;

    #[test]
    fn default_convention_is_percent() {
        assert_eq!(ChangeConvention::default(), ChangeConvention::PriceChangePercent);
        let p = Portfolio::new(100.0, AssetMap::new(), AssetMap::new());
        assert_eq!(p.convention, ChangeConvention::PriceChangePercent);
        let p = Portfolio::with_return_rates(100.0, AssetMap::new(), AssetMap::new());
        assert_eq!(p.convention, ChangeConvention::ReturnRate);
    }

    #[test]
    fn conventions_apply_differently() {
        assert!((ChangeConvention::PriceChangePercent.apply(1000.0, 10.0) - 100.0).abs() < 1e-9);
        assert!((ChangeConvention::ReturnRate.apply(1000.0, 0.1) - 100.0).abs() < 1e-9);
        assert!((ChangeConvention::ReturnRate.apply(1000.0, 10.0) - 10_000.0).abs() < 1e-9);
    }

    #[test]
    fn convention_serializes_camel_case() {
        assert_eq!(
            serde_json::to_string(&ChangeConvention::ReturnRate).unwrap(),
            "\"returnRate\""
        );
        assert_eq!(ChangeConvention::PriceChangePercent.to_string(), "price change %");
    }

    #[test]
    fn portfolio_json_defaults_convention() {
        let p: Portfolio = serde_json::from_str(
            r#"{"investment":1000,"allocation":{"BTC":100},"changes":{"BTC":5}}"#,
        )
        .unwrap();
        assert_eq!(p.convention, ChangeConvention::PriceChangePercent);
        assert_eq!(p.allocation.get_symbol("BTC"), Some(100.0));
    }
}

// ═══════════════════════════════════════════════════════════════════
// CalculationResult
// ═══════════════════════════════════════════════════════════════════

mod result {
    use super::*;

    fn sample() -> CalculationResult {
        CalculationResult {
            total_profit_loss: -50.0,
            percentage_change: -5.0,
            final_value: 950.0,
            breakdown: vec![AssetBreakdownEntry {
                asset: AssetId::new("BTC").unwrap(),
                allocation_percent: 100.0,
                price_change: -5.0,
                invested_amount: 1000.0,
                profit_loss: -50.0,
            }],
            narrative: None,
            convention: ChangeConvention::PriceChangePercent,
        }
    }

    #[test]
    fn profit_and_loss_flags() {
        let r = sample();
        assert!(r.is_loss());
        assert!(!r.is_profit());
    }

    #[test]
    fn with_narrative_attaches_text() {
        let r = sample().with_narrative("Bearish week.");
        assert_eq!(r.narrative.as_deref(), Some("Bearish week."));
    }

    #[test]
    fn serializes_with_display_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["totalProfitLoss"], -50.0);
        assert_eq!(json["finalValue"], 950.0);
        assert_eq!(json["breakdown"][0]["name"], "BTC");
        assert_eq!(json["breakdown"][0]["allocation"], 100.0);
        assert_eq!(json["breakdown"][0]["priceChange"], -5.0);
        assert_eq!(json["breakdown"][0]["investedAmount"], 1000.0);
        assert!(json.get("thoughts").is_none());
    }

    #[test]
    fn entry_lookup() {
        let r = sample();
        assert!(r.entry(&AssetId::new("BTC").unwrap()).is_some());
        assert!(r.entry(&AssetId::new("ETH").unwrap()).is_none());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Model response parsing
// ═══════════════════════════════════════════════════════════════════

mod responses {
    use super::*;

    const FULL: &str = r#"{
        "priceChanges": {"BTC": 2.5, "ETH": -1.0},
        "totalProfitLoss": 999,
        "percentageChange": 9.9,
        "finalValue": 1,
        "breakdown": [{"name": "BTC", "allocation": 50, "priceChange": 2.5, "profitLoss": 1}],
        "thoughts": "ETF inflows continue."
    }"#;

    #[test]
    fn parses_full_response() {
        let resp = PredictionResponse::parse(FULL).unwrap();
        assert_eq!(resp.price_changes.get_symbol("BTC"), Some(2.5));
        assert_eq!(resp.total_profit_loss, Some(999.0));
        assert_eq!(resp.breakdown.len(), 1);

        let prediction = resp.into_prediction();
        assert_eq!(prediction.narrative, "ETF inflows continue.");
        assert_eq!(prediction.price_change.get_symbol("ETH"), Some(-1.0));
    }

    #[test]
    fn parses_minimal_response() {
        let resp = PredictionResponse::parse(r#"{"priceChanges":{"SOL":4}}"#).unwrap();
        assert!(resp.total_profit_loss.is_none());
        assert!(resp.thoughts.is_empty());
    }

    #[test]
    fn strips_code_fence() {
        let fenced = format!("```json\n{FULL}\n```");
        assert!(PredictionResponse::parse(&fenced).is_ok());
        let bare_fence = "```\n{\"priceChanges\":{}}\n```";
        assert!(PredictionResponse::parse(bare_fence).is_ok());
    }

    #[test]
    fn rejects_missing_price_changes() {
        let err = PredictionResponse::parse(r#"{"thoughts":"hi"}"#).unwrap_err();
        assert!(matches!(err, PredictionError::InvalidResponse(_)));
    }

    #[test]
    fn simulation_rates_checked_against_count() {
        let resp = SimulationResponse::parse(
            r#"{"scenarios":[{"returnRate":0.1},{"returnRate":-0.3}]}"#,
        )
        .unwrap();
        assert_eq!(resp.clone().into_rates(2).unwrap(), vec![0.1, -0.3]);
        assert_eq!(
            resp.into_rates(3).unwrap_err(),
            PredictionError::ScenarioCountMismatch {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn simulation_rejects_garbage() {
        assert!(SimulationResponse::parse("not json").is_err());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Settings
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.currency, "IDR");
        assert_eq!(s.model, DEFAULT_MODEL);
        assert_eq!(s.horizon_days, 7);
        assert_eq!(s.scenario_count, 5);
        assert!(s.api_keys.is_empty());
    }

    #[test]
    fn lookup_overlays_values() {
        let vars: HashMap<&str, &str> = [
            ("GOOGLE_API_KEY", "g-key"),
            ("PROFIT_GAZER_MODEL", "gemini-1.5-pro"),
            ("PROFIT_GAZER_CURRENCY", " usd "),
        ]
        .into_iter()
        .collect();
        let s = Settings::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(s.api_key("gemini"), Some("g-key"));
        assert_eq!(s.model, "gemini-1.5-pro");
        assert_eq!(s.currency, "USD");
    }

    #[test]
    fn gemini_key_takes_precedence() {
        let s = Settings::from_lookup(|k| match k {
            "GEMINI_API_KEY" => Some("primary".into()),
            "GOOGLE_API_KEY" => Some("secondary".into()),
            _ => None,
        });
        assert_eq!(s.api_key("gemini"), Some("primary"));
    }

    #[test]
    fn blank_values_ignored() {
        let s = Settings::from_lookup(|_| Some("  ".into()));
        assert_eq!(s, Settings::default());
    }
}
