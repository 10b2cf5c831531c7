//! Tests for the filter evaluator.

use super::*;
use crate::record::{Record, Value};

fn event() -> Record {
    Record::new()
        .with("title", "Drumcode Night: Adam Beyer")
        .with("genre", Value::list(["Techno", "Minimal"]))
        .with("artists", Value::list(["Adam Beyer", "Charlotte de Witte"]))
        .with("venue", "Printworks")
        .with("price", 25.0)
        .with("interestedCount", 480.0)
        .with("isTicketed", true)
}

fn matches(filter: &str, record: &Record) -> bool {
    let expr = FilterParser::parse(filter).unwrap();
    FilterEvaluator::new(&expr).matches(record)
}

// ==================== Text Operators ====================

#[test]
fn test_eq_case_insensitive() {
    let record = event();
    assert!(matches("venue:eq:printworks", &record));
    assert!(matches("venue:eq:PRINTWORKS", &record));
    assert!(!matches("venue:eq:print", &record));
}

#[test]
fn test_eq_on_list_matches_any_item() {
    let record = event();
    assert!(matches("genre:eq:techno", &record));
    assert!(!matches("genre:eq:house", &record));
}

#[test]
fn test_eq_with_value_list_means_any() {
    let record = event();
    assert!(matches("venue:eq:fabric,printworks", &record));
    assert!(!matches("venue:eq:fabric,berghain", &record));
}

#[test]
fn test_neq() {
    let record = event();
    assert!(matches("venue:neq:fabric", &record));
    assert!(!matches("venue:neq:Printworks", &record));
    assert!(matches("venue:ne:fabric", &record));
}

#[test]
fn test_has_substring() {
    let record = event();
    assert!(matches("title:has:drumcode", &record));
    assert!(matches("title:has:adam beyer", &record));
    assert!(!matches("title:has:awakenings", &record));
}

#[test]
fn test_has_on_list_items() {
    let record = event();
    assert!(matches("artists:has:charlotte", &record));
    assert!(matches("artists:has:WITTE", &record));
    assert!(!matches("artists:has:amelie", &record));
}

#[test]
fn test_starts_and_ends() {
    let record = event();
    assert!(matches("title:starts:drumcode", &record));
    assert!(!matches("title:starts:night", &record));
    assert!(matches("title:ends:beyer", &record));
    assert!(!matches("title:ends:drumcode", &record));
    assert!(matches("artists:starts:charlotte", &record));
}

#[test]
fn test_bool_field_as_text() {
    let record = event();
    assert!(matches("isTicketed:eq:true", &record));
    assert!(!matches("isTicketed:eq:false", &record));
}

// ==================== List Operators ====================

#[test]
fn test_contains_any() {
    let record = event();
    assert!(matches("genre:contains_any:techno,house", &record));
    assert!(matches("genre:in:house,minimal", &record));
    assert!(!matches("genre:contains_any:house,trance", &record));
}

#[test]
fn test_contains_any_is_whole_item_match() {
    let record = event();
    assert!(!matches("genre:contains_any:tech", &record));
}

#[test]
fn test_contains_all() {
    let record = event();
    assert!(matches("genre:contains_all:techno,minimal", &record));
    assert!(matches("genre:all:MINIMAL", &record));
    assert!(!matches("genre:contains_all:techno,house", &record));
}

#[test]
fn test_contains_none() {
    let record = event();
    assert!(matches("genre:contains_none:house,trance", &record));
    assert!(!matches("genre:contains_none:house,techno", &record));
    assert!(matches("genre:nin:jazz", &record));
}

#[test]
fn test_list_operators_on_scalar_field() {
    let record = event();
    assert!(matches("venue:contains_any:fabric,printworks", &record));
    assert!(matches("venue:contains_none:fabric", &record));
}

#[test]
fn test_empty_list_field() {
    let record = Record::new().with("genre", Value::List(vec![]));
    assert!(!matches("genre:contains_any:techno", &record));
    assert!(!matches("genre:contains_all:techno", &record));
    assert!(matches("genre:contains_none:techno", &record));
    assert!(!matches("genre:eq:techno", &record));
}

// ==================== Numeric Operators ====================

#[test]
fn test_numeric_comparisons() {
    let record = event();
    assert!(matches("interestedCount:gt:100", &record));
    assert!(!matches("interestedCount:gt:480", &record));
    assert!(matches("interestedCount:gte:480", &record));
    assert!(matches("interestedCount:lt:500", &record));
    assert!(matches("interestedCount:lte:480", &record));
    assert!(!matches("interestedCount:lt:480", &record));
}

#[test]
fn test_between_inclusive() {
    assert!(matches("price:between:10,30", &Record::new().with("price", 25.0)));
    assert!(matches("price:between:10,30", &Record::new().with("price", 10.0)));
    assert!(matches("price:between:10,30", &Record::new().with("price", 30.0)));
    assert!(!matches("price:between:10,30", &Record::new().with("price", 31.0)));
}

#[test]
fn test_between_reversed_bounds_matches_nothing() {
    assert!(!matches("price:between:30,10", &Record::new().with("price", 25.0)));
}

#[test]
fn test_numeric_text_field() {
    let record = Record::new().with("price", " 25 ");
    assert!(matches("price:gt:20", &record));
    assert!(matches("price:between:25,25", &record));
}

#[test]
fn test_non_numeric_field_is_false() {
    let record = Record::new().with("price", "n/a");
    assert!(!matches("price:between:10,30", &record));
    assert!(!matches("price:gt:0", &record));
    assert!(!matches("price:lte:1000", &record));
}

#[test]
fn test_numeric_operator_on_list_reads_each_item() {
    let record = Record::new().with("prices", Value::list(["10", "free", "40"]));
    assert!(matches("prices:gt:30", &record));
    assert!(!matches("prices:gt:50", &record));
}

#[test]
fn test_numeric_operator_on_bool_is_false() {
    assert!(!matches("isTicketed:gt:0", &event()));
}

#[test]
fn test_eq_numeric_field() {
    let record = event();
    assert!(matches("price:eq:25", &record));
    assert!(matches("price:eq:25.0", &record));
    assert!(!matches("price:eq:26", &record));
    assert!(matches("price:neq:26", &record));
}

#[test]
fn test_eq_numeric_text_field() {
    let record = Record::new().with("price", "25.0");
    assert!(matches("price:eq:25", &record));
    assert!(!matches("price:neq:25", &record));
    assert!(matches("price:eq:25.0", &record));
    assert!(!matches("price:eq:26", &record));
    // Agrees with the ordering operators on the same value.
    assert!(matches("price:gte:25", &record));
    assert!(matches("price:lte:25", &record));
}

#[test]
fn test_eq_numeric_list_items() {
    let record = Record::new().with("prices", Value::list(["free", "25.0"]));
    assert!(matches("prices:eq:25", &record));
    assert!(matches("prices:eq:free", &record));
    assert!(!matches("prices:eq:10", &record));
    assert!(matches("prices:neq:10", &record));
}

// ==================== Missing Fields ====================

#[test]
fn test_missing_field_is_false() {
    let record = Record::new().with("title", "Untitled");
    assert!(!matches("interested:gt:100", &record));
    assert!(!matches("genre:eq:techno", &record));
    assert!(!matches("genre:has:tech", &record));
    assert!(!matches("genre:contains_any:techno", &record));
    assert!(!matches("genre:contains_all:techno", &record));
    assert!(!matches("price:between:0,100", &record));
}

#[test]
fn test_missing_field_negative_operators_hold() {
    let record = Record::new().with("title", "Untitled");
    assert!(matches("genre:neq:techno", &record));
    assert!(matches("genre:contains_none:techno", &record));
}

#[test]
fn test_not_on_missing_field() {
    let record = Record::new().with("title", "Untitled");
    assert!(matches("NOT genre:eq:techno", &record));
    assert!(!matches("NOT genre:neq:techno", &record));
}

#[test]
fn test_field_lookup_case_insensitive() {
    let record = event();
    assert!(matches("Venue:eq:printworks", &record));
    assert!(matches("interestedcount:gt:100", &record));
}

// ==================== Normalization ====================

#[test]
fn test_whitespace_is_collapsed() {
    let record = Record::new().with("genre", "  Deep   House ");
    assert!(matches("genre:eq:deep house", &record));
    assert!(matches(r#"genre:eq:"deep    house""#, &record));
}

#[test]
fn test_unicode_lowercase() {
    let record = Record::new().with("city", "KÖLN");
    assert!(matches("city:eq:köln", &record));
}

#[test]
fn test_diacritics_are_not_folded() {
    let record = Record::new().with("city", "Köln");
    assert!(!matches("city:eq:koln", &record));
}

#[test]
fn test_normalize() {
    assert_eq!(normalize("  Hello \t  World "), "hello world");
    assert_eq!(normalize(""), "");
    assert_eq!(normalize("ÉTÉ"), "été");
}

// ==================== Boolean Logic ====================

#[test]
fn test_and_or() {
    let record = event();
    assert!(matches("genre:eq:techno AND artists:has:charlotte", &record));
    assert!(!matches("genre:eq:house AND artists:has:charlotte", &record));
    assert!(matches("genre:eq:house OR artists:has:charlotte", &record));
    assert!(!matches("genre:eq:house OR artists:has:amelie", &record));
}

#[test]
fn test_precedence() {
    let record = event();
    // true OR (false AND false)
    assert!(matches(
        "venue:eq:printworks OR genre:eq:house AND price:gt:100",
        &record
    ));
    // (NOT true) AND true
    assert!(!matches("NOT venue:eq:printworks AND price:gt:10", &record));
}

#[test]
fn test_double_negation() {
    let record = event();
    for filter in ["venue:eq:printworks", "venue:eq:fabric", "missing:eq:x"] {
        assert_eq!(
            matches(filter, &record),
            matches(&format!("NOT NOT {filter}"), &record),
            "NOT NOT should be identity for {filter}"
        );
    }
}

#[test]
fn test_long_not_run_and_chain() {
    let record = event();

    let even = format!("{}venue:eq:printworks", "NOT ".repeat(100_000));
    let odd = format!("{}venue:eq:printworks", "NOT ".repeat(100_001));
    assert!(matches(&even, &record));
    assert!(!matches(&odd, &record));

    let chain = vec!["genre:eq:techno"; 50_000].join(" AND ");
    assert!(matches(&chain, &record));
    assert!(matches(&format!("{chain} AND venue:eq:printworks"), &record));
    assert!(!matches(&format!("{chain} AND venue:eq:fabric"), &record));

    let chain = vec!["genre:eq:house"; 50_000].join(" OR ");
    assert!(!matches(&chain, &record));
    assert!(matches(&format!("{chain} OR venue:eq:printworks"), &record));
}

#[test]
fn test_connective_not() {
    let record = event();
    assert!(matches("genre:eq:techno NOT genre:eq:trance", &record));
    assert!(!matches("genre:eq:techno NOT genre:eq:minimal", &record));
}

#[test]
fn test_all_matches_everything() {
    assert!(matches("", &Record::new()));
    assert!(matches("   ", &event()));
}

#[test]
fn test_evaluate_condition_directly() {
    let condition = parse_condition("genre:contains_any:techno").unwrap();
    assert!(evaluate_condition(&condition, &event()));
    assert!(!evaluate_condition(&condition, &Record::new()));
}

#[test]
fn test_expression_matches_method() {
    let expr: Expression = "price:lte:30".parse().unwrap();
    assert!(expr.matches(&event()));
}

// ==================== Batch Filtering ====================

#[test]
fn test_filter_records_preserves_order() {
    let records: Vec<Record> = [5.0, 50.0, 15.0, 500.0, 25.0]
        .into_iter()
        .map(|price| Record::new().with("price", price))
        .collect();

    let expr = FilterParser::parse("price:lt:30").unwrap();
    let evaluator = FilterEvaluator::new(&expr);

    let prices: Vec<String> = evaluator
        .filter_records(&records)
        .iter()
        .map(|r| r.get("price").unwrap().to_string())
        .collect();
    assert_eq!(prices, vec!["5", "15", "25"]);
    assert_eq!(evaluator.matching_indices(&records), vec![0, 2, 4]);
}

#[test]
fn test_filter_empty_batch() {
    let expr = FilterParser::parse("genre:eq:techno").unwrap();
    assert!(FilterEvaluator::new(&expr).filter_records(&[]).is_empty());
}

#[test]
fn test_evaluation_is_deterministic() {
    let _ = env_logger::builder().is_test(true).try_init();
    let record = event();
    let expr = FilterParser::parse("genre:contains_any:techno OR NOT price:gt:10").unwrap();
    let first = expr.matches(&record);
    for _ in 0..10 {
        assert_eq!(expr.matches(&record), first);
    }
}
