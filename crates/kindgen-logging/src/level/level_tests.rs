#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

#[test]
fn LogLevel___ordering___trace_less_than_debug() {
    assert!(LogLevel::Trace < LogLevel::Debug);
}

#[test]
fn LogLevel___ordering___error_less_than_off() {
    assert!(LogLevel::Error < LogLevel::Off);
}

#[test]
fn LogLevel___default___is_info() {
    assert_eq!(LogLevel::default(), LogLevel::Info);
}

#[test_case("trace", LogLevel::Trace)]
#[test_case("DEBUG", LogLevel::Debug)]
#[test_case(" info ", LogLevel::Info)]
#[test_case("warning", LogLevel::Warn)]
#[test_case("error", LogLevel::Error)]
#[test_case("none", LogLevel::Off)]
fn LogLevel___from_str___accepts_common_spellings(input: &str, expected: LogLevel) {
    assert_eq!(input.parse::<LogLevel>(), Ok(expected));
}

#[test]
fn LogLevel___from_str___unknown___error_names_input() {
    let err = "loud".parse::<LogLevel>().unwrap_err();

    assert!(err.to_string().contains("'loud'"));
}

#[test]
fn LogLevel___display___uppercase() {
    assert_eq!(LogLevel::Warn.to_string(), "WARN");
}

#[test]
fn LogLevel___to_filter___maps_off() {
    assert_eq!(LogLevel::Off.to_filter(), LevelFilter::OFF);
    assert_eq!(LogLevel::Debug.to_filter(), LevelFilter::DEBUG);
}

#[test]
fn LogLevel___deserialize___lowercase_names() {
    use serde::de::IntoDeserializer;
    use serde::de::value::{Error, StrDeserializer};

    let de: StrDeserializer<'_, Error> = "warn".into_deserializer();

    assert_eq!(LogLevel::deserialize(de), Ok(LogLevel::Warn));
}
