//! Integration tests for registry-wide properties
//!
//! Exercises the public registry API through the in-memory statement and row:
//! inference round trips, bind/read identity, parse/render agreement and the
//! failure modes callers rely on.

use proptest::prelude::*;
use typecodes::prelude::*;
use typecodes::type_mapping::{
    Blob, CharacterStream, Clob, NClob, SqlArray, SqlRef, SqlXml, bigdecimal::BigDecimal,
    url::Url,
};

named_enum! {
    pub enum Weekday { Mon, Tue, Wed, Thu, Fri, Sat, Sun }
}

fn bind_then_read(registry: &Registry, tag: TypeTag, value: &NativeValue) -> NativeValue {
    let mut statement = MemoryStatement::new();
    registry.bind(tag, &mut statement, 0, value).unwrap();
    let row = statement.into_row().unwrap();
    registry.read(tag, &row, 0).unwrap()
}

// ========================================
// Inference
// ========================================

#[test]
fn test_every_owned_native_type_infers_back_to_its_tag() {
    let registry = Registry::standard();
    for tag in TypeTag::ALL {
        let Some(native) = registry.native_type_of(Some(tag)) else {
            assert_eq!(tag, TypeTag::Null);
            continue;
        };
        let inferred = registry.infer_tag(Some(&native));
        match tag {
            // shares String's native type
            TypeTag::JsonString => assert_eq!(inferred, TypeTag::String),
            // any enumeration; the record itself carries no descriptor
            TypeTag::Enum => assert_eq!(inferred, TypeTag::Enum),
            _ => assert_eq!(inferred, tag, "{tag}"),
        }
    }
}

#[test]
fn test_concrete_enumeration_infers_enum() {
    let registry = Registry::standard();
    assert_eq!(
        registry.infer_tag(Some(&NativeType::of_enum::<Weekday>())),
        TypeTag::Enum
    );
    assert_eq!(registry.infer_tag(None), TypeTag::Null);
    assert_eq!(registry.native_type_of(None), None);
}

#[test]
fn test_value_tags_follow_representation() {
    let registry = Registry::standard();
    let samples = [
        (NativeValue::from("x"), TypeTag::String),
        (NativeValue::from(1i32), TypeTag::Integer),
        (NativeValue::from(1i64), TypeTag::Long),
        (NativeValue::from(Uuid::nil()), TypeTag::Uuid),
        (NativeValue::from(Weekday::Fri.to_enum_value()), TypeTag::Enum),
        (NativeValue::from(Clob("c".into())), TypeTag::Clob),
        (NativeValue::from(serde_json::json!([1])), TypeTag::Object),
        (NativeValue::Null, TypeTag::Null),
    ];
    for (value, tag) in samples {
        assert_eq!(registry.tag_of_value(&value), tag, "{value:?}");
    }
}

// ========================================
// Bind / read
// ========================================

#[test]
fn test_bind_read_identity_for_every_readable_tag() {
    let registry = Registry::standard();
    let samples = [
        (TypeTag::String, NativeValue::from("hello")),
        (
            TypeTag::Timestamp,
            NativeValue::from("2024-02-29T12:00:00Z".parse::<DateTime<Utc>>().unwrap()),
        ),
        (TypeTag::Integer, NativeValue::Integer(-7)),
        (TypeTag::Long, NativeValue::Long(i64::MAX)),
        (TypeTag::Uuid, NativeValue::from(Uuid::new_v4())),
        (
            TypeTag::BigDecimal,
            NativeValue::Decimal("12345.678".parse::<BigDecimal>().unwrap()),
        ),
        (TypeTag::Boolean, NativeValue::Boolean(true)),
        (TypeTag::Byte, NativeValue::Byte(-3)),
        (TypeTag::ByteArray, NativeValue::Bytes(vec![0, 1, 254, 255])),
        (
            TypeTag::Date,
            NativeValue::Date(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()),
        ),
        (TypeTag::Double, NativeValue::Double(2.5)),
        (TypeTag::Float, NativeValue::Float(-0.25)),
        (TypeTag::Short, NativeValue::Short(i16::MIN)),
        (
            TypeTag::Time,
            NativeValue::Time(NaiveTime::from_hms_opt(8, 30, 0).unwrap()),
        ),
        (
            TypeTag::Array,
            NativeValue::from(SqlArray(vec!["a".into(), "b".into()])),
        ),
        (TypeTag::Blob, NativeValue::from(Blob(vec![9, 8, 7]))),
        (TypeTag::Clob, NativeValue::from(Clob("long text".into()))),
        (TypeTag::NClob, NativeValue::from(NClob("ünïcode".into()))),
        (TypeTag::Xml, NativeValue::from(SqlXml("<a/>".into()))),
        (
            TypeTag::Reader,
            NativeValue::from(CharacterStream("stream".into())),
        ),
        (
            TypeTag::Url,
            NativeValue::from(Url::parse("https://example.com/a?b=c").unwrap()),
        ),
        (TypeTag::JsonString, NativeValue::from(r#"{"k":"v"}"#)),
        (
            TypeTag::Object,
            NativeValue::from(serde_json::json!({"nested": {"n": 1}})),
        ),
    ];

    for (tag, value) in samples {
        assert_eq!(bind_then_read(&registry, tag, &value), value, "{tag}");
    }
}

#[test]
fn test_sql_null_reads_as_null_for_every_readable_tag() {
    let registry = Registry::standard();
    for tag in TypeTag::ALL {
        if registry.reader(tag).is_err() {
            continue;
        }
        assert_eq!(
            bind_then_read(&registry, tag, &NativeValue::Null),
            NativeValue::Null,
            "{tag}"
        );
    }
}

#[test]
fn test_tags_without_reader() {
    let registry = Registry::standard();
    let mut statement = MemoryStatement::new();
    statement.set_text(0, "anything").unwrap();
    let row = statement.into_row().unwrap();

    for tag in [TypeTag::Null, TypeTag::Enum, TypeTag::Ref, TypeTag::Rowid] {
        let err = registry.read(tag, &row, 0).unwrap_err();
        assert!(
            matches!(err, MappingError::UnsupportedConversion { tag: t, .. } if t == tag),
            "{tag}"
        );
    }
}

#[test]
fn test_write_only_tags_still_bind() {
    let registry = Registry::standard();
    let mut statement = MemoryStatement::new();
    registry
        .bind(TypeTag::Ref, &mut statement, 0, &SqlRef("ref-1".into()).into())
        .unwrap();
    registry
        .bind(TypeTag::Null, &mut statement, 1, &NativeValue::Null)
        .unwrap();
    assert_eq!(statement.len(), 2);
}

#[test]
fn test_enum_round_trip_through_descriptor() {
    let registry = Registry::standard();
    let value = NativeValue::from(Weekday::Sat.to_enum_value());

    let mut statement = MemoryStatement::new();
    registry.bind(TypeTag::Enum, &mut statement, 0, &value).unwrap();
    let row = statement.into_row().unwrap();

    let read = registry
        .read_enum(&row, 0, Weekday::descriptor())
        .unwrap();
    assert_eq!(read, value);

    let err = registry
        .resolve_enum(Weekday::descriptor(), "Funday")
        .unwrap_err();
    assert!(matches!(err, MappingError::UnknownEnumMember { .. }));
}

// ========================================
// Parse / render
// ========================================

#[test]
fn test_parsed_values_render_as_valid_json() {
    let registry = Registry::standard();
    let samples = [
        (TypeTag::String, "plain \"quoted\" text", serde_json::json!("plain \"quoted\" text")),
        (TypeTag::Integer, "42", serde_json::json!(42)),
        (TypeTag::BigDecimal, "1,000.5", serde_json::json!(1000.5)),
        (TypeTag::Boolean, "false", serde_json::json!(false)),
        (TypeTag::Date, "2021-06-01", serde_json::json!("2021-06-01")),
        (TypeTag::ByteArray, "0a0b", serde_json::json!("0a0b")),
        (TypeTag::Object, r#"{"a":[1,2]}"#, serde_json::json!({"a": [1, 2]})),
    ];

    for (tag, text, expected) in samples {
        let value = registry.parse(tag, text).unwrap();
        let rendered = registry.to_json(tag, &value);
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed, expected, "{tag}");
    }
}

#[test]
fn test_partial_registry_reports_unsupported() {
    let registry = Registry::builder()
        .record(Registry::standard().record(TypeTag::Integer).copied().unwrap())
        .build()
        .unwrap();

    assert!(registry.parse(TypeTag::Integer, "1").is_ok());
    assert!(matches!(
        registry.parse(TypeTag::Long, "1"),
        Err(MappingError::UnsupportedConversion { tag: TypeTag::Long, .. })
    ));
    assert_eq!(registry.infer_tag_of::<i64>(), TypeTag::Object);
    assert_eq!(
        registry.native_type_of(Some(TypeTag::Long)),
        Some(NativeType::of::<serde_json::Value>())
    );
}

// ========================================
// Properties
// ========================================

proptest! {
    #[test]
    fn test_text_round_trips_through_statement(text in ".*") {
        let registry = Registry::standard();
        let value = NativeValue::from(text.as_str());
        prop_assert_eq!(bind_then_read(&registry, TypeTag::String, &value), value);
    }

    #[test]
    fn test_longs_parse_bind_and_read(n in any::<i64>()) {
        let registry = Registry::standard();
        let parsed = registry.parse(TypeTag::Long, &n.to_string()).unwrap();
        prop_assert_eq!(&parsed, &NativeValue::Long(n));
        prop_assert_eq!(bind_then_read(&registry, TypeTag::Long, &parsed), parsed.clone());
        prop_assert_eq!(registry.to_json(TypeTag::Long, &parsed), n.to_string());
    }

    #[test]
    fn test_bytes_survive_hex_parse_and_binding(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let registry = Registry::standard();
        let text: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        let parsed = registry.parse(TypeTag::ByteArray, &text).unwrap();
        prop_assert_eq!(&parsed, &NativeValue::Bytes(bytes.clone()));
        prop_assert_eq!(bind_then_read(&registry, TypeTag::ByteArray, &parsed), parsed);
    }

    #[test]
    fn test_rendered_strings_are_json_strings(text in ".*") {
        let registry = Registry::standard();
        let rendered = registry.to_json(TypeTag::String, &NativeValue::from(text.as_str()));
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        prop_assert_eq!(parsed, serde_json::Value::String(text));
    }

    #[test]
    fn test_uuids_parse_and_bind(raw in any::<u128>()) {
        let registry = Registry::standard();
        let uuid = Uuid::from_u128(raw);
        let parsed = registry.parse(TypeTag::Uuid, &uuid.to_string()).unwrap();
        prop_assert_eq!(&parsed, &NativeValue::Uuid(uuid));
        prop_assert_eq!(bind_then_read(&registry, TypeTag::Uuid, &parsed), parsed);
    }
}
