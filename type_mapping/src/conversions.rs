//! Per-tag conversion functions and the standard record set

use crate::enums::EnumValue;
use crate::errors::MappingError;
use crate::handles::{Blob, CharacterStream, Clob, NClob, RowId, SqlArray, SqlRef, SqlXml};
use crate::json;
use crate::record::{ConversionRecord, ParseOptions};
use crate::slots::{ParameterSlots, ResultRow};
use crate::tag::TypeTag;
use crate::types::{NativeType, NativeValue};
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::str::FromStr;
use url::Url;
use uuid::Uuid;

fn mismatch(tag: TypeTag, value: &NativeValue) -> MappingError {
    MappingError::ValueMismatch {
        tag,
        found: value.kind(),
    }
}

fn prepare<'a>(text: &'a str, options: &ParseOptions) -> &'a str {
    if options.trim {
        text.trim()
    } else {
        text
    }
}

/// Pack a UUID into 16 bytes, most significant half first
pub fn pack_uuid(uuid: &Uuid) -> [u8; 16] {
    let (msb, lsb) = uuid.as_u64_pair();
    let mut bytes = [0u8; 16];
    bytes[..8].copy_from_slice(&msb.to_be_bytes());
    bytes[8..].copy_from_slice(&lsb.to_be_bytes());
    bytes
}

/// Inverse of [`pack_uuid`]; `None` unless exactly 16 bytes are given
pub fn unpack_uuid(bytes: &[u8]) -> Option<Uuid> {
    let bytes: [u8; 16] = bytes.try_into().ok()?;
    let (msb, lsb) = bytes.split_at(8);
    let msb = u64::from_be_bytes(msb.try_into().ok()?);
    let lsb = u64::from_be_bytes(lsb.try_into().ok()?);
    Some(Uuid::from_u64_pair(msb, lsb))
}

// ========================================
// Bind
// ========================================

macro_rules! bind_fn {
    ($name:ident, $tag:expr, |$slots:ident, $index:ident| $pattern:pat => $call:expr) => {
        fn $name(
            $slots: &mut dyn ParameterSlots,
            $index: usize,
            value: &NativeValue,
        ) -> Result<(), MappingError> {
            match value {
                $pattern => $call?,
                NativeValue::Null => $slots.set_null($index, $tag)?,
                other => return Err(mismatch($tag, other)),
            }
            Ok(())
        }
    };
}

fn bind_null(
    slots: &mut dyn ParameterSlots,
    index: usize,
    value: &NativeValue,
) -> Result<(), MappingError> {
    if !value.is_null() {
        return Err(mismatch(TypeTag::Null, value));
    }
    // No column kind is known here, so the null goes out as text.
    slots.set_null(index, TypeTag::String)?;
    Ok(())
}

bind_fn!(bind_text, TypeTag::String, |slots, index| NativeValue::Text(s) => slots.set_text(index, s));
bind_fn!(bind_timestamp, TypeTag::Timestamp, |slots, index| NativeValue::Timestamp(ts) => slots.set_timestamp(index, *ts));
bind_fn!(bind_i32, TypeTag::Integer, |slots, index| NativeValue::Integer(n) => slots.set_i32(index, *n));
bind_fn!(bind_i64, TypeTag::Long, |slots, index| NativeValue::Long(n) => slots.set_i64(index, *n));
bind_fn!(bind_uuid, TypeTag::Uuid, |slots, index| NativeValue::Uuid(uuid) => slots.set_bytes(index, &pack_uuid(uuid)));
bind_fn!(bind_enum, TypeTag::Enum, |slots, index| NativeValue::Enum(e) => slots.set_text(index, e.name()));
bind_fn!(bind_decimal, TypeTag::BigDecimal, |slots, index| NativeValue::Decimal(d) => slots.set_decimal(index, d));
bind_fn!(bind_bool, TypeTag::Boolean, |slots, index| NativeValue::Boolean(b) => slots.set_bool(index, *b));
bind_fn!(bind_i8, TypeTag::Byte, |slots, index| NativeValue::Byte(n) => slots.set_i8(index, *n));
bind_fn!(bind_bytes, TypeTag::ByteArray, |slots, index| NativeValue::Bytes(bytes) => slots.set_bytes(index, bytes));
bind_fn!(bind_date, TypeTag::Date, |slots, index| NativeValue::Date(date) => slots.set_date(index, *date));
bind_fn!(bind_f64, TypeTag::Double, |slots, index| NativeValue::Double(n) => slots.set_f64(index, *n));
bind_fn!(bind_f32, TypeTag::Float, |slots, index| NativeValue::Float(n) => slots.set_f32(index, *n));
bind_fn!(bind_i16, TypeTag::Short, |slots, index| NativeValue::Short(n) => slots.set_i16(index, *n));
bind_fn!(bind_time, TypeTag::Time, |slots, index| NativeValue::Time(time) => slots.set_time(index, *time));
bind_fn!(bind_array, TypeTag::Array, |slots, index| NativeValue::Array(array) => slots.set_text_array(index, &array.0));
bind_fn!(bind_blob, TypeTag::Blob, |slots, index| NativeValue::Blob(blob) => slots.set_bytes(index, &blob.0));
bind_fn!(bind_clob, TypeTag::Clob, |slots, index| NativeValue::Clob(clob) => slots.set_text(index, &clob.0));
bind_fn!(bind_nclob, TypeTag::NClob, |slots, index| NativeValue::NClob(nclob) => slots.set_text(index, &nclob.0));
bind_fn!(bind_ref, TypeTag::Ref, |slots, index| NativeValue::Ref(r) => slots.set_text(index, &r.0));
bind_fn!(bind_rowid, TypeTag::Rowid, |slots, index| NativeValue::RowId(rowid) => slots.set_bytes(index, &rowid.0));
bind_fn!(bind_xml, TypeTag::Xml, |slots, index| NativeValue::Xml(xml) => slots.set_text(index, &xml.0));
bind_fn!(bind_reader, TypeTag::Reader, |slots, index| NativeValue::Reader(stream) => slots.set_text(index, &stream.0));
bind_fn!(bind_url, TypeTag::Url, |slots, index| NativeValue::Url(url) => slots.set_text(index, url.as_str()));
bind_fn!(bind_json, TypeTag::Object, |slots, index| NativeValue::Json(doc) => slots.set_json(index, doc));

// ========================================
// Read
// ========================================

macro_rules! read_fn {
    ($name:ident, $getter:ident, $wrap:expr) => {
        fn $name(row: &dyn ResultRow, index: usize) -> Result<NativeValue, MappingError> {
            Ok(row.$getter(index)?.map($wrap).unwrap_or(NativeValue::Null))
        }
    };
}

read_fn!(read_text, get_text, NativeValue::Text);
read_fn!(read_timestamp, get_timestamp, NativeValue::Timestamp);
read_fn!(read_i32, get_i32, NativeValue::Integer);
read_fn!(read_i64, get_i64, NativeValue::Long);
read_fn!(read_decimal, get_decimal, NativeValue::Decimal);
read_fn!(read_bool, get_bool, NativeValue::Boolean);
read_fn!(read_i8, get_i8, NativeValue::Byte);
read_fn!(read_bytes, get_bytes, NativeValue::Bytes);
read_fn!(read_date, get_date, NativeValue::Date);
read_fn!(read_f64, get_f64, NativeValue::Double);
read_fn!(read_f32, get_f32, NativeValue::Float);
read_fn!(read_i16, get_i16, NativeValue::Short);
read_fn!(read_time, get_time, NativeValue::Time);
read_fn!(read_array, get_text_array, |elements| NativeValue::Array(SqlArray(elements)));
read_fn!(read_blob, get_bytes, |bytes| NativeValue::Blob(Blob(bytes)));
read_fn!(read_clob, get_text, |text| NativeValue::Clob(Clob(text)));
read_fn!(read_nclob, get_text, |text| NativeValue::NClob(NClob(text)));
read_fn!(read_xml, get_text, |text| NativeValue::Xml(SqlXml(text)));
read_fn!(read_reader, get_text, |text| NativeValue::Reader(CharacterStream(text)));
read_fn!(read_json, get_json, NativeValue::Json);

fn read_uuid(row: &dyn ResultRow, index: usize) -> Result<NativeValue, MappingError> {
    match row.get_bytes(index)? {
        None => Ok(NativeValue::Null),
        Some(bytes) => unpack_uuid(&bytes)
            .map(NativeValue::Uuid)
            .ok_or_else(|| MappingError::UndecodableValue {
                tag: TypeTag::Uuid,
                reason: format!("expected 16 bytes, got {}", bytes.len()),
            }),
    }
}

fn read_url(row: &dyn ResultRow, index: usize) -> Result<NativeValue, MappingError> {
    match row.get_text(index)? {
        None => Ok(NativeValue::Null),
        Some(text) => Url::parse(&text)
            .map(NativeValue::Url)
            .map_err(|e| MappingError::UndecodableValue {
                tag: TypeTag::Url,
                reason: e.to_string(),
            }),
    }
}

// ========================================
// Parse
// ========================================

macro_rules! parse_number_fn {
    ($name:ident, $tag:expr, $ty:ty, $variant:ident) => {
        fn $name(text: &str, options: &ParseOptions) -> Result<NativeValue, MappingError> {
            prepare(text, options)
                .parse::<$ty>()
                .map(NativeValue::$variant)
                .map_err(|e| MappingError::malformed($tag, text, e))
        }
    };
}

parse_number_fn!(parse_i32, TypeTag::Integer, i32, Integer);
parse_number_fn!(parse_i64, TypeTag::Long, i64, Long);
parse_number_fn!(parse_i16, TypeTag::Short, i16, Short);
parse_number_fn!(parse_i8, TypeTag::Byte, i8, Byte);
parse_number_fn!(parse_f64, TypeTag::Double, f64, Double);
parse_number_fn!(parse_f32, TypeTag::Float, f32, Float);

fn parse_text(text: &str, options: &ParseOptions) -> Result<NativeValue, MappingError> {
    Ok(NativeValue::Text(prepare(text, options).to_string()))
}

fn parse_clob(text: &str, options: &ParseOptions) -> Result<NativeValue, MappingError> {
    Ok(NativeValue::Clob(Clob(prepare(text, options).to_string())))
}

fn parse_nclob(text: &str, options: &ParseOptions) -> Result<NativeValue, MappingError> {
    Ok(NativeValue::NClob(NClob(prepare(text, options).to_string())))
}

fn parse_decimal(text: &str, options: &ParseOptions) -> Result<NativeValue, MappingError> {
    let ungrouped: String = prepare(text, options)
        .chars()
        .filter(|c| *c != options.grouping_separator)
        .collect();
    BigDecimal::from_str(&ungrouped)
        .map(NativeValue::Decimal)
        .map_err(|e| MappingError::malformed(TypeTag::BigDecimal, text, e))
}

fn parse_bool(text: &str, options: &ParseOptions) -> Result<NativeValue, MappingError> {
    let prepared = prepare(text, options);
    if prepared.eq_ignore_ascii_case("true") {
        Ok(NativeValue::Boolean(true))
    } else if prepared.eq_ignore_ascii_case("false") {
        Ok(NativeValue::Boolean(false))
    } else {
        Err(MappingError::malformed(
            TypeTag::Boolean,
            text,
            "expected true or false",
        ))
    }
}

fn decode_hex(tag: TypeTag, text: &str, options: &ParseOptions) -> Result<Vec<u8>, MappingError> {
    let prepared = prepare(text, options);
    let digits = prepared
        .strip_prefix("0x")
        .or_else(|| prepared.strip_prefix("0X"))
        .unwrap_or(prepared);
    hex::decode(digits).map_err(|e| MappingError::malformed(tag, text, e))
}

fn parse_bytes(text: &str, options: &ParseOptions) -> Result<NativeValue, MappingError> {
    decode_hex(TypeTag::ByteArray, text, options).map(NativeValue::Bytes)
}

fn parse_blob(text: &str, options: &ParseOptions) -> Result<NativeValue, MappingError> {
    decode_hex(TypeTag::Blob, text, options).map(|bytes| NativeValue::Blob(Blob(bytes)))
}

fn parse_uuid(text: &str, options: &ParseOptions) -> Result<NativeValue, MappingError> {
    let prepared = prepare(text, options);
    if prepared.len() != 36 {
        return Err(MappingError::malformed(
            TypeTag::Uuid,
            text,
            "expected the hyphenated 8-4-4-4-12 form",
        ));
    }
    Uuid::parse_str(prepared)
        .map(NativeValue::Uuid)
        .map_err(|e| MappingError::malformed(TypeTag::Uuid, text, e))
}

fn parse_date(text: &str, options: &ParseOptions) -> Result<NativeValue, MappingError> {
    NaiveDate::parse_from_str(prepare(text, options), "%Y-%m-%d")
        .map(NativeValue::Date)
        .map_err(|e| MappingError::malformed(TypeTag::Date, text, e))
}

fn parse_time(text: &str, options: &ParseOptions) -> Result<NativeValue, MappingError> {
    NaiveTime::parse_from_str(prepare(text, options), "%H:%M:%S%.f")
        .map(NativeValue::Time)
        .map_err(|e| MappingError::malformed(TypeTag::Time, text, e))
}

/// RFC 3339, or a zone-less `YYYY-MM-DD HH:MM:SS[.f]` taken as UTC
fn parse_timestamp(text: &str, options: &ParseOptions) -> Result<NativeValue, MappingError> {
    let prepared = prepare(text, options);
    if let Ok(ts) = DateTime::parse_from_rfc3339(prepared) {
        return Ok(NativeValue::Timestamp(ts.with_timezone(&Utc)));
    }
    NaiveDateTime::parse_from_str(prepared, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(prepared, "%Y-%m-%dT%H:%M:%S%.f"))
        .map(|naive| NativeValue::Timestamp(naive.and_utc()))
        .map_err(|e| MappingError::malformed(TypeTag::Timestamp, text, e))
}

fn parse_json(text: &str, options: &ParseOptions) -> Result<NativeValue, MappingError> {
    serde_json::from_str(prepare(text, options))
        .map(NativeValue::Json)
        .map_err(|e| MappingError::malformed(TypeTag::Object, text, e))
}

// ========================================
// Standard record set
// ========================================

/// The full record set, one per tag, in tag order
pub fn standard_records() -> Vec<ConversionRecord> {
    let string = ConversionRecord::new(TypeTag::String, NativeType::of::<String>(), bind_text)
        .with_reader(read_text)
        .with_parser(parse_text);

    vec![
        ConversionRecord::untyped(TypeTag::Null, bind_null),
        string,
        ConversionRecord::new(TypeTag::Timestamp, NativeType::of::<DateTime<Utc>>(), bind_timestamp)
            .with_reader(read_timestamp)
            .with_parser(parse_timestamp),
        ConversionRecord::new(TypeTag::Integer, NativeType::of::<i32>(), bind_i32)
            .with_reader(read_i32)
            .with_parser(parse_i32)
            .with_json(json::bare),
        ConversionRecord::new(TypeTag::Long, NativeType::of::<i64>(), bind_i64)
            .with_reader(read_i64)
            .with_parser(parse_i64)
            .with_json(json::bare),
        ConversionRecord::new(TypeTag::Uuid, NativeType::of::<Uuid>(), bind_uuid)
            .with_reader(read_uuid)
            .with_parser(parse_uuid),
        ConversionRecord::new(TypeTag::Enum, NativeType::of::<EnumValue>(), bind_enum),
        ConversionRecord::new(TypeTag::BigDecimal, NativeType::of::<BigDecimal>(), bind_decimal)
            .with_reader(read_decimal)
            .with_parser(parse_decimal)
            .with_json(json::bare),
        ConversionRecord::new(TypeTag::Boolean, NativeType::of::<bool>(), bind_bool)
            .with_reader(read_bool)
            .with_parser(parse_bool)
            .with_json(json::bare),
        ConversionRecord::new(TypeTag::Byte, NativeType::of::<i8>(), bind_i8)
            .with_reader(read_i8)
            .with_parser(parse_i8)
            .with_json(json::bare),
        ConversionRecord::new(TypeTag::ByteArray, NativeType::of::<Vec<u8>>(), bind_bytes)
            .with_reader(read_bytes)
            .with_parser(parse_bytes),
        ConversionRecord::new(TypeTag::Date, NativeType::of::<NaiveDate>(), bind_date)
            .with_reader(read_date)
            .with_parser(parse_date),
        ConversionRecord::new(TypeTag::Double, NativeType::of::<f64>(), bind_f64)
            .with_reader(read_f64)
            .with_parser(parse_f64)
            .with_json(json::bare),
        ConversionRecord::new(TypeTag::Float, NativeType::of::<f32>(), bind_f32)
            .with_reader(read_f32)
            .with_parser(parse_f32)
            .with_json(json::bare),
        ConversionRecord::new(TypeTag::Short, NativeType::of::<i16>(), bind_i16)
            .with_reader(read_i16)
            .with_parser(parse_i16)
            .with_json(json::bare),
        ConversionRecord::new(TypeTag::Time, NativeType::of::<NaiveTime>(), bind_time)
            .with_reader(read_time)
            .with_parser(parse_time),
        ConversionRecord::new(TypeTag::Array, NativeType::of::<SqlArray>(), bind_array)
            .with_reader(read_array)
            .with_json(json::string_array),
        ConversionRecord::new(TypeTag::Blob, NativeType::of::<Blob>(), bind_blob)
            .with_reader(read_blob)
            .with_parser(parse_blob),
        ConversionRecord::new(TypeTag::Clob, NativeType::of::<Clob>(), bind_clob)
            .with_reader(read_clob)
            .with_parser(parse_clob),
        ConversionRecord::new(TypeTag::NClob, NativeType::of::<NClob>(), bind_nclob)
            .with_reader(read_nclob)
            .with_parser(parse_nclob),
        ConversionRecord::new(TypeTag::Ref, NativeType::of::<SqlRef>(), bind_ref),
        ConversionRecord::new(TypeTag::Rowid, NativeType::of::<RowId>(), bind_rowid),
        ConversionRecord::new(TypeTag::Xml, NativeType::of::<SqlXml>(), bind_xml)
            .with_reader(read_xml),
        ConversionRecord::new(TypeTag::Reader, NativeType::of::<CharacterStream>(), bind_reader)
            .with_reader(read_reader),
        ConversionRecord::new(TypeTag::Url, NativeType::of::<Url>(), bind_url)
            .with_reader(read_url),
        string.derive(TypeTag::JsonString).with_json(json::embedded),
        ConversionRecord::new(TypeTag::Object, NativeType::of::<serde_json::Value>(), bind_json)
            .with_reader(read_json)
            .with_parser(parse_json)
            .with_json(json::document),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> ParseOptions {
        ParseOptions::default()
    }

    #[test]
    fn test_uuid_packing_is_most_significant_first() {
        let uuid = Uuid::parse_str("00112233-4455-6677-8899-aabbccddeeff").unwrap();
        let packed = pack_uuid(&uuid);
        assert_eq!(
            packed[..8],
            [0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77]
        );
        assert_eq!(
            packed[8..],
            [0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]
        );
        assert_eq!(unpack_uuid(&packed), Some(uuid));
        assert_eq!(unpack_uuid(&packed[..15]), None);
    }

    #[test]
    fn test_decimal_ignores_grouping() {
        let value = parse_decimal("12,345.67", &options()).unwrap();
        assert_eq!(
            value,
            NativeValue::Decimal(BigDecimal::from_str("12345.67").unwrap())
        );

        let european = ParseOptions {
            grouping_separator: ' ',
            trim: false,
        };
        let value = parse_decimal("1 000 000", &european).unwrap();
        assert_eq!(value, NativeValue::Decimal(BigDecimal::from(1_000_000)));
    }

    #[test]
    fn test_malformed_numbers_carry_tag_and_text() {
        let err = parse_i32("12a", &options()).unwrap_err();
        assert!(matches!(
            err,
            MappingError::MalformedText { tag: TypeTag::Integer, ref text, .. } if text == "12a"
        ));
        assert!(parse_i8("128", &options()).is_err());
        assert!(parse_decimal("", &options()).is_err());
    }

    #[test]
    fn test_trim_option() {
        assert!(parse_i64(" 5 ", &options()).is_err());
        let trimming = ParseOptions {
            trim: true,
            ..ParseOptions::default()
        };
        assert_eq!(parse_i64(" 5 ", &trimming).unwrap(), NativeValue::Long(5));
    }

    #[test]
    fn test_hex_bytes() {
        assert_eq!(
            parse_bytes("00ff10", &options()).unwrap(),
            NativeValue::Bytes(vec![0x00, 0xff, 0x10])
        );
        assert_eq!(
            parse_blob("0xCAFE", &options()).unwrap(),
            NativeValue::Blob(Blob(vec![0xca, 0xfe]))
        );
        assert!(parse_bytes("abc", &options()).is_err());
        assert!(parse_bytes("zz", &options()).is_err());
    }

    #[test]
    fn test_uuid_requires_hyphenated_form() {
        let text = "00112233-4455-6677-8899-aabbccddeeff";
        assert!(parse_uuid(text, &options()).is_ok());
        assert!(parse_uuid("00112233445566778899aabbccddeeff", &options()).is_err());
    }

    #[test]
    fn test_booleans() {
        assert_eq!(parse_bool("TRUE", &options()).unwrap(), NativeValue::Boolean(true));
        assert_eq!(parse_bool("false", &options()).unwrap(), NativeValue::Boolean(false));
        assert!(parse_bool("yes", &options()).is_err());
    }

    #[test]
    fn test_timestamp_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_milli_opt(3, 4, 5, 600)
            .unwrap()
            .and_utc();
        for text in [
            "2024-01-02 03:04:05.6",
            "2024-01-02T03:04:05.600",
            "2024-01-02T05:04:05.6+02:00",
        ] {
            assert_eq!(
                parse_timestamp(text, &options()).unwrap(),
                NativeValue::Timestamp(expected),
                "{text}"
            );
        }
        assert!(parse_timestamp("yesterday", &options()).is_err());
    }

    #[test]
    fn test_dates_and_times() {
        assert_eq!(
            parse_date("2023-12-31", &options()).unwrap(),
            NativeValue::Date(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap())
        );
        assert_eq!(
            parse_time("23:59:58", &options()).unwrap(),
            NativeValue::Time(NaiveTime::from_hms_opt(23, 59, 58).unwrap())
        );
        assert!(parse_date("31/12/2023", &options()).is_err());
    }

    #[test]
    fn test_standard_records_cover_every_tag_in_order() {
        let tags: Vec<TypeTag> = standard_records().iter().map(|r| r.tag()).collect();
        assert_eq!(tags, TypeTag::ALL.to_vec());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_uuid_packing_round_trips(raw in any::<u128>()) {
                let uuid = Uuid::from_u128(raw);
                let packed = pack_uuid(&uuid);
                prop_assert_eq!(&packed[..], &raw.to_be_bytes()[..]);
                prop_assert_eq!(unpack_uuid(&packed), Some(uuid));
            }

            #[test]
            fn test_grouped_integers_parse_as_decimals(value in any::<i64>()) {
                let plain = value.to_string();
                let digits = plain.trim_start_matches('-');
                let mut grouped = String::new();
                for (position, digit) in digits.chars().enumerate() {
                    if position > 0 && (digits.len() - position) % 3 == 0 {
                        grouped.push(',');
                    }
                    grouped.push(digit);
                }
                if value < 0 {
                    grouped.insert(0, '-');
                }

                prop_assert_eq!(
                    parse_decimal(&grouped, &options()).unwrap(),
                    NativeValue::Decimal(BigDecimal::from(value))
                );
            }
        }
    }
}
