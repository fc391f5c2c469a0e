//! Serialization utilities
//!
//! Renders a set of named, tagged values as one JSON object, using the
//! registry's per-tag scalar renderers.

use crate::registry::Registry;
use crate::tag::TypeTag;
use crate::types::NativeValue;

/// Render `fields` as a JSON object, keeping the given order
pub fn render_json_object<'a, I>(registry: &Registry, fields: I) -> String
where
    I: IntoIterator<Item = (&'a str, TypeTag, &'a NativeValue)>,
{
    let mut out = String::from("{");
    for (position, (name, tag, value)) in fields.into_iter().enumerate() {
        if position > 0 {
            out.push(',');
        }
        out.push_str(&serde_json::Value::String(name.to_string()).to_string());
        out.push(':');
        out.push_str(&registry.to_json(tag, value));
    }
    out.push('}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_is_valid_json() {
        let registry = Registry::standard();
        let id = NativeValue::Integer(7);
        let name = NativeValue::from("Ann \"the\" admin");
        let extra = NativeValue::from(r#"{"tags":["a"]}"#);
        let missing = NativeValue::Null;

        let rendered = render_json_object(
            &registry,
            [
                ("id", TypeTag::Integer, &id),
                ("name", TypeTag::String, &name),
                ("extra", TypeTag::JsonString, &extra),
                ("missing", TypeTag::Date, &missing),
            ],
        );

        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(
            parsed,
            serde_json::json!({
                "id": 7,
                "name": "Ann \"the\" admin",
                "extra": {"tags": ["a"]},
                "missing": null
            })
        );
        assert!(rendered.starts_with(r#"{"id":7,"#));
    }

    #[test]
    fn test_empty_object() {
        let registry = Registry::standard();
        let fields: Vec<(&str, TypeTag, &NativeValue)> = Vec::new();
        assert_eq!(render_json_object(&registry, fields), "{}");
    }
}
