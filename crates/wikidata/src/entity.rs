//! Projection of raw `wbgetentities` records.

use serde::Deserialize;
use serde_json::Value;

use crate::types::{PropertyMap, PropertyValue, SimplifiedEntity};

#[derive(Deserialize)]
struct LangValue {
    value: String,
}

#[derive(Deserialize)]
struct Statement {
    mainsnak: Option<Snak>,
}

#[derive(Deserialize)]
struct Snak {
    datavalue: Option<DataValue>,
}

#[derive(Deserialize)]
struct DataValue {
    value: Value,
}

/// Keep only the claims for the given property ids. An empty filter keeps
/// everything.
pub(crate) fn retain_claims(entity: &mut Value, properties: &[String]) {
    if properties.is_empty() {
        return;
    }
    if let Some(Value::Object(claims)) = entity.get_mut("claims") {
        claims.retain(|id, _| properties.iter().any(|p| p == id));
    }
}

/// Flatten an entity record.
///
/// Labels and descriptions become plain `lang -> text` maps. For each
/// property, statements are visited in delivered order and reduced to their
/// main value; statements without one (`somevalue`, `novalue`) are skipped, and
/// a property left with no values is dropped entirely.
pub fn simplify(entity: &Value) -> SimplifiedEntity {
    let id = entity.get("id").and_then(Value::as_str).map(str::to_string);
    let labels = lang_map(entity.get("labels"));
    let descriptions = lang_map(entity.get("descriptions"));

    let mut properties = Vec::new();
    if let Some(Value::Object(claims)) = entity.get("claims") {
        for (property, statements) in claims {
            let values = property_values(statements);
            if !values.is_empty() {
                properties.push((property.clone(), values));
            }
        }
    }

    SimplifiedEntity {
        id,
        labels,
        descriptions,
        properties: PropertyMap(properties),
    }
}

fn lang_map(value: Option<&Value>) -> std::collections::BTreeMap<String, String> {
    let Some(Value::Object(map)) = value else {
        return Default::default();
    };
    map.iter()
        .filter_map(|(lang, v)| {
            let LangValue { value } = LangValue::deserialize(v).ok()?;
            Some((lang.clone(), value))
        })
        .collect()
}

fn property_values(statements: &Value) -> Vec<PropertyValue> {
    let Some(statements) = statements.as_array() else {
        return Vec::new();
    };
    statements
        .iter()
        .filter_map(|s| {
            let statement = Statement::deserialize(s).ok()?;
            let datavalue = statement.mainsnak?.datavalue?;
            Some(main_value(datavalue.value))
        })
        .collect()
}

fn main_value(value: Value) -> PropertyValue {
    match value {
        Value::Object(map) => match map.get("id").and_then(Value::as_str) {
            Some(id) => PropertyValue {
                value: id.to_string(),
                label: Some(
                    map.get("label")
                        .and_then(Value::as_str)
                        .unwrap_or(id)
                        .to_string(),
                ),
            },
            None => PropertyValue {
                value: Value::Object(map).to_string(),
                label: None,
            },
        },
        Value::String(s) => PropertyValue { value: s, label: None },
        other => PropertyValue {
            value: other.to_string(),
            label: None,
        },
    }
}
