//! Conversions between `serde_json::Value` and QuickJS values.

use rquickjs::{Array, Ctx, Object, String as JsString, Type, Value};
use serde_json::{Map, Number, Value as JsonValue};

/// Cycle guard for object/array recursion.
const MAX_DEPTH: usize = 32;

/// Materialize a JSON value inside the given context.
pub fn json_to_js<'js>(ctx: &Ctx<'js>, value: &JsonValue) -> rquickjs::Result<Value<'js>> {
    match value {
        JsonValue::Null => Ok(Value::new_null(ctx.clone())),
        JsonValue::Bool(b) => Ok(Value::new_bool(ctx.clone(), *b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64().filter(|i| i32::try_from(*i).is_ok()) {
                Ok(Value::new_int(ctx.clone(), i as i32))
            } else {
                Ok(Value::new_float(ctx.clone(), n.as_f64().unwrap_or(f64::NAN)))
            }
        }
        JsonValue::String(s) => Ok(JsString::from_str(ctx.clone(), s)?.into_value()),
        JsonValue::Array(items) => {
            let array = Array::new(ctx.clone())?;
            for (index, item) in items.iter().enumerate() {
                array.set(index, json_to_js(ctx, item)?)?;
            }
            Ok(array.into_value())
        }
        JsonValue::Object(map) => {
            let object = Object::new(ctx.clone())?;
            for (key, item) in map {
                object.set(key.as_str(), json_to_js(ctx, item)?)?;
            }
            Ok(object.into_value())
        }
    }
}

/// Snapshot a QuickJS value as JSON. Returns `None` for `undefined` so the
/// caller can distinguish "no value" from an explicit `null`; nested
/// undefineds inside containers collapse to `null`.
pub fn js_to_json(value: &Value<'_>) -> Option<JsonValue> {
    js_to_json_depth(value, 0)
}

fn js_to_json_depth(value: &Value<'_>, depth: usize) -> Option<JsonValue> {
    if depth > MAX_DEPTH {
        return Some(JsonValue::Null);
    }
    match value.type_of() {
        Type::Undefined | Type::Uninitialized => None,
        Type::Null => Some(JsonValue::Null),
        Type::Bool => value.as_bool().map(JsonValue::Bool),
        Type::Int => value.as_int().map(|i| JsonValue::Number(i.into())),
        Type::Float => value
            .as_float()
            .map(|f| Number::from_f64(f).map(JsonValue::Number).unwrap_or(JsonValue::Null)),
        Type::String => value
            .as_string()
            .and_then(|s| s.to_string().ok())
            .map(JsonValue::String),
        Type::Array => value.as_array().map(|array| {
            let items = array
                .iter::<Value>()
                .map(|item| {
                    item.ok()
                        .and_then(|v| js_to_json_depth(&v, depth + 1))
                        .unwrap_or(JsonValue::Null)
                })
                .collect();
            JsonValue::Array(items)
        }),
        Type::Function | Type::Constructor => Some(JsonValue::String("[function]".to_string())),
        Type::Symbol => Some(JsonValue::String("[symbol]".to_string())),
        Type::Object | Type::Exception => value.as_object().map(|object| {
            let mut map = Map::new();
            for prop in object.props::<String, Value>() {
                if let Ok((key, item)) = prop {
                    let converted = js_to_json_depth(&item, depth + 1).unwrap_or(JsonValue::Null);
                    map.insert(key, converted);
                }
            }
            JsonValue::Object(map)
        }),
        _ => Some(JsonValue::Null),
    }
}
