// ============================================================================
// RESPONSE HELPERS - El webhook no tiene un contrato tipado estricto
// ============================================================================
// Campos ausentes o con otro tipo degradan a valores por defecto en lugar de
// fallar la deserialización completa.
// ============================================================================

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// `success === true || success === 'true'`
pub fn is_success(response: &Value) -> bool {
    match response.get("success") {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => text == "true",
        _ => false,
    }
}

/// Verdad "a la JavaScript" para flags sueltos (login acepta cualquier valor truthy).
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Campo `message` de la respuesta, si es texto
pub fn message_of(response: &Value) -> Option<String> {
    response
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Primer array encontrado entre las claves dadas (o la respuesta misma si es array).
pub fn find_array<'a>(response: &'a Value, keys: &[&str]) -> Option<&'a Vec<Value>> {
    if let Value::Array(items) = response {
        return Some(items);
    }
    keys.iter()
        .find_map(|key| response.get(*key).and_then(Value::as_array))
}

/// Entero que puede llegar como número, string numérico o null
pub fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Texto que puede llegar como string o número
pub fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_as_i64(&value)
        .and_then(|n| u64::try_from(n).ok())
        .unwrap_or(0))
}

/// String que puede llegar como número (ids de Meta) o null
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) => text,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}
