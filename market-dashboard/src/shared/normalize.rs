/// Quote normalization
///
/// Turns raw backend JSON into typed display records. Individual fields are
/// never fatal: a missing `price`/`pct` becomes `0`, a missing symbol becomes
/// [`UNKNOWN_SYMBOL`], a missing collection becomes empty. Only a payload that
/// is not a JSON object at all (or not an array, for mini quotes) fails.
use indexmap::IndexMap;
use serde_json::Value;

use super::error::FetchError;
use super::types::{
    BreadthData, MacroEvent, MiniQuote, Mover, Posture, Quote, SecHeadline, SectorQuote, Summary,
    UNKNOWN_SYMBOL,
};

/// Parse a response body and normalize it into a [`Summary`].
pub fn normalize_body(body: &str) -> Result<Summary, FetchError> {
    let raw: Value = serde_json::from_str(body)?;
    normalize(&raw)
}

/// Normalize a summary payload.
pub fn normalize(raw: &Value) -> Result<Summary, FetchError> {
    let obj = raw.as_object().ok_or_else(|| {
        FetchError::Parse(format!("summary payload is not an object: {}", type_name(raw)))
    })?;

    let indices = array(obj.get("indices"))
        .iter()
        .map(normalize_quote)
        .collect();

    let sectors = array(obj.get("sectors"))
        .iter()
        .map(normalize_sector)
        .collect();

    let vix = obj
        .get("vix")
        .map(normalize_quote)
        .unwrap_or_else(|| Quote::new(UNKNOWN_SYMBOL, 0.0, 0.0));

    let breadth: IndexMap<String, BreadthData> = object(obj.get("breadth"))
        .map(|map| {
            map.iter()
                .map(|(exchange, v)| (exchange.clone(), normalize_breadth(v)))
                .collect()
        })
        .unwrap_or_default();

    let movers: IndexMap<String, Vec<Mover>> = object(obj.get("movers"))
        .map(|map| {
            map.iter()
                .map(|(group, v)| {
                    let rows = array(Some(v)).iter().map(normalize_mover).collect::<Vec<_>>();
                    (group.clone(), rows)
                })
                .collect()
        })
        .unwrap_or_default();

    let macro_events = array(obj.get("macro"))
        .iter()
        .filter(|v| v.is_object())
        .map(|v| MacroEvent {
            time: v.get("time").and_then(text).unwrap_or_default(),
            label: v.get("label").and_then(text).unwrap_or_default(),
            url: v.get("url").and_then(text).filter(|u| !u.is_empty()),
        })
        .collect();

    let sec_headlines = array(obj.get("sec_headlines"))
        .iter()
        .filter(|v| v.is_object())
        .map(|v| SecHeadline {
            time: v.get("time").and_then(text).unwrap_or_default(),
            title: v.get("title").and_then(text).unwrap_or_default(),
            url: v.get("url").and_then(text).unwrap_or_default(),
        })
        .collect();

    let session_posture = obj
        .get("session_posture")
        .filter(|v| v.is_object())
        .map(normalize_posture)
        .unwrap_or_default();

    let sources = object(obj.get("sources"))
        .map(|map| {
            map.iter()
                .map(|(k, v)| (k.clone(), text(v).unwrap_or_default()))
                .collect()
        })
        .unwrap_or_default();

    let latency_min = object(obj.get("latency_min"))
        .map(|map| {
            map.iter()
                .map(|(k, v)| (k.clone(), number(v).map(|n| n as i64).unwrap_or(0)))
                .collect()
        })
        .unwrap_or_default();

    Ok(Summary {
        as_of: obj.get("as_of").and_then(text).unwrap_or_default(),
        indices,
        vix,
        breadth,
        sectors,
        movers,
        macro_events,
        sec_headlines,
        session_posture,
        sources,
        latency_min,
        notes: strings(obj.get("notes")),
    })
}

/// Normalize one quote; never fails.
pub fn normalize_quote(raw: &Value) -> Quote {
    Quote {
        symbol: symbol(raw.get("symbol")),
        price: raw.get("price").and_then(number).unwrap_or(0.0).max(0.0),
        pct: raw.get("pct").and_then(number).unwrap_or(0.0),
        high: raw.get("high").and_then(number),
        low: raw.get("low").and_then(number),
        volume: raw.get("volume").and_then(count),
    }
}

fn normalize_breadth(raw: &Value) -> BreadthData {
    BreadthData {
        advancers: raw.get("advancers").and_then(count),
        decliners: raw.get("decliners").and_then(count),
        up_vol: raw.get("upVol").and_then(count),
        down_vol: raw.get("downVol").and_then(count),
    }
}

fn normalize_mover(raw: &Value) -> Mover {
    Mover {
        symbol: symbol(raw.get("symbol")),
        price: raw.get("price").and_then(number).unwrap_or(0.0).max(0.0),
        pct: raw.get("pct").and_then(number).unwrap_or(0.0),
        vol: raw.get("vol").and_then(count).unwrap_or(0),
    }
}

fn normalize_sector(raw: &Value) -> SectorQuote {
    SectorQuote {
        quote: normalize_quote(raw),
        name: raw.get("name").and_then(text).unwrap_or_default(),
    }
}

fn normalize_posture(raw: &Value) -> Posture {
    let components: IndexMap<String, f64> = object(raw.get("components"))
        .map(|map| {
            map.iter()
                .map(|(k, v)| (k.clone(), number(v).unwrap_or(0.0)))
                .collect()
        })
        .unwrap_or_default();

    Posture {
        label: raw
            .get("label")
            .and_then(text)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| Posture::default().label),
        score: raw.get("score").and_then(number).unwrap_or(0.0),
        notes: strings(raw.get("notes")),
        components,
    }
}

/// Normalize a `/api/miniquotes` payload (a JSON array).
pub fn normalize_mini_quotes(raw: &Value) -> Result<Vec<MiniQuote>, FetchError> {
    let items = raw.as_array().ok_or_else(|| {
        FetchError::Parse(format!("miniquotes payload is not an array: {}", type_name(raw)))
    })?;

    Ok(items
        .iter()
        .map(|item| MiniQuote {
            symbol: symbol(item.get("symbol")),
            pct: item.get("pct").and_then(number).unwrap_or(0.0),
            sparkline: array(item.get("sparkline"))
                .iter()
                .filter_map(number)
                .collect(),
            price: item.get("price").and_then(number),
            volume: item.get("volume").and_then(count),
        })
        .collect())
}

/// Finite number, accepting numeric strings ("1.25") as some feeds send them
fn number(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Non-negative whole count (volumes, advancers)
fn count(v: &Value) -> Option<u64> {
    number(v).map(|n| n.max(0.0) as u64)
}

fn text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn symbol(v: Option<&Value>) -> String {
    v.and_then(text)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNKNOWN_SYMBOL.to_string())
}

fn array(v: Option<&Value>) -> &[Value] {
    v.and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[])
}

fn object(v: Option<&Value>) -> Option<&serde_json::Map<String, Value>> {
    v.and_then(Value::as_object)
}

fn strings(v: Option<&Value>) -> Vec<String> {
    array(v).iter().filter_map(text).collect()
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
