use serde_json::{Map, Number, Value as JsonValue};

use super::model::SpectrumPoint;

/// Nesting below this depth is elided when pretty-printing.
const MAX_PRETTY_DEPTH: usize = 32;

/// Upper bound on pretty-printed output, in bytes.
const MAX_PRETTY_LEN: usize = 64 * 1024;

const ELLIPSIS: &str = "…";

// ---------------------------------------------------------------------------
// Normalised response
// ---------------------------------------------------------------------------

/// What the UI shows for a successful response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedResponse {
    pub spectrum: Option<Vec<SpectrumPoint>>,
    pub conclusion: String,
}

/// Reduce a raw `/process` body to spectrum + conclusion. Never fails.
pub fn normalize(raw: &JsonValue) -> NormalizedResponse {
    NormalizedResponse {
        spectrum: extract_spectrum(raw),
        conclusion: extract_conclusion(raw),
    }
}

// ---------------------------------------------------------------------------
// Spectrum
// ---------------------------------------------------------------------------

/// Returns `raw.spectrum` in received order when every element is an object
/// with numeric `x` and `cps`; `None` otherwise.
pub fn extract_spectrum(raw: &JsonValue) -> Option<Vec<SpectrumPoint>> {
    let items = raw.get("spectrum")?.as_array()?;
    items
        .iter()
        .map(|item| {
            let obj = item.as_object()?;
            Some(SpectrumPoint {
                x: obj.get("x")?.as_f64()?,
                cps: obj.get("cps")?.as_f64()?,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Conclusion
// ---------------------------------------------------------------------------

/// Known shapes of the upstream `conclusion` payload.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ConclusionShape<'a> {
    /// Missing, null, `""`, `false` or zero.
    Empty,
    Text(&'a str),
    /// Object with a non-empty `content` field (the field itself).
    Content(&'a JsonValue),
    /// Object with a non-empty `text` field.
    TextField(&'a JsonValue),
    /// Object with a non-empty `message` field.
    Message(&'a JsonValue),
    /// Object none of the above apply to.
    Opaque(&'a JsonValue),
    /// Any other primitive.
    Scalar(&'a JsonValue),
}

impl<'a> ConclusionShape<'a> {
    fn classify(value: Option<&'a JsonValue>) -> Self {
        let Some(value) = value.filter(|v| is_present(v)) else {
            return Self::Empty;
        };
        match value {
            JsonValue::String(s) => Self::Text(s),
            JsonValue::Object(map) => {
                if let Some(content) = present_field(map, "content") {
                    Self::Content(content)
                } else if let Some(text) = present_field(map, "text") {
                    Self::TextField(text)
                } else if let Some(message) = present_field(map, "message") {
                    Self::Message(message)
                } else {
                    Self::Opaque(value)
                }
            }
            other => Self::Scalar(other),
        }
    }

    fn render(self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.to_string(),
            Self::Content(content) => render_content(content),
            Self::TextField(text) => as_text(text),
            Self::Message(message) => as_text(message),
            Self::Opaque(value) => pretty(value),
            Self::Scalar(value) => stringify(value),
        }
    }
}

/// Reduce `raw.conclusion` to a single displayable string.
///
/// Total: any JSON value yields some string, possibly empty.
pub fn extract_conclusion(raw: &JsonValue) -> String {
    ConclusionShape::classify(raw.get("conclusion")).render()
}

fn render_content(content: &JsonValue) -> String {
    match content {
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(items) => {
            let picked = items.iter().find_map(|item| match item {
                JsonValue::String(s) => Some(s.clone()),
                JsonValue::Object(map) => present_field(map, "text").map(as_text),
                _ => None,
            });
            match picked {
                Some(text) if !text.is_empty() => text,
                _ => pretty(content),
            }
        }
        JsonValue::Object(map) => present_field(map, "text")
            .map(as_text)
            .unwrap_or_else(|| pretty(content)),
        other => stringify(other),
    }
}

/// Truthiness as the upstream payload uses it: null, `""`, `false` and zero
/// count as absent.
fn is_present(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

fn present_field<'a>(map: &'a Map<String, JsonValue>, key: &str) -> Option<&'a JsonValue> {
    map.get(key).filter(|v| is_present(v))
}

/// Strings as-is, structures pretty-printed, other primitives stringified.
fn as_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(_) | JsonValue::Object(_) => pretty(value),
        other => stringify(other),
    }
}

fn stringify(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "null".to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => whole(n).map_or_else(|| n.to_string(), |i| i.to_string()),
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(_) | JsonValue::Object(_) => pretty(value),
    }
}

/// A float with no fractional part, as an integer, so `3.0` prints as `3`.
fn whole(n: &Number) -> Option<i64> {
    let f = n.as_f64().filter(|_| n.is_f64())?;
    (f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
}

/// Two-space indented JSON, bounded in depth and length.
pub fn pretty(value: &JsonValue) -> String {
    let pruned = prune(value, MAX_PRETTY_DEPTH);
    bounded(serde_json::to_string_pretty(&pruned).unwrap_or_default())
}

/// Cut `out` to the display limit on a char boundary, marking the cut.
pub fn bounded(mut out: String) -> String {
    if out.len() > MAX_PRETTY_LEN {
        let mut end = MAX_PRETTY_LEN;
        while !out.is_char_boundary(end) {
            end -= 1;
        }
        out.truncate(end);
        out.push_str(ELLIPSIS);
    }
    out
}

fn prune(value: &JsonValue, depth: usize) -> JsonValue {
    match value {
        JsonValue::Array(_) | JsonValue::Object(_) if depth == 0 => {
            JsonValue::String(ELLIPSIS.to_string())
        }
        JsonValue::Array(items) => {
            JsonValue::Array(items.iter().map(|v| prune(v, depth - 1)).collect())
        }
        JsonValue::Object(map) => JsonValue::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), prune(v, depth - 1)))
                .collect(),
        ),
        JsonValue::Number(n) => whole(n).map_or_else(|| value.clone(), JsonValue::from),
        other => other.clone(),
    }
}
