use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A recipe as extracted from a page and written by the record store.
///
/// Every field the model may leave out is optional; consumers of the stored
/// documents decide on defaults. `id` and `source_url` are only ever set by
/// [`RecordStore`](crate::store::RecordStore).
///
/// Deserialization never rejects an object: a field whose value does not fit
/// its typed shape is left unset and kept verbatim in `extra` under its own
/// key, so the stored document still carries it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRecipe")]
pub struct RecipeRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    /// Bare ingredient names, without quantities or units
    #[serde(skip_serializing_if = "Option::is_none")]
    pub core_ingredients: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diet_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    /// Minutes from preparation to eating
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_eat: Option<u32>,
    /// Links to related recipes, as found on the page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion_links: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img_links: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Additional fields, and values that fit no typed field, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RecipeRecord {
    pub fn suggestion_links(&self) -> &[String] {
        self.suggestion_links.as_deref().unwrap_or_default()
    }
}

/// Result of one extraction attempt that reached the completion service.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    /// The model produced a recipe
    Extracted(RecipeRecord),
    /// The model reported why no recipe could be extracted
    Failed(String),
}

/// Recipe fields in whatever shape the model or an older document used.
#[derive(Debug, Deserialize)]
struct RawRecipe {
    #[serde(default)]
    title: Option<Text>,
    #[serde(default)]
    ingredients: Option<TextList>,
    #[serde(default)]
    core_ingredients: Option<TextList>,
    #[serde(default)]
    instructions: Option<TextList>,
    #[serde(default)]
    tags: Option<TextList>,
    #[serde(default)]
    diet_type: Option<Text>,
    #[serde(default)]
    cuisine: Option<Text>,
    #[serde(default)]
    time_to_eat: Option<Minutes>,
    #[serde(default)]
    suggestion_links: Option<TextList>,
    #[serde(default)]
    img_links: Option<TextList>,
    #[serde(default)]
    id: Option<Text>,
    #[serde(default)]
    source_url: Option<Text>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Text {
    Plain(String),
    Other(Value),
}

impl Text {
    fn into_text(self) -> Result<String, Value> {
        match self {
            Text::Plain(text) => Ok(text),
            Text::Other(value) => Err(value),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextList {
    One(String),
    Many(Vec<Value>),
    Other(Value),
}

impl TextList {
    /// Scalars become strings and nulls are skipped; nested arrays or
    /// objects keep the whole value raw.
    fn into_list(self) -> Result<Vec<String>, Value> {
        match self {
            TextList::One(text) => Ok(vec![text]),
            TextList::Many(values) => {
                if values.iter().any(|v| v.is_array() || v.is_object()) {
                    return Err(Value::Array(values));
                }
                Ok(values
                    .into_iter()
                    .filter_map(|value| match value {
                        Value::Null => None,
                        Value::String(text) => Some(text),
                        other => Some(other.to_string()),
                    })
                    .collect())
            }
            TextList::Other(value) => Err(value),
        }
    }

    /// A list of steps is joined line by line.
    fn into_joined(self) -> Result<String, Value> {
        match self {
            TextList::One(text) => Ok(text),
            steps => steps.into_list().map(|steps| steps.join("\n")),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Minutes {
    Number(serde_json::Number),
    Text(String),
    Other(Value),
}

impl Minutes {
    fn into_minutes(self) -> Result<u32, Value> {
        match self {
            Minutes::Number(number) => {
                let minutes = match number.as_u64() {
                    Some(whole) => Some(u32::try_from(whole).unwrap_or(u32::MAX)),
                    None => number.as_f64().and_then(whole_minutes),
                };
                minutes.ok_or(Value::Number(number))
            }
            Minutes::Text(text) => parse_duration(&text).ok_or(Value::String(text)),
            Minutes::Other(value) => Err(value),
        }
    }
}

fn whole_minutes(minutes: f64) -> Option<u32> {
    if minutes.is_finite() && minutes >= 0.0 {
        Some(minutes.round().min(u32::MAX as f64) as u32)
    } else {
        None
    }
}

/// Reads durations such as "45", "45 min", "1.5 hours" or "1 h 30 min".
///
/// Each amount may carry a minute or hour unit (English or German) and a
/// missing unit means minutes. Any other unit or wording yields `None`.
pub fn parse_duration(text: &str) -> Option<u32> {
    let mut rest = text.trim();
    if rest.is_empty() {
        return None;
    }

    let mut total = 0.0;
    while !rest.is_empty() {
        let amount_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == ','))
            .unwrap_or(rest.len());
        if amount_len == 0 {
            return None;
        }
        let amount: f64 = rest[..amount_len].replace(',', ".").parse().ok()?;
        rest = rest[amount_len..].trim_start();

        let unit_len = rest
            .find(|c: char| !c.is_alphabetic())
            .unwrap_or(rest.len());
        let factor = match rest[..unit_len].to_lowercase().as_str() {
            "" | "m" | "min" | "mins" | "minute" | "minutes" | "minuten" => 1.0,
            "h" | "hr" | "hrs" | "hour" | "hours" | "std" | "stunde" | "stunden" => 60.0,
            _ => return None,
        };
        total += amount * factor;

        rest = rest[unit_len..].trim_start_matches(|c: char| c.is_whitespace() || c == '.');
        for joiner in ["and ", "und "] {
            if let Some(stripped) = rest.strip_prefix(joiner) {
                rest = stripped.trim_start();
            }
        }
    }

    whole_minutes(total)
}

/// Keeps a value that did not fit its field under the field's own key.
fn settle<T>(extra: &mut Map<String, Value>, key: &str, value: Option<Result<T, Value>>) -> Option<T> {
    match value? {
        Ok(value) => Some(value),
        Err(raw) => {
            extra.insert(key.to_string(), raw);
            None
        }
    }
}

impl From<RawRecipe> for RecipeRecord {
    fn from(raw: RawRecipe) -> Self {
        let mut extra = raw.extra;
        let text = |extra: &mut Map<String, Value>, key: &str, value: Option<Text>| {
            settle(extra, key, value.map(Text::into_text))
        };
        let list = |extra: &mut Map<String, Value>, key: &str, value: Option<TextList>| {
            settle(extra, key, value.map(TextList::into_list))
        };

        RecipeRecord {
            title: text(&mut extra, "title", raw.title),
            ingredients: list(&mut extra, "ingredients", raw.ingredients),
            core_ingredients: list(&mut extra, "core_ingredients", raw.core_ingredients),
            instructions: settle(
                &mut extra,
                "instructions",
                raw.instructions.map(TextList::into_joined),
            ),
            tags: list(&mut extra, "tags", raw.tags),
            diet_type: text(&mut extra, "diet_type", raw.diet_type),
            cuisine: text(&mut extra, "cuisine", raw.cuisine),
            time_to_eat: settle(
                &mut extra,
                "time_to_eat",
                raw.time_to_eat.map(Minutes::into_minutes),
            ),
            suggestion_links: list(&mut extra, "suggestion_links", raw.suggestion_links),
            img_links: list(&mut extra, "img_links", raw.img_links),
            id: text(&mut extra, "id", raw.id),
            source_url: text(&mut extra, "source_url", raw.source_url),
            extra,
        }
    }
}
