use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// A package published as a layer in one region, as exposed by the API.
/// Only `created` and `region` are guaranteed; DynamoDB omits any other
/// projected attribute the stored item lacks.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PackageRelease {
    pub created: CreatedDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
    #[serde(deserialize_with = "non_empty")]
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deploy_status: Option<String>,
    /// Any other projected attribute, kept under its public name.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Creation timestamp as stored: a `YYYY-MM-DD` calendar date, optionally
/// followed by a time part after `T` or a space. Serialized back verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedDate {
    raw: String,
    date: NaiveDate,
}

#[derive(thiserror::Error, Debug)]
pub enum CreatedDateError {
    #[error(transparent)]
    Date(#[from] chrono::ParseError),
    #[error("unexpected text after the date")]
    TrailingText,
}

impl CreatedDate {
    pub fn parse(raw: &str) -> Result<Self, CreatedDateError> {
        let (day, rest) = match raw.char_indices().nth(10) {
            Some((i, _)) => raw.split_at(i),
            None => (raw, ""),
        };
        if !(rest.is_empty() || rest.starts_with('T') || rest.starts_with(' ')) {
            return Err(CreatedDateError::TrailingText);
        }

        let date = NaiveDate::parse_from_str(day, "%Y-%m-%d")?;
        Ok(Self { raw: raw.to_string(), date })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl Serialize for CreatedDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for CreatedDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        CreatedDate::parse(&raw)
            .map_err(|e| de::Error::custom(format!("invalid creation date {raw:?}: {e}")))
    }
}

fn non_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let s = String::deserialize(deserializer)?;
    if s.trim().is_empty() {
        return Err(de::Error::custom("region must not be empty"));
    }
    Ok(s)
}
