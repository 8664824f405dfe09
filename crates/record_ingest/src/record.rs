use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved key holding the record's [`RecordType`] tag.
pub const TYPE_KEY: &str = "_type";

/// Reserved key holding unparsed raw text.
pub const RAW_KEY: &str = "_raw";

/// Closed set of tags stored under [`TYPE_KEY`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum RecordType {
    Plus,
    StartRelation,
    EndRelation,
    Relation,
    Meta,
}

impl RecordType {
    pub const ALL: [RecordType; 5] = [
        RecordType::Plus,
        RecordType::StartRelation,
        RecordType::EndRelation,
        RecordType::Relation,
        RecordType::Meta,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::Plus => "PLUS",
            RecordType::StartRelation => "StartRelation",
            RecordType::EndRelation => "EndRelation",
            RecordType::Relation => "Relation",
            RecordType::Meta => "Meta",
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
#[error("unknown record type tag: {0:?}")]
pub struct UnknownRecordType(pub String);

impl FromStr for RecordType {
    type Err = UnknownRecordType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| UnknownRecordType(s.to_string()))
    }
}

/// A structured record: string keys mapped to arbitrary JSON values.
///
/// Serializes transparently as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record holding only a type tag.
    pub fn tagged(ty: RecordType) -> Self {
        let mut record = Self::new();
        record.set_type(ty);
        record
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Overwrites the `_type` tag.
    pub fn set_type(&mut self, ty: RecordType) {
        self.0
            .insert(TYPE_KEY.to_string(), Value::String(ty.as_str().to_string()));
    }

    /// The `_type` tag, if present, a string, and one of the known tags.
    pub fn record_type(&self) -> Option<RecordType> {
        self.0.get(TYPE_KEY)?.as_str()?.parse().ok()
    }

    pub fn raw(&self) -> Option<&str> {
        self.0.get(RAW_KEY)?.as_str()
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl TryFrom<Value> for Record {
    type Error = Value;

    /// Only top-level objects become records; anything else is handed back.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(other),
        }
    }
}
