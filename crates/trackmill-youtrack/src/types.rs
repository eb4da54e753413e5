//! YouTrack API types

use crate::{Error, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use trackmill_core::models::{fields, Assignee, FieldValue, Fields, HistoryChange, Issue, Link};

/// Custom fields the tracker stores as epoch milliseconds but the engine
/// reads as dates.
const DATE_FIELDS: [&str; 1] = [fields::START_DATE];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YouTrackIssue {
    pub id_readable: String,
    #[serde(default)]
    pub project: Option<YouTrackProject>,
    pub summary: String,
    #[serde(default)]
    pub assignee: Option<YouTrackUser>,
    /// Epoch milliseconds.
    pub created: i64,
    #[serde(default)]
    pub resolved: Option<i64>,
    #[serde(default)]
    pub custom_fields: Vec<YouTrackField>,
    #[serde(default)]
    pub links: Vec<YouTrackLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YouTrackProject {
    pub short_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YouTrackUser {
    pub login: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTrackField {
    pub name: String,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YouTrackLink {
    pub type_name: String,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YouTrackChange {
    #[serde(default)]
    pub fields: HashMap<String, String>,
    /// Epoch milliseconds.
    pub updated: i64,
    pub updater_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YouTrackProjectField {
    pub name: String,
    #[serde(default)]
    pub values: Vec<YouTrackBundleValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTrackBundleValue {
    pub name: String,
}

impl TryFrom<YouTrackIssue> for Issue {
    type Error = Error;

    fn try_from(raw: YouTrackIssue) -> Result<Self> {
        let created = timestamp(raw.created)?;
        let resolved = raw.resolved.map(timestamp).transpose()?;
        let project = raw
            .project
            .map(|p| p.short_name)
            .unwrap_or_else(|| project_of(&raw.id_readable));

        let mut custom_fields = Fields::new();
        for field in raw.custom_fields {
            if let Some(value) = field_value(&field.name, field.value)? {
                custom_fields.insert(field.name, value);
            }
        }

        Ok(Issue {
            id: raw.id_readable,
            project,
            summary: raw.summary,
            assignee: raw.assignee.map(|user| Assignee {
                login: user.login,
                full_name: user.full_name,
            }),
            created,
            resolved,
            fields: custom_fields,
            links: raw
                .links
                .into_iter()
                .map(|link| Link {
                    link_type: link.type_name,
                    source: link.source,
                    target: link.target,
                })
                .collect(),
        })
    }
}

impl TryFrom<YouTrackChange> for HistoryChange {
    type Error = Error;

    fn try_from(raw: YouTrackChange) -> Result<Self> {
        Ok(HistoryChange {
            fields: raw.fields,
            updated: timestamp(raw.updated)?,
            updater: raw.updater_name,
        })
    }
}

fn timestamp(millis: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| Error::InvalidData(format!("timestamp out of range: {millis}")))
}

/// Issue ids are `<project short name>-<number>`.
fn project_of(id: &str) -> String {
    id.split('-').next().unwrap_or(id).to_string()
}

fn field_value(name: &str, value: Value) -> Result<Option<FieldValue>> {
    let value = match value {
        Value::Null => None,
        Value::String(text) => Some(FieldValue::Text(text)),
        Value::Number(number) => {
            let millis_or_value = number
                .as_f64()
                .ok_or_else(|| Error::InvalidData(format!("unreadable number in {name}")))?;
            if DATE_FIELDS.contains(&name) {
                Some(FieldValue::Date(timestamp(millis_or_value as i64)?))
            } else {
                Some(FieldValue::Number(millis_or_value))
            }
        }
        Value::Bool(flag) => Some(FieldValue::Text(flag.to_string())),
        Value::Array(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(text) => values.push(text),
                    // enum/version bundle elements come back as objects
                    // with a "name"
                    Value::Object(map) => {
                        if let Some(Value::String(text)) = map.get("name") {
                            values.push(text.clone());
                        }
                    }
                    _ => {}
                }
            }
            Some(FieldValue::List(values))
        }
        Value::Object(map) => match map.get("name") {
            Some(Value::String(text)) => Some(FieldValue::Text(text.clone())),
            _ => None,
        },
    };
    Ok(value)
}
