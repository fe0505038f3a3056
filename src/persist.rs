//! Schema boundary between the typed stores and the raw key-value entries.
//!
//! Loading tells "absent" apart from "corrupt". A whole entry that is not the
//! expected outer shape is `MalformedPersistedData`; inside a well-formed
//! array, records that fail to decode or validate are moved to
//! `<key>.quarantine` and their valid siblings are kept.

use std::collections::HashSet;

use anyhow::Context;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use crate::{
    error::{AppError, AppResult},
    storage::KeyValueStore,
};

/// A stored collection element.
pub trait Record: Serialize + DeserializeOwned {
    fn record_id(&self) -> &str;

    /// A second field that must be unique across the collection.
    fn unique_field(&self) -> Option<&str> {
        None
    }

    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

pub fn quarantine_key(key: &str) -> String {
    format!("{key}.quarantine")
}

fn malformed(key: &str, reason: impl ToString) -> AppError {
    AppError::MalformedPersistedData {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// Loads a collection. Bad records are quarantined; a corrupt entry is
/// quarantined whole and the collection starts empty. May rewrite the entry,
/// so callers hold the collection's lock.
pub async fn load_collection_or_reset<T: Record>(
    kv: &dyn KeyValueStore,
    key: &str,
) -> AppResult<Vec<T>> {
    let Some(raw) = kv.get(key).await? else {
        return Ok(Vec::new());
    };
    match decode_collection(kv, key, &raw).await {
        Err(AppError::MalformedPersistedData { key: k, reason }) => {
            warn!(key = %k, %reason, "stored collection is corrupt; starting empty");
            append_quarantine(kv, key, vec![json!({ "reason": reason, "raw": raw })]).await?;
            kv.remove(key).await?;
            Ok(Vec::new())
        }
        other => other,
    }
}

/// Strict decode of an entry already read: a bad outer shape is an error.
async fn decode_collection<T: Record>(
    kv: &dyn KeyValueStore,
    key: &str,
    raw: &str,
) -> AppResult<Vec<T>> {
    let values: Vec<Value> = serde_json::from_str(raw).map_err(|e| malformed(key, e))?;

    let mut records = Vec::with_capacity(values.len());
    let mut rejected = Vec::new();
    let mut ids = HashSet::new();
    let mut uniques = HashSet::new();

    for value in values {
        let record = match serde_json::from_value::<T>(value.clone()) {
            Ok(r) => r,
            Err(e) => {
                rejected.push(json!({ "reason": e.to_string(), "record": value }));
                continue;
            }
        };
        let verdict = record.validate().and_then(|_| {
            if !ids.insert(record.record_id().to_string()) {
                return Err(format!("duplicate id `{}`", record.record_id()));
            }
            if let Some(u) = record.unique_field() {
                if !uniques.insert(u.to_string()) {
                    return Err(format!("duplicate unique field `{u}`"));
                }
            }
            Ok(())
        });
        match verdict {
            Ok(()) => records.push(record),
            Err(reason) => rejected.push(json!({ "reason": reason, "record": value })),
        }
    }

    if !rejected.is_empty() {
        warn!(key, count = rejected.len(), "quarantining malformed records");
        append_quarantine(kv, key, rejected).await?;
        save_collection(kv, key, &records).await?;
    }
    Ok(records)
}

pub async fn save_collection<T: Record>(
    kv: &dyn KeyValueStore,
    key: &str,
    records: &[T],
) -> AppResult<()> {
    let text = serde_json::to_string(records).with_context(|| format!("encode {key}"))?;
    kv.set(key, &text).await?;
    Ok(())
}

pub async fn load_single<T: DeserializeOwned>(
    kv: &dyn KeyValueStore,
    key: &str,
) -> AppResult<Option<T>> {
    match kv.get(key).await? {
        None => Ok(None),
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| malformed(key, e)),
    }
}

pub async fn save_single<T: Serialize>(
    kv: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> AppResult<()> {
    let text = serde_json::to_string(value).with_context(|| format!("encode {key}"))?;
    kv.set(key, &text).await?;
    Ok(())
}

async fn append_quarantine(
    kv: &dyn KeyValueStore,
    key: &str,
    mut entries: Vec<Value>,
) -> AppResult<()> {
    let qkey = quarantine_key(key);
    let mut existing: Vec<Value> = match kv.get(&qkey).await? {
        Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(key = %qkey, error = %e, "quarantine entry unreadable; replacing");
            Vec::new()
        }),
        None => Vec::new(),
    };
    existing.append(&mut entries);
    let text = serde_json::to_string(&existing).with_context(|| format!("encode {qkey}"))?;
    kv.set(&qkey, &text).await?;
    Ok(())
}
