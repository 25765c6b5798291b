use std::collections::BTreeMap;

use log::warn;
use recall_core::model::{CardId, DeckProgress};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(ser)
}

/// Decode a stored payload, treating anything unreadable as absent.
pub(crate) fn decode_or_absent<T: DeserializeOwned>(key: &str, raw: Option<String>) -> Option<T> {
    let raw = raw?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("ignoring malformed data under {key}: {err}");
            None
        }
    }
}

/// Persisted shape for deck progress: card ids become object keys.
pub(crate) type ProgressRecord = BTreeMap<String, bool>;

pub(crate) fn progress_to_record(progress: &DeckProgress) -> ProgressRecord {
    progress
        .iter()
        .map(|(id, rated)| (id.to_string(), rated))
        .collect()
}

pub(crate) fn progress_from_record(key: &str, record: ProgressRecord) -> Option<DeckProgress> {
    let mut progress = DeckProgress::new();
    for (raw_id, rated) in record {
        match raw_id.parse::<CardId>() {
            Ok(id) => progress.set(id, rated),
            Err(err) => {
                warn!("ignoring malformed data under {key}: {err}");
                return None;
            }
        }
    }
    Some(progress)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_payload_reads_as_absent() {
        let parsed: Option<Vec<u32>> = decode_or_absent("k", Some("{not json".into()));
        assert_eq!(parsed, None);

        let missing: Option<Vec<u32>> = decode_or_absent("k", None);
        assert_eq!(missing, None);
    }

    #[test]
    fn progress_record_uses_string_keys() {
        let progress = DeckProgress::from_rated([CardId::new(3), CardId::new(10)]);
        let record = progress_to_record(&progress);
        assert_eq!(encode(&record).unwrap(), r#"{"10":true,"3":true}"#);

        let back = progress_from_record("k", record).unwrap();
        assert_eq!(back, progress);
    }

    #[test]
    fn progress_with_bad_card_id_is_absent() {
        let mut record = ProgressRecord::new();
        record.insert("abc".into(), true);
        assert_eq!(progress_from_record("k", record), None);
    }
}
