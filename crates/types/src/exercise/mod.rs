//! The persisted exercise document model and its identifier.

use crate::error::StoreError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// A 12-byte exercise identifier, rendered as 24 lowercase hex characters.
///
/// Layout: 4-byte big-endian unix-seconds timestamp, 5 random bytes, 3-byte
/// big-endian counter. Ids are assigned by the store on insert, are unique
/// across all records, and are never reused after deletion.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExerciseId([u8; 12]);

static ID_COUNTER: AtomicU32 = AtomicU32::new(0);

impl ExerciseId {
    /// Generates a fresh identifier.
    pub fn generate() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or_default();
        let random: [u8; 5] = rand::random();
        let count = ID_COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff;

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(&random);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        Self(bytes)
    }

    /// The raw bytes, used as the storage key.
    pub fn as_bytes(&self) -> &[u8; 12] {
        &self.0
    }

    /// Reconstructs an id from raw storage-key bytes.
    pub fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for ExerciseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExerciseId({})", hex::encode(self.0))
    }
}

impl FromStr for ExerciseId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = hex::decode(s).map_err(|_| StoreError::InvalidId(s.to_string()))?;
        let bytes: [u8; 12] = decoded
            .try_into()
            .map_err(|_| StoreError::InvalidId(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl Serialize for ExerciseId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ExerciseId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|e: StoreError| D::Error::custom(e))
    }
}

/// A persisted sorting-practice exercise.
///
/// The `array` length invariant (>= 2 elements) is enforced by the client
/// UI, not by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    /// Assigned by the store on insert; immutable thereafter.
    pub id: ExerciseId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The subject data for the sort exercise.
    pub array: Vec<i64>,
    /// Free-text instructions shown to the learner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl Exercise {
    /// Merges a patch over this record. Fields absent from the patch are
    /// left untouched; fields present replace the stored value.
    pub fn apply_patch(&mut self, patch: ExercisePatch) {
        if let Some(name) = patch.name {
            self.name = Some(name);
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(array) = patch.array {
            self.array = array;
        }
        if let Some(instructions) = patch.instructions {
            self.instructions = Some(instructions);
        }
    }
}

/// The insert payload: every `Exercise` field except the id, which the
/// store assigns. The array contents are not validated beyond existing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateExercise {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub array: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl CreateExercise {
    /// Binds the payload to a store-assigned id.
    pub fn into_exercise(self, id: ExerciseId) -> Exercise {
        Exercise {
            id,
            name: self.name,
            description: self.description,
            array: self.array,
            instructions: self.instructions,
        }
    }
}

/// The update payload: every field optional, merge semantics. Unknown
/// fields are rejected at the service boundary rather than silently stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExercisePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl ExercisePatch {
    /// True when the patch carries no fields; merging it is a no-op.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.array.is_none()
            && self.instructions.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trips_through_hex() {
        let id = ExerciseId::generate();
        let rendered = id.to_string();
        assert_eq!(rendered.len(), 24);
        let parsed: ExerciseId = rendered.parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn id_rejects_malformed_strings() {
        let too_long = "a".repeat(26);
        for bad in ["", "zz", "123", "not-hex-at-all-not-hex-at", too_long.as_str()] {
            assert!(bad.parse::<ExerciseId>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn generated_ids_are_distinct() {
        let a = ExerciseId::generate();
        let b = ExerciseId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn exercise_serializes_id_as_hex_string() {
        let id: ExerciseId = "0102030405060708090a0b0c".parse().unwrap();
        let exercise = Exercise {
            id,
            name: Some("demo".into()),
            description: None,
            array: vec![3, 1, 2],
            instructions: None,
        };
        let json = serde_json::to_value(&exercise).unwrap();
        assert_eq!(json["id"], "0102030405060708090a0b0c");
        // Absent optional fields are omitted, like the original documents.
        assert!(json.get("description").is_none());
    }

    #[test]
    fn patch_merges_only_present_fields() {
        let mut exercise = Exercise {
            id: ExerciseId::generate(),
            name: Some("original".into()),
            description: Some("desc".into()),
            array: vec![5, 4],
            instructions: None,
        };
        exercise.apply_patch(ExercisePatch {
            array: Some(vec![1, 2, 3]),
            ..Default::default()
        });
        assert_eq!(exercise.array, vec![1, 2, 3]);
        assert_eq!(exercise.name.as_deref(), Some("original"));
        assert_eq!(exercise.description.as_deref(), Some("desc"));
    }

    #[test]
    fn empty_patch_is_a_no_op() {
        let patch: ExercisePatch = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn patch_rejects_unknown_fields() {
        let err = serde_json::from_str::<ExercisePatch>(r#"{"color": "red"}"#);
        assert!(err.is_err());
    }
}
