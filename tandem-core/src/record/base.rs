//! Base implementation of records for logging.
use crate::error::TandemError;
use chrono::prelude::{DateTime, Local};
use std::{
    collections::{
        hash_map::{Iter, Keys},
        HashMap,
    },
    convert::Into,
};

/// Represents possible types of values in a [`Record`].
#[derive(Debug, Clone)]
pub enum RecordValue {
    /// Scalar, e.g., the loss of an optimization step.
    Scalar(f32),

    /// A timestamp.
    DateTime(DateTime<Local>),

    /// A text value.
    String(String),
}

/// A container of the values obtained during training.
#[derive(Debug)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Returns an iterator over the keys in the record.
    pub fn keys(&self) -> Keys<String, RecordValue> {
        self.0.keys()
    }

    /// Inserts a key-value pair into the record.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns an iterator over the key-value pairs in the record.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Gets the value of the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Returns `true` if the record has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merges records, the entries of `r` taking precedence.
    pub fn merge(mut self, r: Record) -> Self {
        self.0.extend(r.0);
        self
    }

    /// Gets a scalar value.
    ///
    /// Fails if the key is missing or holds a value of another type.
    pub fn get_scalar(&self, k: &str) -> Result<f32, TandemError> {
        if let Some(v) = self.0.get(k) {
            match v {
                RecordValue::Scalar(v) => Ok(*v),
                _ => Err(TandemError::RecordValueTypeError("Scalar".into())),
            }
        } else {
            Err(TandemError::RecordKeyError(k.into()))
        }
    }
}
