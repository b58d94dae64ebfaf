//! Encoding: raw application → resolved categories → vector aligned to a schema.

use super::{AppType, BinaryField, Column, FeatureSchema, FeatureVector, RawApplication};
use crate::error::EncodeError;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

const YES: &str = "Sim";
const NO: &str = "Não";

/// Result of looking a raw categorical value up in its known set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoded<T> {
    Known(T),
    Unknown(String),
}

/// What to do with a value outside the known set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownPolicy {
    /// Treat as "Não" / no application type (all one-hot columns zero).
    #[default]
    Degrade,
    Reject,
}

pub fn encode_flag(raw: &str) -> Encoded<bool> {
    match raw {
        YES => Encoded::Known(true),
        NO => Encoded::Known(false),
        other => Encoded::Unknown(other.to_string()),
    }
}

pub fn encode_app_type(raw: &str) -> Encoded<AppType> {
    match AppType::parse(raw) {
        Some(t) => Encoded::Known(t),
        None => Encoded::Unknown(raw.to_string()),
    }
}

/// Categories after the unknown policy has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Resolved {
    flags: [bool; 6],
    app_type: Option<AppType>,
}

impl Resolved {
    fn value(&self, column: Column) -> f32 {
        let hot = match column {
            Column::Flag(f) => self.flags[f.index()],
            Column::AppType(t) => self.app_type == Some(t),
        };
        if hot {
            1.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureEncoder {
    policy: UnknownPolicy,
}

impl FeatureEncoder {
    pub fn new(policy: UnknownPolicy) -> Self {
        Self { policy }
    }

    /// Encode a single application against the schema frozen at training time.
    ///
    /// Training-time columns the input does not hit are 0; an application type the
    /// schema has no column for contributes nothing.
    pub fn encode_one(
        &self,
        row: &RawApplication,
        schema: &FeatureSchema,
    ) -> Result<FeatureVector, EncodeError> {
        let resolved = self.resolve(row)?;
        let values = schema.columns().iter().map(|&c| resolved.value(c)).collect();
        Ok(FeatureVector { values })
    }

    /// Encode a training batch. The schema holds the six flags plus one column per
    /// application type present in `rows`.
    ///
    /// On error returns the zero-based index of the offending row.
    pub fn encode_batch(
        &self,
        rows: &[RawApplication],
    ) -> Result<(Array2<f32>, FeatureSchema), (usize, EncodeError)> {
        let resolved = rows
            .iter()
            .enumerate()
            .map(|(i, r)| self.resolve(r).map_err(|e| (i, e)))
            .collect::<Result<Vec<_>, _>>()?;

        let observed: Vec<AppType> = AppType::ALL
            .into_iter()
            .filter(|t| resolved.iter().any(|r| r.app_type == Some(*t)))
            .collect();
        let schema = FeatureSchema::with_app_types(&observed);

        let mut matrix = Array2::<f32>::zeros((resolved.len(), schema.len()));
        for (mut out, r) in matrix.rows_mut().into_iter().zip(&resolved) {
            for (cell, &column) in out.iter_mut().zip(schema.columns()) {
                *cell = r.value(column);
            }
        }
        Ok((matrix, schema))
    }

    fn resolve(&self, row: &RawApplication) -> Result<Resolved, EncodeError> {
        let mut flags = [false; 6];
        for field in BinaryField::ALL {
            flags[field.index()] = match encode_flag(row.flag(field)) {
                Encoded::Known(v) => v,
                Encoded::Unknown(value) => {
                    self.on_unknown(field.key(), value)?;
                    false
                }
            };
        }
        let app_type = match encode_app_type(&row.tipo_aplicacao) {
            Encoded::Known(t) => Some(t),
            Encoded::Unknown(value) => {
                self.on_unknown("tipo_aplicacao", value)?;
                None
            }
        };
        Ok(Resolved { flags, app_type })
    }

    fn on_unknown(&self, field: &'static str, value: String) -> Result<(), EncodeError> {
        match self.policy {
            UnknownPolicy::Degrade => {
                tracing::debug!(field, value = %value, "unknown value encoded as zero");
                Ok(())
            }
            UnknownPolicy::Reject => Err(EncodeError::UnknownValue { field, value }),
        }
    }
}
