//! Choice type resolution
//!
//! A field observed with more than one scalar type across the record set
//! is a choice field. The resolver applies the configured policy: wrap
//! the values in type-keyed structs, project to a single type, or fail.

use crate::config::ChoicePolicy;
use crate::error::{Error, Result};
use crate::types::FieldType;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Fields that remain choice-typed after resolution
///
/// Only the make_struct policy leaves choice structure behind; the sink
/// uses this report to build struct-typed columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChoiceReport {
    /// Choice field name to the set of observed types, in type-name order
    pub fields: BTreeMap<String, BTreeSet<FieldType>>,
}

impl ChoiceReport {
    /// Whether any choice fields remain
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Observed types of one field, if it is a choice field
    pub fn observed(&self, field: &str) -> Option<&BTreeSet<FieldType>> {
        self.fields.get(field)
    }

    /// `field(a, b)` descriptions for logging
    pub fn describe(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|(field, types)| format!("{field}({})", type_list(types)))
            .collect()
    }
}

fn type_list(types: &BTreeSet<FieldType>) -> String {
    types
        .iter()
        .map(|t| t.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Applies a choice policy to records
pub struct ChoiceResolver {
    policy: ChoicePolicy,
}

impl ChoiceResolver {
    /// Create a resolver with the given policy
    pub fn new(policy: ChoicePolicy) -> Self {
        Self { policy }
    }

    /// Resolve choice fields across the record set
    ///
    /// Observation ignores nulls: a field must carry two different
    /// non-null types to be ambiguous. Unambiguous fields pass through
    /// untouched under every policy.
    pub fn apply(&self, records: Vec<Value>) -> Result<(Vec<Value>, ChoiceReport)> {
        let ambiguous = observe_ambiguous(&records);

        if ambiguous.is_empty() {
            return Ok((records, ChoiceReport::default()));
        }

        tracing::info!(
            "Choice types observed: {}",
            ChoiceReport {
                fields: ambiguous.clone()
            }
            .describe()
            .join("; ")
        );

        match self.policy {
            ChoicePolicy::Strict => match ambiguous.iter().next() {
                Some((field, types)) => Err(Error::UnresolvedChoice {
                    field: field.clone(),
                    observed: type_list(types),
                }),
                None => Ok((records, ChoiceReport::default())),
            },

            ChoicePolicy::Cast { to } => {
                let records = project_fields(records, &ambiguous, to);
                Ok((records, ChoiceReport::default()))
            }

            ChoicePolicy::MakeStruct => {
                let records = wrap_fields(records, &ambiguous);
                Ok((
                    records,
                    ChoiceReport {
                        fields: ambiguous,
                    },
                ))
            }
        }
    }
}

/// Collect fields observed with more than one non-null type
fn observe_ambiguous(records: &[Value]) -> BTreeMap<String, BTreeSet<FieldType>> {
    let mut observed: BTreeMap<String, BTreeSet<FieldType>> = BTreeMap::new();

    for record in records {
        if let Value::Object(obj) = record {
            for (field, value) in obj {
                if let Some(field_type) = FieldType::observed(value) {
                    observed.entry(field.clone()).or_default().insert(field_type);
                }
            }
        }
    }

    observed.retain(|_, types| types.len() > 1);
    observed
}

/// make_struct: wrap each non-null choice value as `{ "<type>": value }`
fn wrap_fields(
    mut records: Vec<Value>,
    ambiguous: &BTreeMap<String, BTreeSet<FieldType>>,
) -> Vec<Value> {
    for record in &mut records {
        let Value::Object(obj) = record else { continue };

        for field in ambiguous.keys() {
            let Some(value) = obj.get_mut(field) else { continue };
            if value.is_null() {
                continue;
            }

            let taken = value.take();
            let key = FieldType::observed(&taken).map_or("string", FieldType::name);
            let mut wrapper = Map::new();
            wrapper.insert(key.to_string(), taken);
            *value = Value::Object(wrapper);
        }
    }

    records
}

/// cast: keep values already of the target type, null out the rest
fn project_fields(
    mut records: Vec<Value>,
    ambiguous: &BTreeMap<String, BTreeSet<FieldType>>,
    to: FieldType,
) -> Vec<Value> {
    for record in &mut records {
        let Value::Object(obj) = record else { continue };

        for field in ambiguous.keys() {
            let Some(value) = obj.get_mut(field) else { continue };
            if !value.is_null() && FieldType::observed(value) != Some(to) {
                *value = Value::Null;
            }
        }
    }

    records
}
