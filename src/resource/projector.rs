//! Field projection: turns records into the flat field-name to value
//! mappings that get encoded onto the wire.
//!
//! Rule order: a full `values_override` short-circuits everything; otherwise
//! plain `serialize_fields` are read first and `custom_values` overlaid
//! second, so computed fields shadow plain ones and never the reverse. When
//! there are no computed fields, a record's native projection is used as a
//! fast path if the store offers one.

use serde_json::{Map, Value};

use crate::collection::{Collection, Record};

use super::spec::ResourceSpec;

/// Project a set of records under the given specification.
pub(crate) fn project_records<C: Collection>(
    spec: &ResourceSpec<C>,
    records: &[C::Record],
) -> Vec<Map<String, Value>> {
    records.iter().map(|r| project_record(spec, r)).collect()
}

/// Project a single record under the given specification.
pub(crate) fn project_record<C: Collection>(
    spec: &ResourceSpec<C>,
    record: &C::Record,
) -> Map<String, Value> {
    if let Some(override_fn) = &spec.values_override {
        return override_fn(record);
    }

    if spec.custom_values.is_empty() {
        if let Some(native) = record.project_native(&spec.serialize_fields) {
            return native;
        }
    }

    let mut out = Map::new();
    for field in &spec.serialize_fields {
        out.insert(field.clone(), spec.codec.encode(record.get_field(field)));
    }
    for (name, compute) in &spec.custom_values {
        out.insert(name.clone(), spec.codec.encode(compute(record)));
    }
    out
}
