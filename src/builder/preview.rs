use std::collections::BTreeMap;

use serde::Serialize;
use ts_rs::TS;

use crate::models::{FieldDescriptor, FieldOrGroup, FieldValue};

/// Render model of the form as it would appear to an end user.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FormPreview {
    pub rows: Vec<PreviewRow>,
    /// Initial form values keyed by field name.
    pub default_values: BTreeMap<String, FieldValue>,
    /// Names of fields that must be filled before submitting.
    pub required: Vec<String>,
}

/// One rendered row; groups render as a multi-column row.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRow {
    pub columns: usize,
    pub fields: Vec<FieldDescriptor>,
}

impl FormPreview {
    pub fn build(tree: &[FieldOrGroup]) -> Self {
        let mut rows = Vec::with_capacity(tree.len());
        let mut default_values = BTreeMap::new();
        let mut required = Vec::new();

        for item in tree {
            let fields = item.fields();
            if fields.is_empty() {
                continue;
            }
            for field in fields {
                default_values.insert(field.name.clone(), field.value.clone());
                if field.required {
                    required.push(field.name.clone());
                }
            }
            rows.push(PreviewRow {
                columns: fields.len(),
                fields: fields.to_vec(),
            });
        }

        Self {
            rows,
            default_values,
            required,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
