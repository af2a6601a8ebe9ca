use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::{de, Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::error::AppError;

// ============================================================================
// Variant
// ============================================================================

/// Widget kind a field renders as. Serialized as its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum FieldVariant {
    Checkbox,
    Combobox,
    #[serde(rename = "Date Picker")]
    DatePicker,
    #[serde(rename = "Datetime Picker")]
    DatetimePicker,
    #[serde(rename = "File Input")]
    FileInput,
    Input,
    #[serde(rename = "Input OTP")]
    InputOtp,
    #[serde(rename = "Location Input")]
    LocationInput,
    #[serde(rename = "Multi Select")]
    MultiSelect,
    Select,
    Slider,
    #[serde(rename = "Signature Input")]
    SignatureInput,
    #[serde(rename = "Smart Datetime Input")]
    SmartDatetimeInput,
    Switch,
    #[serde(rename = "Tags Input")]
    TagsInput,
    Textarea,
    Password,
    Phone,
}

impl FieldVariant {
    /// Every variant, in the order the generation prompt lists them.
    pub const ALL: [FieldVariant; 18] = [
        FieldVariant::Checkbox,
        FieldVariant::Combobox,
        FieldVariant::DatePicker,
        FieldVariant::DatetimePicker,
        FieldVariant::FileInput,
        FieldVariant::Input,
        FieldVariant::InputOtp,
        FieldVariant::LocationInput,
        FieldVariant::MultiSelect,
        FieldVariant::Select,
        FieldVariant::Slider,
        FieldVariant::SignatureInput,
        FieldVariant::SmartDatetimeInput,
        FieldVariant::Switch,
        FieldVariant::TagsInput,
        FieldVariant::Textarea,
        FieldVariant::Password,
        FieldVariant::Phone,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldVariant::Checkbox => "Checkbox",
            FieldVariant::Combobox => "Combobox",
            FieldVariant::DatePicker => "Date Picker",
            FieldVariant::DatetimePicker => "Datetime Picker",
            FieldVariant::FileInput => "File Input",
            FieldVariant::Input => "Input",
            FieldVariant::InputOtp => "Input OTP",
            FieldVariant::LocationInput => "Location Input",
            FieldVariant::MultiSelect => "Multi Select",
            FieldVariant::Select => "Select",
            FieldVariant::Slider => "Slider",
            FieldVariant::SignatureInput => "Signature Input",
            FieldVariant::SmartDatetimeInput => "Smart Datetime Input",
            FieldVariant::Switch => "Switch",
            FieldVariant::TagsInput => "Tags Input",
            FieldVariant::Textarea => "Textarea",
            FieldVariant::Password => "Password",
            FieldVariant::Phone => "Phone",
        }
    }
}

impl fmt::Display for FieldVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldVariant {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldVariant::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| AppError::NotFound(format!("field variant '{s}'")))
    }
}

// ============================================================================
// Value
// ============================================================================

/// Default value carried by a field.
///
/// Untagged on the wire; strings in RFC 3339 form are read as dates. Values
/// serialize back exactly as they were read: integers stay integers and a
/// date keeps its original text and offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(serde_json::Number),
    Date(#[serde(deserialize_with = "rfc3339_text")] String),
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// The instant a `Date` value denotes, with its offset.
    pub fn as_datetime(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            FieldValue::Date(text) => DateTime::parse_from_rfc3339(text).ok(),
            _ => None,
        }
    }
}

fn rfc3339_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&text).map_err(de::Error::custom)?;
    Ok(text)
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n.into())
    }
}

impl From<DateTime<FixedOffset>> for FieldValue {
    fn from(at: DateTime<FixedOffset>) -> Self {
        FieldValue::Date(at.to_rfc3339())
    }
}

/// Models sometimes emit `null` for attributes they consider unset.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Descriptor
// ============================================================================

/// Metadata and default value of one form input.
///
/// Pure data: change/select/set-value handlers are bound separately,
/// see [`crate::binding::BoundField`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Unique across the whole form; the only lookup key.
    pub name: String,
    /// Semantic data type, e.g. "string", "number", "text".
    #[serde(rename = "type")]
    pub field_type: String,
    pub variant: FieldVariant,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub required: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub disabled: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub checked: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: FieldValue,
    /// Position hint for ordering/grouping in the rendered layout.
    #[serde(default, deserialize_with = "null_as_default")]
    pub row_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour12: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

impl FieldDescriptor {
    /// Bare descriptor with every optional attribute unset.
    pub fn new(
        name: impl Into<String>,
        field_type: impl Into<String>,
        variant: FieldVariant,
        label: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            variant,
            label: label.into(),
            placeholder: None,
            description: None,
            required: false,
            disabled: false,
            checked: false,
            value: FieldValue::default(),
            row_index: 0,
            min: None,
            max: None,
            step: None,
            locale: None,
            hour12: None,
            class_name: None,
        }
    }

    /// Shallow merge: every attribute present in `patch` replaces the current one.
    pub fn merged(&self, patch: &FieldPatch) -> FieldDescriptor {
        let mut next = self.clone();
        if let Some(ref v) = patch.name {
            next.name = v.clone();
        }
        if let Some(ref v) = patch.field_type {
            next.field_type = v.clone();
        }
        if let Some(v) = patch.variant {
            next.variant = v;
        }
        if let Some(ref v) = patch.label {
            next.label = v.clone();
        }
        if let Some(ref v) = patch.placeholder {
            next.placeholder = Some(v.clone());
        }
        if let Some(ref v) = patch.description {
            next.description = Some(v.clone());
        }
        if let Some(v) = patch.required {
            next.required = v;
        }
        if let Some(v) = patch.disabled {
            next.disabled = v;
        }
        if let Some(v) = patch.checked {
            next.checked = v;
        }
        if let Some(ref v) = patch.value {
            next.value = v.clone();
        }
        if let Some(v) = patch.row_index {
            next.row_index = v;
        }
        if patch.min.is_some() {
            next.min = patch.min;
        }
        if patch.max.is_some() {
            next.max = patch.max;
        }
        if patch.step.is_some() {
            next.step = patch.step;
        }
        if let Some(ref v) = patch.locale {
            next.locale = Some(v.clone());
        }
        if patch.hour12.is_some() {
            next.hour12 = patch.hour12;
        }
        if let Some(ref v) = patch.class_name {
            next.class_name = Some(v.clone());
        }
        next
    }
}

// ============================================================================
// Patch
// ============================================================================

/// Partial update of a [`FieldDescriptor`]. Absent attributes are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FieldPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<FieldVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour12: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

impl FieldPatch {
    pub fn is_empty(&self) -> bool {
        *self == FieldPatch::default()
    }
}

/// A whole descriptor used as a patch. Unset optional attributes stay absent,
/// so they do not clear the target's values.
impl From<FieldDescriptor> for FieldPatch {
    fn from(d: FieldDescriptor) -> Self {
        Self {
            name: Some(d.name),
            field_type: Some(d.field_type),
            variant: Some(d.variant),
            label: Some(d.label),
            placeholder: d.placeholder,
            description: d.description,
            required: Some(d.required),
            disabled: Some(d.disabled),
            checked: Some(d.checked),
            value: Some(d.value),
            row_index: Some(d.row_index),
            min: d.min,
            max: d.max,
            step: d.step,
            locale: d.locale,
            hour12: d.hour12,
            class_name: d.class_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_variant_display_names() {
        assert_eq!(
            serde_json::to_value(FieldVariant::SmartDatetimeInput).unwrap(),
            json!("Smart Datetime Input")
        );
        assert_eq!("Input OTP".parse::<FieldVariant>().unwrap(), FieldVariant::InputOtp);
        assert!("Rich Text".parse::<FieldVariant>().is_err());
        for v in FieldVariant::ALL {
            assert_eq!(v.as_str().parse::<FieldVariant>().unwrap(), v);
        }
    }

    #[test]
    fn test_descriptor_minimal_json_uses_defaults() {
        let d: FieldDescriptor = serde_json::from_value(json!({
            "name": "email",
            "type": "string",
            "variant": "Input",
            "label": "Email"
        }))
        .unwrap();
        assert_eq!(d, FieldDescriptor::new("email", "string", FieldVariant::Input, "Email"));
    }

    #[test]
    fn test_descriptor_null_attributes() {
        let d: FieldDescriptor = serde_json::from_value(json!({
            "name": "agree",
            "type": "boolean",
            "variant": "Checkbox",
            "label": "Agree",
            "required": null,
            "value": null,
            "placeholder": null
        }))
        .unwrap();
        assert!(!d.required);
        assert_eq!(d.value, FieldValue::default());
        assert!(d.placeholder.is_none());
    }

    #[test]
    fn test_descriptor_camel_case_wire_format() {
        let mut d = FieldDescriptor::new("age", "number", FieldVariant::Slider, "Age");
        d.row_index = 3;
        d.class_name = Some("col-span-2".into());
        d.min = Some(0.0);
        let v = serde_json::to_value(&d).unwrap();
        assert_eq!(v["rowIndex"], 3);
        assert_eq!(v["className"], "col-span-2");
        assert_eq!(v["type"], "number");
        assert_eq!(v["variant"], "Slider");
        assert!(v.get("max").is_none());
    }

    #[test]
    fn test_unknown_variant_rejected() {
        let r: Result<FieldDescriptor, _> = serde_json::from_value(json!({
            "name": "x", "type": "string", "variant": "Rich Text", "label": "X"
        }));
        assert!(r.is_err());
    }

    #[test]
    fn test_value_shapes() {
        let parse = |v: serde_json::Value| serde_json::from_value::<FieldValue>(v).unwrap();
        assert_eq!(parse(json!(true)), FieldValue::Bool(true));
        assert_eq!(parse(json!(4)), FieldValue::Number(serde_json::Number::from(4u64)));
        assert_eq!(parse(json!("hi")), FieldValue::Text("hi".into()));
        assert_eq!(
            parse(json!(["a", "b"])),
            FieldValue::List(vec!["a".into(), "b".into()])
        );
        assert!(matches!(parse(json!("2024-05-01T10:00:00Z")), FieldValue::Date(_)));
        assert_eq!(parse(json!("2024-05-01")), FieldValue::Text("2024-05-01".into()));
    }

    #[test]
    fn test_values_serialize_as_read() {
        let wire = json!([
            "2024-05-01T10:00:00+02:00",
            "2024-05-01T10:00:00.500Z",
            4,
            -3,
            2.5,
            true,
            "plain",
            ["a"]
        ]);
        let values: Vec<FieldValue> = serde_json::from_value(wire.clone()).unwrap();
        assert_eq!(serde_json::to_value(&values).unwrap(), wire);

        let at = values[0].as_datetime().unwrap();
        assert_eq!(at.offset().local_minus_utc(), 2 * 3600);
        assert!(values[6].as_datetime().is_none());
    }

    #[test]
    fn test_merge_replaces_only_present_attributes() {
        let mut old = FieldDescriptor::new("city", "string", FieldVariant::Input, "City");
        old.placeholder = Some("Your city".into());
        old.min = Some(1.0);

        let patch = FieldPatch {
            label: Some("Town".into()),
            required: Some(true),
            ..Default::default()
        };
        let next = old.merged(&patch);

        assert_eq!(next.label, "Town");
        assert!(next.required);
        assert_eq!(next.placeholder.as_deref(), Some("Your city"));
        assert_eq!(next.min, Some(1.0));
        assert_eq!(next.name, "city");
        // Source untouched
        assert_eq!(old.label, "City");
    }

    #[test]
    fn test_descriptor_as_patch_keeps_unset_options() {
        let mut old = FieldDescriptor::new("qty", "number", FieldVariant::Slider, "Qty");
        old.max = Some(10.0);
        let edited = FieldDescriptor::new("qty", "number", FieldVariant::Slider, "Quantity");

        let next = old.merged(&FieldPatch::from(edited));
        assert_eq!(next.label, "Quantity");
        assert_eq!(next.max, Some(10.0));
    }

    #[test]
    fn test_empty_patch() {
        assert!(FieldPatch::default().is_empty());
        let d = FieldDescriptor::new("a", "string", FieldVariant::Input, "A");
        assert_eq!(d.merged(&FieldPatch::default()), d);
    }
}
