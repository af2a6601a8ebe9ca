use std::collections::HashMap;

use crate::models::FieldVariant;

/// Default copy for a freshly added field of one variant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VariantDefaults {
    pub label: String,
    pub description: String,
    pub placeholder: String,
}

// (variant, label, description, placeholder)
const BUILTIN: &[(FieldVariant, &str, &str, &str)] = &[
    (
        FieldVariant::Checkbox,
        "Accept terms and conditions",
        "You agree to our Terms of Service and Privacy Policy.",
        "",
    ),
    (
        FieldVariant::Combobox,
        "Language",
        "This is the language that will be used in the dashboard.",
        "Select language",
    ),
    (
        FieldVariant::DatePicker,
        "Date of birth",
        "Your date of birth is used to calculate your age.",
        "Pick a date",
    ),
    (
        FieldVariant::DatetimePicker,
        "Submission Date",
        "Add the date of submission with detailed time",
        "Pick a date and time",
    ),
    (
        FieldVariant::FileInput,
        "Select File",
        "Select a file to upload.",
        "",
    ),
    (
        FieldVariant::Input,
        "Username",
        "This is your public display name.",
        "Enter your username",
    ),
    (
        FieldVariant::InputOtp,
        "One-Time Password",
        "Please enter the one-time password sent to your phone.",
        "",
    ),
    (
        FieldVariant::LocationInput,
        "Select Country",
        "If your country has states, they appear after selecting a country.",
        "",
    ),
    (
        FieldVariant::MultiSelect,
        "Select your framework",
        "Select multiple options.",
        "Select options",
    ),
    (
        FieldVariant::Select,
        "Email",
        "You can manage email addresses in your email settings.",
        "Select a verified email to display",
    ),
    (
        FieldVariant::Slider,
        "Set Price Range",
        "Adjust the price by sliding.",
        "",
    ),
    (
        FieldVariant::SignatureInput,
        "Sign here",
        "Please provide your signature above",
        "",
    ),
    (
        FieldVariant::SmartDatetimeInput,
        "What's the best time for you?",
        "Please select the full time",
        "e.g. Tomorrow morning 9am",
    ),
    (
        FieldVariant::Switch,
        "Marketing emails",
        "Receive emails about new products, features, and more.",
        "",
    ),
    (
        FieldVariant::TagsInput,
        "Enter your tech stack.",
        "Add tags.",
        "Enter your tags",
    ),
    (
        FieldVariant::Textarea,
        "Bio",
        "You can @mention other users and organizations.",
        "Tell us a little bit about yourself",
    ),
    (
        FieldVariant::Password,
        "Password",
        "Enter your password.",
        "Password",
    ),
    (
        FieldVariant::Phone,
        "Phone number",
        "Enter your phone number.",
        "",
    ),
];

/// Variant → default copy lookup, consulted when a field is added by hand.
#[derive(Debug, Clone, Default)]
pub struct VariantDefaultsTable {
    entries: HashMap<FieldVariant, VariantDefaults>,
}

impl VariantDefaultsTable {
    /// Table with an entry for every variant.
    pub fn builtin() -> Self {
        BUILTIN
            .iter()
            .map(|&(variant, label, description, placeholder)| {
                (
                    variant,
                    VariantDefaults {
                        label: label.into(),
                        description: description.into(),
                        placeholder: placeholder.into(),
                    },
                )
            })
            .collect()
    }

    /// Table with no entries; every variant uses the fallbacks.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, variant: FieldVariant) -> Option<&VariantDefaults> {
        self.entries.get(&variant)
    }

    pub fn insert(&mut self, variant: FieldVariant, defaults: VariantDefaults) {
        self.entries.insert(variant, defaults);
    }
}

impl FromIterator<(FieldVariant, VariantDefaults)> for VariantDefaultsTable {
    fn from_iter<I: IntoIterator<Item = (FieldVariant, VariantDefaults)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
