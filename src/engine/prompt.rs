use crate::models::FieldVariant;

const EXAMPLE_FIELD: &str = r#"{
  "name": "username",
  "type": "text",
  "variant": "Input",
  "label": "Username",
  "placeholder": "Enter your username",
  "description": "This is your unique username",
  "required": true,
  "disabled": false,
  "checked": false,
  "value": ""
}"#;

/// Comma-separated list of every permitted variant name.
pub fn variant_list() -> String {
    FieldVariant::ALL
        .iter()
        .map(|v| v.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the prompt that asks the model for a bare JSON array of field descriptors.
///
/// The definition is embedded verbatim as pretty-printed JSON, so a raw
/// interface string arrives as a quoted JSON string.
pub fn build_generation_prompt(definition: &serde_json::Value) -> String {
    let pretty = serde_json::to_string_pretty(definition).unwrap_or_else(|_| definition.to_string());

    let mut prompt = String::new();

    prompt.push_str("Generate form fields for the following TypeScript interface. ");
    prompt.push_str("For each field, include the following properties:\n");
    prompt.push_str("- name: Field name\n");
    prompt.push_str("- type: Data type or input type (e.g., string, number)\n");
    prompt.push_str("- label: A user-friendly label\n");
    prompt.push_str("- placeholder: A placeholder for the field\n");
    prompt.push_str("- description: ''\n");
    prompt.push_str(&format!(
        "- variant: One of {}. Pick the most appropriate one.\n",
        variant_list()
    ));
    prompt.push_str("- required: Whether the field is mandatory (based on whether the field is optional in the interface)\n");
    prompt.push_str("- disabled: Set to false by default\n");
    prompt.push_str("- checked: Set to false for checkable inputs\n");
    prompt.push_str("- value: A default value\n\n");

    prompt.push_str("Input interface:\n");
    prompt.push_str(&pretty);
    prompt.push_str("\n\n");

    prompt.push_str("For each field, return an object like this example:\n");
    prompt.push_str(EXAMPLE_FIELD);
    prompt.push_str("\n\n");

    prompt.push_str("Do not include any extra text or even backticks, only return an array of JSON objects, one for each field.\n");

    prompt
}
