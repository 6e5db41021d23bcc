use validator::ValidationErrors;

/// Flattens validator errors into one human-readable message, falling back
/// to the field name when a rule carries no message.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("Invalid value for {field}"),
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}
