use crate::{
    error::DispatchError,
    models::template::{MAX_CONTENT_CHARS, MAX_SUBJECT_CHARS, MessageTemplate},
};

pub fn validate_template(template: &MessageTemplate) -> Result<(), DispatchError> {
    if template.content.trim().is_empty() {
        return Err(DispatchError::Validation(
            "Message content is required".to_string(),
        ));
    }

    if template.content.chars().count() > MAX_CONTENT_CHARS {
        return Err(DispatchError::Validation(format!(
            "Message content exceeds {} characters",
            MAX_CONTENT_CHARS
        )));
    }

    if let Some(subject) = &template.subject {
        if subject.chars().count() > MAX_SUBJECT_CHARS {
            return Err(DispatchError::Validation(format!(
                "Subject exceeds {} characters",
                MAX_SUBJECT_CHARS
            )));
        }
    }

    Ok(())
}
