//! Message interpolation helpers.
//!
//! Templates use `$` for the field's display name and `%` for the
//! comparison operand. Only the first occurrence of each is substituted.

/// Fill a message template.
///
/// Placeholders are located in the template itself, so a `%` inside the
/// substituted field name is never treated as a placeholder.
pub fn interpolate(template: &str, subject: &str, operand: &str) -> String {
    let mut out = String::with_capacity(template.len() + subject.len() + operand.len());
    let mut subject_done = false;
    let mut operand_done = false;

    for ch in template.chars() {
        match ch {
            '$' if !subject_done => {
                out.push_str(subject);
                subject_done = true;
            }
            '%' if !operand_done => {
                out.push_str(operand);
                operand_done = true;
            }
            _ => out.push(ch),
        }
    }

    out
}

/// Replace only the first `$`; a `%` in the template is kept literally.
pub fn interpolate_subject(template: &str, subject: &str) -> String {
    template.replacen('$', subject, 1)
}

/// Uppercase the first character.
pub fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Name shown in messages for a field.
///
/// Array-style names reduce to their last path segment:
/// `user[address][city]` displays as `city`, `tags[]` as `tags`.
pub fn display_name(field: &str) -> &str {
    let trimmed = field.strip_suffix(']').unwrap_or(field);
    trimmed
        .split(['[', ']'])
        .filter(|segment| !segment.is_empty())
        .last()
        .unwrap_or(field)
}
