use std::fmt::Display;

/// Render a phone number for display.
///
/// Non-digits are stripped first. Ten digits become `(555) 123-4567`, eleven
/// digits with a leading `1` become `+1 (555) 123-4567`, seven digits become
/// `123-4567`. Any other length is returned as the bare digits.
pub fn format_phone_number(phone_number: impl Display) -> String {
    let digits: String = phone_number
        .to_string()
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();

    match digits.len() {
        10 => format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..]),
        11 if digits.starts_with('1') => format!(
            "+1 ({}) {}-{}",
            &digits[1..4],
            &digits[4..7],
            &digits[7..]
        ),
        7 => format!("{}-{}", &digits[..3], &digits[3..]),
        _ => digits,
    }
}
