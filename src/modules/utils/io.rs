use std::io::{self, Write};

use lettre::Address;

/// Helper function to read a line from stdin
pub fn read_line() -> io::Result<String> {
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Helper function to prompt for input with confirmation
pub fn prompt_with_confirmation(prompt: &str, confirmation: &str) -> io::Result<bool> {
    println!("{}", prompt);
    print!("{} (y/n): ", confirmation);
    io::stdout().flush()?;

    let response = read_line()?.to_lowercase();
    Ok(response.is_empty() || response == "y")
}

/// Helper function to validate email format
pub fn is_valid_email(email: &str) -> bool {
    // Basic shape checks first, then let lettre decide
    email.contains('@')
        && email.contains('.')
        && !email.contains(' ')
        && email.chars().filter(|&c| c == '@').count() == 1
        && email.len() >= 5
        && email
            .rsplit('@')
            .next()
            .map_or(false, |domain| domain.contains('.') && !domain.ends_with('.'))
        && email.parse::<Address>().is_ok()
}

/// Trim an address and keep it only if it is valid, otherwise return ""
pub fn sanitize_email(input: &str) -> String {
    let email = input.trim();
    if is_valid_email(email) {
        email.to_string()
    } else {
        String::new()
    }
}

/// Strip markup and control characters from single-line text input and
/// collapse runs of whitespace
pub fn sanitize_text_field(input: &str) -> String {
    let mut without_tags = String::with_capacity(input.len());
    let mut in_tag = false;
    for c in input.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            c if c.is_control() => without_tags.push(' '),
            c => without_tags.push(c),
        }
    }

    without_tags.split_whitespace().collect::<Vec<_>>().join(" ")
}
