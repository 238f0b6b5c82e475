use super::delivery::{MailHeader, OutgoingMail};
use crate::modules::utils::io::{is_valid_email, sanitize_email, sanitize_text_field};

/// An ad-hoc message as entered by the administrator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeRequest {
    pub to: String,
    pub subject: String,
    pub body: String,
    /// Comma-separated addresses
    pub cc: String,
    /// Comma-separated addresses
    pub bcc: String,
}

/// Validate the request and turn it into an HTML message
pub fn compose(request: &ComposeRequest) -> Result<OutgoingMail, String> {
    let to = sanitize_email(&request.to);
    let subject = sanitize_text_field(&request.subject);
    let body = request.body.as_str();

    if to.is_empty() || subject.is_empty() || body.is_empty() {
        return Err("Please fill all fields before sending.".to_string());
    }

    let mut headers = Vec::new();
    let cc = parse_address_list(&request.cc);
    if !cc.is_empty() {
        headers.push(MailHeader::Cc(cc));
    }
    let bcc = parse_address_list(&request.bcc);
    if !bcc.is_empty() {
        headers.push(MailHeader::Bcc(bcc));
    }

    Ok(OutgoingMail {
        to,
        subject,
        html_body: nl2br(body),
        headers,
    })
}

/// Split a comma-separated list, keeping only valid addresses
pub fn parse_address_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|address| is_valid_email(address))
        .map(str::to_string)
        .collect()
}

/// Insert `<br />` before every line break (`\n`, `\r\n`, `\r` or `\n\r`)
pub fn nl2br(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' | '\n' => {
                out.push_str("<br />");
                out.push(c);
                let pair = if c == '\r' { '\n' } else { '\r' };
                if chars.peek() == Some(&pair) {
                    out.push(pair);
                    chars.next();
                }
            }
            other => out.push(other),
        }
    }
    out
}
