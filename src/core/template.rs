use crate::core::Contact;

pub const FIRSTNAME_TOKEN: &str = "[firstname]";

/// Tokens the UI offers for insertion. Only `[firstname]` is substituted;
/// the others are markers left in the text as typed.
pub const INSERTABLE_TOKENS: [&str; 3] = [FIRSTNAME_TOKEN, "[negrito]", "[sublinhado]"];

pub fn render(template: &str, contact: &Contact) -> String {
    template.replace(FIRSTNAME_TOKEN, &contact.name)
}

pub fn insert_token(template: &str, token: &str) -> String {
    let mut out = String::with_capacity(template.len() + token.len());
    out.push_str(template);
    out.push_str(token);
    out
}
