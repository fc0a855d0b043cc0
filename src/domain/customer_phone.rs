const ALLOWED_SEPARATORS: [char; 6] = ['+', '(', ')', '-', '.', ' '];
const MAX_CHAR_LENGTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct CustomerPhone(String);

impl CustomerPhone {
    pub fn parse(phone: String) -> Result<CustomerPhone, String> {
        let phone = phone.trim().to_string();
        let has_digit = phone.chars().any(|char| char.is_ascii_digit());
        let only_allowed_chars = phone
            .chars()
            .all(|char| char.is_ascii_digit() || ALLOWED_SEPARATORS.contains(&char));

        if !has_digit || !only_allowed_chars || phone.len() > MAX_CHAR_LENGTH {
            return Err(format!("{} is not a valid phone number", phone));
        }

        Ok(Self(phone))
    }

    /// Phone number without separators
    pub fn digits(&self) -> String {
        digits_of(&self.0)
    }
}

impl AsRef<str> for CustomerPhone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub fn digits_of(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}
