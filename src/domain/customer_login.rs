use unicode_segmentation::UnicodeSegmentation;

const MAX_CHAR_LENGTH: usize = 256;

/// Account identifier of the customer on the subscribed service
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct CustomerLogin(String);

impl CustomerLogin {
    pub fn parse(login: String) -> Result<CustomerLogin, String> {
        let login = login.trim().to_string();

        if login.is_empty() || login.graphemes(true).count() > MAX_CHAR_LENGTH {
            return Err(format!("{} is not a valid login", login));
        }

        Ok(Self(login))
    }
}

impl AsRef<str> for CustomerLogin {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
