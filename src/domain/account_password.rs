use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Password of the customer's subscription account.
///
/// It is only serialized towards the record store. API views and exports never carry it.
#[derive(Clone)]
pub struct AccountPassword(Secret<String>);

impl AccountPassword {
    pub fn parse(password: Secret<String>) -> Result<AccountPassword, String> {
        if password.expose_secret().trim().is_empty() {
            return Err(String::from("password cannot be empty"));
        }

        Ok(Self(password))
    }
}

impl ExposeSecret<String> for AccountPassword {
    fn expose_secret(&self) -> &String {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for AccountPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccountPassword([REDACTED])")
    }
}

impl Serialize for AccountPassword {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0.expose_secret())
    }
}

impl<'de> Deserialize<'de> for AccountPassword {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let password = String::deserialize(deserializer)?;

        Ok(Self(Secret::new(password)))
    }
}
