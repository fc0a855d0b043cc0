#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    #[serde(alias = "ativo")]
    Active,
    #[serde(alias = "inativo", alias = "desativado")]
    Inactive,
    #[serde(alias = "vencido")]
    Expired,
}

impl CustomerStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, CustomerStatus::Active)
    }

    pub fn parse(status: &str) -> Result<CustomerStatus, String> {
        match status.trim().to_lowercase().as_str() {
            "active" | "ativo" => Ok(CustomerStatus::Active),
            "inactive" | "inativo" | "desativado" => Ok(CustomerStatus::Inactive),
            "expired" | "vencido" => Ok(CustomerStatus::Expired),
            _ => Err(format!("{} is not a valid customer status", status)),
        }
    }

    /// Position used when sorting by status
    pub fn rank(&self) -> u8 {
        match self {
            CustomerStatus::Active => 0,
            CustomerStatus::Inactive => 1,
            CustomerStatus::Expired => 2,
        }
    }
}

impl AsRef<str> for CustomerStatus {
    fn as_ref(&self) -> &str {
        match self {
            CustomerStatus::Active => "active",
            CustomerStatus::Inactive => "inactive",
            CustomerStatus::Expired => "expired",
        }
    }
}

impl std::fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}
