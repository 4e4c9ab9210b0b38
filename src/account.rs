use std::fmt::Display;

use crate::event_keys::EMAIL;
use crate::event_keys::NAME;
use crate::event_keys::USERNAME;
use crate::json_object::get_string;
use crate::json_object::GerritJsonDto;
use crate::json_object::JsonFieldError;
use crate::json_object::JsonObject;

/// A Gerrit account, like the author of an event or the giver of an approval.
///
/// Every field is optional; which ones Gerrit fills in depends on the server version and on
/// what the user has configured.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl Account {
    pub fn new_from_json(json: &JsonObject) -> Result<Self, JsonFieldError> {
        let mut account = Self::default();
        account.from_json(json)?;
        Ok(account)
    }

    /// An account known only by its username.
    pub fn with_username(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            ..Default::default()
        }
    }

    /// Format as `"Name" <email>`, if both are known.
    pub fn name_and_email(&self) -> Option<String> {
        match (&self.name, &self.email) {
            (Some(name), Some(email)) => Some(format!("\"{name}\" <{email}>")),
            _ => None,
        }
    }
}

impl GerritJsonDto for Account {
    fn from_json(&mut self, json: &JsonObject) -> Result<(), JsonFieldError> {
        if let Some(name) = get_string(json, NAME)? {
            self.name = Some(name);
        }
        if let Some(email) = get_string(json, EMAIL)? {
            self.email = Some(email);
        }
        if let Some(username) = get_string(json, USERNAME)? {
            self.username = Some(username);
        }
        Ok(())
    }
}

impl Display for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.username, &self.name, &self.email) {
            (Some(username), _, _) => write!(f, "{username}"),
            (None, Some(name), _) => write!(f, "{name}"),
            (None, None, Some(email)) => write!(f, "{email}"),
            (None, None, None) => write!(f, "unknown"),
        }
    }
}
