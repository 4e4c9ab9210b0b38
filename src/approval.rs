use std::fmt::Display;
use std::hash::Hash;
use std::hash::Hasher;

use crate::account::Account;
use crate::approval_score::ApprovalScore;
use crate::event_keys::BY;
use crate::event_keys::OLD_VALUE;
use crate::event_keys::TYPE;
use crate::event_keys::UPDATED;
use crate::event_keys::VALUE;
use crate::json_object::get_bool;
use crate::json_object::get_object;
use crate::json_object::get_string;
use crate::json_object::GerritJsonDto;
use crate::json_object::JsonFieldError;
use crate::json_object::JsonObject;
use crate::persisted::PersistedApproval;

/// An approval on a Gerrit patch set, like `Code-Review +2`.
///
/// Two approvals are equal (and hash the same) when their category and value are equal, no
/// matter who gave them or what the value was before. Consumers rely on this to deduplicate
/// approvals.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Default)]
#[serde(from = "PersistedApproval", into = "PersistedApproval")]
pub struct Approval {
    /// The approval category and value.
    pub(crate) score: Option<ApprovalScore>,
    /// Gerrit's own "updated" flag. `None` if the server didn't send one.
    ///
    /// Superseded by [`Approval::is_changed`].
    pub(crate) updated: Option<bool>,
    /// The value before this approval was changed.
    pub(crate) old_value: Option<String>,
    /// The user who gave the approval.
    pub(crate) by: Option<Account>,
    /// Older persisted approvals stored a bare username instead of [`Approval::by`].
    ///
    /// Cleared by [`Approval::upgrade`].
    pub(crate) legacy_username: Option<String>,
}

impl Approval {
    pub fn new_from_json(json: &JsonObject) -> Result<Self, JsonFieldError> {
        let mut approval = Self::default();
        approval.from_json(json)?;
        Ok(approval)
    }

    pub fn score(&self) -> Option<&ApprovalScore> {
        self.score.as_ref()
    }

    pub fn set_score(&mut self, score: Option<ApprovalScore>) {
        self.score = score;
    }

    /// The approval category, like `Verified`.
    pub fn category(&self) -> Option<&str> {
        self.score.as_ref().map(|score| score.category.as_str())
    }

    /// The approval value, like `-1`.
    pub fn value(&self) -> Option<&str> {
        self.score.as_ref().map(|score| score.value.as_str())
    }

    /// Change the value of this approval.
    ///
    /// Does nothing if there's no category to put the value in.
    pub fn set_value(&mut self, value: impl Into<String>) {
        if let Some(score) = &mut self.score {
            score.value = value.into();
        }
    }

    pub fn old_value(&self) -> Option<&str> {
        self.old_value.as_deref()
    }

    pub fn by(&self) -> Option<&Account> {
        self.by.as_ref()
    }

    pub fn set_by(&mut self, by: Option<Account>) {
        self.by = by;
    }

    /// Was this approval changed by the event that carries it?
    ///
    /// Gerrit only sends `oldValue` for changed approvals, so this is derived from that rather
    /// than from the `updated` flag.
    pub fn is_changed(&self) -> bool {
        self.old_value.is_some()
    }

    /// Gerrit's raw `updated` flag, or `None` if the server doesn't send it.
    #[deprecated = "Use `Approval::is_changed` instead"]
    pub fn updated(&self) -> Option<bool> {
        self.updated
    }

    /// The username of the user who gave this approval.
    #[deprecated = "Use `Approval::by` instead"]
    pub fn legacy_username(&self) -> Option<&str> {
        match &self.by {
            Some(by) => by.username.as_deref(),
            // Not upgraded yet.
            None => self.legacy_username.as_deref(),
        }
    }

    /// Move a legacy bare username into [`Approval::by`].
    ///
    /// Run this once on every approval loaded from persisted data before using it. Running it
    /// again is a no-op.
    pub fn upgrade(&mut self) {
        if let Some(username) = self.legacy_username.take() {
            tracing::debug!(%username, "Upgrading legacy approval username to an account");
            self.by = Some(Account::with_username(username));
        }
    }

    /// Like [`Approval::upgrade`], by value.
    pub fn upgraded(mut self) -> Self {
        self.upgrade();
        self
    }
}

impl GerritJsonDto for Approval {
    fn from_json(&mut self, json: &JsonObject) -> Result<(), JsonFieldError> {
        if json.contains_key(TYPE) && json.contains_key(VALUE) {
            if let (Some(category), Some(value)) =
                (get_string(json, TYPE)?, get_string(json, VALUE)?)
            {
                self.score = Some(ApprovalScore { category, value });
            }
        }
        if let Some(by) = get_object(json, BY)? {
            self.by = Some(Account::new_from_json(by)?);
        }
        if let Some(updated) = get_bool(json, UPDATED)? {
            self.updated = Some(updated);
        }
        if let Some(old_value) = get_string(json, OLD_VALUE)? {
            self.old_value = Some(old_value);
        }
        tracing::trace!(approval = ?self, "Hydrated approval");
        Ok(())
    }
}

impl PartialEq for Approval {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score
    }
}

impl Eq for Approval {}

impl Hash for Approval {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.score.hash(state);
    }
}

impl Display for Approval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Approval: {} {}",
            self.category().unwrap_or("null"),
            self.value().unwrap_or("null")
        )
    }
}
