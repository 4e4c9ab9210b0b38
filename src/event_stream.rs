use miette::Context;
use miette::IntoDiagnostic;

use crate::account::Account;
use crate::approval::Approval;
use crate::event_keys::APPROVALS;
use crate::event_keys::AUTHOR;
use crate::event_keys::TYPE;
use crate::json_object::as_object;
use crate::json_object::get_array;
use crate::json_object::get_object;
use crate::json_object::get_string;
use crate::json_object::JsonFieldError;
use crate::json_object::JsonObject;

/// The approvals carried by one event from `gerrit stream-events`.
#[derive(Debug, Clone, Default)]
pub struct EventApprovals {
    /// The event type, like `comment-added`.
    pub event_type: Option<String>,
    /// Who caused the event.
    pub author: Option<Account>,
    pub approvals: Vec<Approval>,
}

impl EventApprovals {
    pub fn from_json(json: &JsonObject) -> Result<Self, JsonFieldError> {
        let approvals = match get_array(json, APPROVALS)? {
            Some(approvals) => approvals
                .iter()
                .map(|approval| Approval::new_from_json(as_object(approval, APPROVALS)?))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            event_type: get_string(json, TYPE)?,
            author: get_object(json, AUTHOR)?
                .map(Account::new_from_json)
                .transpose()?,
            approvals,
        })
    }

    /// Each approval in this event, alongside the event's author.
    pub fn rows(&self) -> impl Iterator<Item = (Option<&Account>, &Approval)> + '_ {
        self.approvals
            .iter()
            .map(|approval| (self.author.as_ref(), approval))
    }
}

/// Parse `gerrit stream-events` output, one JSON object per line.
pub fn parse_events(stdout: &str) -> miette::Result<Vec<EventApprovals>> {
    let mut events = Vec::new();

    for (index, line) in stdout.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let line_number = index + 1;
        let row = serde_json::from_str::<serde_json::Value>(line)
            .into_diagnostic()
            .wrap_err_with(|| format!("Line {line_number} is not valid JSON"))?;
        let event = as_object(&row, "event")
            .and_then(EventApprovals::from_json)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read event on line {line_number}"))?;
        tracing::debug!(
            line = line_number,
            event_type = event.event_type.as_deref(),
            author = event.author.as_ref().map(tracing::field::display),
            approvals = event.approvals.len(),
            "Parsed event"
        );
        events.push(event);
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approval_score::ApprovalScore;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_events() {
        let events = parse_events(indoc!(
            r#"
            {"type":"comment-added","author":{"name":"Alice","username":"alice"},"approvals":[{"type":"Code-Review","description":"Code-Review","value":"2","oldValue":"0","by":{"username":"alice"}},{"type":"Verified","description":"Verified","value":"0"}],"comment":"LGTM"}

            {"type":"ref-updated","submitter":{"username":"bob"}}
            "#
        ))
        .unwrap();

        assert_eq!(events.len(), 2);

        let comment = &events[0];
        assert_eq!(comment.event_type.as_deref(), Some("comment-added"));
        assert_eq!(
            comment.author.as_ref().and_then(|author| author.name.as_deref()),
            Some("Alice")
        );
        assert_eq!(
            comment
                .approvals
                .iter()
                .map(|approval| approval.score().cloned())
                .collect::<Vec<_>>(),
            vec![
                Some(ApprovalScore::new("Code-Review", "2")),
                Some(ApprovalScore::new("Verified", "0")),
            ]
        );
        assert!(comment.approvals[0].is_changed());
        assert!(!comment.approvals[1].is_changed());

        let rows = comment.rows().collect::<Vec<_>>();
        assert_eq!(rows.len(), 2);
        assert!(rows
            .iter()
            .all(|(author, _)| author.and_then(|author| author.username.as_deref())
                == Some("alice")));

        let ref_updated = &events[1];
        assert_eq!(ref_updated.event_type.as_deref(), Some("ref-updated"));
        assert!(ref_updated.approvals.is_empty());
        assert_eq!(ref_updated.rows().count(), 0);
    }

    #[test]
    fn test_parse_events_errors() {
        let error = parse_events("{\"type\":\"comment-added\"}\n[1, 2]\n").unwrap_err();
        assert_eq!(error.to_string(), "Failed to read event on line 2");

        let error = parse_events("{\"approvals\": {\"type\": \"Verified\"}}").unwrap_err();
        assert_eq!(error.to_string(), "Failed to read event on line 1");

        let error = parse_events("{\"approvals\": [\"Verified\"]}").unwrap_err();
        assert_eq!(error.to_string(), "Failed to read event on line 1");

        let error = parse_events("{").unwrap_err();
        assert_eq!(error.to_string(), "Line 1 is not valid JSON");
    }
}
