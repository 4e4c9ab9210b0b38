//! Approvals saved to disk.
//!
//! Older versions stored the approving user as a bare `username` string. Those records still
//! load, and [`read_approvals`] upgrades them before anything else sees them.

use std::io::BufReader;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;

use camino::Utf8Path;
use camino::Utf8PathBuf;
use fs_err as fs;
use fs_err::File;
use miette::Context;
use miette::IntoDiagnostic;

use crate::account::Account;
use crate::approval::Approval;
use crate::approval_score::ApprovalScore;

/// The serialized shape of an [`Approval`].
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct PersistedApproval {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    type_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    old_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    by: Option<Account>,
    /// Legacy; replaced by `by`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,
}

impl From<PersistedApproval> for Approval {
    fn from(persisted: PersistedApproval) -> Self {
        let score = match (persisted.type_, persisted.value) {
            (Some(category), Some(value)) => Some(ApprovalScore { category, value }),
            _ => None,
        };
        Self {
            score,
            updated: persisted.updated,
            old_value: persisted.old_value,
            by: persisted.by,
            legacy_username: persisted.username,
        }
    }
}

impl From<Approval> for PersistedApproval {
    fn from(approval: Approval) -> Self {
        let (type_, value) = match approval.score {
            Some(ApprovalScore { category, value }) => (Some(category), Some(value)),
            None => (None, None),
        };
        Self {
            type_,
            value,
            updated: approval.updated,
            old_value: approval.old_value,
            by: approval.by,
            username: approval.legacy_username,
        }
    }
}

/// Read a JSON array of persisted approvals, upgrading any legacy records.
pub fn read_approvals(reader: impl Read) -> miette::Result<Vec<Approval>> {
    let approvals: Vec<Approval> = serde_json::from_reader(reader).into_diagnostic()?;
    let legacy = approvals
        .iter()
        .filter(|approval| approval.legacy_username.is_some())
        .count();
    if legacy > 0 {
        tracing::debug!(legacy, total = approvals.len(), "Upgrading legacy approvals");
    }
    Ok(approvals.into_iter().map(Approval::upgraded).collect())
}

pub fn load_approvals(path: &Utf8Path) -> miette::Result<Vec<Approval>> {
    let file = File::open(path).into_diagnostic()?;
    read_approvals(BufReader::new(file))
        .wrap_err_with(|| format!("Failed to read approvals from `{path}`"))
}

/// Write approvals as a JSON array.
pub fn write_approvals_to(writer: impl Write, approvals: &[Approval]) -> miette::Result<()> {
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, approvals).into_diagnostic()?;
    // Dropping a `BufWriter` discards errors from the final write.
    writer.flush().into_diagnostic()?;
    Ok(())
}

/// Replace the approvals file at `path`.
///
/// The approvals are written to a sibling file first and then renamed over `path`, so a failed
/// write leaves the original untouched.
pub fn write_approvals(path: &Utf8Path, approvals: &[Approval]) -> miette::Result<()> {
    let tmp_path = Utf8PathBuf::from(format!("{path}.tmp"));
    let file = File::create(&tmp_path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to write approvals to `{path}`"))?;

    let result = write_approvals_to(file, approvals)
        .and_then(|()| fs::rename(&tmp_path, path).into_diagnostic());
    if result.is_err() {
        if let Err(error) = fs::remove_file(&tmp_path) {
            tracing::debug!(%error, "Failed to remove `{tmp_path}`");
        }
    }

    result.wrap_err_with(|| format!("Failed to write approvals to `{path}`"))
}

#[cfg(test)]
#[allow(deprecated)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_legacy_approvals() {
        let approvals = read_approvals(
            indoc!(
                r#"
                [
                    {"type": "Code-Review", "value": "+2", "username": "carol"},
                    {"type": "Verified", "value": "-1", "oldValue": "0", "updated": true,
                     "by": {"name": "Dave", "username": "dave"}},
                    {"value": "+1", "username": "erin"}
                ]
                "#
            )
            .as_bytes(),
        )
        .unwrap();

        assert_eq!(approvals.len(), 3);

        assert_eq!(approvals[0].to_string(), "Approval: Code-Review +2");
        assert_eq!(approvals[0].by(), Some(&Account::with_username("carol")));
        assert_eq!(approvals[0].legacy_username, None);
        assert_eq!(approvals[0].legacy_username(), Some("carol"));

        assert_eq!(approvals[1].by().unwrap().name.as_deref(), Some("Dave"));
        assert_eq!(approvals[1].updated(), Some(true));
        assert!(approvals[1].is_changed());

        // A value without a category is dropped, like when hydrating.
        assert_eq!(approvals[2].score(), None);
        assert_eq!(approvals[2].legacy_username(), Some("erin"));
    }

    #[test]
    fn test_deserialize_does_not_upgrade() {
        let approval: Approval =
            serde_json::from_str(r#"{"type": "Verified", "value": "+1", "username": "carol"}"#)
                .unwrap();
        assert_eq!(approval.by(), None);
        assert_eq!(approval.legacy_username(), Some("carol"));
        assert_eq!(approval.upgraded().by(), Some(&Account::with_username("carol")));
    }

    #[test]
    fn test_serialize_current_shape() {
        let approval = Approval {
            score: Some(ApprovalScore::new("Code-Review", "+1")),
            old_value: Some("0".to_owned()),
            legacy_username: Some("carol".to_owned()),
            ..Default::default()
        }
        .upgraded();
        assert_eq!(
            serde_json::to_string(&approval).unwrap(),
            r#"{"type":"Code-Review","value":"+1","oldValue":"0","by":{"username":"carol"}}"#
        );
    }

    #[test]
    fn test_read_approvals_rejects_garbage() {
        assert!(read_approvals(r#"{"type": "Verified"}"#.as_bytes()).is_err());
        assert!(read_approvals(r#"[{"updated": "sometimes"}]"#.as_bytes()).is_err());
    }

    /// A writer with no space left.
    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                "No space left on device",
            ))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn scratch_path(name: &str) -> Utf8PathBuf {
        let dir = Utf8PathBuf::try_from(std::env::temp_dir()).unwrap();
        dir.join(format!("gerrit-events-{}-{name}.json", std::process::id()))
    }

    #[test]
    fn test_write_approvals_to_reports_failed_write() {
        let approval = Approval {
            score: Some(ApprovalScore::new("Code-Review", "+1")),
            ..Default::default()
        };
        assert!(write_approvals_to(FullDisk, &[approval]).is_err());
    }

    #[test]
    fn test_write_approvals_replaces_file() {
        let path = scratch_path("replace");
        fs::write(
            &path,
            r#"[{"type": "Code-Review", "value": "+2", "username": "carol"}]"#,
        )
        .unwrap();

        let approvals = load_approvals(&path).unwrap();
        write_approvals(&path, &approvals).unwrap();

        assert!(!Utf8PathBuf::from(format!("{path}.tmp")).exists());
        let written = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();
        // Written in the current shape, so nothing is left to upgrade.
        let reloaded: Vec<Approval> = serde_json::from_str(&written).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded[0].legacy_username, None);
        assert_eq!(reloaded[0].by(), Some(&Account::with_username("carol")));
        assert_eq!(reloaded[0].to_string(), "Approval: Code-Review +2");
    }

    #[test]
    fn test_write_approvals_missing_directory() {
        let path = scratch_path("missing").parent().unwrap().join("no-such-dir/approvals.json");
        assert!(write_approvals(&path, &[]).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_updated_flag_survives_round_trip() {
        for updated in [None, Some(false), Some(true)] {
            let approval = Approval {
                score: Some(ApprovalScore::new("Verified", "+1")),
                updated,
                ..Default::default()
            };
            let json = serde_json::to_string(&approval).unwrap();
            let reloaded: Approval = serde_json::from_str(&json).unwrap();
            assert_eq!(reloaded.updated(), updated, "{json}");
        }

        assert_eq!(
            serde_json::to_string(&Approval::default()).unwrap(),
            "{}"
        );
        let not_updated = Approval {
            updated: Some(false),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&not_updated).unwrap(),
            r#"{"updated":false}"#
        );
    }
}
