use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// FileVersion: one file's full content as of one commit
// ---------------------------------------------------------------------------

/// A file version identifier, unique across the whole history.
pub type FileVersionId = String;

/// Generate a new file version ID.
pub fn new_file_version_id() -> FileVersionId {
    format!("f-{}", Uuid::new_v4().as_simple())
}

/// Who produced a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    /// A human edit in the editor.
    User,
    /// A code-generation or automated fix step.
    Automated,
}

impl Author {
    pub fn as_str(self) -> &'static str {
        match self {
            Author::User => "user",
            Author::Automated => "automated",
        }
    }

    /// Parse the wire/CLI spelling of an author.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "user" => Some(Author::User),
            "automated" | "auto" => Some(Author::Automated),
            _ => None,
        }
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to a file in a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Create,
    Modify,
    Delete,
}

impl ChangeType {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeType::Create => "create",
            ChangeType::Modify => "modify",
            ChangeType::Delete => "delete",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single file's content at one commit. Stores the full text, never a delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileVersion {
    /// Unique file version identifier.
    pub id: FileVersionId,
    /// Logical file path (case-sensitive).
    pub path: String,
    /// Full file text at this point.
    pub content: String,
    /// When the version was recorded.
    pub timestamp: DateTime<Utc>,
    /// Optional note attached to this file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Who made the change.
    pub author: Author,
    /// Whether the file was created, modified or deleted.
    pub change_type: ChangeType,
}

impl FileVersion {
    /// Materialize a caller-supplied change into a version with a fresh ID.
    pub fn from_change(change: FileChange, author: Author, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: new_file_version_id(),
            path: change.path,
            content: change.content,
            timestamp,
            message: change.message,
            author,
            change_type: change.change_type,
        }
    }

    /// Short form of the ID for display.
    pub fn short_id(&self) -> &str {
        crate::model::commit::abbreviate_id(&self.id, 12)
    }

    /// Returns true if this version records the removal of the file.
    pub fn is_deletion(&self) -> bool {
        self.change_type == ChangeType::Delete
    }
}

// ---------------------------------------------------------------------------
// FileChange: caller input for a commit
// ---------------------------------------------------------------------------

/// One entry of a change batch submitted by an editor or generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: String,
    pub content: String,
    pub change_type: ChangeType,
    pub message: Option<String>,
}

impl FileChange {
    /// A modification of `path` with the given full content.
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self::modify(path, content)
    }

    pub fn create(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self::with_type(path, content, ChangeType::Create)
    }

    pub fn modify(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self::with_type(path, content, ChangeType::Modify)
    }

    /// A deletion carries no content.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::with_type(path, String::new(), ChangeType::Delete)
    }

    pub fn with_type(
        path: impl Into<String>,
        content: impl Into<String>,
        change_type: ChangeType,
    ) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            change_type,
            message: None,
        }
    }

    /// Attach a per-file note.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}
