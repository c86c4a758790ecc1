use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shelf_engine::{AtomicFileWriter, AuthResponse, PersistError};
use shelf_logging::{shelf_info, shelf_warn};

pub(crate) const SESSION_FILENAME: &str = "session.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    pub profile_image: Option<String>,
    pub created_at: Option<String>,
}

/// Bearer token plus the profile returned at login. Every API call carries the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Session {
    pub token: String,
    pub user: UserProfile,
}

impl From<AuthResponse> for Session {
    fn from(auth: AuthResponse) -> Self {
        Self {
            token: auth.token,
            user: UserProfile {
                id: auth.user.id,
                username: auth.user.username,
                email: auth.user.email,
                profile_image: auth.user.profile_image,
                created_at: auth.user.created_at,
            },
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum SessionError {
    #[error("failed to serialize session: {0}")]
    Serialize(String),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// `{state_dir}/session.ron`.
pub(crate) struct SessionStore {
    writer: AtomicFileWriter,
}

impl SessionStore {
    pub fn new(state_dir: &Path) -> Self {
        Self {
            writer: AtomicFileWriter::new(PathBuf::from(state_dir)),
        }
    }

    /// The stored session, or `None` when absent or unreadable.
    pub fn load(&self) -> Option<Session> {
        let path = self.writer.dir().join(SESSION_FILENAME);
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                shelf_warn!("Failed to read session from {:?}: {}", path, err);
                return None;
            }
        };
        match ron::from_str::<Session>(&content) {
            Ok(session) if !session.token.is_empty() => Some(session),
            Ok(_) => {
                shelf_warn!("Ignoring session with empty token at {:?}", path);
                None
            }
            Err(err) => {
                shelf_warn!("Failed to parse session from {:?}: {}", path, err);
                None
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<PathBuf, SessionError> {
        let pretty = ron::ser::PrettyConfig::new();
        let content = ron::ser::to_string_pretty(session, pretty)
            .map_err(|err| SessionError::Serialize(err.to_string()))?;
        let path = self.writer.write(SESSION_FILENAME, &content)?;
        shelf_info!("Saved session for {} to {:?}", session.user.username, path);
        Ok(path)
    }

    /// Returns whether a session file existed.
    pub fn clear(&self) -> Result<bool, SessionError> {
        Ok(self.writer.remove(SESSION_FILENAME)?)
    }
}
