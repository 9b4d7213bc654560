use thiserror::Error;

pub type Result<T> = std::result::Result<T, VaultKeyError>;

#[derive(Error, Debug)]
pub enum VaultKeyError {
    #[error("Could not retrieve stored {0}.")]
    CredentialsMissing(String),

    #[error("Could not authenticate using provided information: {0}")]
    AuthServer(String),

    #[error("No stored value for key {0}.")]
    NotFound(String),

    #[error("Stored value for key {0} has expired.")]
    Expired(String),

    #[error("Storage unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Couldn't find a Borderlands 3 game registered for {}.", .0.as_ref().map(|p| format!("platform '{}'", p)).unwrap_or_else(|| "any platform".to_string()))]
    PlatformNotFound(Option<String>),

    #[error("SHiFT Code {code} not available for platform '{platform}'.")]
    PlatformMismatch { code: String, platform: String },

    #[error("SHiFT Code {0} is no longer active.")]
    CodeInactive(String),

    #[error("Code {0} recognized as invalid code, ignoring.")]
    KnownBadCode(String),

    #[error("Code {code} already redeemed{}", .date.as_ref().map(|d| format!(" on {}", d)).unwrap_or_default())]
    AlreadyRedeemed { code: String, date: Option<String> },

    #[error("Code redemption timed out after {0} polls.")]
    RedemptionTimeout(u32),

    #[error("Received status code {0} from request.")]
    UnexpectedStatus(u16),

    #[error("Unknown {kind} source {name}.")]
    UnknownSource { kind: &'static str, name: String },

    #[error("Could not fetch code source {0}.")]
    SourceUnavailable(String),

    #[error("Code source layout changed: {0}")]
    ScrapeLayout(String),

    #[error("Received status code {status} from request.")]
    HttpStatus { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Could not parse JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("Unexpected response from server: {0}")]
    MalformedResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl VaultKeyError {
    /// Lookups that may fall back to a default treat these as "absent".
    pub fn is_absent(&self) -> bool {
        matches!(self, VaultKeyError::NotFound(_) | VaultKeyError::Expired(_))
    }
}
