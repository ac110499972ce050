//! OAuth2 authentication and Gmail hub initialization

use google_gmail1::{hyper_rustls, hyper_util, yup_oauth2, Gmail};
use std::env;
use std::path::Path;
use yup_oauth2::ApplicationSecret;

use crate::error::{Result, SweepError};

/// Full-access Gmail scope
///
/// Permanent message deletion is rejected under the narrower
/// gmail.modify scope, so the sweep runs with full mailbox access.
pub const MAIL_SCOPE: &str = "https://mail.google.com/";

/// Scopes requested when obtaining a token
pub const MAIL_SCOPES: &[&str] = &[MAIL_SCOPE];

/// Type alias for the Gmail hub to simplify type signatures
pub type GmailHub =
    Gmail<hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>>;

/// Initialize the Gmail API hub with OAuth2 authentication
///
/// Reads the OAuth2 client secret (falling back to environment variables
/// when the file is absent), runs the installed-application flow - opening
/// a browser for consent on the first run - and persists tokens to
/// `token_cache_path` so later runs refresh silently.
///
/// A token is fetched eagerly so that authentication problems (including a
/// cached token that no longer matches the client secret) abort here, before
/// any mailbox work starts.
pub async fn initialize_gmail_hub(
    credentials_path: &Path,
    token_cache_path: &Path,
) -> Result<GmailHub> {
    let secret = read_client_secret(credentials_path).await?;

    // HTTPRedirect opens a browser for user authorization
    let auth = yup_oauth2::InstalledFlowAuthenticator::builder(
        secret,
        yup_oauth2::InstalledFlowReturnMethod::HTTPRedirect,
    )
    .persist_tokens_to_disk(token_cache_path)
    .build()
    .await
    .map_err(|e| SweepError::AuthError(format!("Failed to build authenticator: {}", e)))?;

    let _token = auth
        .token(MAIL_SCOPES)
        .await
        .map_err(|e| SweepError::AuthError(format!("Failed to obtain token: {}", e)))?;

    // The cache holds a refresh token now; keep it out of other users' reach
    if token_cache_path.exists() {
        secure_token_file(token_cache_path).await?;
    }

    let client = hyper_util::client::legacy::Client::builder(hyper_util::rt::TokioExecutor::new())
        .build(
            hyper_rustls::HttpsConnectorBuilder::new()
                .with_native_roots()
                .map_err(|e| SweepError::AuthError(format!("Failed to load TLS roots: {}", e)))?
                .https_or_http()
                .enable_http1()
                .build(),
        );

    Ok(Gmail::new(client, auth))
}

/// Read the OAuth2 client secret from disk, or from the environment when the
/// file does not exist
async fn read_client_secret(credentials_path: &Path) -> Result<ApplicationSecret> {
    if credentials_path.exists() {
        return yup_oauth2::read_application_secret(credentials_path)
            .await
            .map_err(|e| SweepError::AuthError(format!("Failed to read credentials: {}", e)));
    }

    load_credentials_from_env().map_err(|_| {
        SweepError::AuthError(format!(
            "Credentials file {:?} not found and GMAIL_CLIENT_ID/GMAIL_CLIENT_SECRET are not set",
            credentials_path
        ))
    })
}

/// Load OAuth2 credentials from environment variables
///
/// # Environment Variables
/// - `GMAIL_CLIENT_ID`: OAuth2 client ID
/// - `GMAIL_CLIENT_SECRET`: OAuth2 client secret
/// - `GMAIL_REDIRECT_URI`: Redirect URI (optional, defaults to http://localhost:8080)
pub fn load_credentials_from_env() -> Result<ApplicationSecret> {
    let client_id = env::var("GMAIL_CLIENT_ID")
        .map_err(|_| SweepError::ConfigError("GMAIL_CLIENT_ID not set".to_string()))?;
    let client_secret = env::var("GMAIL_CLIENT_SECRET")
        .map_err(|_| SweepError::ConfigError("GMAIL_CLIENT_SECRET not set".to_string()))?;
    let redirect_uri =
        env::var("GMAIL_REDIRECT_URI").unwrap_or_else(|_| "http://localhost:8080".to_string());

    Ok(ApplicationSecret {
        client_id,
        client_secret,
        auth_uri: "https://accounts.google.com/o/oauth2/auth".to_string(),
        token_uri: "https://oauth2.googleapis.com/token".to_string(),
        redirect_uris: vec![redirect_uri],
        ..Default::default()
    })
}

/// Restrict the token cache to the owning user on Unix systems
#[cfg(unix)]
pub async fn secure_token_file(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = tokio::fs::metadata(path).await?.permissions();
    perms.set_mode(0o600);
    tokio::fs::set_permissions(path, perms).await?;
    Ok(())
}

/// Windows uses ACLs instead of Unix permissions; nothing to do here
#[cfg(windows)]
pub async fn secure_token_file(_path: &Path) -> Result<()> {
    Ok(())
}
