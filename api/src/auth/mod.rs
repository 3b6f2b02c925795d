pub mod claims;
pub mod extractors;
pub mod guards;
pub mod middleware;

pub use claims::{AuthUser, Claims};

use crate::state::AuthSettings;
use chrono::Utc;
use jsonwebtoken::{Header, encode};

/// Subject recorded in every dashboard token.
pub const DASHBOARD_SUBJECT: &str = "dashboard";

/// Generates a dashboard JWT and its RFC 3339 expiry timestamp.
pub fn generate_jwt(auth: &AuthSettings) -> Result<(String, String), jsonwebtoken::errors::Error> {
    let expiry = Utc::now() + auth.jwt_duration();
    let exp_timestamp = usize::try_from(expiry.timestamp()).unwrap_or(0);

    let claims = Claims {
        sub: DASHBOARD_SUBJECT.to_string(),
        dashboard: true,
        exp: exp_timestamp,
    };

    let token = encode(&Header::default(), &claims, auth.encoding_key())?;

    Ok((token, expiry.to_rfc3339()))
}
