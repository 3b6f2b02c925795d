use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    /// Grants access to the dashboard (token display, records, export).
    pub dashboard: bool,
}

#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);
