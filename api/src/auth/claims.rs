use db::models::Role;
use serde::{Deserialize, Serialize};

/// JWT claim set: subject account id, its role at issue time, and expiry.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub exp: usize,
}

/// Verified identity attached to a request by the auth gate.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);
