use super::model::{normalize_role, AuthenticatedUser};
use crate::core::error::AppError;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::jwks::JwksClient;

pub struct JwtValidator {
    jwks_client: Arc<JwksClient>,
    issuer: String,
    audience: String,
    roles_claim: String,
    leeway: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    // iss, aud, exp and nbf are checked by jsonwebtoken
    sub: String,
    #[serde(default)]
    email: Option<String>,

    // Everything else, the roles claim lives in here
    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

impl JwtValidator {
    pub fn new(
        jwks_client: Arc<JwksClient>,
        issuer: String,
        audience: String,
        roles_claim: String,
        leeway: Duration,
    ) -> Self {
        Self {
            jwks_client,
            issuer,
            audience,
            roles_claim,
            leeway: leeway.as_secs(),
        }
    }

    pub async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let header = decode_header(token).map_err(|e| AppError::Auth(e.to_string()))?;

        if header.alg != Algorithm::RS256 {
            return Err(AppError::Auth(format!(
                "Unsupported algorithm: {:?}. Only RS256 is allowed",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| AppError::Auth("Missing kid in token header".to_string()))?;

        let decoding_key = self
            .jwks_client
            .get_key(&kid)
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.leeway = self.leeway;
        validation.validate_nbf = true;

        let token_data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?;

        Ok(self.to_user(token_data.claims))
    }

    fn to_user(&self, claims: Claims) -> AuthenticatedUser {
        let roles = extract_roles(&claims.extra, &self.roles_claim);
        AuthenticatedUser {
            sub: claims.sub,
            email: claims.email,
            roles,
        }
    }
}

/// Read roles from `claim`, which may be a dotted path such as
/// `realm_access.roles`. Accepts an array of strings or a single string
/// of space or comma separated names.
fn extract_roles(claims: &HashMap<String, Value>, claim: &str) -> Vec<String> {
    let mut segments = claim.split('.');
    let first = segments.next().and_then(|s| claims.get(s));
    let value = segments.fold(first, |value, segment| value.and_then(|v| v.get(segment)));

    let mut roles: Vec<String> = match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(normalize_role)
            .collect(),
        Some(Value::String(joined)) => joined
            .split([' ', ','])
            .filter(|s| !s.trim().is_empty())
            .map(normalize_role)
            .collect(),
        _ => Vec::new(),
    };

    roles.sort();
    roles.dedup();
    roles
}
