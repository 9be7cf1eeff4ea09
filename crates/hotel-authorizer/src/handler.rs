//! API Gateway custom authorizer envelope

use hotel_auth::{
    Authorizer, Decision, SecretStore, authorization_header, extract_bearer_token,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Principal reported when the token carries no subject
const ANONYMOUS_PRINCIPAL: &str = "user";

/// Token or request authorizer event
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerRequest {
    #[serde(default)]
    pub authorization_token: Option<String>,
    pub method_arn: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
}

impl AuthorizerRequest {
    /// Raw authorization value, from `authorizationToken` or the headers
    fn authorization(&self) -> Option<&str> {
        self.authorization_token.as_deref().or_else(|| {
            self.headers
                .as_ref()
                .and_then(|h| authorization_header(h.iter().map(|(k, v)| (k.as_str(), v.as_str()))))
        })
    }

    /// Requested resource path, falling back to the `methodArn` resource
    fn resource_path(&self) -> String {
        match self.path.as_deref() {
            Some(path) if !path.is_empty() => path.to_string(),
            _ => resource_path(&self.method_arn),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerResponse {
    pub principal_id: String,
    pub policy_document: PolicyDocument,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    pub action: String,
    pub effect: Effect,
    pub resource: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Effect {
    Allow,
    Deny,
}

impl AuthorizerResponse {
    fn policy(principal_id: &str, effect: Effect, resource: &str) -> Self {
        Self {
            principal_id: principal_id.to_string(),
            policy_document: PolicyDocument {
                version: "2012-10-17".to_string(),
                statement: vec![Statement {
                    action: "execute-api:Invoke".to_string(),
                    effect,
                    resource: resource.to_string(),
                }],
            },
            context: BTreeMap::new(),
        }
    }

    pub fn effect(&self) -> Option<Effect> {
        self.policy_document.statement.first().map(|s| s.effect)
    }
}

/// Failures reported to API Gateway as invocation errors
#[derive(Debug, thiserror::Error)]
pub enum AuthorizerError {
    /// API Gateway turns this exact message into a 401 response
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Internal(String),
}

/// Resource path of a `methodArn`.
///
/// `arn:aws:execute-api:{region}:{account}:{api}/{stage}/{method}/{path}`
/// yields `/{path}`; an ARN without a resource part yields `/`.
pub fn resource_path(method_arn: &str) -> String {
    let resource = method_arn.splitn(6, ':').nth(5).unwrap_or_default();
    match resource.splitn(4, '/').nth(3) {
        Some(path) => format!("/{path}"),
        None => "/".to_string(),
    }
}

/// Authorize one gateway request
pub async fn handle<S: SecretStore>(
    authorizer: &Authorizer<S>,
    request: AuthorizerRequest,
) -> Result<AuthorizerResponse, AuthorizerError> {
    let Some(token) = request.authorization().and_then(extract_bearer_token) else {
        tracing::info!(method_arn = %request.method_arn, "Request has no bearer token");
        return Err(AuthorizerError::Unauthorized);
    };
    let path = request.resource_path();

    let (claims, decision) = match authorizer.authorize_with_claims(token, &path).await {
        Ok(result) => result,
        Err(e) if e.is_unauthorized() => {
            tracing::info!(%path, reason = %e, "Token rejected");
            return Err(AuthorizerError::Unauthorized);
        }
        Err(e) => {
            tracing::error!(%path, error = %e, "Authorization failed");
            return Err(AuthorizerError::Internal(e.to_string()));
        }
    };

    let principal_id = decision.principal_id().unwrap_or(ANONYMOUS_PRINCIPAL);
    let effect = match &decision {
        Decision::Allow { .. } => Effect::Allow,
        Decision::Deny { .. } => Effect::Deny,
    };

    let mut response = AuthorizerResponse::policy(principal_id, effect, &request.method_arn);
    if effect == Effect::Allow {
        if let Some(sub) = &claims.subject {
            response.context.insert("sub".to_string(), sub.clone());
        }
        response
            .context
            .insert("groups".to_string(), claims.groups_joined());
    }
    Ok(response)
}
