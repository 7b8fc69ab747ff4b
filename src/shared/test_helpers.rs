use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::Request, middleware::Next, response::Response, Router};

pub fn create_user_with_roles(email: &str, roles: &[&str]) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: format!("test-sub-{}", email),
        email: Some(email.to_string()),
        roles: roles.iter().map(|r| r.to_string()).collect(),
    }
}

/// Inject a user carrying `roles` into every request, standing in for the
/// bearer token middleware.
pub fn with_roles(router: Router, email: &str, roles: &[&str]) -> Router {
    let user = create_user_with_roles(email, roles);
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                let response: Response = next.run(request).await;
                response
            }
        },
    ))
}
