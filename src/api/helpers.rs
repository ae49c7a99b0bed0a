use poem::Request;

use crate::api::auth::BearerAuth;
use crate::coordinators::AuthCoordinator;
use crate::errors::InternalError;
use crate::types::internal::RequestContext;

/// Resolve the bearer token into a request context
///
/// The principal is loaded fresh from the database; the caller maps the
/// error into its own response type.
pub async fn request_context(
    req: &Request,
    auth: &BearerAuth,
    auth_coordinator: &AuthCoordinator,
) -> Result<RequestContext, InternalError> {
    let principal = auth_coordinator.authenticate(&auth.0.token).await?;
    let ctx = RequestContext::from_request(req, principal);

    tracing::debug!(
        request_id = %ctx.request_id,
        user_id = ctx.actor_id(),
        "Request authenticated"
    );
    Ok(ctx)
}
