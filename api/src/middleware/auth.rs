//! Session gate middleware for protecting API endpoints.
//!
//! Every protected request passes through here: the bearer access token is
//! verified (signature, expiry, kind) and the user must still have a live
//! session. A revoked session set rejects a request even while the access
//! token's own TTL has not elapsed, which is how server-side logout and
//! reuse-triggered cascade revocation take effect immediately. Costs one
//! store lookup per request.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use uuid::Uuid;

use pw_core::services::token::SessionAuthenticator;

use crate::handlers::error::ApiError;

/// Authenticated subject identity injected into requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// User ID the gate resolved for this request
    pub user_id: Uuid,
}

/// Session gate middleware factory
pub struct SessionGate;

impl SessionGate {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SessionGate {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionGateMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Session gate middleware service
pub struct SessionGateMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SessionGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let token = match extract_bearer_token(&req) {
                Some(token) => token,
                None => return Err(ApiError::Unauthorized.into()),
            };

            let authenticator = match req
                .app_data::<web::Data<Arc<dyn SessionAuthenticator>>>()
            {
                Some(authenticator) => Arc::clone(authenticator),
                None => {
                    log::error!("session gate invoked without an authenticator in app data");
                    return Err(ApiError::Internal.into());
                }
            };

            match authenticator.authenticate(&token).await {
                Ok(user_id) => {
                    req.extensions_mut().insert(AuthContext { user_id });
                    service.call(req).await
                }
                Err(e) if e.is_transient() => {
                    log::error!("session gate store failure: {e}");
                    Err(ApiError::Unavailable.into())
                }
                Err(e) => {
                    log::warn!("session gate rejected request: {e}");
                    Err(ApiError::Unauthorized.into())
                }
            }
        })
    }
}

/// Extracts the bearer token from the Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.to_string())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| Error::from(ApiError::Unauthorized));

        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        use actix_web::test;

        let req = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer test_token_123"))
            .to_srv_request();

        assert_eq!(extract_bearer_token(&req), Some("test_token_123".to_string()));

        let req_no_bearer = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "test_token_123"))
            .to_srv_request();

        assert_eq!(extract_bearer_token(&req_no_bearer), None);

        let req_no_header = test::TestRequest::default().to_srv_request();
        assert_eq!(extract_bearer_token(&req_no_header), None);
    }
}
