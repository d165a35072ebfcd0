use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::policy::SecurityPolicy;
use crate::auth::session::{SessionManager, SESSION_COOKIE};

/// Runs every request through the [`SecurityPolicy`] before it reaches a handler.
///
/// A valid session cookie is decoded and stored in the request extensions,
/// including on public paths. Rejections are rendered here, so handlers
/// behind this middleware only ever see permitted requests.
pub struct SecurityMiddleware {
    policy: Rc<SecurityPolicy>,
    sessions: SessionManager,
}

impl SecurityMiddleware {
    pub fn new(policy: SecurityPolicy, sessions: SessionManager) -> Self {
        Self {
            policy: Rc::new(policy),
            sessions,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SecurityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = SecurityMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecurityMiddlewareService {
            service,
            policy: Rc::clone(&self.policy),
            sessions: self.sessions.clone(),
        }))
    }
}

pub struct SecurityMiddlewareService<S> {
    service: S,
    policy: Rc<SecurityPolicy>,
    sessions: SessionManager,
}

impl<S, B> Service<ServiceRequest> for SecurityMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // An unreadable or expired cookie is the same as no cookie.
        let session = req
            .cookie(SESSION_COOKIE)
            .and_then(|cookie| match self.sessions.verify(cookie.value()) {
                Ok(claims) => Some(claims),
                Err(e) => {
                    log::debug!("ignoring session cookie: {}", e);
                    None
                }
            });

        // Match on the percent-decoded path the router sees, not the raw URI.
        let path = req.match_info().as_str().to_owned();
        match self.policy.evaluate(&path, session.as_ref()) {
            Ok(()) => {
                if let Some(claims) = session {
                    req.extensions_mut().insert(claims);
                }
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(app_err) => {
                log::debug!("{} {} rejected: {}", req.method(), path, app_err);
                let response = req.error_response(app_err).map_into_right_body();
                Box::pin(async move { Ok(response) })
            }
        }
    }
}
