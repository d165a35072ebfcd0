//! Lets HTML forms, which can only GET or POST, reach PUT, PATCH and DELETE
//! handlers through a `_method` parameter, given either in the query string
//! or as a field of an `application/x-www-form-urlencoded` body.

use std::collections::HashMap;
use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

pub const METHOD_PARAM: &str = "_method";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// The override named by `_method` in an urlencoded string, if any.
/// Only PUT, PATCH and DELETE are honored.
pub fn requested_method(urlencoded: &str) -> Option<Method> {
    let params = web::Query::<HashMap<String, String>>::from_query(urlencoded).ok()?;
    match params.get(METHOD_PARAM)?.to_ascii_uppercase().as_str() {
        "PUT" => Some(Method::PUT),
        "PATCH" => Some(Method::PATCH),
        "DELETE" => Some(Method::DELETE),
        _ => None,
    }
}

/// Rewrites a POST carrying `_method=PUT|PATCH|DELETE` to that method.
///
/// The query string wins over the body. A form body is read to find the
/// field and then put back, so handlers still see the full payload.
/// Must wrap the whole `App` so it runs before routing.
pub struct MethodOverride;

impl<S, B> Transform<S, ServiceRequest> for MethodOverride
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = MethodOverrideService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MethodOverrideService {
            service: Rc::new(service),
        }))
    }
}

pub struct MethodOverrideService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for MethodOverrideService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            if req.method() == Method::POST {
                let mut target = requested_method(req.query_string());

                if target.is_none() && req.content_type() == FORM_CONTENT_TYPE {
                    let body = req.extract::<web::Bytes>().await?;
                    target = std::str::from_utf8(&body).ok().and_then(requested_method);
                    req.set_payload(bytes_to_payload(body));
                }

                if let Some(method) = target {
                    log::debug!("{} overridden to {}", req.path(), method);
                    req.head_mut().method = method;
                }
            }
            service.call(req).await
        })
    }
}

fn bytes_to_payload(body: web::Bytes) -> Payload {
    let (_, mut payload) = actix_http::h1::Payload::create(true);
    payload.unread_data(body);
    Payload::from(payload)
}
