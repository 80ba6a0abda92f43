//! CORS 中间件
//!
//! OPTIONS 预检请求直接应答，其余响应追加 Access-Control-Allow-Origin

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{
        header::{
            HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        Method,
    },
    Error, HttpResponse,
};
use futures::future::{ok, LocalBoxFuture, Ready};
use std::rc::Rc;

/// 预检允许的方法
pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
/// 预检允许的请求头
pub const ALLOWED_HEADERS: &str = "Content-Type";

/// CORS 中间件
pub struct CorsMiddleware {
    allow_origin: Rc<HeaderValue>,
}

impl CorsMiddleware {
    /// 非法的来源配置回退为 `*`
    pub fn new(allow_origin: &str) -> Self {
        let value = HeaderValue::from_str(allow_origin).unwrap_or_else(|_| {
            log::warn!("无效的 allow_origin 配置 {:?}，使用 *", allow_origin);
            HeaderValue::from_static("*")
        });

        Self {
            allow_origin: Rc::new(value),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for CorsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = CorsMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(CorsMiddlewareService {
            service: Rc::new(service),
            allow_origin: self.allow_origin.clone(),
        })
    }
}

pub struct CorsMiddlewareService<S> {
    service: Rc<S>,
    allow_origin: Rc<HeaderValue>,
}

impl<S, B> Service<ServiceRequest> for CorsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let allow_origin = self.allow_origin.clone();

        Box::pin(async move {
            // 预检请求不进入路由
            if req.method() == Method::OPTIONS {
                let response = HttpResponse::Ok()
                    .insert_header((ACCESS_CONTROL_ALLOW_ORIGIN, (*allow_origin).clone()))
                    .insert_header((ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS))
                    .insert_header((ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_HEADERS))
                    .finish();
                return Ok(req.into_response(response).map_into_right_body());
            }

            // 内层错误在此转成响应，错误响应同样需要来源头
            let http_req = req.request().clone();
            let mut res = match service.call(req).await {
                Ok(res) => res.map_into_left_body(),
                Err(err) => ServiceResponse::from_err(err, http_req).map_into_right_body(),
            };
            res.headers_mut()
                .insert(ACCESS_CONTROL_ALLOW_ORIGIN, (*allow_origin).clone());
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test as actix_test, web, App};

    async fn pong() -> HttpResponse {
        HttpResponse::Ok().body("pong")
    }

    #[actix_web::test]
    async fn test_preflight_is_answered() {
        let app = actix_test::init_service(
            App::new()
                .wrap(CorsMiddleware::new("*"))
                .route("/api/stock/{symbol}", web::get().to(pong)),
        )
        .await;

        let req = actix_test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/api/stock/AAPL")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let headers = resp.headers();
        assert_eq!(headers.get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
        assert_eq!(headers.get(ACCESS_CONTROL_ALLOW_METHODS).unwrap(), "GET, POST, OPTIONS");
        assert_eq!(headers.get(ACCESS_CONTROL_ALLOW_HEADERS).unwrap(), "Content-Type");
    }

    #[actix_web::test]
    async fn test_simple_request_gets_origin_header() {
        let app = actix_test::init_service(
            App::new()
                .wrap(CorsMiddleware::new("https://stocks.example.com"))
                .route("/ping", web::get().to(pong)),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/ping").to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://stocks.example.com"
        );
        assert!(resp.headers().get(ACCESS_CONTROL_ALLOW_METHODS).is_none());
    }

    #[actix_web::test]
    async fn test_inner_error_gets_origin_header() {
        let app = actix_test::init_service(
            App::new()
                .wrap_fn(|_req, _srv| {
                    futures::future::err::<ServiceResponse, Error>(
                        actix_web::error::ErrorServiceUnavailable("upstream down"),
                    )
                })
                .wrap(CorsMiddleware::new("*"))
                .route("/ping", web::get().to(pong)),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/ping").to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(resp.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
    }

    #[test]
    fn test_invalid_origin_falls_back_to_wildcard() {
        let cors = CorsMiddleware::new("bad\norigin");
        assert_eq!(*cors.allow_origin, "*");
    }
}
