pub mod featured;
pub mod health;
pub mod stock;

use actix_web::{web, HttpResponse};
use crate::models::ErrorResponse;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(health::config)
            .configure(stock::config)
            .configure(featured::config)
    );
}

/// 未匹配的路由统一返回 JSON 404
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new("Not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};

    #[actix_web::test]
    async fn test_unknown_route_returns_json_404() {
        let app = test::init_service(
            App::new()
                .configure(config)
                .default_service(web::route().to(not_found)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/quotes/AAPL").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "Not found");
    }
}
