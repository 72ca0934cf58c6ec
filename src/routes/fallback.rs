use actix_web::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use actix_web::http::Method;
use actix_web::{HttpRequest, HttpResponse};

/// Everything that is not a contact submission or a health probe:
/// CORS preflight for `OPTIONS`, `404` otherwise.
pub async fn fallback(request: HttpRequest) -> HttpResponse {
    if request.method() == Method::OPTIONS {
        preflight()
    } else {
        HttpResponse::NotFound().body("Not found")
    }
}

fn preflight() -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .insert_header((ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"))
        .insert_header((ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"))
        .finish()
}
