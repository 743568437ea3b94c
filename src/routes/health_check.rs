use actix_web::HttpResponse;

/******************************************/
// Health check route
/******************************************/
/**
 * @route   GET /health_check
 * @access  Public
 */
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}
