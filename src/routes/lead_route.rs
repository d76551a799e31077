use actix_web::{post, web, HttpResponse};
use sqlx::PgPool;

use crate::{
    configuration::ScraperSettings,
    domain::SearchQuery,
    services::{generate_leads, Droid},
};

#[post("/generate")]
async fn generate(
    body: web::Json<SearchQuery>,
    droid: web::Data<Droid>,
    pool: web::Data<PgPool>,
    scraper_settings: web::Data<ScraperSettings>,
) -> HttpResponse {
    let query = body.into_inner();
    let response = generate_leads(droid.get_ref(), pool.get_ref(), &scraper_settings, &query).await;

    HttpResponse::Ok().json(response)
}
