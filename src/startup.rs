use std::net::TcpListener;

use actix_cors::Cors;
use actix_web::{
    dev::Server,
    middleware::Logger,
    web::{self, Data},
    App, HttpServer,
};
use sqlx::PgPool;

use crate::{
    configuration::ScraperSettings,
    routes::{default_route, lead_route},
    services::Droid,
};

pub fn run(
    listener: TcpListener,
    db_pool: PgPool,
    droid: Droid,
    scraper_settings: ScraperSettings,
) -> Result<Server, std::io::Error> {
    let db_pool = web::Data::new(db_pool);
    let droid = web::Data::new(droid);
    let scraper_settings = Data::new(scraper_settings);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .service(default_route::health_check)
            .service(web::scope("/api/leads").service(lead_route::generate))
            .app_data(db_pool.clone())
            .app_data(droid.clone())
            .app_data(scraper_settings.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
