//! # Web Server
//!
//! Binary entry point for the Southern Trails booking platform. Wires the
//! service crates together, mounts the API routes and serves the static
//! frontend.

use std::sync::Arc;

use actix_files::Files;
use actix_web::{App, HttpResponse, HttpServer, middleware::Logger, web};

use auth_services::middleware::{ConsoleGate, RequireAuth};
use notification_services::{EmailSender, MockEmailSender, SesEmailSender};
use web_handlers as handlers;

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

async fn build_mailer() -> Arc<dyn EmailSender> {
    if std::env::var("EMAIL_PROVIDER").as_deref() == Ok("mock") {
        log::info!("EMAIL_PROVIDER=mock; e-mails will be logged, not sent");
        return Arc::new(MockEmailSender);
    }

    match SesEmailSender::new().await {
        Ok(sender) => Arc::new(sender),
        Err(e) => {
            log::warn!("Falling back to mock e-mail sender: {}", e);
            Arc::new(MockEmailSender)
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let pool = postgres::database::create_connection_pool()
        .await
        .expect("Failed to create database connection pool");

    postgres::database::test_connection(&pool)
        .await
        .expect("Failed to connect to the database");
    log::info!("Database connection established");

    let mailer = build_mailer().await;
    let mailer_data: web::Data<dyn EmailSender> = web::Data::from(mailer);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    log::info!("Starting server on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(ConsoleGate)
            .app_data(web::Data::new(pool.clone()))
            .app_data(mailer_data.clone())
            .route("/health", web::get().to(health))
            // Session endpoints.
            .service(
                web::scope("/api/auth")
                    .route("/login", web::post().to(handlers::login))
                    .route("/register", web::post().to(handlers::register))
                    .route("/logout", web::post().to(handlers::logout)),
            )
            // Public API.
            .route("/api/checkout", web::post().to(handlers::checkout))
            .route("/api/inquiries", web::post().to(handlers::create_inquiry))
            .route("/api/contact", web::post().to(handlers::submit_contact))
            .route("/api/packages", web::get().to(handlers::list_packages))
            .route(
                "/api/packages/featured",
                web::get().to(handlers::featured_packages),
            )
            .route(
                "/api/packages/{slug}",
                web::get().to(handlers::get_package),
            )
            .route("/api/reviews", web::get().to(handlers::list_reviews))
            // Customer API.
            .service(
                web::scope("/api/reviews")
                    .wrap(RequireAuth::customer())
                    .route("", web::post().to(handlers::submit_review)),
            )
            .service(
                web::scope("/api/customer")
                    .wrap(RequireAuth::customer())
                    .route("/my-data", web::get().to(handlers::my_data))
                    .route(
                        "/bookings/{id}",
                        web::get().to(handlers::customer_booking),
                    ),
            )
            // Admin registration stays public; it is gated by the OTP flow.
            .service(
                web::scope("/api/admin/register")
                    .route(
                        "/initiate",
                        web::post().to(handlers::initiate_admin_registration),
                    )
                    .route(
                        "/complete",
                        web::post().to(handlers::complete_admin_registration),
                    ),
            )
            // Staff console API.
            .service(
                web::scope("/api/admin")
                    .wrap(RequireAuth::staff())
                    .route("/bookings", web::get().to(handlers::list_bookings))
                    .route(
                        "/bookings/{id}",
                        web::patch().to(handlers::update_booking_status),
                    )
                    .route("/inquiries", web::get().to(handlers::list_inquiries))
                    .route(
                        "/inquiries/{id}",
                        web::patch().to(handlers::update_inquiry_status),
                    )
                    .route("/packages", web::get().to(handlers::admin_list_packages))
                    .route("/packages", web::post().to(handlers::create_package))
                    .route(
                        "/packages/{id}",
                        web::put().to(handlers::update_package),
                    )
                    .route(
                        "/packages/{id}",
                        web::delete().to(handlers::delete_package),
                    ),
            )
            // Scheduler entry point, guarded by CRON_SECRET when configured.
            .route(
                "/api/cron/reminders",
                web::get().to(handlers::run_reminder_sweep),
            )
            .service(Files::new("/", "./static").index_file("index.html"))
    })
    .bind(bind_addr)?
    .run()
    .await
}
