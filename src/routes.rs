use crate::{
    api::{attendance, holiday, leave, users},
    auth::handlers,
    config::Config,
};
use actix_governor::{
    governor::middleware::NoOpMiddleware, Governor, GovernorConfigBuilder, PeerIpKeyExtractor,
};
use actix_web::web;
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/seed")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::seed_super_admin)),
            ),
    );

    // Protected routes; every handler extracts AuthUser itself.
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(protected_limiter)
            .service(
                web::scope("/users")
                    .service(web::resource("").route(web::post().to(users::create)))
                    .service(web::resource("/me").route(web::get().to(users::me)))
                    .service(web::resource("/team").route(web::get().to(users::team)))
                    .service(
                        web::resource("/{id}/deactivate")
                            .route(web::put().to(users::deactivate)),
                    )
                    .service(web::resource("/{id}/activate").route(web::put().to(users::activate))),
            )
            .service(
                web::scope("/attendance")
                    .service(
                        web::resource("")
                            .route(web::get().to(attendance::list_mine)),
                    )
                    .service(web::resource("/start").route(web::post().to(attendance::start)))
                    .service(web::resource("/end").route(web::post().to(attendance::end)))
                    .service(web::resource("/team").route(web::get().to(attendance::list_team))),
            )
            .service(
                web::scope("/leave")
                    .service(
                        web::resource("")
                            .route(web::get().to(leave::list_mine))
                            .route(web::post().to(leave::apply)),
                    )
                    .service(web::resource("/team").route(web::get().to(leave::list_team)))
                    .service(web::resource("/{id}/approve").route(web::put().to(leave::approve)))
                    .service(web::resource("/{id}/reject").route(web::put().to(leave::reject)))
                    .service(web::resource("/{id}/cancel").route(web::put().to(leave::cancel))),
            )
            .service(
                web::scope("/holiday")
                    .service(
                        web::resource("")
                            .route(web::post().to(holiday::add))
                            .route(web::get().to(holiday::list)),
                    )
                    .service(web::resource("/upcoming").route(web::get().to(holiday::upcoming))),
            ),
    );
}
