use crate::{api::leave, config::Config};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    cfg.service(
        web::scope(&config.api_prefix).service(
            web::scope("/cuti")
                // /cuti
                .service(
                    web::resource("")
                        .route(web::post().to(leave::apply_leave))
                        .route(web::get().to(leave::list_leaves)),
                )
                // /cuti/{key}: GET keys by employee email, PATCH/DELETE by
                // record id, so all three share one path segment.
                .service(
                    web::resource("/{key}")
                        .route(web::get().to(leave::list_for_employee))
                        .route(web::patch().to(leave::update_leave))
                        .route(web::delete().to(leave::delete_leave)),
                ),
        ),
    );
}
