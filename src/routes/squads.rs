use actix_web::web;

use crate::handlers::squads;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/squad")
            .route("", web::get().to(squads::list_squads))
            .route("", web::post().to(squads::create_squad))
            .route("", web::put().to(squads::overwrite_squads))
            .route("/{id}", web::get().to(squads::get_squad))
            .route("/{id}", web::post().to(squads::post_squad_member)),
    );
}
