use actix_web::web;

use crate::{
    entities::{resource::Editable, BlogPost, ContactMessage, Project, Skill},
    handlers::manage,
    ManagedResource,
};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    editable::<BlogPost>(cfg, "blog");
    editable::<Project>(cfg, "project");
    editable::<Skill>(cfg, "skill");
    read_only::<ContactMessage>(cfg);
}

/// List, table, form and detail pages. Literal segments are registered ahead of `{id}`.
fn editable<E: ManagedResource + Editable>(cfg: &mut web::ServiceConfig, segment: &str) {
    cfg.service(
        web::scope(E::KIND.list_route())
            .service(web::resource("").route(web::get().to(manage::list_page::<E>)))
            .service(web::resource("/table").route(web::post().to(manage::table_command::<E>)))
            .service(
                web::resource(format!("/create-{segment}"))
                    .route(web::get().to(manage::create_form::<E>))
                    .route(web::post().to(manage::create_submit::<E>)),
            )
            .service(
                web::resource(format!("/update-{segment}/{{id}}"))
                    .route(web::get().to(manage::update_form::<E>))
                    .route(web::post().to(manage::update_submit::<E>)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(manage::detail::<E>))
                    .route(web::delete().to(manage::delete_item::<E>)),
            ),
    );
}

fn read_only<E: ManagedResource>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(E::KIND.list_route())
            .service(web::resource("").route(web::get().to(manage::list_page::<E>)))
            .service(web::resource("/table").route(web::post().to(manage::table_command::<E>)))
            .service(web::resource("/{id}").route(web::delete().to(manage::delete_item::<E>))),
    );
}
