// Every handler goes through RepositoryScope::run, which acquires the
// per-request repository and releases it on all exit paths.
use actix_web::{HttpResponse, Result, web};

use crate::database::models::{Squad, SquadId, SquadMember};
use crate::database::{RepositoryScope, SquadRepositoryFactory};
use crate::error::AppError;
use crate::handlers::shared::DateRangeQuery;

/// GET /squad
pub async fn list_squads(
    factory: web::Data<SquadRepositoryFactory>,
    query: web::Query<DateRangeQuery>,
) -> Result<HttpResponse> {
    let (begin, end) = query.bounds()?;

    let squads = RepositoryScope::run(factory.get_ref(), move |repository| {
        Box::pin(async move { repository.list_squads(begin, end).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(squads))
}

/// POST /squad
pub async fn create_squad(factory: web::Data<SquadRepositoryFactory>) -> Result<HttpResponse> {
    let squad_id = RepositoryScope::run(factory.get_ref(), |repository| {
        Box::pin(async move { repository.create_squad().await })
    })
    .await?;

    Ok(HttpResponse::Accepted().json(squad_id))
}

/// PUT /squad
pub async fn overwrite_squads(
    factory: web::Data<SquadRepositoryFactory>,
    body: web::Json<Vec<Squad>>,
) -> Result<HttpResponse> {
    let squads = body.into_inner();

    let squads = RepositoryScope::run(factory.get_ref(), move |repository| {
        Box::pin(async move { repository.overwrite_all(squads).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(squads))
}

/// GET /squad/{id}
pub async fn get_squad(
    factory: web::Data<SquadRepositoryFactory>,
    path: web::Path<String>,
    query: web::Query<DateRangeQuery>,
) -> Result<HttpResponse> {
    let (begin, end) = query.bounds()?;
    let id = path.into_inner();

    let squad = RepositoryScope::run(factory.get_ref(), move |repository| {
        Box::pin(async move { repository.get_squad(&id, begin, end).await })
    })
    .await?
    .ok_or_else(|| AppError::NotFound("Squad not found".to_string()))?;

    Ok(HttpResponse::Ok().json(squad))
}

/// POST /squad/{id}
pub async fn post_squad_member(
    factory: web::Data<SquadRepositoryFactory>,
    path: web::Path<String>,
    body: web::Json<SquadMember>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let squad_id: SquadId = id.parse().map_err(|_| AppError::squad_not_found(&id))?;
    let member = body.into_inner();

    let member_id = RepositoryScope::run(factory.get_ref(), move |repository| {
        Box::pin(async move {
            repository.upsert_member(&member, squad_id).await?;
            Ok(member.id)
        })
    })
    .await?;

    Ok(HttpResponse::Accepted().json(member_id))
}
