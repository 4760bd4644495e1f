use super::Parlor;
use super::Turnstile;
use super::bridge;
use crate::Die;
use crate::ID;
use crate::Score;
use crate::records::Ledger;
use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use actix_web::middleware::Logger;
use actix_web::web;
use std::sync::Arc;

#[derive(serde::Deserialize)]
struct StartRequest {
    /// Roster bot to seat on the Red side; omit for human vs human.
    opponent: Option<String>,
    target: Score,
    #[serde(default)]
    clock: bool,
}

#[derive(serde::Deserialize)]
struct ReseedRequest {
    d1: Die,
    d2: Die,
}

#[derive(serde::Deserialize)]
struct EnterQuery {
    token: String,
}

pub struct Server;

impl Server {
    pub async fn run(bind: String) -> Result<(), std::io::Error> {
        let parlor = Parlor::new(Ledger::new(), Arc::new(Turnstile));
        Parlor::keep(parlor.clone());
        let state = web::Data::from(parlor);
        log::info!("hosting on {}", bind);
        HttpServer::new(move || {
            App::new()
                .wrap(Logger::new("%r %s %Ts"))
                .wrap(
                    Cors::default()
                        .allow_any_origin()
                        .allow_any_method()
                        .allow_any_header(),
                )
                .app_data(state.clone())
                .route("/start", web::post().to(start))
                .route("/enter/{session_id}", web::get().to(enter))
                .route("/sessions", web::get().to(sessions))
                .route("/sessions/{session_id}", web::get().to(inspect))
                .route("/evict/{session_id}", web::post().to(evict))
                .route("/reseed/{session_id}", web::post().to(reseed))
        })
        .workers(4)
        .bind(bind)?
        .run()
        .await
    }
}

async fn start(parlor: web::Data<Parlor>, body: web::Json<StartRequest>) -> impl Responder {
    match parlor
        .start(body.opponent.as_deref(), body.target.max(1), body.clock)
        .await
    {
        Ok(id) => HttpResponse::Ok().json(serde_json::json!({ "session_id": id })),
        Err(e) => HttpResponse::BadRequest().body(e.to_string()),
    }
}

async fn enter(
    parlor: web::Data<Parlor>,
    path: web::Path<uuid::Uuid>,
    query: web::Query<EnterQuery>,
    body: web::Payload,
    req: HttpRequest,
) -> impl Responder {
    let id = ID::from(path.into_inner());
    match actix_ws::handle(&req, body) {
        Ok((response, socket, stream)) => {
            match bridge(
                parlor.into_inner(),
                id,
                socket,
                stream,
                query.into_inner().token,
            )
            .await
            {
                Ok(()) => response.map_into_left_body(),
                Err(e) => HttpResponse::NotFound()
                    .body(e.to_string())
                    .map_into_right_body(),
            }
        }
        Err(e) => HttpResponse::InternalServerError()
            .body(e.to_string())
            .map_into_right_body(),
    }
}

async fn sessions(parlor: web::Data<Parlor>) -> impl Responder {
    HttpResponse::Ok().json(parlor.roster().await)
}

async fn inspect(parlor: web::Data<Parlor>, path: web::Path<uuid::Uuid>) -> impl Responder {
    let id = ID::from(path.into_inner());
    match parlor.inspect(id).await {
        Ok(snapshot) => HttpResponse::Ok().json(snapshot),
        Err(e) => HttpResponse::NotFound().body(e.to_string()),
    }
}

async fn evict(parlor: web::Data<Parlor>, path: web::Path<uuid::Uuid>) -> impl Responder {
    let id = ID::from(path.into_inner());
    match parlor.evict(id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "status": "evicted" })),
        Err(e) => HttpResponse::NotFound().body(e.to_string()),
    }
}

async fn reseed(
    parlor: web::Data<Parlor>,
    path: web::Path<uuid::Uuid>,
    body: web::Json<ReseedRequest>,
) -> impl Responder {
    let id = ID::from(path.into_inner());
    match parlor.reseed(id, body.d1, body.d2).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "status": "reseeded" })),
        Err(e) => HttpResponse::NotFound().body(e.to_string()),
    }
}
