use actix_web::web::{self, Data};
use actix_web::{HttpResponse, Responder};
use serde_json::json;
use std::collections::HashMap;
use std::hash::BuildHasher;

use crate::caddy::CaddyService;
use crate::model::{CaddyRequest, LieType, PersonalizationUpdate};
use crate::view::advice::{render_advice_card, render_error, render_quick_advice};

#[derive(Debug, Clone, PartialEq)]
pub struct QuickRequest {
    pub distance: f64,
    pub lie_type: LieType,
    pub user_id: Option<String>,
    pub want_json: bool,
}

fn get_param_str<'a, S: BuildHasher>(query: &'a HashMap<String, String, S>, key: &str) -> &'a str {
    query.get(key).map_or("", |s| s.trim())
}

fn parse_flag<S: BuildHasher>(
    query: &HashMap<String, String, S>,
    key: &str,
    default: bool,
) -> bool {
    match get_param_str(query, key) {
        "1" => true,
        "0" => false,
        "" => default,
        other => other.parse().unwrap_or(default),
    }
}

/// # Errors
/// Returns a message naming the missing or malformed parameter.
pub fn parse_quick_request<S: BuildHasher>(
    query: &HashMap<String, String, S>,
) -> Result<QuickRequest, String> {
    let distance = get_param_str(query, "distance")
        .parse::<f64>()
        .map_err(|_| "distance parameter is required".to_string())?;
    let lie_type = match get_param_str(query, "lie") {
        "" => LieType::Fairway,
        other => other.parse()?,
    };
    let user_id = Some(get_param_str(query, "user"))
        .filter(|u| !u.is_empty())
        .map(str::to_string);
    Ok(QuickRequest {
        distance,
        lie_type,
        user_id,
        want_json: parse_flag(query, "json", true),
    })
}

pub async fn advice(
    query: web::Query<HashMap<String, String>>,
    request: web::Json<CaddyRequest>,
    service: Data<CaddyService>,
) -> impl Responder {
    let query = query.into_inner();
    let want_json = parse_flag(&query, "json", true);
    match service.get_advice(&request).await {
        Ok(response) => {
            if want_json {
                HttpResponse::Ok().json(response)
            } else {
                HttpResponse::Ok()
                    .content_type("text/html")
                    .body(render_advice_card(&response).into_string())
            }
        }
        Err(e) => {
            if want_json {
                HttpResponse::InternalServerError().json(e)
            } else {
                HttpResponse::InternalServerError()
                    .content_type("text/html")
                    .body(render_error(&e).into_string())
            }
        }
    }
}

pub async fn quick_advice(
    query: web::Query<HashMap<String, String>>,
    service: Data<CaddyService>,
) -> impl Responder {
    let query = query.into_inner();
    let request = match parse_quick_request(&query) {
        Ok(r) => r,
        Err(e) => return HttpResponse::BadRequest().json(json!({ "error": e })),
    };
    let advice = service
        .get_quick_advice(request.distance, request.lie_type, request.user_id.as_deref())
        .await;
    if request.want_json {
        HttpResponse::Ok().json(advice)
    } else {
        HttpResponse::Ok()
            .content_type("text/html")
            .body(render_quick_advice(&advice).into_string())
    }
}

pub async fn quota(
    query: web::Query<HashMap<String, String>>,
    service: Data<CaddyService>,
) -> impl Responder {
    let query = query.into_inner();
    let count = match get_param_str(&query, "count") {
        "" => 0,
        raw => match raw.parse::<u32>() {
            Ok(n) => n,
            Err(_) => {
                return HttpResponse::BadRequest()
                    .json(json!({ "error": "count must be a non-negative integer" }));
            }
        },
    };
    let is_plus = parse_flag(&query, "plus", false);
    HttpResponse::Ok().json(service.check_quota_status(count, is_plus))
}

pub async fn personalization(
    path: web::Path<String>,
    update: web::Json<PersonalizationUpdate>,
    service: Data<CaddyService>,
) -> impl Responder {
    let user_id = path.into_inner();
    match service
        .update_personalization(&user_id, update.into_inner())
        .await
    {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => HttpResponse::InternalServerError().json(e),
    }
}

pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Route table shared by the binary and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/advice", web::post().to(advice))
        .route("/advice/quick", web::get().to(quick_advice))
        .route("/quota", web::get().to(quota))
        .route("/personalization/{user_id}", web::post().to(personalization))
        .route("/health", web::get().to(health));
}
