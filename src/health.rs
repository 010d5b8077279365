use actix_web::{get, web, HttpResponse, Responder};
use deadpool_redis::Pool;
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Serialize)]
struct ReadinessResponse {
    status: &'static str,
    database: &'static str,
    redis: &'static str,
}

/// Liveness check
/// - No I/O
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse { status: "ok" })
}

async fn database_status(db: &DatabaseConnection) -> &'static str {
    let ping = Statement::from_string(db.get_database_backend(), "SELECT 1");
    match db.execute(ping).await {
        Ok(_) => "ok",
        Err(e) => {
            warn!(error = %e, "Database readiness check failed");
            "unhealthy"
        }
    }
}

async fn redis_status(pool: &Pool) -> &'static str {
    let mut conn = match pool.get().await {
        Ok(conn) => conn,
        Err(e) => {
            warn!(error = %e, "Redis pool unavailable");
            return "unhealthy";
        }
    };

    match deadpool_redis::redis::cmd("PING")
        .query_async::<String>(&mut *conn)
        .await
    {
        Ok(_) => "ok",
        Err(e) => {
            warn!(error = %e, "Redis readiness check failed");
            "unhealthy"
        }
    }
}

/// Readiness check
/// - Postgres answers `SELECT 1`
/// - Redis answers `PING`
#[get("/ready")]
pub async fn readiness(
    db: web::Data<Arc<DatabaseConnection>>,
    redis: web::Data<Arc<Pool>>,
) -> impl Responder {
    let database = database_status(db.get_ref()).await;
    let redis = redis_status(redis.get_ref()).await;

    if database == "ok" && redis == "ok" {
        HttpResponse::Ok().json(ReadinessResponse {
            status: "ok",
            database,
            redis,
        })
    } else {
        HttpResponse::ServiceUnavailable().json(ReadinessResponse {
            status: "unhealthy",
            database,
            redis,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[actix_web::test]
    async fn liveness_does_no_io() {
        let app = test::init_service(App::new().service(health)).await;
        let req = test::TestRequest::get().uri("/health").to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn database_status_reports_a_working_connection() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        assert_eq!(database_status(&db).await, "ok");
    }

    #[tokio::test]
    async fn database_status_reports_a_failing_connection() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        assert_eq!(database_status(&db).await, "unhealthy");
    }
}
