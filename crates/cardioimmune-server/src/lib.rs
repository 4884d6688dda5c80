//! HTTP dashboard for the CardioImmune Atlas.
//!
//! Serves the browser page (two dependent dropdowns, a description panel and
//! an SVG box plot) plus a small JSON API over the same catalog and
//! expression table. All state is built once at startup and shared
//! read-only between requests.

pub mod page;
pub mod svg;

use std::io;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, Json},
    routing::get,
};
use serde::{Deserialize, Serialize};

use cardioimmune_core::{Catalog, CellTypeEntry, Dashboard, ExpressionRow, ExpressionTable, Figure};

/// Shared server state.
pub struct AppState {
    catalog: Catalog,
    table: Arc<ExpressionTable>,
}

impl AppState {
    pub fn new(catalog: Catalog, table: ExpressionTable) -> Self {
        Self {
            catalog,
            table: Arc::new(table),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    cell: Option<String>,
    gene: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GeneParams {
    gene: Option<String>,
}

#[derive(Debug, Serialize)]
struct CellTypesResponse {
    cell_types: Vec<&'static CellTypeEntry>,
    total: usize,
}

#[derive(Debug, Serialize)]
struct CellTypeResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    cell_type: Option<&'static CellTypeEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct ExpressionResponse {
    gene: String,
    source: String,
    simulated: bool,
    length: usize,
    rows: Vec<ExpressionRow>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    cell_types: usize,
    genes: usize,
    rows: usize,
    source: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

async fn handle_page(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> Html<String> {
    let dash = Dashboard::with_selection(
        state.catalog,
        Arc::clone(&state.table),
        params.cell.as_deref(),
        params.gene.as_deref(),
    );
    log::debug!(
        "page cell={:?} gene={:?}",
        dash.selected_cell_type(),
        dash.selected_gene()
    );
    Html(page::render(
        &dash.view(),
        state.table.source(),
        state.table.is_simulated(),
    ))
}

async fn handle_cell_types(State(state): State<Arc<AppState>>) -> Json<CellTypesResponse> {
    let cell_types: Vec<&'static CellTypeEntry> = state.catalog.entries().iter().collect();
    let total = cell_types.len();
    Json(CellTypesResponse { cell_types, total })
}

async fn handle_cell_type(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> (StatusCode, Json<CellTypeResponse>) {
    match state.catalog.get(&name) {
        Ok(entry) => (
            StatusCode::OK,
            Json(CellTypeResponse {
                success: true,
                cell_type: Some(entry),
                error: None,
            }),
        ),
        Err(e) => (
            StatusCode::NOT_FOUND,
            Json(CellTypeResponse {
                success: false,
                cell_type: None,
                error: Some(format!("{e}. Use /api/v1/cell-types to list available cell types.")),
            }),
        ),
    }
}

async fn handle_expression(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GeneParams>,
) -> Json<ExpressionResponse> {
    let gene = params.gene.unwrap_or_default();
    let rows: Vec<ExpressionRow> = state.table.for_gene(&gene).cloned().collect();
    Json(ExpressionResponse {
        source: state.table.source().to_string(),
        simulated: state.table.is_simulated(),
        length: rows.len(),
        rows,
        gene,
    })
}

async fn handle_figure(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GeneParams>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorResponse>)> {
    let Some(gene) = params.gene.filter(|g| !g.is_empty()) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                success: false,
                error: "missing query parameter: gene".to_string(),
            }),
        ));
    };
    Ok(Json(Figure::for_gene(&state.table, &gene).to_plotly()))
}

async fn handle_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: if state.table.is_empty() {
            "degraded".to_string()
        } else {
            "healthy".to_string()
        },
        cell_types: state.catalog.len(),
        genes: state.catalog.genes().len(),
        rows: state.table.len(),
        source: state.table.source().to_string(),
    })
}

async fn handle_index(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let first = state.catalog.entries().first();
    let gene = first.and_then(|e| e.default_gene()).unwrap_or("CD68");
    Json(serde_json::json!({
        "name": "CardioImmune Atlas",
        "version": cardioimmune_core::VERSION,
        "source": state.table.source(),
        "simulated": state.table.is_simulated(),
        "endpoints": {
            "/": "Interactive dashboard page (params: cell, gene)",
            "/api": "This API index",
            "/api/v1/cell-types": "List every cell type with marker genes and description",
            "/api/v1/cell-types/{name}": "One cell type by exact name",
            "/api/v1/expression": {
                "method": "GET",
                "description": "Expression rows for one gene",
                "params": { "gene": "Gene symbol (unknown genes return zero rows)" },
            },
            "/api/v1/figure": {
                "method": "GET",
                "description": "Plotly figure JSON for one gene",
                "params": { "gene": "Gene symbol (required)" },
            },
            "/health": "Health check",
        },
        "examples": {
            "cell_type": format!("/api/v1/cell-types/{}", first.map_or("Macrophages", |e| e.name)),
            "expression": format!("/api/v1/expression?gene={gene}"),
            "figure": format!("/api/v1/figure?gene={gene}"),
        }
    }))
}

/// Build the axum router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_page))
        .route("/api", get(handle_index))
        .route("/api/v1/cell-types", get(handle_cell_types))
        .route("/api/v1/cell-types/{name}", get(handle_cell_type))
        .route("/api/v1/expression", get(handle_expression))
        .route("/api/v1/figure", get(handle_figure))
        .route("/health", get(handle_health))
        .with_state(Arc::new(state))
}

/// Run the HTTP dashboard until Ctrl-C.
pub async fn run_server(state: AppState, host: &str, port: u16) -> io::Result<()> {
    let app = build_router(state);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::warn!("failed to listen for ctrl-c: {e}");
            }
            log::info!("shutting down");
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body, body::Body, http::Request};
    use cardioimmune_core::load_expression_data;
    use tower::ServiceExt;

    fn state() -> Arc<AppState> {
        Arc::new(AppState::new(Catalog::builtin(), load_expression_data()))
    }

    #[tokio::test]
    async fn lists_all_cell_types() {
        let Json(resp) = handle_cell_types(State(state())).await;
        assert_eq!(resp.total, 9);
        assert_eq!(resp.cell_types[0].name, "Macrophages");
    }

    #[tokio::test]
    async fn known_cell_type_is_found() {
        let (status, Json(resp)) =
            handle_cell_type(State(state()), Path("Monocytes".to_string())).await;
        assert_eq!(status, StatusCode::OK);
        assert!(resp.success);
        assert_eq!(resp.cell_type.unwrap().genes, &["CD14", "FCN1", "LYZ"]);
    }

    #[tokio::test]
    async fn unknown_cell_type_is_404() {
        let (status, Json(resp)) =
            handle_cell_type(State(state()), Path("Platelets".to_string())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(!resp.success);
        assert!(resp.error.unwrap().contains("Platelets"));
    }

    #[tokio::test]
    async fn expression_rows_for_gene() {
        let params = GeneParams {
            gene: Some("CD68".to_string()),
        };
        let Json(resp) = handle_expression(State(state()), Query(params)).await;
        assert_eq!(resp.length, 100);
        assert!(resp.simulated);
        assert!(resp.rows.iter().all(|r| r.gene == "CD68"));
    }

    #[tokio::test]
    async fn expression_for_unknown_gene_is_empty() {
        let params = GeneParams {
            gene: Some("NOPE".to_string()),
        };
        let Json(resp) = handle_expression(State(state()), Query(params)).await;
        assert_eq!(resp.length, 0);
        assert!(resp.rows.is_empty());
    }

    #[tokio::test]
    async fn figure_has_two_box_traces() {
        let params = GeneParams {
            gene: Some("CD68".to_string()),
        };
        let Json(fig) = handle_figure(State(state()), Query(params)).await.unwrap();
        let data = fig["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["name"], "Heart_Atrial");
        assert_eq!(data[1]["name"], "Heart_Ventricular");
    }

    #[tokio::test]
    async fn figure_without_gene_is_bad_request() {
        let err = handle_figure(State(state()), Query(GeneParams::default()))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
        assert!(!err.1.0.success);
    }

    #[tokio::test]
    async fn page_switches_gene_list_with_cell_type() {
        let params = PageParams {
            cell: Some("Monocytes".to_string()),
            gene: Some("CD68".to_string()),
        };
        let Html(html) = handle_page(State(state()), Query(params)).await;
        assert!(html.contains(r#"<option value="CD14" selected>"#));
        assert!(html.contains("CD14 Expression in Heart Tissues"));
    }

    #[tokio::test]
    async fn health_reports_table_size() {
        let Json(resp) = handle_health(State(state())).await;
        assert_eq!(resp.status, "healthy");
        assert_eq!(resp.cell_types, 9);
        assert_eq!(resp.genes, 28);
        assert_eq!(resp.rows, 2800);
    }

    #[tokio::test]
    async fn index_lists_endpoints() {
        let Json(index) = handle_index(State(state())).await;
        assert_eq!(index["name"], "CardioImmune Atlas");
        assert!(index["endpoints"]["/api/v1/figure"].is_object());
        assert_eq!(index["examples"]["figure"], "/api/v1/figure?gene=CD68");
    }

    async fn fetch(uri: &str) -> (StatusCode, String) {
        let app = build_router(AppState::new(Catalog::builtin(), load_expression_data()));
        let request = Request::get(uri).body(Body::empty()).expect("request");
        let response = app.oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, String::from_utf8(bytes.to_vec()).expect("utf-8"))
    }

    #[tokio::test]
    async fn router_serves_cell_type_by_path() {
        let (status, body) = fetch("/api/v1/cell-types/Monocytes").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).expect("json");
        assert_eq!(json["cell_type"]["genes"], serde_json::json!(["CD14", "FCN1", "LYZ"]));
    }

    #[tokio::test]
    async fn router_decodes_plus_in_cell_query() {
        let (status, html) = fetch("/?cell=CD4%2B+T+cells").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains(r#"<option value="CD4+ T cells" selected>"#));
        assert!(html.contains(r#"<option value="CD4" selected>"#));
    }

    #[tokio::test]
    async fn router_maps_missing_gene_and_unknown_routes() {
        let (status, body) = fetch("/api/v1/figure").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("missing query parameter"));

        let (status, _) = fetch("/api/v2/cell-types").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = fetch("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("healthy"));
    }
}
