//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use lazavii_financials::{
    config::{AppState, Settings},
    docs::ApiDoc,
    handlers,
    middleware::auth::auth_guard,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let settings = Settings::from_env()?;
    let app_state = AppState::new(&settings).await?;

    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas públicas
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Tudo abaixo exige token
    let user_routes = Router::new().route("/me", get(handlers::auth::get_me));

    let supplier_routes = Router::new()
        .route(
            "/",
            get(handlers::suppliers::list_suppliers).post(handlers::suppliers::create_supplier),
        )
        .route(
            "/{id}",
            get(handlers::suppliers::get_supplier)
                .put(handlers::suppliers::update_supplier)
                .delete(handlers::suppliers::delete_supplier),
        );

    let product_routes = Router::new()
        .route(
            "/",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route(
            "/{id}",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
        .route("/{id}/adjust", post(handlers::inventory::adjust_stock))
        .route("/{id}/purchase", post(handlers::inventory::purchase_stock));

    let sale_routes = Router::new()
        .route("/", get(handlers::sales::list_sales).post(handlers::sales::create_sale))
        .route("/{id}", get(handlers::sales::get_sale).put(handlers::sales::update_sale))
        .route("/{id}/confirm-payment", post(handlers::sales::confirm_payment))
        .route("/{id}/reversal", post(handlers::sales::create_reversal));

    let cost_routes = Router::new()
        .route("/", get(handlers::costs::list_costs).post(handlers::costs::create_cost))
        .route(
            "/{id}",
            get(handlers::costs::get_cost)
                .put(handlers::costs::update_cost)
                .delete(handlers::costs::delete_cost),
        );

    let goal_routes = Router::new()
        .route("/", get(handlers::goals::list_goals).post(handlers::goals::create_goal))
        .route(
            "/{id}",
            get(handlers::goals::get_goal)
                .put(handlers::goals::update_goal)
                .delete(handlers::goals::delete_goal),
        )
        .route("/{id}/plan", post(handlers::goals::generate_goal_plan));

    let insight_routes = Router::new()
        .route("/", get(handlers::insights::list_insights))
        .route("/generate", post(handlers::insights::generate_insights))
        .route(
            "/{id}",
            patch(handlers::insights::set_insight_active).delete(handlers::insights::delete_insight),
        );

    let protected = Router::new()
        .nest("/users", user_routes)
        .nest("/suppliers", supplier_routes)
        .nest("/products", product_routes)
        .nest("/sales", sale_routes)
        .route("/reversals", get(handlers::sales::list_reversals))
        .nest("/costs", cost_routes)
        .nest("/goals", goal_routes)
        .nest("/insights", insight_routes)
        .route("/dashboard", get(handlers::dashboard::get_dashboard))
        .route("/reports", get(handlers::dashboard::get_report))
        .route("/logs", get(handlers::logs::list_logs))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api", protected)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let listener = TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
