// src/config.rs

use std::{env, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::clock::{self, BusinessClock},
    db::{
        CostRepository, GoalRepository, InsightRepository, LogRepository, ProductRepository,
        SaleRepository, SupplierRepository, UserRepository,
    },
    external::{gemini, GeminiClient},
    services::{
        advisory_service::AdvisoryService, auth::AuthService, catalog_service::CatalogService,
        dashboard_service::DashboardService, finance_service::FinanceService,
        goal_service::GoalService, inventory_service::InventoryService,
        sales_service::SalesService,
    },
};

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub server_addr: String,
    /// Fuso da loja, usado para datas de venda, filtros e "hoje".
    pub business_clock: BusinessClock,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let database_max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS inválido: {}", raw))?,
            Err(_) => 5,
        };

        let offset_hours = match env::var("BUSINESS_UTC_OFFSET_HOURS") {
            Ok(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("BUSINESS_UTC_OFFSET_HOURS inválido: {}", raw))?,
            Err(_) => clock::DEFAULT_UTC_OFFSET_HOURS,
        };
        let business_clock = BusinessClock::from_hours(offset_hours)
            .with_context(|| format!("BUSINESS_UTC_OFFSET_HOURS fora do intervalo: {}", offset_hours))?;

        Ok(Self {
            database_url,
            database_max_connections,
            jwt_secret,
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            business_clock,
            // Chave vazia conta como ausente
            gemini_api_key: env::var("GEMINI_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            gemini_model: env::var("GEMINI_MODEL").unwrap_or_else(|_| gemini::DEFAULT_MODEL.to_string()),
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| gemini::DEFAULT_BASE_URL.to_string()),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub catalog_service: CatalogService,
    pub inventory_service: InventoryService,
    pub sales_service: SalesService,
    pub finance_service: FinanceService,
    pub goal_service: GoalService,
    pub advisory_service: AdvisoryService,
    pub dashboard_service: DashboardService,
    pub log_repo: LogRepository,
}

impl AppState {
    pub async fn new(settings: &Settings) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(settings.database_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&settings.database_url)
            .await
            .context("Falha ao conectar no banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let gemini = match &settings.gemini_api_key {
            Some(key) => Some(
                GeminiClient::new(
                    key.clone(),
                    settings.gemini_model.clone(),
                    settings.gemini_base_url.clone(),
                )
                .map_err(|e| anyhow::anyhow!("Falha ao criar o cliente do Gemini: {}", e))?,
            ),
            None => {
                tracing::warn!("GEMINI_API_KEY ausente: insights e planos de IA desativados");
                None
            }
        };

        Ok(Self::from_parts(db_pool, settings.jwt_secret.clone(), settings.business_clock, gemini))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_parts(
        db_pool: PgPool,
        jwt_secret: String,
        clock: BusinessClock,
        gemini: Option<GeminiClient>,
    ) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let supplier_repo = SupplierRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let sale_repo = SaleRepository::new(db_pool.clone());
        let cost_repo = CostRepository::new(db_pool.clone());
        let goal_repo = GoalRepository::new(db_pool.clone());
        let insight_repo = InsightRepository::new(db_pool.clone());
        let log_repo = LogRepository::new(db_pool.clone());

        let dashboard_service =
            DashboardService::new(sale_repo.clone(), cost_repo.clone(), goal_repo.clone(), clock);

        Self {
            auth_service: AuthService::new(user_repo, jwt_secret, db_pool.clone()),
            catalog_service: CatalogService::new(
                supplier_repo.clone(),
                product_repo.clone(),
                db_pool.clone(),
            ),
            inventory_service: InventoryService::new(
                product_repo.clone(),
                log_repo.clone(),
                cost_repo.clone(),
                clock,
                db_pool.clone(),
            ),
            sales_service: SalesService::new(sale_repo, product_repo.clone(), db_pool.clone()),
            finance_service: FinanceService::new(cost_repo, supplier_repo.clone(), db_pool.clone()),
            goal_service: GoalService::new(goal_repo.clone(), db_pool.clone()),
            advisory_service: AdvisoryService::new(
                gemini,
                dashboard_service.clone(),
                insight_repo,
                goal_repo,
                product_repo,
                supplier_repo,
                db_pool.clone(),
            ),
            dashboard_service,
            log_repo,
            db_pool,
        }
    }
}
