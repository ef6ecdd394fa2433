// src/services/advisory_service.rs
//
// Insights e planos de meta gerados pelo Gemini.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{db_utils::found, error::AppError},
    db::{GoalRepository, InsightRepository, ProductRepository, SupplierRepository},
    external::GeminiClient,
    models::{
        dashboard::{MetricsSummary, MonthlyRevenue, ProductUnits},
        goal::{Goal, GoalPlanDraft},
        insight::{Insight, InsightBatch},
        product::Product,
    },
    services::{
        dashboard_service::{DashboardService, Ledger},
        metrics::{self, DateRange},
    },
};

const PERSONA: &str = "Você é um consultor especializado em negócios de calçados.";

#[derive(Clone)]
pub struct AdvisoryService {
    gemini: Option<GeminiClient>,
    dashboard: DashboardService,
    insight_repo: InsightRepository,
    goal_repo: GoalRepository,
    product_repo: ProductRepository,
    supplier_repo: SupplierRepository,
    pool: PgPool,
}

/// Resumo do negócio que vai dentro dos prompts.
#[derive(Debug, Clone)]
pub struct BusinessDigest {
    pub summary: MetricsSummary,
    pub revenue_by_month: Vec<MonthlyRevenue>,
    pub units_by_product: Vec<ProductUnits>,
    pub costs_by_category: BTreeMap<String, Decimal>,
    pub revenue_by_supplier: BTreeMap<String, Decimal>,
    pub supplier_count: i64,
    pub product_count: usize,
    pub products_in_stock: usize,
    pub products_out_of_stock: usize,
}

impl BusinessDigest {
    pub fn build(ledger: &Ledger, products: &[Product], supplier_count: i64) -> Self {
        let all = DateRange::default();
        let in_stock = products.iter().filter(|p| p.stock > 0).count();

        Self {
            summary: metrics::summarize(&ledger.sales, &ledger.costs, &all),
            revenue_by_month: metrics::revenue_by_month(&ledger.sales, &all),
            units_by_product: metrics::units_by_product(&ledger.sales, &all),
            costs_by_category: metrics::costs_by_category(&ledger.costs, &all)
                .into_iter()
                .map(|share| (share.category.label().to_string(), share.amount))
                .collect(),
            revenue_by_supplier: metrics::revenue_by_supplier(&ledger.sales, &all),
            supplier_count,
            product_count: products.len(),
            products_in_stock: in_stock,
            products_out_of_stock: products.len() - in_stock,
        }
    }

    fn monthly_json(&self) -> String {
        let map: BTreeMap<&str, Decimal> = self
            .revenue_by_month
            .iter()
            .map(|m| (m.month.as_str(), m.revenue))
            .collect();
        to_json(&map)
    }

    fn products_json(&self) -> String {
        let map: BTreeMap<&str, i64> = self
            .units_by_product
            .iter()
            .map(|p| (p.product.as_str(), p.units))
            .collect();
        to_json(&map)
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
}

pub fn insights_prompt(digest: &BusinessDigest) -> String {
    let s = &digest.summary;
    format!(
        r#"{PERSONA} Analise os dados fornecidos e gere insights práticos e acionáveis.

DADOS DO NEGÓCIO:
- Total de Vendas: {sales}
- Receita Bruta: R$ {revenue:.2}
- Custos Operacionais: R$ {costs:.2}
- Lucro Líquido: R$ {profit:.2}
- Número de Fornecedores: {suppliers}
- Vendas por Mês: {monthly}
- Produtos Mais Vendidos: {products}
- Custos por Categoria: {categories}
- Receita por Fornecedor: {by_supplier}

Gere 5-6 insights específicos, práticos e acionáveis para melhorar o negócio. Para cada insight, forneça:
- titulo: Título curto e direto
- descricao: Descrição detalhada do insight
- categoria: vendas/custos/produtos/fornecedores/geral
- prioridade: alta/media/baixa
- acao: Ação específica a ser tomada

Responda APENAS com um JSON válido no seguinte formato:
{{
  "insights": [
    {{
      "titulo": "Aumentar Margem de Lucro",
      "descricao": "Sua margem de lucro está baixa. Foque em produtos premium e negocie melhores preços com fornecedores.",
      "categoria": "vendas",
      "prioridade": "alta",
      "acao": "Implementar estratégia de upselling e negociar descontos por volume com fornecedores"
    }}
  ]
}}"#,
        sales = s.sales_count,
        revenue = s.gross_revenue,
        costs = s.operating_costs,
        profit = s.net_profit,
        suppliers = digest.supplier_count,
        monthly = digest.monthly_json(),
        products = digest.products_json(),
        categories = to_json(&digest.costs_by_category),
        by_supplier = to_json(&digest.revenue_by_supplier),
    )
}

pub fn goal_plan_prompt(goal: &Goal, digest: &BusinessDigest, today: NaiveDate) -> String {
    let s = &digest.summary;
    let days_left = (goal.end_date - today).num_days().max(0);
    format!(
        r#"{PERSONA} Analise os dados fornecidos e crie um plano estratégico detalhado para atingir a meta.

DADOS DO NEGÓCIO:
- Meta: {title} ({kind})
- Valor Alvo: R$ {target:.2}
- Valor Atual: R$ {current:.2}
- Dias Restantes: {days_left} dias

VENDAS:
- Total de Vendas: {sales}
- Receita Total: R$ {revenue:.2}
- Vendas por Mês: {monthly}
- Produtos Mais Vendidos: {products}

CUSTOS:
- Total de Custos: {cost_count}
- Valor Total: R$ {costs:.2}
- Por Categoria: {categories}

FORNECEDORES:
- Total: {suppliers}
- Performance: {by_supplier}

PRODUTOS:
- Total: {product_count}
- Com Estoque: {in_stock}
- Sem Estoque: {out_of_stock}

Crie um plano estratégico detalhado com:

1. ESTRATÉGIAS (mínimo 5, máximo 8):
   - Para cada estratégia: categoria (marketing/vendas/produtos/fornecedores/custos/operacional), título, descrição, prioridade (alta/media/baixa), prazo, impacto (alto/medio/baixo)

2. CRONOGRAMA (4 semanas):
   - Para cada semana: atividades específicas, metas semanais, observações

3. MÉTRICAS (mínimo 3, máximo 5):
   - Para cada métrica: nome, valor atual, valor meta, unidade, frequência (diaria/semanal/mensal)

4. OBSERVAÇÕES GERAIS:
   - Insights importantes e recomendações adicionais

Responda APENAS com um JSON válido no seguinte formato:
{{
  "estrategias": [
    {{
      "categoria": "marketing",
      "titulo": "Campanha Digital",
      "descricao": "Implementar campanhas no Instagram e Facebook focadas em produtos premium",
      "prioridade": "alta",
      "prazo": "2 semanas",
      "impacto": "alto"
    }}
  ],
  "cronograma": [
    {{
      "semana": 1,
      "atividades": ["Lançar campanha digital", "Otimizar estoque"],
      "metas": ["Aumentar vendas em 15%", "Reduzir custos em 5%"],
      "observacoes": "Foco em produtos com maior margem"
    }}
  ],
  "metricas": [
    {{
      "nome": "Vendas Diárias",
      "valorAtual": 0,
      "valorMeta": 5,
      "unidade": "vendas",
      "frequencia": "diaria"
    }}
  ],
  "observacoes": "Foque em produtos com maior margem de lucro e otimize o mix de produtos."
}}"#,
        title = goal.title,
        kind = goal.kind.label(),
        target = goal.target_value,
        current = goal.current_value,
        sales = s.sales_count,
        revenue = s.gross_revenue,
        monthly = digest.monthly_json(),
        products = digest.products_json(),
        cost_count = s.cost_count,
        costs = s.operating_costs,
        categories = to_json(&digest.costs_by_category),
        suppliers = digest.supplier_count,
        by_supplier = to_json(&digest.revenue_by_supplier),
        product_count = digest.product_count,
        in_stock = digest.products_in_stock,
        out_of_stock = digest.products_out_of_stock,
    )
}

impl AdvisoryService {
    pub fn new(
        gemini: Option<GeminiClient>,
        dashboard: DashboardService,
        insight_repo: InsightRepository,
        goal_repo: GoalRepository,
        product_repo: ProductRepository,
        supplier_repo: SupplierRepository,
        pool: PgPool,
    ) -> Self {
        Self { gemini, dashboard, insight_repo, goal_repo, product_repo, supplier_repo, pool }
    }

    /// Sem chave configurada a IA fica desligada; o resto do sistema segue normal.
    fn client(&self) -> Result<&GeminiClient, AppError> {
        self.gemini
            .as_ref()
            .ok_or_else(|| AppError::AiUnavailable("GEMINI_API_KEY não configurada".into()))
    }

    async fn digest(&self) -> Result<BusinessDigest, AppError> {
        let ledger = self.dashboard.load_ledger().await?;
        let products = self.product_repo.list(None).await?;
        let supplier_count = self.supplier_repo.count().await?;
        Ok(BusinessDigest::build(&ledger, &products, supplier_count))
    }

    // --- INSIGHTS ---

    pub async fn list_insights(&self, active_only: bool) -> Result<Vec<Insight>, AppError> {
        self.insight_repo.list(active_only).await
    }

    pub async fn set_insight_active(&self, id: Uuid, active: bool) -> Result<Insight, AppError> {
        found(self.insight_repo.set_active(&self.pool, id, active).await?, "Insight")
    }

    pub async fn delete_insight(&self, id: Uuid) -> Result<(), AppError> {
        if !self.insight_repo.delete(&self.pool, id).await? {
            return Err(AppError::ResourceNotFound("Insight".into()));
        }
        Ok(())
    }

    /// Gera um novo lote: desativa os antigos e grava os novos na mesma transação.
    pub async fn generate_insights(&self) -> Result<Vec<Insight>, AppError> {
        let client = self.client()?;
        tracing::info!("🤖 Gerando insights com {}", client.model());

        let digest = self.digest().await?;
        let batch: InsightBatch = client.generate_json(&insights_prompt(&digest)).await?;

        let mut tx = self.pool.begin().await?;
        let deactivated = self.insight_repo.deactivate_all(&mut *tx).await?;

        let mut created = Vec::with_capacity(batch.insights.len());
        for draft in &batch.insights {
            created.push(self.insight_repo.insert(&mut *tx, draft).await?);
        }
        tx.commit().await?;

        tracing::info!("✅ {} insights gerados ({} desativados)", created.len(), deactivated);
        Ok(created)
    }

    // --- PLANO DE META ---

    pub async fn generate_goal_plan(&self, goal_id: Uuid) -> Result<Goal, AppError> {
        let client = self.client()?;

        let goal = found(self.goal_repo.find_by_id(goal_id).await?, "Meta")?;
        tracing::info!("🤖 Gerando plano para a meta '{}'", goal.title);

        let digest = self.digest().await?;
        let prompt = goal_plan_prompt(&goal, &digest, self.dashboard.clock().today());
        let draft: GoalPlanDraft = client.generate_json(&prompt).await?;
        let plan = draft.into_plan(Utc::now());

        let updated = found(self.goal_repo.save_plan(&self.pool, goal_id, &plan).await?, "Meta")?;
        tracing::info!("✅ Plano salvo: {} estratégias", plan.strategies.len());
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::clock::BusinessClock,
        db::{CostRepository, SaleRepository},
    };
    use sqlx::postgres::PgPoolOptions;

    fn digest() -> BusinessDigest {
        BusinessDigest {
            summary: MetricsSummary {
                gross_revenue: Decimal::new(15000, 2),
                operating_costs: Decimal::new(3000, 2),
                net_profit: Decimal::new(12000, 2),
                sales_count: 2,
                cost_count: 1,
            },
            revenue_by_month: vec![MonthlyRevenue { month: "2025-01".into(), revenue: Decimal::new(150, 0) }],
            units_by_product: vec![ProductUnits { product: "Tênis".into(), units: 3 }],
            costs_by_category: BTreeMap::from([("marketing".to_string(), Decimal::new(30, 0))]),
            revenue_by_supplier: BTreeMap::new(),
            supplier_count: 4,
            product_count: 10,
            products_in_stock: 7,
            products_out_of_stock: 3,
        }
    }

    #[test]
    fn insights_prompt_carries_the_numbers() {
        let prompt = insights_prompt(&digest());
        assert!(prompt.starts_with(PERSONA));
        assert!(prompt.contains("Receita Bruta: R$ 150.00"));
        assert!(prompt.contains("Lucro Líquido: R$ 120.00"));
        assert!(prompt.contains("\"2025-01\""));
        assert!(prompt.contains("\"insights\": ["));
    }

    #[tokio::test]
    async fn missing_key_fails_before_touching_the_database() {
        // Pool preguiçoso: nenhuma conexão é aberta se a chave faltar
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/inexistente")
            .unwrap();
        let service = AdvisoryService::new(
            None,
            DashboardService::new(
                SaleRepository::new(pool.clone()),
                CostRepository::new(pool.clone()),
                GoalRepository::new(pool.clone()),
                BusinessClock::default(),
            ),
            InsightRepository::new(pool.clone()),
            GoalRepository::new(pool.clone()),
            ProductRepository::new(pool.clone()),
            SupplierRepository::new(pool.clone()),
            pool,
        );

        assert!(matches!(service.generate_insights().await, Err(AppError::AiUnavailable(_))));
        assert!(matches!(
            service.generate_goal_plan(Uuid::new_v4()).await,
            Err(AppError::AiUnavailable(_))
        ));
    }
}
