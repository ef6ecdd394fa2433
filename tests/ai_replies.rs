// Respostas da IA: chaves em português, texto em volta e campos faltando.

use lazavii_financials::{
    common::error::AppError,
    external::gemini::parse_reply,
    models::{
        goal::{Frequency, GoalPlanDraft, Impact, StrategyCategory},
        insight::{InsightBatch, InsightCategory, Priority},
    },
};

#[test]
fn insight_batch_with_portuguese_keys_is_accepted() {
    let reply = r#"Aqui estão os insights:
```json
{
  "insights": [
    {
      "titulo": "Aumentar Margem de Lucro",
      "descricao": "A margem média está abaixo de 30%.",
      "categoria": "vendas",
      "prioridade": "alta",
      "acao": "Negociar descontos por volume com fornecedores"
    }
  ]
}
```"#;

    let batch: InsightBatch = parse_reply(reply).unwrap();
    assert_eq!(batch.insights.len(), 1);
    assert_eq!(batch.insights[0].category, InsightCategory::Sales);
    assert_eq!(batch.insights[0].priority, Priority::High);
    assert_eq!(batch.insights[0].title, "Aumentar Margem de Lucro");
}

#[test]
fn insight_without_action_is_an_ai_error() {
    let reply = r#"{"insights": [{"titulo": "X", "descricao": "Y", "categoria": "geral", "prioridade": "baixa"}]}"#;
    let err = parse_reply::<InsightBatch>(reply).unwrap_err();
    assert!(matches!(err, AppError::AiResponse(_)));
}

#[test]
fn empty_insight_list_is_an_ai_error() {
    let err = parse_reply::<InsightBatch>(r#"{"insights": []}"#).unwrap_err();
    assert!(matches!(err, AppError::AiResponse(_)));
}

#[test]
fn reply_without_json_is_an_ai_error() {
    let err = parse_reply::<InsightBatch>("Desculpe, não consegui analisar.").unwrap_err();
    assert!(matches!(err, AppError::AiResponse(_)));
}

const PLAN: &str = r#"{
  "estrategias": [
    {
      "categoria": "marketing",
      "titulo": "Campanha no Instagram",
      "descricao": "Posts diários com os lançamentos",
      "prioridade": "media",
      "prazo": "2 semanas",
      "impacto": "alto"
    }
  ],
  "cronograma": [
    {"semana": 1, "atividades": ["Fotografar coleção"], "metas": ["20 posts"], "observacoes": ""}
  ],
  "metricas": [
    {"nome": "Vendas semanais", "valorAtual": 12, "valorMeta": 20, "unidade": "pares", "frequencia": "semanal"}
  ],
  "observacoes": "Foco em tênis femininos"
}"#;

#[test]
fn goal_plan_with_portuguese_keys_is_accepted() {
    let draft: GoalPlanDraft = parse_reply(PLAN).unwrap();

    assert_eq!(draft.strategies[0].category, StrategyCategory::Marketing);
    assert_eq!(draft.strategies[0].impact, Impact::High);
    assert_eq!(draft.schedule[0].week, 1);
    assert_eq!(draft.metrics[0].frequency, Frequency::Weekly);
    assert_eq!(draft.metrics[0].target_value, 20.0);
    assert_eq!(draft.notes, "Foco em tênis femininos");
}

#[test]
fn goal_plan_with_week_out_of_range_is_an_ai_error() {
    let reply = PLAN.replace("\"semana\": 1", "\"semana\": 9");
    let err = parse_reply::<GoalPlanDraft>(&reply).unwrap_err();
    assert!(matches!(err, AppError::AiResponse(_)));
}

#[test]
fn goal_plan_missing_schedule_is_an_ai_error() {
    let reply = r#"{"estrategias": [], "metricas": [], "observacoes": ""}"#;
    let err = parse_reply::<GoalPlanDraft>(reply).unwrap_err();
    assert!(matches!(err, AppError::AiResponse(_)));
}
