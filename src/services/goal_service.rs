// src/services/goal_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{db_utils::found, error::AppError},
    db::GoalRepository,
    models::goal::{Goal, GoalChanges, NewGoal},
};

#[derive(Clone)]
pub struct GoalService {
    goal_repo: GoalRepository,
    pool: PgPool,
}

impl GoalService {
    pub fn new(goal_repo: GoalRepository, pool: PgPool) -> Self {
        Self { goal_repo, pool }
    }

    pub async fn list_goals(&self) -> Result<Vec<Goal>, AppError> {
        self.goal_repo.list().await
    }

    pub async fn get_goal(&self, id: Uuid) -> Result<Goal, AppError> {
        found(self.goal_repo.find_by_id(id).await?, "Meta")
    }

    pub async fn create_goal(&self, data: &NewGoal) -> Result<Goal, AppError> {
        let goal = self.goal_repo.create(&self.pool, data).await?;
        tracing::info!("🎯 Meta criada: {} (alvo R$ {})", goal.title, goal.target_value);
        Ok(goal)
    }

    pub async fn update_goal(&self, id: Uuid, changes: &GoalChanges) -> Result<Goal, AppError> {
        // Período final depende do que já está gravado
        if changes.start_date.is_some() || changes.end_date.is_some() {
            let current = self.get_goal(id).await?;
            let start = changes.start_date.unwrap_or(current.start_date);
            let end = changes.end_date.unwrap_or(current.end_date);
            if end < start {
                return Err(AppError::InvalidInput(
                    "A data final deve ser igual ou posterior à inicial.".into(),
                ));
            }
        }
        found(self.goal_repo.update(&self.pool, id, changes).await?, "Meta")
    }

    pub async fn delete_goal(&self, id: Uuid) -> Result<(), AppError> {
        if !self.goal_repo.delete(&self.pool, id).await? {
            return Err(AppError::ResourceNotFound("Meta".into()));
        }
        Ok(())
    }
}
