use crate::common::error::AppError;

// ---
// Helpers de banco de dados
// ---

/// Converte violações de constraint do Postgres em erros de negócio.
/// `entity` é o nome usado nas mensagens ("Fornecedor", "Produto"...).
pub(crate) fn map_constraint_error(e: sqlx::Error, entity: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_foreign_key_violation() {
            let constraint = db_err.constraint().unwrap_or_default();
            // products_supplier_id_fkey -> o fornecedor ainda tem produtos (ou não existe)
            if constraint.starts_with("products_supplier_id") {
                return AppError::Conflict(format!(
                    "{}: fornecedor inexistente ou com produtos vinculados.",
                    entity
                ));
            }
            return AppError::Conflict(format!("{}: registro relacionado inválido.", entity));
        }
        if db_err.is_check_violation() {
            return AppError::InvalidInput(format!("{}: valor fora do permitido.", entity));
        }
        if db_err.is_unique_violation() {
            return AppError::Conflict(format!("{} já existe.", entity));
        }
    }
    e.into()
}

/// Transforma `None` em `ResourceNotFound` com o nome da entidade.
pub(crate) fn found<T>(value: Option<T>, entity: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::ResourceNotFound(entity.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn found_maps_none_to_not_found() {
        let result: Result<i32, AppError> = found(None, "Produto");
        assert!(matches!(result, Err(AppError::ResourceNotFound(ref e)) if e == "Produto"));
        assert_eq!(found(Some(3), "Produto").unwrap(), 3);
    }

    #[test]
    fn non_database_errors_pass_through() {
        let err = map_constraint_error(sqlx::Error::RowNotFound, "Venda");
        assert!(matches!(err, AppError::DatabaseError(sqlx::Error::RowNotFound)));
    }
}
