//! # Employee Commands

use tracing::{debug, info};

use bizledger_core::{Employee, Money, NewEmployee, PaySlip};

use crate::error::ApiError;
use crate::state::DbState;

pub async fn add_employee(
    db: &DbState,
    name: String,
    role: Option<String>,
    salary: &str,
) -> Result<Employee, ApiError> {
    debug!(name = %name, "add_employee command");

    let employee = db
        .inner()
        .employees()
        .insert(&NewEmployee {
            name,
            role,
            base_salary_cents: Money::parse(salary)?.cents(),
        })
        .await?;

    info!(employee_id = %employee.id, "Employee added");
    Ok(employee)
}

pub async fn list_employees(db: &DbState) -> Result<Vec<Employee>, ApiError> {
    Ok(db.inner().employees().list().await?)
}

pub async fn pay_slip(db: &DbState, employee_id: &str, bonus: &str) -> Result<PaySlip, ApiError> {
    let bonus = Money::parse(bonus)?;
    if bonus.is_negative() {
        return Err(ApiError::validation("bonus must not be negative"));
    }

    let employee = db
        .inner()
        .employees()
        .get_by_id(employee_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Employee", employee_id))?;

    Ok(employee.pay_slip(bonus))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_pay_slip() {
        let db = test_support::db().await;
        let employee = add_employee(&db, "Asha".into(), None, "40000")
            .await
            .unwrap();

        let slip = pay_slip(&db, &employee.id, "2500.50").await.unwrap();
        assert_eq!(slip.net_pay.cents(), 4_250_050);
        assert_eq!(list_employees(&db).await.unwrap().len(), 1);

        let err = pay_slip(&db, "missing", "0").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = pay_slip(&db, &employee.id, "-1").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
