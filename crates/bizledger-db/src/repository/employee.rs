//! # Employee Repository
//!
//! Staff master data. Pay slips are computed in `bizledger-core`
//! from the stored base salary.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use bizledger_core::validation::{validate_employee_name, validate_salary_cents};
use bizledger_core::{new_id, Employee, NewEmployee};

use crate::error::DbResult;

#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        EmployeeRepository { pool }
    }

    pub async fn insert(&self, employee: &NewEmployee) -> DbResult<Employee> {
        validate_employee_name(&employee.name)?;
        validate_salary_cents(employee.base_salary_cents)?;

        let record = Employee {
            id: new_id(),
            name: employee.name.trim().to_string(),
            role: employee
                .role
                .as_deref()
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string),
            base_salary_cents: employee.base_salary_cents,
            created_at: Utc::now(),
        };

        debug!(id = %record.id, "Inserting employee");

        sqlx::query(
            r#"
            INSERT INTO employees (id, name, role, base_salary_cents, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&record.id)
        .bind(&record.name)
        .bind(&record.role)
        .bind(record.base_salary_cents)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn list(&self) -> DbResult<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(
            "SELECT id, name, role, base_salary_cents, created_at FROM employees ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(employees)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(
            "SELECT id, name, role, base_salary_cents, created_at FROM employees WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(employee)
    }
}
