//! Postgres gateway
//!
//! sqlx-backed implementation of the gateway contract. Loads read directly
//! from the pool; staged writes are flushed in a single transaction on
//! `commit`, so a dropped request rolls back cleanly.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::Loan;

use super::{GatewayError, GatewayProvider, LoanGateway};

/// Opens one `PgLoanGateway` per request over a shared pool.
pub struct PgGatewayProvider {
    pool: PgPool,
}

impl PgGatewayProvider {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl GatewayProvider for PgGatewayProvider {
    fn open(&self) -> Box<dyn LoanGateway> {
        Box::new(PgLoanGateway {
            pool: self.pool.clone(),
            staged: Vec::new(),
        })
    }
}

pub struct PgLoanGateway {
    pool: PgPool,
    staged: Vec<Loan>,
}

type LoanRow = (Uuid, Decimal, Decimal, String, i16);

fn row_to_loan((id, amount, current_balance, applicant_name, status): LoanRow) -> Loan {
    Loan::from_stored(id, amount, current_balance, applicant_name, status)
}

#[async_trait]
impl LoanGateway for PgLoanGateway {
    async fn add_loan(&mut self, loan: &Loan) -> Result<(), GatewayError> {
        self.staged.push(loan.clone());
        Ok(())
    }

    async fn get_loan_by_id(&mut self, id: Uuid) -> Result<Option<Loan>, GatewayError> {
        let row: Option<LoanRow> = sqlx::query_as(
            r#"
            SELECT id, amount, current_balance, applicant_name, status
            FROM loans
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_loan))
    }

    async fn list_loans(&mut self) -> Result<Vec<Loan>, GatewayError> {
        let rows: Vec<LoanRow> = sqlx::query_as(
            r#"
            SELECT id, amount, current_balance, applicant_name, status
            FROM loans
            ORDER BY applicant_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_loan).collect())
    }

    async fn commit(&mut self) -> Result<u64, GatewayError> {
        if self.staged.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut written = 0u64;

        for loan in self.staged.drain(..) {
            let result = sqlx::query(
                r#"
                INSERT INTO loans (id, amount, current_balance, applicant_name, status)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (id) DO UPDATE
                SET current_balance = EXCLUDED.current_balance,
                    status = EXCLUDED.status
                "#,
            )
            .bind(loan.id())
            .bind(loan.amount())
            .bind(loan.current_balance())
            .bind(loan.applicant_name())
            .bind(loan.status().code())
            .execute(&mut *tx)
            .await?;

            written += result.rows_affected();
        }

        tx.commit().await?;

        Ok(written)
    }
}
