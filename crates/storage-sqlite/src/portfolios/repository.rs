use finclue_core::errors::{DatabaseError, Error};
use finclue_core::portfolio::{Holding, Portfolio, PortfolioRepositoryTrait};
use finclue_core::Result;

use super::model::{HoldingDB, PortfolioDB};
use crate::utils::parse_decimal;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{holdings, portfolios};
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use rust_decimal::Decimal;
use uuid::Uuid;

pub struct PortfolioRepository {
    pool: DbPool,
    writer: WriteHandle,
}

impl PortfolioRepository {
    pub fn new(pool: DbPool, writer: WriteHandle) -> Self {
        PortfolioRepository { pool, writer }
    }

    fn load_portfolio(conn: &mut SqliteConnection, pid: &str) -> Result<Portfolio> {
        let portfolio_db = portfolios::table
            .find(pid)
            .first::<PortfolioDB>(conn)
            .optional()
            .map_err(StorageError::from)?
            .ok_or_else(|| {
                Error::Database(DatabaseError::NotFound(format!("Portfolio {}", pid)))
            })?;
        Self::assemble(conn, portfolio_db)
    }

    fn assemble(conn: &mut SqliteConnection, portfolio_db: PortfolioDB) -> Result<Portfolio> {
        let holdings_db = holdings::table
            .filter(holdings::portfolio_id.eq(&portfolio_db.id))
            .order(holdings::symbol.asc())
            .load::<HoldingDB>(conn)
            .map_err(StorageError::from)?;
        let holdings = holdings_db
            .into_iter()
            .map(HoldingDB::into_domain)
            .collect::<Result<Vec<Holding>>>()?;
        Ok(Portfolio {
            cash: parse_decimal(&portfolio_db.cash, "portfolios.cash")?,
            id: portfolio_db.id,
            owner_id: portfolio_db.owner_id,
            holdings,
        })
    }
}

#[async_trait]
impl PortfolioRepositoryTrait for PortfolioRepository {
    fn get_portfolio(&self, portfolio_id: &str) -> Result<Portfolio> {
        let mut conn = get_connection(&self.pool)?;
        Self::load_portfolio(&mut conn, portfolio_id)
    }

    async fn get_or_create_for_owner(&self, owner_id: &str) -> Result<Portfolio> {
        {
            let mut conn = get_connection(&self.pool)?;
            let existing = portfolios::table
                .filter(portfolios::owner_id.eq(owner_id))
                .first::<PortfolioDB>(&mut conn)
                .optional()
                .map_err(StorageError::from)?;
            if let Some(portfolio_db) = existing {
                return Self::assemble(&mut conn, portfolio_db);
            }
        }

        let owner = owner_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Portfolio> {
                let now = Utc::now().to_rfc3339();
                let new_row = PortfolioDB {
                    id: Uuid::new_v4().to_string(),
                    owner_id: owner.clone(),
                    cash: "0".to_string(),
                    created_at: now.clone(),
                    updated_at: now,
                };
                // A concurrent request may have created the row between our
                // read and this insert; the owner unique index resolves it.
                diesel::insert_into(portfolios::table)
                    .values(&new_row)
                    .on_conflict(portfolios::owner_id)
                    .do_nothing()
                    .execute(conn)
                    .map_err(StorageError::from)?;
                let portfolio_db = portfolios::table
                    .filter(portfolios::owner_id.eq(&owner))
                    .first::<PortfolioDB>(conn)
                    .map_err(StorageError::from)?;
                Self::assemble(conn, portfolio_db)
            })
            .await
    }

    async fn upsert_holding(&self, portfolio_id: &str, holding: Holding) -> Result<Holding> {
        let pid = portfolio_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Holding> {
                // The portfolio must exist; surface NotFound over a bare
                // foreign key violation.
                let exists = portfolios::table
                    .find(&pid)
                    .count()
                    .get_result::<i64>(conn)
                    .map_err(StorageError::from)?;
                if exists == 0 {
                    return Err(Error::Database(DatabaseError::NotFound(format!(
                        "Portfolio {}",
                        pid
                    ))));
                }

                let now = Utc::now().to_rfc3339();
                let row = HoldingDB {
                    id: Uuid::new_v4().to_string(),
                    portfolio_id: pid,
                    symbol: holding.symbol.clone(),
                    quantity: holding.quantity.to_string(),
                    cost_basis: holding.cost_basis.to_string(),
                    created_at: now.clone(),
                    updated_at: now.clone(),
                };
                diesel::insert_into(holdings::table)
                    .values(&row)
                    .on_conflict((holdings::portfolio_id, holdings::symbol))
                    .do_update()
                    .set((
                        holdings::quantity.eq(&row.quantity),
                        holdings::cost_basis.eq(&row.cost_basis),
                        holdings::updated_at.eq(&now),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(holding)
            })
            .await
    }

    async fn remove_holding(&self, portfolio_id: &str, symbol: &str) -> Result<()> {
        let pid = portfolio_id.to_string();
        let sym = symbol.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let deleted = diesel::delete(
                    holdings::table
                        .filter(holdings::portfolio_id.eq(&pid))
                        .filter(holdings::symbol.eq(&sym)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                if deleted == 0 {
                    return Err(Error::Database(DatabaseError::NotFound(format!(
                        "Holding {} in portfolio {}",
                        sym, pid
                    ))));
                }
                Ok(())
            })
            .await
    }

    async fn set_cash(&self, portfolio_id: &str, cash: Decimal) -> Result<()> {
        let pid = portfolio_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let updated = diesel::update(portfolios::table.find(&pid))
                    .set((
                        portfolios::cash.eq(cash.to_string()),
                        portfolios::updated_at.eq(Utc::now().to_rfc3339()),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if updated == 0 {
                    return Err(Error::Database(DatabaseError::NotFound(format!(
                        "Portfolio {}",
                        pid
                    ))));
                }
                Ok(())
            })
            .await
    }
}
