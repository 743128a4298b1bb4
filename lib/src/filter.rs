use crate::TEAM;
use polars::prelude::*;

/// Builder for team predicates over raw or per-match records.
#[derive(Clone, Default)]
pub struct RecordFilter {
    filter_expr: Option<Expr>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self { filter_expr: None }
    }

    pub fn team(mut self, team_name: &str) -> Self {
        let expr = col(TEAM).eq(lit(team_name));
        self.extend_filter(expr)
    }

    /// Every team except `team_name`
    pub fn not_team(mut self, team_name: &str) -> Self {
        let expr = col(TEAM).neq(lit(team_name));
        self.extend_filter(expr)
    }

    // Combines the current filter with a new one using AND logic
    fn extend_filter(&mut self, new_expr: Expr) -> Self {
        self.filter_expr = match self.filter_expr.take() {
            Some(existing_expr) => Some(existing_expr.and(new_expr)),
            None => Some(new_expr),
        };
        self.clone()
    }

    pub fn build(self) -> Expr {
        self.filter_expr.unwrap_or_else(|| lit(true))
    }
}
