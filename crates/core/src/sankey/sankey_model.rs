use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One labeled amount in the budget breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SankeyCategory {
    pub name: String,
    pub amount: Decimal,
}

/// A user's saved budget breakdown: monthly income flowing into expense
/// and savings categories. The frontend derives the diagram's flows
/// from these lists; whatever income the categories do not consume is
/// rendered as the remainder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SankeyConfig {
    pub monthly_income: Decimal,
    pub expenses: Vec<SankeyCategory>,
    pub savings: Vec<SankeyCategory>,
}
