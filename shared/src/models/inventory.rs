//! Inventory Models

use serde::{Deserialize, Serialize};

/// Inventory item entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub quantity_on_hand: i64,
}

/// Inventory movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Receive,
    Consume,
    Adjust,
}

/// Record inventory transaction payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryTransactionCreate {
    pub item_id: String,
    pub kind: TransactionKind,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
