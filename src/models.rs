//! Business entities as they are persisted.
//!
//! Field names serialize in camelCase and timestamps as epoch milliseconds,
//! so the stored JSON arrays load without conversion.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::period::Dated;
use crate::types::{Money, TimestampMs};

/// An entity kind stored under its own key.
pub trait Entity: Serialize + serde::de::DeserializeOwned {
    /// Storage key holding the JSON array of this entity.
    const KEY: &'static str;

    /// Human-readable plural name, for logs.
    const NAME: &'static str;
}

// ============================================================================
// Orders
// ============================================================================

/// Production status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "Pendente")]
    Pending,
    #[serde(rename = "Em Produção")]
    InProgress,
    #[serde(rename = "Pronto")]
    Ready,
    #[serde(rename = "Entregue")]
    Delivered,
    #[serde(rename = "Cancelado")]
    Cancelled,
}

impl OrderStatus {
    /// Every status, in workflow order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Pending,
            Self::InProgress,
            Self::Ready,
            Self::Delivered,
            Self::Cancelled,
        ]
    }

    /// Display name, as stored.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Pending => "Pendente",
            Self::InProgress => "Em Produção",
            Self::Ready => "Pronto",
            Self::Delivered => "Entregue",
            Self::Cancelled => "Cancelado",
        }
    }

    /// Still being worked on (neither delivered nor cancelled).
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Short ASCII name, for command-line flags.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Ready => "ready",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = Error;

    /// Accepts the short name or the stored name, ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|status| {
                status.as_str().eq_ignore_ascii_case(s)
                    || status.display_name().to_lowercase() == s.to_lowercase()
            })
            .ok_or_else(|| Error::other(format!("unknown order status '{s}'")))
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Whether an order is produced in-house or outsourced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrderType {
    #[default]
    Casa,
    Terceirizado,
}

/// A customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    #[serde(default)]
    pub order_type: OrderType,
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub items_details: String,
    pub total_value: Money,
    #[serde(default)]
    pub paid_value: Money,
    pub created_at: TimestampMs,
    pub delivery_date: TimestampMs,
    pub status: OrderStatus,
    #[serde(default)]
    pub nota_fiscal_issued: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_payment_date: Option<TimestampMs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl Order {
    /// Amount still owed.
    #[must_use]
    pub fn pending_value(&self) -> Money {
        self.total_value - self.paid_value
    }

    /// Case-insensitive search over customer name and description.
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.customer_name.to_lowercase().contains(&term)
            || self.description.to_lowercase().contains(&term)
    }
}

impl Dated for Order {
    fn timestamp(&self) -> TimestampMs {
        self.created_at
    }
}

impl Entity for Order {
    const KEY: &'static str = "estampa_gestor_orders";
    const NAME: &'static str = "orders";
}

// ============================================================================
// Activities
// ============================================================================

/// Priority of a scheduled activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// A scheduled activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Scheduled date
    pub date: TimestampMs,
    #[serde(default)]
    pub priority: ActivityPriority,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl Dated for Activity {
    fn timestamp(&self) -> TimestampMs {
        self.date
    }
}

impl Entity for Activity {
    const KEY: &'static str = "gestor_bfs_activities";
    const NAME: &'static str = "activities";
}

// ============================================================================
// Expenses
// ============================================================================

/// Expense category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExpenseCategory {
    Material,
    #[serde(rename = "Funcionário")]
    Staff,
    #[serde(rename = "Maquinário")]
    Machinery,
    #[serde(rename = "Aluguel")]
    Rent,
    #[serde(rename = "Manutenção")]
    Maintenance,
    #[serde(rename = "Outros")]
    Other,
}

impl ExpenseCategory {
    /// Display name, as stored.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Material => "Material",
            Self::Staff => "Funcionário",
            Self::Machinery => "Maquinário",
            Self::Rent => "Aluguel",
            Self::Maintenance => "Manutenção",
            Self::Other => "Outros",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A business expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub description: String,
    pub value: Money,
    pub category: ExpenseCategory,
    pub date: TimestampMs,
    #[serde(default)]
    pub created_by: String,
}

impl Dated for Expense {
    fn timestamp(&self) -> TimestampMs {
        self.date
    }
}

impl Entity for Expense {
    const KEY: &'static str = "gestor_bfs_expenses";
    const NAME: &'static str = "expenses";
}

// ============================================================================
// Chat
// ============================================================================

/// Kind of chat message payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    #[default]
    Text,
    Image,
    Video,
    Audio,
}

/// A team chat message. Media content is opaque here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub sender: String,
    pub content: String,
    #[serde(rename = "type", default)]
    pub kind: MessageType,
    pub timestamp: TimestampMs,
    #[serde(default)]
    pub edited: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

impl Dated for ChatMessage {
    fn timestamp(&self) -> TimestampMs {
        self.timestamp
    }
}

impl Entity for ChatMessage {
    const KEY: &'static str = "gestor_bfs_chat";
    const NAME: &'static str = "chat messages";
}

// ============================================================================
// Profit calculations
// ============================================================================

/// Cost breakdown recorded against an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitCalculation {
    pub order_id: String,
    pub revenue: Money,
    #[serde(default)]
    pub cost_fabric: Money,
    #[serde(default)]
    pub cost_sewing: Money,
    #[serde(default)]
    pub cost_print: Money,
    #[serde(default)]
    pub cost_misc: Money,
    pub last_updated: TimestampMs,
}

impl ProfitCalculation {
    /// Sum of all cost components.
    #[must_use]
    pub fn total_cost(&self) -> Money {
        self.cost_fabric + self.cost_sewing + self.cost_print + self.cost_misc
    }
}

impl Dated for ProfitCalculation {
    fn timestamp(&self) -> TimestampMs {
        self.last_updated
    }
}

impl Entity for ProfitCalculation {
    const KEY: &'static str = "gestor_bfs_profits";
    const NAME: &'static str = "profit calculations";
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDER_JSON: &str = r#"{
        "id": "o-1",
        "orderType": "Terceirizado",
        "customerName": "Ana Souza",
        "customerPhone": "11 99999-0000",
        "description": "Camisetas do evento",
        "itemsDetails": "20x M, 10x G",
        "totalValue": 900.5,
        "paidValue": 400,
        "createdAt": 1704448800000,
        "deliveryDate": 1705053600000,
        "status": "Em Produção",
        "notaFiscalIssued": false,
        "createdBy": "Bia"
    }"#;

    #[test]
    fn test_order_from_stored_json() {
        let order: Order = serde_json::from_str(ORDER_JSON).unwrap();
        assert_eq!(order.order_type, OrderType::Terceirizado);
        assert_eq!(order.status, OrderStatus::InProgress);
        assert_eq!(order.created_at, TimestampMs::new(1_704_448_800_000));
        assert_eq!(order.pending_value(), Money::new(500.5));
        assert_eq!(order.notes, None);
        assert_eq!(order.timestamp(), order.created_at);
    }

    #[test]
    fn test_order_serializes_camel_case() {
        let order: Order = serde_json::from_str(ORDER_JSON).unwrap();
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["customerName"], "Ana Souza");
        assert_eq!(json["status"], "Em Produção");
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn test_order_search() {
        let order: Order = serde_json::from_str(ORDER_JSON).unwrap();
        assert!(order.matches_search("ana"));
        assert!(order.matches_search("EVENTO"));
        assert!(!order.matches_search("bonés"));
    }

    #[test]
    fn test_status_activity() {
        assert!(OrderStatus::Pending.is_active());
        assert!(OrderStatus::Ready.is_active());
        assert!(!OrderStatus::Delivered.is_active());
        assert!(!OrderStatus::Cancelled.is_active());
        assert_eq!(OrderStatus::Ready.to_string(), "Pronto");
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("ready".parse::<OrderStatus>().unwrap(), OrderStatus::Ready);
        assert_eq!("In-Progress".parse::<OrderStatus>().unwrap(), OrderStatus::InProgress);
        assert_eq!("em produção".parse::<OrderStatus>().unwrap(), OrderStatus::InProgress);
        assert_eq!("Cancelado".parse::<OrderStatus>().unwrap(), OrderStatus::Cancelled);
        assert!("shipped".parse::<OrderStatus>().is_err());
        for &status in OrderStatus::all() {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_expense_category_names() {
        let expense: Expense = serde_json::from_str(
            r#"{"id":"e","description":"Aluguel março","value":1500,"category":"Aluguel","date":1709251200000,"createdBy":"Bia"}"#,
        )
        .unwrap();
        assert_eq!(expense.category, ExpenseCategory::Rent);
        assert_eq!(expense.category.to_string(), "Aluguel");
    }

    #[test]
    fn test_chat_message_type_field() {
        let msg: ChatMessage = serde_json::from_str(
            r#"{"id":"m","sender":"Bia","content":"oi","type":"audio","timestamp":1,"edited":false}"#,
        )
        .unwrap();
        assert_eq!(msg.kind, MessageType::Audio);
        assert_eq!(msg.reply_to, None);
    }

    #[test]
    fn test_profit_total_cost() {
        let calc = ProfitCalculation {
            order_id: "o-1".to_string(),
            revenue: Money::new(100.0),
            cost_fabric: Money::new(20.0),
            cost_sewing: Money::new(15.0),
            cost_print: Money::new(10.0),
            cost_misc: Money::new(5.0),
            last_updated: TimestampMs::new(0),
        };
        assert_eq!(calc.total_cost(), Money::new(50.0));
    }

    #[test]
    fn test_activity_defaults() {
        let activity: Activity =
            serde_json::from_str(r#"{"id":"a","title":"Comprar tinta","date":1700000000000}"#).unwrap();
        assert_eq!(activity.priority, ActivityPriority::Medium);
        assert!(!activity.completed);
    }
}
