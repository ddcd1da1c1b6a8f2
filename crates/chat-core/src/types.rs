//! Conversational data model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of products attached to a single assistant turn.
pub const MAX_PRODUCTS_PER_TURN: usize = 3;

/// Transport a session arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Embedded storefront chat widget.
    Web,
    /// WhatsApp Business webhook.
    #[serde(rename = "whatsapp")]
    WhatsApp,
}

impl Channel {
    /// Short stable name, used to scope session keys and in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Web => "web",
            Channel::WhatsApp => "whatsapp",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Author of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Role name as chat-completion APIs expect it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Sub-conversation mode of a session.
///
/// Drives branching independently of intent classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueState {
    #[default]
    Normal,
    AwaitingHumanHandoffTopic,
    AwaitingContactData,
}

/// Classified purpose of a user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    ProductSearch,
    PriceInquiry,
    ShippingInquiry,
    QuoteRequest,
    PurchaseIntent,
    HelpRequest,
    General,
}

impl Intent {
    /// Whether a turn with this intent should be grounded on catalog results.
    pub fn wants_products(&self) -> bool {
        matches!(self, Intent::ProductSearch | Intent::PriceInquiry)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::ProductSearch => "product_search",
            Intent::PriceInquiry => "price_inquiry",
            Intent::ShippingInquiry => "shipping_inquiry",
            Intent::QuoteRequest => "quote_request",
            Intent::PurchaseIntent => "purchase_intent",
            Intent::HelpRequest => "help_request",
            Intent::General => "general",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only catalog projection supplied by the product search collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRef {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub category: String,
    /// Storefront page for the product, when the catalog provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ProductRef {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            category: category.into(),
            url: None,
        }
    }

    /// One-line description used in prompts and WhatsApp replies.
    pub fn summary_line(&self) -> String {
        format!("{} - ${:.2} ({})", self.name, self.price, self.category)
    }
}

/// One message in a session. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Products shown alongside an assistant reply (at most three).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub products: Vec<ProductRef>,
}

impl Turn {
    /// Create a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            timestamp: Utc::now(),
            products: Vec::new(),
        }
    }

    /// Create an assistant turn.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            timestamp: Utc::now(),
            products: Vec::new(),
        }
    }

    /// Create an assistant turn with attached products, truncated to
    /// [`MAX_PRODUCTS_PER_TURN`].
    pub fn assistant_with_products(text: impl Into<String>, products: &[ProductRef]) -> Self {
        let mut turn = Self::assistant(text);
        turn.products = products
            .iter()
            .take(MAX_PRODUCTS_PER_TURN)
            .cloned()
            .collect();
        turn
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

/// Kind of follow-up a lead asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    /// Contact data volunteered during a normal conversation.
    #[default]
    ChatbotLead,
    /// Contact data collected by the scripted human-handoff dialogue.
    HumanAssistance,
}

impl RequestType {
    pub fn label(&self) -> &'static str {
        match self {
            RequestType::ChatbotLead => "Lead del chatbot",
            RequestType::HumanAssistance => "Solicitud de asistencia humana",
        }
    }
}

/// Contact record captured from a conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadData {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub interest: Option<String>,
    pub request_type: RequestType,
}

impl LeadData {
    /// A lead is actionable when a salesperson has someone to contact.
    pub fn is_actionable(&self) -> bool {
        self.name.is_some() || self.email.is_some() || self.phone.is_some()
    }

    /// Whether the lead carries a way to reach the customer.
    pub fn has_contact_method(&self) -> bool {
        self.email.is_some() || self.phone.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assistant_products_truncated() {
        let products: Vec<ProductRef> = (0..5)
            .map(|i| ProductRef::new(i.to_string(), format!("Colchón {}", i), 100.0, "colchones"))
            .collect();

        let turn = Turn::assistant_with_products("Mirá estas opciones", &products);
        assert_eq!(turn.products.len(), MAX_PRODUCTS_PER_TURN);
        assert_eq!(turn.products[0].id, "0");
        assert_eq!(turn.role, Role::Assistant);
    }

    #[test]
    fn test_lead_actionable() {
        let mut lead = LeadData {
            interest: Some("un sommier".to_string()),
            ..Default::default()
        };
        assert!(!lead.is_actionable());

        lead.name = Some("Juan".to_string());
        assert!(lead.is_actionable());
        assert!(!lead.has_contact_method());

        lead.phone = Some("11 5555 1234".to_string());
        assert!(lead.has_contact_method());
    }

    #[test]
    fn test_intent_wants_products() {
        assert!(Intent::ProductSearch.wants_products());
        assert!(Intent::PriceInquiry.wants_products());
        assert!(!Intent::PurchaseIntent.wants_products());
        assert!(!Intent::Greeting.wants_products());
    }

    #[test]
    fn test_product_summary_line() {
        let product = ProductRef::new("p1", "Colchón Queen", 250000.0, "colchones");
        assert_eq!(product.summary_line(), "Colchón Queen - $250000.00 (colchones)");
    }

    #[test]
    fn test_channel_serde() {
        let json = serde_json::to_string(&Channel::WhatsApp).unwrap();
        assert_eq!(json, "\"whatsapp\"");
        assert_eq!(Channel::WhatsApp.as_str(), "whatsapp");
    }
}
