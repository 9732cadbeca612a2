//! Ticket Classifier
//!
//! Maps attendee ticket metadata to a display category (label, sublabel, color).
//! Pure and total: every input, including `None`, yields a category.
//!
//! ## Rules (first match wins)
//!
//! `ticket_type` / `user_type` are lowercased and matched by substring;
//! missing fields count as `""` and a missing price as `0.0`.
//!
//! 1. media (user or ticket type)  -> MEDIA PARTNER, purple
//! 2. hiring (user or ticket type) -> HIRING PARTNER, orange
//! 3. collaborator                 -> COLLABORATOR, cyan
//! 4. vip                          -> VIP TICKET, by price tier
//! 5. standard                     -> STANDARD TICKET, blue or black when free
//! 6. free (price 0)               -> FREE ENTRY, black
//! 7. anything else                -> uppercased ticket type, grey

use crate::scanner_api::AttendeeDetails;
use serde::{Deserialize, Serialize};

pub const FREE_ENTRY: &str = "Free Entry";

/// VIP premium tier price
pub const VIP_PREMIUM_PRICE: f64 = 1899.0;

/// VIP early-bird tier price
pub const VIP_EARLY_BIRD_PRICE: f64 = 1199.0;

/// Display colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketColor {
    Green,
    Red,
    Blue,
    Purple,
    Orange,
    Cyan,
    Black,
    Grey,
}

impl TicketColor {
    /// ARGB value
    pub const fn argb(self) -> u32 {
        match self {
            Self::Green => 0xFF4CAF50,
            Self::Red => 0xFFF44336,
            Self::Blue => 0xFF2196F3,
            Self::Purple => 0xFF9C27B0,
            Self::Orange => 0xFFFF9800,
            Self::Cyan => 0xFF00BCD4,
            Self::Black => 0xFF212121,
            Self::Grey => 0xFF757575,
        }
    }

    /// (r, g, b) components
    pub const fn rgb(self) -> (u8, u8, u8) {
        let v = self.argb();
        (((v >> 16) & 0xFF) as u8, ((v >> 8) & 0xFF) as u8, (v & 0xFF) as u8)
    }
}

/// Derived display category. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketCategory {
    pub background_color: TicketColor,
    pub display_text: String,
    pub sub_text: Option<String>,
}

impl TicketCategory {
    fn new(color: TicketColor, text: impl Into<String>, sub: Option<String>) -> Self {
        Self {
            background_color: color,
            display_text: text.into(),
            sub_text: sub,
        }
    }

    fn free_partner(color: TicketColor, text: &str) -> Self {
        Self::new(color, text, Some(FREE_ENTRY.to_string()))
    }

    /// Category shown when there are no attendee details
    pub fn unknown() -> Self {
        Self::new(TicketColor::Grey, "UNKNOWN", None)
    }
}

/// Classify attendee details into a display category
pub fn classify(details: Option<&AttendeeDetails>) -> TicketCategory {
    let Some(details) = details else {
        return TicketCategory::unknown();
    };

    let ticket_type = details
        .ticket_type
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();
    let user_type = details
        .user_type
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();
    let price = details.final_price.unwrap_or(0.0);

    if user_type.contains("media") || ticket_type.contains("media") {
        return TicketCategory::free_partner(TicketColor::Purple, "MEDIA PARTNER");
    }

    if user_type.contains("hiring") || ticket_type.contains("hiring") {
        return TicketCategory::free_partner(TicketColor::Orange, "HIRING PARTNER");
    }

    if ticket_type.contains("collaborator") {
        return TicketCategory::free_partner(TicketColor::Cyan, "COLLABORATOR");
    }

    if ticket_type.contains("vip") {
        let (color, sub) = if price == VIP_PREMIUM_PRICE {
            (TicketColor::Green, "₹1899 Premium".to_string())
        } else if price == VIP_EARLY_BIRD_PRICE {
            (TicketColor::Red, "₹1199 Early Bird".to_string())
        } else if price == 0.0 {
            (TicketColor::Black, FREE_ENTRY.to_string())
        } else {
            (TicketColor::Red, format_price(price))
        };
        return TicketCategory::new(color, "VIP TICKET", Some(sub));
    }

    if ticket_type.contains("standard") {
        let (color, sub) = if price == 0.0 {
            (TicketColor::Black, FREE_ENTRY.to_string())
        } else {
            (TicketColor::Blue, format_price(price))
        };
        return TicketCategory::new(color, "STANDARD TICKET", Some(sub));
    }

    let label = ticket_type.to_uppercase();

    if price == 0.0 {
        let sub = if label.is_empty() {
            "General".to_string()
        } else {
            label
        };
        return TicketCategory::new(TicketColor::Black, "FREE ENTRY", Some(sub));
    }

    let text = if label.is_empty() {
        "TICKET".to_string()
    } else {
        label
    };
    let sub = (price > 0.0).then(|| format_price(price));
    TicketCategory::new(TicketColor::Grey, text, sub)
}

/// Banner color for a verification outcome
pub fn status_color(is_success: bool, is_warning: bool, is_error: bool) -> TicketColor {
    if is_success {
        TicketColor::Green
    } else if is_warning {
        TicketColor::Orange
    } else if is_error {
        TicketColor::Red
    } else {
        TicketColor::Grey
    }
}

/// "₹1234", rounded half away from zero
fn format_price(price: f64) -> String {
    format!("₹{:.0}", price.round())
}
