//! Status enums for orders, payments and accounts.
//!
//! The backend owns every status transition; this module only knows how to
//! read a status, where it sits in the order lifecycle, and what the customer
//! may still do with it. Unknown strings coming from the backend never fail
//! deserialization: they fall back to the earliest-stage value so that a
//! listing never breaks on one malformed record.

use serde::{Deserialize, Deserializer, Serialize};

/// Implements `Deserialize` by reading a string and passing it through the
/// type's infallible `from_backend` constructor.
macro_rules! lenient_deserialize {
    ($name:ident) => {
        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Ok(Self::from_backend(&raw))
            }
        }
    };
}

// =============================================================================
// Order Status
// =============================================================================

/// Order lifecycle status.
///
/// Orders are created `Pending` and move forward through
/// `Pending → Processing → Shipped → Delivered`. Any non-terminal order may
/// instead become `Cancelled`. `Delivered` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Every status, in display order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// The forward progression shown on the order tracking bar.
    pub const PROGRESSION: [Self; 4] = [
        Self::Pending,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
    ];

    /// Parse a status, ignoring ASCII case and surrounding whitespace.
    ///
    /// Returns `None` for anything outside the closed status set.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(raw))
    }

    /// Read a status sent by the backend, treating unknown values as `Pending`.
    #[must_use]
    pub fn from_backend(raw: &str) -> Self {
        Self::parse(raw).unwrap_or_default()
    }

    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Human-readable label (e.g., "Shipped").
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    /// 1-based position in [`Self::PROGRESSION`], or `None` for `Cancelled`.
    #[must_use]
    pub const fn step(&self) -> Option<u8> {
        match self {
            Self::Pending => Some(1),
            Self::Processing => Some(2),
            Self::Shipped => Some(3),
            Self::Delivered => Some(4),
            Self::Cancelled => None,
        }
    }

    /// Completion of the order as a percentage: 25, 50, 75, 100, or 0 when cancelled.
    #[must_use]
    pub const fn progress_percent(&self) -> u8 {
        // PROGRESSION has 4 steps, so each step is worth exactly 25%.
        const PER_STEP: u8 = 100 / 4;
        match self.step() {
            Some(step) => step * PER_STEP,
            None => 0,
        }
    }

    /// Whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether the customer may still cancel the order.
    ///
    /// Shipped orders are not cancellable even though they are not terminal:
    /// a parcel already handed to the courier cannot be recalled.
    #[must_use]
    pub const fn is_cancellable(&self) -> bool {
        !matches!(self, Self::Delivered | Self::Cancelled | Self::Shipped)
    }

    /// Whether the tracking bar should be shown for this status.
    #[must_use]
    pub const fn shows_progress(&self) -> bool {
        !self.is_terminal()
    }

    /// Whether `next` is a legal transition from this status.
    ///
    /// Forward moves along the progression are allowed (skipping is fine);
    /// `Cancelled` is reachable from any non-terminal status.
    #[must_use]
    pub const fn can_advance_to(&self, next: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        match (self.step(), next.step()) {
            (_, None) => true,
            (Some(current), Some(target)) => target > current,
            (None, Some(_)) => false,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid order status: {s}"))
    }
}

lenient_deserialize!(OrderStatus);

/// Progress percentage for a raw backend status string.
///
/// Unlike [`OrderStatus::from_backend`], unrecognized input yields 0 rather
/// than the `Pending` value: an unknown status has made no known progress.
#[must_use]
pub fn progress_percent(raw: &str) -> u8 {
    OrderStatus::parse(raw).map_or(0, |status| status.progress_percent())
}

/// Whether an order with this raw backend status may be cancelled.
#[must_use]
pub fn is_cancellable(raw: &str) -> bool {
    OrderStatus::from_backend(raw).is_cancellable()
}

/// Whether this raw backend status is terminal.
#[must_use]
pub fn is_terminal(raw: &str) -> bool {
    OrderStatus::from_backend(raw).is_terminal()
}

// =============================================================================
// Payment
// =============================================================================

/// Payment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    /// Read a payment status sent by the backend, treating unknown values as `Pending`.
    #[must_use]
    pub fn from_backend(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "paid" => Self::Paid,
            "failed" => Self::Failed,
            "refunded" => Self::Refunded,
            _ => Self::Pending,
        }
    }

    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

lenient_deserialize!(PaymentStatus);

/// How the customer pays for an order.
///
/// Deserializing is strict; order records read it through
/// [`PaymentMethod::deserialize_known`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash on delivery.
    #[default]
    Cod,
    /// Credit or debit card.
    Card,
    /// Unified Payments Interface.
    Upi,
}

impl PaymentMethod {
    /// Read a payment method sent by the backend, ignoring case.
    ///
    /// Returns `None` for methods the store does not offer.
    #[must_use]
    pub fn from_backend(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "cod" => Some(Self::Cod),
            "card" => Some(Self::Card),
            "upi" => Some(Self::Upi),
            _ => None,
        }
    }

    /// Serde helper for optional payment method fields: missing, null and
    /// unrecognized values all read as `None`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the value is neither a string nor null.
    pub fn deserialize_known<'de, D>(deserializer: D) -> Result<Option<Self>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(Self::from_backend))
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Cod => "Cash on Delivery",
            Self::Card => "Credit/Debit Card",
            Self::Upi => "UPI",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cod => write!(f, "cod"),
            Self::Card => write!(f, "card"),
            Self::Upi => write!(f, "upi"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cod" => Ok(Self::Cod),
            "card" => Ok(Self::Card),
            "upi" => Ok(Self::Upi),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

// =============================================================================
// Accounts
// =============================================================================

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Store administrator with access to the admin console.
    Admin,
    /// Regular shopper.
    #[default]
    User,
}

impl UserRole {
    /// Read a role sent by the backend, treating unknown values as `User`.
    #[must_use]
    pub fn from_backend(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("admin") {
            Self::Admin
        } else {
            Self::User
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::User => write!(f, "user"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

lenient_deserialize!(UserRole);

/// Kind of delivery address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    #[default]
    Home,
    Office,
}

impl AddressType {
    /// Read an address type sent by the backend, treating unknown values as `Home`.
    #[must_use]
    pub fn from_backend(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("office") {
            Self::Office
        } else {
            Self::Home
        }
    }
}

lenient_deserialize!(AddressType);

impl std::fmt::Display for AddressType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Home => write!(f, "home"),
            Self::Office => write!(f, "office"),
        }
    }
}

impl std::str::FromStr for AddressType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(Self::Home),
            "office" => Ok(Self::Office),
            _ => Err(format!("invalid address type: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_percent_by_status() {
        assert_eq!(progress_percent("pending"), 25);
        assert_eq!(progress_percent("processing"), 50);
        assert_eq!(progress_percent("shipped"), 75);
        assert_eq!(progress_percent("delivered"), 100);
        assert_eq!(progress_percent("cancelled"), 0);
        assert_eq!(progress_percent("unknown-garbage"), 0);
        assert_eq!(progress_percent(""), 0);
    }

    #[test]
    fn test_progress_percent_ignores_case() {
        assert_eq!(progress_percent("Shipped"), 75);
        assert_eq!(progress_percent("  DELIVERED "), 100);
    }

    #[test]
    fn test_is_cancellable() {
        assert!(is_cancellable("pending"));
        assert!(is_cancellable("processing"));
        assert!(!is_cancellable("shipped"));
        assert!(!is_cancellable("delivered"));
        assert!(!is_cancellable("cancelled"));
        // Unknown statuses read as pending
        assert!(is_cancellable("on-hold"));
    }

    #[test]
    fn test_is_terminal() {
        let terminal: Vec<_> = OrderStatus::ALL
            .into_iter()
            .filter(OrderStatus::is_terminal)
            .collect();
        assert_eq!(terminal, [OrderStatus::Delivered, OrderStatus::Cancelled]);
        assert!(!is_terminal("shipped"));
        assert!(!is_terminal("mystery"));
    }

    #[test]
    fn test_shipped_is_neither_terminal_nor_cancellable() {
        let shipped = OrderStatus::Shipped;
        assert!(!shipped.is_terminal());
        assert!(!shipped.is_cancellable());
        assert!(shipped.shows_progress());
    }

    #[test]
    fn test_from_backend_defaults_to_pending() {
        assert_eq!(OrderStatus::from_backend("returned"), OrderStatus::Pending);
        assert_eq!(OrderStatus::from_backend("Processing"), OrderStatus::Processing);
    }

    #[test]
    fn test_can_advance_to() {
        use OrderStatus::{Cancelled, Delivered, Pending, Processing, Shipped};

        assert!(Pending.can_advance_to(Processing));
        assert!(Pending.can_advance_to(Shipped));
        assert!(Processing.can_advance_to(Cancelled));
        assert!(Shipped.can_advance_to(Delivered));
        assert!(Shipped.can_advance_to(Cancelled));

        assert!(!Processing.can_advance_to(Pending));
        assert!(!Shipped.can_advance_to(Shipped));
        assert!(!Delivered.can_advance_to(Cancelled));
        assert!(!Cancelled.can_advance_to(Pending));
    }

    #[test]
    fn test_order_status_serde() {
        let json = serde_json::to_string(&OrderStatus::Shipped).unwrap();
        assert_eq!(json, "\"shipped\"");

        let parsed: OrderStatus = serde_json::from_str("\"SHIPPED\"").unwrap();
        assert_eq!(parsed, OrderStatus::Shipped);

        let unknown: OrderStatus = serde_json::from_str("\"lost-in-transit\"").unwrap();
        assert_eq!(unknown, OrderStatus::Pending);
    }

    #[test]
    fn test_order_status_from_str_is_strict() {
        assert_eq!("delivered".parse::<OrderStatus>(), Ok(OrderStatus::Delivered));
        assert!("lost".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_payment_method_roundtrip() {
        for method in [PaymentMethod::Cod, PaymentMethod::Card, PaymentMethod::Upi] {
            let parsed: PaymentMethod = method.to_string().parse().unwrap();
            assert_eq!(parsed, method);
        }
        assert_eq!(PaymentMethod::Cod.label(), "Cash on Delivery");
        assert!("cheque".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_backend_payment_method_and_address_type() {
        assert_eq!(PaymentMethod::from_backend(" COD "), Some(PaymentMethod::Cod));
        assert_eq!(PaymentMethod::from_backend("cheque"), None);

        let office: AddressType = serde_json::from_str("\"Office\"").unwrap();
        assert_eq!(office, AddressType::Office);
        let other: AddressType = serde_json::from_str("\"warehouse\"").unwrap();
        assert_eq!(other, AddressType::Home);
        assert_eq!(serde_json::to_string(&AddressType::Office).unwrap(), "\"office\"");
    }

    #[test]
    fn test_lenient_roles_and_payment_status() {
        let role: UserRole = serde_json::from_str("\"Admin\"").unwrap();
        assert_eq!(role, UserRole::Admin);
        let role: UserRole = serde_json::from_str("\"moderator\"").unwrap();
        assert_eq!(role, UserRole::User);

        let status: PaymentStatus = serde_json::from_str("\"PAID\"").unwrap();
        assert_eq!(status, PaymentStatus::Paid);
        let status: PaymentStatus = serde_json::from_str("\"authorized\"").unwrap();
        assert_eq!(status, PaymentStatus::Pending);
    }
}
