use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use topup_common::Rupees;
use uuid::Uuid;

//--------------------------------------       Package         ---------------------------------------------------------
/// A purchasable top-up tier. The diamond count identifies the tier; the price is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub diamonds: u32,
    pub price: Rupees,
}

const fn package(diamonds: u32, price: i64) -> Package {
    Package { diamonds, price: Rupees::new(price) }
}

/// The fixed price table. Diamond counts not listed here are not for sale.
pub const PACKAGES: [Package; 12] = [
    package(300, 125),
    package(500, 199),
    package(800, 279),
    package(1000, 299),
    package(1200, 349),
    package(1500, 379),
    package(2000, 449),
    package(2500, 499),
    package(3500, 599),
    package(5000, 699),
    package(7000, 749),
    package(9000, 899),
];

impl Package {
    pub fn from_diamonds(diamonds: u32) -> Option<Self> {
        PACKAGES.iter().find(|p| p.diamonds == diamonds).copied()
    }
}

impl Display for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} diamonds for {}", self.diamonds, self.price)
    }
}

//--------------------------------------        Period         ---------------------------------------------------------
/// Validity window requested for a link or an access grant.
///
/// Keywords are matched on their prefix, case-insensitively, so "hours", "Month" and "yearly" are all accepted. Any
/// other keyword (or none at all) means the record never expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Hour,
    Month,
    Year,
    Unlimited,
}

impl Period {
    pub fn from_keyword(keyword: Option<&str>) -> Self {
        let keyword = match keyword {
            Some(k) => k.trim().to_lowercase(),
            None => return Self::Unlimited,
        };
        if keyword.starts_with("hour") {
            Self::Hour
        } else if keyword.starts_with("month") {
            Self::Month
        } else if keyword.starts_with("year") {
            Self::Year
        } else {
            Self::Unlimited
        }
    }

    pub fn duration(&self) -> Option<Duration> {
        match self {
            Self::Hour => Some(Duration::hours(1)),
            Self::Month => Some(Duration::days(30)),
            Self::Year => Some(Duration::days(365)),
            Self::Unlimited => None,
        }
    }

    pub fn expiry_from(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.duration().map(|d| now + d)
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hour => write!(f, "1 hour"),
            Self::Month => write!(f, "30 days"),
            Self::Year => write!(f, "365 days"),
            Self::Unlimited => write!(f, "no expiry"),
        }
    }
}

//--------------------------------------       LinkToken       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkToken(pub String);

impl LinkToken {
    /// A fresh 32-character lowercase hex token. Collisions are not checked for.
    pub fn random() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for LinkToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for LinkToken {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for LinkToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

//--------------------------------------         Link          ---------------------------------------------------------
/// A single-use redeem link for one package, bound to the user it was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub token: LinkToken,
    pub owner_id: i64,
    pub diamonds: u32,
    pub amount: Rupees,
    pub created_at: DateTime<Utc>,
    pub expire_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub used: bool,
}

/// Why a link can or cannot be redeemed right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redeemability {
    Redeemable,
    Used,
    Expired,
}

impl Link {
    pub fn new(owner_id: i64, package: Package, expire_at: Option<DateTime<Utc>>) -> Self {
        Self {
            token: LinkToken::random(),
            owner_id,
            diamonds: package.diamonds,
            amount: package.price,
            created_at: Utc::now(),
            expire_at,
            used: false,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expire_at.map(|exp| now > exp).unwrap_or(false)
    }

    /// Expiry is reported ahead of use: an expired link is expired whether or not it was redeemed.
    pub fn redeemability_at(&self, now: DateTime<Utc>) -> Redeemability {
        if self.is_expired_at(now) {
            Redeemability::Expired
        } else if self.used {
            Redeemability::Used
        } else {
            Redeemability::Redeemable
        }
    }

    pub fn is_redeemable_at(&self, now: DateTime<Utc>) -> bool {
        self.redeemability_at(now) == Redeemability::Redeemable
    }
}

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatusType {
    /// The link was redeemed and the order is waiting for an admin to check the payment.
    Pending,
    /// An admin confirmed the payment. Terminal.
    Confirmed,
    /// An admin marked the order as failed. Terminal.
    Failed,
}

impl OrderStatusType {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Pending => write!(f, "pending"),
            OrderStatusType::Confirmed => write!(f, "confirmed"),
            OrderStatusType::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct ConversionError(String);

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "failed" => Ok(Self::Failed),
            _ => Err(ConversionError(s.to_string())),
        }
    }
}

//--------------------------------------      Resolution       ---------------------------------------------------------
/// The admin's verdict on a pending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Confirmed,
    Failed,
}

impl Resolution {
    pub fn status(&self) -> OrderStatusType {
        match self {
            Self::Confirmed => OrderStatusType::Confirmed,
            Self::Failed => OrderStatusType::Failed,
        }
    }
}

impl Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.status())
    }
}

//--------------------------------------        OrderId        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    /// A fresh 12-character lowercase hex id.
    pub fn random() -> Self {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(12);
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for OrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

//--------------------------------------        Order          ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// The link that was redeemed to create this order
    pub token: LinkToken,
    pub owner_id: i64,
    pub diamonds: u32,
    pub amount: Rupees,
    /// Payment method label as supplied by the customer, e.g. "upi"
    pub method: String,
    pub status: OrderStatusType,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_note: Option<String>,
}

impl Order {
    /// Builds a pending order for a link that has just been claimed.
    pub fn for_link(link: &Link, method: &str) -> Self {
        Self {
            id: OrderId::random(),
            token: link.token.clone(),
            owner_id: link.owner_id,
            diamonds: link.diamonds,
            amount: link.amount,
            method: method.to_string(),
            status: OrderStatusType::Pending,
            created_at: Utc::now(),
            updated_at: None,
            admin_note: None,
        }
    }
}

//--------------------------------------        Grant          ---------------------------------------------------------
/// Permission for a non-admin user to issue links for themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub user_id: i64,
    pub granted_at: DateTime<Utc>,
    pub expire_at: Option<DateTime<Utc>>,
}

impl Grant {
    pub fn new(user_id: i64, period: Period) -> Self {
        let now = Utc::now();
        Self { user_id, granted_at: now, expire_at: period.expiry_from(now) }
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.expire_at.map(|exp| now <= exp).unwrap_or(true)
    }
}
