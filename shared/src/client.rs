//! Client-facing request/response types
//!
//! Common request/response DTOs used in API communication between the store
//! server and its frontends.

use serde::{Deserialize, Serialize};

// Re-export ApiResponse so client code only needs `shared::client`
pub use crate::error::ApiResponse;

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Role name: "admin" | "staff" | "user" (defaults to "user")
    #[serde(default)]
    pub role: Option<String>,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: String,
    pub user: UserInfo,
}

/// User information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Forgot-password request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Reset-password request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

// =============================================================================
// Inventory API DTOs
// =============================================================================

/// Sell request: decrement stock for a single product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellRequest {
    pub product_id: String,
    pub quantity: i64,
}

// =============================================================================
// Checkout API DTOs
// =============================================================================

/// One cart line in a checkout request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: String,
    pub quantity: i64,
}

/// Checkout request: customer details plus the cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub customer_name: String,
    pub phone_number: String,
    pub email: String,
    pub address: String,
    pub cart: Vec<CartLine>,
}

/// Id-based "has purchased" check result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchasedResponse {
    pub purchased: bool,
}
