//! Session-related constants.

/// Session keys for cart state.
pub mod keys {
    /// Key for the opaque token that scopes cart rows to this session.
    pub const CART_TOKEN: &str = "cart_token";
}
