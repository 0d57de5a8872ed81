//! Admin identity model.

use serde::Serialize;
use sqlx::FromRow;

use webshop_core::{CredentialId, Username};

/// The authenticated admin, as returned by a successful credential check.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AdminIdentity {
    pub id: CredentialId,
    pub username: Username,
}
