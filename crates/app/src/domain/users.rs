//! Users
//!
//! Users are owned by an external identity service; orders and carts only refer to them.

use crate::uuids::TypedUuid;

/// User marker type.
#[derive(Debug)]
pub struct User;

/// User UUID
pub type UserUuid = TypedUuid<User>;
