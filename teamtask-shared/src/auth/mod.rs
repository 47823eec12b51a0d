/// Authentication building blocks
///
/// - `password`: Argon2id hashing and verification
/// - `jwt`: HS256 access/refresh token creation and validation
/// - `identity`: registration and credential verification over a `Store`

pub mod identity;
pub mod jwt;
pub mod password;

pub use identity::Identity;
pub use jwt::{Claims, TokenType};
