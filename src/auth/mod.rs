pub mod claims;
pub mod jwt;
pub mod middleware;
pub mod utils;

pub use claims::{Claims, UserRole};
pub use jwt::JwtService;
pub use middleware::{AdminUser, AuthenticatedUser, IdentityMiddleware, MaybeUser};
pub use utils::{can_access_attempt, require_admin, require_owner_or_admin};
