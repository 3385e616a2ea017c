mod extract;
mod middleware;

pub use extract::CurrentUser;
pub use middleware::AuthResolutionLayer;
