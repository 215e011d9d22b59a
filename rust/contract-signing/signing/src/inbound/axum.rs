pub mod documents;
pub mod router;
pub mod signing_links;

#[cfg(test)]
mod tests;

pub use router::{SigningRouterState, documents_router, signing_links_router};
