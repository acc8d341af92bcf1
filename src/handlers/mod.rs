// handlers/mod.rs - Handler tiers
//
// Public (no credential): greeting, health, route index, collection list
// Protected (API key):    item reads and every write
//
// The split is enforced in app.rs, where only the protected method routers
// are wrapped with the api key middleware.

pub mod public;
pub mod resource;

pub use resource::ResourceState;
