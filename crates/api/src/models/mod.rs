//! Domain models shared between repositories and handlers.

pub mod order;
pub mod product;
pub mod user;

pub use order::{Order, OrderItem, OrderWithItems};
pub use product::{Product, ProductData};
pub use user::{PublicUser, User};
