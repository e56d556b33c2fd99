pub mod collection;
pub mod item;

// Re-export handler functions for use in routing
pub use collection::create as products_post;
pub use collection::list as products_get;
pub use item::delete as product_delete;
pub use item::get as product_get;
pub use item::put as product_put;
