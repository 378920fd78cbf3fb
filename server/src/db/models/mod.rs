//! Database Models

pub mod address;
pub mod cart;
pub mod category;
pub mod order;
pub mod product;
pub mod serde_helpers;
pub mod shipping;
pub mod user;

pub use address::{Address, AddressCreate, AddressUpdate};
pub use cart::{Cart, CartItem, CartItemAdd, CartItemUpdate};
pub use category::{Category, CategoryCreate, CategoryUpdate};
pub use order::{Order, OrderLine, OrderStatus, OrderStatusUpdate};
pub use product::{Product, ProductCreate, ProductUpdate, derive_sku};
pub use shipping::{Shipping, ShippingStatus, ShippingUpdate};
pub use user::{User, UserLogin, UserRegister, UserView};
