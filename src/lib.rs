pub mod aggregate;
pub mod model;
pub mod rating;
pub mod services;
pub mod store;
pub mod validate;
