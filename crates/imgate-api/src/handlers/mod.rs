pub mod health;
pub mod transform;
pub mod view;
