pub mod health;
pub mod pages;
pub mod result;
pub mod submissions;
pub mod upload;
