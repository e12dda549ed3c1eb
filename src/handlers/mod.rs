pub mod account;
pub mod checkout;
pub mod generator;
