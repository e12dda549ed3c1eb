pub mod checkout;
pub mod generator;
pub mod ledger;
pub mod password;

pub use checkout::{CheckoutBridge, CheckoutStart, CreditPackage};
pub use generator::ContentGenerator;
pub use ledger::CreditLedger;
