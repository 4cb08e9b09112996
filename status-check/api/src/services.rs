pub mod health;
pub mod nonce;
pub mod prober;
