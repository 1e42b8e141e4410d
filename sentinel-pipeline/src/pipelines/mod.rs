pub mod fraud_mining;
