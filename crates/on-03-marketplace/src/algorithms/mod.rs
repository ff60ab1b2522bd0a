//! # Algorithms Module

pub mod fee_split;

pub use fee_split::split_sale;
