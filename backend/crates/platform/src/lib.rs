//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (random tokens, HMAC signing, constant-time compare)
//! - Password hashing (Argon2id)
//! - Cookie parsing and `Set-Cookie` construction

pub mod cookie;
pub mod crypto;
pub mod password;
