//! Shared building blocks for the bounty-escrow protocol: the asset
//! abstraction used to escrow either the native asset or an arbitrary
//! fungible token, and the fee math applied when a bounty is paid out.

#![no_std]

pub mod asset;
pub mod fee;
