//! # ON-02 Cross-Chain Transfer Protocol
//!
//! Burn-on-source / mint-on-destination over an omnichain messaging gateway.
//!
//! **Component:** 2
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Move a live omnichain name from one chain to another without ever
//! letting two chains hold it at once:
//! - Burn first, then dispatch a `bincode` payload through the gateway
//! - Mint on the destination, or restore on the source via revert/abort
//! - Every handler runs at most once per transfer identifier
//!
//! ## State Machine
//!
//! ```text
//! Initiated ──► Committed   (destination mint succeeded)
//!     ├──────► Reverted     (destination failed, source restored)
//!     └──────► Aborted      (undeliverable, source restored)
//! ```
//!
//! ## Safety Rules
//!
//! | Rule | Enforcement |
//! |------|-------------|
//! | Burn before send | `prepare` burns before the gateway call |
//! | No double mint | `ExecutionLedger` keyed by `(transfer, Mint)` |
//! | Revert xor abort | shared `(transfer, Resolve)` key |
//! | Trusted peers only | `invariant_trusted_sender` |
//!
//! ## Module Structure
//!
//! ```text
//! on-02-cross-chain-transfer/
//! ├── domain/          # TransferState, TransferRecord, payloads, errors
//! ├── algorithms/      # Transfer ids, codec, execution ledger
//! ├── ports/           # CrossChainTransferApi, Gateway, GatewayReceiver
//! ├── adapters/        # InMemoryGateway
//! ├── application/     # CrossChainTransferService
//! └── config.rs        # CrossChainConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{DeliveryOutcome, DeliveryResult, InMemoryGateway};
pub use algorithms::{
    decode_payload, decode_revert, derive_transfer_id, encode_payload, encode_revert,
    ExecutionLedger,
};
pub use application::CrossChainTransferService;
pub use config::{CrossChainConfig, PeerChain, DEFAULT_ON_REVERT_GAS_LIMIT};
pub use domain::{
    invariant_gas_covered, invariant_routable_target, invariant_trusted_sender,
    CrossChainTransferIntent, MessageId, RevertEnvelope, RevertOptions, TransferDirection,
    TransferError, TransferId, TransferPayload, TransferPhase, TransferRecord, TransferState,
};
pub use ports::{
    CrossChainTransferApi, DispatchReceipt, Gateway, GatewayCall, GatewayReceiver,
    MessageContext, RevertContext,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
