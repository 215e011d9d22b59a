//! Document signing lifecycle: draft/final version bookkeeping, send, void,
//! reset, trash and restore, token-gated signer access, and best-effort
//! audit logging.
//!
//! The crate is split hexagonally: `domain` holds the rules behind ports,
//! `inbound` exposes the axum router, `outbound` implements the ports
//! against Postgres and the email service.

pub mod domain;
pub mod inbound;
pub mod outbound;
