//! # SF-01 Auth Session
//!
//! Owns the client's authentication session and provisions a user record
//! for every subject that signs in.
//!
//! ## State Machine
//!
//! ```text
//!                  start() resolves
//! [Unauthenticated] ─────────────────→ [Authenticated]
//!        ↑  │          signIn + resolve        │
//!        │  └──────────────────────────────────┤
//!        │                                     │
//!        └──────── signOut / sign_out() ───────┘
//! ```
//!
//! `signUp` and unrecognized events never transition.
//!
//! ## Provisioning
//!
//! After every successful `signIn` transition the controller runs a
//! check-then-create against the identity store in a background task:
//!
//! | Store result | Outcome | Effect |
//! |--------------|---------|--------|
//! | `find` returns a record | `AlreadyProvisioned` | account attached |
//! | `create` succeeds | `Created` | account attached |
//! | `create` fails with `DuplicateKey` | `DuplicateIgnored` | winner re-read, no error |
//! | any other failure | `Failed` | warning, session stays valid |
//! | session changed meanwhile | `Stale` | result discarded |
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Sign-out clears the session before pending provisioning completes | `domain/state.rs` - `SessionSnapshot::clear()` |
//! | Provisioning never applies to a different session generation | `domain/state.rs` - `attach_account()` epoch check |
//! | A failed re-resolution leaves the prior state intact | `service/controller.rs` - `on_sign_in()` |
//! | State transitions never wait on provisioning | `service/controller.rs` - `tokio::spawn` |
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! adapters/bus_adapter.rs  - Hub listener dispatching AuthEvent to the controller
//! ports/inbound.rs         - AuthSessionApi trait
//! ports/outbound.rs        - IdentityProvider, IdentityStore traits
//! service/controller.rs    - AuthSessionController
//! domain/state.rs          - SessionState, SessionSnapshot
//! domain/provisioning.rs   - ProvisioningOutcome classification
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::AuthBusAdapter;
pub use domain::{EventOutcome, ProvisioningOutcome, SessionSnapshot, SessionState};
pub use error::AuthError;
pub use ports::{AuthSessionApi, IdentityProvider, IdentityStore};
pub use service::{AuthSessionController, ProvisioningHandle};

/// Subsystem label used in logs and metrics.
pub const SUBSYSTEM: &str = "auth-session";
