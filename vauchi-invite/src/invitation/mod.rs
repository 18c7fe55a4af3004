// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Invitation Protocol
//!
//! Pairs two devices from a pair of invitation codes:
//!
//! 1. Every transport is raced; the first connection wins.
//! 2. The winning connector runs a commit-then-reveal key agreement.
//! 3. Both humans compare confirmation codes derived from the master secret.
//! 4. If both confirm, the connection goes to the contact exchange.
//!
//! ```ignore
//! let factory = InvitationTaskFactory::new(crypto, transports, exchange, identity);
//! let task = factory.create_task(local_code, remote_code)?;
//! task.add_listener(listener);
//! task.connect()?;
//! // show the confirmation code, then:
//! task.local_confirmation_succeeded();
//! ```

mod alice;
mod bob;
mod code;
mod connector;
mod error;
mod events;
mod exchange;
mod factory;
mod gate;
mod group;
mod state;

pub use code::{ConfirmationCode, InvitationCode, Role, MAX_CODE};
pub use connector::{ConnectorState, MAX_PUBLIC_KEY_LENGTH};
pub use error::{InvitationError, InvitationResult};
pub use events::{CallbackListener, InvitationEvent, InvitationListener};
pub use exchange::{ContactExchange, ContactExchangeListener};
pub use factory::InvitationTaskFactory;
pub use gate::ConfirmationGate;
pub use group::{ConnectorGroup, InvitationTask};
pub use state::InvitationState;
