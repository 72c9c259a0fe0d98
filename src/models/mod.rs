// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod event;
pub mod message;
pub mod nudge;
pub mod space;
pub mod todo;
pub mod user;

pub use event::Event;
pub use message::Message;
pub use nudge::Nudge;
pub use space::Space;
pub use todo::Todo;
pub use user::User;
