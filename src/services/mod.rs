// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod account;
pub mod space;

pub use account::AccountService;
pub use space::SpaceService;
