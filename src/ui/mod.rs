//! Presentation engine - layout, button intents and frame rendering.
//!
//! The session loop polls input through [`input_logic`], maps it with
//! [`buttons`], and when the frame is dirty hands the state to
//! [`render`], which wraps the message with [`layout`].
//!
//! ## Components
//!
//! - **Layout**: greedy word wrap onto fixed-width rows
//! - **Buttons**: A/B/X/Y → Action/Confirm/Cancel, START reserved
//! - **Render**: draw order for hints, countdown and message

pub mod buttons;
pub mod input_logic;
pub mod layout;
pub mod message;
pub mod render;
