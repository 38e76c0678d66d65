//! Turning translated articles into channel messages and sending them.
//!
//! # Submodules
//!
//! - [`message`]: builds the header/body/footer text and cuts it into chunks
//! - [`telegram`]: sends chunks to the configured channel
//!
//! # Message Layout
//!
//! ```text
//! 🌟 <translated heading>
//!
//! 🌟 <original heading>
//!
//! 🔸 <translated paragraph>
//!
//! 🔸 <original paragraph>
//!
//! • <translated list item>
//! • <original list item>
//!
//! ━━━━ promotion footer ━━━━
//! ```

pub mod message;
pub mod telegram;
