//! Client-side interaction layer of the bill dashboard.
//!
//! The kernel every feature funnels through: the shared dialog surface, the
//! toast stack, the busy overlay, the JSON request pipeline, and the emoji
//! picker. Feature code consumes these through context handles; the `app`
//! module wires the provider shell the binary mounts.

pub mod api;
pub mod app;
pub mod busy;
pub mod categories;
pub mod dialog;
pub mod emoji;
pub mod toast;
