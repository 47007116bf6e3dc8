//! # Simulated GUI bookkeeping
//!
//! `gymui-core` turns a tree of clickable widgets into two flat buffers:
//!
//! - the **state vector** (`&[i8]`) a learned controller observes, and
//! - the **reward vector** (`&[u8]`, one bit per cell) that records which UI
//!   events have happened during the current episode.
//!
//! Every widget is a `StateElement` (owns a fixed-size state slot), a
//! `RewardElement` (owns a slot sized by its `RewardTemplate`) and
//! `Clickable` (has a hit box and a click handler). The `Controller` lays out
//! both buffers once, then routes clicks:
//!
//! ```rust
//! use gymui_core::*;
//!
//! let template = RewardTemplate::map([
//!     ("a", RewardTemplate::tags(["clicked"])),
//!     ("b", RewardTemplate::tags(["clicked"])),
//! ]);
//! let page = Container::page("main", BoundingBox::new(0, 0, 100, 100), template)
//!     .unwrap()
//!     .with(Button::new("a", BoundingBox::new(0, 0, 10, 10), Action::register(["a", "clicked"])))
//!     .with(Button::new("b", BoundingBox::new(20, 20, 10, 10), Action::register(["b", "clicked"])));
//!
//! let mut c = Controller::new(Box::new(page)).unwrap();
//! assert_eq!(c.handle_click(Point::new(5, 5)), 1);
//! assert_eq!(c.handle_click(Point::new(5, 5)), 0);
//! assert_eq!(c.reward(), &[1, 0]);
//! ```
//!
//! ## Layout stability
//!
//! Slots are assigned by pre-order walks, children in declaration order.
//! Resetting zeroes the buffers but never re-assigns slots, so index `i` of
//! the state vector means the same thing in every episode.
//!
//! ## Modals
//!
//! An open popup or dropdown captures every click its container receives
//! until it closes. See [`container`] for the full routing rules.

pub mod button;
pub mod container;
pub mod controller;
pub mod dropdown;
pub mod error;
pub mod geometry;
pub mod prelude;
pub mod render;
pub mod reward;
pub mod state;
pub mod toggle;
pub mod widget;

pub use button::*;
pub use container::*;
pub use controller::*;
pub use dropdown::*;
pub use error::*;
pub use geometry::*;
pub use render::*;
pub use reward::*;
pub use state::*;
pub use toggle::*;
pub use widget::*;
