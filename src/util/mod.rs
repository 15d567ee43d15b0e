//! Text helpers shared by the article loader and the renderer.
//!
//! - **Sanitizing**: strip terminal escape sequences from untrusted article text
//! - **Measuring**: Unicode-aware display width and truncation
//! - **Formatting**: thousands separators for view counts
//!
//! ```
//! use scrollscholar::util::{display_width, group_thousands, truncate_to_width};
//!
//! assert_eq!(display_width("Hello 世界"), 10);
//! assert_eq!(truncate_to_width("The Philosophy of Aristotle", 15), "The Philosop...");
//! assert_eq!(group_thousands(24567), "24,567");
//! ```

mod text;

pub use text::{display_width, group_thousands, strip_control_chars, truncate_to_width};
