//! mdconceal - selection-aware Markdown syntax concealing
//!
//! Computes which parts of a Markdown document an editor should hide or
//! restyle to show a rendered view, while anything on the caret's line is
//! left as raw, editable syntax.
//!
//! ```no_run
//! use mdconceal::{Bucket, Document, Engine, Position, Selection};
//!
//! let engine = Engine::new()?;
//! let doc = Document::new("# Notes\n- [ ] write **tests**\n");
//! let plan = engine.recompute(&doc, &Selection::caret(Position::new(0, 0)), 2);
//! for range in plan.get(Bucket::Hidden) {
//!     println!("hide {range}");
//! }
//! # Ok::<(), mdconceal::ConcealError>(())
//! ```

pub mod conceal;
pub mod config;
pub mod document;
pub mod error;
pub mod links;
pub mod preview;
pub mod selection;

pub use conceal::{
    effective_tab_size, recompute, Bucket, CheckboxState, DecorationPlan, Engine, Toggle,
    DEFAULT_BACKTRACK_LIMIT, DEFAULT_TAB_SIZE, MAX_TAB_SIZE,
};
pub use config::Config;
pub use document::{Document, Line, Position, Range, TextDocument};
pub use error::{ConcealError, Result};
pub use links::{DocumentLink, ImageHover, LinkTarget};
pub use selection::Selection;
