//! Comment and prose reflow.
//!
//! - `algorithms`: greedy and minimum raggedness line breaking
//! - `wrapper`: comment-aware paragraph detection, indents and reflow
//! - `line_ending`: `\r\n` detection so output keeps the input's line endings

pub mod algorithms;
pub mod line_ending;
pub mod wrapper;

pub use algorithms::{wrap_greedy, wrap_minimum_raggedness};
pub use line_ending::LineEnding;
pub use wrapper::{CodeWrapper, CodeWrapperBuilder, LineData, WrapOptions};
