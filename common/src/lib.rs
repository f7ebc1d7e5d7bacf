//! Glyph Sort Common Library
//!
//! CLIとテストハーネスで共有される型とコアロジック。
//! I/Oを持たない純粋なロジックのみを置く。

pub mod consensus;
pub mod cursor;
pub mod error;
pub mod events;
pub mod script;
pub mod types;

pub use consensus::{reduce, ConsensusResult};
pub use cursor::{FolderCursor, FolderRole, CHAPTER_PREFIX, CLASSIFIED_DIR, UNCLASSIFIED_DIR};
pub use error::{Error, Result};
pub use events::{OperatorAction, WorkflowEvent, WorkflowMode, WorkflowState};
pub use script::{is_target_text, validate_label};
pub use types::{ConfidenceBand, Detection, ImageBatch, MAX_BATCH_SIZE};
