//! Pipeline stages for splitting review documents into issue records.
//!
//! Each submodule implements exactly one transformation step and is
//! independently testable.
//!
//! ## Data Flow
//!
//! ```text
//! discover ──▶ normalize ──▶ classify ──▶ extract ──▶ sequence ──▶ record ──▶ summary
//! (source dir)  (CRLF/BOM)   (filename)   (headings)  (counters,   (metadata   (optional
//!                                                      filenames)   + body)     index)
//! ```
//!
//! 1. [`discover`]  — validate the source directory, list `*.md` in path order
//! 2. [`normalize`] — line-ending and leading-BOM cleanup
//! 3. [`classify`]  — `<GROUP>_MONITORING` / `<GROUP>_PERFORMANCE` → (group, category)
//! 4. [`extract`]   — `### N. Title` sections, priority field, body rebuild
//! 5. [`sequence`]  — per-category sequence numbers and collision-free names
//!    (uses [`sanitize`] for the title part)
//! 6. [`record`]    — ordered metadata block + body, and the reader for it
//! 7. [`summary`]   — per-category `_summary.md` index

pub mod classify;
pub mod discover;
pub mod extract;
pub mod normalize;
pub mod record;
pub mod sanitize;
pub mod sequence;
pub mod summary;
