//! Markers of the moments in an entity's life, distinguishing its
//! [`DateTimeOf`]s from each other.
//!
//! [`DateTimeOf`]: crate::DateTimeOf

/// Entity was created.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Entity was modified the last time.
#[derive(Clone, Copy, Debug)]
pub struct Modification;

/// Work on the entity was started.
#[derive(Clone, Copy, Debug)]
pub struct Start;

/// Work on the entity was completed.
#[derive(Clone, Copy, Debug)]
pub struct Completion;
