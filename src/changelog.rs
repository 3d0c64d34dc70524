//! Release changelog maintenance: version numbering, entry merging and
//! persistence of the markdown document.
pub mod merge;
pub mod store;
pub mod version;
