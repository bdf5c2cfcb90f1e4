//! agentcat Profile Registry
//!
//! Profiles are YAML documents under `<catalog>/profiles/`, one per file.
//! Each names the technology indicators it cares about and the agents and
//! skills to deploy when it wins.
//!
//! ## Loading rules
//!
//! - `load_all` never fails because of one bad file: unreadable or
//!   unparseable definitions are skipped with a warning
//! - `load_one` is an explicit request and surfaces every failure

#![deny(unsafe_code, dead_code, unused_imports, unused_variables, missing_docs)]

pub mod registry;

pub use registry::{parse_profile, ProfileRegistry, PROFILES_DIR};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::ProfileRegistry;
    pub use agentcat_types::Profile;
}
