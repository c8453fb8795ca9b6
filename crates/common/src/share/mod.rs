//! Capability-based sharing
//!
//! Sharing hands out a URL that grants bearer access to stored content
//! without touching access control on the content itself:
//!
//! ```text
//! selection --resolve--> [refs] --(more than one)--> static set --> directory
//!                           |                                          |
//!                           +------------------+-----------------------+
//!                                              |
//!                                     target --sign--> share claim --> URL
//! ```
//!
//! - [`resolve_selection`] validates the raw selection
//! - [`assemble_static_set`] / [`assemble_directory`] wrap several items in
//!   a freshly named directory
//! - [`issue_share_claim`] signs and uploads a transitive `haveref` claim
//! - [`share_path`] / [`url_prefix`] build the final URL
//! - [`Sharer`] runs the whole sequence; [`ShareAction`] runs it in the
//!   background and reports through a [`ShareNotifier`]
//!
//! Nothing is rolled back on failure: blobs uploaded before a failing step
//! stay in the store unreferenced until the server collects them.

mod action;
mod assemble;
mod claim;
mod error;
mod resolve;
mod sharer;
mod url;

pub use action::{ChannelNotifier, SelectionSource, ShareAction, ShareNotifier, ShareOutcome};
pub use assemble::{
    assemble_directory, assemble_selection, assemble_static_set, shared_dir_name,
    DEFAULT_MAX_SET_MEMBERS, MIN_SET_MEMBERS,
};
pub use claim::issue_share_claim;
pub use error::{PrefixResolutionError, ShareError, ValidationError};
pub use resolve::{
    parse_bool, resolve_selection, ResolvedItem, SelectedItem, BLOB_REF_KEY, IS_DIR_KEY,
};
pub use sharer::{Share, Sharer};
pub use url::{absolute_share_url, anchor_text, share_path, url_prefix};
