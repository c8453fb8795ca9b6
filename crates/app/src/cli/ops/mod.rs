pub mod init;
pub mod share;
pub mod version;

pub use init::Init;
pub use share::Share;
pub use version::Version;
