pub mod normalize;
pub mod util;
pub mod wise;

pub use wise::WiseClient;
