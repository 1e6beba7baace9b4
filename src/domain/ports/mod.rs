mod upstream;

pub use upstream::{Upstream, UpstreamError};
