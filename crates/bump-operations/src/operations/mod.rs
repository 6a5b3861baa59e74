mod bump;

pub use bump::{BumpInput, BumpOperation, BumpOutput};
