//! Progress display while requests are in flight

pub mod reporter;
