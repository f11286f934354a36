mod hash;

pub use hash::HashId;
