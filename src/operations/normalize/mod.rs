mod ring_normalizer;

pub use ring_normalizer::{Ring, RingNormalizer};
