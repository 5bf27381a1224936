/// An owned key-value pair.
///
/// Ordering between entries is decided by the comparator of the map that
/// holds them, so the pair itself carries no ordering of its own.
#[derive(Debug)]
pub struct Entry<T, U> {
    pub key: T,
    pub value: U,
}
