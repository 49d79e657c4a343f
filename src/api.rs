mod backend;
#[cfg(test)]
pub mod fake;
pub mod holidaze;

pub use self::backend::Backend;
