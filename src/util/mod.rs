pub mod error;
pub mod sysfs;

#[cfg(test)]
pub mod fixture;
