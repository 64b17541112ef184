pub mod fs;
pub mod settings;

pub use fs::{create_dir_all, delete_folder, last_segment};
pub use settings::{parse_or, parse_required, required};

#[cfg(test)]
mod tests;
